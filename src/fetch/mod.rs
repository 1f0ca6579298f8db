//! Production table download from USDA NASS Quick Stats.

mod nass;
mod retry;

pub use nass::{API_KEY_ENV, COLUMNS, NassClient, QUICK_STATS_URL};
pub(crate) use retry::Failure;
pub use retry::RetryPolicy;
