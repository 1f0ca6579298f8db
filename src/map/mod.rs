mod county;
mod fips;
pub(crate) mod io;
mod river;

pub use county::{County, CountyLayer};
pub use fips::{CountyFips, state_name};
pub use river::{NameFilter, River, RiverNetwork};
