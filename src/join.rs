//! Left outer join of county polygons against one crop/year of production records.

use ahash::AHashMap;

use crate::{
    map::{County, CountyFips, CountyLayer},
    production::{Crop, ProductionRecord, ProductionTable},
};

/// One county in a joined view, with its production record if there is one.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub county: &'a County,
    pub record: Option<&'a ProductionRecord>,
}

impl<'a> JoinedRow<'a> {
    #[inline] pub fn fips(&self) -> &'a CountyFips { &self.county.fips }

    /// Production value; `None` means no data, which is distinct from `Some(0.0)`.
    #[inline] pub fn value(&self) -> Option<f64> { self.record.map(|record| record.value) }

    /// County name, preferring the production table's spelling when it matched.
    pub fn county_name(&self) -> &'a str {
        self.record.and_then(|record| record.county_name.as_deref())
            .unwrap_or(&self.county.name)
    }

    pub fn state_name(&self) -> Option<&'a str> {
        self.record.and_then(|record| record.state_name.as_deref())
            .or_else(|| self.county.state_name())
    }
}

/// Request-scoped join result: exactly one row per county, in county order.
#[derive(Debug, Clone)]
pub struct JoinedView<'a> {
    pub crop: Crop,
    pub year: u16,
    rows: Vec<JoinedRow<'a>>,
}

impl<'a> JoinedView<'a> {
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    #[inline] pub fn rows(&self) -> &[JoinedRow<'a>] { &self.rows }

    /// Number of counties without a matching record.
    pub fn missing_count(&self) -> usize {
        self.rows.iter().filter(|row| row.record.is_none()).count()
    }

    /// Minimum and maximum over present values, `None` if every county is missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows.iter()
            .filter_map(|row| row.value())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }
}

/// Join `table`'s records for `year` onto every county in `counties`.
///
/// When several records share a county key the last one in table order wins;
/// the number of such keys is logged as a warning.
pub fn join<'a>(counties: &'a CountyLayer, table: &'a ProductionTable, year: u16) -> JoinedView<'a> {
    let mut by_fips: AHashMap<&CountyFips, &ProductionRecord> = AHashMap::new();
    let mut duplicates = 0usize;
    for record in table.for_year(year) {
        if by_fips.insert(&record.fips, record).is_some() {
            duplicates += 1;
        }
    }
    if duplicates > 0 {
        tracing::warn!("{} {year}: {duplicates} duplicate county records, keeping the last of each", table.crop());
    }

    let rows = counties.counties().iter()
        .map(|county| JoinedRow { county, record: by_fips.get(&county.fips).copied() })
        .collect::<Vec<_>>();

    let view = JoinedView { crop: table.crop(), year, rows };
    tracing::debug!("joined {} {year}: {} counties, {} without data", view.crop, view.len(), view.missing_count());
    view
}
