//! Derivation of flat values from a tariff snapshot
//!
//! Pure functions, recomputed on every observation. Missing or empty nested
//! structures degrade to `None` rather than erroring; only the coordinator
//! treats a fully empty collections list as a failure.

use super::types::{FixedPriceLevel, TariffSnapshot};
use chrono::{Local, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;

/// Energy price published per hour bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourPrice {
    pub total: Option<f64>,
    pub total_ex_vat: Option<f64>,
}

/// Id of the fixed price level currently applicable to the first metering
/// point, or `None` when the metering point list is empty or carries no level.
pub fn current_price_level(snapshot: &TariffSnapshot) -> Option<&str> {
    snapshot
        .first_collection()?
        .metering_points_and_price_levels
        .first()?
        .current_fixed_price_level
        .as_ref()?
        .id
        .as_deref()
}

/// Monthly fixed-charge fields from the first price level of the first
/// fixed-prices entry.
pub fn monthly_fields(snapshot: &TariffSnapshot) -> Option<&FixedPriceLevel> {
    snapshot
        .first_collection()?
        .grid_tariff
        .as_ref()?
        .tariff_price
        .as_ref()?
        .price_info
        .as_ref()?
        .fixed_prices
        .first()?
        .price_levels
        .first()
}

/// Map from hour-window label to energy price.
///
/// Entries lacking either a label or an energy price are skipped silently.
pub fn hourly_map(snapshot: &TariffSnapshot) -> BTreeMap<String, HourPrice> {
    snapshot
        .hours()
        .iter()
        .filter_map(|entry| {
            let name = entry.short_name.as_ref()?;
            let price = entry.energy_price.as_ref()?;
            Some((
                name.clone(),
                HourPrice {
                    total: price.total,
                    total_ex_vat: price.total_ex_vat,
                },
            ))
        })
        .collect()
}

/// Number of hour buckets present in the snapshot
pub fn hour_count(snapshot: &TariffSnapshot) -> usize {
    snapshot.hours().len()
}

/// Hour-window label for a given hour of day: "10-11", wrapping "23-00"
pub fn short_name_for_hour(hour: u32) -> String {
    format!("{:02}-{:02}", hour % 24, (hour + 1) % 24)
}

/// Total energy price of the bucket covering the given hour of day.
///
/// Scans for an exact label match and returns the first hit; `None` when no
/// bucket matches or the hour list is missing.
pub fn price_at_hour(snapshot: &TariffSnapshot, hour: u32) -> Option<f64> {
    let short_name = short_name_for_hour(hour);
    snapshot
        .hours()
        .iter()
        .find(|entry| entry.short_name.as_deref() == Some(short_name.as_str()))
        .and_then(|entry| entry.energy_price.as_ref())
        .and_then(|price| price.total)
}

/// Total energy price for the current local hour
pub fn current_hour_price(snapshot: &TariffSnapshot) -> Option<f64> {
    price_at_hour(snapshot, Local::now().hour())
}
