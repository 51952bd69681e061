//! Named derived values published to the host
//!
//! One generic value type pairs a stable key with an accessor over the last
//! committed snapshot; the current-hour price is a specialized value that is
//! additionally republished on a minute cadence so it tracks hour boundaries
//! between daily fetches. Reads never touch the network.

use crate::tariff::{TariffSnapshot, view};
use chrono::{Local, Timelike};
use serde_json::{Map, Value, json};

/// Sentinel published when the metering point carries no fixed price level
pub const PRICE_LEVEL_NOT_SET: &str = "Effektnivå er ikke satt";

/// A named value computed from the latest snapshot on demand
pub struct DerivedValue {
    key: &'static str,
    read: fn(&TariffSnapshot) -> Value,
}

impl DerivedValue {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn read(&self, snapshot: &TariffSnapshot) -> Value {
        (self.read)(snapshot)
    }
}

fn current_fixed_price_level(snapshot: &TariffSnapshot) -> Value {
    match view::current_price_level(snapshot) {
        Some(id) => json!(id),
        None => json!(PRICE_LEVEL_NOT_SET),
    }
}

fn monthly_total(snapshot: &TariffSnapshot) -> Value {
    json!(view::monthly_fields(snapshot).and_then(|f| f.monthly_total))
}

fn monthly_total_ex_vat(snapshot: &TariffSnapshot) -> Value {
    json!(view::monthly_fields(snapshot).and_then(|f| f.monthly_total_ex_vat))
}

fn monthly_ex_taxes(snapshot: &TariffSnapshot) -> Value {
    json!(view::monthly_fields(snapshot).and_then(|f| f.monthly_ex_taxes))
}

fn monthly_taxes(snapshot: &TariffSnapshot) -> Value {
    json!(view::monthly_fields(snapshot).and_then(|f| f.monthly_taxes))
}

fn monthly_unit_of_measure(snapshot: &TariffSnapshot) -> Value {
    json!(view::monthly_fields(snapshot).and_then(|f| f.monthly_unit_of_measure.clone()))
}

fn hour_count(snapshot: &TariffSnapshot) -> Value {
    json!(view::hour_count(snapshot))
}

fn hourly_prices(snapshot: &TariffSnapshot) -> Value {
    // Published as compact JSON text, one blob for the whole day
    match serde_json::to_string(&view::hourly_map(snapshot)) {
        Ok(text) => json!(text),
        Err(_) => Value::Null,
    }
}

/// All snapshot-cadence values, keyed the way the upstream document names them
pub const REGISTRY: &[DerivedValue] = &[
    DerivedValue {
        key: "currentFixedPriceLevel",
        read: current_fixed_price_level,
    },
    DerivedValue {
        key: "monthlyTotal",
        read: monthly_total,
    },
    DerivedValue {
        key: "monthlyTotalExVat",
        read: monthly_total_ex_vat,
    },
    DerivedValue {
        key: "monthlyExTaxes",
        read: monthly_ex_taxes,
    },
    DerivedValue {
        key: "monthlyTaxes",
        read: monthly_taxes,
    },
    DerivedValue {
        key: "monthlyUnitOfMeasure",
        read: monthly_unit_of_measure,
    },
    DerivedValue {
        key: "hourCount",
        read: hour_count,
    },
    DerivedValue {
        key: "hourlyPrices",
        read: hourly_prices,
    },
];

/// The time-windowed current-hour price, carrying its own refresh cadence
pub struct CurrentHourPrice;

impl CurrentHourPrice {
    pub const KEY: &'static str = "currentHourPrice";

    /// Value for an explicit hour of day
    pub fn read_at(&self, snapshot: &TariffSnapshot, hour: u32) -> Value {
        json!(view::price_at_hour(snapshot, hour))
    }

    /// Value for the current local hour
    pub fn read(&self, snapshot: &TariffSnapshot) -> Value {
        self.read_at(snapshot, Local::now().hour())
    }
}

/// Full set of published values for the given snapshot.
///
/// With no snapshot committed yet the map is empty; the host reads that as
/// "integration not ready".
pub fn collect(snapshot: Option<&TariffSnapshot>) -> Map<String, Value> {
    let mut values = Map::new();
    let Some(snapshot) = snapshot else {
        return values;
    };
    for value in REGISTRY {
        values.insert(value.key().to_string(), value.read(snapshot));
    }
    values.insert(
        CurrentHourPrice::KEY.to_string(),
        CurrentHourPrice.read(snapshot),
    );
    values
}
