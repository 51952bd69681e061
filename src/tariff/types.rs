//! Wire types for the Norgesnett grid tariff document
//!
//! The API nests prices deeply; every level below the top-level collections
//! list is optional so that a sparse response degrades to "not set" values
//! instead of failing the whole snapshot. Unknown keys are ignored.

use serde::{Deserialize, Serialize};

/// A full tariff document as returned by the tariff query endpoint.
///
/// This is the raw last-known-good snapshot the coordinator commits; all
/// derived values are computed from it on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TariffSnapshot {
    pub grid_tariff_collections: Vec<TariffCollection>,
}

impl TariffSnapshot {
    /// First collection, the only one consulted
    pub fn first_collection(&self) -> Option<&TariffCollection> {
        self.grid_tariff_collections.first()
    }

    /// Hour entries of the first collection, empty when absent
    pub fn hours(&self) -> &[HourEntry] {
        self.first_collection()
            .and_then(|c| c.grid_tariff.as_ref())
            .and_then(|g| g.tariff_price.as_ref())
            .map(|p| p.hours.as_slice())
            .unwrap_or(&[])
    }
}

/// One grid tariff collection for a set of metering points
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TariffCollection {
    pub metering_points_and_price_levels: Vec<MeteringPointLevel>,
    pub grid_tariff: Option<GridTariff>,
}

/// Metering point entry carrying its currently applicable price level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeteringPointLevel {
    pub current_fixed_price_level: Option<FixedPriceLevelRef>,
}

/// Reference to the active fixed price level tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedPriceLevelRef {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridTariff {
    pub tariff_price: Option<TariffPrice>,
}

/// Price container: fixed monthly components plus hour-of-day energy prices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TariffPrice {
    pub price_info: Option<PriceInfo>,
    pub hours: Vec<HourEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceInfo {
    pub fixed_prices: Vec<FixedPrice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedPrice {
    pub price_levels: Vec<FixedPriceLevel>,
}

/// Monthly fixed-charge breakdown for one price level tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixedPriceLevel {
    pub monthly_total: Option<f64>,
    pub monthly_total_ex_vat: Option<f64>,
    pub monthly_ex_taxes: Option<f64>,
    pub monthly_taxes: Option<f64>,
    pub monthly_unit_of_measure: Option<String>,
}

/// One hour-of-day pricing bucket, labelled "HH-HH" in 24h format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HourEntry {
    pub short_name: Option<String>,
    pub energy_price: Option<EnergyPrice>,
}

/// Energy price for one hour bucket
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnergyPrice {
    pub total: Option<f64>,
    pub total_ex_vat: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_document() {
        let doc = json!({
            "gridTariffCollections": [{
                "meteringPointsAndPriceLevels": [
                    {"currentFixedPriceLevel": {"id": "lvl_2"}}
                ],
                "gridTariff": {
                    "tariffPrice": {
                        "priceInfo": {
                            "fixedPrices": [{
                                "priceLevels": [{
                                    "monthlyTotal": 340.0,
                                    "monthlyTotalExVat": 272.0,
                                    "monthlyExTaxes": 250.0,
                                    "monthlyTaxes": 90.0,
                                    "monthlyUnitOfMeasure": "kr/mnd"
                                }]
                            }]
                        },
                        "hours": [
                            {"shortName": "00-01", "energyPrice": {"total": 0.4, "totalExVat": 0.32}}
                        ]
                    }
                }
            }]
        });

        let snapshot: TariffSnapshot = serde_json::from_value(doc).unwrap();
        assert_eq!(snapshot.grid_tariff_collections.len(), 1);
        assert_eq!(snapshot.hours().len(), 1);
        assert_eq!(snapshot.hours()[0].short_name.as_deref(), Some("00-01"));

        let level = snapshot.first_collection().unwrap().metering_points_and_price_levels[0]
            .current_fixed_price_level
            .as_ref()
            .unwrap();
        assert_eq!(level.id.as_deref(), Some("lvl_2"));
    }

    #[test]
    fn test_missing_nested_structures_default() {
        let snapshot: TariffSnapshot =
            serde_json::from_value(json!({"gridTariffCollections": [{}]})).unwrap();
        assert_eq!(snapshot.grid_tariff_collections.len(), 1);
        assert!(snapshot.hours().is_empty());
        assert!(
            snapshot.first_collection().unwrap().metering_points_and_price_levels.is_empty()
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let doc = json!({"gridTariffCollections": [], "requestMeta": {"elapsed": 12}});
        let snapshot: TariffSnapshot = serde_json::from_value(doc).unwrap();
        assert!(snapshot.grid_tariff_collections.is_empty());
    }
}
