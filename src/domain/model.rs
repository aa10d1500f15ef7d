use crate::domain::product::ProductType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A port as handed to us by the caller. Only `id` (a UN/LOCODE) is read;
/// everything else rides along into the rate record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Port {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: serde_json::Map::new(),
        }
    }
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRequest {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub dangerous: bool,
}

impl ProductRequest {
    pub fn new(product_type: ProductType) -> Self {
        Self {
            product_type,
            quantity: 1,
            dangerous: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    pub source_port: Port,
    pub destination_port: Port,
    pub products: Vec<ProductRequest>,
    /// `YYYY-MM-DD` or an ISO-8601 datetime.
    pub date_begin: String,
    pub date_end: String,
    /// Key into the configured platforms table.
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Contract,
    Spot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportationMethod {
    Sea,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub organization: Option<String>,
    pub unique_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateAttributes {
    pub okargo_offer: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateProduct {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub dangerous: bool,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitDate {
    pub etd: String,
    pub eta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "per-unit")]
    PerUnit,
    #[serde(rename = "flat")]
    Flat,
}

/// Key used in [`Field::values`] for charges billed once per shipment.
pub const FLAT_VALUE_KEY: &str = "flat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeValue {
    pub value: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Keyed by product id for per-unit charges, by [`FLAT_VALUE_KEY`] otherwise.
    pub values: BTreeMap<String, ChargeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionOffer {
    pub id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: Option<String>,
    pub offers: Vec<SectionOffer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOffer {
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    /// The first route's transit time as the vendor sent it.
    pub transit_time: Option<serde_json::Value>,
    pub transit_dates: Vec<TransitDate>,
    pub availability: Option<Availability>,
    pub transshipment: String,
    pub sections: Vec<Section>,
}

/// The normalized record handed to downstream systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub id: String,
    #[serde(rename = "type")]
    pub rate_type: Option<RateType>,
    /// Offer creation time, epoch milliseconds.
    pub created: Option<i64>,
    pub transportation_method: TransportationMethod,
    pub source: Port,
    pub destination: Port,
    pub supplier: Supplier,
    pub attributes: RateAttributes,
    pub product: RateProduct,
    pub offer: RateOffer,
}

impl Rate {
    /// Sum of charge amounts per currency, flat and per-unit alike.
    pub fn totals_by_currency(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for section in &self.offer.sections {
            for offer in &section.offers {
                for field in &offer.fields {
                    for value in field.values.values() {
                        *totals.entry(value.currency.clone()).or_insert(0.0) += value.value;
                    }
                }
            }
        }
        totals
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rates: Vec<Rate>,
    pub json_output: Option<String>,
    pub csv_output: Option<String>,
}
