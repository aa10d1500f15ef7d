//! Wire types for the aggregator's `GetOnlineCarrierOffers` endpoint.
//!
//! Only the fields the normalizer and summaries read are typed. The vendor is
//! loose about nulls and types, so apart from the charge set id every field
//! falls back to empty when it holds something unexpected.

use crate::domain::model::ProductRequest;
use crate::domain::product::{ContainerType, SizeType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Reads a field that may hold anything: values of an unexpected type come
/// back as the default instead of failing the enclosing offer.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like [`lenient`] for collections, but element by element: a non-array
/// reads as empty and elements of the wrong shape are dropped.
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent field or a
/// value of the wrong type (`None`).
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(Some(None)),
        value => Ok(serde_json::from_value(value).ok().map(Some)),
    }
}

/// Identifiers the vendor sends as either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LooseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseId::Number(n) => write!(f, "{}", n),
            LooseId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortCode<'a> {
    pub code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersQuery<'a> {
    pub container_type: ContainerType,
    pub size_types: Vec<SizeType>,
    pub charge_criterias: Option<serde_json::Value>,
    pub origin: PortCode<'a>,
    pub destination: PortCode<'a>,
    pub date_begin: String,
    pub date_end: String,
    pub rates_fetcher: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffersResponse {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub carrier_offers: Vec<CarrierOffer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Carrier {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarrierOffer {
    #[serde(default, deserialize_with = "lenient")]
    pub carrier: Carrier,
    /// Kept raw: each offer is copied verbatim into the rate's attributes.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub offers: Vec<serde_json::Value>,
}

/// Everything one container-type request returned, with the products that
/// were asked for in that request.
#[derive(Debug, Clone)]
pub struct BucketOffers {
    pub container_type: ContainerType,
    pub products: Vec<ProductRequest>,
    pub carrier_offers: Vec<CarrierOffer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub charge_set: ChargeSet,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub routes: Vec<Route>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub rates_availabilitys: Vec<RatesAvailability>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub offer_informations: Vec<OfferInformation>,
    #[serde(default, deserialize_with = "lenient")]
    pub rates_offer: Option<RatesOffer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeSet {
    pub charge_set_id: LooseId,
    #[serde(default, deserialize_with = "lenient")]
    pub creation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rates_price_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_begin: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_end: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quot_validity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub carrier_reference: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub deep_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub charges: Vec<Charge>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    #[serde(default, deserialize_with = "lenient")]
    pub charge_type: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    /// `Some(None)` is an explicit `null` and applies to every size. An absent
    /// id matches no size.
    #[serde(default, deserialize_with = "nullable")]
    pub size_type_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub charge_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub application: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, deserialize_with = "lenient_seq")]
    pub departs: Vec<Depart>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub trans_shipments: Vec<TransShipment>,
    /// Passed through untouched.
    #[serde(default)]
    pub transit_time: Option<serde_json::Value>,
    #[serde(default)]
    pub best_transit_time: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub origin_port: Option<VendorPort>,
    #[serde(default, deserialize_with = "lenient")]
    pub destination_port: Option<VendorPort>,
    #[serde(default, deserialize_with = "lenient")]
    pub service_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorPort {
    #[serde(default, deserialize_with = "lenient")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depart {
    #[serde(default, deserialize_with = "lenient")]
    pub depart_id: Option<LooseId>,
    #[serde(default, deserialize_with = "lenient")]
    pub etd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eta: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vessel: Option<Vessel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vessel {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub imo: Option<LooseId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransShipment {
    #[serde(default, deserialize_with = "lenient")]
    pub un_locode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesAvailability {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub container_left: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferInformation {
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesOffer {
    #[serde(default, deserialize_with = "lenient")]
    pub short_name: Option<String>,
}

impl Offer {
    pub fn from_raw(raw: &serde_json::Value) -> serde_json::Result<Self> {
        Offer::deserialize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_read_as_empty() {
        let offer = Offer::from_raw(&json!({
            "chargeSet": { "chargeSetId": 42, "charges": null },
            "routes": null,
            "ratesAvailabilitys": null
        }))
        .unwrap();

        assert_eq!(offer.charge_set.charge_set_id.to_string(), "42");
        assert!(offer.charge_set.charges.is_empty());
        assert!(offer.routes.is_empty());
        assert!(offer.rates_availabilitys.is_empty());
    }

    #[test]
    fn test_missing_charge_set_is_an_error() {
        assert!(Offer::from_raw(&json!({ "routes": [] })).is_err());
    }

    #[test]
    fn test_odd_display_fields_fall_back_to_empty() {
        let offer = Offer::from_raw(&json!({
            "chargeSet": { "chargeSetId": "CS-9", "deepLink": 7, "charges": [
                { "chargeName": "Freight", "amount": "1200", "sizeTypeId": 1 },
                "not a charge"
            ]},
            "routes": [{
                "originPort": "PTLEI",
                "serviceCode": 42,
                "bestTransitTime": 21.5,
                "transitTime": "21",
                "departs": [{ "etd": "2024-01-10T00:00:00Z", "vessel": { "name": ["MSC"], "imo": {} } }]
            }],
            "offerInformations": { "content": "not a list" },
            "ratesOffer": "MSC"
        }))
        .unwrap();

        assert_eq!(offer.charge_set.charge_set_id.to_string(), "CS-9");
        assert_eq!(offer.charge_set.deep_link, None);
        assert_eq!(offer.charge_set.charges.len(), 1);
        assert_eq!(offer.charge_set.charges[0].amount, None);

        let route = &offer.routes[0];
        assert_eq!(route.origin_port, None);
        assert_eq!(route.service_code, None);
        assert_eq!(route.best_transit_time, Some(json!(21.5)));
        assert_eq!(route.transit_time, Some(json!("21")));
        let vessel = route.departs[0].vessel.as_ref().unwrap();
        assert_eq!(vessel.name, None);
        assert_eq!(vessel.imo, None);
        assert!(offer.offer_informations.is_empty());
        assert!(offer.rates_offer.is_none());
    }

    #[test]
    fn test_size_type_id_null_absent_and_set() {
        let charge = |value: serde_json::Value| -> Charge { serde_json::from_value(value).unwrap() };

        assert_eq!(charge(json!({ "sizeTypeId": null })).size_type_id, Some(None));
        assert_eq!(charge(json!({ "sizeTypeId": 2 })).size_type_id, Some(Some(2)));
        assert_eq!(charge(json!({})).size_type_id, None);
        assert_eq!(charge(json!({ "sizeTypeId": "2" })).size_type_id, None);
    }

    #[test]
    fn test_malformed_carrier_reads_as_unknown() {
        let response: OffersResponse = serde_json::from_value(json!({
            "carrierOffers": [
                { "carrier": { "name": "MSC", "code": 17 }, "offers": [{}] },
                { "carrier": "CMA CGM", "offers": null }
            ]
        }))
        .unwrap();

        assert_eq!(response.carrier_offers.len(), 2);
        assert_eq!(response.carrier_offers[0].carrier.name.as_deref(), Some("MSC"));
        assert_eq!(response.carrier_offers[0].carrier.code, None);
        assert!(response.carrier_offers[1].carrier.name.is_none());
        assert!(response.carrier_offers[1].offers.is_empty());
    }

    #[test]
    fn test_response_without_carrier_offers() {
        let response: OffersResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.carrier_offers.is_empty());

        let response: OffersResponse =
            serde_json::from_value(json!({ "carrierOffers": null })).unwrap();
        assert!(response.carrier_offers.is_empty());
    }

    #[test]
    fn test_query_serializes_vendor_field_names() {
        let query = OffersQuery {
            container_type: ContainerType::Dry,
            size_types: vec![crate::domain::product::ProductType::Dry20.size_type()],
            charge_criterias: None,
            origin: PortCode { code: "PTLEI" },
            destination: PortCode { code: "BRNVT" },
            date_begin: "2024-01-01T00:00:00.000Z".to_string(),
            date_end: "2024-02-01T00:00:00.000Z".to_string(),
            rates_fetcher: "OKARGO",
        };

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({
                "containerType": "Dry",
                "sizeTypes": [{ "sizeTypeId": 1, "name": "20DRY" }],
                "chargeCriterias": null,
                "origin": { "code": "PTLEI" },
                "destination": { "code": "BRNVT" },
                "dateBegin": "2024-01-01T00:00:00.000Z",
                "dateEnd": "2024-02-01T00:00:00.000Z",
                "ratesFetcher": "OKARGO"
            })
        );
    }
}
