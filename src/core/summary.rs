//! Card data: the facts about a rate a viewer shows next to its charges,
//! read back out of the vendor offer kept in `attributes.okargoOffer`.

use crate::domain::model::Rate;
use crate::domain::offer::{Offer, VendorPort};
use crate::utils::error::{RatesError, Result};
use serde::Serialize;

const MIDNIGHT_SUFFIX: &str = "T00:00:00";

fn strip_midnight(value: &str) -> String {
    value.replacen(MIDNIGHT_SUFFIX, "", 1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselInfo {
    pub name: String,
    pub voyage: Option<String>,
    pub imo: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    pub origin: Option<VendorPort>,
    pub destination: Option<VendorPort>,
    pub transit_days: Option<serde_json::Value>,
    pub shipping_window_start: Option<String>,
    pub shipping_window_end: Option<String>,
    pub expiration: Option<String>,
    pub vessel: Option<VesselInfo>,
    pub rate_type: Option<String>,
    /// Only set for contract rates.
    pub carrier_reference: Option<String>,
    pub more_info: String,
    pub booking_source: Option<String>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub vessel: Option<String>,
    pub voyage: Option<String>,
    pub etd: Option<String>,
    pub eta: Option<String>,
    pub service: Option<String>,
    pub transit_days: Option<serde_json::Value>,
}

fn vendor_offer(rate: &Rate) -> Result<Offer> {
    Offer::from_raw(&rate.attributes.okargo_offer).map_err(|e| RatesError::ProcessingError {
        message: format!("rate {} carries an unreadable offer: {}", rate.id, e),
    })
}

impl RateSummary {
    /// Out-of-range indexes yield empty route and vessel data rather than an error.
    pub fn from_rate(rate: &Rate, route_index: usize, depart_index: usize) -> Result<Self> {
        let offer = vendor_offer(rate)?;
        let charge_set = &offer.charge_set;
        let route = offer.routes.get(route_index);
        let depart = route.and_then(|r| r.departs.get(depart_index));

        let vessel = depart.and_then(|d| {
            let vessel = d.vessel.as_ref()?;
            Some(VesselInfo {
                name: vessel.name.clone()?,
                voyage: d.uid.clone(),
                imo: vessel.imo.as_ref().map(ToString::to_string),
                service: route.and_then(|r| r.service_code.clone()),
            })
        });

        let carrier_reference = match charge_set.rates_price_type.as_deref() {
            Some("Contract") => charge_set.carrier_reference.clone(),
            _ => None,
        };

        let more_info = offer
            .offer_informations
            .iter()
            .map(|i| i.content.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(",");

        Ok(Self {
            origin: route.and_then(|r| r.origin_port.clone()),
            destination: route.and_then(|r| r.destination_port.clone()),
            transit_days: route.and_then(|r| r.best_transit_time.clone()),
            shipping_window_start: charge_set.date_begin.as_deref().map(strip_midnight),
            shipping_window_end: charge_set.date_end.as_deref().map(strip_midnight),
            expiration: charge_set.quot_validity.as_deref().map(strip_midnight),
            vessel,
            rate_type: charge_set.rates_price_type.clone(),
            carrier_reference,
            more_info,
            booking_source: offer
                .rates_offer
                .as_ref()
                .and_then(|r| r.short_name.clone())
                .filter(|s| !s.is_empty()),
            booking_link: charge_set.deep_link.clone().filter(|l| !l.is_empty()),
        })
    }
}

/// One row per route, from its first departure.
pub fn schedule(rate: &Rate) -> Result<Vec<ScheduleRow>> {
    let offer = vendor_offer(rate)?;
    Ok(offer
        .routes
        .iter()
        .map(|route| {
            let depart = route.departs.first();
            ScheduleRow {
                vessel: depart.and_then(|d| d.vessel.as_ref()).and_then(|v| v.name.clone()),
                voyage: depart.and_then(|d| d.uid.clone()),
                etd: depart.and_then(|d| d.etd.clone()),
                eta: depart.and_then(|d| d.eta.clone()),
                service: route.service_code.clone(),
                transit_days: route.transit_time.clone(),
            }
        })
        .collect())
}
