//! Turns vendor carrier offers into [`Rate`] records.

use crate::domain::model::{
    Availability, ChargeValue, Field, FieldType, Port, ProductRequest, Rate, RateAttributes,
    RateOffer, RateProduct, RateType, Section, SectionOffer, Supplier, TransitDate,
    TransportationMethod, FLAT_VALUE_KEY,
};
use crate::domain::offer::{BucketOffers, Carrier, Charge, Offer, Route};
use crate::domain::ports::IdGenerator;
use crate::utils::dates;
use std::collections::BTreeMap;

const DEFAULT_CURRENCY: &str = "USD";
const SCHEDULES_API_SOURCE: &str = "SchedulesApi";

pub struct RateNormalizer<G: IdGenerator> {
    ids: G,
}

impl<G: IdGenerator> RateNormalizer<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// One rate per (carrier offer, bucket product, offer), in response order.
    /// Rates without a usable departure are dropped.
    pub fn normalize(&self, source: &Port, destination: &Port, buckets: &[BucketOffers]) -> Vec<Rate> {
        let mut rates = Vec::new();
        let mut dropped = 0usize;

        for bucket in buckets {
            for carrier_offer in &bucket.carrier_offers {
                for product in &bucket.products {
                    for raw in &carrier_offer.offers {
                        let offer = match Offer::from_raw(raw) {
                            Ok(offer) => offer,
                            Err(e) => {
                                tracing::warn!(
                                    "Skipping unreadable offer from {}: {}",
                                    carrier_offer.carrier.code.as_deref().unwrap_or("unknown carrier"),
                                    e
                                );
                                continue;
                            }
                        };

                        let rate = self.build_rate(
                            source,
                            destination,
                            product,
                            &carrier_offer.carrier,
                            raw,
                            &offer,
                        );
                        if rate.offer.transit_dates.is_empty() {
                            dropped += 1;
                        } else {
                            rates.push(rate);
                        }
                    }
                }
            }
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} rate(s) without transit dates", dropped);
        }
        tracing::info!("Normalized {} rate(s)", rates.len());
        rates
    }

    fn build_rate(
        &self,
        source: &Port,
        destination: &Port,
        product: &ProductRequest,
        carrier: &Carrier,
        raw: &serde_json::Value,
        offer: &Offer,
    ) -> Rate {
        let product_id = self.ids.next_id();
        let size_type_id = product.product_type.size_type().size_type_id;

        let fields: Vec<(Option<String>, Field)> = offer
            .charge_set
            .charges
            .iter()
            .filter(|c| !is_included_source_charge(c))
            .filter(|c| applies_to_size(c, size_type_id))
            .map(|c| (c.application.clone(), self.field(c, &product_id)))
            .collect();
        let sections = self.sections(fields);

        let charge_set = &offer.charge_set;
        let route = offer.routes.first();

        Rate {
            id: format!(
                "okargo-{}-{}-{}",
                charge_set.charge_set_id,
                product.product_type,
                self.ids.next_id()
            ),
            rate_type: match charge_set.rates_price_type.as_deref() {
                Some("Contract") => Some(RateType::Contract),
                Some("Spot") => Some(RateType::Spot),
                _ => None,
            },
            created: charge_set.creation_date.as_deref().and_then(dates::epoch_millis),
            transportation_method: TransportationMethod::Sea,
            source: source.clone(),
            destination: destination.clone(),
            supplier: Supplier {
                organization: carrier.name.clone(),
                unique_id: carrier.code.clone(),
            },
            attributes: RateAttributes {
                okargo_offer: raw.clone(),
            },
            product: RateProduct {
                id: product_id,
                product_type: product.product_type,
                dangerous: product.dangerous,
                quantity: 1,
            },
            offer: RateOffer {
                valid_from: charge_set.date_begin.as_deref().and_then(dates::unpadded_date),
                valid_until: charge_set.quot_validity.as_deref().and_then(dates::unpadded_date),
                transit_time: route.and_then(|r| r.transit_time.clone()),
                transit_dates: route.map(transit_dates).unwrap_or_default(),
                availability: offer.rates_availabilitys.first().map(|a| Availability {
                    available: a.status.as_deref() == Some("Available"),
                    count: a.container_left.filter(|&left| left != 0),
                }),
                transshipment: route
                    .map(|r| {
                        r.trans_shipments
                            .iter()
                            .map(|t| t.un_locode.as_deref().unwrap_or(""))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default(),
                sections,
            },
        }
    }

    fn field(&self, charge: &Charge, product_id: &str) -> Field {
        let (field_type, key) = if charge.unit.as_deref() == Some("Specific") {
            (FieldType::PerUnit, product_id.to_string())
        } else {
            (FieldType::Flat, FLAT_VALUE_KEY.to_string())
        };

        let value = ChargeValue {
            value: charge.amount.unwrap_or(0.0),
            currency: charge
                .currency
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        };

        Field {
            id: self.ids.next_id(),
            title: charge.charge_name.clone(),
            field_type,
            values: BTreeMap::from([(key, value)]),
        }
    }

    /// Groups fields by charge application, first-seen order.
    fn sections(&self, fields: Vec<(Option<String>, Field)>) -> Vec<Section> {
        let mut groups: Vec<(Option<String>, Vec<Field>)> = Vec::new();
        for (application, field) in fields {
            match groups.iter_mut().find(|(title, _)| *title == application) {
                Some((_, group)) => group.push(field),
                None => groups.push((application, vec![field])),
            }
        }

        groups
            .into_iter()
            .map(|(title, fields)| Section {
                id: self.ids.next_id(),
                title,
                offers: vec![SectionOffer {
                    id: self.ids.next_id(),
                    fields,
                }],
            })
            .collect()
    }
}

/// Origin charges already included in the freight price.
fn is_included_source_charge(charge: &Charge) -> bool {
    charge.charge_type.as_deref() == Some("Source") && charge.kind.as_deref() == Some("Incl")
}

/// A `null` size type applies to every size; an absent one to none.
fn applies_to_size(charge: &Charge, size_type_id: i64) -> bool {
    match charge.size_type_id {
        Some(None) => true,
        Some(Some(id)) => id == size_type_id,
        None => false,
    }
}

fn transit_dates(route: &Route) -> Vec<TransitDate> {
    route
        .departs
        .iter()
        .filter(|d| d.source.as_deref() != Some(SCHEDULES_API_SOURCE))
        .filter_map(|d| {
            Some(TransitDate {
                etd: dates::strip_time_suffix(d.etd.as_deref()?),
                eta: dates::strip_time_suffix(d.eta.as_deref()?),
            })
        })
        .collect()
}
