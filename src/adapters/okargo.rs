//! HTTP client for the Okargo `GetOnlineCarrierOffers` endpoint.
//!
//! One POST per container type in the request; all of them must succeed.

use crate::config::toml_config::OkargoConfig;
use crate::domain::model::{ProductRequest, RateRequest};
use crate::domain::offer::{BucketOffers, OffersQuery, OffersResponse, PortCode};
use crate::domain::product::{ContainerType, SizeType};
use crate::utils::dates;
use crate::utils::error::{RatesError, Result};
use futures::future::try_join_all;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

const USER_AGENT: &str = concat!("freight-rates/", env!("CARGO_PKG_VERSION"));

/// Products that share a carrier container type and therefore one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub container_type: ContainerType,
    pub size_types: Vec<SizeType>,
    pub products: Vec<ProductRequest>,
}

/// Groups products by container type, keeping first-seen order.
pub fn bucket_products(products: &[ProductRequest]) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for product in products {
        let container_type = product.product_type.container_type();
        let size_type = product.product_type.size_type();
        match buckets.iter_mut().find(|b| b.container_type == container_type) {
            Some(bucket) => {
                bucket.size_types.push(size_type);
                bucket.products.push(product.clone());
            }
            None => buckets.push(Bucket {
                container_type,
                size_types: vec![size_type],
                products: vec![product.clone()],
            }),
        }
    }
    buckets
}

pub struct OkargoClient {
    client: Client,
    endpoint: String,
    token: String,
    platforms: HashMap<String, String>,
}

impl OkargoClient {
    /// Fails unless both a non-empty token and a platforms table are configured.
    /// An empty platforms table is accepted.
    pub fn new(config: &OkargoConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RatesError::MissingConfigError {
                field: "okargo.token".to_string(),
            })?;
        let platforms = config
            .platforms
            .clone()
            .ok_or_else(|| RatesError::MissingConfigError {
                field: "okargo.platforms".to_string(),
            })?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint().to_string(),
            token: token.to_string(),
            platforms,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn rates_fetcher(&self, platform: &str) -> Result<&str> {
        self.platforms
            .get(platform)
            .map(String::as_str)
            .ok_or_else(|| RatesError::UnknownPlatform {
                platform: platform.to_string(),
            })
    }

    /// Builds the request bodies without sending them.
    pub fn build_queries<'a>(&'a self, request: &'a RateRequest) -> Result<Vec<(Bucket, OffersQuery<'a>)>> {
        let rates_fetcher = self.rates_fetcher(&request.platform)?;
        let date_begin = dates::to_request_timestamp("dateBegin", &request.date_begin)?;
        let date_end = dates::to_request_timestamp("dateEnd", &request.date_end)?;

        Ok(bucket_products(&request.products)
            .into_iter()
            .map(|bucket| {
                let query = OffersQuery {
                    container_type: bucket.container_type,
                    size_types: bucket.size_types.clone(),
                    charge_criterias: None,
                    origin: PortCode {
                        code: &request.source_port.id,
                    },
                    destination: PortCode {
                        code: &request.destination_port.id,
                    },
                    date_begin: date_begin.clone(),
                    date_end: date_end.clone(),
                    rates_fetcher,
                };
                (bucket, query)
            })
            .collect())
    }

    pub async fn fetch_offers(&self, request: &RateRequest) -> Result<Vec<BucketOffers>> {
        let queries = self.build_queries(request)?;

        if queries.is_empty() {
            tracing::warn!("No products requested, skipping upstream calls");
            return Ok(Vec::new());
        }

        tracing::info!(
            "🚢 Fetching offers {} -> {} for {} container type(s)",
            request.source_port.id,
            request.destination_port.id,
            queries.len()
        );

        let results = try_join_all(
            queries
                .into_iter()
                .map(|(bucket, query)| self.fetch_bucket(bucket, query)),
        )
        .await?;

        Ok(results)
    }

    async fn fetch_bucket(&self, bucket: Bucket, query: OffersQuery<'_>) -> Result<BucketOffers> {
        tracing::debug!(
            "POST {} containerType={} sizeTypes={}",
            self.endpoint,
            bucket.container_type,
            bucket.size_types.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {} ({})", status, bucket.container_type);

        match status {
            StatusCode::UNAUTHORIZED => return Err(RatesError::InvalidToken),
            StatusCode::TOO_MANY_REQUESTS => return Err(RatesError::TooManyRequests),
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!("Upstream returned {} for {}: {}", s, bucket.container_type, body);
                return Err(RatesError::Upstream {
                    status: s.as_u16(),
                    body,
                });
            }
            _ => {}
        }

        let body = response.bytes().await?;
        // an empty body and a `null` body both mean no offers
        let parsed: OffersResponse = if body.iter().all(u8::is_ascii_whitespace) {
            OffersResponse::default()
        } else {
            serde_json::from_slice::<Option<OffersResponse>>(&body)?.unwrap_or_default()
        };

        tracing::debug!(
            "Received {} carrier offer(s) for {}",
            parsed.carrier_offers.len(),
            bucket.container_type
        );

        Ok(BucketOffers {
            container_type: bucket.container_type,
            products: bucket.products,
            carrier_offers: parsed.carrier_offers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Port;
    use crate::domain::product::ProductType;

    fn config() -> OkargoConfig {
        let mut platforms = HashMap::new();
        platforms.insert("5".to_string(), "Okargo".to_string());
        OkargoConfig::new("TOKEN", platforms)
    }

    fn request(products: &[ProductType]) -> RateRequest {
        RateRequest {
            source_port: Port::new("PTLEI"),
            destination_port: Port::new("BRNVT"),
            products: products.iter().copied().map(ProductRequest::new).collect(),
            date_begin: "2024-01-01".to_string(),
            date_end: "2024-02-01".to_string(),
            platform: "5".to_string(),
        }
    }

    #[test]
    fn test_construction_requires_token_and_platforms() {
        assert!(OkargoClient::new(&OkargoConfig::default()).is_err());

        let no_platforms = OkargoConfig {
            token: Some("abc".to_string()),
            ..OkargoConfig::default()
        };
        assert!(matches!(
            OkargoClient::new(&no_platforms),
            Err(RatesError::MissingConfigError { field }) if field == "okargo.platforms"
        ));

        let no_token = OkargoConfig {
            platforms: Some(HashMap::new()),
            ..OkargoConfig::default()
        };
        assert!(OkargoClient::new(&no_token).is_err());

        let empty_token = OkargoConfig::new("", HashMap::new());
        assert!(OkargoClient::new(&empty_token).is_err());

        assert!(OkargoClient::new(&OkargoConfig::new("abc", HashMap::new())).is_ok());
    }

    #[test]
    fn test_bucket_products_groups_by_container_type() {
        let req = request(&[
            ProductType::Dry20,
            ProductType::Reefer20,
            ProductType::Dry40,
            ProductType::HighCubeDry40,
        ]);
        let buckets = bucket_products(&req.products);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].container_type, ContainerType::Dry);
        let ids: Vec<i64> = buckets[0].size_types.iter().map(|s| s.size_type_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(buckets[0].products.len(), 3);
        assert_eq!(buckets[1].container_type, ContainerType::Rf);
        assert_eq!(buckets[1].products[0].product_type, ProductType::Reefer20);
    }

    #[test]
    fn test_build_queries() {
        let client = OkargoClient::new(&config()).unwrap();
        let req = request(&[ProductType::Dry20]);
        let queries = client.build_queries(&req).unwrap();

        assert_eq!(queries.len(), 1);
        let (_, query) = &queries[0];
        assert_eq!(query.rates_fetcher, "Okargo");
        assert_eq!(query.origin.code, "PTLEI");
        assert_eq!(query.date_begin, "2024-01-01T00:00:00.000Z");
        assert_eq!(query.date_end, "2024-02-01T00:00:00.000Z");
    }

    #[test]
    fn test_unknown_platform_and_bad_dates_fail_before_sending() {
        let client = OkargoClient::new(&config()).unwrap();

        let mut req = request(&[ProductType::Dry20]);
        req.platform = "9".to_string();
        assert!(matches!(
            client.build_queries(&req),
            Err(RatesError::UnknownPlatform { platform }) if platform == "9"
        ));

        let mut req = request(&[ProductType::Dry20]);
        req.date_end = "soon".to_string();
        assert!(matches!(
            client.build_queries(&req),
            Err(RatesError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_products_means_no_requests() {
        let client = OkargoClient::new(&config().with_endpoint("http://127.0.0.1:9/unused")).unwrap();
        let offers = client.fetch_offers(&request(&[])).await.unwrap();
        assert!(offers.is_empty());
    }
}
