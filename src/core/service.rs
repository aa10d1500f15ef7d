use crate::adapters::okargo::OkargoClient;
use crate::config::toml_config::OkargoConfig;
use crate::core::ids::UuidIds;
use crate::core::normalize::RateNormalizer;
use crate::domain::model::{Rate, RateRequest};
use crate::domain::offer::BucketOffers;
use crate::domain::ports::IdGenerator;
use crate::utils::error::Result;

/// Fetch-then-normalize for one request. Holds no state between calls.
pub struct RateService<G: IdGenerator = UuidIds> {
    client: OkargoClient,
    normalizer: RateNormalizer<G>,
}

impl RateService<UuidIds> {
    pub fn new(config: &OkargoConfig) -> Result<Self> {
        Self::with_ids(config, UuidIds)
    }
}

impl<G: IdGenerator> RateService<G> {
    pub fn with_ids(config: &OkargoConfig, ids: G) -> Result<Self> {
        Ok(Self {
            client: OkargoClient::new(config)?,
            normalizer: RateNormalizer::new(ids),
        })
    }

    pub fn client(&self) -> &OkargoClient {
        &self.client
    }

    pub async fn fetch(&self, request: &RateRequest) -> Result<Vec<BucketOffers>> {
        self.client.fetch_offers(request).await
    }

    pub fn normalize(&self, request: &RateRequest, offers: &[BucketOffers]) -> Vec<Rate> {
        self.normalizer
            .normalize(&request.source_port, &request.destination_port, offers)
    }

    pub async fn run(&self, request: &RateRequest) -> Result<Vec<Rate>> {
        let offers = self.fetch(request).await?;
        Ok(self.normalize(request, &offers))
    }
}
