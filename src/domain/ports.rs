use crate::domain::model::TransformResult;
use crate::domain::offer::BucketOffers;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of the opaque ids stamped on rates, products, fields and sections.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BucketOffers>>;
    async fn transform(&self, data: Vec<BucketOffers>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
