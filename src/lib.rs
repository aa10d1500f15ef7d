pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{LocalStorage, OkargoClient};
pub use config::{OkargoConfig, OutputConfig, RatesConfig};
pub use crate::core::{
    etl::EtlEngine,
    ids::{SequentialIds, UuidIds},
    normalize::RateNormalizer,
    rate_pipeline::RatePipeline,
    service::RateService,
    summary::{schedule, RateSummary},
};
pub use domain::model::{Port, ProductRequest, Rate, RateRequest};
pub use domain::product::ProductType;
pub use utils::error::{RatesError, Result};
