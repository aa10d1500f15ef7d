pub mod etl;
pub mod ids;
pub mod normalize;
pub mod rate_pipeline;
pub mod service;
pub mod summary;

pub use crate::domain::model::{Rate, RateRequest, TransformResult};
pub use crate::domain::ports::{IdGenerator, Pipeline, Storage};
pub use crate::utils::error::Result;
