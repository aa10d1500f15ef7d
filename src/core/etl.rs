use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting rate fetch");

        // Extract
        let offers = self.pipeline.extract().await?;
        let carrier_offers: usize = offers.iter().map(|b| b.carrier_offers.len()).sum();
        tracing::info!(
            "Extracted {} carrier offer(s) from {} request(s)",
            carrier_offers,
            offers.len()
        );

        // Transform
        let transformed = self.pipeline.transform(offers).await?;
        tracing::info!("Transformed into {} rate(s)", transformed.rates.len());

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("Output saved to: {} ({:?})", output_path, started.elapsed());

        Ok(output_path)
    }
}
