use crate::config::toml_config::OutputConfig;
use crate::core::service::RateService;
use crate::core::summary::RateSummary;
use crate::domain::model::{Rate, RateRequest, RateType, TransformResult};
use crate::domain::offer::BucketOffers;
use crate::domain::ports::{IdGenerator, Pipeline, Storage};
use crate::utils::error::{RatesError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Flat, spreadsheet-friendly view of one rate.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    carrier: &'a str,
    carrier_code: &'a str,
    product: &'a str,
    rate_type: &'a str,
    valid_from: &'a str,
    valid_until: &'a str,
    transit_time: String,
    etd: &'a str,
    eta: &'a str,
    transshipment: &'a str,
    available: Option<bool>,
    containers_left: Option<i64>,
    vessel: String,
    totals: String,
}

fn format_totals(rate: &Rate) -> String {
    rate.totals_by_currency()
        .iter()
        .map(|(currency, amount)| format!("{} {:.2}", currency, amount))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn rates_to_csv(rates: &[Rate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for rate in rates {
        let summary = RateSummary::from_rate(rate, 0, 0)?;
        let first_date = rate.offer.transit_dates.first();
        writer.serialize(CsvRow {
            id: &rate.id,
            carrier: rate.supplier.organization.as_deref().unwrap_or(""),
            carrier_code: rate.supplier.unique_id.as_deref().unwrap_or(""),
            product: rate.product.product_type.name(),
            rate_type: match rate.rate_type {
                Some(RateType::Contract) => "contract",
                Some(RateType::Spot) => "spot",
                None => "",
            },
            valid_from: rate.offer.valid_from.as_deref().unwrap_or(""),
            valid_until: rate.offer.valid_until.as_deref().unwrap_or(""),
            transit_time: match &rate.offer.transit_time {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
            etd: first_date.map(|d| d.etd.as_str()).unwrap_or(""),
            eta: first_date.map(|d| d.eta.as_str()).unwrap_or(""),
            transshipment: &rate.offer.transshipment,
            available: rate.offer.availability.as_ref().map(|a| a.available),
            containers_left: rate.offer.availability.as_ref().and_then(|a| a.count),
            vessel: summary.vessel.map(|v| v.name).unwrap_or_default(),
            totals: format_totals(rate),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RatesError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| RatesError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub struct RatePipeline<S: Storage, G: IdGenerator> {
    storage: S,
    service: RateService<G>,
    output: OutputConfig,
    request: RateRequest,
}

impl<S: Storage, G: IdGenerator> RatePipeline<S, G> {
    pub fn new(storage: S, service: RateService<G>, output: OutputConfig, request: RateRequest) -> Self {
        Self {
            storage,
            service,
            output,
            request,
        }
    }

    fn output_location(&self, file: &str) -> String {
        Path::new(&self.output.output_path)
            .join(file)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, G: IdGenerator> Pipeline for RatePipeline<S, G> {
    async fn extract(&self) -> Result<Vec<BucketOffers>> {
        self.service.fetch(&self.request).await
    }

    async fn transform(&self, data: Vec<BucketOffers>) -> Result<TransformResult> {
        let rates = self.service.normalize(&self.request, &data);

        let json_output = if self.output.wants("json") {
            Some(serde_json::to_string_pretty(&rates)?)
        } else {
            None
        };

        let csv_output = if self.output.wants("csv") {
            Some(rates_to_csv(&rates)?)
        } else {
            None
        };

        Ok(TransformResult {
            rates,
            json_output,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut files: Vec<(&str, Vec<u8>)> = Vec::new();
        if let Some(json) = result.json_output {
            files.push((self.output.json_filename(), json.into_bytes()));
        }
        if let Some(csv) = result.csv_output {
            files.push((self.output.csv_filename(), csv.into_bytes()));
        }

        if files.is_empty() {
            return Err(RatesError::ConfigError {
                message: "no output format selected".to_string(),
            });
        }

        if let Some(zip_name) = self.output.zip_filename() {
            tracing::debug!("Creating ZIP file with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file(*name, SimpleFileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(zip_name, &zip_data).await?;
            return Ok(self.output_location(zip_name));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        Ok(self.output_location(files[0].0))
    }
}
