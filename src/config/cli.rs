use crate::domain::model::{Port, ProductRequest, RateRequest};
use crate::domain::product::ProductType;
use clap::Parser;

fn parse_product(value: &str) -> Result<ProductType, String> {
    value.parse::<ProductType>().map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Parser)]
#[command(name = "freight-rates")]
#[command(about = "Fetch ocean-freight carrier offers and normalize them into rate records")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "freight-rates.toml")]
    pub config: String,

    /// Origin port UN/LOCODE, e.g. PTLEI
    #[arg(long)]
    pub from: String,

    /// Destination port UN/LOCODE, e.g. BRNVT
    #[arg(long)]
    pub to: String,

    /// Product type, e.g. "20' Dry". Repeat for several products.
    #[arg(long = "product", required = true, value_parser = parse_product)]
    pub products: Vec<ProductType>,

    /// Mark every requested product as dangerous cargo
    #[arg(long)]
    pub dangerous: bool,

    /// Start of the shipping window (YYYY-MM-DD)
    #[arg(long)]
    pub date_begin: String,

    /// End of the shipping window (YYYY-MM-DD)
    #[arg(long)]
    pub date_end: String,

    /// Platform key from [okargo.platforms]
    #[arg(long)]
    pub platform: String,

    /// Override output.output_path from config
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Show the request that would be sent without calling the aggregator
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn to_request(&self) -> RateRequest {
        RateRequest {
            source_port: Port::new(self.from.clone()),
            destination_port: Port::new(self.to.clone()),
            products: self
                .products
                .iter()
                .map(|product_type| ProductRequest {
                    dangerous: self.dangerous,
                    ..ProductRequest::new(*product_type)
                })
                .collect(),
            date_begin: self.date_begin.clone(),
            date_end: self.date_end.clone(),
            platform: self.platform.clone(),
        }
    }
}
