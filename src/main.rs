use clap::Parser;
use freight_rates::utils::error::ErrorSeverity;
use freight_rates::utils::{logger, validation::Validate};
use freight_rates::{CliArgs, EtlEngine, LocalStorage, RatePipeline, RateService, RatesConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match RatesConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_level(), config.log_format());

    tracing::info!("🚀 Starting freight-rates");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(output_path) = &args.output_path {
        config.output.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let request = args.to_request();
    let service = match RateService::new(&config.okargo) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no request will be sent");
        return perform_dry_run(&service, &request);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = RatePipeline::new(storage, service, config.output.clone(), request);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Rates fetched successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Rate fetch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2, // worth retrying
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn perform_dry_run(
    service: &RateService,
    request: &freight_rates::RateRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let queries = service.client().build_queries(request)?;

    println!("\n📋 Dry run: {} request(s) to {}", queries.len(), service.client().endpoint());
    for (bucket, query) in &queries {
        let products: Vec<_> = bucket.products.iter().map(|p| p.product_type.name()).collect();
        println!("  🚢 {} ({})", bucket.container_type, products.join(", "));
        println!("{}", serde_json::to_string_pretty(query)?);
    }

    Ok(())
}
