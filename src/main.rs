use clap::Parser;
use order_bridge::config::toml_config::{ConversionConfig, ResolvedConfig};
use order_bridge::utils::{logger, validation::Validate};
use order_bridge::{CliConfig, ConversionPipeline, EtlEngine, EtlError, LocalStorage};

#[tokio::main]
async fn main() {
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting order-bridge");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: CliConfig) -> Result<(), EtlError> {
    args.validate()?;

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            ConversionConfig::from_file(path)?
        }
        None => ConversionConfig::default(),
    };

    if let Some(output_path) = &args.output_path {
        config.load.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    tracing::info!(
        "📋 Conversion: {} - {}",
        config.conversion.name,
        config.conversion.description
    );
    let conversion_name = config.conversion.name.clone();

    let storage = LocalStorage::new(".".to_string());
    let pipeline = ConversionPipeline::new(storage, ResolvedConfig::new(config), args.job());
    let engine = EtlEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no file will be written");
        let conversion = engine.preview().await?;
        println!("📋 Dry run summary for {}:", conversion_name);
        println!("  Target: {}", conversion.shape);
        println!("  Lines read: {}", conversion.stats.lines_read);
        println!("  Rows to write: {}", conversion.stats.rows_emitted);
        println!("  Advisories: {}", conversion.advisories.len());
        if let Some(services) = &conversion.services {
            for service in services {
                println!("  {} -> {} ({})", service.order_id, service.code, service.tier.name());
            }
        }
        return Ok(());
    }

    let output_path = engine.run().await?;
    println!("✅ Conversion completed successfully!");
    println!("📁 Output saved to: {}", output_path);
    Ok(())
}
