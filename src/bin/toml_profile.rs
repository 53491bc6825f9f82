use anyhow::Context;
use clap::Parser;
use demand_profile::config::toml_config::{GenerationConfig, TomlConfig};
use demand_profile::core::climate::ClimateResolver;
use demand_profile::core::ConfigProvider;
use demand_profile::domain::model::{Season, INTERVALS_PER_YEAR};
use demand_profile::utils::logger::{self, LogFormat};
use demand_profile::utils::validation::Validate;
use demand_profile::{LocalStorage, ProfileEngine, ProfilePipeline};

#[derive(Parser)]
#[command(name = "toml-profile")]
#[command(about = "Demand profile generator driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "demand-profile.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the EV charging seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Emit JSON log lines
    #[arg(long)]
    log_json: bool,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(args.verbose, format);

    tracing::info!("🚀 Starting TOML-based demand profile generator");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    // 命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.generation = Some(GenerationConfig { seed: Some(seed) });
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ProfilePipeline::new(storage, config);
    let engine = ProfileEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Demand profile generated successfully!");
            println!("✅ Demand profile generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let flags = config.flags();

    println!("📋 Configuration Summary:");
    println!("  Postal code: {}", config.profile.postal_code);
    println!("  Annual usage: {:?}", config.profile.annual_kwh);
    println!(
        "  AC: {}  Heating: {}  WFH: {}  EV: {}",
        flags.has_ac, flags.has_heating, flags.has_wfh, flags.has_ev
    );
    match config.seed() {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: random"),
    }
    println!("  Output: {}", config.output_path());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let climate = ClimateResolver::new().resolve(&config.profile.postal_code);

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("🌡️ Climate:");
    println!("  Zone: {}", climate.zone);
    println!(
        "  Cooling degree days: {}  Heating degree days: {}",
        climate.cooling_degree_days, climate.heating_degree_days
    );
    for season in Season::ALL {
        println!("  {} avg temp: {:.0}°F", season, climate.avg_temp(season));
    }

    println!();
    println!("💾 Output Configuration:");
    println!("  Intervals: {}", INTERVALS_PER_YEAR);
    println!("  CSV: {}/{}", config.output_path(), config.csv_filename());
    if config.write_seasonal_json() {
        println!("  Seasonal chart data: seasonal_profile.json");
    }
    match config.cleanup_max_age() {
        Some(max_age) => println!("  Stale CSV cleanup: older than {}s", max_age.as_secs()),
        None => println!("  Stale CSV cleanup: disabled"),
    }

    println!();
    println!("✅ Dry run completed - configuration looks good!");
}
