use anyhow::Context;
use clap::Parser;
use subway_sections::app::render;
use subway_sections::utils::error::ErrorSeverity;
use subway_sections::utils::{logger, validation::Validate};
use subway_sections::{CliConfig, NetworkConfig, NetworkRunner, SubwayError};

fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚇 Starting subway-sections");
    tracing::info!("📁 Loading network from: {}", args.config);

    let mut config = NetworkConfig::from_file(&args.config)
        .with_context(|| format!("failed to load network file '{}'", args.config))?;
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Network validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Loaded '{}': {} stations, {} lines, {} operations",
        config.network.name,
        config.stations.len(),
        config.lines.len(),
        config.operations.len()
    );

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be replayed");
        println!("Network: {}", config.network.name);
        if let Some(description) = &config.network.description {
            println!("  {}", description);
        }
        for line in &config.lines {
            println!(
                "  line '{}' {} -> {} ({})",
                line.name, line.up_station, line.down_station, line.distance
            );
        }
        println!("  {} operation(s) queued", config.operations.len());
        return Ok(());
    }

    if let Err(e) = run(&config) {
        tracing::error!(
            "❌ Replay failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run(config: &NetworkConfig) -> Result<(), SubwayError> {
    let mut runner = NetworkRunner::from_config(config)?;
    let report = runner.run(config)?;
    let rendered = render(&report, config.output_format())?;

    match config.output_path() {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!("📁 Report saved to: {}", path);
        }
        None => print!("{}", rendered),
    }

    if report.failures() > 0 {
        tracing::warn!("⚠️ {} step(s) were rejected", report.failures());
    }
    Ok(())
}
