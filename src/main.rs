//! Network Connectivity Tester - Main CLI Application
//!
//! Pings every configured host concurrently for a fixed duration and reports
//! per-host latency and loss.

use clap::Parser;
use network_connectivity_tester::{
    app::{check_reachability, App},
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::{AppError, ErrorReporter, Result},
    logging::Logger,
    output::{OutputCoordinator, OutputFormatterFactory},
    PKG_NAME, VERSION,
};
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // A panicking prober is contained by its task; keep the report visible
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue together with the command line used.");
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if cli.should_show_topic_help() {
        print!("{}", cli.display_help());
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    // Handle the actual application logic
    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    // Show debug info if requested
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    // Load and validate configuration
    let config = load_config(cli)?;
    let warnings = validate_config(&config)?;

    if config.debug {
        println!("Configuration Summary:");
        println!("{}", display_config_summary(&config));
        println!();
    }

    if !warnings.is_empty() {
        for warning in &warnings {
            println!("{}", warning.format(config.enable_color));
        }
        println!();
    }

    let output = OutputCoordinator::new(OutputFormatterFactory::create_formatter(
        config.enable_color,
        config.verbose,
    ))
    .with_event_log(config.verbose);
    let logger = Logger::with_config("MAIN", &config);
    let app = App::new(config);

    println!("{}", output.display_start(&app.settings())?);

    // Ctrl+C stops every prober at its next wait point
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let report = app.run(cancel).await?;
    let run = report.run;
    let mut sink_errors = report.sink_errors;

    if run.cancelled {
        println!("\nTest interrupted by user.");
    } else {
        println!("Test complete.");
    }

    sink_errors.extend(app.present(&run).await);
    if !sink_errors.is_empty() {
        let summary = ErrorReporter::new(app.config().enable_color, app.config().verbose)
            .format_error_summary(&sink_errors);
        eprintln!("{}", output.display_warning(&summary)?);
    }

    println!();
    println!("{}", output.display_results(&run)?);

    check_reachability(app.config(), &run, &logger)
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) | AppError::Parse(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (see --help-topic env)");
            eprintln!("  - Duration must be >= 0 and the interval between 0.001 and 86400 seconds");
            eprintln!("  - Probe timeout must be > 0 and at most 60 seconds");
            eprintln!("  - TTL must be between 1 and 255");
        }
        AppError::Network(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Verify that ICMP is not blocked by a firewall");
            eprintln!("  - Make sure the process may open ICMP sockets (see --help-topic permissions)");
        }
        AppError::Io(_) | AppError::LogWrite(_) => {
            eprintln!();
            eprintln!("Result log help:");
            eprintln!("  - Check write permissions for the results directory");
            eprintln!("  - Choose another location with --results-dir or skip it with --nolog");
        }
        _ => {}
    }
}
