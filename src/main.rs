use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cmor_var_counts::cli::{Args, OutputFormat, setup_logging};
use cmor_var_counts::config::CensusConfig;
use cmor_var_counts::models::CensusReport;
use cmor_var_counts::processor::{CensusProcessor, report};
use std::io::{self, Write};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    setup_logging(&args);

    // Create async runtime and run the census with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Set up graceful shutdown handling
        tokio::select! {
            result = run(&args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow!("Census interrupted by user"))
            }
        }
    });

    match result {
        // Some tables could not be counted; the report lists them
        Ok(census) if census.files_failed() > 0 => process::exit(2),
        Ok(_) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: &Args) -> Result<CensusReport> {
    // Config file first, then command-line overrides
    let config = CensusConfig::load_layered(args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply_to(config).context("Invalid configuration")?;

    if config.eras.is_empty() {
        bail!("No eras to process. Pass ID=GLOB arguments, --base-dir, or an eras list in the config file");
    }

    // Census every era, then write the report to stdout
    let processor = CensusProcessor::new(config)?.with_progress(args.show_progress());
    let census = processor.process_all().await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => {
            report::write_census(&mut out, &census)?;
            report::write_summary(&mut out, &census)?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", report::render_json(&census)?)?;
        }
    }

    Ok(census)
}
