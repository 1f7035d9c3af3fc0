use clap::Parser;
use rdf2respec::pipeline::{process_sources, render_source_combined, CancellationFlag};
use rdf2respec::{Config, RunReport, Source, SourceReport};
use std::path::PathBuf;
use std::time::Instant;
use anyhow::Result;

#[derive(Parser, Debug)]
#[command(name = "rdf2respec")]
#[command(about = "Render RDF knowledge graphs as hierarchical ReSpec Markdown", version)]
struct Args {
    /// Config file (defaults to $RDF2RESPEC_CONFIG, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only process the source with this name
    #[arg(short, long)]
    source: Option<String>,

    /// Print one combined document per source instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => {
            let _ = dotenv::dotenv();
            Config::load_from(path)
        }
        None => Config::load(),
    }
}

fn select_sources(config: &Config, filter: Option<&str>) -> Result<Vec<Source>> {
    let sources = config.sources()?;
    let Some(name) = filter else {
        return Ok(sources);
    };

    let selected: Vec<Source> = sources
        .into_iter()
        .filter(|s| s.display_name() == name)
        .collect();
    if selected.is_empty() {
        anyhow::bail!(
            "No source named '{}' in {}",
            name,
            config.sources_file().display()
        );
    }
    Ok(selected)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.log_level())
    ).init();

    log::info!("Starting rdf2respec v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Sources file: {}", config.sources_file().display());

    let sources = select_sources(&config, args.source.as_deref())?;
    if sources.is_empty() {
        log::warn!("No sources configured. Check sources_file in config.toml.");
        return Ok(());
    }

    let start = Instant::now();
    let reports = if args.stdout {
        print_combined(&sources)
    } else {
        render_all(&sources, config.workers()).await
    };
    let elapsed = start.elapsed();

    log::info!("=== Rendering Complete ===");
    for report in &reports {
        match &report.error {
            Some(error) => log::error!("{}: failed: {}", report.source, error),
            None => log::info!(
                "{}: written {}, unchanged {}, failed {}, cancelled {}",
                report.source,
                report.written(),
                report.unchanged(),
                report.failed_files(),
                report.cancelled()
            ),
        }
    }
    log::info!("Time: {:?}", elapsed);

    let run = RunReport::new(reports);
    if let Some(path) = &args.report {
        run.write(path)?;
    }

    if !run.is_success() {
        anyhow::bail!("Some sources or documents failed. Check logs above for details.");
    }

    Ok(())
}

/// Print one combined document per source; a failing source does not stop the others.
fn print_combined(sources: &[Source]) -> Vec<SourceReport> {
    sources
        .iter()
        .map(|source| match render_source_combined(source) {
            Ok(combined) => {
                println!("{}", combined.markdown);
                combined.report
            }
            Err(e) => {
                log::error!("✗ source {}: {}", source.display_name(), e);
                SourceReport::failed(source.display_name(), e)
            }
        })
        .collect()
}

async fn render_all(sources: &[Source], workers: usize) -> Vec<SourceReport> {
    let cancel = CancellationFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted; finishing in-flight documents");
                cancel.cancel();
            }
        });
    }

    log::info!("Processing {} source(s) with {} worker(s)", sources.len(), workers);
    process_sources(sources, workers, &cancel).await
}
