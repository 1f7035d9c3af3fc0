use clap::Parser;
use rdf2respec::ingest::read_triples;
use rdf2respec::{graph, Config};
use std::path::PathBuf;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "respec-tree")]
#[command(about = "Print the section hierarchy a mapping builds from one graph document")]
struct Args {
    /// Turtle or N-Triples document
    file: PathBuf,

    /// Config file (defaults to $RDF2RESPEC_CONFIG, then ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source whose mapping is used (defaults to the first one)
    #[arg(short, long)]
    source: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "warn")
    ).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let sources = config.sources()?;
    let source = match &args.source {
        Some(name) => sources.iter().find(|s| &s.display_name() == name),
        None => sources.first(),
    }
    .context("No matching source in sources file")?;

    let mapping = source.respec_mapping.bind()?;
    let triples = read_triples(&args.file)?;
    let forest = graph::build(&triples, &mapping.hierarchy.predicates, mapping.hierarchy.direction)?;

    println!("{} nodes, {} roots", forest.len(), forest.roots().count());
    print!("{}", forest.render_tree());

    Ok(())
}
