pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod mapping;
pub mod pipeline;
pub mod render;
pub mod report;

pub use config::{Config, Source};
pub use error::{Rdf2RespecError, Result};
pub use graph::{first_in_chain, last_in_chain, resolve, ChainStart, Forest, TripleSet};
pub use mapping::{BoundMapping, RespecMapping};
pub use pipeline::{process_source, process_sources, render_document, CancellationFlag};
pub use report::{RunReport, SourceReport};
