pub mod walker;
pub mod rdf;
pub mod writer;

pub use walker::{SourceFile, discover_files};
pub use rdf::{GraphFormat, parse_graph, parse_turtle, read_triples};
pub use writer::{WriteOutcome, content_hash, output_path, write_output};
