//! Source processing: bind, discover, render and write every document of a
//! source, sequentially or on a bounded pool of blocking workers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::Source;
use crate::error::Result;
use crate::graph::{self, TripleSet};
use crate::ingest::{discover_files, output_path, read_triples, write_output, SourceFile};
use crate::mapping::BoundMapping;
use crate::render;
use crate::report::{FileOutcome, FileStatus, SourceReport};

/// Shared stop signal, checked before each document.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A discovered document and the Markdown file it renders to.
#[derive(Debug, Clone)]
pub struct PlannedFile {
    pub file: SourceFile,
    pub output: PathBuf,
    /// Input that claimed `output` first; set when two documents share a stem.
    pub collides_with: Option<String>,
}

/// A source whose mapping is bound and whose documents are discovered.
#[derive(Debug, Clone)]
pub struct PreparedSource {
    pub name: String,
    pub source: Source,
    pub mapping: BoundMapping,
    pub files: Vec<PlannedFile>,
}

/// Bind the mapping, reject unsupported directions, then list input documents
/// with their output paths. The first document in discovery order keeps a
/// contested output path; later ones are marked as colliding.
pub fn prepare_source(source: &Source) -> Result<PreparedSource> {
    let name = source.display_name();
    let mapping = source.respec_mapping.bind()?;
    graph::ensure_supported(mapping.hierarchy.direction)?;
    let discovered = discover_files(
        &source.input_location,
        &source.file_extension,
        &source.ignore_paths_with,
    )?;

    let mut claimed: HashMap<PathBuf, String> = HashMap::new();
    let files = discovered
        .into_iter()
        .map(|file| {
            let output = output_path(&source.output_location, &file.stem);
            let collides_with = match claimed.get(&output) {
                Some(owner) => {
                    log::warn!(
                        "{} and {} both render to {}",
                        owner,
                        file.relative_path,
                        output.display()
                    );
                    Some(owner.clone())
                }
                None => {
                    claimed.insert(output.clone(), file.relative_path.clone());
                    None
                }
            };
            PlannedFile {
                file,
                output,
                collides_with,
            }
        })
        .collect();

    Ok(PreparedSource {
        name,
        source: source.clone(),
        mapping,
        files,
    })
}

/// Build the hierarchy of one triple set and render all of its roots.
pub fn render_document(triples: &TripleSet, mapping: &BoundMapping) -> Result<String> {
    let forest = graph::build(
        triples,
        &mapping.hierarchy.predicates,
        mapping.hierarchy.direction,
    )?;
    Ok(render::render_document(&forest, triples, mapping))
}

fn render_file(planned: &PlannedFile, mapping: &BoundMapping) -> Result<FileOutcome> {
    let triples = read_triples(&planned.file.absolute_path)?;
    let markdown = render_document(&triples, mapping)?;
    let outcome = write_output(&planned.output, &markdown)?;

    Ok(FileOutcome {
        input: planned.file.absolute_path.clone(),
        output: Some(planned.output.clone()),
        status: outcome.into(),
    })
}

fn skipped(file: &SourceFile, status: FileStatus) -> FileOutcome {
    FileOutcome {
        input: file.absolute_path.clone(),
        output: None,
        status,
    }
}

fn failed(file: &SourceFile, message: String) -> FileOutcome {
    skipped(file, FileStatus::Failed { message })
}

/// Render one planned document; `position` is its 1-based index and the
/// source's file count, for progress logging.
fn process_file(
    planned: &PlannedFile,
    position: (usize, usize),
    mapping: &BoundMapping,
    cancel: &CancellationFlag,
) -> FileOutcome {
    let file = &planned.file;
    if cancel.is_cancelled() {
        return skipped(file, FileStatus::Cancelled);
    }

    let (index, total) = position;
    log::info!("[{}/{}] Rendering: {}", index, total, file.relative_path);

    if let Some(owner) = &planned.collides_with {
        let message = format!(
            "output {} is already produced by {}",
            planned.output.display(),
            owner
        );
        log::error!("✗ {}: {}", file.relative_path, message);
        return failed(file, message);
    }

    match render_file(planned, mapping) {
        Ok(outcome) => {
            log::info!("✓ {} ({:?})", file.relative_path, outcome.status);
            outcome
        }
        Err(e) => {
            log::error!("✗ {}: {}", file.relative_path, e);
            failed(file, e.to_string())
        }
    }
}

/// Render every document of `source` one after another.
///
/// A failing document is recorded and its siblings still run. A source that
/// cannot be prepared is reported through [`SourceReport::error`].
pub fn process_source(source: &Source, cancel: &CancellationFlag) -> SourceReport {
    let prepared = match prepare_source(source) {
        Ok(prepared) => prepared,
        Err(e) => {
            log::error!("✗ source {}: {}", source.display_name(), e);
            return SourceReport::failed(source.display_name(), e);
        }
    };

    let total = prepared.files.len();
    let mut report = SourceReport::new(&prepared.name);
    report.files = prepared
        .files
        .iter()
        .enumerate()
        .map(|(idx, planned)| process_file(planned, (idx + 1, total), &prepared.mapping, cancel))
        .collect();
    report
}

/// Render all sources with at most `workers` documents in flight.
///
/// Reports come back in source order, files in discovery order.
pub async fn process_sources(
    sources: &[Source],
    workers: usize,
    cancel: &CancellationFlag,
) -> Vec<SourceReport> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut reports = Vec::with_capacity(sources.len());
    let mut jobs = JoinSet::new();

    for (source_idx, source) in sources.iter().enumerate() {
        let owned = source.clone();
        let prepared = match tokio::task::spawn_blocking(move || prepare_source(&owned)).await {
            Ok(Ok(prepared)) => prepared,
            Ok(Err(e)) => {
                log::error!("✗ source {}: {}", source.display_name(), e);
                reports.push(SourceReport::failed(source.display_name(), e));
                continue;
            }
            Err(e) => {
                log::error!("✗ source {}: discovery task failed: {}", source.display_name(), e);
                reports.push(SourceReport::failed(source.display_name(), e));
                continue;
            }
        };

        let mut report = SourceReport::new(&prepared.name);
        report.files = prepared
            .files
            .iter()
            .map(|planned| failed(&planned.file, "worker did not report".to_string()))
            .collect();
        reports.push(report);

        let mapping = Arc::new(prepared.mapping);
        let total = prepared.files.len();

        for (file_idx, planned) in prepared.files.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let mapping = Arc::clone(&mapping);
            let cancel = cancel.clone();

            jobs.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let input = planned.file.absolute_path.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    process_file(&planned, (file_idx + 1, total), &mapping, &cancel)
                })
                .await
                .unwrap_or_else(|e| FileOutcome {
                    input,
                    output: None,
                    status: FileStatus::Failed {
                        message: format!("worker panicked: {}", e),
                    },
                });
                (source_idx, file_idx, outcome)
            });
        }
    }

    while let Some(joined) = jobs.join_next().await {
        match joined {
            Ok((source_idx, file_idx, outcome)) => {
                reports[source_idx].files[file_idx] = outcome;
            }
            Err(e) => log::error!("Worker task failed: {}", e),
        }
    }

    reports
}

/// All documents of one source rendered as a single Markdown document.
#[derive(Debug, Clone)]
pub struct CombinedDocument {
    pub markdown: String,
    /// Documents left out of `markdown` because they could not be read.
    pub report: SourceReport,
}

/// Render every document of `source` as one combined document.
///
/// Blank nodes are scoped per file so documents never share them. A document
/// that fails to parse is recorded in the report and the rest are still merged.
pub fn render_source_combined(source: &Source) -> Result<CombinedDocument> {
    let prepared = prepare_source(source)?;
    let mut combined = TripleSet::new();
    let mut report = SourceReport::new(&prepared.name);

    for (idx, planned) in prepared.files.iter().enumerate() {
        let file = &planned.file;
        match read_triples(&file.absolute_path) {
            Ok(triples) => combined.merge_scoped(triples, &format!("f{}", idx)),
            Err(e) => {
                log::error!("✗ {}: {}", file.relative_path, e);
                report.files.push(failed(file, e.to_string()));
            }
        }
    }
    log::debug!(
        "Combined {} triples from {} files of {}",
        combined.len(),
        prepared.files.len() - report.files.len(),
        prepared.name
    );

    let markdown = render_document(&combined, &prepared.mapping)?;
    Ok(CombinedDocument { markdown, report })
}
