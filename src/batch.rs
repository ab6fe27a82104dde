use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::db::Store;
use crate::error::InputError;
use crate::model::{NormalizedRecord, RawRecord};
use crate::parser::{self, ExtractOptions};

const CHUNK_SIZE: usize = 500;
const BOM: char = '\u{feff}';

// ── Input / output ──

/// Reads a JSON document (usually a record array), tolerating a leading
/// byte-order mark.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let body = text.strip_prefix(BOM).unwrap_or(&text);
    serde_json::from_str(body).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    // The target is only ever replaced whole, by renaming a sibling temp file.
    let file_name = path
        .file_name()
        .with_context(|| format!("output path {} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = std::fs::write(&tmp, json)
        .with_context(|| format!("writing {}", tmp.display()))
        .and_then(|()| {
            std::fs::rename(&tmp, path)
                .with_context(|| format!("replacing {}", path.display()))
        });
    if written.is_err() {
        std::fs::remove_file(&tmp).ok();
    }
    written
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

// ── Normalize ──

pub struct NormalizeStats {
    pub total: usize,
    /// Records where every key field came out empty.
    pub sparse: usize,
}

/// Normalizes every record, preserving input order.
pub fn normalize_records(
    raws: &[RawRecord],
    opts: &ExtractOptions,
) -> Result<(Vec<NormalizedRecord>, NormalizeStats)> {
    let pb = progress_bar(raws.len())?;
    let mut records = Vec::with_capacity(raws.len());

    for chunk in raws.chunks(CHUNK_SIZE) {
        let normalized: Vec<_> = chunk
            .par_iter()
            .map(|raw| parser::normalize_record(raw, opts))
            .collect();
        records.extend(normalized);
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let mut sparse = 0;
    for record in &records {
        if parser::is_sparse(record) {
            sparse += 1;
            warn!(project = %display_name(record), "no key fields could be extracted");
        }
    }

    let stats = NormalizeStats {
        total: records.len(),
        sparse,
    };
    Ok((records, stats))
}

/// Raw file → normalized file. Nothing is written unless the whole input
/// parses.
pub fn normalize_file(
    input: &Path,
    output: &Path,
    opts: &ExtractOptions,
) -> Result<(Vec<NormalizedRecord>, NormalizeStats)> {
    let raws: Vec<RawRecord> = read_json(input)?;
    info!(records = raws.len(), input = %input.display(), "loaded raw records");

    let (records, stats) = normalize_records(&raws, opts)?;
    write_json_pretty(output, &records)?;
    info!(output = %output.display(), "wrote normalized records");
    Ok((records, stats))
}

// ── Import ──

/// Where imported projects go. `Store` is the real one.
pub trait ProjectSink {
    /// Exact match on the project name.
    fn contains(&self, project_name: &str) -> Result<bool>;
    fn insert(&self, record: &NormalizedRecord) -> Result<String>;
}

impl ProjectSink for Store {
    fn contains(&self, project_name: &str) -> Result<bool> {
        self.project_exists(project_name)
    }

    fn insert(&self, record: &NormalizedRecord) -> Result<String> {
        self.insert_project(record)
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub total: usize,
    pub imported: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl ImportStats {
    pub fn print(&self) {
        println!(
            "Imported {} | errors {} | skipped {} (of {}).",
            self.imported, self.errors, self.skipped, self.total
        );
    }
}

/// Imports records one at a time. Records whose name is already stored are
/// skipped; a failure on one record is logged and counted, never fatal.
pub fn import_records(sink: &impl ProjectSink, records: &[NormalizedRecord]) -> Result<ImportStats> {
    let pb = progress_bar(records.len())?;
    let mut stats = ImportStats {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        let name = display_name(record);
        match sink.contains(&record.project_name) {
            Ok(true) => {
                pb.suspend(|| println!("  = {} (already stored)", name));
                pb.inc(1);
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                stats.errors += 1;
                error!(project = %name, "duplicate check failed: {:#}", e);
                pb.inc(1);
                continue;
            }
        }

        match sink.insert(record) {
            Ok(id) => {
                stats.imported += 1;
                pb.suspend(|| println!("  + {} ({})", name, id));
            }
            Err(e) => {
                stats.errors += 1;
                error!(project = %name, "insert failed: {:#}", e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    stats.skipped = stats.total - stats.imported - stats.errors;
    info!(
        imported = stats.imported,
        errors = stats.errors,
        skipped = stats.skipped,
        "import finished"
    );
    Ok(stats)
}

fn display_name(record: &NormalizedRecord) -> &str {
    if record.project_name.is_empty() {
        "(unnamed)"
    } else {
        &record.project_name
    }
}

// ── Tests ──
