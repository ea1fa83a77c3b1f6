// 💾 Archive I/O - load the saved receipt file, write the merged one

use crate::record::Record;
use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Load a JSON array of receipts
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open receipt file {}", path.display()))?;
    let records: Vec<Record> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse receipt file {}", path.display()))?;

    info!("Loaded {} existing receipts from {}", records.len(), path.display());
    Ok(records)
}

/// Write receipts as a pretty-printed JSON array (two-space indent).
///
/// Written to a temp file next to `path` and renamed over it, so a failed
/// write never leaves a truncated archive behind.
pub fn save_records(path: &Path, records: &[Record]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(&mut tmp);
        serde_json::to_writer_pretty(&mut writer, records)
            .context("Failed to serialize receipts")?;
        writer.flush().context("Failed to write output file")?;
    }
    tmp.as_file()
        .sync_all()
        .context("Failed to sync output file")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace output file {}", path.display()))?;

    info!("Saved {} receipts to {}", records.len(), path.display());
    Ok(())
}

/// Output file name for a set of receipts.
///
/// One member → `<prefix>_<member>.json`, several → `<prefix>_<n>-Members.json`,
/// none known → `<prefix>.json`.
pub fn suggested_filename(prefix: &str, records: &[Record]) -> String {
    let owners: BTreeSet<&str> = records.iter().filter_map(Record::owner_id).collect();

    match owners.len() {
        0 => format!("{prefix}.json"),
        1 => format!("{prefix}_{}.json", owners.iter().next().copied().unwrap_or_default()),
        n => format!("{prefix}_{n}-Members.json"),
    }
}
