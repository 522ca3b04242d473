//! Persist a [`Dataset`] as JSON and as one plain-text file per record.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use fomc_shared::{CollectionType, Dataset, FomcError, Result};

/// Write the dataset to `{base_dir}/{collection}.json`.
pub fn write_json(dataset: &Dataset, base_dir: &Path, collection: CollectionType) -> Result<PathBuf> {
    std::fs::create_dir_all(base_dir).map_err(|e| FomcError::io(base_dir, e))?;

    let path = base_dir.join(format!("{collection}.json"));
    let json = serde_json::to_string_pretty(dataset)
        .map_err(|e| FomcError::parse(format!("failed to serialize {collection}: {e}")))?;
    std::fs::write(&path, json).map_err(|e| FomcError::io(&path, e))?;

    info!(path = %path.display(), records = dataset.len(), "dataset written");
    Ok(path)
}

/// Write each record's text to
/// `{base_dir}/{collection}/FOMC_{collection}_{yyyy-mm-dd}.txt`.
///
/// The dataset is date-sorted, so records sharing a date are adjacent; the
/// second and later ones get `-2`, `-3`, ... suffixes.
pub fn write_texts(
    dataset: &Dataset,
    base_dir: &Path,
    collection: CollectionType,
) -> Result<Vec<PathBuf>> {
    let dir = base_dir.join(collection.as_str());
    std::fs::create_dir_all(&dir).map_err(|e| FomcError::io(&dir, e))?;

    let mut written = Vec::with_capacity(dataset.len());
    let mut previous: Option<NaiveDate> = None;
    let mut seq = 1;

    for record in dataset {
        seq = if previous == Some(record.date) { seq + 1 } else { 1 };
        previous = Some(record.date);

        let path = dir.join(text_file_name(collection, record.date, seq));
        std::fs::write(&path, &record.text).map_err(|e| FomcError::io(&path, e))?;
        debug!(path = %path.display(), "text written");
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "texts written");
    Ok(written)
}

fn text_file_name(collection: CollectionType, date: NaiveDate, seq: usize) -> String {
    let date = date.format("%Y-%m-%d");
    if seq == 1 {
        format!("FOMC_{collection}_{date}.txt")
    } else {
        format!("FOMC_{collection}_{date}-{seq}.txt")
    }
}
