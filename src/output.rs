use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::record::ListingRecord;

/// Timestamped output path: `<dir>/YYYYmmdd-HHMMSS-<term_with_underscores>.csv`.
pub fn output_file_path(dir: &Path, search_term: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    dir.join(format!("{stamp}-{}.csv", search_term.replace(' ', "_")))
}

/// Write the collected listings as CSV with a single header row.
///
/// Column order is the [`ListingRecord`] field order: name, rating,
/// reviews, phone_number, address, website, google_map_link. An empty
/// collection writes nothing at all (no file is created) and returns
/// `false`.
pub fn write_listings(path: &Path, listings: &[ListingRecord]) -> Result<bool> {
    if listings.is_empty() {
        return Ok(false);
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for listing in listings {
        writer
            .serialize(listing)
            .with_context(|| format!("failed to write row for {:?}", listing.name))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(true)
}
