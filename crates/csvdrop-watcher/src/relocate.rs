//! Archive naming and crash-safe relocation
//!
//! Destination names carry a second-resolution timestamp plus the processed
//! marker between stem and extension. Moves create missing destination
//! directories, try an atomic rename first, and fall back to
//! copy-then-delete-source across filesystem boundaries.

use chrono::{DateTime, Local};
use csvdrop_common::{CsvDropError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix on the archived copy of the original file
pub const ORIG_SUFFIX: &str = ".orig";

/// Suffix on the temporary processed output before its final rename
pub const TEMP_SUFFIX: &str = ".tmp";

/// Insert a timestamp and the marker token before the extension
///
/// `data.csv` with the default marker becomes
/// `data_20260828_143501.processed.csv`. Timestamps are whole seconds;
/// same-second collisions are handled by [`unique_destination`].
pub fn timestamped_name(original: &str, marker: &str, when: DateTime<Local>) -> String {
    let (stem, ext) = split_name(original);
    format!("{}_{}{}{}", stem, when.format("%Y%m%d_%H%M%S"), marker, ext)
}

/// Resolve `dir/name`, disambiguating when that destination is taken
///
/// Two files sharing a stem detected within the same clock second would
/// otherwise collide; the loser gets a `stem-N.ext` variant instead of
/// overwriting the winner. A destination counts as taken when the
/// canonical path or either of its companion files ([`ORIG_SUFFIX`],
/// [`TEMP_SUFFIX`]) exists — an empty input leaves only the `.orig`
/// behind, and that alone must reserve the name.
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !destination_taken(&candidate) {
        return candidate;
    }

    let (stem, ext) = split_name(name);
    let mut n = 1u32;
    loop {
        let alternate = dir.join(format!("{}-{}{}", stem, n, ext));
        if !destination_taken(&alternate) {
            return alternate;
        }
        n += 1;
    }
}

fn destination_taken(candidate: &Path) -> bool {
    candidate.exists()
        || path_with_suffix(candidate, ORIG_SUFFIX).exists()
        || path_with_suffix(candidate, TEMP_SUFFIX).exists()
}

/// Append a raw suffix to the full path string (`a.csv` + `.tmp` -> `a.csv.tmp`)
pub fn path_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

/// Move `src` to `dst`, creating missing destination directories
///
/// Rename is attempted first so same-volume moves stay atomic. When rename
/// fails the contents are copied and the source removed, so the move also
/// succeeds across volume boundaries. Fails with
/// [`CsvDropError::Relocation`] when the source vanished or the destination
/// is unwritable.
pub fn safe_move(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| CsvDropError::relocation(src, dst, e))?;
    }

    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    // Cross-device fallback. The destination only becomes authoritative
    // once the source is gone.
    fs::copy(src, dst).map_err(|e| CsvDropError::relocation(src, dst, e))?;
    fs::remove_file(src).map_err(|e| CsvDropError::relocation(src, dst, e))?;
    Ok(())
}

/// Split a filename into stem and extension, keeping the dot on the
/// extension (`archive.tar.gz` -> `("archive.tar", ".gz")`).
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
