//! Amalgamation archive extraction.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::core::errors::RecipeError;
use crate::sources::verify::VerifiedArchive;

/// Unpack `archive` into `dest`, dropping the archive's top-level directory
/// (`sqlite-amalgamation-3280000/`). Returns the number of files written.
pub fn extract_archive(archive: &VerifiedArchive, dest: &Path) -> Result<usize, RecipeError> {
    let fail = |message: String| RecipeError::Extract {
        dest: dest.to_path_buf(),
        message,
    };

    let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes()))
        .map_err(|e| fail(format!("failed to open zip: {}", e)))?;

    fs::create_dir_all(dest).map_err(|e| fail(e.to_string()))?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| fail(format!("failed to read zip entry {}: {}", i, e)))?;

        let name = entry
            .enclosed_name()
            .ok_or_else(|| fail(format!("unsafe zip entry name `{}`", entry.name())))?;

        let stripped: PathBuf = name.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let dest_path = dest.join(&stripped);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| fail(e.to_string()))?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
        }

        let mut outfile = File::create(&dest_path)
            .map_err(|e| fail(format!("{}: {}", dest_path.display(), e)))?;
        std::io::copy(&mut entry, &mut outfile)
            .map_err(|e| fail(format!("{}: {}", dest_path.display(), e)))?;
        written += 1;
    }

    tracing::debug!(
        "extracted {} files from {} into {}",
        written,
        archive.reference().identifier,
        dest.display()
    );

    Ok(written)
}
