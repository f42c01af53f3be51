use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::FileError;

/// Moves a verified remux output over the original video.
///
/// The output must exist and be non-empty. The swap is one `rename` within the
/// same directory, so at every point either the old or the new video is at
/// `original`. On any error the output is deleted and the original is left
/// alone.
pub fn replace_with_output(original: &Path, output: &Path) -> Result<(), FileError> {
    let usable = match fs::metadata(output) {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            remove_if_exists(output);
            return Err(e.into());
        }
    };

    if !usable {
        remove_if_exists(output);
        return Err(FileError::InvalidOutput {
            path: output.to_path_buf(),
        });
    }

    if let Err(e) = fs::rename(output, original) {
        remove_if_exists(output);
        return Err(e.into());
    }
    Ok(())
}

/// Best-effort cleanup of a scratch file.
pub fn remove_if_exists(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed \"{}\"", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove \"{}\": {e}", path.display()),
    }
}
