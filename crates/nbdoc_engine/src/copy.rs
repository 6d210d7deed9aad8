use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::persist::{AtomicFileWriter, PersistError};

/// Where the "copy raw text" action sends the unrendered response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CopyTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Persist(#[from] PersistError),
    #[error("copy target {0:?} has no file name")]
    InvalidTarget(PathBuf),
}

/// Copies `text` byte-for-byte to `target`.
pub fn copy_raw_text(target: &CopyTarget, text: &str) -> Result<(), CopyError> {
    match target {
        CopyTarget::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_raw(&mut handle, text)
        }
        CopyTarget::File(path) => {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| CopyError::InvalidTarget(path.clone()))?;
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            AtomicFileWriter::new(dir.to_path_buf()).write(file_name, text)?;
            Ok(())
        }
    }
}

pub(crate) fn write_raw(out: &mut dyn Write, text: &str) -> Result<(), CopyError> {
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
