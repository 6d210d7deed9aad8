use std::path::{Path, PathBuf};

pub const ACCEPTED_EXTENSION: &str = ".ipynb";

/// Opaque reference to a file the user picked. Only the engine looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle(PathBuf);

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub handle: FileHandle,
}

impl SelectedFile {
    /// Builds a selection entry named after the last path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            handle: FileHandle(path),
        }
    }
}

/// Text of one notebook, decoded for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub name: String,
    pub text: String,
}

pub fn is_accepted_name(name: &str) -> bool {
    let ext_len = ACCEPTED_EXTENSION.len();
    name.len() > ext_len
        && name.is_char_boundary(name.len() - ext_len)
        && name[name.len() - ext_len..].eq_ignore_ascii_case(ACCEPTED_EXTENSION)
}

/// Keeps accepted candidates in their original order.
pub fn filter_accepted(candidates: Vec<SelectedFile>) -> Vec<SelectedFile> {
    candidates
        .into_iter()
        .filter(|file| is_accepted_name(&file.name))
        .collect()
}
