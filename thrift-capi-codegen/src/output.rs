//! Generated artifacts and content-based conditional writing.

use crate::error::CodegenError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Banner opening every generated file.
pub const AUTOGEN_BANNER: &str = concat!(
    "/**\n",
    " * Autogenerated by thrift-capi ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    " *\n",
    " * DO NOT EDIT UNLESS YOU ARE SURE THAT YOU KNOW WHAT YOU ARE DOING\n",
    " *  @generated\n",
    " */\n",
    "\n",
);

/// Result of writing one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The file did not exist.
    Created,
    /// The file existed with different content.
    Updated,
    /// The file already had this content and was left untouched.
    Unchanged,
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// File name relative to the output directory.
    pub name: String,
    /// Full file contents.
    pub contents: String,
}

impl OutputFile {
    /// Creates an output file.
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Returns true if `dir` already holds this exact content.
    ///
    /// # Errors
    /// Returns an IO error other than "not found".
    pub fn is_current(&self, dir: &Path) -> io::Result<bool> {
        match fs::read(dir.join(&self.name)) {
            Ok(existing) => Ok(existing == self.contents.as_bytes()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Writes the file into `dir` unless it already has this content.
    ///
    /// # Errors
    /// Returns an IO error if reading or writing fails.
    pub fn write_if_changed(&self, dir: &Path) -> io::Result<WriteStatus> {
        let path = dir.join(&self.name);
        let status = match fs::read(&path) {
            Ok(existing) if existing == self.contents.as_bytes() => {
                return Ok(WriteStatus::Unchanged);
            }
            Ok(_) => WriteStatus::Updated,
            Err(e) if e.kind() == io::ErrorKind::NotFound => WriteStatus::Created,
            Err(e) => return Err(e),
        };
        fs::write(&path, &self.contents)?;
        Ok(status)
    }
}

/// The three artifacts of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// `extern "C"` header.
    pub header: OutputFile,
    /// C++ bridge source.
    pub source: OutputFile,
    /// C# interop wrapper.
    pub bridge: OutputFile,
}

impl GeneratedFiles {
    /// All artifacts in header, source, bridge order.
    #[must_use]
    pub fn files(&self) -> [&OutputFile; 3] {
        [&self.header, &self.source, &self.bridge]
    }

    /// Writes every artifact into `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the directory or a file cannot be
    /// written.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<(PathBuf, WriteStatus)>, CodegenError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(3);
        for file in self.files() {
            let status = file.write_if_changed(dir)?;
            let path = dir.join(&file.name);
            if status == WriteStatus::Unchanged {
                tracing::info!(path = %path.display(), "artifact unchanged");
            } else {
                tracing::info!(path = %path.display(), %status, "artifact written");
            }
            written.push((path, status));
        }
        Ok(written)
    }

    /// Artifacts whose content differs from what is in `dir`.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if an existing file cannot be read.
    pub fn stale_files(&self, dir: &Path) -> Result<Vec<&OutputFile>, CodegenError> {
        let mut stale = Vec::new();
        for file in self.files() {
            if !file.is_current(dir)? {
                stale.push(file);
            }
        }
        Ok(stale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_if_changed_statuses() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = OutputFile::new("demo_api.h", "int x;\n");

        assert_eq!(file.write_if_changed(dir.path()).expect("write"), WriteStatus::Created);
        assert_eq!(file.write_if_changed(dir.path()).expect("write"), WriteStatus::Unchanged);

        let changed = OutputFile::new("demo_api.h", "int y;\n");
        assert_eq!(changed.write_if_changed(dir.path()).expect("write"), WriteStatus::Updated);
        let on_disk = fs::read_to_string(dir.path().join("demo_api.h")).expect("read");
        assert_eq!(on_disk, "int y;\n");
    }

    #[test]
    fn test_is_current() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = OutputFile::new("a.cs", "class A {}\n");
        assert!(!file.is_current(dir.path()).expect("check"));
        file.write_if_changed(dir.path()).expect("write");
        assert!(file.is_current(dir.path()).expect("check"));
    }

    #[test]
    fn test_banner() {
        assert!(AUTOGEN_BANNER.starts_with("/**\n * Autogenerated by thrift-capi "));
        assert!(AUTOGEN_BANNER.contains("@generated"));
    }
}
