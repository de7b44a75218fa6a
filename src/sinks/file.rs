//! Reopenable file writer

use crate::core::{LogSink, RegistryError, Result, RotatableSink};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File-backed sink that supports in-place descriptor reopen
///
/// The writer always appends to `path`. After external rotation tooling
/// renames the file away, [`reopen`](RotatableSink::reopen) opens a fresh
/// descriptor at the original path and swaps it in under the write lock,
/// so no concurrent `write_line` is ever torn between the two files.
pub struct FileWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileWriter {
    /// Create a writer appending to `path`, creating parent directories
    /// and the file itself as needed
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OpenStream`] if the directory or file
    /// cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RegistryError::open_stream(parent.display().to_string(), e))?;
        }

        let file = Self::open_handle(&path)
            .map_err(|e| RegistryError::open_stream(path.display().to_string(), e))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    fn open_handle(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }
}

impl LogSink for FileWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")
    }

    fn flush(&self) -> io::Result<()> {
        self.file.lock().flush()
    }
}

impl RotatableSink for FileWriter {
    fn reopen(&self) -> io::Result<()> {
        // Open the fresh descriptor before taking the lock so a failure
        // leaves the current handle writable.
        let fresh = Self::open_handle(&self.path)?;
        let mut file = self.file.lock();
        *file = fresh;
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
