//! File access seam.
//!
//! `include`, `data`, `grid` and file-driven `for` loops all go through a
//! [`FileSystem`] so that a compilation can run against the real disk
//! ([`OsFileSystem`], the default) or against files held in memory
//! ([`MemoryFileSystem`], used by tests and by embedders that have no
//! filesystem).

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

/// Where the compiler reads and writes named files.
pub trait FileSystem {
    /// Read a whole file.
    fn read_to_string(&self, name: &str) -> io::Result<String>;

    /// Create (or truncate) a file with the given contents.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;
}

/// The process's real filesystem; names are relative to the current
/// directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_to_string(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(name)
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        std::fs::write(name, contents)
    }
}

/// In-memory files.  Clones share the same file table, so a caller can keep
/// a handle and inspect what a compilation wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryFileSystem::insert`].
    pub fn with_file(self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.borrow_mut().insert(name.into(), contents.into());
    }

    /// Current contents of a file.
    pub fn contents(&self, name: &str) -> Option<String> {
        self.files.borrow().get(name).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, name: &str) -> io::Result<String> {
        self.contents(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("open {name}: no such file"))
        })
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        self.insert(name, contents);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
