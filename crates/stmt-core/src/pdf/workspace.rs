//! Scoped temporary directory for materialized pages.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};
use tracing::debug;

use crate::models::config::{PageStorage, WorkspaceConfig};

/// A per-document temp directory, removed when closed or dropped.
///
/// Every document run gets its own workspace; nothing is shared between
/// concurrent runs.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    storage: PageStorage,
}

impl Workspace {
    /// Create a fresh workspace following `config`.
    pub fn acquire(config: &WorkspaceConfig) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.prefix);

        let dir = match &config.temp_root {
            Some(root) => {
                fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };

        debug!("Acquired page workspace at {}", dir.path().display());

        Ok(Self {
            dir,
            storage: config.storage,
        })
    }

    /// Workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Page materialization policy.
    pub fn storage(&self) -> PageStorage {
        self.storage
    }

    /// New temp file for a page, inside the workspace.
    pub fn page_file(&self, page: u32) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&format!("page-{:04}-", page))
            .suffix(".pdf")
            .tempfile_in(self.dir.path())
    }

    /// Remove the workspace, reporting removal errors.
    pub fn close(self) -> io::Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Released page workspace at {}", path.display());
        Ok(())
    }
}
