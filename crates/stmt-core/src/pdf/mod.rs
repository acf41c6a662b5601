//! PDF page splitting module.

mod splitter;
mod workspace;

#[cfg(test)]
pub(crate) mod fixtures;

pub use splitter::LopdfSplitter;
pub use workspace::Workspace;

use std::borrow::Cow;
use std::path::Path;

use tempfile::TempPath;

use crate::error::DocumentError;

/// Result type for page splitting.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Trait for page splitting implementations.
pub trait PageSplitter: Send + Sync {
    /// Split a document into one self-contained unit per page, in order.
    ///
    /// Units materialized on disk live inside `workspace`. A document that
    /// parses but has no pages yields an empty list.
    fn split(&self, document: &[u8], workspace: &Workspace) -> Result<Vec<PageUnit>>;
}

/// One page of a source document, independently submittable.
///
/// Dropping a disk-backed unit deletes its file.
#[derive(Debug)]
pub struct PageUnit {
    number: u32,
    content: PageContent,
}

/// Where a page's bytes live.
#[derive(Debug)]
pub enum PageContent {
    /// Buffered in memory.
    Memory(Vec<u8>),
    /// A temp file removed on drop.
    File(TempPath),
}

impl PageUnit {
    /// Page held in memory.
    pub fn in_memory(number: u32, data: Vec<u8>) -> Self {
        Self {
            number,
            content: PageContent::Memory(data),
        }
    }

    /// Page stored in a temp file.
    pub fn on_disk(number: u32, path: TempPath) -> Self {
        Self {
            number,
            content: PageContent::File(path),
        }
    }

    /// Page number (1-indexed) within the source document.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Backing file, for disk-backed pages.
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            PageContent::File(path) => Some(&**path),
            PageContent::Memory(_) => None,
        }
    }

    /// Page content bytes.
    pub fn read(&self) -> std::io::Result<Cow<'_, [u8]>> {
        match &self.content {
            PageContent::Memory(data) => Ok(Cow::Borrowed(data.as_slice())),
            PageContent::File(path) => std::fs::read(path).map(Cow::Owned),
        }
    }
}
