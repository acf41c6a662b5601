//! Page splitting using lopdf.

use std::io::Write;

use lopdf::Document;
use tracing::{debug, trace};

use super::{PageSplitter, PageUnit, Result, Workspace};
use crate::error::DocumentError;
use crate::models::config::PageStorage;

/// Splits a PDF into standalone single-page PDFs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfSplitter;

impl LopdfSplitter {
    /// Create a new splitter.
    pub fn new() -> Self {
        Self
    }

    fn load(data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| DocumentError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        Ok(doc)
    }

    /// Write page `keep` of `doc` as a document of its own.
    ///
    /// Each page clones the whole document, so splitting is quadratic in page
    /// count. Statements run to tens of pages; `split` prunes the source once
    /// so every clone carries only live objects.
    fn single_page(doc: &Document, keep: u32, all_pages: &[u32]) -> Result<Vec<u8>> {
        let mut page_doc = doc.clone();

        let others: Vec<u32> = all_pages.iter().copied().filter(|&n| n != keep).collect();
        page_doc.delete_pages(&others);
        let pruned = page_doc.prune_objects();
        page_doc.compress();

        trace!("Page {}: pruned {} objects", keep, pruned.len());

        let mut out = Vec::new();
        page_doc
            .save_to(&mut out)
            .map_err(|e| DocumentError::Materialize {
                page: keep,
                reason: e.to_string(),
            })?;
        Ok(out)
    }

    fn materialize(workspace: &Workspace, number: u32, bytes: Vec<u8>) -> Result<PageUnit> {
        let to_error = |e: std::io::Error| DocumentError::Materialize {
            page: number,
            reason: e.to_string(),
        };

        match workspace.storage() {
            PageStorage::Memory => Ok(PageUnit::in_memory(number, bytes)),
            PageStorage::Disk => {
                let mut file = workspace.page_file(number).map_err(to_error)?;
                file.write_all(&bytes).map_err(to_error)?;
                file.flush().map_err(to_error)?;
                Ok(PageUnit::on_disk(number, file.into_temp_path()))
            }
        }
    }
}

impl PageSplitter for LopdfSplitter {
    fn split(&self, document: &[u8], workspace: &Workspace) -> Result<Vec<PageUnit>> {
        let mut doc = Self::load(document)?;
        let unused = doc.prune_objects();
        trace!("Pruned {} unreferenced objects before splitting", unused.len());

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!("Loaded PDF with {} pages", page_numbers.len());

        let mut units = Vec::with_capacity(page_numbers.len());
        for &number in &page_numbers {
            let bytes = Self::single_page(&doc, number, &page_numbers)?;
            trace!("Page {}: {} bytes", number, bytes.len());
            units.push(Self::materialize(workspace, number, bytes)?);
        }

        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::WorkspaceConfig;
    use crate::pdf::fixtures::sample_pdf;

    fn workspace(storage: PageStorage) -> Workspace {
        Workspace::acquire(&WorkspaceConfig {
            storage,
            ..WorkspaceConfig::default()
        })
        .unwrap()
    }

    fn page_text(data: &[u8]) -> String {
        let doc = Document::load_mem(data).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        doc.extract_text(&[1]).unwrap()
    }

    #[test]
    fn test_split_to_disk_in_order() {
        let workspace = workspace(PageStorage::Disk);
        let pages = LopdfSplitter::new().split(&sample_pdf(3), &workspace).unwrap();

        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            let number = i as u32 + 1;
            assert_eq!(page.number(), number);
            assert!(page.path().unwrap().starts_with(workspace.path()));
            assert!(page_text(&page.read().unwrap()).contains(&format!("Page {}", number)));
        }
    }

    #[test]
    fn test_split_in_memory() {
        let workspace = workspace(PageStorage::Memory);
        let pages = LopdfSplitter::new().split(&sample_pdf(2), &workspace).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.path().is_none()));
        assert!(page_text(&pages[1].read().unwrap()).contains("Page 2"));
    }

    #[test]
    fn test_split_pages_drop_other_pages_objects() {
        let source = sample_pdf(4);
        let source_objects = Document::load_mem(&source).unwrap().objects.len();

        let workspace = workspace(PageStorage::Memory);
        let pages = LopdfSplitter::new().split(&source, &workspace).unwrap();

        let counts: Vec<usize> = pages
            .iter()
            .map(|p| Document::load_mem(&p.read().unwrap()).unwrap().objects.len())
            .collect();
        assert_eq!(counts.len(), 4);
        assert!(counts.iter().all(|&n| n == counts[0]));
        assert!(counts[0] < source_objects);
    }

    #[test]
    fn test_zero_pages_is_not_an_error() {
        let workspace = workspace(PageStorage::Disk);
        let pages = LopdfSplitter::new().split(&sample_pdf(0), &workspace).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_garbage_is_document_error() {
        let workspace = workspace(PageStorage::Disk);
        let result = LopdfSplitter::new().split(b"definitely not a pdf", &workspace);
        assert!(matches!(result, Err(DocumentError::Parse(_))));
    }
}
