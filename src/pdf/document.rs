use anyhow::{Context, Result};
use clap::ValueEnum;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::debug;

use crate::page_range::PageSelection;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Rotation {
    /// 90° clockwise
    #[value(name = "90")]
    Right,
    /// 180°
    #[value(name = "180")]
    Down,
    /// 90° counter-clockwise
    #[value(name = "270")]
    Left,
}

impl Rotation {
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        match degrees.rem_euclid(360) {
            90 => Ok(Rotation::Right),
            180 => Ok(Rotation::Down),
            270 => Ok(Rotation::Left),
            _ => anyhow::bail!("Unsupported rotation: {}° (use 90, 180 or 270)", degrees),
        }
    }

    pub fn degrees(self) -> i64 {
        match self {
            Rotation::Right => 90,
            Rotation::Down => 180,
            Rotation::Left => 270,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CompressionLevel {
    /// Compress streams only
    Low,
    /// Drop unreferenced objects, then compress streams
    #[default]
    Medium,
    /// Also renumber objects to close gaps in the cross-reference table
    High,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        debug!(path = %path_str, pages = doc.get_pages().len(), "opened document");
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    #[cfg(test)]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
        Ok(PdfDocument {
            doc,
            path: "<memory>".to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Copy the selected pages into a new document.
    pub fn extract(&self, selection: &PageSelection) -> Result<Document> {
        if selection.is_empty() {
            anyhow::bail!("No pages selected");
        }
        self.check_selection(selection)?;

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| !selection.contains(num - 1))
            .collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Set the rotation of every selected page. Existing rotation is replaced,
    /// not added to.
    pub fn rotate(&mut self, selection: &PageSelection, rotation: Rotation) -> Result<()> {
        self.check_selection(selection)?;

        let pages = self.page_ids();
        for &index in selection.indices() {
            let (num, page_id) = pages[index as usize];
            let page = self
                .doc
                .get_dictionary_mut(page_id)
                .with_context(|| format!("{}: page {} is not a dictionary", self.path, num))?;
            page.set("Rotate", Object::Integer(rotation.degrees()));
        }

        Ok(())
    }

    pub fn compress(&mut self, level: CompressionLevel) {
        match level {
            CompressionLevel::Low => {}
            CompressionLevel::Medium => {
                self.doc.prune_objects();
            }
            CompressionLevel::High => {
                self.doc.prune_objects();
                self.doc.renumber_objects();
            }
        }
        self.doc.compress();
    }

    /// Append the pages of every document, in order, to the first one.
    pub fn merge(documents: Vec<Document>) -> Result<Document> {
        let mut documents = documents.into_iter();
        let Some(mut merged) = documents.next() else {
            anyhow::bail!("No documents to merge");
        };

        let pages_id = merged
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .context("Merged document has no page tree")?;
        let mut max_id = merged.max_id;

        for mut doc in documents {
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let mut page_ids = Vec::new();
            for page_id in doc.get_pages().into_values() {
                let inherited = inherited_attributes(&doc, page_id);
                let page = doc
                    .get_dictionary_mut(page_id)
                    .context("Page is not a dictionary")?;
                for (key, value) in inherited {
                    page.set(key, value);
                }
                page.set("Parent", Object::Reference(pages_id));
                page_ids.push(page_id);
            }

            merged.objects.extend(doc.objects);
            append_pages(&mut merged, pages_id, &page_ids)?;
        }

        merged.max_id = max_id;
        merged.prune_objects();
        merged.renumber_objects();
        Ok(merged)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).context("Failed to serialize PDF")?;
        Ok(buffer)
    }

    fn check_selection(&self, selection: &PageSelection) -> Result<()> {
        let total = self.page_count();
        if let Some(&last) = selection.indices().last() {
            if last >= total {
                anyhow::bail!("Page {} is out of range (1-{})", last + 1, total);
            }
        }
        Ok(())
    }
}

/// Attributes the page doesn't set itself but inherits from an ancestor node.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Page trees are shallow; the bound only guards against reference cycles.
    let mut depth = 0;
    while let Some(node_id) = parent {
        depth += 1;
        if depth > 64 {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };
        collect_missing(page, node, &mut found);
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    found
}

fn collect_missing(page: &Dictionary, node: &Dictionary, found: &mut Vec<(Vec<u8>, Object)>) {
    for key in INHERITABLE {
        if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
            continue;
        }
        if let Ok(value) = node.get(key) {
            found.push((key.to_vec(), value.clone()));
        }
    }
}

fn append_pages(doc: &mut Document, pages_id: ObjectId, page_ids: &[ObjectId]) -> Result<()> {
    let pages = doc
        .get_dictionary_mut(pages_id)
        .context("Page tree root is not a dictionary")?;

    let kids = pages
        .get_mut(b"Kids")
        .and_then(Object::as_array_mut)
        .context("Page tree root has no Kids array")?;
    kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", Object::Integer(count + page_ids.len() as i64));
    Ok(())
}
