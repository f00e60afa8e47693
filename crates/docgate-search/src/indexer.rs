//! Tantivy index holding ACL-tagged documents.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docgate_search::{AclDocument, AclIndex, AclSchema};
//!
//! let schema = AclSchema::default();
//! let mut index = AclIndex::new_in_memory(&schema, "__nosecurity__")?;
//!
//! index.add_document(&AclDocument::builder().id("public").body("hello").build())?;
//! index.commit()?;
//! ```

use std::path::Path;

use tantivy::collector::Count;
use tantivy::query::{Query, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{Index, IndexWriter, Term};

use crate::document::AclDocument;
use crate::error::Result;
use crate::query::restrict;
use crate::schema::AclSchema;

/// Index writer buffer size (50MB).
const WRITER_BUFFER_SIZE: usize = 50_000_000;

/// Tantivy index plus writer for [`AclDocument`]s.
pub struct AclIndex {
    index: Index,
    writer: IndexWriter,
    schema: AclSchema,
    sentinel: String,
}

impl AclIndex {
    /// Create or open an index at the given path.
    pub fn new(index_path: &Path, schema: &AclSchema, sentinel: impl Into<String>) -> Result<Self> {
        if !index_path.exists() {
            std::fs::create_dir_all(index_path)
                .map_err(|e| docgate_core::Error::io_with_path(e, index_path))?;
        }

        let index = if index_path.join("meta.json").exists() {
            Index::open_in_dir(index_path)?
        } else {
            Index::create_in_dir(index_path, schema.schema().clone())?
        };
        Self::with_index(index, schema, sentinel.into())
    }

    /// Create an in-memory index.
    pub fn new_in_memory(schema: &AclSchema, sentinel: impl Into<String>) -> Result<Self> {
        let index = Index::create_in_ram(schema.schema().clone());
        Self::with_index(index, schema, sentinel.into())
    }

    fn with_index(index: Index, schema: &AclSchema, sentinel: String) -> Result<Self> {
        let writer = index.writer(WRITER_BUFFER_SIZE)?;
        Ok(Self {
            index,
            writer,
            schema: schema.clone(),
            sentinel,
        })
    }

    /// Stage a document. Not searchable until [`commit`](Self::commit).
    pub fn add_document(&mut self, doc: &AclDocument) -> Result<()> {
        self.writer
            .add_document(doc.to_tantivy(&self.schema, &self.sentinel))?;
        Ok(())
    }

    /// Commit staged changes.
    pub fn commit(&mut self) -> Result<()> {
        self.writer.commit()?;
        Ok(())
    }

    /// Remove every document.
    pub fn clear(&mut self) -> Result<()> {
        self.writer.delete_all_documents()?;
        self.commit()
    }

    /// Number of committed documents matching `query`.
    pub fn count(&self, query: &dyn Query) -> Result<usize> {
        let searcher = self.index.reader()?.searcher();
        Ok(searcher.search(query, &Count)?)
    }

    /// Whether the document with `id` matches `query`.
    pub fn matches_id(&self, query: Box<dyn Query>, id: &str) -> Result<bool> {
        let by_id: Box<dyn Query> = Box::new(TermQuery::new(
            Term::from_field_text(self.schema.id, id),
            IndexRecordOption::Basic,
        ));
        Ok(self.count(restrict(by_id, query).as_ref())? > 0)
    }

    /// The underlying Tantivy index.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The schema.
    pub fn schema(&self) -> &AclSchema {
        &self.schema
    }

    /// Sentinel written for empty ACL lists.
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }
}

impl std::fmt::Debug for AclIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AclIndex")
            .field("index", &"<tantivy::Index>")
            .field("sentinel", &self.sentinel)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
