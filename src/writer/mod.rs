//! Output writers. `unified` emits the reading-ordered per-page XML (C11);
//! the structured DocBook-like tree is emitted by `structure::promoter`
//! instead, since it's a different document built from the unified model
//! rather than a second serialization of the same one.

pub mod unified;

pub use unified::{write_unified_document, UnifiedWriteReport};
