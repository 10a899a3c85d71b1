//! Parsers for the two external XML feeds this pipeline consumes (§6):
//! the text-layout extractor's per-glyph XML and the media/table
//! extractor's geometry XML. Both collaborators are out of scope
//! (§1 Non-goals); this module only ingests what they produce.

pub mod media_xml;
pub mod text_xml;

pub use media_xml::{parse_media_document, ParsedMediaDocument, ParsedMediaPage};
pub use text_xml::{parse_text_document, ParsedTextDocument, ParsedTextPage};
