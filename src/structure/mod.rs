//! Structural promotion (C12): turns the fused, reading-ordered unified
//! document into a DocBook-like hierarchical tree — font-role analysis,
//! TOC extraction, chapter/section nesting, figure/table materialization,
//! list grouping, and index bridgeheads (§4.12).

pub mod font_roles;
pub mod promoter;
pub mod toc;
pub mod types;

pub use font_roles::{classify_font_roles, FontRole, FontRoleConfig};
pub use promoter::{promote, promote_with_config, PromoterConfig};
pub use toc::{extract_toc, TocEntry};
pub use types::{DocNode, DocTableRow};
