//! The tagged `Element` variant used by the fusion engine's reading-order
//! interleave (§9 design note: "modelled as a tagged variant... never as
//! ad-hoc attribute presence"), mirroring
//! `pdf_oxide::structure::types::StructChild`'s explicit enum-per-kind
//! shape.

use crate::model::media::MediaElement;
use crate::model::paragraph::Paragraph;
use crate::model::table::Table;

/// One emittable element on a fused page, carrying its own reading order.
#[derive(Debug, Clone)]
pub enum Element {
    /// A text paragraph.
    Text(Paragraph),
    /// A raster or vector image.
    Media(MediaElement),
    /// A table.
    Table(Table),
}

impl Element {
    /// The reading order assigned to this element during fusion.
    pub fn reading_order(&self) -> Option<f64> {
        match self {
            Element::Text(p) => p.reading_order,
            Element::Media(m) => m.reading_order,
            Element::Table(t) => t.reading_order,
        }
    }

    /// Set the reading order for this element.
    pub fn set_reading_order(&mut self, order: f64) {
        match self {
            Element::Text(p) => p.reading_order = Some(order),
            Element::Media(m) => m.reading_order = Some(order),
            Element::Table(t) => t.reading_order = Some(order),
        }
    }

    /// The top-most y-coordinate of this element, used for top-sort
    /// ordering before reading order is assigned.
    pub fn top(&self) -> f32 {
        match self {
            Element::Text(p) => p
                .fragments
                .first()
                .map(|f| f.rect.top())
                .unwrap_or(0.0),
            Element::Media(m) => m.rect.top(),
            Element::Table(t) => t.rect.top(),
        }
    }
}
