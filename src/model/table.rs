//! Tables — cell grids produced from the external table-geometry
//! detector's candidates, with caption binding (§3, C9).

use crate::geometry::Rect;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Column index (0-based).
    pub col: usize,
    /// Row index (0-based).
    pub row: usize,
    /// Cell text content.
    pub text: String,
}

/// A table extracted from the external table-geometry detector.
#[derive(Debug, Clone)]
pub struct Table {
    /// Stable id within the page.
    pub id: u32,
    /// Page number.
    pub page: u32,
    /// Bounding rectangle. PDF-space at ingest; transformed to HTML-space
    /// during fusion (C10).
    pub rect: Rect,
    /// Rows of cells, addressed by `(row, col)`.
    pub rows: Vec<Vec<Cell>>,
    /// Caption text, bound via the `Table\s+\d+` caption-distance policy
    /// (§4.9). `None` if no caption matched (and the table survived
    /// because `require_table_caption` is `false`).
    pub caption: Option<String>,
    /// Reading order assigned during fusion (C10); `None` until then.
    pub reading_order: Option<f64>,
}

impl Table {
    /// Create a new table with no caption and unset reading order.
    pub fn new(id: u32, page: u32, rect: Rect, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            id,
            page,
            rect,
            rows,
            caption: None,
            reading_order: None,
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (width of the widest row).
    pub fn num_cols(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }
}
