//! DocBook-like structured tree types (C12).
//!
//! A typed recursive node per kind, mirroring
//! `pdf_oxide::structure::types::StructElem`/`StructChild`'s shape (an enum
//! of concrete node kinds each carrying its own children) rather than a
//! single generic tagged-string tree.

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// A cell of a materialized table, addressed by `(row, col)` only for
/// construction convenience; the XML form uses nested `row`/`entry`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocTableRow {
    pub cells: Vec<String>,
}

/// One node of the structured document tree (§4.12, §6 "Structured
/// document").
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    /// The document root.
    Book(Vec<DocNode>),
    /// A chapter, optionally matched to a PDF bookmark id/role.
    Chapter {
        id: String,
        role: Option<String>,
        title: String,
        children: Vec<DocNode>,
    },
    /// A nested section, `level` 1-based under its enclosing chapter.
    Sect {
        level: u8,
        title: String,
        children: Vec<DocNode>,
    },
    /// A body paragraph.
    Para(String),
    /// A figure: `mediaobject` -> `imageobject` -> `imagedata@fileref`.
    Figure { title: Option<String>, fileref: String },
    /// A formal table (has a bound caption) or informal table (does not).
    Table {
        title: Option<String>,
        informal: bool,
        rows: Vec<DocTableRow>,
    },
    /// An unordered list.
    ItemizedList(Vec<Vec<DocNode>>),
    /// An ordered (numbered) list.
    OrderedList(Vec<Vec<DocNode>>),
    /// An index alphabet bridgehead, e.g. the lone letter "B" introducing
    /// entries starting with B.
    Bridgehead(String),
}

impl DocNode {
    /// Serialize this node (and its descendants) as DocBook-like XML.
    pub fn to_xml(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        match self {
            DocNode::Book(children) => {
                let mut out = format!("{pad}<book>\n");
                for child in children {
                    out.push_str(&child.to_xml(indent + 1));
                }
                out.push_str(&format!("{pad}</book>\n"));
                out
            }
            DocNode::Chapter { id, role, title, children } => {
                let role_attr = role.as_ref().map(|r| format!(" role=\"{}\"", escape_xml(r))).unwrap_or_default();
                let mut out = format!("{pad}<chapter id=\"{}\"{}>\n", escape_xml(id), role_attr);
                out.push_str(&format!("{pad}  <title>{}</title>\n", escape_xml(title)));
                for child in children {
                    out.push_str(&child.to_xml(indent + 1));
                }
                out.push_str(&format!("{pad}</chapter>\n"));
                out
            }
            DocNode::Sect { level, title, children } => {
                let tag = format!("sect{}", level);
                let mut out = format!("{pad}<{tag}>\n");
                out.push_str(&format!("{pad}  <title>{}</title>\n", escape_xml(title)));
                for child in children {
                    out.push_str(&child.to_xml(indent + 1));
                }
                out.push_str(&format!("{pad}</{tag}>\n"));
                out
            }
            DocNode::Para(text) => format!("{pad}<para>{}</para>\n", escape_xml(text)),
            DocNode::Figure { title, fileref } => {
                let mut out = format!("{pad}<figure>\n");
                if let Some(title) = title {
                    out.push_str(&format!("{pad}  <title>{}</title>\n", escape_xml(title)));
                }
                out.push_str(&format!("{pad}  <mediaobject>\n"));
                out.push_str(&format!("{pad}    <imageobject>\n"));
                out.push_str(&format!("{pad}      <imagedata fileref=\"{}\"/>\n", escape_xml(fileref)));
                out.push_str(&format!("{pad}    </imageobject>\n"));
                out.push_str(&format!("{pad}  </mediaobject>\n"));
                out.push_str(&format!("{pad}</figure>\n"));
                out
            }
            DocNode::Table { title, informal, rows } => {
                let tag = if *informal { "informaltable" } else { "table" };
                let mut out = format!("{pad}<{tag}>\n");
                if let Some(title) = title {
                    out.push_str(&format!("{pad}  <title>{}</title>\n", escape_xml(title)));
                }
                let cols = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
                out.push_str(&format!("{pad}  <tgroup cols=\"{}\">\n", cols));
                out.push_str(&format!("{pad}    <tbody>\n"));
                for row in rows {
                    out.push_str(&format!("{pad}      <row>\n"));
                    for cell in &row.cells {
                        out.push_str(&format!("{pad}        <entry>{}</entry>\n", escape_xml(cell)));
                    }
                    out.push_str(&format!("{pad}      </row>\n"));
                }
                out.push_str(&format!("{pad}    </tbody>\n"));
                out.push_str(&format!("{pad}  </tgroup>\n"));
                out.push_str(&format!("{pad}</{tag}>\n"));
                out
            }
            DocNode::ItemizedList(items) => write_list(pad.as_str(), indent, "itemizedlist", items),
            DocNode::OrderedList(items) => write_list(pad.as_str(), indent, "orderedlist", items),
            DocNode::Bridgehead(text) => format!("{pad}<bridgehead>{}</bridgehead>\n", escape_xml(text)),
        }
    }
}

fn write_list(pad: &str, indent: usize, tag: &str, items: &[Vec<DocNode>]) -> String {
    let mut out = format!("{pad}<{tag}>\n");
    for item in items {
        out.push_str(&format!("{pad}  <listitem>\n"));
        for child in item {
            out.push_str(&child.to_xml(indent + 2));
        }
        out.push_str(&format!("{pad}  </listitem>\n"));
    }
    out.push_str(&format!("{pad}</{tag}>\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_with_chapter_and_para_serializes() {
        let tree = DocNode::Book(vec![DocNode::Chapter {
            id: "ch1".to_string(),
            role: None,
            title: "Introduction".to_string(),
            children: vec![DocNode::Para("Hello world".to_string())],
        }]);
        let xml = tree.to_xml(0);
        assert!(xml.contains("<chapter id=\"ch1\">"));
        assert!(xml.contains("<title>Introduction</title>"));
        assert!(xml.contains("<para>Hello world</para>"));
    }

    #[test]
    fn test_figure_serializes_mediaobject_chain() {
        let fig = DocNode::Figure { title: Some("Fig. 1".to_string()), fileref: "page1_img1.png".to_string() };
        let xml = fig.to_xml(0);
        assert!(xml.contains("<imagedata fileref=\"page1_img1.png\"/>"));
        assert!(xml.contains("<imageobject>"));
    }

    #[test]
    fn test_itemized_list_wraps_items_as_listitem() {
        let list = DocNode::ItemizedList(vec![vec![DocNode::Para("one".to_string())], vec![DocNode::Para("two".to_string())]]);
        let xml = list.to_xml(0);
        assert_eq!(xml.matches("<listitem>").count(), 2);
    }
}
