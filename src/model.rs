use serde::{Deserialize, Serialize};

use crate::config::TableStyle;

/// One member as supplied by the calling layer. Never mutated by the report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub member_number: Option<String>,
    pub full_name: String,
    /// Grouping key, compared verbatim; absent or empty values fall into the
    /// unassigned group.
    #[serde(default)]
    pub collector: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub membership_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Group<'a> {
    pub name: String,
    pub members: Vec<&'a Record>,
}

/// Formatted values for one table row, one entry per configured column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRow(pub Vec<String>);

impl DisplayRow {
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextStyle {
    Title,
    Subtitle,
    SectionHeader,
    Footer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextHints {
    pub style: TextStyle,
    pub alignment: Alignment,
}

impl TextHints {
    pub fn left(style: TextStyle) -> Self {
        Self {
            style,
            alignment: Alignment::Left,
        }
    }

    pub fn centered(style: TextStyle) -> Self {
        Self {
            style,
            alignment: Alignment::Center,
        }
    }
}

/// A line of text placed on a page. `y` is the baseline, measured from the
/// top edge of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub hints: TextHints,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RowKind {
    Header,
    /// Index of the body row within the table that produced it.
    Body(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub kind: RowKind,
    /// Top edge, measured from the top of the page.
    pub top: f32,
    pub height: f32,
    /// Wrapped lines per cell.
    pub cells: Vec<Vec<String>>,
    pub shaded: bool,
}

impl TableRow {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// The slice of a table that landed on one page.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    pub x: f32,
    pub style: TableStyle,
    pub col_widths: Vec<f32>,
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Table(TableBlock),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Text(t) => Some(t),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Text(_) => None,
        })
    }

    /// Text of the footer stamped on this page, if any.
    pub fn footer(&self) -> Option<&str> {
        self.texts()
            .find(|t| t.hints.style == TextStyle::Footer)
            .map(|t| t.content.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
