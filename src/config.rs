use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::project::{Column, resolve_columns};

pub const DEFAULT_FALLBACK: &str = "N/A";
pub const DEFAULT_UNASSIGNED: &str = "Unassigned";

const MM: f32 = 72.0 / 25.4;

/// How a column derives its text from a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Derivation {
    Field { field: String },
    /// Non-empty values of `fields`, in order, joined with `separator`.
    Join { fields: Vec<String>, separator: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    #[serde(flatten)]
    pub rule: Derivation,
    /// Relative width weight before auto-fit.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl ColumnSpec {
    pub fn field(key: &str, header: &str, field: &str, weight: f32) -> Self {
        Self {
            key: key.to_string(),
            header: header.to_string(),
            rule: Derivation::Field {
                field: field.to_string(),
            },
            weight,
        }
    }

    pub fn join(key: &str, header: &str, fields: &[&str], separator: &str, weight: f32) -> Self {
        Self {
            key: key.to_string(),
            header: header.to_string(),
            rule: Derivation::Join {
                fields: fields.iter().map(|f| f.to_string()).collect(),
                separator: separator.to_string(),
            },
            weight,
        }
    }
}

/// Page geometry and vertical offsets, in points. Offsets are measured from
/// the top edge of the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    /// Top offset of every page after the first.
    pub page_top: f32,
    pub title_y: f32,
    pub subtitle_y: f32,
    /// Offset of the first section header on the first page.
    pub first_section_y: f32,
    pub header_height: f32,
    pub section_gap: f32,
    /// Footer baseline, measured from the bottom edge.
    pub footer_offset: f32,
    pub title_font_size: f32,
    pub subtitle_font_size: f32,
    pub section_font_size: f32,
    pub footer_font_size: f32,
}

impl Default for LayoutConfig {
    // A4 portrait, mirroring the millimetre offsets of the on-screen export.
    fn default() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            margin_left: 14.0 * MM,
            margin_right: 14.0 * MM,
            margin_bottom: 14.0 * MM,
            page_top: 20.0 * MM,
            title_y: 15.0 * MM,
            subtitle_y: 25.0 * MM,
            first_section_y: 35.0 * MM,
            header_height: 10.0 * MM,
            section_gap: 15.0 * MM,
            footer_offset: 6.0 * MM,
            title_font_size: 16.0,
            subtitle_font_size: 11.0,
            section_font_size: 14.0,
            footer_font_size: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn printable_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    pub fn printable_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Every section must be able to hold its heading, a header row and one
    /// line of its first record, on the first page and on later ones.
    fn validate(&self, table: &TableStyle) -> Result<()> {
        if self.printable_width() <= 0.0 {
            return Err(Error::Config(format!(
                "margins ({} + {}) leave no printable width on a {}pt page",
                self.margin_left, self.margin_right, self.page_width
            )));
        }
        let one_line = table.line_h() + 2.0 * table.cell_padding;
        let section_min = self.header_height + 2.0 * one_line;
        for (name, top) in [("page_top", self.page_top), ("first_section_y", self.first_section_y)] {
            if top + section_min > self.printable_bottom() {
                return Err(Error::Config(format!(
                    "{name} at {top:.1}pt leaves less than {section_min:.1}pt for a section above the bottom margin at {:.1}pt",
                    self.printable_bottom()
                )));
            }
        }
        if self.footer_offset <= 0.0 || self.footer_offset > self.margin_bottom {
            return Err(Error::Config(format!(
                "footer offset {}pt must lie within the {}pt bottom margin",
                self.footer_offset, self.margin_bottom
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub font_size: f32,
    /// Line pitch as a multiple of the font size.
    pub line_height: f32,
    pub cell_padding: f32,
    pub header_fill: [u8; 3],
    pub header_text: [u8; 3],
    pub alternate_fill: Option<[u8; 3]>,
    pub border_width: f32,
    pub border_gray: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 8.0,
            line_height: 1.15,
            cell_padding: 4.0,
            header_fill: [137, 137, 222],
            header_text: [255, 255, 255],
            alternate_fill: Some([245, 245, 245]),
            border_width: 0.25,
            border_gray: 0.8,
        }
    }
}

impl TableStyle {
    pub fn line_h(&self) -> f32 {
        self.font_size * self.line_height
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
    /// Stem of the saved file name, e.g. `members-report`.
    pub report_type: String,
    pub section_label: String,
    pub unassigned_label: String,
    pub fallback: String,
    /// chrono format string for the "Generated on" line.
    pub date_format: String,
    pub columns: Vec<ColumnSpec>,
    pub layout: LayoutConfig,
    pub table: TableStyle,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::members()
    }
}

impl ReportConfig {
    /// One column per contact field.
    pub fn members() -> Self {
        Self {
            title: "All Members Report".into(),
            report_type: "members-report".into(),
            section_label: "Collector".into(),
            unassigned_label: DEFAULT_UNASSIGNED.into(),
            fallback: DEFAULT_FALLBACK.into(),
            date_format: "%Y-%m-%d".into(),
            columns: vec![
                ColumnSpec::field("member_number", "Member #", "member_number", 0.8),
                ColumnSpec::field("name", "Name", "full_name", 1.2),
                ColumnSpec::field("email", "Email", "email", 1.4),
                ColumnSpec::field("phone", "Phone", "phone", 1.0),
                ColumnSpec::join("address", "Address", &["address", "town", "postcode"], ", ", 1.8),
                ColumnSpec::field("status", "Status", "status", 0.7),
            ],
            layout: LayoutConfig::default(),
            table: TableStyle::default(),
        }
    }

    /// Email and phone folded into one multi-line contact column.
    pub fn collectors() -> Self {
        Self {
            title: "Collector Members Report".into(),
            report_type: "collectors-report".into(),
            columns: vec![
                ColumnSpec::field("member_number", "Member #", "member_number", 0.8),
                ColumnSpec::field("name", "Name", "full_name", 1.2),
                ColumnSpec::join("contact", "Contact", &["email", "phone"], "\n", 1.6),
                ColumnSpec::join("address", "Address", &["address", "town", "postcode"], ", ", 1.8),
                ColumnSpec::field("status", "Status", "status", 0.7),
            ],
            ..Self::members()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid report config: {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        Self::from_json_str(&text)
    }

    /// Check the whole configuration and resolve its columns. Nothing is
    /// rendered unless this succeeds.
    pub fn validate(&self) -> Result<Vec<Column>> {
        if self.table.font_size <= 0.0 || self.table.line_height <= 0.0 {
            return Err(Error::Config("table font size and line height must be positive".into()));
        }
        if self.table.cell_padding < 0.0 {
            return Err(Error::Config("table cell padding must not be negative".into()));
        }
        self.layout.validate(&self.table)?;
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "invalid date format '{}'",
                self.date_format
            )));
        }
        if self.fallback.trim().is_empty() {
            return Err(Error::Config("fallback token must not be blank".into()));
        }
        if self.columns.iter().any(|c| !(c.weight > 0.0)) {
            return Err(Error::Config("column weights must be positive".into()));
        }
        resolve_columns(&self.columns)
    }
}
