use std::path::Path;

use crate::config::TableStyle;
use crate::error::Result;
use crate::model::{DisplayRow, TextHints};

/// Styling handed to `PageBackend::write_table`.
#[derive(Clone, Copy, Debug)]
pub struct TableHints<'a> {
    pub style: &'a TableStyle,
    /// Relative column widths, one per column.
    pub weights: &'a [f32],
}

/// The page-rendering collaborator the report writer draws through.
///
/// Vertical positions are offsets from the top edge of the page. Pages are
/// numbered from 1. `write_table` may add pages on its own when rows overflow
/// the printable height, so callers that need the page count must ask
/// `current_page_count` rather than keep their own tally.
pub trait PageBackend {
    /// Append a page and make it current.
    fn add_page(&mut self) -> Result<()>;

    /// Make an already emitted page current.
    fn set_page(&mut self, page: usize) -> Result<()>;

    fn write_text(&mut self, content: &str, x: f32, y: f32, hints: TextHints) -> Result<()>;

    /// Lay out `header` followed by `body` starting at `start_y` on the
    /// current page, breaking onto new pages as needed and repeating the
    /// header row on each. Every row ends above the bottom margin; a row
    /// taller than a page is split across pages. Returns the offset of the
    /// bottom of the last row, on the page that is current afterwards.
    fn write_table(
        &mut self,
        header: &DisplayRow,
        body: &[DisplayRow],
        start_y: f32,
        hints: TableHints<'_>,
    ) -> Result<f32>;

    /// Height of the header row and the first body row, or of that row's
    /// first line when the row cannot fit on any page. Callers use it to keep
    /// a heading on the same page as the start of its table; `write_table`
    /// itself only moves to a fresh page when not even one line fits.
    fn table_lead_height(
        &self,
        header: &DisplayRow,
        body: &[DisplayRow],
        hints: TableHints<'_>,
    ) -> Result<f32>;

    fn current_page_count(&self) -> usize;

    /// Serialize everything emitted so far to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}
