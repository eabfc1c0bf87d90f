use pdf_writer::Content;

use crate::backend::TableHints;
use crate::config::{LayoutConfig, TableStyle};
use crate::error::{Error, Result};
use crate::fonts::Face;
use crate::model::{Block, DisplayRow, Page, RowKind, TableBlock, TableRow};

use super::layout::{draw_line, longest_word_width, wrap_text};

/// Spread the printable width over the columns by weight, then auto-fit so the
/// longest non-breakable word in each column fits within the cell (including
/// padding). Columns that need more space grow; other columns shrink
/// proportionally. Total width is preserved.
fn auto_fit_columns(
    header: &DisplayRow,
    body: &[DisplayRow],
    weights: &[f32],
    total: f32,
    style: &TableStyle,
) -> Vec<f32> {
    let ncols = weights.len();
    let weight_sum: f32 = weights.iter().sum();
    let mut widths: Vec<f32> = weights.iter().map(|w| total * w / weight_sum).collect();

    let pad = 2.0 * style.cell_padding;
    let mut min_widths: Vec<f32> = header
        .cells()
        .iter()
        .map(|cell| longest_word_width(cell, Face::Bold, style.font_size) + pad)
        .collect();
    for row in body {
        for (i, cell) in row.cells().iter().enumerate() {
            let w = longest_word_width(cell, Face::Regular, style.font_size) + pad;
            min_widths[i] = min_widths[i].max(w);
        }
    }

    // Expand columns that need it, track how much extra space is needed
    let mut extra_needed: f32 = 0.0;
    let mut shrinkable: f32 = 0.0;
    for i in 0..ncols {
        if min_widths[i] > widths[i] {
            extra_needed += min_widths[i] - widths[i];
            widths[i] = min_widths[i];
        } else {
            shrinkable += widths[i] - min_widths[i];
        }
    }

    if extra_needed > 0.0 && shrinkable > 0.0 {
        let factor = extra_needed.min(shrinkable) / shrinkable;
        for i in 0..ncols {
            if widths[i] > min_widths[i] {
                let available = widths[i] - min_widths[i];
                widths[i] -= available * factor;
            }
        }
    }

    // Normalize to preserve total
    let new_total: f32 = widths.iter().sum();
    if (new_total - total).abs() > 0.01 {
        let scale = total / new_total;
        for w in &mut widths {
            *w *= scale;
        }
    }

    widths
}

struct RowLayout {
    cells: Vec<Vec<String>>,
}

impl RowLayout {
    fn lines(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
    }

    fn height(&self, style: &TableStyle) -> f32 {
        self.lines() as f32 * style.line_h() + 2.0 * style.cell_padding
    }

    /// Detach the first `n` lines of every cell into a row of their own.
    fn split_head(&mut self, n: usize) -> RowLayout {
        let cells = self
            .cells
            .iter_mut()
            .map(|lines| {
                let rest = lines.split_off(n.min(lines.len()));
                std::mem::replace(lines, rest)
            })
            .collect();
        RowLayout { cells }
    }
}

fn layout_row(row: &DisplayRow, face: Face, col_widths: &[f32], style: &TableStyle) -> RowLayout {
    let pad = 2.0 * style.cell_padding;
    let cells = row
        .cells()
        .iter()
        .zip(col_widths)
        .map(|(text, col_w)| wrap_text(text, face, style.font_size, (col_w - pad).max(0.0)))
        .collect();
    RowLayout { cells }
}

/// Whole lines of a row that fit in `room`.
fn lines_fitting(room: f32, style: &TableStyle) -> usize {
    let avail = room - 2.0 * style.cell_padding + 0.01;
    if avail < style.line_h() {
        0
    } else {
        (avail / style.line_h()).floor() as usize
    }
}

pub(super) struct PreparedTable {
    col_widths: Vec<f32>,
    header: RowLayout,
    rows: Vec<RowLayout>,
}

impl PreparedTable {
    /// The header row plus the first body row, or only that row's first line
    /// when the row is too tall to fit on any page.
    pub(super) fn lead_height(&self, layout: &LayoutConfig, style: &TableStyle) -> f32 {
        let header_h = self.header.height(style);
        let Some(first) = self.rows.first() else {
            return header_h;
        };
        let fresh_room = layout.printable_bottom() - layout.page_top - header_h;
        let first_h = first.height(style);
        if first_h <= fresh_room {
            header_h + first_h
        } else {
            header_h + style.line_h() + 2.0 * style.cell_padding
        }
    }
}

pub(super) fn prepare_table(
    header: &DisplayRow,
    body: &[DisplayRow],
    hints: TableHints<'_>,
    layout: &LayoutConfig,
) -> Result<PreparedTable> {
    let ncols = header.len();
    if ncols == 0 {
        return Err(Error::Backend("table has no columns".into()));
    }
    if hints.weights.len() != ncols {
        return Err(Error::Backend(format!(
            "{} column widths given for {} columns",
            hints.weights.len(),
            ncols
        )));
    }
    if !(hints.weights.iter().sum::<f32>() > 0.0) {
        return Err(Error::Backend("column widths must sum to a positive value".into()));
    }
    if let Some((ri, row)) = body.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(Error::Backend(format!(
            "row {} has {} cells, expected {}",
            ri,
            row.len(),
            ncols
        )));
    }

    let style = hints.style;
    let col_widths = auto_fit_columns(header, body, hints.weights, layout.printable_width(), style);
    let header_layout = layout_row(header, Face::Bold, &col_widths, style);
    let rows = body
        .iter()
        .map(|row| layout_row(row, Face::Regular, &col_widths, style))
        .collect();
    Ok(PreparedTable {
        col_widths,
        header: header_layout,
        rows,
    })
}

fn start_page(pages: &mut Vec<Page>, current: &mut usize) {
    pages.push(Page::default());
    *current = pages.len() - 1;
    log::debug!("TABLE overflow, continuing on page {}", pages.len());
}

fn begin_block(
    layout: &LayoutConfig,
    style: &TableStyle,
    col_widths: &[f32],
    header: &RowLayout,
    top: f32,
) -> TableBlock {
    TableBlock {
        x: layout.margin_left,
        style: style.clone(),
        col_widths: col_widths.to_vec(),
        rows: vec![TableRow {
            kind: RowKind::Header,
            top,
            height: header.height(style),
            cells: header.cells.clone(),
            shaded: false,
        }],
    }
}

/// Place a prepared table starting at `start_y` on `pages[*current]`.
/// The first row starts on the starting page, split if need be; later rows
/// that would cross the bottom margin move to a fresh page, which repeats the
/// header row. A row too tall for any page is split line by line. Returns the
/// bottom offset of the last row.
pub(super) fn layout_table(
    table: PreparedTable,
    start_y: f32,
    style: &TableStyle,
    layout: &LayoutConfig,
    pages: &mut Vec<Page>,
    current: &mut usize,
) -> Result<f32> {
    if *current >= pages.len() {
        return Err(Error::Backend("no page to draw the table on".into()));
    }

    let bottom = layout.printable_bottom();
    let header_h = table.header.height(style);
    let fresh_room = bottom - layout.page_top - header_h;
    if lines_fitting(fresh_room, style) == 0 {
        return Err(Error::Backend(format!(
            "printable height below {:.1}pt cannot hold a header row and one table line",
            layout.page_top
        )));
    }
    let one_line = style.line_h() + 2.0 * style.cell_padding;
    let min_lead = if table.rows.is_empty() { header_h } else { header_h + one_line };

    let mut slot_top = start_y;

    // The header row never sits alone at the foot of a page
    let at_page_top = (slot_top - layout.page_top).abs() < 1.0;
    if !at_page_top && slot_top + min_lead > bottom {
        start_page(pages, current);
        slot_top = layout.page_top;
    }

    let mut block = begin_block(layout, style, &table.col_widths, &table.header, slot_top);
    slot_top += header_h;

    for (ri, mut row) in table.rows.into_iter().enumerate() {
        let shaded = style.alternate_fill.is_some() && ri % 2 == 1;
        loop {
            let row_h = row.height(style);
            log::debug!(
                "TABLE row={} row_h={:.2} slot_top={:.2}",
                ri,
                row_h,
                slot_top
            );
            let room = bottom - slot_top;
            let placed = if row_h <= room {
                Some(std::mem::replace(&mut row, RowLayout { cells: Vec::new() }))
            } else {
                let has_body_rows = block.rows.len() > 1;
                let fit = lines_fitting(room, style);
                if fit == 0 || (has_body_rows && row_h <= fresh_room) {
                    None
                } else {
                    log::debug!("TABLE row={} split after {} of {} lines", ri, fit, row.lines());
                    Some(row.split_head(fit))
                }
            };

            if let Some(part) = placed {
                let part_h = part.height(style);
                block.rows.push(TableRow {
                    kind: RowKind::Body(ri),
                    top: slot_top,
                    height: part_h,
                    cells: part.cells,
                    shaded,
                });
                slot_top += part_h;
                if row.cells.iter().all(Vec::is_empty) {
                    break;
                }
            }

            let finished = std::mem::replace(
                &mut block,
                begin_block(layout, style, &table.col_widths, &table.header, layout.page_top),
            );
            pages[*current].blocks.push(Block::Table(finished));
            start_page(pages, current);
            slot_top = layout.page_top + header_h;
        }
    }

    pages[*current].blocks.push(Block::Table(block));
    Ok(slot_top)
}

pub(super) fn draw_table(content: &mut Content, table: &TableBlock, page_height: f32) {
    let style = &table.style;
    let pad = style.cell_padding;
    let line_h = style.line_h();
    let table_w: f32 = table.col_widths.iter().sum();

    for row in &table.rows {
        let row_top = page_height - row.top;
        let row_bottom = row_top - row.height;

        let fill = match row.kind {
            RowKind::Header => Some(style.header_fill),
            RowKind::Body(_) if row.shaded => style.alternate_fill,
            RowKind::Body(_) => None,
        };
        if let Some([r, g, b]) = fill {
            content.save_state();
            content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            content.rect(table.x, row_bottom, table_w, row.height);
            content.fill_nonzero();
            content.restore_state();
        }

        let (face, color) = match row.kind {
            RowKind::Header => (Face::Bold, Some(style.header_text)),
            RowKind::Body(_) => (Face::Regular, None),
        };

        let mut cell_x = table.x;
        for (lines, col_w) in row.cells.iter().zip(&table.col_widths) {
            for (li, line) in lines.iter().enumerate() {
                let baseline_y = row_top - pad - style.font_size * 0.8 - li as f32 * line_h;
                draw_line(content, line, face, style.font_size, cell_x + pad, baseline_y, color);
            }

            if style.border_width > 0.0 {
                content.save_state();
                content.set_line_width(style.border_width);
                content.set_stroke_gray(style.border_gray);
                content.rect(cell_x, row_bottom, *col_w, row.height);
                content.stroke();
                content.restore_state();
            }
            cell_x += col_w;
        }
    }
}
