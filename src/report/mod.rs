pub mod group;
pub mod project;

use chrono::NaiveDate;

use crate::backend::{PageBackend, TableHints};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::model::{DisplayRow, Group, TextHints, TextStyle};

use project::{Column, header_row, project_row};

/// Where the next block goes: the page being written and the offset from its
/// top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageCursor {
    pub page: usize,
    pub offset: f32,
}

impl PageCursor {
    pub fn new(offset: f32) -> Self {
        Self { page: 0, offset }
    }

    pub fn advance(&mut self, by: f32) {
        self.offset += by;
    }

    pub fn break_page(&mut self, top: f32) {
        self.page += 1;
        self.offset = top;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub groups: usize,
    pub rows: usize,
    pub pages: usize,
}

/// `<report-type>-<YYYY-MM-DD>.pdf`
pub fn artifact_file_name(report_type: &str, date: NaiveDate) -> String {
    format!("{}-{}.pdf", report_type, date.format("%Y-%m-%d"))
}

fn section_heading(label: &str, name: &str, count: usize) -> String {
    let noun = if count == 1 { "member" } else { "members" };
    format!("{label}: {name} ({count} {noun})")
}

/// Lays groups out one section per page through a [`PageBackend`].
pub struct ReportWriter<'c> {
    config: &'c ReportConfig,
    columns: Vec<Column>,
    header: DisplayRow,
    weights: Vec<f32>,
    generated_on: NaiveDate,
}

impl<'c> ReportWriter<'c> {
    /// Fails with a configuration error before anything is drawn.
    pub fn new(config: &'c ReportConfig, generated_on: NaiveDate) -> Result<Self> {
        let columns = config.validate()?;
        let header = header_row(&columns);
        let weights = columns.iter().map(|c| c.weight).collect();
        Ok(Self {
            config,
            columns,
            header,
            weights,
            generated_on,
        })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn project(&self, group: &Group<'_>) -> Vec<DisplayRow> {
        group
            .members
            .iter()
            .map(|record| project_row(record, &self.columns, &self.config.fallback))
            .collect()
    }

    pub fn render<B: PageBackend>(&self, groups: &[Group<'_>], backend: &mut B) -> Result<RenderSummary> {
        let layout = &self.config.layout;
        let mut cursor = PageCursor::new(layout.first_section_y);
        let mut stamped = 0usize;
        let mut rows = 0usize;

        for (gi, group) in groups.iter().enumerate() {
            if gi == 0 {
                backend.add_page()?;
                cursor.page = 1;
                self.write_front_matter(backend)?;
            } else {
                self.stamp_footers(backend, &mut stamped)?;
                backend.add_page()?;
                cursor.break_page(layout.page_top);
            }

            let body = self.project(group);
            let hints = TableHints {
                style: &self.config.table,
                weights: &self.weights,
            };

            // A heading goes where its table can start, never alone at a page foot
            let lead = backend.table_lead_height(&self.header, &body, hints)?;
            let at_page_top = (cursor.offset - layout.page_top).abs() < 1.0;
            if !at_page_top && cursor.offset + layout.header_height + lead > layout.printable_bottom() {
                log::debug!(
                    "SECTION {:?}: heading at {:.2} leaves no room for the table, moving to a new page",
                    group.name,
                    cursor.offset
                );
                self.stamp_footers(backend, &mut stamped)?;
                backend.add_page()?;
                cursor.break_page(layout.page_top);
            }

            backend.write_text(
                &section_heading(&self.config.section_label, &group.name, group.members.len()),
                layout.margin_left,
                cursor.offset,
                TextHints::left(TextStyle::SectionHeader),
            )?;
            cursor.advance(layout.header_height);

            rows += body.len();
            let final_y = backend.write_table(&self.header, &body, cursor.offset, hints)?;

            // The table may have broken onto pages we never asked for.
            cursor.page = backend.current_page_count();
            cursor.offset = final_y + layout.section_gap;
            log::debug!(
                "SECTION {:?}: {} rows, ends on page {} at {:.2}",
                group.name,
                body.len(),
                cursor.page,
                final_y
            );
        }

        self.stamp_footers(backend, &mut stamped)?;

        Ok(RenderSummary {
            groups: groups.len(),
            rows,
            pages: backend.current_page_count(),
        })
    }

    fn write_front_matter<B: PageBackend>(&self, backend: &mut B) -> Result<()> {
        let layout = &self.config.layout;
        backend.write_text(
            &self.config.title,
            layout.margin_left,
            layout.title_y,
            TextHints::left(TextStyle::Title),
        )?;
        backend.write_text(
            &format!("Generated on: {}", self.generated_on.format(&self.config.date_format)),
            layout.margin_left,
            layout.subtitle_y,
            TextHints::left(TextStyle::Subtitle),
        )
    }

    /// Stamp every page emitted since the last call. Numbers come from the
    /// backend's page count, which includes overflow pages added inside
    /// `write_table`.
    fn stamp_footers<B: PageBackend>(&self, backend: &mut B, stamped: &mut usize) -> Result<()> {
        let layout = &self.config.layout;
        let total = backend.current_page_count();
        if total <= *stamped {
            return Ok(());
        }
        for page in *stamped + 1..=total {
            backend.set_page(page)?;
            backend.write_text(
                &format!("Page {page}"),
                layout.page_width / 2.0,
                layout.page_height - layout.footer_offset,
                TextHints::centered(TextStyle::Footer),
            )?;
        }
        backend.set_page(total)?;
        *stamped = total;
        Ok(())
    }
}
