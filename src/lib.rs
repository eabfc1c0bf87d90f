mod backend;
mod config;
mod error;
mod fonts;
mod model;
mod pdf;
mod report;

pub use backend::{PageBackend, TableHints};
pub use config::{
    ColumnSpec, DEFAULT_FALLBACK, DEFAULT_UNASSIGNED, Derivation, LayoutConfig, ReportConfig,
    TableStyle,
};
pub use error::{Error, Result};
pub use model::{
    Alignment, Block, DisplayRow, Document, Group, Page, Record, RowKind, TableBlock, TableRow,
    TextBlock, TextHints, TextStyle,
};
pub use pdf::PdfBackend;
pub use report::group::{group_key, group_records};
pub use report::project::{Column, RecordField, Rule, header_row, project_row, resolve_columns};
pub use report::{PageCursor, RenderSummary, ReportWriter, artifact_file_name};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;

/// Group `records` and lay them out into pages without serializing.
pub fn render_document(
    records: &[Record],
    config: &ReportConfig,
    generated_on: NaiveDate,
) -> Result<Document> {
    let writer = ReportWriter::new(config, generated_on)?;
    let groups = group_records(records, &config.unassigned_label);
    let mut backend = PdfBackend::new(&config.title, config.layout.clone());
    writer.render(&groups, &mut backend)?;
    Ok(backend.into_document())
}

/// Render `records` to PDF bytes.
pub fn render_report_pdf(
    records: &[Record],
    config: &ReportConfig,
    generated_on: NaiveDate,
) -> Result<Vec<u8>> {
    let doc = render_document(records, config, generated_on)?;
    pdf::render(&doc, &config.layout)
}

/// Render `records` and save the PDF into `out_dir` under
/// [`artifact_file_name`]. Returns the path written.
pub fn generate_report(
    records: &[Record],
    config: &ReportConfig,
    generated_on: NaiveDate,
    out_dir: &Path,
) -> Result<PathBuf> {
    let t0 = Instant::now();

    let writer = ReportWriter::new(config, generated_on)?;
    let groups = group_records(records, &config.unassigned_label);
    let t_group = t0.elapsed();

    let mut backend = PdfBackend::new(&config.title, config.layout.clone());
    let summary = writer.render(&groups, &mut backend)?;
    let t_render = t0.elapsed();

    let path = out_dir.join(artifact_file_name(&config.report_type, generated_on));
    backend.save(&path)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: group={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} groups, {} rows, {} pages)",
        t_group.as_secs_f64() * 1000.0,
        (t_render - t_group).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        summary.groups,
        summary.rows,
        summary.pages,
    );

    Ok(path)
}

/// Read a JSON array of records.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    Ok(serde_json::from_str(&text)?)
}
