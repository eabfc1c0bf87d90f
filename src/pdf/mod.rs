mod layout;
mod table;

use std::path::Path;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::backend::{PageBackend, TableHints};
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::fonts::{Face, register_fonts};
use crate::model::{Alignment, Block, DisplayRow, Document, Page, TextBlock, TextHints, TextStyle};

use layout::draw_line;
use table::{draw_table, layout_table, prepare_table};

/// Page-rendering backend that lays blocks out into a [`Document`] and
/// serializes it with `pdf-writer`.
pub struct PdfBackend {
    layout: LayoutConfig,
    doc: Document,
    current: usize,
}

impl PdfBackend {
    pub fn new(title: &str, layout: LayoutConfig) -> Self {
        let doc = Document {
            title: title.to_string(),
            page_width: layout.page_width,
            page_height: layout.page_height,
            pages: Vec::new(),
        };
        Self {
            layout,
            doc,
            current: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        render(&self.doc, &self.layout)
    }

    fn current_page_mut(&mut self) -> Result<&mut Page> {
        self.doc
            .pages
            .get_mut(self.current)
            .ok_or_else(|| Error::Backend("no page has been added yet".into()))
    }
}

impl PageBackend for PdfBackend {
    fn add_page(&mut self) -> Result<()> {
        self.doc.pages.push(Page::default());
        self.current = self.doc.pages.len() - 1;
        log::debug!("PAGE added, now {}", self.doc.pages.len());
        Ok(())
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        let n = self.doc.pages.len();
        if page == 0 || page > n {
            return Err(Error::Backend(format!(
                "page {page} is out of range (document has {n} pages)"
            )));
        }
        self.current = page - 1;
        Ok(())
    }

    fn write_text(&mut self, content: &str, x: f32, y: f32, hints: TextHints) -> Result<()> {
        self.current_page_mut()?.blocks.push(Block::Text(TextBlock {
            content: content.to_string(),
            x,
            y,
            hints,
        }));
        Ok(())
    }

    fn write_table(
        &mut self,
        header: &DisplayRow,
        body: &[DisplayRow],
        start_y: f32,
        hints: TableHints<'_>,
    ) -> Result<f32> {
        let table = prepare_table(header, body, hints, &self.layout)?;
        layout_table(
            table,
            start_y,
            hints.style,
            &self.layout,
            &mut self.doc.pages,
            &mut self.current,
        )
    }

    fn table_lead_height(
        &self,
        header: &DisplayRow,
        body: &[DisplayRow],
        hints: TableHints<'_>,
    ) -> Result<f32> {
        let table = prepare_table(header, body, hints, &self.layout)?;
        Ok(table.lead_height(&self.layout, hints.style))
    }

    fn current_page_count(&self) -> usize {
        self.doc.pages.len()
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        log::info!("Saved {} ({} pages, {} bytes)", path.display(), self.doc.pages.len(), bytes.len());
        Ok(())
    }
}

fn font_for(style: TextStyle, layout: &LayoutConfig) -> (Face, f32) {
    match style {
        TextStyle::Title => (Face::Bold, layout.title_font_size),
        TextStyle::Subtitle => (Face::Regular, layout.subtitle_font_size),
        TextStyle::SectionHeader => (Face::Bold, layout.section_font_size),
        TextStyle::Footer => (Face::Regular, layout.footer_font_size),
    }
}

fn draw_text(content: &mut Content, text: &TextBlock, layout: &LayoutConfig) {
    let (face, font_size) = font_for(text.hints.style, layout);
    let x = match text.hints.alignment {
        Alignment::Left => text.x,
        Alignment::Center => text.x - face.text_width(&text.content, font_size) / 2.0,
    };
    draw_line(content, &text.content, face, font_size, x, layout.page_height - text.y, None);
}

/// Serialize a laid-out document.
pub fn render(doc: &Document, layout: &LayoutConfig) -> Result<Vec<u8>> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let fonts = register_fonts(&mut pdf, &mut alloc);

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages.iter().enumerate() {
        let mut content = Content::new();
        for block in &page.blocks {
            match block {
                Block::Text(text) => draw_text(&mut content, text, layout),
                Block::Table(table) => draw_table(&mut content, table, doc.page_height),
            }
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, doc.page_width, doc.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for entry in &fonts {
            font_dict.pair(Name(entry.face.pdf_name().as_bytes()), entry.font_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .producer(TextStr(concat!("members-report-pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    log::info!(
        "PDF assembly: {} pages, {} bytes in {:.1}ms",
        n,
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(bytes)
}
