#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use members_report_pdf::{
    DisplayRow, Error, PageBackend, Record, Result, TableHints, TextHints, TextStyle,
};

pub const ROW_H: f32 = 10.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

pub fn member(number: &str, name: &str, collector: Option<&str>) -> Record {
    Record {
        member_number: Some(number.to_string()),
        full_name: name.to_string(),
        collector: collector.map(str::to_string),
        ..Record::default()
    }
}

/// `n` fully populated members, all filed under `collector`.
pub fn members(n: usize, collector: &str) -> Vec<Record> {
    (1..=n)
        .map(|i| Record {
            member_number: Some(format!("M{i:04}")),
            full_name: format!("Member {i}"),
            collector: Some(collector.to_string()),
            email: Some(format!("member{i}@example.org")),
            phone: Some(format!("555-{i:04}")),
            address: Some(format!("{i} High Street")),
            town: Some("Springfield".into()),
            postcode: Some("AB1 2CD".into()),
            status: Some("active".into()),
            membership_type: Some("family".into()),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    AddPage,
    SetPage(usize),
    Text {
        page: usize,
        content: String,
        y: f32,
        style: TextStyle,
    },
    Table {
        page: usize,
        rows: usize,
        start_y: f32,
    },
    Save(PathBuf),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockPage {
    pub texts: Vec<(String, TextStyle)>,
    pub header_rows: Vec<DisplayRow>,
    pub body_rows: Vec<DisplayRow>,
}

impl MockPage {
    pub fn footer(&self) -> Option<&str> {
        self.texts
            .iter()
            .find(|(_, style)| *style == TextStyle::Footer)
            .map(|(t, _)| t.as_str())
    }

    pub fn section_headers(&self) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|(_, style)| *style == TextStyle::SectionHeader)
            .map(|(t, _)| t.as_str())
            .collect()
    }
}

/// Records every call. `write_table` fits `rows_per_page` body rows on a page
/// and starts new pages on its own, repeating the header, the way a real
/// table layout would.
pub struct RecordingBackend {
    pub rows_per_page: usize,
    /// Reported by `table_lead_height`; a header row plus one body row by default.
    pub lead_height: f32,
    pub pages: Vec<MockPage>,
    pub current: usize,
    pub events: Vec<Event>,
}

impl RecordingBackend {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page,
            lead_height: 2.0 * ROW_H,
            pages: Vec::new(),
            current: 0,
            events: Vec::new(),
        }
    }

    pub fn footers(&self) -> Vec<Option<&str>> {
        self.pages.iter().map(MockPage::footer).collect()
    }

    fn page_mut(&mut self) -> Result<&mut MockPage> {
        self.pages
            .get_mut(self.current)
            .ok_or_else(|| Error::Backend("no page".into()))
    }
}

impl PageBackend for RecordingBackend {
    fn add_page(&mut self) -> Result<()> {
        self.pages.push(MockPage::default());
        self.current = self.pages.len() - 1;
        self.events.push(Event::AddPage);
        Ok(())
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(Error::Backend(format!("no page {page}")));
        }
        self.current = page - 1;
        self.events.push(Event::SetPage(page));
        Ok(())
    }

    fn write_text(&mut self, content: &str, _x: f32, y: f32, hints: TextHints) -> Result<()> {
        let page = self.current + 1;
        self.page_mut()?.texts.push((content.to_string(), hints.style));
        self.events.push(Event::Text {
            page,
            content: content.to_string(),
            y,
            style: hints.style,
        });
        Ok(())
    }

    fn write_table(
        &mut self,
        header: &DisplayRow,
        body: &[DisplayRow],
        start_y: f32,
        _hints: TableHints<'_>,
    ) -> Result<f32> {
        self.events.push(Event::Table {
            page: self.current + 1,
            rows: body.len(),
            start_y,
        });
        self.page_mut()?.header_rows.push(header.clone());
        let mut on_page = 0usize;
        let mut y = start_y + ROW_H;
        for row in body {
            if on_page == self.rows_per_page {
                self.pages.push(MockPage::default());
                self.current = self.pages.len() - 1;
                self.page_mut()?.header_rows.push(header.clone());
                on_page = 0;
                y = ROW_H;
            }
            self.page_mut()?.body_rows.push(row.clone());
            on_page += 1;
            y += ROW_H;
        }
        Ok(y)
    }

    fn table_lead_height(
        &self,
        _header: &DisplayRow,
        _body: &[DisplayRow],
        _hints: TableHints<'_>,
    ) -> Result<f32> {
        Ok(self.lead_height)
    }

    fn current_page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        self.events.push(Event::Save(path.to_path_buf()));
        Ok(())
    }
}

/// Fails the first time a page is requested.
pub struct FailingBackend;

impl PageBackend for FailingBackend {
    fn add_page(&mut self) -> Result<()> {
        Err(Error::Backend("cannot allocate page".into()))
    }

    fn set_page(&mut self, _page: usize) -> Result<()> {
        Ok(())
    }

    fn write_text(&mut self, _content: &str, _x: f32, _y: f32, _hints: TextHints) -> Result<()> {
        Ok(())
    }

    fn write_table(
        &mut self,
        _header: &DisplayRow,
        _body: &[DisplayRow],
        start_y: f32,
        _hints: TableHints<'_>,
    ) -> Result<f32> {
        Ok(start_y)
    }

    fn table_lead_height(
        &self,
        _header: &DisplayRow,
        _body: &[DisplayRow],
        _hints: TableHints<'_>,
    ) -> Result<f32> {
        Ok(0.0)
    }

    fn current_page_count(&self) -> usize {
        0
    }

    fn save(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Every content stream in serialized PDF bytes, inflated.
pub fn pdf_content_streams(bytes: &[u8]) -> Vec<Vec<u8>> {
    const OPEN: &[u8] = b"stream\n";
    const CLOSE: &[u8] = b"\nendstream";
    let find = |hay: &[u8], needle: &[u8]| hay.windows(needle.len()).position(|w| w == needle);

    let mut streams = Vec::new();
    let mut rest = bytes;
    while let Some(start) = find(rest, OPEN) {
        let body = &rest[start + OPEN.len()..];
        let Some(end) = find(body, CLOSE) else { break };
        if let Ok(inflated) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            streams.push(inflated);
        }
        rest = &body[end + CLOSE.len()..];
    }
    streams
}

/// Number of page objects in serialized PDF bytes.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let count = |needle: &[u8]| bytes.windows(needle.len()).filter(|w| *w == needle).count();
    count(b"/Type /Page") - count(b"/Type /Pages")
}
