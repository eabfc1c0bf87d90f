mod common;

use common::{Event, FailingBackend, RecordingBackend, init_logging, member, members, report_date};
use members_report_pdf::{
    DEFAULT_UNASSIGNED, Error, Record, ReportConfig, ReportWriter, TextStyle, group_records,
};

fn render(records: &[Record], config: &ReportConfig, rows_per_page: usize) -> RecordingBackend {
    init_logging();
    let writer = ReportWriter::new(config, report_date()).unwrap();
    let groups = group_records(records, &config.unassigned_label);
    let mut backend = RecordingBackend::new(rows_per_page);
    writer.render(&groups, &mut backend).unwrap();
    backend
}

#[test]
fn no_groups_no_pages() {
    let backend = render(&[], &ReportConfig::members(), 10);
    assert!(backend.pages.is_empty());
    assert!(backend.events.is_empty());
}

#[test]
fn each_group_starts_on_its_own_page() {
    let records = vec![member("1", "Ann", Some("North")), member("2", "Bob", None)];
    let backend = render(&records, &ReportConfig::members(), 10);

    assert_eq!(backend.pages.len(), 2);
    assert_eq!(backend.pages[0].section_headers(), ["Collector: North (1 member)"]);
    assert_eq!(backend.pages[1].section_headers(), ["Collector: Unassigned (1 member)"]);
    assert_eq!(backend.footers(), [Some("Page 1"), Some("Page 2")]);
}

#[test]
fn first_page_carries_title_and_date() {
    let records = vec![member("1", "Ann", Some("North"))];
    let backend = render(&records, &ReportConfig::members(), 10);
    let texts: Vec<&str> = backend.pages[0].texts.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts[0], "All Members Report");
    assert_eq!(texts[1], "Generated on: 2024-03-09");
}

#[test]
fn header_and_table_offsets_follow_the_layout() {
    let config = ReportConfig::members();
    let layout = &config.layout;
    let records = vec![member("1", "Ann", Some("North")), member("2", "Bob", Some("South"))];
    let backend = render(&records, &config, 10);

    let headers: Vec<(usize, f32)> = backend
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Text { page, y, style: TextStyle::SectionHeader, .. } => Some((*page, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(headers, [(1, layout.first_section_y), (2, layout.page_top)]);

    let tables: Vec<(usize, f32)> = backend
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Table { page, start_y, .. } => Some((*page, *start_y)),
            _ => None,
        })
        .collect();
    assert_eq!(
        tables,
        [
            (1, layout.first_section_y + layout.header_height),
            (2, layout.page_top + layout.header_height),
        ]
    );
}

#[test]
fn overflowing_group_spans_pages_with_sequential_footers() {
    let records = members(25, "North");
    let backend = render(&records, &ReportConfig::members(), 10);

    assert_eq!(backend.pages.len(), 3);
    // Header row repeated on every continuation page
    assert!(backend.pages.iter().all(|p| p.header_rows.len() == 1));
    let body_rows: Vec<usize> = backend.pages.iter().map(|p| p.body_rows.len()).collect();
    assert_eq!(body_rows, [10, 10, 5]);
    assert_eq!(
        backend.footers(),
        [Some("Page 1"), Some("Page 2"), Some("Page 3")]
    );
    // The writer only ever asked for one page itself
    let added = backend.events.iter().filter(|e| **e == Event::AddPage).count();
    assert_eq!(added, 1);
}

#[test]
fn page_numbers_stay_sequential_after_overflow_in_an_earlier_group() {
    let mut records = members(15, "North");
    records.extend(members(3, "South"));
    records.extend(members(21, "East"));
    let backend = render(&records, &ReportConfig::members(), 10);

    let footers: Vec<String> = backend
        .pages
        .iter()
        .map(|p| p.footer().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (1..=footers.len()).map(|n| format!("Page {n}")).collect();
    assert_eq!(footers, expected);
    assert_eq!(footers.len(), 2 + 1 + 3);

    // South opens page 3, right after North's overflow page
    assert_eq!(backend.pages[2].section_headers(), ["Collector: South (3 members)"]);
    assert_eq!(backend.pages[3].section_headers(), ["Collector: East (21 members)"]);
    // Exactly one footer per page
    for page in &backend.pages {
        let n = page.texts.iter().filter(|(_, s)| *s == TextStyle::Footer).count();
        assert_eq!(n, 1);
    }
}

#[test]
fn rows_keep_input_order_across_pages() {
    let records = members(12, "North");
    let backend = render(&records, &ReportConfig::members(), 5);
    let numbers: Vec<&str> = backend
        .pages
        .iter()
        .flat_map(|p| p.body_rows.iter().map(|r| r.cells()[0].as_str()))
        .collect();
    let expected: Vec<String> = (1..=12).map(|i| format!("M{i:04}")).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn table_ending_on_a_page_boundary_leaves_no_blank_page() {
    let records = members(20, "North");
    let backend = render(&records, &ReportConfig::members(), 10);
    assert_eq!(backend.pages.len(), 2);
    assert!(backend.pages.iter().all(|p| !p.body_rows.is_empty()));
}

#[test]
fn rendering_twice_is_identical() {
    let mut records = members(13, "North");
    records.push(member("X1", "Zed", None));
    records.extend(members(4, "South"));
    let config = ReportConfig::collectors();

    let a = render(&records, &config, 6);
    let b = render(&records, &config, 6);
    assert_eq!(a.pages, b.pages);
    assert_eq!(a.events, b.events);
}

#[test]
fn zero_columns_fail_before_any_page() {
    let config = ReportConfig {
        columns: Vec::new(),
        ..ReportConfig::members()
    };
    let err = ReportWriter::new(&config, report_date()).err().unwrap();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn backend_failure_aborts_render() {
    let config = ReportConfig::members();
    let writer = ReportWriter::new(&config, report_date()).unwrap();
    let records = vec![member("1", "Ann", Some("North"))];
    let groups = group_records(&records, DEFAULT_UNASSIGNED);

    let err = writer.render(&groups, &mut FailingBackend).unwrap_err();
    assert!(matches!(err, Error::Backend(ref msg) if msg == "cannot allocate page"));
}

#[test]
fn summary_counts() {
    init_logging();
    let config = ReportConfig::members();
    let writer = ReportWriter::new(&config, report_date()).unwrap();
    let mut records = members(11, "North");
    records.push(member("9", "Solo", None));
    let groups = group_records(&records, DEFAULT_UNASSIGNED);
    let mut backend = RecordingBackend::new(10);

    let summary = writer.render(&groups, &mut backend).unwrap();
    assert_eq!(summary.groups, 2);
    assert_eq!(summary.rows, 12);
    assert_eq!(summary.pages, 3);
}

#[test]
fn heading_follows_a_table_that_cannot_start_below_the_front_matter() {
    init_logging();
    let config = ReportConfig::members();
    let layout = &config.layout;
    let writer = ReportWriter::new(&config, report_date()).unwrap();
    let mut records = members(3, "North");
    records.extend(members(2, "South"));
    let groups = group_records(&records, DEFAULT_UNASSIGNED);

    // Room for the table below the top margin, but not below the front matter
    let mut backend = RecordingBackend::new(10);
    backend.lead_height = layout.printable_bottom() - layout.first_section_y - layout.header_height + 1.0;
    let summary = writer.render(&groups, &mut backend).unwrap();

    assert_eq!(summary.pages, 3);
    assert!(backend.pages[0].section_headers().is_empty());
    assert!(backend.pages[0].header_rows.is_empty());
    assert_eq!(backend.pages[1].section_headers(), ["Collector: North (3 members)"]);
    assert_eq!(backend.pages[2].section_headers(), ["Collector: South (2 members)"]);
    assert_eq!(
        backend.footers(),
        [Some("Page 1"), Some("Page 2"), Some("Page 3")]
    );
    for page in &backend.pages {
        if !page.section_headers().is_empty() {
            assert!(!page.header_rows.is_empty(), "heading without a table");
        }
    }

    let north = backend
        .events
        .iter()
        .find_map(|e| match e {
            Event::Text { page, y, style: TextStyle::SectionHeader, .. } => Some((*page, *y)),
            _ => None,
        })
        .unwrap();
    assert_eq!(north, (2, layout.page_top));
}

#[test]
fn heading_stays_when_the_table_lead_fits() {
    let config = ReportConfig::members();
    let layout = &config.layout;
    let writer = ReportWriter::new(&config, report_date()).unwrap();
    let records = members(3, "North");
    let groups = group_records(&records, DEFAULT_UNASSIGNED);

    let mut backend = RecordingBackend::new(10);
    backend.lead_height = layout.printable_bottom() - layout.first_section_y - layout.header_height - 1.0;
    writer.render(&groups, &mut backend).unwrap();

    assert_eq!(backend.pages.len(), 1);
    assert_eq!(backend.pages[0].section_headers(), ["Collector: North (3 members)"]);
}
