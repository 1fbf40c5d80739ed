mod common;

use common::read_fixture;
use mdnakit::parsing::markup::narrative_text;
use mdnakit::{
    EdgarError, ErrorKind, FilingOptions, HeadingMatch, ItemOrdinal, MdnaStrategy, Submission,
    mdna_from_markup, select_filings, select_filings_with, split_item_sections,
    try_collect_mdna,
};

#[test]
fn narrative_text_drops_table_cells() {
    let text = narrative_text(&read_fixture("filings/10q.htm")).unwrap();

    assert!(!text.contains('\n'));
    assert!(!text.contains("90,753"));
    assert!(!text.contains("36.6"));
    assert!(text.contains("Services gross margin increased."));
    assert!(text.contains("cost savings & a different mix"));
    assert!(text.contains("March\u{a0}30, 2024"));
}

#[test]
fn quarterly_report_splits_into_item_sections() {
    let text = narrative_text(&read_fixture("filings/10q.htm")).unwrap();
    let sections = split_item_sections(&text);

    // Cover, then Items 1 through 4. "Item 2 and" in the body is not a header.
    assert_eq!(sections.len(), 5);
    assert!(sections[0].ends_with("FINANCIAL INFORMATION"));
}

#[test]
fn default_strategy_finds_mdna() {
    let mdna = mdna_from_markup(&read_fixture("filings/10q.htm"), &ItemOrdinal::default()).unwrap();

    assert!(mdna.trim_start().starts_with("Management\u{2019}s Discussion and Analysis"));
    assert!(mdna.contains("Total net sales decreased 4%"));
    assert!(mdna.ends_with("Services gross margin increased."));
    assert!(!mdna.contains("market risk"));
}

#[test]
fn heading_strategy_agrees_on_standard_layout() {
    let markup = read_fixture("filings/10q.htm");

    let by_position = mdna_from_markup(&markup, &ItemOrdinal::default()).unwrap();
    let by_heading = mdna_from_markup(&markup, &HeadingMatch::default()).unwrap();
    assert_eq!(by_position, by_heading);
}

#[test]
fn document_without_enough_items() {
    let markup = read_fixture("filings/no_items.htm");

    let err = mdna_from_markup(&markup, &ItemOrdinal::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);

    let err = mdna_from_markup(&markup, &HeadingMatch::default()).unwrap_err();
    assert!(matches!(err, EdgarError::MalformedDocument(_)));
}

#[test]
fn legacy_html_filing_is_flattened() {
    let text = narrative_text(&read_fixture("filings/legacy_10q.htm")).unwrap();

    assert!(!text.contains('\n'));
    assert!(!text.contains("1,475"));
    assert!(text.contains("SECURITIES AND EXCHANGE COMMISSION"));
    assert!(text.contains("pricing pressure & component costs"));
    assert!(text.contains("March\u{a0}31, 2003"));
    assert_eq!(split_item_sections(&text).len(), 5);
}

#[test]
fn legacy_html_filing_mdna() {
    let markup = read_fixture("filings/legacy_10q.htm");

    let mdna = mdna_from_markup(&markup, &ItemOrdinal::default()).unwrap();
    assert!(mdna.starts_with(" Management's Discussion and Analysis of Financial Condition"));
    assert!(mdna.contains("same quarter last year.Gross margin declined"));
    assert!(mdna.ends_with("Operating expenses were flat."));

    let by_heading = mdna_from_markup(&markup, &HeadingMatch::default()).unwrap();
    assert_eq!(mdna, by_heading);
}

#[tokio::test]
async fn batch_returns_available_quarters() {
    let submission: Submission =
        serde_json::from_str(&read_fixture("submissions/two_quarters.json")).unwrap();
    let opts = FilingOptions::new("10-Q").with_limit(4);
    let filings = select_filings_with(&submission.filings.recent, &opts).unwrap();
    assert_eq!(filings.len(), 2);

    let markup = read_fixture("filings/10q.htm");
    let strategy = ItemOrdinal::default();
    let records = try_collect_mdna(&filings, 2, |_| {
        let mdna = mdna_from_markup(&markup, &strategy);
        async move { mdna }
    })
    .await
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].end_date.to_string(), "2024-06-29");
    assert_eq!(records[1].end_date.to_string(), "2024-03-30");
    assert!(records.iter().all(|r| r.mdna.contains("Total net sales decreased 4%")));
}

#[tokio::test]
async fn batch_failure_names_the_filing() {
    let submission: Submission =
        serde_json::from_str(&read_fixture("submissions/submission.json")).unwrap();
    let filings = select_filings(&submission.filings.recent, "10-Q").unwrap();

    let markup = read_fixture("filings/no_items.htm");
    let err = try_collect_mdna(&filings, 2, |filing| {
        let mdna = mdna_from_markup(&markup, &ItemOrdinal::default())
            .map_err(|e| e.in_filing("0000320193", &filing.accession_number));
        async move { mdna }
    })
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    assert!(err.to_string().contains("000032019324000081"));
}

#[test]
fn strategy_names() {
    assert_eq!(ItemOrdinal::default().name(), "item-ordinal");
    assert_eq!(HeadingMatch::default().name(), "heading-match");
}
