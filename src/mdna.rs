//! Management's Discussion and Analysis (MD&A) extraction.
//!
//! Filing documents have no fixed schema, so locating the MD&A is heuristic. The
//! document is first flattened into narrative text (see
//! [`parsing::markup::narrative_text`](crate::parsing::markup::narrative_text)); an
//! [`MdnaStrategy`] then picks the MD&A out of that text.
//!
//! Two strategies ship with the crate:
//!
//! - [`ItemOrdinal`] (default) splits the text on item headers (`Item 2.`, `ITEM 7.`)
//!   and returns the segment at a fixed position, 2 by default: cover page and table
//!   of contents, then Item 1, then Item 2, which is the MD&A of a standard 10-Q.
//!   This is an approximation that fails on many filer layouts.
//! - [`HeadingMatch`] returns the longest header-delimited segment that opens with a
//!   given heading ("Management's Discussion" by default), which skips table of
//!   contents entries and tolerates layouts where the MD&A is not the third segment.

use super::Edgar;
use super::batch::{self, MdnaOutcome, MdnaRecord};
use super::error::{EdgarError, Result};
use super::options::{BatchOptions, FilingOptions};
use super::parsing::markup::narrative_text;
use super::traits::{FilingOperations, MdnaOperations};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

/// "ITEM", any two characters, then a period; case-insensitive.
static ITEM_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ITEM..\.").expect("item header pattern is valid"));

/// Form type whose MD&A the batch operations collect.
pub const QUARTERLY_FORM: &str = "10-Q";

/// Splits narrative text at every item header.
///
/// The headers themselves are dropped; the text before the first header is the first
/// segment.
///
/// ```rust
/// use mdnakit::split_item_sections;
///
/// let sections = split_item_sections("CoverItem 1.FinancialsITEM 2.Discussion");
/// assert_eq!(sections, vec!["Cover", "Financials", "Discussion"]);
/// ```
pub fn split_item_sections(text: &str) -> Vec<&str> {
    ITEM_HEADER.split(text).collect()
}

/// Picks the MD&A out of a filing's narrative text.
///
/// Implementations are stateless after construction and shared across tasks.
pub trait MdnaStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Returns the MD&A text, or `EdgarError::MalformedDocument` when the text does
    /// not have the structure the strategy relies on.
    fn select(&self, text: &str) -> Result<String>;
}

/// Returns the item-header segment at a fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemOrdinal {
    pub position: usize,
}

impl ItemOrdinal {
    pub const DEFAULT_POSITION: usize = 2;

    pub fn new(position: usize) -> Self {
        Self { position }
    }
}

impl Default for ItemOrdinal {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POSITION)
    }
}

impl MdnaStrategy for ItemOrdinal {
    fn name(&self) -> &str {
        "item-ordinal"
    }

    fn select(&self, text: &str) -> Result<String> {
        let sections = split_item_sections(text);
        tracing::debug!("Item headers split the text into {} segments", sections.len());

        sections
            .get(self.position)
            .map(|section| section.to_string())
            .ok_or_else(|| {
                EdgarError::MalformedDocument(format!(
                    "expected at least {} item segments, found {}",
                    self.position + 1,
                    sections.len()
                ))
            })
    }
}

/// Returns the longest item-header segment that opens with `heading`.
///
/// The comparison ignores case, leading whitespace and the difference between
/// straight and typographic apostrophes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingMatch {
    heading: String,
}

impl HeadingMatch {
    pub const DEFAULT_HEADING: &'static str = "Management's Discussion";

    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: normalize_heading(&heading.into()),
        }
    }

    fn opens_with_heading(&self, section: &str) -> bool {
        let width = self.heading.chars().count();
        let opening: String = section
            .trim_start()
            .chars()
            .take(width)
            .collect::<String>();
        normalize_heading(&opening) == self.heading
    }
}

impl Default for HeadingMatch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HEADING)
    }
}

fn normalize_heading(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'").to_lowercase()
}

impl MdnaStrategy for HeadingMatch {
    fn name(&self) -> &str {
        "heading-match"
    }

    fn select(&self, text: &str) -> Result<String> {
        split_item_sections(text)
            .into_iter()
            .filter(|section| self.opens_with_heading(section))
            .max_by_key(|section| section.len())
            .map(str::to_string)
            .ok_or_else(|| {
                EdgarError::MalformedDocument(format!(
                    "no item segment opens with \"{}\"",
                    self.heading
                ))
            })
    }
}

/// Extracts the MD&A from a raw filing document.
///
/// # Errors
///
/// * `EdgarError::XmlError` - the document contains no markup
/// * `EdgarError::MalformedDocument` - the strategy could not locate the MD&A
pub fn mdna_from_markup(markup: &str, strategy: &dyn MdnaStrategy) -> Result<String> {
    let text = narrative_text(markup)?;
    strategy.select(&text)
}

#[async_trait]
impl MdnaOperations for Edgar {
    async fn extract_mdna(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
    ) -> Result<String> {
        self.extract_mdna_with(cik, accession_number, doc_extension, &ItemOrdinal::default())
            .await
    }

    /// Fetches one filing document and applies `strategy` to its narrative text.
    ///
    /// Every error is wrapped in `EdgarError::Filing` naming the CIK and accession
    /// number; `EdgarError::kind` still reports the underlying class.
    async fn extract_mdna_with(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
        strategy: &dyn MdnaStrategy,
    ) -> Result<String> {
        let markup = self
            .filing_content(cik, accession_number, doc_extension)
            .await
            .map_err(|e| e.in_filing(cik, accession_number))?;

        let mdna = mdna_from_markup(&markup, strategy)
            .map_err(|e| e.in_filing(cik, accession_number))?;

        tracing::debug!(
            "Extracted {} chars of MD&A from {} with {}",
            mdna.len(),
            accession_number,
            strategy.name()
        );
        Ok(mdna)
    }

    async fn recent_mdna(&self, cik: &str, quarters: usize) -> Result<Vec<MdnaRecord>> {
        self.recent_mdna_with(cik, quarters, BatchOptions::default())
            .await
    }

    async fn recent_mdna_with(
        &self,
        cik: &str,
        quarters: usize,
        opts: BatchOptions,
    ) -> Result<Vec<MdnaRecord>> {
        let filings = self
            .recent_filings(cik, FilingOptions::new(QUARTERLY_FORM).with_limit(quarters))
            .await?;
        let strategy = opts.strategy.as_ref();

        batch::try_collect_mdna(&filings, opts.concurrency, |filing| {
            self.extract_mdna_with(
                cik,
                &filing.accession_number,
                &filing.doc_extension,
                strategy,
            )
        })
        .await
    }

    async fn recent_mdna_outcomes(
        &self,
        cik: &str,
        quarters: usize,
        opts: BatchOptions,
    ) -> Result<Vec<MdnaOutcome>> {
        let filings = self
            .recent_filings(cik, FilingOptions::new(QUARTERLY_FORM).with_limit(quarters))
            .await?;
        let strategy = opts.strategy.as_ref();

        let outcomes = batch::collect_mdna(&filings, opts.concurrency, |filing| {
            self.extract_mdna_with(
                cik,
                &filing.accession_number,
                &filing.doc_extension,
                strategy,
            )
        })
        .await;
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const TEN_Q: &str = r#"<html><body>
<p>UNITED STATES SECURITIES AND EXCHANGE COMMISSION</p>
<table><tr><td>Item 1.</td><td>Financial Statements</td><td>3</td></tr></table>
<p>PART I</p>
<p>Item 1. Financial Statements</p>
<p>The condensed consolidated financial statements follow.</p>
<table><tr><td>Net sales</td><td>90,753</td></tr></table>
<p>Item 2. Management&#8217;s Discussion and Analysis</p>
<p>Net sales decreased during the second quarter.</p>
<p>Item 3. Quantitative and Qualitative Disclosures</p>
</body></html>"#;

    #[test]
    fn test_split_item_sections_case_insensitive() {
        let sections = split_item_sections("aITEM 1.bitem 2.cItEm 3.d");
        assert_eq!(sections, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_item_header_needs_two_characters_before_period() {
        assert_eq!(split_item_sections("Item1.x"), vec!["Item1.x"]);
        assert_eq!(split_item_sections("Item 10.x"), vec!["Item 10.x"]);
    }

    #[test]
    fn test_item_ordinal_returns_third_segment_verbatim() {
        let text = "Cover Item 1. Financials Item 2.  Discussion of results \u{a0}Item 3. Risk";
        let mdna = ItemOrdinal::default().select(text).unwrap();
        assert_eq!(mdna, "  Discussion of results \u{a0}");
    }

    #[test]
    fn test_item_ordinal_too_few_segments() {
        let err = ItemOrdinal::default()
            .select("Cover Item 1. Only one item")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_item_ordinal_custom_position() {
        let mdna = ItemOrdinal::new(1).select("a Item 1.b Item 2.c").unwrap();
        assert_eq!(mdna, "b ");
    }

    #[test]
    fn test_mdna_from_markup_default_strategy() {
        let mdna = mdna_from_markup(TEN_Q, &ItemOrdinal::default()).unwrap();
        assert!(mdna.starts_with(" Management\u{2019}s Discussion and Analysis"));
        assert!(mdna.contains("Net sales decreased during the second quarter."));
        assert!(!mdna.contains("90,753"));
    }

    #[test]
    fn test_heading_match_skips_short_toc_entries() {
        let text = "Cover Item 2. Management's Discussion 12 Item 3. Risk 14 \
                    Item 1. Financials Item 2. Management\u{2019}s Discussion and Analysis of results \
                    in length Item 3. Risk";
        let mdna = HeadingMatch::default().select(text).unwrap();
        assert_eq!(
            mdna,
            " Management\u{2019}s Discussion and Analysis of results in length "
        );
    }

    #[test]
    fn test_heading_match_absent() {
        let err = HeadingMatch::default()
            .select("Cover Item 1. Financials Item 2. Controls")
            .unwrap_err();
        assert!(matches!(err, EdgarError::MalformedDocument(_)));
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let strategies: Vec<Box<dyn MdnaStrategy>> =
            vec![Box::new(ItemOrdinal::default()), Box::new(HeadingMatch::default())];
        for strategy in &strategies {
            let mdna = mdna_from_markup(TEN_Q, strategy.as_ref()).unwrap();
            assert!(
                mdna.contains("Net sales decreased"),
                "{} missed the MD&A",
                strategy.name()
            );
        }
    }

    #[test]
    fn test_plain_text_is_parse_error() {
        let err = mdna_from_markup("Cover Item 1. a Item 2. b Item 3. c", &ItemOrdinal::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_legacy_html_filing() {
        let doc = "<HTML><BODY><P>Cover<BR>page\n<P>Item 1. Financial Statements\n\
                   <P>Item 2. Management's Discussion<BR>Sales rose.\n<P>Item 3. Risk</BODY></HTML>";
        let mdna = mdna_from_markup(doc, &ItemOrdinal::default()).unwrap();
        assert_eq!(mdna, " Management's DiscussionSales rose.");
    }
}
