use super::Edgar;
use super::error::{EdgarError, Result};
use super::options::FilingOptions;
use super::parsing::utils::{pad_cik, parse_date, parse_optional_date};
use super::traits::FilingOperations;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// The `submissions/CIK##########.json` document of one registrant.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub cik: String,
    pub name: String,
    #[serde(rename = "entityType", default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub sic: Option<String>,
    #[serde(rename = "sicDescription", default)]
    pub sic_description: Option<String>,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub exchanges: Vec<String>,
    #[serde(rename = "fiscalYearEnd", default)]
    pub fiscal_year_end: Option<String>,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

/// Recent filings as published: one array per field, rows zipped by position.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecentFilings {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    pub filing_date: Vec<String>,
    #[serde(rename = "reportDate")]
    pub report_date: Option<Vec<String>>,
    #[serde(rename = "acceptanceDateTime")]
    pub acceptance_date_time: Option<Vec<String>>,
    pub act: Option<Vec<String>>,
    pub form: Vec<String>,
    #[serde(rename = "fileNumber")]
    pub file_number: Option<Vec<String>>,
    #[serde(rename = "filmNumber")]
    pub film_number: Option<Vec<String>>,
    pub items: Option<Vec<String>>,
    pub size: Option<Vec<u64>>,
    #[serde(rename = "isXBRL")]
    pub is_xbrl: Option<Vec<i32>>,
    #[serde(rename = "isInlineXBRL")]
    pub is_inline_xbrl: Option<Vec<i32>>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Option<Vec<String>>,
    #[serde(rename = "primaryDocDescription")]
    pub primary_doc_description: Option<Vec<String>>,
}

/// One filing of a registrant, normalized for document retrieval.
///
/// `accession_number` has its hyphens removed and `doc_extension` is the file name of
/// the primary document, so `{cik}/{accession_number}/{doc_extension}` addresses the
/// document in the archives.
#[derive(Debug, Clone, Serialize)]
pub struct FilingRecord {
    pub accession_number: String,
    pub filing_date: NaiveDate,
    pub report_date: Option<NaiveDate>,
    pub acceptance_date_time: Option<DateTime<FixedOffset>>,
    pub act: Option<String>,
    pub form: String,
    pub file_number: Option<String>,
    pub film_number: Option<String>,
    pub items: Option<String>,
    pub size: Option<u64>,
    pub is_xbrl: bool,
    pub is_inline_xbrl: bool,
    pub doc_extension: String,
    pub primary_doc_description: Option<String>,
}

impl RecentFilings {
    pub fn len(&self) -> usize {
        self.accession_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accession_number.is_empty()
    }

    fn get_vec_item_at<T: Clone>(&self, vec_opt: &Option<Vec<T>>, idx: usize) -> Option<T> {
        vec_opt.as_ref().and_then(|v| v.get(idx).cloned())
    }

    fn get_bool_at(&self, vec_opt: &Option<Vec<i32>>, idx: usize) -> bool {
        vec_opt
            .as_ref()
            .and_then(|v| v.get(idx))
            .is_some_and(|flag| *flag == 1)
    }

    /// Every present column must have one entry per accession number.
    fn validate(&self) -> Result<()> {
        let expected = self.len();
        let columns = [
            ("filingDate", Some(self.filing_date.len())),
            ("reportDate", self.report_date.as_ref().map(Vec::len)),
            (
                "acceptanceDateTime",
                self.acceptance_date_time.as_ref().map(Vec::len),
            ),
            ("act", self.act.as_ref().map(Vec::len)),
            ("form", Some(self.form.len())),
            ("fileNumber", self.file_number.as_ref().map(Vec::len)),
            ("filmNumber", self.film_number.as_ref().map(Vec::len)),
            ("items", self.items.as_ref().map(Vec::len)),
            ("size", self.size.as_ref().map(Vec::len)),
            ("isXBRL", self.is_xbrl.as_ref().map(Vec::len)),
            ("isInlineXBRL", self.is_inline_xbrl.as_ref().map(Vec::len)),
            ("primaryDocument", self.primary_document.as_ref().map(Vec::len)),
            (
                "primaryDocDescription",
                self.primary_doc_description.as_ref().map(Vec::len),
            ),
        ];

        for (name, len) in columns {
            if let Some(len) = len {
                if len != expected {
                    return Err(EdgarError::InvalidResponse(format!(
                        "Column '{}' has {} rows, expected {}",
                        name, len, expected
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<(&RecentFilings, usize)> for FilingRecord {
    type Error = EdgarError;

    fn try_from((recent, idx): (&RecentFilings, usize)) -> Result<Self> {
        let accession_number = recent.accession_number[idx].replace('-', "");

        let doc_extension = recent
            .get_vec_item_at(&recent.primary_document, idx)
            .ok_or_else(|| {
                EdgarError::InvalidResponse(format!(
                    "Filing {} has no primaryDocument",
                    accession_number
                ))
            })?;

        let report_date = match recent.report_date.as_ref() {
            Some(dates) => parse_optional_date("reportDate", &dates[idx])?,
            None => None,
        };

        let acceptance_date_time = recent
            .get_vec_item_at(&recent.acceptance_date_time, idx)
            .filter(|s| !s.is_empty())
            .map(|s| {
                DateTime::parse_from_rfc3339(&s).map_err(|e| {
                    EdgarError::InvalidResponse(format!(
                        "Invalid acceptanceDateTime '{}' for filing {}: {}",
                        s, accession_number, e
                    ))
                })
            })
            .transpose()?;

        Ok(FilingRecord {
            filing_date: parse_date("filingDate", &recent.filing_date[idx])?,
            report_date,
            acceptance_date_time,
            act: recent.get_vec_item_at(&recent.act, idx),
            form: recent.form[idx].clone(),
            file_number: recent.get_vec_item_at(&recent.file_number, idx),
            film_number: recent.get_vec_item_at(&recent.film_number, idx),
            items: recent.get_vec_item_at(&recent.items, idx),
            size: recent.get_vec_item_at(&recent.size, idx),
            is_xbrl: recent.get_bool_at(&recent.is_xbrl, idx),
            is_inline_xbrl: recent.get_bool_at(&recent.is_inline_xbrl, idx),
            doc_extension,
            primary_doc_description: recent.get_vec_item_at(&recent.primary_doc_description, idx),
            accession_number,
        })
    }
}

/// Selects the filings of exactly `form_type`, most recent report date first.
///
/// Rows with equal report dates keep their upstream order; filings without a report
/// date come last. No match yields an empty vector.
///
/// # Errors
///
/// Returns `EdgarError::InvalidResponse` if the columns differ in length or a selected
/// row carries an unparsable date or no primary document.
pub fn select_filings(recent: &RecentFilings, form_type: &str) -> Result<Vec<FilingRecord>> {
    recent.validate()?;

    let mut records = (0..recent.len())
        .filter(|&idx| recent.form[idx] == form_type)
        .map(|idx| FilingRecord::try_from((recent, idx)))
        .collect::<Result<Vec<_>>>()?;

    records.sort_by(|a, b| b.report_date.cmp(&a.report_date));

    tracing::debug!(
        "Selected {} of {} recent filings with form {}",
        records.len(),
        recent.len(),
        form_type
    );
    Ok(records)
}

/// Applies `opts` to a registrant's recent filings: the filings of
/// `opts.form_type`, most recent first, cut to `opts.limit`.
///
/// A limit above the number of matching filings returns every match.
pub fn select_filings_with(
    recent: &RecentFilings,
    opts: &FilingOptions,
) -> Result<Vec<FilingRecord>> {
    let mut filings = select_filings(recent, &opts.form_type)?;

    if let Some(limit) = opts.limit {
        filings.truncate(limit);
    }

    Ok(filings)
}

#[derive(Debug)]
enum UrlType {
    Submission,
    FilingContent,
}

impl Edgar {
    fn build_url(&self, url_type: UrlType, params: &[&str]) -> String {
        match url_type {
            UrlType::Submission => {
                format!(
                    "{}/submissions/CIK{}.json",
                    self.edgar_data_url,
                    pad_cik(params[0])
                )
            }
            UrlType::FilingContent => {
                let (cik, acc_no, filename) = (params[0], params[1], params[2]);
                let formatted_acc = acc_no.replace('-', "");
                format!(
                    "{}/data/{}/{}/{}",
                    self.edgar_archives_url, cik, formatted_acc, filename
                )
            }
        }
    }
}

/// Filing history and document retrieval for the Edgar client.
///
/// # Examples
///
/// ```ignore
/// # use mdnakit::{Edgar, FilingOperations};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let edgar = Edgar::new("MyApp contact@example.com")?;
///
/// let quarterly = edgar.get_filings("0000320193", "10-Q").await?;
/// if let Some(latest) = quarterly.first() {
///     let html = edgar
///         .filing_content("0000320193", &latest.accession_number, &latest.doc_extension)
///         .await?;
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
impl FilingOperations for Edgar {
    /// Retrieves the submission document for a given CIK.
    ///
    /// # Errors
    ///
    /// * `EdgarError::NotFound` - unknown CIK
    /// * `EdgarError::JsonError` - the document did not have the expected shape
    async fn submissions(&self, cik: &str) -> Result<Submission> {
        let url = self.build_url(UrlType::Submission, &[cik]);
        let response = self.get(&url).await?;
        Ok(serde_json::from_str::<Submission>(&response)?)
    }

    /// Retrieves the filings of one form type, most recent first.
    async fn get_filings(&self, cik: &str, form_type: &str) -> Result<Vec<FilingRecord>> {
        self.recent_filings(cik, FilingOptions::new(form_type)).await
    }

    /// Retrieves the filings matching `opts`, most recent first.
    async fn recent_filings(&self, cik: &str, opts: FilingOptions) -> Result<Vec<FilingRecord>> {
        let submission = self.submissions(cik).await?;
        select_filings_with(&submission.filings.recent, &opts)
    }

    fn filing_url(&self, cik: &str, accession_number: &str, doc_extension: &str) -> String {
        self.build_url(UrlType::FilingContent, &[cik, accession_number, doc_extension])
    }

    async fn filing_content(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
    ) -> Result<String> {
        let url = self.filing_url(cik, accession_number, doc_extension);
        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recent(rows: &[(&str, &str, &str, &str)]) -> RecentFilings {
        RecentFilings {
            accession_number: rows.iter().map(|r| r.0.to_string()).collect(),
            form: rows.iter().map(|r| r.1.to_string()).collect(),
            report_date: Some(rows.iter().map(|r| r.2.to_string()).collect()),
            filing_date: rows.iter().map(|r| r.3.to_string()).collect(),
            primary_document: Some(rows.iter().map(|_| "doc.htm".to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_filings_round_trip() {
        let recent = recent(&[
            ("0001-23-000456", "10-Q", "2024-03-31", "2024-05-01"),
            ("0001-23-000789", "10-K", "2024-12-31", "2025-02-01"),
        ]);

        let filings = select_filings(&recent, "10-Q").unwrap();
        assert_eq!(filings.len(), 1);
        assert_eq!(filings[0].accession_number, "000123000456");
        assert_eq!(filings[0].doc_extension, "doc.htm");
    }

    #[test]
    fn test_select_filings_sorted_by_report_date_desc() {
        let recent = recent(&[
            ("a-1", "10-Q", "2023-06-30", "2023-08-01"),
            ("a-2", "10-Q", "2024-03-31", "2024-05-01"),
            ("a-3", "10-Q", "2023-12-31", "2024-02-01"),
            ("a-4", "10-Q", "2024-03-31", "2024-05-02"),
        ]);

        let filings = select_filings(&recent, "10-Q").unwrap();
        let order: Vec<&str> = filings.iter().map(|f| f.accession_number.as_str()).collect();
        assert_eq!(order, vec!["a2", "a4", "a3", "a1"]);
    }

    #[test]
    fn test_select_filings_form_is_exact() {
        let recent = recent(&[
            ("b-1", "10-Q/A", "2024-03-31", "2024-05-01"),
            ("b-2", "10-q", "2024-03-31", "2024-05-01"),
        ]);
        assert!(select_filings(&recent, "10-Q").unwrap().is_empty());
    }

    #[test]
    fn test_missing_report_date_sorts_last() {
        let recent = recent(&[
            ("c-1", "10-Q", "", "2024-05-01"),
            ("c-2", "10-Q", "2023-03-31", "2023-05-01"),
        ]);
        let filings = select_filings(&recent, "10-Q").unwrap();
        assert_eq!(filings[0].accession_number, "c2");
        assert_eq!(filings[1].report_date, None);
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let mut recent = recent(&[("d-1", "10-Q", "2024-03-31", "2024-05-01")]);
        recent.filing_date.push("2024-06-01".to_string());
        assert!(matches!(
            select_filings(&recent, "10-Q"),
            Err(EdgarError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unmatched_rows_are_not_parsed() {
        let recent = recent(&[
            ("e-1", "8-K", "not a date", "2024-05-01"),
            ("e-2", "10-Q", "2024-03-31", "2024-05-01"),
        ]);
        assert_eq!(select_filings(&recent, "10-Q").unwrap().len(), 1);
    }

    #[test]
    fn test_limit_keeps_most_recent() {
        let recent = recent(&[
            ("f-1", "10-Q", "2023-06-30", "2023-08-01"),
            ("f-2", "10-Q", "2024-03-31", "2024-05-01"),
            ("f-3", "10-K", "2024-09-28", "2024-11-01"),
            ("f-4", "10-Q", "2023-12-31", "2024-02-01"),
        ]);

        let opts = FilingOptions::new("10-Q").with_limit(2);
        let filings = select_filings_with(&recent, &opts).unwrap();
        let order: Vec<&str> = filings.iter().map(|f| f.accession_number.as_str()).collect();
        assert_eq!(order, vec!["f2", "f4"]);
    }

    #[test]
    fn test_limit_above_available_returns_all() {
        let recent = recent(&[
            ("g-1", "10-Q", "2024-03-31", "2024-05-01"),
            ("g-2", "10-Q", "2023-12-31", "2024-02-01"),
        ]);

        let filings = select_filings_with(&recent, &FilingOptions::new("10-Q").with_limit(4)).unwrap();
        assert_eq!(filings.len(), 2);

        let unlimited = select_filings_with(&recent, &FilingOptions::new("10-Q")).unwrap();
        assert_eq!(unlimited.len(), 2);
    }

    #[test]
    fn test_filing_url() {
        let edgar = Edgar::new("test_agent example@example.com").unwrap();
        let url = edgar.filing_url("0000320193", "0000320193-24-000069", "aapl-20240330.htm");
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/0000320193/000032019324000069/aapl-20240330.htm"
        );
    }

    #[test]
    fn test_submission_url_pads_cik() {
        let edgar = Edgar::new("test_agent example@example.com").unwrap();
        assert_eq!(
            edgar.build_url(UrlType::Submission, &["320193"]),
            "https://data.sec.gov/submissions/CIK0000320193.json"
        );
    }
}
