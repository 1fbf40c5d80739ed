//! Registrant directory and XBRL concept endpoints.
//!
//! Two pieces of SEC-provided data live here:
//! - The ticker directory, which maps every listed company to its CIK. The CIK is
//!   normalized to ten zero-padded digits because the data API encodes it in paths.
//! - Per-concept XBRL series ("companyconcept"), from which a single attribute such as
//!   `Revenues` is pulled as a time series for one form type, taxonomy and currency.
//!
//! Both requests are followed by the client's fixed `request_delay`.

use super::CompanyOperations;
use super::Edgar;
use super::error::{EdgarError, Result};
use super::options::AttributeOptions;
use super::parsing::utils::{deserialize_cik, pad_cik};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the SEC ticker directory, as published.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompanyTicker {
    #[serde(rename = "cik_str", deserialize_with = "deserialize_cik")]
    pub cik: u64,
    pub ticker: String,
    pub title: String,
}

/// A company that files with the SEC, keyed by its canonical CIK.
///
/// `id` is always ten digits, zero-padded (`"0000320193"` for Apple).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    pub id: String,
    pub ticker: String,
    pub title: String,
}

impl From<CompanyTicker> for Registrant {
    fn from(row: CompanyTicker) -> Self {
        Registrant {
            id: pad_cik(&row.cik.to_string()),
            ticker: row.ticker,
            title: row.title,
        }
    }
}

/// A single reported value of an XBRL concept.
///
/// Instant concepts (balance sheet items) have no `start`; duration concepts
/// (income statement items) do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
    pub val: f64,
    pub accn: String,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    pub form: String,
    pub filed: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

/// Every reported value of one concept for one company, grouped by unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConcept {
    pub cik: u64,
    pub taxonomy: String,
    pub tag: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub units: HashMap<String, Vec<AttributeObservation>>,
}

/// Parses the `company_tickers.json` directory into registrants.
///
/// The document is an object keyed by a running index (`"0"`, `"1"`, ...); the result
/// follows that index numerically.
pub fn parse_company_tickers(content: &str) -> Result<Vec<Registrant>> {
    let map: HashMap<String, CompanyTicker> = serde_json::from_str(content)?;

    let mut rows: Vec<(String, CompanyTicker)> = map.into_iter().collect();
    rows.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));

    Ok(rows.into_iter().map(|(_, row)| row.into()).collect())
}

/// Picks the observations of one currency and form type out of a concept document.
///
/// # Errors
///
/// * `EdgarError::MissingUnit` - the concept is not reported in `opts.currency`
/// * `EdgarError::EmptyResult` - the unit exists but holds no `opts.form_type` rows;
///   this usually means the wrong taxonomy, currency or form was asked for
pub fn select_observations(
    mut concept: CompanyConcept,
    cik: &str,
    opts: &AttributeOptions,
) -> Result<Vec<AttributeObservation>> {
    let mut observations =
        concept
            .units
            .remove(&opts.currency)
            .ok_or_else(|| EdgarError::MissingUnit {
                cik: pad_cik(cik),
                attribute: concept.tag.clone(),
                currency: opts.currency.clone(),
            })?;

    let reported = observations.len();
    observations.retain(|obs| obs.form == opts.form_type);
    tracing::debug!(
        "{}/{}: kept {} of {} {} observations for form {}",
        concept.taxonomy,
        concept.tag,
        observations.len(),
        reported,
        opts.currency,
        opts.form_type
    );

    if observations.is_empty() {
        return Err(EdgarError::EmptyResult {
            cik: pad_cik(cik),
            attribute: concept.tag,
            form_type: opts.form_type.clone(),
            standard: opts.standard.clone(),
            currency: opts.currency.clone(),
        });
    }

    Ok(observations)
}

#[derive(Debug)]
enum CompanyUrlType {
    CompanyTickers,
    CompanyConcept,
}

impl Edgar {
    fn build_company_url(&self, url_type: CompanyUrlType, params: &[&str]) -> String {
        match url_type {
            CompanyUrlType::CompanyTickers => {
                format!("{}/company_tickers.json", self.edgar_files_url)
            }
            CompanyUrlType::CompanyConcept => {
                let (cik, taxonomy, tag) = (params[0], params[1], params[2]);
                format!(
                    "{}/api/xbrl/companyconcept/CIK{}/{}/{}.json",
                    self.edgar_data_url,
                    pad_cik(cik),
                    taxonomy,
                    tag
                )
            }
        }
    }
}

/// Company directory and attribute operations.
///
/// # Examples
///
/// ```ignore
/// # use mdnakit::{Edgar, CompanyOperations, AttributeOptions};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let edgar = Edgar::new("MyApp contact@example.com")?;
///
/// let apple = edgar.company_by_ticker("AAPL").await?;
/// let revenue = edgar
///     .get_attribute(&apple.id, "Revenues", Some(AttributeOptions::new().with_form_type("10-Q")))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
impl CompanyOperations for Edgar {
    /// Retrieves the whole ticker directory.
    ///
    /// # Errors
    ///
    /// * `EdgarError::RequestError` / `EdgarError::NotFound` - transport failures
    /// * `EdgarError::JsonError` - the directory did not have the expected shape
    async fn list_companies(&self) -> Result<Vec<Registrant>> {
        let url = self.build_company_url(CompanyUrlType::CompanyTickers, &[]);
        let response = self.get(&url).await;
        self.pause().await;

        let registrants = parse_company_tickers(&response?)?;
        tracing::debug!("Ticker directory lists {} registrants", registrants.len());
        Ok(registrants)
    }

    /// Finds the registrant listed under `ticker` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `EdgarError::TickerNotFound` if no directory row carries the ticker.
    async fn company_by_ticker(&self, ticker: &str) -> Result<Registrant> {
        let wanted = ticker.trim().to_uppercase();
        self.list_companies()
            .await?
            .into_iter()
            .find(|r| r.ticker.to_uppercase() == wanted)
            .ok_or_else(|| EdgarError::TickerNotFound(ticker.to_string()))
    }

    /// Fetches every reported value of `attribute` under `standard` for a company.
    async fn company_concept(
        &self,
        cik: &str,
        standard: &str,
        attribute: &str,
    ) -> Result<CompanyConcept> {
        let url =
            self.build_company_url(CompanyUrlType::CompanyConcept, &[cik, standard, attribute]);
        let response = self.get(&url).await;
        self.pause().await;
        Ok(serde_json::from_str(&response?)?)
    }

    /// Retrieves the values of `attribute` across filings of one form type.
    ///
    /// `opts` defaults to `10-K`, `us-gaap`, `USD`.
    ///
    /// # Errors
    ///
    /// * `EdgarError::MissingUnit` - the currency key is absent
    /// * `EdgarError::EmptyResult` - no observation of the requested form type
    /// * transport and JSON errors from the request
    async fn get_attribute(
        &self,
        cik: &str,
        attribute: &str,
        opts: Option<AttributeOptions>,
    ) -> Result<Vec<AttributeObservation>> {
        let opts = opts.unwrap_or_default();
        let concept = self.company_concept(cik, &opts.standard, attribute).await?;
        select_observations(concept, cik, &opts)
    }
}
