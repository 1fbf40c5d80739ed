//! Trait definitions organizing EDGAR operations by pipeline stage.
//!
//! Each stage of the pipeline has a trait that the `Edgar` client implements when the
//! matching feature is enabled: registrant and attribute lookups, filing history, and
//! MD&A extraction. Alternative implementations (fixtures, caches) can stand in for
//! the client behind these traits.

#[cfg(feature = "mdna")]
use super::batch::{MdnaOutcome, MdnaRecord};
#[cfg(feature = "company")]
use super::company::{AttributeObservation, CompanyConcept, Registrant};
use super::error::Result;
#[cfg(feature = "filings")]
use super::filings::{FilingRecord, Submission};
#[cfg(feature = "mdna")]
use super::mdna::MdnaStrategy;
#[cfg(feature = "company")]
use super::options::AttributeOptions;
#[cfg(feature = "mdna")]
use super::options::BatchOptions;
#[cfg(feature = "filings")]
use super::options::FilingOptions;
use async_trait::async_trait;

/// Registrant directory and XBRL attribute lookups.
#[cfg(feature = "company")]
#[async_trait]
pub trait CompanyOperations {
    /// Lists every registrant in the SEC ticker directory with a ten-digit CIK.
    async fn list_companies(&self) -> Result<Vec<Registrant>>;
    /// Resolves a ticker symbol to its registrant.
    async fn company_by_ticker(&self, ticker: &str) -> Result<Registrant>;
    /// Retrieves all reported values of one concept for a company.
    async fn company_concept(
        &self,
        cik: &str,
        standard: &str,
        attribute: &str,
    ) -> Result<CompanyConcept>;
    /// Retrieves one attribute as a time series, filtered by form type and currency.
    /// An empty selection is an error, not an empty vector.
    async fn get_attribute(
        &self,
        cik: &str,
        attribute: &str,
        opts: Option<AttributeOptions>,
    ) -> Result<Vec<AttributeObservation>>;
}

/// Filing history and filing document access.
#[cfg(feature = "filings")]
#[async_trait]
pub trait FilingOperations {
    /// Retrieves the submission document (metadata plus recent filings) for a CIK.
    async fn submissions(&self, cik: &str) -> Result<Submission>;
    /// Filings of exactly `form_type`, most recent report date first. May be empty.
    async fn get_filings(&self, cik: &str, form_type: &str) -> Result<Vec<FilingRecord>>;
    /// Same as `get_filings`, with an optional limit applied after sorting.
    async fn recent_filings(&self, cik: &str, opts: FilingOptions) -> Result<Vec<FilingRecord>>;
    /// Builds the archive URL of one document of a filing.
    fn filing_url(&self, cik: &str, accession_number: &str, doc_extension: &str) -> String;
    /// Downloads one document of a filing as text.
    async fn filing_content(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
    ) -> Result<String>;
}

/// MD&A extraction for single filings and for a company's recent quarters.
#[cfg(feature = "mdna")]
#[async_trait]
pub trait MdnaOperations {
    /// Extracts the MD&A of one filing with the default `ItemOrdinal` strategy.
    async fn extract_mdna(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
    ) -> Result<String>;
    /// Extracts the MD&A of one filing with the given strategy.
    async fn extract_mdna_with(
        &self,
        cik: &str,
        accession_number: &str,
        doc_extension: &str,
        strategy: &dyn MdnaStrategy,
    ) -> Result<String>;
    /// MD&A of the most recent `quarters` 10-Q filings; the first failure aborts.
    async fn recent_mdna(&self, cik: &str, quarters: usize) -> Result<Vec<MdnaRecord>>;
    /// As `recent_mdna`, with a custom strategy and concurrency.
    async fn recent_mdna_with(
        &self,
        cik: &str,
        quarters: usize,
        opts: BatchOptions,
    ) -> Result<Vec<MdnaRecord>>;
    /// One outcome per filing; failures of individual filings do not abort the batch.
    async fn recent_mdna_outcomes(
        &self,
        cik: &str,
        quarters: usize,
        opts: BatchOptions,
    ) -> Result<Vec<MdnaOutcome>>;
}
