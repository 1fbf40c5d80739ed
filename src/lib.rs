//! # mdnakit - MD&A retrieval from SEC EDGAR filings
//!
//! mdnakit resolves companies to their EDGAR filing history, downloads quarterly
//! reports and extracts the "Management's Discussion and Analysis" (MD&A) section, so
//! that management commentary can be tracked over time and scored sentence by
//! sentence.
//!
//! ## Features
//!
//! - **Rate-limited HTTP client** - Complies with SEC.gov fair access rules
//! - **Company directory** - Ticker to CIK resolution and XBRL attribute time series
//! - **Filing history** - Filings of one form type, most recent report first
//! - **MD&A extraction** - Pluggable strategies over the flattened filing text
//! - **Batch collection** - Abort-on-first-failure or per-filing outcomes, optionally
//!   concurrent
//! - **Sentiment scoring** - Sentence segmentation plus a caller-supplied classifier
//!
//! ## Requirements
//!
//! mdnakit is async and requires a runtime such as [tokio](https://tokio.rs). SEC.gov
//! requires every request to identify its sender, so the client is built from a
//! contact string and refuses to start without one.
//!
//! ## Basic Usage
//!
//! ```ignore
//! use mdnakit::{CompanyOperations, Edgar, MdnaOperations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let edgar = Edgar::new("YourAppName contact@example.com")?;
//!
//!     let apple = edgar.company_by_ticker("AAPL").await?;
//!     for record in edgar.recent_mdna(&apple.id, 4).await? {
//!         println!("{}: {} chars of MD&A", record.end_date, record.mdna.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
pub mod parsing;

#[cfg(any(feature = "company", feature = "filings"))]
mod options;

#[cfg(any(feature = "company", feature = "filings"))]
mod traits;

#[cfg(feature = "mdna")]
mod batch;
#[cfg(feature = "company")]
mod company;
#[cfg(feature = "filings")]
mod filings;
#[cfg(feature = "mdna")]
mod mdna;
#[cfg(feature = "sentiment")]
mod sentiment;

// Core Edgar functionality (always available)
pub use config::{EdgarConfig, EdgarUrls};
pub use core::Edgar;
pub use error::{EdgarError, ErrorKind, Result};

#[cfg(feature = "company")]
pub use options::AttributeOptions;
#[cfg(feature = "mdna")]
pub use options::BatchOptions;
#[cfg(feature = "filings")]
pub use options::FilingOptions;

#[cfg(feature = "mdna")]
pub use batch::{MdnaOutcome, MdnaRecord, collect_mdna, try_collect_mdna};
#[cfg(feature = "company")]
pub use company::{
    AttributeObservation, CompanyConcept, CompanyTicker, Registrant, parse_company_tickers,
    select_observations,
};
#[cfg(feature = "filings")]
pub use filings::{
    FilingRecord, FilingsData, RecentFilings, Submission, select_filings, select_filings_with,
};
#[cfg(feature = "mdna")]
pub use mdna::{
    HeadingMatch, ItemOrdinal, MdnaStrategy, QUARTERLY_FORM, mdna_from_markup,
    split_item_sections,
};
#[cfg(feature = "sentiment")]
pub use sentiment::{
    Classification, PunctuationSegmenter, ScoredFiling, ScoredSentence, SentenceSegmenter,
    SentimentClassifier, SentimentLabel, SentimentScorer,
};

#[cfg(feature = "company")]
pub use traits::CompanyOperations;
#[cfg(feature = "filings")]
pub use traits::FilingOperations;
#[cfg(feature = "mdna")]
pub use traits::MdnaOperations;

/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
