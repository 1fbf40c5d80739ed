//! Collecting MD&A text across a company's recent filings.
//!
//! Both collectors keep the order of the input filings. With `concurrency` above one,
//! up to that many extractions run at once and results are still yielded in filing
//! order.

use super::error::{EdgarError, Result};
use super::filings::FilingRecord;
use chrono::NaiveDate;
use futures_util::{StreamExt, TryStreamExt, stream};
use serde::Serialize;
use std::future::Future;

/// The MD&A of one filing, keyed by the end of the period it reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MdnaRecord {
    pub end_date: NaiveDate,
    pub mdna: String,
}

/// Result of extracting the MD&A of one filing when failures are isolated.
#[derive(Debug)]
pub struct MdnaOutcome {
    pub accession_number: String,
    pub end_date: Option<NaiveDate>,
    pub result: Result<String>,
}

impl MdnaOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Converts a successful outcome with a known report date into a record.
    pub fn into_record(self) -> Result<MdnaRecord> {
        let end_date = self
            .end_date
            .ok_or_else(|| missing_report_date(&self.accession_number))?;
        Ok(MdnaRecord {
            end_date,
            mdna: self.result?,
        })
    }
}

fn missing_report_date(accession_number: &str) -> EdgarError {
    EdgarError::InvalidResponse(format!(
        "filing {accession_number} has no report date"
    ))
}

/// Extracts the MD&A of every filing, recording failures per filing.
///
/// A failure of one filing never stops the others; it is logged and kept in that
/// filing's [`MdnaOutcome`].
///
/// `extract` is called for every filing before the returned future is first polled.
/// The futures it returns are lazy and only run while the batch is awaited.
pub fn collect_mdna<'a, F, Fut>(
    filings: &'a [FilingRecord],
    concurrency: usize,
    extract: F,
) -> impl Future<Output = Vec<MdnaOutcome>> + 'a
where
    F: Fn(&'a FilingRecord) -> Fut,
    Fut: Future<Output = Result<String>> + 'a,
{
    let pending: Vec<Fut> = filings.iter().map(extract).collect();

    async move {
        let results: Vec<Result<String>> = stream::iter(pending)
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let outcomes: Vec<MdnaOutcome> = filings
            .iter()
            .zip(results)
            .map(|(filing, result)| {
                if let Err(e) = &result {
                    tracing::warn!("Skipping filing {}: {}", filing.accession_number, e);
                }
                MdnaOutcome {
                    accession_number: filing.accession_number.clone(),
                    end_date: filing.report_date,
                    result,
                }
            })
            .collect();

        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        tracing::info!(
            "Extracted MD&A from {} of {} filings",
            succeeded,
            outcomes.len()
        );
        outcomes
    }
}

/// Extracts the MD&A of every filing; the first failure in filing order aborts the
/// batch and is returned.
///
/// A filing without a report date fails before its document is requested, and no
/// filing after it is extracted.
pub fn try_collect_mdna<'a, F, Fut>(
    filings: &'a [FilingRecord],
    concurrency: usize,
    extract: F,
) -> impl Future<Output = Result<Vec<MdnaRecord>>> + 'a
where
    F: Fn(&'a FilingRecord) -> Fut,
    Fut: Future<Output = Result<String>> + 'a,
{
    let dated = filings
        .iter()
        .position(|f| f.report_date.is_none())
        .unwrap_or(filings.len());
    let (ready, rest) = filings.split_at(dated);

    let end_dates: Vec<NaiveDate> = ready.iter().filter_map(|f| f.report_date).collect();
    let pending: Vec<Fut> = ready.iter().map(extract).collect();
    let undated = rest.first().map(|f| f.accession_number.as_str());

    async move {
        let texts: Vec<String> = stream::iter(pending)
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        if let Some(accession_number) = undated {
            return Err(missing_report_date(accession_number));
        }

        let records: Vec<MdnaRecord> = end_dates
            .into_iter()
            .zip(texts)
            .map(|(end_date, mdna)| MdnaRecord { end_date, mdna })
            .collect();
        tracing::info!("Extracted MD&A from {} filings", records.len());
        Ok::<_, EdgarError>(records)
    }
}
