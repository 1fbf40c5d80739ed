//! Recent MD&A sentiment example
//!
//! This example walks the whole pipeline for one company:
//! - Resolve a ticker to its CIK
//! - Extract the MD&A of the most recent quarterly reports
//! - Score every sentence and print a sentiment time series
//!
//! The classifier here is a small word list standing in for a financial language
//! model. `EDGAR_USER_AGENT` must hold your own contact string.
//!
//! Run with: `EDGAR_USER_AGENT="YourAppName you@example.com" cargo run --example recent_mdna -- AAPL 4`

use mdnakit::{
    BatchOptions, Classification, CompanyOperations, Edgar, MdnaOperations, Result,
    SentimentClassifier, SentimentLabel, SentimentScorer,
};
use std::env;
use std::error::Error;

const POSITIVE: &[&str] = &["increase", "improve", "growth", "strong", "gain", "record"];
const NEGATIVE: &[&str] = &["decrease", "decline", "loss", "weak", "adverse", "impair"];

struct WordListClassifier;

impl SentimentClassifier for WordListClassifier {
    fn classify(&self, sentences: &[&str]) -> Result<Vec<Classification>> {
        Ok(sentences
            .iter()
            .map(|sentence| {
                let lower = sentence.to_lowercase();
                let positive = POSITIVE.iter().filter(|w| lower.contains(*w)).count();
                let negative = NEGATIVE.iter().filter(|w| lower.contains(*w)).count();
                let label = match positive.cmp(&negative) {
                    std::cmp::Ordering::Greater => SentimentLabel::Positive,
                    std::cmp::Ordering::Less => SentimentLabel::Negative,
                    std::cmp::Ordering::Equal => SentimentLabel::Neutral,
                };
                let hits = (positive + negative) as f32;
                Classification {
                    label,
                    score: if hits == 0.0 { 0.5 } else { positive.max(negative) as f32 / hits },
                }
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    let Ok(user_agent) = env::var("EDGAR_USER_AGENT") else {
        eprintln!("usage: EDGAR_USER_AGENT=\"YourAppName contact@example.com\" \\");
        eprintln!("       cargo run --example recent_mdna -- [TICKER] [QUARTERS]");
        eprintln!("SEC.gov requires a contact string in the User-Agent header.");
        std::process::exit(2);
    };
    let mut args = env::args().skip(1);
    let ticker = args.next().unwrap_or_else(|| "AAPL".to_string());
    let quarters: usize = args.next().map(|q| q.parse::<usize>()).transpose()?.unwrap_or(4);

    let edgar = Edgar::new(&user_agent)?;

    println!("=== mdnakit Recent MD&A Example ===\n");

    let registrant = edgar.company_by_ticker(&ticker).await?;
    println!("✓ {} ({}) has CIK {}\n", registrant.title, registrant.ticker, registrant.id);

    println!("Extracting MD&A from the last {} quarterly reports...", quarters);
    let outcomes = edgar
        .recent_mdna_outcomes(&registrant.id, quarters, BatchOptions::new())
        .await?;

    let scorer = SentimentScorer::with_classifier(WordListClassifier);

    for outcome in outcomes {
        let accession_number = outcome.accession_number.clone();
        match outcome.into_record() {
            Ok(record) => {
                let scored = scorer.score_record(&record)?;
                println!(
                    "   {}  {:>6} sentences  net sentiment {:+.3}",
                    scored.end_date,
                    scored.sentences.len(),
                    scored.net_sentiment().unwrap_or(0.0)
                );
            }
            Err(e) => println!("   {}  skipped: {}", accession_number, e),
        }
    }

    Ok(())
}
