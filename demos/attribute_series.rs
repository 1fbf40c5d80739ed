//! Attribute time series example
//!
//! This example retrieves one XBRL attribute across a company's reports:
//! - Quarterly values from 10-Q filings
//! - Asking for a currency the company does not report in
//!
//! `EDGAR_USER_AGENT` must hold your own contact string.
//!
//! Run with: `EDGAR_USER_AGENT="YourAppName you@example.com" cargo run --example attribute_series -- 0000320193 AccountsPayableCurrent`

use mdnakit::{AttributeOptions, CompanyOperations, Edgar, ErrorKind};
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let Ok(user_agent) = env::var("EDGAR_USER_AGENT") else {
        eprintln!("usage: EDGAR_USER_AGENT=\"YourAppName contact@example.com\" \\");
        eprintln!("       cargo run --example attribute_series -- [CIK] [ATTRIBUTE]");
        eprintln!("SEC.gov requires a contact string in the User-Agent header.");
        std::process::exit(2);
    };
    let mut args = env::args().skip(1);
    let cik = args.next().unwrap_or_else(|| "0000320193".to_string());
    let attribute = args
        .next()
        .unwrap_or_else(|| "AccountsPayableCurrent".to_string());

    let edgar = Edgar::new(&user_agent)?;

    println!("=== mdnakit Attribute Series Example ===\n");

    let opts = AttributeOptions::new().with_form_type("10-Q");
    let observations = edgar.get_attribute(&cik, &attribute, Some(opts)).await?;
    println!("✓ {} quarterly values of {}:", observations.len(), attribute);
    for obs in observations.iter().rev().take(8) {
        println!(
            "   {}  {:>18.0}  {} {}",
            obs.end,
            obs.val,
            obs.fp.as_deref().unwrap_or("-"),
            obs.accn
        );
    }

    let opts = AttributeOptions::new().with_currency("EUR");
    match edgar.get_attribute(&cik, &attribute, Some(opts)).await {
        Ok(observations) => println!("\n✓ {} EUR values", observations.len()),
        Err(e) if e.kind() == ErrorKind::Parse => println!("\n✓ No EUR series: {}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
