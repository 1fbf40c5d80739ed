use crate::{EdgarError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de::Error};

/// Width of a canonical CIK as used in `data.sec.gov` paths.
pub const CIK_WIDTH: usize = 10;

/// Left-pads a CIK with zeros to the canonical ten digits.
///
/// ```rust
/// use mdnakit::parsing::utils::pad_cik;
/// assert_eq!(pad_cik("320193"), "0000320193");
/// assert_eq!(pad_cik("0000320193"), "0000320193");
/// ```
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>width$}", cik.trim(), width = CIK_WIDTH)
}

/// Deserializes a CIK that may be encoded either as a JSON number or a string.
pub fn deserialize_cik<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCik {
        Number(u64),
        Text(String),
    }

    match RawCik::deserialize(deserializer)? {
        RawCik::Number(n) => Ok(n),
        RawCik::Text(s) => s.trim().parse::<u64>().map_err(Error::custom),
    }
}

/// Parses an EDGAR `YYYY-MM-DD` date, naming the field on failure.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        EdgarError::InvalidResponse(format!("Invalid {} '{}': {}", field, value, e))
    })
}

/// Like [`parse_date`], but an empty value means "not reported".
pub fn parse_optional_date(field: &str, value: &str) -> Result<Option<NaiveDate>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(field, value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_cik() {
        assert_eq!(pad_cik("1750"), "0000001750");
        assert_eq!(pad_cik(" 320193 "), "0000320193");
        assert_eq!(pad_cik("0000320193").len(), CIK_WIDTH);
    }

    #[test]
    fn test_deserialize_cik_number_or_string() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_cik")]
            cik: u64,
        }

        let number: Row = serde_json::from_str(r#"{"cik": 320193}"#).unwrap();
        let text: Row = serde_json::from_str(r#"{"cik": "0000320193"}"#).unwrap();
        assert_eq!(number.cik, 320193);
        assert_eq!(text.cik, 320193);
        assert!(serde_json::from_str::<Row>(r#"{"cik": "abc"}"#).is_err());
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(
            parse_date("reportDate", "2024-03-31").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert_eq!(parse_optional_date("reportDate", "").unwrap(), None);
        assert!(parse_date("filingDate", "03/31/2024").is_err());
    }
}
