use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Markup parsing error: {0}")]
    XmlError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("No '{currency}' unit reported for {attribute} (CIK {cik})")]
    MissingUnit {
        cik: String,
        attribute: String,
        currency: String,
    },

    #[error(
        "No {form_type} observations of {standard}/{attribute} in {currency} for CIK {cik}"
    )]
    EmptyResult {
        cik: String,
        attribute: String,
        form_type: String,
        standard: String,
        currency: String,
    },

    #[error("MD&A section not found: {0}")]
    MalformedDocument(String),

    #[error("Filing {accession_number} (CIK {cik}): {source}")]
    Filing {
        cik: String,
        accession_number: String,
        #[source]
        source: Box<EdgarError>,
    },

    #[error("Sentiment classification failed: {0}")]
    Classification(String),

    #[error(
        "Unexpected content type from URL {url}. Expected pattern {expected_pattern}, but got Content-Type: {got_content_type}. Content preview: {content_preview}..."
    )]
    UnexpectedContentType {
        url: String,
        expected_pattern: String,
        got_content_type: String,
        content_preview: String,
    },
}

/// Broad failure classes callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upstream resource could not be reached or answered with an error status.
    Transport,
    /// The response body did not have the expected shape.
    Parse,
    /// A filter that must match at least one record matched none.
    EmptyResult,
    /// The section heuristic could not locate the MD&A.
    MalformedDocument,
    /// A ticker lookup found no registrant.
    Lookup,
    Config,
    Classification,
}

impl EdgarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EdgarError::RequestError(_)
            | EdgarError::NotFound(_)
            | EdgarError::UnexpectedStatus(_)
            | EdgarError::RateLimitExceeded => ErrorKind::Transport,
            EdgarError::InvalidResponse(_)
            | EdgarError::JsonError(_)
            | EdgarError::XmlError(_)
            | EdgarError::MissingUnit { .. }
            | EdgarError::UnexpectedContentType { .. } => ErrorKind::Parse,
            EdgarError::EmptyResult { .. } => ErrorKind::EmptyResult,
            EdgarError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            EdgarError::TickerNotFound(_) => ErrorKind::Lookup,
            EdgarError::ConfigError(_) => ErrorKind::Config,
            EdgarError::Classification(_) => ErrorKind::Classification,
            EdgarError::Filing { source, .. } => source.kind(),
        }
    }

    /// Attaches the filing a failure belongs to.
    pub fn in_filing(self, cik: &str, accession_number: &str) -> Self {
        EdgarError::Filing {
            cik: cik.to_string(),
            accession_number: accession_number.to_string(),
            source: Box::new(self),
        }
    }
}

#[cfg(feature = "mdna")]
impl From<quick_xml::Error> for EdgarError {
    fn from(error: quick_xml::Error) -> Self {
        EdgarError::XmlError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdgarError>;
