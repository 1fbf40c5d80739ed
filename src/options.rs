#[cfg(feature = "mdna")]
use crate::mdna::{ItemOrdinal, MdnaStrategy};
#[cfg(feature = "mdna")]
use std::sync::Arc;

/// Options for selecting filings from a registrant's history
#[cfg(feature = "filings")]
#[derive(Debug, Clone)]
pub struct FilingOptions {
    /// Exact, case-sensitive form type to keep (e.g. "10-Q")
    pub form_type: String,
    /// Keep at most this many filings after sorting, most recent first
    pub limit: Option<usize>,
}

#[cfg(feature = "filings")]
impl FilingOptions {
    pub fn new(form_type: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Options for an attribute time-series request
///
/// Defaults to annual reports (`10-K`) under `us-gaap`, reported in `USD`.
#[cfg(feature = "company")]
#[derive(Debug, Clone)]
pub struct AttributeOptions {
    pub form_type: String,
    pub standard: String,
    pub currency: String,
}

#[cfg(feature = "company")]
impl Default for AttributeOptions {
    fn default() -> Self {
        Self {
            form_type: "10-K".to_string(),
            standard: "us-gaap".to_string(),
            currency: "USD".to_string(),
        }
    }
}

#[cfg(feature = "company")]
impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form_type(mut self, form_type: impl Into<String>) -> Self {
        self.form_type = form_type.into();
        self
    }

    /// Accounting taxonomy, e.g. "us-gaap" or "ifrs-full"
    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.standard = standard.into();
        self
    }

    /// Unit key under `units`, e.g. "USD" or "TWD"
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Options for collecting MD&A text across several filings
///
/// `concurrency` bounds how many documents are in flight at once; results keep the
/// order of the filings regardless. The client's rate limiter applies to every
/// request either way.
#[cfg(feature = "mdna")]
#[derive(Clone)]
pub struct BatchOptions {
    pub concurrency: usize,
    pub strategy: Arc<dyn MdnaStrategy>,
}

#[cfg(feature = "mdna")]
impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            strategy: Arc::new(ItemOrdinal::default()),
        }
    }
}

#[cfg(feature = "mdna")]
impl std::fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOptions")
            .field("concurrency", &self.concurrency)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

#[cfg(feature = "mdna")]
impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values below one are treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_strategy(mut self, strategy: impl MdnaStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }
}
