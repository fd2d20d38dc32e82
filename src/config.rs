use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::path::Path;

/// Report labels and layout limits. Every field has a default, so a config
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportOptions {
    pub insurance: String,
    pub plan: String,
    /// Shown when the input has no `billing_code` column.
    pub fallback_billing_code: String,
    pub top_city_limit: usize,
    pub city_name_max_chars: usize,
    pub histogram_bins: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            insurance: "EMPLOYER".to_string(),
            plan: "360-orthopedics".to_string(),
            fallback_billing_code: "27130".to_string(),
            top_city_limit: 15,
            city_name_max_chars: 20,
            histogram_bins: 25,
        }
    }
}

impl ReportOptions {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let opts: ReportOptions =
            serde_json::from_str(s).map_err(|e| ReportError::Config(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(ReportError::Config("histogram_bins must be at least 1".into()));
        }
        if self.city_name_max_chars == 0 {
            return Err(ReportError::Config("city_name_max_chars must be at least 1".into()));
        }
        if self.top_city_limit == 0 {
            return Err(ReportError::Config("top_city_limit must be at least 1".into()));
        }
        Ok(())
    }
}
