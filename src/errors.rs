use std::fmt;

/// Errors raised when a scoring model or lead fails construction-time validation.
///
/// These are the only failures the engines surface: once an engine has been
/// built from a valid model, scoring and qualification are total over any
/// combination of present/absent lead fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A category weight is outside [0, 1].
    WeightOutOfRange {
        /// The category whose weight is invalid.
        category: &'static str,
        /// The offending weight value.
        value: f64,
    },
    /// Category weights do not sum to 1.0 (within tolerance).
    WeightSumMismatch {
        /// The actual sum of the six weights.
        total: f64,
    },
    /// Qualification thresholds are not strictly descending (hot > warm > cold).
    ThresholdsOutOfOrder {
        /// Hot threshold.
        hot: f64,
        /// Warm threshold.
        warm: f64,
        /// Cold threshold.
        cold: f64,
    },
    /// A threshold value is outside [0, 100].
    ThresholdOutOfRange {
        /// Name of the threshold field.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
    /// The configured maximum score is below 1.
    InvalidMaxScore(f64),
    /// A scoring rule's impact is outside [-100, 100].
    InvalidRuleImpact {
        /// Name of the rule.
        rule: String,
        /// The offending impact value.
        impact: f64,
    },
    /// A scoring rule's weight is outside [0, 1].
    InvalidRuleWeight {
        /// Name of the rule.
        rule: String,
        /// The offending weight value.
        weight: f64,
    },
    /// A lead was constructed with an empty company name.
    EmptyCompanyName,
    /// A lead was constructed with a domain that is not a valid hostname.
    InvalidDomain(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::WeightOutOfRange { category, value } => {
                write!(f, "weight for '{}' must be in [0, 1], got {}", category, value)
            }
            ModelError::WeightSumMismatch { total } => {
                write!(f, "category weights must sum to 1.0, got {}", total)
            }
            ModelError::ThresholdsOutOfOrder { hot, warm, cold } => write!(
                f,
                "thresholds must satisfy hot > warm > cold, got {}/{}/{}",
                hot, warm, cold
            ),
            ModelError::ThresholdOutOfRange { name, value } => {
                write!(f, "threshold '{}' must be in [0, 100], got {}", name, value)
            }
            ModelError::InvalidMaxScore(value) => {
                write!(f, "max_score must be at least 1, got {}", value)
            }
            ModelError::InvalidRuleImpact { rule, impact } => write!(
                f,
                "rule '{}' has score_impact {} outside [-100, 100]",
                rule, impact
            ),
            ModelError::InvalidRuleWeight { rule, weight } => {
                write!(f, "rule '{}' has weight {} outside [0, 1]", rule, weight)
            }
            ModelError::EmptyCompanyName => write!(f, "company_name must not be empty"),
            ModelError::InvalidDomain(domain) => {
                write!(f, "'{}' is not a valid domain name", domain)
            }
        }
    }
}

impl std::error::Error for ModelError {}
