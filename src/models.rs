use crate::errors::ModelError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============ Qualification ============

/// Sales-readiness tier assigned by the scoring and qualification engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualificationStatus {
    /// Score below the cold threshold; not worth outreach yet.
    Unqualified,
    /// Score at or above the cold threshold.
    Cold,
    /// Score at or above the warm threshold.
    Warm,
    /// Score at or above the hot threshold; immediate outreach candidate.
    Hot,
}

impl QualificationStatus {
    /// One tier up, saturating at `Hot`.
    pub fn upgraded(self) -> Self {
        match self {
            QualificationStatus::Unqualified => QualificationStatus::Cold,
            QualificationStatus::Cold => QualificationStatus::Warm,
            QualificationStatus::Warm => QualificationStatus::Hot,
            QualificationStatus::Hot => QualificationStatus::Hot,
        }
    }

    /// One tier down, saturating at `Unqualified`.
    pub fn downgraded(self) -> Self {
        match self {
            QualificationStatus::Hot => QualificationStatus::Warm,
            QualificationStatus::Warm => QualificationStatus::Cold,
            QualificationStatus::Cold => QualificationStatus::Unqualified,
            QualificationStatus::Unqualified => QualificationStatus::Unqualified,
        }
    }
}

impl fmt::Display for QualificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualificationStatus::Hot => "Hot",
            QualificationStatus::Warm => "Warm",
            QualificationStatus::Cold => "Cold",
            QualificationStatus::Unqualified => "Unqualified",
        };
        write!(f, "{}", label)
    }
}

/// Annual revenue band reported by enrichment providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueRange {
    /// Under $1M annual revenue.
    #[serde(rename = "0-1M")]
    Startup,
    /// $1M to $10M.
    #[serde(rename = "1M-10M")]
    Small,
    /// $10M to $100M.
    #[serde(rename = "10M-100M")]
    Medium,
    /// $100M to $1B.
    #[serde(rename = "100M-1B")]
    Large,
    /// Over $1B.
    #[serde(rename = "1B+")]
    Enterprise,
}

impl RevenueRange {
    /// The band label as reported by data providers.
    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueRange::Startup => "0-1M",
            RevenueRange::Small => "1M-10M",
            RevenueRange::Medium => "10M-100M",
            RevenueRange::Large => "100M-1B",
            RevenueRange::Enterprise => "1B+",
        }
    }
}

// ============ Lead Sub-Records ============

/// A person attached to a lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin_url: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Firmographic metrics gathered from enrichment sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyMetrics {
    /// Headcount.
    #[serde(default)]
    pub employee_count: Option<u32>,
    /// Annual revenue band.
    #[serde(default)]
    pub revenue_range: Option<RevenueRange>,
    /// Year-over-year growth percentage, 0-100.
    #[serde(default)]
    pub growth_rate: Option<f64>,
    /// Most recent funding round size in USD.
    #[serde(default)]
    pub funding_amount: Option<f64>,
    /// Funding stage label (e.g. "Series B").
    #[serde(default)]
    pub funding_stage: Option<String>,
    /// Date of the most recent funding round.
    #[serde(default)]
    pub last_funding_date: Option<DateTime<Utc>>,
}

/// Detected tools and platforms, grouped by function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnologyStack {
    /// Core technologies (languages, infrastructure, databases).
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Marketing platforms.
    #[serde(default)]
    pub marketing_tools: Vec<String>,
    /// Sales and CRM tools.
    #[serde(default)]
    pub sales_tools: Vec<String>,
    /// Analytics and BI tools.
    #[serde(default)]
    pub analytics_tools: Vec<String>,
}

impl TechnologyStack {
    /// All four lists flattened in declaration order.
    pub fn all(&self) -> Vec<&str> {
        self.technologies
            .iter()
            .chain(self.marketing_tools.iter())
            .chain(self.sales_tools.iter())
            .chain(self.analytics_tools.iter())
            .map(String::as_str)
            .collect()
    }

    /// Whether no tool is known in any category.
    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
            && self.marketing_tools.is_empty()
            && self.sales_tools.is_empty()
            && self.analytics_tools.is_empty()
    }
}

/// Observable signals suggesting active purchasing behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyingSignals {
    /// Titles of currently open job postings.
    #[serde(default)]
    pub job_postings: Vec<String>,
    /// Number of hires in the recent window.
    #[serde(default)]
    pub recent_hiring: Option<u32>,
    /// Budget-related signals (e.g. "martech budget approved").
    #[serde(default)]
    pub budget_indicators: Vec<String>,
    /// Whether key decision makers changed recently.
    #[serde(default)]
    pub decision_maker_changes: bool,
    /// Expansion-related signals (new offices, markets, scaling).
    #[serde(default)]
    pub expansion_signals: Vec<String>,
}

// ============ Lead ============

/// The canonical company/lead record scored by the engines.
///
/// Ownership note: storage assigns `id` and owns the record lifecycle; the
/// engines read a lead and return results without mutating it. Derived
/// fields (`lead_score`, `qualification_status`, `score_breakdown`) are
/// written back only through [`crate::scorer::LeadScore::apply_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Opaque identifier assigned by the storage layer.
    #[serde(default)]
    pub id: Option<String>,
    /// Company name (required, non-empty).
    pub company_name: String,
    /// Primary web domain (required, validated hostname).
    pub domain: String,
    /// Industry classification.
    #[serde(default)]
    pub industry: Option<String>,
    /// Finer-grained industry segment.
    #[serde(default)]
    pub sub_industry: Option<String>,
    /// Known people at the company.
    #[serde(default)]
    pub contacts: Vec<ContactInfo>,
    /// Firmographic metrics.
    #[serde(default)]
    pub metrics: CompanyMetrics,
    /// Detected technology stack.
    #[serde(default)]
    pub tech_stack: TechnologyStack,
    /// Buying-behavior signals.
    #[serde(default)]
    pub buying_signals: BuyingSignals,
    /// Last computed lead score, 0-100.
    #[serde(default)]
    pub lead_score: Option<f64>,
    /// Qualification tier from the last score computation.
    #[serde(default)]
    pub qualification_status: Option<QualificationStatus>,
    /// Per-category raw scores from the last computation.
    #[serde(default)]
    pub score_breakdown: BTreeMap<String, f64>,
    /// Enrichment-assessed data quality, 0-100.
    #[serde(default)]
    pub data_quality_score: Option<f64>,
    /// Fraction of fields populated, 0-100.
    #[serde(default)]
    pub completeness_percentage: Option<f64>,
    /// When the record was last enriched.
    #[serde(default)]
    pub last_enriched: Option<DateTime<Utc>>,
    /// Names of the enrichment sources consulted.
    #[serde(default)]
    pub data_sources: Vec<String>,
    /// Headquarters location string.
    #[serde(default)]
    pub headquarters: Option<String>,
    /// Additional office locations.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Global web traffic rank (lower is busier).
    #[serde(default)]
    pub website_traffic_rank: Option<u64>,
    /// Social channel name to profile URL.
    #[serde(default)]
    pub social_media_presence: BTreeMap<String, String>,
    /// Record creation timestamp.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Create a lead with the two required identity fields.
    ///
    /// Rejects empty company names and malformed domains; every other field
    /// starts absent and may be filled by enrichment.
    pub fn new(company_name: impl Into<String>, domain: impl Into<String>) -> Result<Self, ModelError> {
        let company_name = company_name.into();
        let domain = domain.into();

        if company_name.trim().is_empty() {
            return Err(ModelError::EmptyCompanyName);
        }
        if !is_valid_domain(&domain) {
            return Err(ModelError::InvalidDomain(domain));
        }

        let now = Utc::now();
        Ok(Self {
            id: None,
            company_name,
            domain,
            industry: None,
            sub_industry: None,
            contacts: Vec::new(),
            metrics: CompanyMetrics::default(),
            tech_stack: TechnologyStack::default(),
            buying_signals: BuyingSignals::default(),
            lead_score: None,
            qualification_status: None,
            score_breakdown: BTreeMap::new(),
            data_quality_score: None,
            completeness_percentage: None,
            last_enriched: None,
            data_sources: Vec::new(),
            headquarters: None,
            locations: Vec::new(),
            website_traffic_rank: None,
            social_media_presence: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Validate a bare hostname (no scheme, no path).
///
/// Accepts dotted labels of letters, digits, and hyphens with an alphabetic
/// TLD of at least two characters.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.len() < 4 || domain.len() > 253 {
        return false;
    }

    let domain_regex = Regex::new(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
    )
    .unwrap();

    domain_regex.is_match(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_domains_accepted() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("example-tech.com"));
        assert!(is_valid_domain("sub.example.co.uk"));
        assert!(is_valid_domain("a1.io"));
    }

    #[test]
    fn invalid_domains_rejected() {
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("no-tld"));
        assert!(!is_valid_domain("https://example.com"));
        assert!(!is_valid_domain("exa mple.com"));
        assert!(!is_valid_domain("-bad.com"));
        assert!(!is_valid_domain("example.c0m"));
    }

    #[test]
    fn lead_construction_validates_identity() {
        assert!(Lead::new("Acme", "acme.io").is_ok());
        assert_eq!(Lead::new("  ", "acme.io"), Err(ModelError::EmptyCompanyName));
        assert_eq!(
            Lead::new("Acme", "not a domain"),
            Err(ModelError::InvalidDomain("not a domain".to_string()))
        );
    }

    #[test]
    fn tier_steps_saturate() {
        assert_eq!(QualificationStatus::Hot.upgraded(), QualificationStatus::Hot);
        assert_eq!(QualificationStatus::Warm.upgraded(), QualificationStatus::Hot);
        assert_eq!(
            QualificationStatus::Unqualified.downgraded(),
            QualificationStatus::Unqualified
        );
        assert_eq!(QualificationStatus::Hot.downgraded(), QualificationStatus::Warm);
    }

    #[test]
    fn tech_stack_flattens_in_order() {
        let stack = TechnologyStack {
            technologies: vec!["Python".into()],
            marketing_tools: vec!["HubSpot".into()],
            sales_tools: vec!["Salesforce".into()],
            analytics_tools: vec![],
        };
        assert_eq!(stack.all(), vec!["Python", "HubSpot", "Salesforce"]);
        assert!(!stack.is_empty());
        assert!(TechnologyStack::default().is_empty());
    }
}
