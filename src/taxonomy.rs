//! Keyword and lookup tables consumed by the scoring and intent engines.
//!
//! Everything here is data, not logic: swapping a table changes what the
//! engines react to without touching how they aggregate. The defaults
//! describe a B2B marketing/sales tooling vendor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All keyword tables used by category scorers and the intent analyzer.
///
/// Matching against these tables is case-insensitive substring or membership
/// matching; entries are stored lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalTaxonomy {
    /// Industry name to compatibility multiplier for non-ICP industries.
    pub industry_multipliers: BTreeMap<String, f64>,
    /// Technologies that integrate well with the product.
    pub compatible_technologies: Vec<String>,
    /// Competitor products whose presence signals a displacement opportunity.
    pub competitor_technologies: Vec<String>,
    /// Keywords indicating a modern stack.
    pub modern_stack_indicators: Vec<String>,
    /// Cities in top-tier markets.
    pub major_market_cities: Vec<String>,
    /// US/Canada market keywords.
    pub us_canada_markets: Vec<String>,
    /// Other English-speaking market keywords.
    pub english_speaking_markets: Vec<String>,
    /// Keywords indicating content/thought-leadership activity.
    pub thought_leadership_indicators: Vec<String>,
    /// Keywords indicating in-flight system changes.
    pub adoption_keywords: Vec<String>,
    /// Role keywords that make a job posting relevant to buying signals.
    pub relevant_roles: Vec<String>,
    /// Keywords suggesting efficiency pain points.
    pub pain_point_keywords: Vec<String>,
    /// Job titles that strongly indicate buying intent.
    pub high_intent_roles: Vec<String>,
    /// Job titles that moderately indicate buying intent.
    pub medium_intent_roles: Vec<String>,
    /// Seniority keywords marking decision makers.
    pub decision_maker_roles: Vec<String>,
    /// Tooling/operations keywords in job postings.
    pub tech_ops_keywords: Vec<String>,
    /// Keywords marking outdated tooling ripe for modernization.
    pub outdated_technologies: Vec<String>,
    /// Keywords marking expansion activity.
    pub expansion_keywords: Vec<String>,
    /// Titles bucketed as buying-committee decision makers.
    pub committee_decision_roles: Vec<String>,
    /// Titles bucketed as buying-committee influencers.
    pub committee_influencer_roles: Vec<String>,
    /// Titles bucketed as buying-committee technical evaluators.
    pub committee_technical_roles: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SignalTaxonomy {
    fn default() -> Self {
        let industry_multipliers = [
            ("technology", 1.2),
            ("software", 1.2),
            ("saas", 1.3),
            ("fintech", 1.1),
            ("healthcare", 1.0),
            ("e-commerce", 1.1),
            ("marketing", 0.9),
            ("consulting", 0.8),
            ("manufacturing", 0.7),
            ("retail", 0.8),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            industry_multipliers,
            compatible_technologies: strings(&[
                "python",
                "react",
                "node.js",
                "aws",
                "postgresql",
                "redis",
                "docker",
                "kubernetes",
                "api",
                "microservices",
            ]),
            competitor_technologies: strings(&[
                "salesforce",
                "hubspot",
                "marketo",
                "pardot",
                "mailchimp",
                "constant-contact",
                "pipedrive",
            ]),
            modern_stack_indicators: strings(&[
                "api",
                "cloud",
                "microservices",
                "docker",
                "kubernetes",
                "saas",
            ]),
            major_market_cities: strings(&[
                "san francisco",
                "new york",
                "seattle",
                "boston",
                "austin",
            ]),
            us_canada_markets: strings(&["usa", "us", "united states", "canada"]),
            english_speaking_markets: strings(&["uk", "australia", "ireland", "new zealand"]),
            thought_leadership_indicators: strings(&[
                "blog", "content", "webinar", "podcast", "speaking",
            ]),
            adoption_keywords: strings(&["migration", "upgrade", "implementation", "new system"]),
            relevant_roles: strings(&[
                "marketing",
                "growth",
                "digital",
                "automation",
                "operations",
                "technology",
            ]),
            pain_point_keywords: strings(&[
                "inefficient",
                "manual",
                "time-consuming",
                "outdated",
                "challenge",
            ]),
            high_intent_roles: strings(&[
                "vp marketing",
                "marketing director",
                "growth lead",
                "head of growth",
            ]),
            medium_intent_roles: strings(&[
                "marketing manager",
                "digital marketing",
                "marketing analyst",
            ]),
            decision_maker_roles: strings(&["cmo", "ceo", "vp", "director", "head of"]),
            tech_ops_keywords: strings(&[
                "automation",
                "analytics",
                "crm",
                "marketing ops",
                "martech",
            ]),
            outdated_technologies: strings(&[
                "legacy",
                "on-premise",
                "excel",
                "manual",
                "spreadsheet",
            ]),
            expansion_keywords: strings(&[
                "expansion",
                "new market",
                "scaling",
                "growth",
                "international",
            ]),
            committee_decision_roles: strings(&["ceo", "cmo", "vp marketing", "head of growth"]),
            committee_influencer_roles: strings(&["marketing manager", "operations", "analyst"]),
            committee_technical_roles: strings(&["cto", "engineering", "it", "developer"]),
        }
    }
}

/// Case-insensitive: does `haystack` contain any keyword from `table`?
pub fn matches_any(haystack: &str, table: &[String]) -> bool {
    let lower = haystack.to_lowercase();
    table.iter().any(|keyword| lower.contains(keyword))
}

/// Case-insensitive: the keywords from `table` contained in `haystack`.
pub fn matching_keywords<'a>(haystack: &str, table: &'a [String]) -> Vec<&'a str> {
    let lower = haystack.to_lowercase();
    table
        .iter()
        .filter(|keyword| lower.contains(keyword.as_str()))
        .map(String::as_str)
        .collect()
}
