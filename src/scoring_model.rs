use crate::errors::ModelError;
use crate::taxonomy::SignalTaxonomy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

// ============ Categories & Weights ============

/// The six scoring dimensions every lead is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    /// Fit against the ideal customer profile.
    CompanyFit,
    /// Funding, hiring, and growth-rate signals.
    GrowthIndicators,
    /// Stack compatibility and competitor-tool presence.
    TechnologyFit,
    /// Web traffic, social presence, and data recency.
    EngagementSignals,
    /// Trigger events and outreach-window timing.
    TimingSignals,
    /// Direct purchasing-intent evidence.
    BuyingSignals,
}

impl ScoreCategory {
    /// All categories in aggregation order.
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::CompanyFit,
        ScoreCategory::GrowthIndicators,
        ScoreCategory::TechnologyFit,
        ScoreCategory::EngagementSignals,
        ScoreCategory::TimingSignals,
        ScoreCategory::BuyingSignals,
    ];

    /// Maximum raw points a category scorer can award.
    pub fn cap(&self) -> f64 {
        match self {
            ScoreCategory::CompanyFit => 25.0,
            ScoreCategory::GrowthIndicators => 20.0,
            ScoreCategory::TechnologyFit => 15.0,
            ScoreCategory::EngagementSignals => 15.0,
            ScoreCategory::TimingSignals => 15.0,
            ScoreCategory::BuyingSignals => 10.0,
        }
    }

    /// Stable snake_case key used in serialized breakdowns.
    pub fn key(&self) -> &'static str {
        match self {
            ScoreCategory::CompanyFit => "company_fit",
            ScoreCategory::GrowthIndicators => "growth_indicators",
            ScoreCategory::TechnologyFit => "technology_fit",
            ScoreCategory::EngagementSignals => "engagement_signals",
            ScoreCategory::TimingSignals => "timing_signals",
            ScoreCategory::BuyingSignals => "buying_signals",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::CompanyFit => "company fit",
            ScoreCategory::GrowthIndicators => "growth indicators",
            ScoreCategory::TechnologyFit => "technology fit",
            ScoreCategory::EngagementSignals => "engagement signals",
            ScoreCategory::TimingSignals => "timing signals",
            ScoreCategory::BuyingSignals => "buying signals",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Relative importance of each category in the total score.
///
/// Weights are validated, never auto-normalized: a model whose weights do
/// not sum to 1.0 is rejected at engine construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub company_fit: f64,
    pub growth_indicators: f64,
    pub technology_fit: f64,
    pub engagement_signals: f64,
    pub timing_signals: f64,
    pub buying_signals: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            company_fit: 0.25,
            growth_indicators: 0.20,
            technology_fit: 0.15,
            engagement_signals: 0.15,
            timing_signals: 0.15,
            buying_signals: 0.10,
        }
    }
}

impl ScoringWeights {
    /// The weight configured for `category`.
    pub fn for_category(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::CompanyFit => self.company_fit,
            ScoreCategory::GrowthIndicators => self.growth_indicators,
            ScoreCategory::TechnologyFit => self.technology_fit,
            ScoreCategory::EngagementSignals => self.engagement_signals,
            ScoreCategory::TimingSignals => self.timing_signals,
            ScoreCategory::BuyingSignals => self.buying_signals,
        }
    }

    fn pairs(&self) -> [(&'static str, f64); 6] {
        [
            ("company_fit", self.company_fit),
            ("growth_indicators", self.growth_indicators),
            ("technology_fit", self.technology_fit),
            ("engagement_signals", self.engagement_signals),
            ("timing_signals", self.timing_signals),
            ("buying_signals", self.buying_signals),
        ]
    }

    /// Reject out-of-range weights and sums away from 1.0.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (category, value) in self.pairs() {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(ModelError::WeightOutOfRange { category, value });
            }
        }

        let total: f64 = self.pairs().iter().map(|(_, v)| v).sum();
        if (total - 1.0).abs() > 0.01 {
            return Err(ModelError::WeightSumMismatch { total });
        }

        Ok(())
    }
}

// ============ ICP & Thresholds ============

/// The ideal customer profile: which companies the model is tuned to find.
///
/// Referenced both by company-fit scoring and by rule conditions whose
/// `in`/`intersects` operators name one of the list fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealCustomerProfile {
    /// Target industries (lowercase).
    pub target_industries: Vec<String>,
    /// Minimum headcount for an ideal fit.
    pub company_size_min: Option<u32>,
    /// Maximum headcount for an ideal fit.
    pub company_size_max: Option<u32>,
    /// Minimum annual revenue in USD.
    pub revenue_min: Option<f64>,
    /// Maximum annual revenue in USD.
    pub revenue_max: Option<f64>,
    /// Technologies an ideal customer already runs (lowercase).
    pub target_technologies: Vec<String>,
    /// Roles the product is sold to (lowercase).
    pub target_roles: Vec<String>,
    /// Geographic regions in focus (lowercase).
    pub geographic_regions: Vec<String>,
    /// Funding stages in focus (lowercase).
    pub funding_stages: Vec<String>,
    /// Industries to avoid.
    pub excluded_industries: Vec<String>,
    /// Technologies that disqualify a company.
    pub excluded_technologies: Vec<String>,
}

impl Default for IdealCustomerProfile {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            target_industries: strings(&["technology", "software", "saas", "fintech", "e-commerce"]),
            company_size_min: Some(50),
            company_size_max: Some(500),
            revenue_min: None,
            revenue_max: None,
            target_technologies: strings(&[
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
            target_roles: strings(&["marketing", "growth", "operations", "revenue"]),
            geographic_regions: strings(&["north america"]),
            funding_stages: strings(&["series a", "series b", "series c"]),
            excluded_industries: Vec::new(),
            excluded_technologies: Vec::new(),
        }
    }
}

impl IdealCustomerProfile {
    /// Resolve a named list field for rule evaluation.
    ///
    /// Unknown names resolve to the empty list, which makes the referencing
    /// rule a non-match rather than an error.
    pub fn list_by_name(&self, name: &str) -> &[String] {
        match name {
            "target_industries" => &self.target_industries,
            "target_technologies" => &self.target_technologies,
            "target_roles" => &self.target_roles,
            "geographic_regions" => &self.geographic_regions,
            "funding_stages" => &self.funding_stages,
            "excluded_industries" => &self.excluded_industries,
            "excluded_technologies" => &self.excluded_technologies,
            _ => &[],
        }
    }
}

/// Score cut points mapping a total score to a qualification tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationThresholds {
    /// Scores at or above this are Hot.
    pub hot_threshold: f64,
    /// Scores at or above this are Warm.
    pub warm_threshold: f64,
    /// Scores at or above this are Cold; below is Unqualified.
    pub cold_threshold: f64,
    /// Data quality below this floor triggers a one-step tier downgrade
    /// during qualification reconciliation.
    pub min_data_quality: f64,
}

impl Default for QualificationThresholds {
    fn default() -> Self {
        Self {
            hot_threshold: 80.0,
            warm_threshold: 60.0,
            cold_threshold: 40.0,
            min_data_quality: 40.0,
        }
    }
}

impl QualificationThresholds {
    /// Reject thresholds that are out of range or not strictly descending.
    pub fn validate(&self) -> Result<(), ModelError> {
        let fields = [
            ("hot_threshold", self.hot_threshold),
            ("warm_threshold", self.warm_threshold),
            ("cold_threshold", self.cold_threshold),
            ("min_data_quality", self.min_data_quality),
        ];
        for (name, value) in fields {
            if !(0.0..=100.0).contains(&value) || !value.is_finite() {
                return Err(ModelError::ThresholdOutOfRange { name, value });
            }
        }

        if !(self.hot_threshold > self.warm_threshold && self.warm_threshold > self.cold_threshold) {
            return Err(ModelError::ThresholdsOutOfOrder {
                hot: self.hot_threshold,
                warm: self.warm_threshold,
                cold: self.cold_threshold,
            });
        }

        Ok(())
    }
}

// ============ Rules ============

/// A declarative condition evaluated against one lead field.
///
/// `field` is a dotted path (e.g. `"metrics.employee_count"`), `operator`
/// one of the names understood by [`crate::rules`], and `value` the literal
/// or ICP-list name the operator compares against. Unresolvable fields and
/// unknown operators make the condition a non-match, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Dotted field path on the lead.
    pub field: String,
    /// Operator name (`eq`, `gt`, `lt`, `in`, `contains`, `intersects`,
    /// `within_days`).
    pub operator: String,
    /// Comparison literal, or the name of an ICP list for `in`/`intersects`.
    pub value: serde_json::Value,
}

/// A custom scoring adjustment applied when its condition matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Rule name, recorded in `LeadScore::applied_rules` when it fires.
    pub name: String,
    /// Category the rule is associated with (reporting only).
    pub category: ScoreCategory,
    /// The condition to evaluate.
    pub condition: RuleCondition,
    /// Points added to (or removed from) the total, -100..100.
    pub score_impact: f64,
    /// Multiplier applied to the impact, 0..1.
    #[serde(default = "default_rule_weight")]
    pub weight: f64,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

fn default_rule_weight() -> f64 {
    1.0
}

// ============ Scoring Model ============

/// The full declarative configuration for one scoring run.
///
/// Immutable once an engine is built from it; safe to share across
/// concurrent scoring calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringModel {
    /// Model name, for reporting.
    pub name: String,
    /// Model version, for reporting.
    pub version: String,
    /// Category weights.
    pub weights: ScoringWeights,
    /// Ideal customer profile.
    pub icp: IdealCustomerProfile,
    /// Qualification thresholds.
    pub thresholds: QualificationThresholds,
    /// Keyword tables for the category scorers and intent analyzer.
    pub taxonomy: SignalTaxonomy,
    /// Custom rules evaluated on every lead, in order.
    pub global_rules: Vec<ScoringRule>,
    /// Ceiling the final score is clamped to.
    pub max_score: f64,
    /// Whether to dampen the total by data quality.
    pub apply_data_quality_penalty: bool,
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self {
            name: "Default Lead Scoring Model".to_string(),
            version: "1.0".to_string(),
            weights: ScoringWeights::default(),
            icp: IdealCustomerProfile::default(),
            thresholds: QualificationThresholds::default(),
            taxonomy: SignalTaxonomy::default(),
            global_rules: ScoringModel::default_rules(),
            max_score: 100.0,
            apply_data_quality_penalty: true,
        }
    }
}

impl ScoringModel {
    /// The out-of-the-box rule set.
    pub fn default_rules() -> Vec<ScoringRule> {
        vec![
            ScoringRule {
                name: "Target industry match".to_string(),
                category: ScoreCategory::CompanyFit,
                condition: RuleCondition {
                    field: "industry".to_string(),
                    operator: "in".to_string(),
                    value: json!("target_industries"),
                },
                score_impact: 20.0,
                weight: 1.0,
                description: Some("Company is in a target industry".to_string()),
            },
            ScoringRule {
                name: "Recent funding".to_string(),
                category: ScoreCategory::GrowthIndicators,
                condition: RuleCondition {
                    field: "metrics.last_funding_date".to_string(),
                    operator: "within_days".to_string(),
                    value: json!(180),
                },
                score_impact: 15.0,
                weight: 1.0,
                description: Some("Funding round closed within six months".to_string()),
            },
            ScoringRule {
                name: "High hiring velocity".to_string(),
                category: ScoreCategory::GrowthIndicators,
                condition: RuleCondition {
                    field: "buying_signals.recent_hiring".to_string(),
                    operator: "gt".to_string(),
                    value: json!(5),
                },
                score_impact: 10.0,
                weight: 1.0,
                description: Some("Actively hiring, a growth signal".to_string()),
            },
            ScoringRule {
                name: "Technology stack match".to_string(),
                category: ScoreCategory::TechnologyFit,
                condition: RuleCondition {
                    field: "tech_stack".to_string(),
                    operator: "intersects".to_string(),
                    value: json!("target_technologies"),
                },
                score_impact: 12.0,
                weight: 1.0,
                description: Some("Runs complementary technologies".to_string()),
            },
        ]
    }

    /// Validate the whole model; called by engine constructors.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.weights.validate()?;
        self.thresholds.validate()?;

        if self.max_score < 1.0 || !self.max_score.is_finite() {
            return Err(ModelError::InvalidMaxScore(self.max_score));
        }

        for rule in &self.global_rules {
            if !(-100.0..=100.0).contains(&rule.score_impact) || !rule.score_impact.is_finite() {
                return Err(ModelError::InvalidRuleImpact {
                    rule: rule.name.clone(),
                    impact: rule.score_impact,
                });
            }
            if !(0.0..=1.0).contains(&rule.weight) || !rule.weight.is_finite() {
                return Err(ModelError::InvalidRuleWeight {
                    rule: rule.name.clone(),
                    weight: rule.weight,
                });
            }
        }

        Ok(())
    }
}
