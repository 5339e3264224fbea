//! The lead scoring engine.
//!
//! Scores a lead across six categories, applies the model's custom rules,
//! dampens by data quality, and maps the total to a qualification tier.
//! Scoring is pure and total: given a valid model, any lead scores without
//! error regardless of which optional fields are present, and the same lead
//! with the same clock always produces the same result.

use crate::errors::ModelError;
use crate::models::{Lead, QualificationStatus};
use crate::rules::rule_matches;
use crate::scoring_model::{ScoreCategory, ScoringModel};
use crate::taxonomy::{matches_any, matching_keywords};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// ============ Score Output ============

/// One observed signal that contributed points to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// What was observed.
    pub factor: String,
    /// Points awarded for it.
    pub impact: f64,
    /// The underlying value, rendered for display.
    pub value: String,
}

/// Per-category breakdown with the factors and follow-ups behind the number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    /// The category explained.
    pub category: ScoreCategory,
    /// Raw points awarded, already capped.
    pub score: f64,
    /// The category cap.
    pub max_score: f64,
    /// Signals that contributed points.
    pub factors: Vec<ScoreFactor>,
    /// Data gaps worth closing to sharpen this category.
    pub recommendations: Vec<String>,
}

/// The complete result of scoring one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    /// Final score, 0 to the model's `max_score`.
    pub total_score: f64,
    /// Raw (pre-weighting) points per category.
    pub category_scores: BTreeMap<ScoreCategory, f64>,
    /// Per-category explanations in aggregation order.
    pub explanations: Vec<ScoreExplanation>,
    /// Tier implied by the total score alone.
    pub qualification_status: QualificationStatus,
    /// How much to trust this score, 0-1, from data quality and completeness.
    pub confidence: f64,
    /// Points removed by the data-quality penalty (zero or negative).
    pub data_quality_impact: f64,
    /// Names of the custom rules that fired, in model order.
    pub applied_rules: Vec<String>,
    /// Suggestions for strengthening weak categories.
    pub improvement_suggestions: Vec<String>,
    /// Recommended next steps for the assigned tier.
    pub next_actions: Vec<String>,
    /// When to reach out.
    pub outreach_timing: String,
    /// How to reach out.
    pub outreach_approach: String,
}

impl LeadScore {
    /// Write the derived fields back onto a lead record.
    pub fn apply_to(&self, lead: &mut Lead, now: DateTime<Utc>) {
        lead.lead_score = Some(self.total_score);
        lead.qualification_status = Some(self.qualification_status);
        lead.score_breakdown = self
            .category_scores
            .iter()
            .map(|(category, score)| (category.key().to_string(), *score))
            .collect();
        lead.updated_at = now;
    }
}

// ============ Engine ============

/// Scores leads against one immutable [`ScoringModel`].
///
/// Construction validates the model; after that, scoring never fails.
#[derive(Debug, Clone)]
pub struct LeadScoringEngine {
    model: ScoringModel,
}

impl LeadScoringEngine {
    /// Build an engine from a validated model.
    pub fn new(model: ScoringModel) -> Result<Self, ModelError> {
        model.validate()?;
        Ok(Self { model })
    }

    /// Build an engine from the default model.
    pub fn with_defaults() -> Self {
        Self {
            model: ScoringModel::default(),
        }
    }

    /// The model this engine scores with.
    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// Score a lead against the current wall clock.
    pub fn score_lead(&self, lead: &Lead) -> LeadScore {
        self.score_lead_at(lead, Utc::now())
    }

    /// Score a lead at an explicit point in time.
    ///
    /// All date-relative signals (funding recency, enrichment freshness,
    /// quarter boundaries) are computed against `now`, so a fixed clock
    /// yields a fully deterministic score.
    pub fn score_lead_at(&self, lead: &Lead, now: DateTime<Utc>) -> LeadScore {
        let mut category_scores = BTreeMap::new();
        let mut explanations = Vec::with_capacity(ScoreCategory::ALL.len());
        let mut total = 0.0;

        for category in ScoreCategory::ALL {
            let (raw, factors, recommendations) = self.score_category(lead, category, now);
            let capped = raw.min(category.cap());
            // Normalize by the cap so weights, not caps, set each
            // category's share of the total.
            total += capped / category.cap() * self.model.weights.for_category(category)
                * self.model.max_score;
            category_scores.insert(category, capped);
            explanations.push(ScoreExplanation {
                category,
                score: capped,
                max_score: category.cap(),
                factors,
                recommendations,
            });
        }

        let mut applied_rules = Vec::new();
        for rule in &self.model.global_rules {
            if rule_matches(lead, rule, &self.model.icp, now) {
                total += rule.score_impact * rule.weight;
                applied_rules.push(rule.name.clone());
            }
        }

        let mut data_quality_impact = 0.0;
        if self.model.apply_data_quality_penalty {
            if let Some(quality) = lead.data_quality_score {
                let penalty = total.max(0.0) * (1.0 - quality / 100.0) * 0.2;
                total -= penalty;
                data_quality_impact = -penalty;
            }
        }

        let total_score = total.clamp(0.0, self.model.max_score);
        let qualification_status = self.qualify(total_score);
        let confidence = confidence_for(lead);
        let improvement_suggestions = improvement_suggestions(&explanations);
        let next_actions = next_actions_for(qualification_status);
        let (outreach_timing, outreach_approach) = outreach_for(total_score);

        debug!(
            company = %lead.company_name,
            score = total_score,
            status = %qualification_status,
            rules = applied_rules.len(),
            "scored lead"
        );

        LeadScore {
            total_score,
            category_scores,
            explanations,
            qualification_status,
            confidence,
            data_quality_impact,
            applied_rules,
            improvement_suggestions,
            next_actions,
            outreach_timing,
            outreach_approach,
        }
    }

    /// Map a score to its tier using the model thresholds.
    pub fn qualify(&self, score: f64) -> QualificationStatus {
        let thresholds = &self.model.thresholds;
        if score >= thresholds.hot_threshold {
            QualificationStatus::Hot
        } else if score >= thresholds.warm_threshold {
            QualificationStatus::Warm
        } else if score >= thresholds.cold_threshold {
            QualificationStatus::Cold
        } else {
            QualificationStatus::Unqualified
        }
    }

    fn score_category(
        &self,
        lead: &Lead,
        category: ScoreCategory,
        now: DateTime<Utc>,
    ) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        match category {
            ScoreCategory::CompanyFit => self.score_company_fit(lead),
            ScoreCategory::GrowthIndicators => self.score_growth(lead, now),
            ScoreCategory::TechnologyFit => self.score_technology(lead),
            ScoreCategory::EngagementSignals => self.score_engagement(lead, now),
            ScoreCategory::TimingSignals => self.score_timing(lead, now),
            ScoreCategory::BuyingSignals => self.score_buying(lead),
        }
    }

    // ============ Category Scorers ============

    fn score_company_fit(&self, lead: &Lead) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();
        let icp = &self.model.icp;
        let taxonomy = &self.model.taxonomy;

        match &lead.industry {
            Some(industry) => {
                let lower = industry.to_lowercase();
                if icp.target_industries.iter().any(|t| lower.contains(t)) {
                    score += 8.0;
                    factors.push(ScoreFactor {
                        factor: format!("Industry: {} (target market)", industry),
                        impact: 8.0,
                        value: industry.clone(),
                    });
                } else if let Some((_, multiplier)) = taxonomy
                    .industry_multipliers
                    .iter()
                    .find(|(keyword, _)| lower.contains(keyword.as_str()))
                {
                    let points = 6.0 * multiplier;
                    score += points;
                    factors.push(ScoreFactor {
                        factor: format!("Industry: {} (adjacent market)", industry),
                        impact: points,
                        value: industry.clone(),
                    });
                } else {
                    score += 3.0;
                    factors.push(ScoreFactor {
                        factor: format!("Industry: {} (identified)", industry),
                        impact: 3.0,
                        value: industry.clone(),
                    });
                }
            }
            None => recommendations.push("Identify the company's industry".to_string()),
        }

        match lead.metrics.employee_count {
            Some(count) => {
                let in_icp_range = match (icp.company_size_min, icp.company_size_max) {
                    (Some(min), Some(max)) => (min..=max).contains(&count),
                    (Some(min), None) => count >= min,
                    (None, Some(max)) => count <= max,
                    (None, None) => false,
                };
                let points = if in_icp_range {
                    8.0
                } else if (20..=1000).contains(&count) {
                    6.0
                } else if (10..=2000).contains(&count) {
                    4.0
                } else {
                    2.0
                };
                score += points;
                factors.push(ScoreFactor {
                    factor: format!("Company size: {} employees", count),
                    impact: points,
                    value: count.to_string(),
                });
            }
            None => recommendations.push("Determine company headcount".to_string()),
        }

        if let Some(revenue) = &lead.metrics.revenue_range {
            score += 5.0;
            factors.push(ScoreFactor {
                factor: format!("Revenue range: {}", revenue.as_str()),
                impact: 5.0,
                value: revenue.as_str().to_string(),
            });
        }

        match &lead.headquarters {
            Some(headquarters) => {
                let points = if matches_any(headquarters, &taxonomy.major_market_cities) {
                    4.0
                } else if matches_any(headquarters, &taxonomy.us_canada_markets) {
                    3.0
                } else if matches_any(headquarters, &taxonomy.english_speaking_markets) {
                    2.0
                } else {
                    1.0
                };
                score += points;
                factors.push(ScoreFactor {
                    factor: format!("Location: {}", headquarters),
                    impact: points,
                    value: headquarters.clone(),
                });
            }
            None => recommendations.push("Locate the company's headquarters".to_string()),
        }

        (score, factors, recommendations)
    }

    fn score_growth(&self, lead: &Lead, now: DateTime<Utc>) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();

        match lead.metrics.last_funding_date {
            Some(funded) => {
                let days = now.signed_duration_since(funded).num_days();
                let points = if days <= 90 {
                    6.0
                } else if days <= 180 {
                    4.0
                } else if days <= 365 {
                    2.0
                } else {
                    0.0
                };
                if points > 0.0 {
                    score += points;
                    factors.push(ScoreFactor {
                        factor: format!("Funding round {} days ago", days),
                        impact: points,
                        value: funded.format("%Y-%m-%d").to_string(),
                    });
                }
            }
            None => recommendations.push("Research recent funding history".to_string()),
        }

        match lead.buying_signals.recent_hiring {
            Some(hires) => {
                let points = if hires >= 10 {
                    6.0
                } else if hires >= 5 {
                    4.0
                } else if hires >= 2 {
                    2.0
                } else {
                    0.0
                };
                if points > 0.0 {
                    score += points;
                    factors.push(ScoreFactor {
                        factor: format!("{} recent hires", hires),
                        impact: points,
                        value: hires.to_string(),
                    });
                }
            }
            None => recommendations.push("Track recent hiring activity".to_string()),
        }

        let posting_count = lead.buying_signals.job_postings.len();
        if posting_count > 0 {
            let points = (posting_count as f64).min(4.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} open job postings", posting_count),
                impact: points,
                value: posting_count.to_string(),
            });
        }

        if let Some(rate) = lead.metrics.growth_rate {
            let points = if rate >= 50.0 {
                4.0
            } else if rate >= 25.0 {
                3.0
            } else if rate >= 10.0 {
                2.0
            } else {
                1.0
            };
            score += points;
            factors.push(ScoreFactor {
                factor: format!("Growth rate {:.0}%", rate),
                impact: points,
                value: format!("{:.0}", rate),
            });
        }

        (score, factors, recommendations)
    }

    fn score_technology(&self, lead: &Lead) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();
        let taxonomy = &self.model.taxonomy;

        if lead.tech_stack.is_empty() {
            factors.push(ScoreFactor {
                factor: "No technology data".to_string(),
                impact: 0.0,
                value: String::new(),
            });
            recommendations.push("Enrich the technology stack from web signals".to_string());
            return (0.0, factors, recommendations);
        }

        let stack: Vec<String> = lead
            .tech_stack
            .all()
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();

        let compatible: Vec<&String> = stack
            .iter()
            .filter(|tool| taxonomy.compatible_technologies.contains(tool))
            .collect();
        if !compatible.is_empty() {
            let points = (compatible.len() as f64 * 2.0).min(8.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} compatible technologies", compatible.len()),
                impact: points,
                value: compatible
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let competitors: Vec<&String> = stack
            .iter()
            .filter(|tool| taxonomy.competitor_technologies.contains(tool))
            .collect();
        if !competitors.is_empty() {
            let points = (competitors.len() as f64 * 3.0).min(5.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} competitor tools in use", competitors.len()),
                impact: points,
                value: competitors
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        if stack
            .iter()
            .any(|tool| taxonomy.modern_stack_indicators.contains(tool))
        {
            score += 2.0;
            factors.push(ScoreFactor {
                factor: "Modern stack indicators".to_string(),
                impact: 2.0,
                value: String::new(),
            });
        }

        (score, factors, recommendations)
    }

    fn score_engagement(
        &self,
        lead: &Lead,
        now: DateTime<Utc>,
    ) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();
        let taxonomy = &self.model.taxonomy;

        match lead.website_traffic_rank {
            Some(rank) => {
                let points = if rank <= 100_000 {
                    5.0
                } else if rank <= 500_000 {
                    3.0
                } else if rank <= 1_000_000 {
                    2.0
                } else {
                    1.0
                };
                score += points;
                factors.push(ScoreFactor {
                    factor: format!("Web traffic rank {}", rank),
                    impact: points,
                    value: rank.to_string(),
                });
            }
            None => recommendations.push("Measure website traffic".to_string()),
        }

        let channels = lead.social_media_presence.len();
        if channels > 0 {
            let points = (channels as f64 * 2.0).min(5.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("Active on {} social channels", channels),
                impact: points,
                value: channels.to_string(),
            });
        }

        let social_text: String = lead
            .social_media_presence
            .iter()
            .flat_map(|(channel, url)| [channel.as_str(), url.as_str()])
            .collect::<Vec<_>>()
            .join(" ");
        if !social_text.is_empty()
            && matches_any(&social_text, &taxonomy.thought_leadership_indicators)
        {
            score += 3.0;
            factors.push(ScoreFactor {
                factor: "Thought-leadership content".to_string(),
                impact: 3.0,
                value: String::new(),
            });
        }

        if let Some(enriched) = lead.last_enriched {
            if now.signed_duration_since(enriched).num_days() <= 30 {
                score += 2.0;
                factors.push(ScoreFactor {
                    factor: "Recently enriched data".to_string(),
                    impact: 2.0,
                    value: enriched.format("%Y-%m-%d").to_string(),
                });
            }
        }

        (score, factors, recommendations)
    }

    fn score_timing(&self, lead: &Lead, now: DateTime<Utc>) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let recommendations = Vec::new();
        let taxonomy = &self.model.taxonomy;
        let signals = &lead.buying_signals;

        if signals.decision_maker_changes {
            score += 6.0;
            factors.push(ScoreFactor {
                factor: "Recent decision-maker changes".to_string(),
                impact: 6.0,
                value: String::new(),
            });
        }

        let expansion_count = signals.expansion_signals.len();
        if expansion_count > 0 {
            let points = (expansion_count as f64 * 2.0).min(4.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} expansion signals", expansion_count),
                impact: points,
                value: signals.expansion_signals.join(", "),
            });
        }

        if let Some(funded) = lead.metrics.last_funding_date {
            let days = now.signed_duration_since(funded).num_days();
            if (30..=180).contains(&days) {
                score += 3.0;
                factors.push(ScoreFactor {
                    factor: "Post-funding deployment window".to_string(),
                    impact: 3.0,
                    value: format!("{} days since round", days),
                });
            }
        }

        let expansion_text = signals.expansion_signals.join(" ");
        if !expansion_text.is_empty() && matches_any(&expansion_text, &taxonomy.adoption_keywords) {
            score += 2.0;
            factors.push(ScoreFactor {
                factor: "System change in flight".to_string(),
                impact: 2.0,
                value: String::new(),
            });
        }

        (score, factors, recommendations)
    }

    fn score_buying(&self, lead: &Lead) -> (f64, Vec<ScoreFactor>, Vec<String>) {
        let mut score = 0.0;
        let mut factors = Vec::new();
        let mut recommendations = Vec::new();
        let taxonomy = &self.model.taxonomy;
        let signals = &lead.buying_signals;

        let budget_count = signals.budget_indicators.len();
        if budget_count > 0 {
            let points = (budget_count as f64 * 2.0).min(4.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} budget indicators", budget_count),
                impact: points,
                value: signals.budget_indicators.join(", "),
            });
        }

        let relevant_postings: Vec<&String> = signals
            .job_postings
            .iter()
            .filter(|posting| matches_any(posting, &taxonomy.relevant_roles))
            .collect();
        if !relevant_postings.is_empty() {
            let points = (relevant_postings.len() as f64 * 2.0).min(4.0);
            score += points;
            factors.push(ScoreFactor {
                factor: format!("{} relevant open roles", relevant_postings.len()),
                impact: points,
                value: relevant_postings
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        } else if signals.job_postings.is_empty() {
            recommendations.push("Monitor job postings for relevant roles".to_string());
        }

        let pain_haystack = format!(
            "{} {} {}",
            lead.company_name,
            lead.industry.as_deref().unwrap_or(""),
            signals.expansion_signals.join(" ")
        );
        if matches_any(&pain_haystack, &taxonomy.pain_point_keywords) {
            score += 2.0;
            factors.push(ScoreFactor {
                factor: "Efficiency pain points surfaced".to_string(),
                impact: 2.0,
                value: matching_keywords(&pain_haystack, &taxonomy.pain_point_keywords).join(", "),
            });
        }

        (score, factors, recommendations)
    }
}

// ============ Derived Guidance ============

fn confidence_for(lead: &Lead) -> f64 {
    match (lead.data_quality_score, lead.completeness_percentage) {
        (Some(quality), Some(completeness)) => (quality * 0.6 + completeness * 0.4) / 100.0,
        (Some(quality), None) => quality / 100.0,
        (None, Some(completeness)) => completeness / 100.0,
        (None, None) => 0.5,
    }
}

fn improvement_suggestions(explanations: &[ScoreExplanation]) -> Vec<String> {
    let mut suggestions = Vec::new();
    for explanation in explanations {
        if explanation.score < 5.0 {
            suggestions.push(format!(
                "Strengthen {} ({:.0}/{:.0} points)",
                explanation.category.label(),
                explanation.score,
                explanation.max_score
            ));
            suggestions.extend(explanation.recommendations.iter().cloned());
        }
    }
    suggestions
}

fn next_actions_for(status: QualificationStatus) -> Vec<String> {
    let actions: &[&str] = match status {
        QualificationStatus::Hot => &[
            "Assign to a senior account executive",
            "Schedule a discovery call this week",
            "Prepare a tailored value proposition",
        ],
        QualificationStatus::Warm => &[
            "Start a personalized email sequence",
            "Connect with decision makers on LinkedIn",
            "Share relevant case studies",
        ],
        QualificationStatus::Cold => &[
            "Add to the nurture campaign",
            "Monitor for new buying signals",
        ],
        QualificationStatus::Unqualified => &[
            "Enrich missing firmographic data",
            "Re-evaluate after the next data refresh",
        ],
    };
    actions.iter().map(|s| s.to_string()).collect()
}

fn outreach_for(score: f64) -> (String, String) {
    let (timing, approach) = if score >= 80.0 {
        ("Immediate", "Direct phone outreach with a tailored pitch")
    } else if score >= 60.0 {
        ("Within 48 hours", "Personalized email with relevant proof points")
    } else if score >= 40.0 {
        ("Within a week", "Automated sequence with light personalization")
    } else {
        ("Next nurture cycle", "Educational content, no direct ask")
    };
    (timing.to_string(), approach.to_string())
}
