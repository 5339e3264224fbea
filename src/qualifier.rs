//! Lead qualification: buyer-intent analysis layered on top of scoring.
//!
//! The qualification engine runs the scoring engine, analyzes intent and
//! outreach timing independently, reconciles the three views into a final
//! tier, and emits an action plan and outreach strategy for the sales team.

use crate::errors::ModelError;
use crate::models::{Lead, QualificationStatus};
use crate::scorer::{LeadScore, LeadScoringEngine};
use crate::scoring_model::{ScoreCategory, ScoringModel};
use crate::taxonomy::{matches_any, SignalTaxonomy};
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

// ============ Intent ============

/// How actively a company appears to be buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntentLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl IntentLevel {
    fn from_score(score: f64) -> Self {
        if score >= 15.0 {
            IntentLevel::High
        } else if score >= 8.0 {
            IntentLevel::Medium
        } else if score >= 3.0 {
            IntentLevel::Low
        } else {
            IntentLevel::Minimal
        }
    }
}

/// Open roles bucketed by their likely seat in a purchase decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyingCommittee {
    pub decision_makers: Vec<String>,
    pub influencers: Vec<String>,
    pub technical_evaluators: Vec<String>,
}

/// The outcome of buyer-intent analysis for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    /// Summed intent points across all signal groups.
    pub intent_score: f64,
    /// Banded intent level.
    pub intent_level: IntentLevel,
    /// Human-readable descriptions of each detected signal.
    pub detected_signals: Vec<String>,
    /// Conditions that compress the outreach window.
    pub urgency_indicators: Vec<String>,
    /// Contacts mapped onto the buying committee.
    pub buying_committee: BuyingCommittee,
}

/// Detects purchase-intent signals in job postings, technology choices,
/// growth indicators, and funding events.
#[derive(Debug, Clone)]
pub struct BuyerIntentAnalyzer {
    taxonomy: SignalTaxonomy,
}

impl BuyerIntentAnalyzer {
    pub fn new(taxonomy: SignalTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Analyze intent against the current wall clock.
    pub fn analyze_intent(&self, lead: &Lead) -> IntentAnalysis {
        self.analyze_intent_at(lead, Utc::now())
    }

    /// Analyze intent at an explicit point in time.
    pub fn analyze_intent_at(&self, lead: &Lead, now: DateTime<Utc>) -> IntentAnalysis {
        let mut score: f64 = 0.0;
        let mut signals = Vec::new();

        score += self.job_posting_intent(lead, &mut signals);
        score += self.technology_intent(lead, &mut signals);
        score += self.growth_intent(lead, &mut signals);
        score += self.funding_intent(lead, now, &mut signals);

        IntentAnalysis {
            intent_score: score,
            intent_level: IntentLevel::from_score(score),
            detected_signals: signals,
            urgency_indicators: self.urgency_indicators(lead, now),
            buying_committee: self.map_committee(lead),
        }
    }

    /// Open roles that hint at tooling investment. Capped at 10 points.
    ///
    /// A single posting can land in several tiers at once; the points add up.
    fn job_posting_intent(&self, lead: &Lead, signals: &mut Vec<String>) -> f64 {
        let mut score: f64 = 0.0;
        for posting in &lead.buying_signals.job_postings {
            let lower = posting.to_lowercase();
            if matches_any(&lower, &self.taxonomy.high_intent_roles) {
                score += 5.0;
                signals.push(format!("Hiring for high-intent role: {}", posting));
            }
            if matches_any(&lower, &self.taxonomy.medium_intent_roles) {
                score += 3.0;
                signals.push(format!("Hiring for relevant role: {}", posting));
            }
            if matches_any(&lower, &self.taxonomy.decision_maker_roles) {
                score += 2.0;
                signals.push(format!("Hiring a decision maker: {}", posting));
            }
            if matches_any(&lower, &self.taxonomy.tech_ops_keywords) {
                score += 4.0;
                signals.push(format!("Building marketing/ops capability: {}", posting));
            }
        }
        score.min(10.0)
    }

    /// Competitor and legacy tooling in the stack. Capped at 8 points.
    ///
    /// Considers core, marketing, and sales tools; analytics tooling is not
    /// treated as an intent signal.
    fn technology_intent(&self, lead: &Lead, signals: &mut Vec<String>) -> f64 {
        let mut score: f64 = 0.0;
        let stack: Vec<String> = lead
            .tech_stack
            .technologies
            .iter()
            .chain(lead.tech_stack.marketing_tools.iter())
            .chain(lead.tech_stack.sales_tools.iter())
            .map(|t| t.to_lowercase())
            .collect();

        for tool in &stack {
            if self.taxonomy.competitor_technologies.contains(tool) {
                score += 3.0;
                signals.push(format!("Using competitor tool: {}", tool));
            }
            if matches_any(tool, &self.taxonomy.outdated_technologies) {
                score += 2.0;
                signals.push(format!("Running outdated tooling: {}", tool));
            }
        }

        if stack.len() < 3 {
            score += 2.0;
            signals.push("Sparse tooling, integration opportunity".to_string());
        }

        score.min(8.0)
    }

    /// Hiring pace, expansion moves, and growth rate. Capped at 6 points.
    fn growth_intent(&self, lead: &Lead, signals: &mut Vec<String>) -> f64 {
        let mut score: f64 = 0.0;

        if lead.buying_signals.recent_hiring.unwrap_or(0) >= 5 {
            score += 3.0;
            signals.push("Rapid hiring underway".to_string());
        }

        for signal in &lead.buying_signals.expansion_signals {
            if matches_any(signal, &self.taxonomy.expansion_keywords) {
                score += 2.0;
                signals.push(format!("Expansion move: {}", signal));
            }
        }

        if lead.metrics.growth_rate.unwrap_or(0.0) >= 25.0 {
            score += 2.0;
            signals.push("Strong revenue growth".to_string());
        }

        score.min(6.0)
    }

    /// Fresh capital looking for deployment. Capped at 5 points.
    fn funding_intent(&self, lead: &Lead, now: DateTime<Utc>, signals: &mut Vec<String>) -> f64 {
        let mut score: f64 = 0.0;

        if let Some(funded) = lead.metrics.last_funding_date {
            let days = now.signed_duration_since(funded).num_days();
            if (0..=90).contains(&days) {
                score += 4.0;
                signals.push("Funding closed within 90 days".to_string());
            } else if (0..=180).contains(&days) {
                score += 2.0;
                signals.push("Funding closed within 180 days".to_string());
            }
        }

        if lead.metrics.funding_amount.unwrap_or(0.0) >= 10_000_000.0 {
            score += 2.0;
            signals.push("Large funding round ($10M+)".to_string());
        }

        score.min(5.0)
    }

    fn urgency_indicators(&self, lead: &Lead, now: DateTime<Utc>) -> Vec<String> {
        let mut indicators = Vec::new();

        if lead.buying_signals.decision_maker_changes {
            indicators.push("Recent leadership changes".to_string());
        }
        if lead.buying_signals.recent_hiring.unwrap_or(0) >= 10 {
            indicators.push("Rapid scaling and hiring".to_string());
        }
        if let Some(funded) = lead.metrics.last_funding_date {
            let days = now.signed_duration_since(funded).num_days();
            if (30..=90).contains(&days) {
                indicators.push("Post-funding growth pressure".to_string());
            }
        }

        indicators
    }

    /// Bucket open roles into the committee seats the company is filling.
    fn map_committee(&self, lead: &Lead) -> BuyingCommittee {
        let mut committee = BuyingCommittee::default();
        for posting in &lead.buying_signals.job_postings {
            if matches_any(posting, &self.taxonomy.committee_decision_roles) {
                committee.decision_makers.push(posting.clone());
            } else if matches_any(posting, &self.taxonomy.committee_technical_roles) {
                committee.technical_evaluators.push(posting.clone());
            } else if matches_any(posting, &self.taxonomy.committee_influencer_roles) {
                committee.influencers.push(posting.clone());
            }
        }
        committee
    }
}

// ============ Plans & Reports ============

/// Concrete steps for the assigned rep, sized to the final tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub immediate_actions: Vec<String>,
    pub follow_up_actions: Vec<String>,
    /// Expected working window (e.g. "24 hours").
    pub timeline: String,
    /// Priority label for queue ordering.
    pub priority: String,
    /// The rep profile this lead should route to.
    pub assigned_rep_type: String,
}

/// How to approach the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachStrategy {
    pub recommended_channels: Vec<String>,
    pub messaging_themes: Vec<String>,
    pub value_proposition_focus: String,
    /// Lead-specific hooks for the first touch.
    pub personalization_hooks: Vec<String>,
    pub content_recommendations: Vec<String>,
}

/// The full qualification output for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationReport {
    /// The underlying score computation.
    pub lead_score: LeadScore,
    /// Buyer-intent analysis.
    pub intent_analysis: IntentAnalysis,
    /// Outreach-window timing score, 0-20.
    pub timing_score: f64,
    /// Tier after reconciling score, intent, timing, and data quality.
    pub final_qualification: QualificationStatus,
    /// Queue-ordering priority, 0-100.
    pub priority_score: f64,
    /// What to do next.
    pub action_plan: ActionPlan,
    /// Top reasons behind the qualification, at most five.
    pub qualification_reasons: Vec<String>,
    /// When to re-score the lead.
    pub next_review_date: DateTime<Utc>,
    /// How to approach the account.
    pub outreach_strategy: OutreachStrategy,
}

// ============ Engine ============

const PRIORITY_SCORE_WEIGHT: f64 = 0.4;
const PRIORITY_INTENT_WEIGHT: f64 = 0.3;
const PRIORITY_QUALITY_WEIGHT: f64 = 0.2;
const PRIORITY_TIMING_WEIGHT: f64 = 0.1;

/// Qualifies leads end to end: scoring, intent, timing, reconciliation,
/// and sales guidance.
#[derive(Debug, Clone)]
pub struct LeadQualificationEngine {
    scorer: LeadScoringEngine,
    analyzer: BuyerIntentAnalyzer,
}

impl LeadQualificationEngine {
    /// Build an engine from a validated model.
    pub fn new(model: ScoringModel) -> Result<Self, ModelError> {
        let analyzer = BuyerIntentAnalyzer::new(model.taxonomy.clone());
        let scorer = LeadScoringEngine::new(model)?;
        Ok(Self { scorer, analyzer })
    }

    /// Build an engine from the default model.
    pub fn with_defaults() -> Self {
        let scorer = LeadScoringEngine::with_defaults();
        let analyzer = BuyerIntentAnalyzer::new(scorer.model().taxonomy.clone());
        Self { scorer, analyzer }
    }

    /// The scoring engine backing qualification.
    pub fn scorer(&self) -> &LeadScoringEngine {
        &self.scorer
    }

    /// Qualify a lead against the current wall clock.
    pub fn qualify_lead(&self, lead: &Lead) -> QualificationReport {
        self.qualify_lead_at(lead, Utc::now())
    }

    /// Qualify a lead at an explicit point in time.
    pub fn qualify_lead_at(&self, lead: &Lead, now: DateTime<Utc>) -> QualificationReport {
        let lead_score = self.scorer.score_lead_at(lead, now);
        let intent_analysis = self.analyzer.analyze_intent_at(lead, now);
        let timing_score = self.timing_score(lead, now);

        let final_qualification = self.reconcile(
            lead_score.qualification_status,
            intent_analysis.intent_level,
            timing_score,
            lead.data_quality_score,
        );
        let priority_score = self.priority_score(
            lead_score.total_score,
            intent_analysis.intent_score,
            timing_score,
            lead.data_quality_score,
        );

        let qualification_reasons =
            qualification_reasons(&lead_score, &intent_analysis, final_qualification);
        let action_plan = action_plan_for(final_qualification, &intent_analysis);
        let outreach_strategy = outreach_strategy_for(final_qualification, lead, &intent_analysis);
        let next_review_date = now + review_interval(final_qualification);

        info!(
            company = %lead.company_name,
            score = lead_score.total_score,
            intent = intent_analysis.intent_score,
            timing = timing_score,
            status = %final_qualification,
            priority = priority_score,
            "qualified lead"
        );

        QualificationReport {
            lead_score,
            intent_analysis,
            timing_score,
            final_qualification,
            priority_score,
            action_plan,
            qualification_reasons,
            next_review_date,
            outreach_strategy,
        }
    }

    /// Score the outreach window, 0-20.
    ///
    /// Funding recency, hiring pace, leadership changes, and quarter starts
    /// each open the window a little wider.
    pub fn timing_score(&self, lead: &Lead, now: DateTime<Utc>) -> f64 {
        let mut score: f64 = 0.0;

        if let Some(funded) = lead.metrics.last_funding_date {
            let days = now.signed_duration_since(funded).num_days();
            if (30..=120).contains(&days) {
                score += 8.0;
            } else if (121..=180).contains(&days) {
                score += 5.0;
            } else if days <= 30 {
                score += 3.0;
            }
        }

        let hiring = lead.buying_signals.recent_hiring.unwrap_or(0);
        if hiring >= 5 {
            score += 6.0;
        } else if hiring >= 2 {
            score += 3.0;
        }

        if lead.buying_signals.decision_maker_changes {
            score += 5.0;
        }

        // Budget planning clusters at quarter starts.
        if matches!(now.month(), 1 | 4 | 7 | 10) {
            score += 2.0;
        }

        score.min(20.0)
    }

    /// Reconcile the score-implied tier with intent, timing, and data quality.
    ///
    /// At most one intent/timing upgrade applies, then low data quality
    /// pulls the result down one tier.
    pub fn reconcile(
        &self,
        base: QualificationStatus,
        intent: IntentLevel,
        timing_score: f64,
        data_quality: Option<f64>,
    ) -> QualificationStatus {
        let upgraded = if intent == IntentLevel::High && base == QualificationStatus::Warm {
            QualificationStatus::Hot
        } else if intent == IntentLevel::High && base == QualificationStatus::Cold {
            QualificationStatus::Warm
        } else if intent == IntentLevel::Medium && base == QualificationStatus::Cold {
            QualificationStatus::Warm
        } else if timing_score >= 15.0 && base == QualificationStatus::Warm {
            QualificationStatus::Hot
        } else {
            base
        };

        let quality_floor = self.scorer.model().thresholds.min_data_quality;
        match data_quality {
            Some(quality) if quality < quality_floor => upgraded.downgraded(),
            _ => upgraded,
        }
    }

    /// Queue-ordering priority, 0-100.
    pub fn priority_score(
        &self,
        total_score: f64,
        intent_score: f64,
        timing_score: f64,
        data_quality: Option<f64>,
    ) -> f64 {
        let quality = data_quality.unwrap_or(50.0);
        let priority = (total_score / self.scorer.model().max_score) * PRIORITY_SCORE_WEIGHT
            + (intent_score / 20.0).min(1.0) * PRIORITY_INTENT_WEIGHT
            + (quality / 100.0) * PRIORITY_QUALITY_WEIGHT
            + (timing_score / 20.0) * PRIORITY_TIMING_WEIGHT;
        (priority * 100.0).clamp(0.0, 100.0)
    }
}

fn review_interval(status: QualificationStatus) -> Duration {
    match status {
        QualificationStatus::Hot => Duration::days(3),
        QualificationStatus::Warm => Duration::days(7),
        QualificationStatus::Cold => Duration::days(30),
        QualificationStatus::Unqualified => Duration::days(90),
    }
}

fn qualification_reasons(
    score: &LeadScore,
    intent: &IntentAnalysis,
    _final_status: QualificationStatus,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if score.total_score >= 80.0 {
        reasons.push(format!("High lead score ({:.0}/100)", score.total_score));
    } else if score.total_score >= 60.0 {
        reasons.push(format!("Good lead score ({:.0}/100)", score.total_score));
    }

    if intent.intent_level == IntentLevel::High {
        reasons.push("High buyer intent detected".to_string());
        reasons.extend(intent.detected_signals.iter().take(2).cloned());
    }

    if !intent.urgency_indicators.is_empty() {
        reasons.push("Urgency indicators present".to_string());
        reasons.extend(intent.urgency_indicators.iter().cloned());
    }

    let mut strong: Vec<(&ScoreCategory, &f64)> = score
        .category_scores
        .iter()
        .filter(|(_, points)| **points >= 15.0)
        .collect();
    strong.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (category, _) in strong.into_iter().take(2) {
        reasons.push(format!("Strong {} signals", category.label()));
    }

    reasons.truncate(5);
    reasons
}

fn action_plan_for(status: QualificationStatus, intent: &IntentAnalysis) -> ActionPlan {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut plan = match status {
        QualificationStatus::Hot => ActionPlan {
            immediate_actions: strings(&[
                "Call the primary decision maker",
                "Send a tailored executive summary",
            ]),
            follow_up_actions: strings(&[
                "Book a discovery call",
                "Loop in a solutions engineer",
            ]),
            timeline: "24 hours".to_string(),
            priority: "Critical".to_string(),
            assigned_rep_type: "Senior Account Executive".to_string(),
        },
        QualificationStatus::Warm => ActionPlan {
            immediate_actions: strings(&[
                "Send a personalized first-touch email",
                "Connect on LinkedIn",
            ]),
            follow_up_actions: strings(&[
                "Share a relevant case study",
                "Schedule a qualification call",
            ]),
            timeline: "48 hours".to_string(),
            priority: "High".to_string(),
            assigned_rep_type: "Account Executive".to_string(),
        },
        QualificationStatus::Cold => ActionPlan {
            immediate_actions: strings(&["Add to the nurture sequence"]),
            follow_up_actions: strings(&[
                "Monitor for new buying signals",
                "Re-score after the next enrichment",
            ]),
            timeline: "1 week".to_string(),
            priority: "Medium".to_string(),
            assigned_rep_type: "SDR".to_string(),
        },
        QualificationStatus::Unqualified => ActionPlan {
            immediate_actions: strings(&["File under long-term nurture"]),
            follow_up_actions: strings(&["Re-evaluate after data refresh"]),
            timeline: "1 month".to_string(),
            priority: "Low".to_string(),
            assigned_rep_type: "Marketing".to_string(),
        },
    };

    if !intent.urgency_indicators.is_empty() && status >= QualificationStatus::Warm {
        plan.immediate_actions
            .push("Reference the urgency drivers in the first touch".to_string());
    }

    plan
}

fn outreach_strategy_for(
    status: QualificationStatus,
    lead: &Lead,
    intent: &IntentAnalysis,
) -> OutreachStrategy {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let (channels, themes, focus, content) = match status {
        QualificationStatus::Hot => (
            strings(&["Phone", "Email", "LinkedIn"]),
            strings(&["Time-to-value", "Executive outcomes"]),
            "Fast, measurable impact on revenue operations".to_string(),
            strings(&["ROI one-pager", "Customer proof points"]),
        ),
        QualificationStatus::Warm => (
            strings(&["Email", "LinkedIn"]),
            strings(&["Problem education", "Peer comparisons"]),
            "Fixing the gaps competitors leave open".to_string(),
            strings(&["Case study", "Benchmark report"]),
        ),
        QualificationStatus::Cold => (
            strings(&["Email"]),
            strings(&["Industry trends", "Best practices"]),
            "Building the case for modern tooling".to_string(),
            strings(&["Newsletter", "Webinar invite"]),
        ),
        QualificationStatus::Unqualified => (
            strings(&["Email"]),
            strings(&["Education"]),
            "Staying on the radar until the fit improves".to_string(),
            strings(&["Blog digest"]),
        ),
    };

    let mut hooks = Vec::new();
    for signal in intent.detected_signals.iter().take(3) {
        hooks.push(signal.clone());
    }
    if let Some(industry) = &lead.industry {
        hooks.push(format!("Results with other {} companies", industry));
    }

    OutreachStrategy {
        recommended_channels: channels,
        messaging_themes: themes,
        value_proposition_focus: focus,
        personalization_hooks: hooks,
        content_recommendations: content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_levels_band_correctly() {
        assert_eq!(IntentLevel::from_score(18.0), IntentLevel::High);
        assert_eq!(IntentLevel::from_score(15.0), IntentLevel::High);
        assert_eq!(IntentLevel::from_score(8.0), IntentLevel::Medium);
        assert_eq!(IntentLevel::from_score(3.0), IntentLevel::Low);
        assert_eq!(IntentLevel::from_score(2.9), IntentLevel::Minimal);
    }

    #[test]
    fn review_intervals_widen_down_the_tiers() {
        assert_eq!(review_interval(QualificationStatus::Hot), Duration::days(3));
        assert_eq!(review_interval(QualificationStatus::Warm), Duration::days(7));
        assert_eq!(review_interval(QualificationStatus::Cold), Duration::days(30));
        assert_eq!(
            review_interval(QualificationStatus::Unqualified),
            Duration::days(90)
        );
    }

    #[test]
    fn rep_assignment_follows_the_tier() {
        let intent = IntentAnalysis {
            intent_score: 0.0,
            intent_level: IntentLevel::Minimal,
            detected_signals: Vec::new(),
            urgency_indicators: Vec::new(),
            buying_committee: BuyingCommittee::default(),
        };
        assert_eq!(
            action_plan_for(QualificationStatus::Hot, &intent).assigned_rep_type,
            "Senior Account Executive"
        );
        assert_eq!(
            action_plan_for(QualificationStatus::Cold, &intent).assigned_rep_type,
            "SDR"
        );
    }
}
