//! Declarative rule evaluation against lead fields.
//!
//! Rules never fail a scoring run: an unresolvable field path, an unknown
//! operator, or a type mismatch makes the rule a non-match and logs a
//! warning, so one bad rule cannot take out the batch.

use crate::models::Lead;
use crate::scoring_model::{IdealCustomerProfile, ScoringRule};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

/// The lead fields addressable from a rule condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadField {
    Industry,
    CompanyName,
    Domain,
    Headquarters,
    EmployeeCount,
    GrowthRate,
    FundingAmount,
    LastFundingDate,
    RecentHiring,
    JobPostings,
    DecisionMakerChanges,
    ExpansionSignals,
    TechStack,
    DataQualityScore,
    CompletenessPercentage,
    LastEnriched,
}

impl LeadField {
    /// Parse a dotted field path. Short aliases without the struct prefix
    /// are accepted for the commonly-used metric and signal fields.
    pub fn parse(path: &str) -> Option<Self> {
        let field = match path {
            "industry" => LeadField::Industry,
            "company_name" => LeadField::CompanyName,
            "domain" => LeadField::Domain,
            "headquarters" => LeadField::Headquarters,
            "metrics.employee_count" | "employee_count" => LeadField::EmployeeCount,
            "metrics.growth_rate" | "growth_rate" => LeadField::GrowthRate,
            "metrics.funding_amount" | "funding_amount" => LeadField::FundingAmount,
            "metrics.last_funding_date" | "last_funding_date" => LeadField::LastFundingDate,
            "buying_signals.recent_hiring" | "recent_hiring" | "hiring_velocity" => {
                LeadField::RecentHiring
            }
            "buying_signals.job_postings" | "job_postings" => LeadField::JobPostings,
            "buying_signals.decision_maker_changes" | "decision_maker_changes" => {
                LeadField::DecisionMakerChanges
            }
            "buying_signals.expansion_signals" | "expansion_signals" => LeadField::ExpansionSignals,
            "tech_stack" => LeadField::TechStack,
            "data_quality_score" => LeadField::DataQualityScore,
            "completeness_percentage" => LeadField::CompletenessPercentage,
            "last_enriched" => LeadField::LastEnriched,
            _ => return None,
        };
        Some(field)
    }
}

/// A lead field value extracted for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
    Timestamp(DateTime<Utc>),
}

/// Extract the current value of `field` from `lead`.
///
/// Returns `None` when the underlying optional field is absent, which
/// makes any comparison against it a non-match.
pub fn extract(lead: &Lead, field: LeadField) -> Option<FieldValue> {
    match field {
        LeadField::Industry => lead.industry.clone().map(FieldValue::Text),
        LeadField::CompanyName => Some(FieldValue::Text(lead.company_name.clone())),
        LeadField::Domain => Some(FieldValue::Text(lead.domain.clone())),
        LeadField::Headquarters => lead.headquarters.clone().map(FieldValue::Text),
        LeadField::EmployeeCount => lead
            .metrics
            .employee_count
            .map(|n| FieldValue::Number(n as f64)),
        LeadField::GrowthRate => lead.metrics.growth_rate.map(FieldValue::Number),
        LeadField::FundingAmount => lead.metrics.funding_amount.map(FieldValue::Number),
        LeadField::LastFundingDate => lead.metrics.last_funding_date.map(FieldValue::Timestamp),
        LeadField::RecentHiring => lead
            .buying_signals
            .recent_hiring
            .map(|n| FieldValue::Number(n as f64)),
        LeadField::JobPostings => Some(FieldValue::List(lead.buying_signals.job_postings.clone())),
        LeadField::DecisionMakerChanges => {
            Some(FieldValue::Flag(lead.buying_signals.decision_maker_changes))
        }
        LeadField::ExpansionSignals => Some(FieldValue::List(
            lead.buying_signals.expansion_signals.clone(),
        )),
        LeadField::TechStack => Some(FieldValue::List(
            lead.tech_stack.all().into_iter().map(String::from).collect(),
        )),
        LeadField::DataQualityScore => lead.data_quality_score.map(FieldValue::Number),
        LeadField::CompletenessPercentage => lead.completeness_percentage.map(FieldValue::Number),
        LeadField::LastEnriched => lead.last_enriched.map(FieldValue::Timestamp),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleOperator {
    Eq,
    Gt,
    Lt,
    In,
    Contains,
    Intersects,
    WithinDays,
}

impl RuleOperator {
    fn parse(name: &str) -> Option<Self> {
        let op = match name {
            "eq" => RuleOperator::Eq,
            "gt" => RuleOperator::Gt,
            "lt" => RuleOperator::Lt,
            "in" => RuleOperator::In,
            "contains" => RuleOperator::Contains,
            "intersects" => RuleOperator::Intersects,
            "within_days" => RuleOperator::WithinDays,
            _ => return None,
        };
        Some(op)
    }
}

/// Resolve the comparison list for `in`/`intersects`: either an inline JSON
/// array or the name of an ICP list field.
fn resolve_list(value: &Value, icp: &IdealCustomerProfile) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(|s| s.to_lowercase()))
            .collect(),
        Value::String(name) => icp
            .list_by_name(name)
            .iter()
            .map(|s| s.to_lowercase())
            .collect(),
        _ => Vec::new(),
    }
}

/// Evaluate one rule's condition against a lead at time `now`.
pub fn rule_matches(
    lead: &Lead,
    rule: &ScoringRule,
    icp: &IdealCustomerProfile,
    now: DateTime<Utc>,
) -> bool {
    let condition = &rule.condition;

    let Some(field) = LeadField::parse(&condition.field) else {
        warn!(rule = %rule.name, field = %condition.field, "unknown rule field, skipping");
        return false;
    };
    let Some(operator) = RuleOperator::parse(&condition.operator) else {
        warn!(rule = %rule.name, operator = %condition.operator, "unknown rule operator, skipping");
        return false;
    };
    let Some(value) = extract(lead, field) else {
        return false;
    };

    match (operator, value) {
        (RuleOperator::Eq, FieldValue::Text(text)) => condition
            .value
            .as_str()
            .is_some_and(|v| v.eq_ignore_ascii_case(&text)),
        (RuleOperator::Eq, FieldValue::Number(n)) => {
            condition.value.as_f64().is_some_and(|v| v == n)
        }
        (RuleOperator::Eq, FieldValue::Flag(flag)) => {
            condition.value.as_bool().is_some_and(|v| v == flag)
        }
        (RuleOperator::Gt, FieldValue::Number(n)) => {
            condition.value.as_f64().is_some_and(|v| n > v)
        }
        (RuleOperator::Lt, FieldValue::Number(n)) => {
            condition.value.as_f64().is_some_and(|v| n < v)
        }
        (RuleOperator::In, FieldValue::Text(text)) => {
            let table = resolve_list(&condition.value, icp);
            let lower = text.to_lowercase();
            table.iter().any(|entry| *entry == lower)
        }
        (RuleOperator::Contains, FieldValue::List(items)) => {
            condition.value.as_str().is_some_and(|needle| {
                let needle = needle.to_lowercase();
                items.iter().any(|item| item.to_lowercase().contains(&needle))
            })
        }
        (RuleOperator::Contains, FieldValue::Text(text)) => condition
            .value
            .as_str()
            .is_some_and(|needle| text.to_lowercase().contains(&needle.to_lowercase())),
        (RuleOperator::Intersects, FieldValue::List(items)) => {
            let table = resolve_list(&condition.value, icp);
            items
                .iter()
                .any(|item| table.iter().any(|entry| *entry == item.to_lowercase()))
        }
        (RuleOperator::WithinDays, FieldValue::Timestamp(when)) => {
            // Future timestamps satisfy the window too.
            condition.value.as_i64().is_some_and(|days| {
                now.signed_duration_since(when).num_days() <= days
            })
        }
        (operator, value) => {
            warn!(
                rule = %rule.name,
                ?operator,
                ?value,
                "operator/field type mismatch, skipping"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring_model::{RuleCondition, ScoreCategory};
    use serde_json::json;

    fn rule(field: &str, operator: &str, value: Value) -> ScoringRule {
        ScoringRule {
            name: "test".to_string(),
            category: ScoreCategory::CompanyFit,
            condition: RuleCondition {
                field: field.to_string(),
                operator: operator.to_string(),
                value,
            },
            score_impact: 10.0,
            weight: 1.0,
            description: None,
        }
    }

    fn lead() -> Lead {
        let mut lead = Lead::new("Acme", "acme.io").unwrap();
        lead.industry = Some("Technology".to_string());
        lead.metrics.employee_count = Some(150);
        lead.buying_signals.recent_hiring = Some(6);
        lead.tech_stack.technologies = vec!["Python".to_string(), "AWS".to_string()];
        lead
    }

    #[test]
    fn field_paths_parse_with_aliases() {
        assert_eq!(
            LeadField::parse("metrics.employee_count"),
            Some(LeadField::EmployeeCount)
        );
        assert_eq!(LeadField::parse("employee_count"), Some(LeadField::EmployeeCount));
        assert_eq!(LeadField::parse("hiring_velocity"), Some(LeadField::RecentHiring));
        assert_eq!(LeadField::parse("nope.nothing"), None);
    }

    #[test]
    fn numeric_comparisons() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let lead = lead();
        assert!(rule_matches(&lead, &rule("employee_count", "gt", json!(100)), &icp, now));
        assert!(!rule_matches(&lead, &rule("employee_count", "gt", json!(150)), &icp, now));
        assert!(rule_matches(&lead, &rule("employee_count", "lt", json!(200)), &icp, now));
        assert!(rule_matches(&lead, &rule("employee_count", "eq", json!(150)), &icp, now));
    }

    #[test]
    fn membership_is_case_insensitive() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let lead = lead();
        // Lead carries "Technology", ICP table holds "technology".
        assert!(rule_matches(
            &lead,
            &rule("industry", "in", json!("target_industries")),
            &icp,
            now
        ));
        assert!(rule_matches(
            &lead,
            &rule("tech_stack", "intersects", json!("target_technologies")),
            &icp,
            now
        ));
        assert!(rule_matches(
            &lead,
            &rule("industry", "in", json!(["TECHNOLOGY"])),
            &icp,
            now
        ));
    }

    #[test]
    fn within_days_uses_the_supplied_clock() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let mut lead = lead();
        lead.metrics.last_funding_date = Some(now - chrono::Duration::days(90));
        assert!(rule_matches(
            &lead,
            &rule("metrics.last_funding_date", "within_days", json!(180)),
            &icp,
            now
        ));
        assert!(!rule_matches(
            &lead,
            &rule("metrics.last_funding_date", "within_days", json!(30)),
            &icp,
            now
        ));
        // A future-dated round has non-positive elapsed days and still matches.
        lead.metrics.last_funding_date = Some(now + chrono::Duration::days(10));
        assert!(rule_matches(
            &lead,
            &rule("metrics.last_funding_date", "within_days", json!(180)),
            &icp,
            now
        ));
    }

    #[test]
    fn missing_fields_never_match() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let lead = Lead::new("Bare", "bare.io").unwrap();
        assert!(!rule_matches(&lead, &rule("industry", "in", json!("target_industries")), &icp, now));
        assert!(!rule_matches(&lead, &rule("metrics.growth_rate", "gt", json!(0)), &icp, now));
    }

    #[test]
    fn unknown_fields_and_operators_fail_closed() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let lead = lead();
        assert!(!rule_matches(&lead, &rule("no.such.field", "eq", json!(1)), &icp, now));
        assert!(!rule_matches(&lead, &rule("industry", "between", json!([1, 2])), &icp, now));
        // Type mismatch: numeric operator against a text field.
        assert!(!rule_matches(&lead, &rule("industry", "gt", json!(5)), &icp, now));
    }

    #[test]
    fn contains_searches_list_entries() {
        let icp = IdealCustomerProfile::default();
        let now = Utc::now();
        let mut lead = lead();
        lead.buying_signals.job_postings = vec!["VP Marketing".to_string()];
        assert!(rule_matches(
            &lead,
            &rule("buying_signals.job_postings", "contains", json!("marketing")),
            &icp,
            now
        ));
        assert!(!rule_matches(
            &lead,
            &rule("buying_signals.job_postings", "contains", json!("engineering")),
            &icp,
            now
        ));
    }
}
