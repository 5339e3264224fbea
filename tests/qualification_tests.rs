/// Tests for intent analysis and the qualification engine.
use chrono::{DateTime, Duration, TimeZone, Utc};
use lead_qualifier::models::{Lead, QualificationStatus};
use lead_qualifier::qualifier::{BuyerIntentAnalyzer, IntentLevel, LeadQualificationEngine};
use lead_qualifier::taxonomy::SignalTaxonomy;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

/// A strong lead: target industry, compatible stack, active hiring, and
/// marketing leadership roles open.
fn growth_lead() -> Lead {
    let mut lead = Lead::new("GrowthCo", "growthco.com").unwrap();
    lead.industry = Some("Technology".to_string());
    lead.headquarters = Some("New York, NY".to_string());
    lead.metrics.employee_count = Some(150);
    lead.metrics.growth_rate = Some(35.0);
    lead.tech_stack.technologies = vec![
        "Python".to_string(),
        "React".to_string(),
        "AWS".to_string(),
        "PostgreSQL".to_string(),
    ];
    lead.tech_stack.marketing_tools = vec!["HubSpot".to_string()];
    lead.tech_stack.sales_tools = vec!["Salesforce".to_string()];
    lead.buying_signals.recent_hiring = Some(6);
    lead.buying_signals.job_postings = vec![
        "VP Marketing".to_string(),
        "Marketing Operations Manager".to_string(),
    ];
    lead
}

mod intent {
    use super::*;

    #[test]
    fn strong_signals_reach_high_intent() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let analysis = analyzer.analyze_intent_at(&growth_lead(), fixed_now());

        // job postings 7 + competitor tools 6 + growth 5
        assert_eq!(analysis.intent_score, 18.0);
        assert_eq!(analysis.intent_level, IntentLevel::High);
        assert!(analysis
            .detected_signals
            .iter()
            .any(|s| s.contains("hubspot")));
        assert!(analysis
            .detected_signals
            .iter()
            .any(|s| s.contains("VP Marketing")));
    }

    #[test]
    fn bare_lead_has_minimal_intent_except_sparse_tooling() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let lead = Lead::new("Quiet Co", "quiet.io").unwrap();
        let analysis = analyzer.analyze_intent_at(&lead, fixed_now());

        // Only the sparse-tooling signal applies.
        assert_eq!(analysis.intent_score, 2.0);
        assert_eq!(analysis.intent_level, IntentLevel::Minimal);
    }

    #[test]
    fn role_tiers_stack_on_a_single_posting() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let mut lead = Lead::new("A", "a.com").unwrap();
        // Enough tools to suppress the sparse-tooling bonus.
        lead.tech_stack.technologies =
            vec!["foo".to_string(), "bar".to_string(), "baz".to_string()];
        // Matches the high-intent, medium-intent, and decision-maker tiers.
        lead.buying_signals.job_postings = vec!["Digital Marketing Director".to_string()];

        let analysis = analyzer.analyze_intent_at(&lead, fixed_now());
        // 5 + 3 + 2, additive across tiers.
        assert_eq!(analysis.intent_score, 10.0);
        assert_eq!(analysis.intent_level, IntentLevel::Medium);
    }

    #[test]
    fn funding_intent_rewards_recency_and_size() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let mut lead = Lead::new("A", "a.com").unwrap();
        lead.tech_stack.technologies =
            vec!["foo".to_string(), "bar".to_string(), "baz".to_string()];
        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(45));
        lead.metrics.funding_amount = Some(25_000_000.0);

        let analysis = analyzer.analyze_intent_at(&lead, fixed_now());
        // 4 for recency + 2 for size, within the 5-point cap.
        assert_eq!(analysis.intent_score, 5.0);
    }

    #[test]
    fn urgency_indicators_cover_all_three_triggers() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let mut lead = Lead::new("A", "a.com").unwrap();
        lead.buying_signals.decision_maker_changes = true;
        lead.buying_signals.recent_hiring = Some(12);
        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(60));

        let analysis = analyzer.analyze_intent_at(&lead, fixed_now());
        assert_eq!(
            analysis.urgency_indicators,
            vec![
                "Recent leadership changes",
                "Rapid scaling and hiring",
                "Post-funding growth pressure",
            ]
        );
    }

    #[test]
    fn open_roles_map_onto_the_buying_committee() {
        let analyzer = BuyerIntentAnalyzer::new(SignalTaxonomy::default());
        let mut lead = Lead::new("A", "a.com").unwrap();
        lead.buying_signals.job_postings = vec![
            "VP Marketing".to_string(),
            "Marketing Operations Manager".to_string(),
            "Engineering Manager".to_string(),
            "Groundskeeper".to_string(), // no committee seat
        ];

        let committee = analyzer.analyze_intent_at(&lead, fixed_now()).buying_committee;
        assert_eq!(committee.decision_makers, vec!["VP Marketing"]);
        assert_eq!(committee.influencers, vec!["Marketing Operations Manager"]);
        assert_eq!(committee.technical_evaluators, vec!["Engineering Manager"]);
    }
}

mod timing {
    use super::*;

    #[test]
    fn funding_window_tiers() {
        let engine = LeadQualificationEngine::with_defaults();
        let mut lead = Lead::new("A", "a.com").unwrap();

        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(60));
        assert_eq!(engine.timing_score(&lead, fixed_now()), 8.0);

        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(150));
        assert_eq!(engine.timing_score(&lead, fixed_now()), 5.0);

        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(10));
        assert_eq!(engine.timing_score(&lead, fixed_now()), 3.0);

        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(400));
        assert_eq!(engine.timing_score(&lead, fixed_now()), 0.0);
    }

    #[test]
    fn hiring_and_leadership_changes_open_the_window() {
        let engine = LeadQualificationEngine::with_defaults();
        let mut lead = Lead::new("A", "a.com").unwrap();

        lead.buying_signals.recent_hiring = Some(3);
        assert_eq!(engine.timing_score(&lead, fixed_now()), 3.0);

        lead.buying_signals.recent_hiring = Some(8);
        assert_eq!(engine.timing_score(&lead, fixed_now()), 6.0);

        lead.buying_signals.decision_maker_changes = true;
        assert_eq!(engine.timing_score(&lead, fixed_now()), 11.0);
    }

    #[test]
    fn quarter_start_adds_planning_bonus() {
        let engine = LeadQualificationEngine::with_defaults();
        let lead = Lead::new("A", "a.com").unwrap();

        let quarter_start = Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap();
        assert_eq!(engine.timing_score(&lead, quarter_start), 2.0);
        assert_eq!(engine.timing_score(&lead, fixed_now()), 0.0);
    }

    #[test]
    fn timing_caps_at_twenty() {
        let engine = LeadQualificationEngine::with_defaults();
        let mut lead = Lead::new("A", "a.com").unwrap();
        lead.metrics.last_funding_date = Some(fixed_now() - Duration::days(60));
        lead.buying_signals.recent_hiring = Some(10);
        lead.buying_signals.decision_maker_changes = true;

        let quarter = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let funded = quarter - Duration::days(60);
        lead.metrics.last_funding_date = Some(funded);
        assert_eq!(engine.timing_score(&lead, quarter), 20.0);
    }
}

mod reconciliation {
    use super::*;

    #[test]
    fn high_intent_upgrades_warm_to_hot() {
        let engine = LeadQualificationEngine::with_defaults();
        assert_eq!(
            engine.reconcile(QualificationStatus::Warm, IntentLevel::High, 0.0, None),
            QualificationStatus::Hot
        );
    }

    #[test]
    fn intent_upgrades_cold_to_warm() {
        let engine = LeadQualificationEngine::with_defaults();
        assert_eq!(
            engine.reconcile(QualificationStatus::Cold, IntentLevel::High, 0.0, None),
            QualificationStatus::Warm
        );
        assert_eq!(
            engine.reconcile(QualificationStatus::Cold, IntentLevel::Medium, 0.0, None),
            QualificationStatus::Warm
        );
    }

    #[test]
    fn strong_timing_upgrades_warm_without_high_intent() {
        let engine = LeadQualificationEngine::with_defaults();
        assert_eq!(
            engine.reconcile(QualificationStatus::Warm, IntentLevel::Low, 16.0, None),
            QualificationStatus::Hot
        );
        assert_eq!(
            engine.reconcile(QualificationStatus::Warm, IntentLevel::Low, 14.0, None),
            QualificationStatus::Warm
        );
    }

    #[test]
    fn low_data_quality_pulls_the_result_down_one_tier() {
        let engine = LeadQualificationEngine::with_defaults();
        assert_eq!(
            engine.reconcile(QualificationStatus::Hot, IntentLevel::Minimal, 0.0, Some(30.0)),
            QualificationStatus::Warm
        );
        // The downgrade applies after the upgrade, netting out.
        assert_eq!(
            engine.reconcile(QualificationStatus::Warm, IntentLevel::High, 0.0, Some(30.0)),
            QualificationStatus::Warm
        );
        // Unknown quality is not penalized.
        assert_eq!(
            engine.reconcile(QualificationStatus::Hot, IntentLevel::Minimal, 0.0, None),
            QualificationStatus::Hot
        );
    }

    #[test]
    fn data_quality_decides_the_final_tier_end_to_end() {
        let engine = LeadQualificationEngine::with_defaults();

        let mut lead = growth_lead();
        lead.data_quality_score = Some(50.0);
        let report = engine.qualify_lead_at(&lead, fixed_now());
        assert_eq!(report.lead_score.qualification_status, QualificationStatus::Warm);
        assert_eq!(report.final_qualification, QualificationStatus::Hot);

        lead.data_quality_score = Some(30.0);
        let report = engine.qualify_lead_at(&lead, fixed_now());
        assert_eq!(report.final_qualification, QualificationStatus::Warm);
    }
}

mod reports {
    use super::*;

    #[test]
    fn full_report_for_a_strong_lead() {
        let engine = LeadQualificationEngine::with_defaults();
        let report = engine.qualify_lead_at(&growth_lead(), fixed_now());

        assert_eq!(report.final_qualification, QualificationStatus::Hot);
        assert_eq!(report.intent_analysis.intent_level, IntentLevel::High);
        assert_eq!(report.timing_score, 6.0);
        assert!(report.priority_score > 60.0);
        assert_eq!(report.action_plan.assigned_rep_type, "Senior Account Executive");
        assert_eq!(report.action_plan.timeline, "24 hours");
        assert_eq!(report.next_review_date, fixed_now() + Duration::days(3));
        assert!(!report.qualification_reasons.is_empty());
        assert!(report.qualification_reasons.len() <= 5);
    }

    #[test]
    fn weak_lead_routes_to_nurture() {
        let engine = LeadQualificationEngine::with_defaults();
        let lead = Lead::new("Quiet Co", "quiet.io").unwrap();
        let report = engine.qualify_lead_at(&lead, fixed_now());

        assert_eq!(report.final_qualification, QualificationStatus::Unqualified);
        assert_eq!(report.action_plan.assigned_rep_type, "Marketing");
        assert_eq!(report.next_review_date, fixed_now() + Duration::days(90));
        assert_eq!(report.outreach_strategy.recommended_channels, vec!["Email"]);
    }

    #[test]
    fn priority_score_blends_all_four_inputs() {
        let engine = LeadQualificationEngine::with_defaults();
        let priority = engine.priority_score(80.0, 10.0, 10.0, Some(60.0));
        // 0.8*0.4 + 0.5*0.3 + 0.6*0.2 + 0.5*0.1 = 0.64
        assert!((priority - 64.0).abs() < 1e-9);

        // Missing data quality defaults to the midpoint.
        let fallback = engine.priority_score(80.0, 10.0, 10.0, None);
        assert!((fallback - 62.0).abs() < 1e-9);

        // Intent contribution saturates at 20 points.
        let saturated = engine.priority_score(0.0, 40.0, 0.0, Some(0.0));
        assert!((saturated - 30.0).abs() < 1e-9);
    }

    #[test]
    fn reasons_name_the_strong_categories() {
        let engine = LeadQualificationEngine::with_defaults();
        let report = engine.qualify_lead_at(&growth_lead(), fixed_now());

        assert!(report
            .qualification_reasons
            .iter()
            .any(|r| r.contains("lead score")));
        assert!(report
            .qualification_reasons
            .iter()
            .any(|r| r == "High buyer intent detected"));
    }

    #[test]
    fn personalization_hooks_come_from_detected_signals() {
        let engine = LeadQualificationEngine::with_defaults();
        let report = engine.qualify_lead_at(&growth_lead(), fixed_now());

        assert!(!report.outreach_strategy.personalization_hooks.is_empty());
        assert!(report
            .outreach_strategy
            .personalization_hooks
            .iter()
            .any(|h| h.contains("Technology")));
    }

    #[test]
    fn report_serializes_and_round_trips() {
        let engine = LeadQualificationEngine::with_defaults();
        let report = engine.qualify_lead_at(&growth_lead(), fixed_now());

        let text = serde_json::to_string(&report).unwrap();
        let parsed: lead_qualifier::qualifier::QualificationReport =
            serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }
}
