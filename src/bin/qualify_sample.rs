//! Qualifies a sample lead and prints the full report as JSON.
//!
//! Set `SCORING_MODEL_PATH` to score against a custom model file.

use lead_qualifier::config::Config;
use lead_qualifier::models::{ContactInfo, Lead};
use lead_qualifier::qualifier::LeadQualificationEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sample_lead() -> anyhow::Result<Lead> {
    let mut lead = Lead::new("TechFlow Solutions", "techflow.io")?;
    lead.industry = Some("Technology".to_string());
    lead.headquarters = Some("San Francisco, CA".to_string());
    lead.metrics.employee_count = Some(150);
    lead.metrics.growth_rate = Some(35.0);
    lead.metrics.funding_amount = Some(25_000_000.0);
    lead.contacts = vec![ContactInfo {
        name: Some("Jordan Avery".to_string()),
        title: Some("VP of Marketing".to_string()),
        ..ContactInfo::default()
    }];
    lead.tech_stack.technologies = vec![
        "Python".to_string(),
        "React".to_string(),
        "AWS".to_string(),
        "PostgreSQL".to_string(),
    ];
    lead.tech_stack.marketing_tools = vec!["HubSpot".to_string()];
    lead.tech_stack.sales_tools = vec!["Salesforce".to_string()];
    Ok(lead)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let model = config.load_scoring_model()?;
    let engine = LeadQualificationEngine::new(model)?;

    let lead = sample_lead()?;
    let report = engine.qualify_lead(&lead);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
