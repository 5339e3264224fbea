//! Lead Scoring & Qualification Library
//!
//! This library scores enriched B2B lead records against a configurable
//! scoring model and turns the results into sales-ready qualification
//! reports: tier, priority, action plan, and outreach strategy.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `models`: Core data models (leads, contacts, signals).
//! - `qualifier`: Intent analysis and the qualification engine.
//! - `rules`: Declarative rule evaluation.
//! - `scorer`: The category scoring engine.
//! - `scoring_model`: Scoring model configuration types.
//! - `taxonomy`: Keyword tables driving signal detection.

pub mod config;
pub mod errors;
pub mod models;
pub mod qualifier;
pub mod rules;
pub mod scorer;
pub mod scoring_model;
pub mod taxonomy;
