//! Test Module
//!
//! Cross-module test suite for the ABSA core.
//!
//! ## Test Categories
//! - `segmentation_tests`: sentence and clause splitting, aspect detection
//! - `pipeline_tests`: end-to-end review analysis with scripted and lexicon classifiers
//! - `insights_tests`: batch runs feeding business insights
//! - `config_tests`: environment configuration and dictionary files
//! - `property_tests`: invariants checked with proptest

pub mod pipeline_tests;
