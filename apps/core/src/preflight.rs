//! Preflight Check System
//!
//! Verifies configuration, the aspect dictionary and the sentiment
//! classifier before any review is accepted. A classifier that cannot be
//! loaded is a startup failure, not a per-request one.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::absa::AspectDetector;
use crate::config::{AppConfig, ClassifierBackend};
use crate::fs_manager::PortablePathManager;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_start: bool,
    pub summary: String,
}

/// Performs all preflight checks and returns a report
pub fn run_preflight_checks(config: &AppConfig) -> PreflightReport {
    info!("Running preflight checks (classifier: {:?})", config.classifier);

    let mut checks = Vec::new();

    // 1. Dictionary
    let dictionary_check = check_dictionary(config);
    let dictionary_ok = dictionary_check.passed;
    checks.push(dictionary_check);

    // 2. Matchers compile for the configured mode
    if dictionary_ok {
        checks.push(check_matchers(config));
    } else {
        checks.push(CheckResult::fail(
            "aspect_matchers",
            "Skipped - dictionary not loaded",
            None,
        ));
    }

    // 3. Model directory (embedding backend only)
    if config.classifier == ClassifierBackend::Embedding {
        checks.push(check_models_dir(config));
    }

    // 4. Classifier loads and answers
    checks.push(check_classifier(config));

    let all_passed = checks.iter().all(|c| c.passed);
    let critical_passed = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. Ready to analyze reviews.".to_string()
    } else if critical_passed {
        "Some non-critical checks failed. Analysis can run with warnings.".to_string()
    } else {
        "Critical checks failed. Analysis cannot start.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  ok   {}: {}", check.name, check.message);
        } else {
            warn!("  FAIL {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }

    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        checks,
        ready_to_start: critical_passed,
        summary,
    }
}

fn is_critical_check(name: &str) -> bool {
    matches!(name, "aspect_dictionary" | "aspect_matchers" | "classifier")
}

// --- Individual Checks ---

fn check_dictionary(config: &AppConfig) -> CheckResult {
    match config.load_dictionary() {
        Ok(dictionary) => {
            let phrases: usize = dictionary.iter().map(|(_, p)| p.len()).sum();
            let source = config
                .aspects_path
                .as_ref()
                .map(|p| format!("{:?}", p))
                .unwrap_or_else(|| "default".to_string());
            CheckResult::pass(
                "aspect_dictionary",
                &format!(
                    "{} aspects, {} trigger phrases ({})",
                    dictionary.len(),
                    phrases,
                    source
                ),
            )
        }
        Err(e) => CheckResult::fail(
            "aspect_dictionary",
            "Aspect dictionary could not be loaded",
            Some(e.to_string()),
        ),
    }
}

fn check_matchers(config: &AppConfig) -> CheckResult {
    let built = config
        .load_dictionary()
        .and_then(|dictionary| AspectDetector::new(dictionary, config.match_mode));

    match built {
        Ok(detector) => CheckResult::pass(
            "aspect_matchers",
            &format!("Matchers compiled ({:?} mode)", detector.mode()),
        ),
        Err(e) => CheckResult::fail(
            "aspect_matchers",
            "Trigger phrases could not be compiled",
            Some(e.to_string()),
        ),
    }
}

fn check_models_dir(config: &AppConfig) -> CheckResult {
    match PortablePathManager::ensure_dir(&config.models_dir) {
        Ok(()) => CheckResult::pass(
            "models_dir",
            &format!("Model cache at {:?}", config.models_dir),
        ),
        Err(e) => CheckResult::fail(
            "models_dir",
            "Model cache directory unavailable",
            Some(format!("{:?}: {}", config.models_dir, e)),
        ),
    }
}

fn check_classifier(config: &AppConfig) -> CheckResult {
    let start = Instant::now();

    let classifier = match config.build_classifier() {
        Ok(classifier) => classifier,
        Err(e) => {
            return CheckResult::fail(
                "classifier",
                "Sentiment classifier could not be loaded",
                Some(e.to_string()),
            )
        }
    };

    match classifier.classify("the battery life is great") {
        Ok(result) => CheckResult::pass(
            "classifier",
            &format!(
                "{} classifier loaded in {}ms (smoke test: {} {:.2})",
                classifier.name(),
                start.elapsed().as_millis(),
                result.label,
                result.confidence
            ),
        ),
        Err(e) => CheckResult::fail(
            "classifier",
            "Sentiment classifier loaded but failed to classify",
            Some(e.to_string()),
        ),
    }
}
