//! `verify` and `verify-links` command handlers.
//!
//! Both print a JSON document with the per-property rows and a summary, and
//! exit non-zero when any property is not available.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use staycheck_agoda::AgodaClient;
use staycheck_core::AppConfig;
use staycheck_verify::{
    AvailabilityVerifier, LinkCandidate, LinkVerification, VerificationResult, VerificationSummary,
};

#[derive(Debug, Serialize)]
struct VerifyReport<'a, T> {
    summary: VerificationSummary,
    results: &'a [T],
}

pub(crate) async fn run_verify(
    client: AgodaClient,
    config: &AppConfig,
    properties: &[i64],
    currency: Option<&str>,
    adults: Option<u32>,
) -> anyhow::Result<ExitCode> {
    let currency = resolve_currency(config, currency);
    let adults = adults.unwrap_or(config.default_adults);

    let mut verifier = AvailabilityVerifier::new(client);
    let mut results: Vec<VerificationResult> = Vec::with_capacity(properties.len());
    for (i, &property_id) in properties.iter().enumerate() {
        tracing::info!(index = i + 1, total = properties.len(), property_id, "verifying");
        let result = verifier.verify(property_id, &currency, adults).await?;
        tracing::debug!(property_id, dates = ?result.dates_tried(), "dates tried");
        results.push(result);
    }

    let summary = VerificationSummary::from_results(&results);
    emit(&VerifyReport {
        summary,
        results: &results,
    })?;
    Ok(exit_code(summary))
}

pub(crate) async fn run_verify_links(
    client: AgodaClient,
    config: &AppConfig,
    input: &Path,
    currency: Option<&str>,
    adults: Option<u32>,
) -> anyhow::Result<ExitCode> {
    let candidates = read_candidates(input)?;
    if candidates.is_empty() {
        tracing::warn!(path = %input.display(), "no links to verify");
    }

    let currency = resolve_currency(config, currency);
    let adults = adults.unwrap_or(config.default_adults);

    let mut verifier = AvailabilityVerifier::new(client);
    let rows: Vec<LinkVerification> = verifier.verify_links(&candidates, &currency, adults).await?;

    let summary = VerificationSummary::from_results(rows.iter().map(|r| &r.result));
    emit(&VerifyReport {
        summary,
        results: &rows,
    })?;
    Ok(exit_code(summary))
}

pub(crate) fn read_candidates(path: &Path) -> anyhow::Result<Vec<LinkCandidate>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse link list {}: {e}", path.display()))
}

fn resolve_currency(config: &AppConfig, currency: Option<&str>) -> String {
    currency.map_or_else(
        || config.default_currency.clone(),
        |c| c.trim().to_ascii_uppercase(),
    )
}

pub(crate) fn exit_code(summary: VerificationSummary) -> ExitCode {
    tracing::info!(
        total = summary.total,
        available = summary.available,
        unavailable = summary.unavailable,
        errors = summary.errors,
        "verification summary"
    );
    if summary.healthy {
        ExitCode::SUCCESS
    } else {
        tracing::warn!(issues = summary.issues(), "found properties that are not bookable");
        ExitCode::FAILURE
    }
}

fn emit<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
