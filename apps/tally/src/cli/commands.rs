//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::observe::TracingObserver;
use crate::providers::StandardProviders;
use crate::rules::{StandardCalcData, standard_rules};
use std::path::Path;
use std::sync::Arc;
use tally_core::{CartRequest, CompletedCalculation, Pipeline};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for a calculation request (1 MB).
///
/// A cart request is small; anything larger is a wrong file.
const MAX_REQUEST_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        AppError::Request(format!("cannot read metadata of '{}': {e}", path.display()))
    })?;

    if metadata.len() > max_size {
        return Err(AppError::Request(format!(
            "file size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// REQUEST LOADING & VALIDATION
// =============================================================================

/// Read and parse a request file.
fn load_request(path: &Path) -> Result<CartRequest, AppError> {
    validate_file_size(path, MAX_REQUEST_FILE_SIZE)?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::Request(format!("cannot read '{}': {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| AppError::Request(format!("cannot parse '{}': {e}", path.display())))
}

/// Validate a request before it reaches the pipeline.
///
/// This is the caller-side check that runs ahead of the engine: the engine
/// itself accepts any request and leaves input validation to its callers.
pub fn validate_request(request: &CartRequest) -> Result<(), AppError> {
    if request.items.is_empty() {
        return Err(AppError::Request(format!(
            "cart '{}' has no items",
            request.cart_id
        )));
    }
    for item in &request.items {
        if item.quantity == 0 {
            return Err(AppError::Request(format!(
                "item '{}' has zero quantity",
                item.sku
            )));
        }
    }
    Ok(())
}

// =============================================================================
// CALCULATE COMMAND
// =============================================================================

/// Build the standard pipeline with tracing observation.
pub fn standard_pipeline() -> Result<Pipeline<StandardCalcData, StandardProviders>, AppError> {
    let pipeline = Pipeline::new().with_observer(Arc::new(TracingObserver));
    pipeline.register_rules(standard_rules())?;
    Ok(pipeline)
}

/// Run a request through the standard pipeline and print the result.
pub async fn cmd_calculate(
    config_path: &Path,
    request_path: &Path,
    json_mode: bool,
) -> Result<(), AppError> {
    let config = AppConfig::load(config_path)?;
    let providers = StandardProviders::from_config(&config);
    let request = load_request(request_path)?;
    validate_request(&request)?;

    tracing::info!(cart_id = %request.cart_id, items = request.items.len(), "calculate.start");

    let pipeline = standard_pipeline()?;
    let completed = pipeline.calculate(request, &providers).await?;

    print_completed(&completed, json_mode);
    Ok(())
}

fn print_completed(completed: &CompletedCalculation<StandardCalcData>, json_mode: bool) {
    if json_mode {
        let output = serde_json::json!({
            "cart_id": completed.request.cart_id,
            "structure": completed.structure,
            "calculation_data": completed.data,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return;
    }

    let currency = completed
        .structure
        .currency
        .as_ref()
        .map_or("?", |c| c.as_str());

    println!("Cart {}", completed.request.cart_id);
    println!("==================");
    for line in &completed.structure.lines {
        println!(
            "  {:<16} x{:<3} @ {:>8}   {:>10}",
            line.sku.as_str(),
            line.quantity,
            line.unit_price,
            line.line_total
        );
    }
    if let Some(totals) = &completed.structure.totals {
        println!();
        println!("  Subtotal:    {:>10} {}", totals.subtotal, currency);
        println!("  Discount:    {:>10} {}", totals.discount_total, currency);
        println!("  Tax:         {:>10} {}", totals.tax_total, currency);
        println!("  Grand total: {:>10} {}", totals.grand_total, currency);
    }
    if let Some(code) = &completed.data.promo_applied {
        println!("  Promo applied: {code}");
    }
}

// =============================================================================
// RULES COMMAND
// =============================================================================

/// Show the rule execution order of the standard pipeline.
pub fn cmd_rules(json_mode: bool) -> Result<(), AppError> {
    let pipeline = standard_pipeline()?;
    let order = pipeline.rule_order();

    if json_mode {
        let output: Vec<_> = order
            .iter()
            .map(|(name, priority)| {
                serde_json::json!({ "rule": name, "priority": priority.value() })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Standard rule order");
    println!("==================");
    for (name, priority) in order {
        println!("  {:>6}  {}", priority.value(), name);
    }
    Ok(())
}
