use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{MergeError, Result};
use crate::identifiers::clean_unified_ids;
use crate::mapping::MappingSet;
use crate::normalize::normalize_table;
use crate::schema::{Source, PRODUCT_CURRENCY};
use crate::unify::unify_frames;

/// One raw export together with its provenance tags. The frame is whatever
/// an upstream loader produced; the tags come from the caller, never from
/// row content.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub frame: DataFrame,
    pub source: Source,
    pub process_type: String,
}

/// Full merge pipeline: normalize each input, unify source-major, clean TR
/// identifiers, trim and lowercase `payment_method`, and append the derived
/// `product_currency` grouping key. Zero inputs produce an empty canonical
/// frame, not an error.
pub fn merge_sources(tables: &[SourceTable], mappings: &MappingSet) -> Result<DataFrame> {
    let mut normalized = Vec::with_capacity(tables.len());
    for table in tables {
        let mapping = mappings.for_source(table.source);
        let frame = normalize_table(&table.frame, mapping, table.source, &table.process_type)
            .map_err(|err| MergeError::MalformedInput {
                name: format!("{}/{}", table.source, table.process_type),
                reason: err.to_string(),
            })?;
        debug!(
            source = table.source.as_str(),
            process_type = %table.process_type,
            rows = frame.height(),
            "normalized input table"
        );
        normalized.push(frame);
    }

    let unified = unify_frames(&normalized)?;
    let cleaned = clean_unified_ids(&unified)?;
    let cleaned = normalize_payment_method(&cleaned)?;
    let merged = with_product_currency(&cleaned)?;

    info!(
        tables = tables.len(),
        rows = merged.height(),
        "merged source tables"
    );
    Ok(merged)
}

/// `payment_method` is compared lowercased everywhere downstream, so it is
/// stored trimmed and lowercased once here. Nulls stay null.
fn normalize_payment_method(df: &DataFrame) -> Result<DataFrame> {
    let methods = df.column("payment_method")?.str()?;
    let lowered: Vec<Option<String>> = methods
        .into_iter()
        .map(|value| value.map(|v| v.trim().to_lowercase()))
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new("payment_method".into(), lowered))?;
    Ok(out)
}

/// Appends `product_currency`, the grouping key that keeps identically
/// named products in different currencies apart. Missing sides render as
/// empty, so the key is always present.
fn with_product_currency(df: &DataFrame) -> Result<DataFrame> {
    let products = df.column("product_name")?.str()?;
    let currencies = df.column("currency")?.str()?;

    let mut keys: Vec<String> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        keys.push(format!(
            "{} / {}",
            products.get(idx).unwrap_or(""),
            currencies.get(idx).unwrap_or("")
        ));
    }

    let mut out = df.clone();
    out.with_column(Series::new(PRODUCT_CURRENCY.into(), keys))?;
    Ok(out)
}
