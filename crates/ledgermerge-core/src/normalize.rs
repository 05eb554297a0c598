use std::collections::HashSet;

use polars::prelude::*;

use crate::error::Result;
use crate::mapping::ColumnMapping;
use crate::numeric::reconcile_column;
use crate::schema::{self, has_column, Source, AMOUNT_COLUMNS};

/// Trims, lowercases, and replaces spaces and hyphens with underscores.
/// Applied identically to table columns and mapping keys before matching.
pub fn sanitize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Maps a raw source table onto the canonical schema.
///
/// Columns are sanitized and renamed through `mapping`; when two raw columns
/// collapse onto the same name, the first occurrence wins and later ones are
/// dropped. `source` and `process_type` are stamped as constant columns,
/// overwriting anything the rename produced. TR rows always get
/// `partner_mc = "TR"`, as does any table that arrives without a partner
/// column. Amount-bearing columns are repaired to dot-decimal Float64, then
/// the result is padded and reordered onto the canonical schema.
pub fn normalize_table(
    df: &DataFrame,
    mapping: &ColumnMapping,
    source: Source,
    process_type: &str,
) -> Result<DataFrame> {
    let mut table = rename_columns(df, mapping)?;
    let height = table.height();

    table.with_column(constant_column("source", source.as_str(), height))?;
    table.with_column(constant_column("process_type", process_type, height))?;

    if source == Source::Tr || !has_column(&table, "partner_mc") {
        table.with_column(constant_column("partner_mc", Source::Tr.as_str(), height))?;
    }

    for name in AMOUNT_COLUMNS {
        if has_column(&table, name) {
            let repaired = reconcile_column(table.column(name)?)?;
            table.with_column(repaired)?;
        }
    }

    Ok(schema::conform_to_canonical(&table)?)
}

fn rename_columns(df: &DataFrame, mapping: &ColumnMapping) -> Result<DataFrame> {
    let mut seen: HashSet<String> = HashSet::with_capacity(df.width());
    let mut columns: Vec<Column> = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        let sanitized = sanitize_column_name(column.name().as_str());
        let name = mapping
            .resolve(&sanitized)
            .map(str::to_string)
            .unwrap_or(sanitized);
        if !seen.insert(name.clone()) {
            continue;
        }
        let renamed = column
            .as_materialized_series()
            .clone()
            .with_name(name.into());
        columns.push(renamed.into());
    }

    Ok(DataFrame::new(columns)?)
}

fn constant_column(name: &str, value: &str, height: usize) -> Series {
    Series::new(name.into(), vec![value; height])
}
