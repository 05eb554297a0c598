use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Anything that is not a digit, comma, dot, or minus sign.
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9,.\-]").unwrap());

/// Trailing `<dot>DDD,DD`: dot as thousands grouping, comma as decimal
/// separator.
static TR_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\d{3},\d{2}$").unwrap());

/// Repairs one numeric-like string of unknown decimal convention into an
/// unambiguous dot-decimal value.
///
/// Classification order: TR-style (`1.234,56`) first, then comma-only
/// (`1234,56`, decimal comma), then mixed-but-not-TR (`1,234.56`, comma
/// grouping). Anything that still fails to parse becomes `0.0` — malformed
/// or absent numeric data contributes zero to aggregates rather than
/// rejecting the row. The heuristic is ambiguous for 4-digit grouping and
/// single-digit decimal remainders; that behavior is kept as-is because
/// downstream consumers depend on it.
pub fn reconcile_value(raw: &str) -> f64 {
    let stripped = NON_NUMERIC.replace_all(raw, "");
    let repaired = if TR_FORMAT.is_match(&stripped) {
        stripped.replace('.', "").replace(',', ".")
    } else if stripped.contains(',') && !stripped.contains('.') {
        stripped.replace(',', ".")
    } else if stripped.contains(',') && stripped.contains('.') {
        stripped.replace(',', "")
    } else {
        stripped.into_owned()
    };
    repaired.parse::<f64>().unwrap_or(0.0)
}

/// Applies [`reconcile_value`] over a whole column, stringifying first so
/// numeric inputs pass through unchanged. Nulls come out as `0.0`, so a
/// reconciled column never contains nulls.
pub fn reconcile_column(column: &Column) -> PolarsResult<Column> {
    let strings = column.cast(&DataType::String)?;
    let values = strings.str()?;

    let mut repaired: Vec<f64> = Vec::with_capacity(values.len());
    for value in values.into_iter() {
        repaired.push(value.map(reconcile_value).unwrap_or(0.0));
    }

    Ok(Series::new(column.name().clone(), repaired).into())
}
