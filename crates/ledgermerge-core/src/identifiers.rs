use polars::prelude::*;

use crate::error::Result;
use crate::schema::{has_column, Source};

const ID_COLUMNS: [&str; 2] = ["order_id", "customer_id"];

/// Strips locale-inserted grouping punctuation (`.` and `,`) from the
/// identifier columns of TR-sourced rows. TR exports format identifiers
/// with thousands grouping, which must go before identifiers can be
/// compared or joined. Rows from other sources pass through untouched,
/// as do nulls. Runs post-unification so the `source` discriminator is
/// available uniformly.
pub fn clean_unified_ids(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    let source = df.column("source")?.str()?;
    let tr = Source::Tr.as_str();

    for name in ID_COLUMNS {
        if !has_column(df, name) {
            continue;
        }
        let ids = df.column(name)?.str()?;
        let mut cleaned: Vec<Option<String>> = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            cleaned.push(ids.get(idx).map(|id| {
                if source.get(idx) == Some(tr) {
                    id.chars().filter(|c| *c != '.' && *c != ',').collect()
                } else {
                    id.to_string()
                }
            }));
        }
        out.with_column(Series::new(name.into(), cleaned))?;
    }

    Ok(out)
}
