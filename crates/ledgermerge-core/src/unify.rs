use polars::prelude::*;

use crate::error::Result;
use crate::schema;

/// Concatenates normalized tables into one, source-major: all rows of the
/// first table, then the next. Insertion order is load-bearing for
/// downstream insertion-stable aggregations. Rows are never deduplicated
/// across tables; the `source` column differentiates legitimate repeats.
///
/// Every input is conformed to the canonical schema first, so the output
/// carries every canonical column even when no input did. Zero inputs
/// yield an empty canonical frame rather than an error.
pub fn unify_frames(frames: &[DataFrame]) -> Result<DataFrame> {
    if frames.is_empty() {
        return Ok(schema::empty_canonical_frame());
    }

    let mut conformed = frames
        .iter()
        .map(|df| schema::conform_to_canonical(df).map_err(Into::into))
        .collect::<Result<Vec<_>>>()?;

    let mut combined = conformed.remove(0);
    for frame in conformed {
        combined.vstack_mut(&frame)?;
    }

    Ok(combined)
}
