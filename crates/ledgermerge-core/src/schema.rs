use std::fmt;
use std::str::FromStr;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::MergeError;

/// The fixed, source-agnostic column set every normalized table is mapped
/// onto, in output order.
pub const CANONICAL_COLUMNS: [&str; 20] = [
    "source",
    "process_type",
    "order_id",
    "customer_id",
    "customer_name",
    "product_name",
    "amount",
    "total_price",
    "currency",
    "payment_method",
    "status",
    "order_date",
    "partner_mc",
    "invoice",
    "receipt",
    "spot_price",
    "unit_price",
    "margin",
    "sku",
    "qty",
];

/// Columns carrying monetary values that go through the numeric reconciler.
pub const AMOUNT_COLUMNS: [&str; 3] = ["amount", "total_price", "margin"];

/// Derived grouping key appended after unification.
pub const PRODUCT_CURRENCY: &str = "product_currency";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Tr,
    Mc,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Tr => "TR",
            Source::Mc => "MC",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TR" => Ok(Source::Tr),
            "MC" => Ok(Source::Mc),
            other => Err(MergeError::UnknownSource(other.to_string())),
        }
    }
}

/// Dtype a canonical column holds after normalization. The reconciled
/// amount-bearing columns are Float64; everything else stays textual so
/// mixed source encodings survive untouched.
pub fn canonical_dtype(name: &str) -> DataType {
    if AMOUNT_COLUMNS.contains(&name) {
        DataType::Float64
    } else {
        DataType::String
    }
}

/// Reshapes an arbitrary frame onto the canonical schema: canonical order,
/// canonical dtypes, full-null padding for absent columns, and every
/// non-canonical column dropped.
pub fn conform_to_canonical(df: &DataFrame) -> PolarsResult<DataFrame> {
    let height = df.height();
    let mut columns: Vec<Column> = Vec::with_capacity(CANONICAL_COLUMNS.len());
    for name in CANONICAL_COLUMNS {
        let dtype = canonical_dtype(name);
        let column = match df.column(name) {
            Ok(existing) => existing.cast(&dtype)?,
            Err(_) => Series::full_null(name.into(), height, &dtype).into(),
        };
        columns.push(column);
    }
    DataFrame::new(columns)
}

/// A zero-row table that still carries the full canonical schema.
pub fn empty_canonical_frame() -> DataFrame {
    let columns: Vec<Column> = CANONICAL_COLUMNS
        .iter()
        .map(|&name| Series::new_empty(name.into(), &canonical_dtype(name)).into())
        .collect();
    DataFrame::new(columns).expect("canonical column names are unique")
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|n| n.as_str() == name)
}
