use polars::prelude::*;

use crate::error::Result;
use crate::schema::PRODUCT_CURRENCY;

/// Headline figures over a merged (optionally filtered) dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOverview {
    pub total_purchase: f64,
    pub total_sale: f64,
    /// Sale minus purchase.
    pub difference: f64,
    pub total_amount: f64,
    /// `None` when no row carries a margin.
    pub average_margin: Option<f64>,
}

/// Sort metric for the partner / payment / customer breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Transactions,
    Revenue,
}

/// Sort metric for the product breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductRankBy {
    Quantity,
    Revenue,
}

/// Purchase and sale totals split on the caller's process-type labels, plus
/// overall amount and mean margin.
pub fn overview(df: &DataFrame, purchase_label: &str, sale_label: &str) -> Result<MergeOverview> {
    let process_types = df.column("process_type")?.str()?;
    let totals = df.column("total_price")?.f64()?;

    let mut total_purchase = 0.0;
    let mut total_sale = 0.0;
    for idx in 0..df.height() {
        let Some(label) = process_types.get(idx) else {
            continue;
        };
        let value = totals.get(idx).unwrap_or(0.0);
        if label == purchase_label {
            total_purchase += value;
        } else if label == sale_label {
            total_sale += value;
        }
    }

    let total_amount = df.column("amount")?.f64()?.sum().unwrap_or(0.0);
    let average_margin = df.column("margin")?.f64()?.mean();

    Ok(MergeOverview {
        total_purchase,
        total_sale,
        difference: total_sale - total_purchase,
        total_amount,
        average_margin,
    })
}

/// Transaction count and revenue per partner, sorted descending.
pub fn partner_breakdown(df: &DataFrame, rank_by: RankBy) -> Result<DataFrame> {
    grouped_breakdown(df, "partner_mc", rank_by, None)
}

/// Transaction count and revenue per payment method, sorted descending.
pub fn payment_breakdown(df: &DataFrame, rank_by: RankBy) -> Result<DataFrame> {
    grouped_breakdown(df, "payment_method", rank_by, None)
}

/// The `limit` most active customers by the chosen metric.
pub fn top_customers(df: &DataFrame, rank_by: RankBy, limit: usize) -> Result<DataFrame> {
    grouped_breakdown(df, "customer_name", rank_by, Some(limit))
}

/// The `limit` best-moving products, keyed by `product_currency` so the
/// same product name in two currencies stays two rows.
pub fn top_products(df: &DataFrame, rank_by: ProductRankBy, limit: usize) -> Result<DataFrame> {
    let sort_column = match rank_by {
        ProductRankBy::Quantity => "quantity",
        ProductRankBy::Revenue => "total_price",
    };

    let frame = df
        .clone()
        .lazy()
        .filter(col(PRODUCT_CURRENCY).is_not_null())
        .group_by([col(PRODUCT_CURRENCY)])
        .agg([
            col("amount").sum().alias("quantity"),
            col("total_price").sum().alias("total_price"),
        ])
        .sort(
            [sort_column],
            SortMultipleOptions::default().with_order_descending(true),
        )
        .limit(limit as IdxSize)
        .collect()?;
    Ok(frame)
}

fn grouped_breakdown(
    df: &DataFrame,
    key: &str,
    rank_by: RankBy,
    limit: Option<usize>,
) -> Result<DataFrame> {
    let sort_column = match rank_by {
        RankBy::Transactions => "transactions",
        RankBy::Revenue => "total_price",
    };

    let mut lf = df
        .clone()
        .lazy()
        // Rows without a group key carry no usable label; drop them rather
        // than reporting a null group.
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([
            col("order_id").count().alias("transactions"),
            col("total_price").sum().alias("total_price"),
        ])
        .sort(
            [sort_column],
            SortMultipleOptions::default().with_order_descending(true),
        );
    if let Some(limit) = limit {
        lf = lf.limit(limit as IdxSize);
    }
    Ok(lf.collect()?)
}
