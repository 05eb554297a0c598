use ledgermerge_core::schema::empty_canonical_frame;
use ledgermerge_core::summary::{
    overview, partner_breakdown, payment_breakdown, top_customers, top_products, ProductRankBy,
    RankBy,
};
use polars::df;
use polars::prelude::*;

fn sample_frame() -> DataFrame {
    df!(
        "process_type" => ["purchase", "sale", "sale", "purchase"],
        "order_id" => [Some("1"), Some("2"), None, Some("4")],
        "partner_mc" => [Some("TR"), Some("acme"), Some("acme"), None],
        "payment_method" => ["visa", "wire", "visa", "visa"],
        "customer_name" => ["Ann", "Ann", "Bob", "Cem"],
        "product_currency" => ["Gold / USD", "Gold / EUR", "Gold / USD", "Silver / USD"],
        "amount" => [1.0_f64, 2.0, 3.0, 5.0],
        "total_price" => [10.0_f64, 30.0, 5.0, 20.0],
        "margin" => [2.0_f64, 4.0, 6.0, 8.0],
    )
    .unwrap()
}

#[test]
fn overview_splits_totals_on_the_process_labels() {
    let report = overview(&sample_frame(), "purchase", "sale").unwrap();

    assert_eq!(report.total_purchase, 30.0);
    assert_eq!(report.total_sale, 35.0);
    assert_eq!(report.difference, 5.0);
    assert_eq!(report.total_amount, 11.0);
    assert_eq!(report.average_margin, Some(5.0));
}

#[test]
fn overview_of_an_empty_dataset_is_all_zeroes_with_no_margin() {
    let report = overview(&empty_canonical_frame(), "purchase", "sale").unwrap();

    assert_eq!(report.total_purchase, 0.0);
    assert_eq!(report.total_sale, 0.0);
    assert_eq!(report.difference, 0.0);
    assert_eq!(report.total_amount, 0.0);
    assert_eq!(report.average_margin, None);
}

#[test]
fn partner_breakdown_counts_non_null_orders_and_sums_revenue() {
    let out = partner_breakdown(&sample_frame(), RankBy::Revenue).unwrap();

    // The null partner row is dropped, leaving two groups sorted by revenue.
    assert_eq!(out.height(), 2);
    let partners = out.column("partner_mc").unwrap().str().unwrap();
    assert_eq!(partners.get(0), Some("acme"));
    assert_eq!(partners.get(1), Some("TR"));

    let totals = out.column("total_price").unwrap().f64().unwrap();
    assert_eq!(totals.get(0), Some(35.0));
    assert_eq!(totals.get(1), Some(10.0));

    // acme has two rows but only one non-null order_id.
    let transactions = out.column("transactions").unwrap().u32().unwrap();
    assert_eq!(transactions.get(0), Some(1));
    assert_eq!(transactions.get(1), Some(1));
}

#[test]
fn breakdown_can_rank_by_transaction_count_instead() {
    let out = payment_breakdown(&sample_frame(), RankBy::Transactions).unwrap();

    let methods = out.column("payment_method").unwrap().str().unwrap();
    assert_eq!(methods.get(0), Some("visa"));

    let transactions = out.column("transactions").unwrap().u32().unwrap();
    assert_eq!(transactions.get(0), Some(2));
}

#[test]
fn top_customers_truncates_to_the_requested_limit() {
    let out = top_customers(&sample_frame(), RankBy::Revenue, 1).unwrap();

    assert_eq!(out.height(), 1);
    let customers = out.column("customer_name").unwrap().str().unwrap();
    assert_eq!(customers.get(0), Some("Ann"));
    let totals = out.column("total_price").unwrap().f64().unwrap();
    assert_eq!(totals.get(0), Some(40.0));
}

#[test]
fn top_products_group_on_the_product_currency_key() {
    let out = top_products(&sample_frame(), ProductRankBy::Quantity, 10).unwrap();

    // Gold splits into one group per currency.
    assert_eq!(out.height(), 3);
    let products = out.column("product_currency").unwrap().str().unwrap();
    assert_eq!(products.get(0), Some("Silver / USD"));
    let quantities = out.column("quantity").unwrap().f64().unwrap();
    assert_eq!(quantities.get(0), Some(5.0));
}
