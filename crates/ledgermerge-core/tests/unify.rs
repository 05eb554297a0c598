use ledgermerge_core::mapping::ColumnMapping;
use ledgermerge_core::normalize::normalize_table;
use ledgermerge_core::schema::{Source, CANONICAL_COLUMNS};
use ledgermerge_core::unify::unify_frames;
use polars::df;

#[test]
fn zero_inputs_yield_an_empty_frame_with_the_full_schema() {
    let out = unify_frames(&[]).unwrap();

    assert_eq!(out.height(), 0);
    let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, CANONICAL_COLUMNS);
}

#[test]
fn row_counts_are_conserved_and_order_is_source_major() {
    let tr = normalize_table(
        &df!("id" => ["t1", "t2"]).unwrap(),
        &ColumnMapping::tr(),
        Source::Tr,
        "purchase",
    )
    .unwrap();
    let mc = normalize_table(
        &df!("id" => ["m1"]).unwrap(),
        &ColumnMapping::mc(),
        Source::Mc,
        "purchase",
    )
    .unwrap();

    let out = unify_frames(&[tr.clone(), mc.clone()]).unwrap();

    assert_eq!(out.height(), tr.height() + mc.height());
    let sources = out.column("source").unwrap().str().unwrap();
    assert_eq!(sources.get(0), Some("TR"));
    assert_eq!(sources.get(1), Some("TR"));
    assert_eq!(sources.get(2), Some("MC"));
    let ids = out.column("order_id").unwrap().str().unwrap();
    assert_eq!(ids.get(0), Some("t1"));
    assert_eq!(ids.get(2), Some("m1"));
}

#[test]
fn partial_inputs_are_conformed_to_the_canonical_schema() {
    // A frame that never went through the normalizer still comes out with
    // every canonical column, missing ones padded with nulls.
    let partial = df!("amount" => [1.5_f64], "stray" => ["dropped"]).unwrap();

    let out = unify_frames(&[partial]).unwrap();

    let names: Vec<&str> = out.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, CANONICAL_COLUMNS);
    assert_eq!(out.column("customer_name").unwrap().null_count(), 1);
    assert_eq!(out.column("amount").unwrap().f64().unwrap().get(0), Some(1.5));
}

#[test]
fn identical_rows_from_two_tables_are_not_deduplicated() {
    let frame = normalize_table(
        &df!("id" => ["same"]).unwrap(),
        &ColumnMapping::tr(),
        Source::Tr,
        "purchase",
    )
    .unwrap();

    let out = unify_frames(&[frame.clone(), frame]).unwrap();

    assert_eq!(out.height(), 2);
}
