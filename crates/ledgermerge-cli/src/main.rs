use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use ledgermerge_core::filters::{apply_filters, DateRange, FilterCriteria};
use ledgermerge_core::mapping::{ColumnMapping, MappingSet};
use ledgermerge_core::pipeline::{merge_sources, SourceTable};
use ledgermerge_core::schema::Source;
use ledgermerge_core::summary::{self, ProductRankBy, RankBy};
use polars::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge TR/MC transaction exports into one canonical dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge source exports, optionally filter, and print report tables
    Merge(MergeArgs),
    /// Print the built-in column rename tables
    Mappings,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// TR purchase export (CSV)
    #[arg(long)]
    tr_purchases: Option<PathBuf>,
    /// MC purchase export (CSV)
    #[arg(long)]
    mc_purchases: Option<PathBuf>,
    /// TR sales export (CSV)
    #[arg(long)]
    tr_sales: Option<PathBuf>,
    /// MC sales export (CSV)
    #[arg(long)]
    mc_sales: Option<PathBuf>,
    /// TOML file overriding the built-in column mappings
    #[arg(long)]
    mappings: Option<PathBuf>,
    /// Label stamped on purchase rows
    #[arg(long, default_value = "purchase")]
    purchase_label: String,
    /// Label stamped on sale rows
    #[arg(long, default_value = "sale")]
    sale_label: String,
    /// Keep only rows with one of these process types (repeatable)
    #[arg(long = "process-type")]
    process_types: Option<Vec<String>>,
    /// Keep only rows with one of these partners (repeatable)
    #[arg(long = "partner")]
    partners: Option<Vec<String>>,
    /// Keep only rows with one of these statuses, case-insensitive (repeatable)
    #[arg(long = "status")]
    statuses: Option<Vec<String>>,
    /// Keep only rows with one of these payment methods (repeatable)
    #[arg(long = "payment")]
    payments: Option<Vec<String>>,
    /// Start of the order-date window (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,
    /// End of the order-date window (YYYY-MM-DD, inclusive)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
    /// Write the merged (and filtered) dataset to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Row limit for the customer and product tables
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => handle_merge(args),
        Command::Mappings => handle_mappings(),
    }
}

fn handle_merge(args: MergeArgs) -> Result<()> {
    let mappings = load_mappings(args.mappings.as_deref())?;

    let inputs = [
        (&args.tr_purchases, Source::Tr, &args.purchase_label),
        (&args.mc_purchases, Source::Mc, &args.purchase_label),
        (&args.tr_sales, Source::Tr, &args.sale_label),
        (&args.mc_sales, Source::Mc, &args.sale_label),
    ];

    let mut tables = Vec::new();
    for (path, source, process_type) in inputs {
        let Some(path) = path else { continue };
        let frame = load_csv(path)?;
        info!(
            source = source.as_str(),
            process_type = %process_type,
            rows = frame.height(),
            "loaded {}",
            path.display()
        );
        tables.push(SourceTable {
            frame,
            source,
            process_type: process_type.clone(),
        });
    }

    if tables.is_empty() {
        warn!("no input files supplied; nothing to merge");
        return Ok(());
    }

    let merged = merge_sources(&tables, &mappings)?;

    let criteria = FilterCriteria {
        process_types: args.process_types,
        partners: args.partners,
        statuses: args.statuses,
        payment_methods: args.payments,
        date_range: match (args.from, args.to) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        },
    };
    let report = apply_filters(&merged, &criteria)?;
    if criteria.is_unrestricted() {
        println!("Merged {} rows.", merged.height());
    } else {
        println!(
            "Merged {} rows; {} remain after filters.",
            merged.height(),
            report.height()
        );
    }

    print_overview(&report, &args.purchase_label, &args.sale_label)?;
    print_breakdown(
        "Partners",
        "partner_mc",
        &summary::partner_breakdown(&report, RankBy::Revenue)?,
    )?;
    print_breakdown(
        "Payment methods",
        "payment_method",
        &summary::payment_breakdown(&report, RankBy::Revenue)?,
    )?;
    print_breakdown(
        &format!("Top {} customers", args.top),
        "customer_name",
        &summary::top_customers(&report, RankBy::Revenue, args.top)?,
    )?;
    print_products(
        &format!("Top {} products", args.top),
        &summary::top_products(&report, ProductRankBy::Revenue, args.top)?,
    )?;

    if let Some(path) = &args.output {
        write_csv(&report, path)?;
        info!("wrote {} rows to {}", report.height(), path.display());
    }

    Ok(())
}

fn handle_mappings() -> Result<()> {
    let mappings = MappingSet::builtin();
    for source in [Source::Tr, Source::Mc] {
        print_mapping(source, mappings.for_source(source));
    }
    Ok(())
}

fn load_mappings(path: Option<&Path>) -> Result<MappingSet> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read mapping file {}", path.display()))?;
            MappingSet::from_toml_str(&raw)
                .with_context(|| format!("invalid mapping file {}", path.display()))
        }
        None => Ok(MappingSet::builtin()),
    }
}

fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("failed to parse {} as CSV", path.display()))
}

fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut out = df.clone();
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut out)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn print_overview(df: &DataFrame, purchase_label: &str, sale_label: &str) -> Result<()> {
    let overview = summary::overview(df, purchase_label, sale_label)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Total purchases".to_string(),
        format!("{:.2}", overview.total_purchase),
    ]);
    table.add_row(vec![
        "Total sales".to_string(),
        format!("{:.2}", overview.total_sale),
    ]);
    table.add_row(vec![
        "Difference (sales - purchases)".to_string(),
        format!("{:.2}", overview.difference),
    ]);
    table.add_row(vec![
        "Total amount".to_string(),
        format!("{:.2}", overview.total_amount),
    ]);
    table.add_row(vec![
        "Average margin".to_string(),
        overview
            .average_margin
            .map(|m| format!("{m:.2}"))
            .unwrap_or_else(|| "n/a".to_string()),
    ]);

    println!("\nOverview");
    println!("{table}");
    Ok(())
}

fn print_breakdown(title: &str, key_column: &str, df: &DataFrame) -> Result<()> {
    let keys = df.column(key_column)?.str()?;
    let transactions = df.column("transactions")?.u32()?;
    let totals = df.column("total_price")?.f64()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![key_column, "transactions", "total"]);
    for idx in 0..df.height() {
        table.add_row(vec![
            keys.get(idx).unwrap_or("").to_string(),
            transactions
                .get(idx)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            totals.get(idx).map(|v| format!("{v:.2}")).unwrap_or_default(),
        ]);
    }

    println!("\n{title}");
    println!("{table}");
    Ok(())
}

fn print_products(title: &str, df: &DataFrame) -> Result<()> {
    let keys = df.column("product_currency")?.str()?;
    let quantities = df.column("quantity")?.f64()?;
    let totals = df.column("total_price")?.f64()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["product", "quantity", "revenue"]);
    for idx in 0..df.height() {
        table.add_row(vec![
            keys.get(idx).unwrap_or("").to_string(),
            quantities
                .get(idx)
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
            totals.get(idx).map(|v| format!("{v:.2}")).unwrap_or_default(),
        ]);
    }

    println!("\n{title}");
    println!("{table}");
    Ok(())
}

fn print_mapping(source: Source, mapping: &ColumnMapping) {
    let mut entries: Vec<(&str, &str)> = mapping.entries().collect();
    entries.sort();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["raw column", "canonical column"]);
    for (raw, canonical) in entries {
        table.add_row(vec![raw, canonical]);
    }

    println!("\n{source} mapping ({} columns)", mapping.len());
    println!("{table}");
}
