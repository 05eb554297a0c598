use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::error::Result;

/// Inclusive calendar-day range over `order_date`. The end boundary is
/// extended to 23:59:59 before comparison, so a same-day range covers the
/// whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Independent optional predicates combined by conjunction. `None` means
/// "unset, restricts nothing"; `Some` with an empty set is an honest
/// "match nothing". Membership on `process_type` and `partner_mc` is
/// case-sensitive; `status` compares lowercased on both sides;
/// `payment_method` criteria are lowercased against row values the
/// pipeline already lowercased.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub process_types: Option<Vec<String>>,
    pub partners: Option<Vec<String>>,
    pub statuses: Option<Vec<String>>,
    pub payment_methods: Option<Vec<String>>,
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.process_types.is_none()
            && self.partners.is_none()
            && self.statuses.is_none()
            && self.payment_methods.is_none()
            && self.date_range.is_none()
    }
}

/// Returns the subset of rows satisfying every supplied criterion, as a new
/// frame. The input is never mutated; callers needing unfiltered access
/// keep their reference to it.
pub fn apply_filters(df: &DataFrame, criteria: &FilterCriteria) -> Result<DataFrame> {
    let mut mask = vec![true; df.height()];

    if let Some(values) = &criteria.process_types {
        retain_membership(df, "process_type", values, false, &mut mask)?;
    }
    if let Some(values) = &criteria.partners {
        retain_membership(df, "partner_mc", values, false, &mut mask)?;
    }
    if let Some(values) = &criteria.statuses {
        retain_membership(df, "status", values, true, &mut mask)?;
    }
    if let Some(values) = &criteria.payment_methods {
        let lowered: Vec<String> = values.iter().map(|v| v.to_lowercase()).collect();
        retain_membership(df, "payment_method", &lowered, false, &mut mask)?;
    }
    if let Some(range) = &criteria.date_range {
        retain_date_range(df, range, &mut mask)?;
    }

    let mask = Series::new("mask".into(), mask);
    Ok(df.filter(mask.bool()?)?)
}

fn retain_membership(
    df: &DataFrame,
    column: &str,
    values: &[String],
    case_insensitive: bool,
    mask: &mut [bool],
) -> Result<()> {
    let allowed: HashSet<String> = values
        .iter()
        .map(|v| {
            if case_insensitive {
                v.to_lowercase()
            } else {
                v.clone()
            }
        })
        .collect();

    let cells = df.column(column)?.str()?;
    for (idx, keep) in mask.iter_mut().enumerate() {
        if !*keep {
            continue;
        }
        *keep = match cells.get(idx) {
            Some(value) if case_insensitive => allowed.contains(&value.to_lowercase()),
            Some(value) => allowed.contains(value),
            // A null cell never satisfies an active membership criterion.
            None => false,
        };
    }
    Ok(())
}

fn retain_date_range(df: &DataFrame, range: &DateRange, mask: &mut [bool]) -> Result<()> {
    let start = range.start.and_hms_opt(0, 0, 0).unwrap();
    let end = range.end.and_hms_opt(23, 59, 59).unwrap();

    let cells = df.column("order_date")?.str()?;
    for (idx, keep) in mask.iter_mut().enumerate() {
        if !*keep {
            continue;
        }
        *keep = match cells.get(idx).and_then(parse_order_date) {
            Some(ts) => ts >= start && ts <= end,
            // Unparseable or absent dates are excluded by an active range.
            None => false,
        };
    }
    Ok(())
}

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Tolerant `order_date` parsing: each known timestamp format is probed in
/// order, then date-only formats (midnight). Returns `None` for anything
/// unrecognized.
pub fn parse_order_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}
