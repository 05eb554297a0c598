use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{MergeError, Result};
use crate::normalize::sanitize_column_name;
use crate::schema::{Source, CANONICAL_COLUMNS};

/// Source-specific rename table: sanitized raw column name -> canonical name.
///
/// Keys are sanitized at construction with the same rules applied to table
/// columns, so a mapping written as `"Name-Surname"` still matches an export
/// whose header reads `name_surname`.
#[derive(Debug, Clone, Default)]
pub struct ColumnMapping {
    renames: HashMap<String, String>,
}

impl ColumnMapping {
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let renames = pairs
            .into_iter()
            .map(|(raw, canonical)| (sanitize_column_name(raw), canonical.to_string()))
            .collect();
        Self { renames }
    }

    /// Rename table for TR exports.
    pub fn tr() -> Self {
        Self::from_pairs([
            ("id", "order_id"),
            ("customer_id", "customer_id"),
            ("order_id", "order_id"),
            ("name-surname", "customer_name"),
            ("currency", "currency"),
            ("amount", "amount"),
            ("total", "total_price"),
            ("status", "status"),
            ("dekont", "invoice"),
            ("create_date", "order_date"),
            ("payment_method", "payment_method"),
            ("provider_name", "partner_mc"),
            ("order_type", "process_type"),
            ("spot_price", "spot_price"),
            ("unit_price", "unit_price"),
            ("margin", "margin"),
            ("product_name", "product_name"),
            ("sku", "sku"),
            ("qty", "qty"),
        ])
    }

    /// Rename table for MC exports.
    pub fn mc() -> Self {
        Self::from_pairs([
            ("id", "order_id"),
            ("customer", "customer_name"),
            ("partner", "partner_mc"),
            ("product", "product_name"),
            ("amount", "amount"),
            ("total", "total_price"),
            ("comission", "margin"),
            ("payment_type", "payment_method"),
            ("invoice", "invoice"),
            ("receipt", "receipt"),
            ("status", "status"),
            ("order_date", "order_date"),
        ])
    }

    pub fn resolve(&self, sanitized: &str) -> Option<&str> {
        self.renames.get(sanitized).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct MappingSetFile {
    tr: Option<HashMap<String, String>>,
    mc: Option<HashMap<String, String>>,
}

/// One rename table per source. Built statically; a TOML override exists for
/// nonstandard exports. Passed into the normalizer explicitly, never held as
/// process-wide mutable state.
#[derive(Debug, Clone)]
pub struct MappingSet {
    tr: ColumnMapping,
    mc: ColumnMapping,
}

impl Default for MappingSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MappingSet {
    pub fn builtin() -> Self {
        Self {
            tr: ColumnMapping::tr(),
            mc: ColumnMapping::mc(),
        }
    }

    pub fn for_source(&self, source: Source) -> &ColumnMapping {
        match source {
            Source::Tr => &self.tr,
            Source::Mc => &self.mc,
        }
    }

    /// Parses a mapping override file. A `[tr]` or `[mc]` table replaces the
    /// built-in mapping for that source wholesale; a missing table keeps the
    /// built-in one. Every rename target must be a canonical column.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: MappingSetFile = toml::from_str(raw)?;
        let builtin = Self::builtin();
        Ok(Self {
            tr: file.tr.map(Self::validated).transpose()?.unwrap_or(builtin.tr),
            mc: file.mc.map(Self::validated).transpose()?.unwrap_or(builtin.mc),
        })
    }

    fn validated(raw: HashMap<String, String>) -> Result<ColumnMapping> {
        for target in raw.values() {
            if !CANONICAL_COLUMNS.contains(&target.as_str()) {
                return Err(MergeError::Config(format!(
                    "mapping target '{target}' is not a canonical column"
                )));
            }
        }
        Ok(ColumnMapping::from_pairs(
            raw.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        ))
    }
}
