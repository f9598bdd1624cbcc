//! Line-oriented text encoding used to persist entity lists.
//!
//! Every entity is a block of `key:value` lines; blocks are separated by a blank
//! line. Free-text values are escaped so they never span lines. Each kind decodes through its own [`StorageCodec`] implementation, so
//! the kind-to-decoder table is fixed at compile time.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::common::amount_in_range;
use crate::errors::{FinanceError, Result};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Expense,
    Income,
    Payment,
    Budget,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Expense => "expense",
            EntityKind::Income => "income",
            EntityKind::Payment => "payment",
            EntityKind::Budget => "budget",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::Expense => "expenses.txt",
            EntityKind::Income => "incomes.txt",
            EntityKind::Payment => "payments.txt",
            EntityKind::Budget => "budget.txt",
        }
    }
}

/// Deterministic, bidirectional text encoding of one entity.
pub trait StorageCodec: Sized {
    const KIND: EntityKind;

    fn to_storage_string(&self) -> String;

    fn from_storage_string(raw: &str) -> Result<Self>;
}

/// Encodes a whole list, one block per entity.
pub fn encode_list<T: StorageCodec>(items: &[T]) -> String {
    items
        .iter()
        .map(StorageCodec::to_storage_string)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Decodes a list written by [`encode_list`]. Blank input yields an empty list.
pub fn decode_list<T: StorageCodec>(raw: &str) -> Result<Vec<T>> {
    let normalized = raw.replace("\r\n", "\n");
    let mut items = Vec::new();
    let mut block = Vec::new();
    for line in normalized.lines() {
        if line.trim().is_empty() {
            if !block.is_empty() {
                items.push(T::from_storage_string(&block.join("\n"))?);
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    if !block.is_empty() {
        items.push(T::from_storage_string(&block.join("\n"))?);
    }
    Ok(items)
}

/// Parsed `key:value` block.
#[derive(Debug, Default)]
pub struct StorageRecord {
    kind: &'static str,
    fields: Vec<(String, String)>,
}

impl StorageRecord {
    pub fn parse(kind: EntityKind, raw: &str) -> Result<Self> {
        let mut fields = Vec::new();
        for line in raw.lines() {
            let (key, value) = line.split_once(':').ok_or_else(|| {
                FinanceError::StorageFormatInvalid(format!(
                    "{} line `{}` has no field name",
                    kind.label(),
                    line
                ))
            })?;
            fields.push((key.trim().to_string(), unescape(value)));
        }
        Ok(Self {
            kind: kind.label(),
            fields,
        })
    }

    /// Fails on any field outside `allowed`.
    pub fn expect_fields(&self, allowed: &[&str]) -> Result<()> {
        match self
            .fields
            .iter()
            .find(|(name, _)| !allowed.contains(&name.as_str()))
        {
            Some((name, _)) => Err(FinanceError::StorageFormatInvalid(format!(
                "{} has unknown field `{}`",
                self.kind, name
            ))),
            None => Ok(()),
        }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn required(&self, key: &str) -> Result<&str> {
        self.optional(key).ok_or_else(|| {
            FinanceError::StorageFormatInvalid(format!("{}'s {} field is missing", self.kind, key))
        })
    }

    pub fn all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn decimal(&self, key: &str) -> Result<Decimal> {
        let raw = self.required(key)?;
        Decimal::from_str(raw.trim())
            .ok()
            .filter(|amount| amount_in_range(*amount))
            .ok_or_else(|| self.invalid(key, raw))
    }

    pub fn time(&self, key: &str) -> Result<NaiveDateTime> {
        let raw = self.required(key)?;
        parse_time(raw.trim()).ok_or_else(|| self.invalid(key, raw))
    }

    pub fn flag(&self, key: &str) -> Result<bool> {
        match self.optional(key).map(str::trim) {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(self.invalid(key, other)),
        }
    }

    pub fn invalid(&self, key: &str, value: &str) -> FinanceError {
        FinanceError::StorageFormatInvalid(format!(
            "{}'s {} field has invalid value `{}`",
            self.kind, key, value
        ))
    }
}

/// Escapes `\\`, `\n` and `\r` so a free-text value stays on its own line.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn unescape(value: &str) -> String {
    let mut plain = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            plain.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => plain.push('\n'),
            Some('r') => plain.push('\r'),
            Some('\\') => plain.push('\\'),
            Some(other) => {
                plain.push('\\');
                plain.push(other);
            }
            None => plain.push('\\'),
        }
    }
    plain
}

pub fn format_time(time: NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_splits_on_first_colon_only() {
        let record = StorageRecord::parse(EntityKind::Expense, "description:lunch: ramen").unwrap();
        assert_eq!(record.required("description").unwrap(), "lunch: ramen");
    }

    #[test]
    fn escaped_values_decode_to_the_original_text() {
        let text = "first line\n\nthird \\n line\r";
        let escaped = escape(text);
        assert!(!escaped.contains('\n'));
        let record = StorageRecord::parse(EntityKind::Expense, &format!("description:{}", escaped)).unwrap();
        assert_eq!(record.required("description").unwrap(), text);
    }

    #[test]
    fn record_without_colon_is_malformed() {
        let err = StorageRecord::parse(EntityKind::Expense, "amount 5").unwrap_err();
        assert!(matches!(err, FinanceError::StorageFormatInvalid(_)));
    }

    #[test]
    fn missing_field_names_the_field() {
        let record = StorageRecord::parse(EntityKind::Payment, "amount:5").unwrap();
        let err = record.required("due").unwrap_err();
        assert_eq!(
            err,
            FinanceError::StorageFormatInvalid("payment's due field is missing".into())
        );
    }

    #[test]
    fn time_keeps_sub_second_precision() {
        let time = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_nano_opt(8, 30, 15, 123_456_789)
            .unwrap();
        assert_eq!(parse_time(&format_time(time)), Some(time));
    }
}
