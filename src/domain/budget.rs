use std::{collections::BTreeMap, str::FromStr};

use rust_decimal::Decimal;

use super::codec::{escape, EntityKind, StorageCodec, StorageRecord};
use super::common::amount_in_range;
use crate::errors::Result;

/// Monthly spending limit with optional per-tag limits.
///
/// Tag keys are stored trimmed and ASCII-lowercased, matching how spending is
/// attributed to tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Budget {
    pub monthly: Decimal,
    pub tags: BTreeMap<String, Decimal>,
}

impl Budget {
    pub fn set_monthly(&mut self, amount: Decimal) {
        self.monthly = amount;
    }

    pub fn set_tag(&mut self, tag: &str, amount: Decimal) {
        self.tags.insert(tag_key(tag), amount);
    }

    pub fn tag_limit(&self, tag: &str) -> Option<Decimal> {
        self.tags.get(&tag_key(tag)).copied()
    }

    pub fn remaining(&self, spent: Decimal) -> Decimal {
        self.monthly - spent
    }

    pub fn is_set(&self) -> bool {
        !self.monthly.is_zero() || !self.tags.is_empty()
    }
}

impl StorageCodec for Budget {
    const KIND: EntityKind = EntityKind::Budget;

    fn to_storage_string(&self) -> String {
        let mut lines = vec![format!("monthly:{}", self.monthly)];
        lines.extend(
            self.tags
                .iter()
                .map(|(tag, amount)| format!("tag:{}={}", escape(tag), amount)),
        );
        lines.join("\n")
    }

    fn from_storage_string(raw: &str) -> Result<Self> {
        let record = StorageRecord::parse(Self::KIND, raw)?;
        record.expect_fields(&["monthly", "tag"])?;
        let mut budget = Budget {
            monthly: record.decimal("monthly")?,
            tags: BTreeMap::new(),
        };
        for entry in record.all("tag") {
            let (tag, amount) = entry
                .rsplit_once('=')
                .ok_or_else(|| record.invalid("tag", entry))?;
            let amount = Decimal::from_str(amount.trim())
                .ok()
                .filter(|amount| amount_in_range(*amount))
                .ok_or_else(|| record.invalid("tag", entry))?;
            budget.set_tag(tag, amount);
        }
        Ok(budget)
    }
}

fn tag_key(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}
