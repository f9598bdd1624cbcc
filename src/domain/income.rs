use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::codec::{escape, format_time, EntityKind, StorageCodec, StorageRecord};
use super::common::{format_amount, Displayable, Entry};
use crate::errors::Result;

const FIELDS: &[&str] = &["amount", "description", "time", "tag", "recurring"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Income {
    pub amount: Decimal,
    pub description: String,
    pub time: NaiveDateTime,
    pub tag: String,
    pub recurring: bool,
}

impl Income {
    pub fn new(amount: Decimal, description: impl Into<String>, time: NaiveDateTime) -> Self {
        Self {
            amount,
            description: description.into(),
            time,
            tag: String::new(),
            recurring: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }
}

impl Displayable for Income {
    fn display_label(&self) -> String {
        let mut label = format!("{} {}", format_amount(self.amount), self.description);
        if !self.tag.is_empty() {
            label.push_str(&format!(" [{}]", self.tag));
        }
        if self.recurring {
            label.push_str(" (recurring)");
        }
        label
    }
}

impl Entry for Income {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn time(&self) -> NaiveDateTime {
        self.time
    }

    fn tag(&self) -> &str {
        &self.tag
    }

    fn is_recurring(&self) -> bool {
        self.recurring
    }
}

impl StorageCodec for Income {
    const KIND: EntityKind = EntityKind::Income;

    fn to_storage_string(&self) -> String {
        format!(
            "amount:{}\ndescription:{}\ntime:{}\ntag:{}\nrecurring:{}",
            self.amount,
            escape(&self.description),
            format_time(self.time),
            escape(&self.tag),
            self.recurring
        )
    }

    fn from_storage_string(raw: &str) -> Result<Self> {
        let record = StorageRecord::parse(Self::KIND, raw)?;
        record.expect_fields(FIELDS)?;
        Ok(Self {
            amount: record.decimal("amount")?,
            description: record.required("description")?.to_string(),
            time: record.time("time")?,
            tag: record.optional("tag").unwrap_or_default().to_string(),
            recurring: record.flag("recurring")?,
        })
    }
}
