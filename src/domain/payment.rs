use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::codec::{escape, format_time, EntityKind, StorageCodec, StorageRecord};
use super::common::{format_amount, Displayable, Entry};
use crate::errors::{FinanceError, Result};

const FIELDS: &[&str] = &[
    "description",
    "amount",
    "due",
    "priority",
    "receiver",
    "remark",
    "done",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::None => "none",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Priority {
    type Err = FinanceError;

    fn from_str(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.name() == wanted)
            .ok_or_else(|| FinanceError::InvalidCriteria(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub description: String,
    pub amount: Decimal,
    pub due: NaiveDateTime,
    pub priority: Priority,
    pub receiver: String,
    pub remark: String,
    pub done: bool,
}

impl Payment {
    pub fn new(description: impl Into<String>, amount: Decimal, due: NaiveDateTime) -> Self {
        Self {
            description: description.into(),
            amount,
            due,
            priority: Priority::None,
            receiver: String::new(),
            remark: String::new(),
            done: false,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }
}

impl Displayable for Payment {
    fn display_label(&self) -> String {
        let mut label = format!(
            "{} {} due {}",
            format_amount(self.amount),
            self.description,
            self.due.format("%Y-%m-%d")
        );
        if self.priority != Priority::None {
            label.push_str(&format!(" [{}]", self.priority));
        }
        if !self.receiver.is_empty() {
            label.push_str(&format!(" to {}", self.receiver));
        }
        if self.done {
            label.push_str(" (done)");
        }
        label
    }
}

impl Entry for Payment {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn time(&self) -> NaiveDateTime {
        self.due
    }

    fn tag(&self) -> &str {
        self.priority.name()
    }

    fn is_settled(&self) -> bool {
        self.done
    }

    fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        [&self.description, &self.receiver, &self.remark]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl StorageCodec for Payment {
    const KIND: EntityKind = EntityKind::Payment;

    fn to_storage_string(&self) -> String {
        format!(
            "description:{}\namount:{}\ndue:{}\npriority:{}\nreceiver:{}\nremark:{}\ndone:{}",
            escape(&self.description),
            self.amount,
            format_time(self.due),
            self.priority,
            escape(&self.receiver),
            escape(&self.remark),
            self.done
        )
    }

    fn from_storage_string(raw: &str) -> Result<Self> {
        let record = StorageRecord::parse(Self::KIND, raw)?;
        record.expect_fields(FIELDS)?;
        let priority_raw = record.optional("priority").unwrap_or("none");
        let priority = priority_raw
            .parse::<Priority>()
            .map_err(|_| record.invalid("priority", priority_raw))?;
        Ok(Self {
            description: record.required("description")?.to_string(),
            amount: record.decimal("amount")?,
            due: record.time("due")?,
            priority,
            receiver: record.optional("receiver").unwrap_or_default().to_string(),
            remark: record.optional("remark").unwrap_or_default().to_string(),
            done: record.flag("done")?,
        })
    }
}
