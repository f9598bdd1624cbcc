use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::codec::{escape, format_time, EntityKind, StorageCodec, StorageRecord};
use super::common::{format_amount, Displayable, Entry};
use crate::errors::Result;

const FIELDS: &[&str] = &[
    "amount",
    "description",
    "time",
    "tag",
    "tentative",
    "recurring",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub amount: Decimal,
    pub description: String,
    pub time: NaiveDateTime,
    pub tag: String,
    pub tentative: bool,
    pub recurring: bool,
}

impl Expense {
    pub fn new(amount: Decimal, description: impl Into<String>, time: NaiveDateTime) -> Self {
        Self {
            amount,
            description: description.into(),
            time,
            tag: String::new(),
            tentative: false,
            recurring: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_tentative(mut self, tentative: bool) -> Self {
        self.tentative = tentative;
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        let mut label = format!("{} {}", format_amount(self.amount), self.description);
        if !self.tag.is_empty() {
            label.push_str(&format!(" [{}]", self.tag));
        }
        if self.tentative {
            label.push_str(" (tentative)");
        }
        if self.recurring {
            label.push_str(" (recurring)");
        }
        label
    }
}

impl Entry for Expense {
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

    fn is_tentative(&self) -> bool {
        self.tentative
    }

    fn is_recurring(&self) -> bool {
        self.recurring
    }
}

impl StorageCodec for Expense {
    const KIND: EntityKind = EntityKind::Expense;

    fn to_storage_string(&self) -> String {
        format!(
            "amount:{}\ndescription:{}\ntime:{}\ntag:{}\ntentative:{}\nrecurring:{}",
            self.amount,
            escape(&self.description),
            format_time(self.time),
            escape(&self.tag),
            self.tentative,
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
            tentative: record.flag("tentative")?,
            recurring: record.flag("recurring")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FinanceError;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn lunch() -> Expense {
        let time = NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        Expense::new(Decimal::from_str("1.23").unwrap(), "test description", time)
            .with_tag("food")
            .with_tentative(true)
    }

    #[test]
    fn display_label_lists_flags() {
        assert_eq!(
            lunch().display_label(),
            "$1.23 test description [food] (tentative)"
        );
    }

    #[test]
    fn storage_string_layout() {
        assert_eq!(
            lunch().to_storage_string(),
            "amount:1.23\ndescription:test description\ntime:2024-02-10T12:30:00\ntag:food\ntentative:true\nrecurring:false"
        );
    }

    #[test]
    fn storage_string_round_trips() {
        let expense = lunch().with_recurring(true);
        let decoded = Expense::from_storage_string(&expense.to_storage_string()).unwrap();
        assert_eq!(decoded, expense);
    }

    #[test]
    fn multi_line_text_round_trips() {
        let mut expense = lunch();
        expense.description = "line one\nline two\n\nC:\\temp".into();
        expense.tag = "a\nb".into();
        let encoded = expense.to_storage_string();
        assert_eq!(encoded.lines().count(), 6);
        assert_eq!(Expense::from_storage_string(&encoded).unwrap(), expense);
    }

    #[test]
    fn stored_amount_above_the_limit_is_malformed() {
        let raw = "amount:79228162514264337593543950335\ndescription:x\ntime:2024-02-10T12:30:00";
        assert!(matches!(
            Expense::from_storage_string(raw),
            Err(FinanceError::StorageFormatInvalid(_))
        ));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let raw = "amount:1\ndescription:x\ntime:2024-02-10T12:30:00\nd:1";
        assert!(matches!(
            Expense::from_storage_string(raw),
            Err(FinanceError::StorageFormatInvalid(_))
        ));
    }

    #[test]
    fn bad_amount_is_rejected() {
        let raw = "amount:abc\ndescription:x\ntime:2024-02-10T12:30:00";
        let err = Expense::from_storage_string(raw).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }
}
