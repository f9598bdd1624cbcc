use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Supplies a presentation-ready label for panes, messages or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Shape shared by every entity kept in a [`crate::ledger::DerivedView`].
pub trait Entry: Clone + Displayable {
    fn amount(&self) -> Decimal;

    fn description(&self) -> &str;

    /// Timestamp used by view scopes and time ordering. Payments report their due time.
    fn time(&self) -> NaiveDateTime;

    /// Tag, category or priority label used by tag filters and tag totals.
    fn tag(&self) -> &str;

    fn is_tentative(&self) -> bool {
        false
    }

    fn is_recurring(&self) -> bool {
        false
    }

    /// Settled entries (done payments) never count as outstanding.
    fn is_settled(&self) -> bool {
        false
    }

    fn date(&self) -> NaiveDate {
        self.time().date()
    }

    /// Case-insensitive keyword match against the searchable text fields.
    fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        self.description().to_lowercase().contains(&needle)
            || self.tag().to_lowercase().contains(&needle)
    }
}

/// Largest amount a single entry or limit may hold: one trillion.
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Keeps every list sum far below `Decimal::MAX`.
pub(crate) fn amount_in_range(amount: Decimal) -> bool {
    amount.abs() <= Decimal::new(MAX_AMOUNT_UNITS, 0)
}

pub(crate) fn format_amount(amount: Decimal) -> String {
    format!("${}", amount)
}
