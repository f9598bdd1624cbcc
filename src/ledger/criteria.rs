//! Enumerated criteria driving [`super::DerivedView`] recomputation.
//!
//! Raw user text is validated here, at the parsing boundary. Past this point the
//! engine only handles tagged variants.

use std::{cmp::Ordering, fmt};

use chrono::{Datelike, Days, Duration, Months, NaiveDate};

use crate::domain::{Entry, Payment};
use crate::errors::{FinanceError, Result};

/// Named comparator family for one entity type.
pub trait SortCriteria<T>: Copy + Eq + fmt::Debug + 'static {
    fn variants() -> &'static [Self];

    /// Name typed by the user, e.g. `amount`.
    fn name(self) -> &'static str;

    /// Label shown next to the list, e.g. `Largest`.
    fn label(self) -> &'static str;

    fn compare(self, a: &T, b: &T) -> Ordering;

    fn parse(raw: &str) -> Result<Self> {
        let wanted = raw.trim();
        Self::variants()
            .iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FinanceError::InvalidCriteria(raw.to_string()))
    }
}

/// Orderings shared by expenses and incomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntrySort {
    Amount,
    #[default]
    Time,
    Description,
}

impl<T: Entry> SortCriteria<T> for EntrySort {
    fn variants() -> &'static [Self] {
        &[EntrySort::Amount, EntrySort::Time, EntrySort::Description]
    }

    fn name(self) -> &'static str {
        match self {
            EntrySort::Amount => "amount",
            EntrySort::Time => "time",
            EntrySort::Description => "description",
        }
    }

    fn label(self) -> &'static str {
        match self {
            EntrySort::Amount => "Largest",
            EntrySort::Time => "Newest",
            EntrySort::Description => "Alphabetical",
        }
    }

    fn compare(self, a: &T, b: &T) -> Ordering {
        match self {
            EntrySort::Amount => b.amount().cmp(&a.amount()),
            EntrySort::Time => b.time().cmp(&a.time()),
            EntrySort::Description => a.description().cmp(b.description()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentSort {
    #[default]
    Time,
    Amount,
    Priority,
}

impl SortCriteria<Payment> for PaymentSort {
    fn variants() -> &'static [Self] {
        &[PaymentSort::Time, PaymentSort::Amount, PaymentSort::Priority]
    }

    fn name(self) -> &'static str {
        match self {
            PaymentSort::Time => "time",
            PaymentSort::Amount => "amount",
            PaymentSort::Priority => "priority",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PaymentSort::Time => "Earliest due",
            PaymentSort::Amount => "Largest",
            PaymentSort::Priority => "Most urgent",
        }
    }

    fn compare(self, a: &Payment, b: &Payment) -> Ordering {
        match self {
            PaymentSort::Time => a.due.cmp(&b.due),
            PaymentSort::Amount => b.amount.cmp(&a.amount),
            PaymentSort::Priority => b.priority.cmp(&a.priority),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScopeName {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl ViewScopeName {
    pub const ALL: [ViewScopeName; 5] = [
        ViewScopeName::Day,
        ViewScopeName::Week,
        ViewScopeName::Month,
        ViewScopeName::Year,
        ViewScopeName::All,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ViewScopeName::Day => "day",
            ViewScopeName::Week => "week",
            ViewScopeName::Month => "month",
            ViewScopeName::Year => "year",
            ViewScopeName::All => "all",
        }
    }
}

/// Time window parameterized by how many periods into the past it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewScope {
    pub name: ViewScopeName,
    pub offset: u32,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::all()
    }
}

impl ViewScope {
    pub fn all() -> Self {
        Self {
            name: ViewScopeName::All,
            offset: 0,
        }
    }

    pub fn new(name: ViewScopeName, offset: u32) -> Self {
        Self { name, offset }
    }

    pub fn parse(raw: &str, offset: u32) -> Result<Self> {
        let wanted = raw.trim();
        ViewScopeName::ALL
            .into_iter()
            .find(|name| name.name().eq_ignore_ascii_case(wanted))
            .map(|name| Self::new(name, offset))
            .ok_or_else(|| FinanceError::InvalidCriteria(raw.to_string()))
    }

    /// Recurring items never show in day or week views but always show in month
    /// and year views. A period before the earliest representable date is empty.
    pub fn includes<T: Entry>(&self, item: &T, today: NaiveDate) -> bool {
        let date = item.date();
        let offset = self.offset;
        match self.name {
            ViewScopeName::Day => {
                !item.is_recurring()
                    && today
                        .checked_sub_days(Days::new(u64::from(offset)))
                        .is_some_and(|target| date == target)
            }
            ViewScopeName::Week => {
                !item.is_recurring()
                    && today
                        .checked_sub_days(Days::new(u64::from(offset) * 7))
                        .and_then(week_start)
                        .is_some_and(|target| week_start(date) == Some(target))
            }
            ViewScopeName::Month => {
                item.is_recurring() || month_index(date) == month_index(today) - i64::from(offset)
            }
            ViewScopeName::Year => {
                item.is_recurring() || i64::from(date.year()) == i64::from(today.year()) - i64::from(offset)
            }
            ViewScopeName::All => true,
        }
    }

    pub fn label(&self) -> String {
        let name = self.name.name().to_ascii_uppercase();
        match (self.name, self.offset) {
            (ViewScopeName::All, _) | (_, 0) => name,
            (_, offset) => format!("{} ({} ago)", name, offset),
        }
    }
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Keyword, tag or due-window predicate applied after the view scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterCriteria {
    #[default]
    All,
    Tag(String),
    Keyword(String),
    DueWithinWeek,
    DueWithinMonth,
    Overdue,
}

impl FilterCriteria {
    /// Tag filter; `all` (or nothing) clears the filter.
    pub fn tag(raw: &str) -> Self {
        let tag = raw.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("all") {
            FilterCriteria::All
        } else {
            FilterCriteria::Tag(tag.to_string())
        }
    }

    pub fn keyword(raw: &str) -> Self {
        let keyword = raw.trim();
        if keyword.is_empty() {
            FilterCriteria::All
        } else {
            FilterCriteria::Keyword(keyword.to_string())
        }
    }

    /// Due-date window by name: `all`, `week`, `month` or `overdue`.
    pub fn window(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterCriteria::All),
            "week" => Ok(FilterCriteria::DueWithinWeek),
            "month" => Ok(FilterCriteria::DueWithinMonth),
            "overdue" => Ok(FilterCriteria::Overdue),
            _ => Err(FinanceError::InvalidCriteria(raw.to_string())),
        }
    }

    pub fn accepts<T: Entry>(&self, item: &T, today: NaiveDate) -> bool {
        let date = item.date();
        match self {
            FilterCriteria::All => true,
            FilterCriteria::Tag(tag) => item.tag().eq_ignore_ascii_case(tag),
            FilterCriteria::Keyword(keyword) => item.matches_keyword(keyword),
            FilterCriteria::DueWithinWeek => date >= today && date < today + Duration::days(7),
            FilterCriteria::DueWithinMonth => {
                let limit = today
                    .checked_add_months(Months::new(1))
                    .unwrap_or(NaiveDate::MAX);
                date >= today && date < limit
            }
            FilterCriteria::Overdue => date < today && !item.is_settled(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            FilterCriteria::All => "none".into(),
            FilterCriteria::Tag(tag) => format!("tag {}", tag),
            FilterCriteria::Keyword(keyword) => format!("\"{}\"", keyword),
            FilterCriteria::DueWithinWeek => "due this week".into(),
            FilterCriteria::DueWithinMonth => "due this month".into(),
            FilterCriteria::Overdue => "overdue".into(),
        }
    }
}
