use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::criteria::{EntrySort, PaymentSort, SortCriteria, ViewScope, ViewScopeName};
use super::view::DerivedView;
use crate::config::Config;
use crate::core::Clock;
use crate::domain::{Budget, Entry, Expense, Income, Payment};
use crate::errors::Result;
use crate::storage::{self, Storage};

pub type ExpenseList = DerivedView<Expense, EntrySort>;
pub type IncomeList = DerivedView<Income, EntrySort>;
pub type PaymentList = DerivedView<Payment, PaymentSort>;

/// Every list the tracker keeps, plus the budget and the clock they share.
pub struct Ledger {
    pub expenses: ExpenseList,
    pub incomes: IncomeList,
    pub payments: PaymentList,
    pub budget: Budget,
    clock: Arc<dyn Clock>,
}

/// Freshly loaded ledger and the recoveries performed while loading it.
pub struct LoadReport {
    pub ledger: Ledger,
    pub warnings: Vec<String>,
}

impl Ledger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Vec::new(), Budget::default(), clock)
    }

    pub fn from_parts(
        expenses: Vec<Expense>,
        incomes: Vec<Income>,
        payments: Vec<Payment>,
        budget: Budget,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expenses: DerivedView::new("expense", expenses, EntrySort::default(), clock.clone()),
            incomes: DerivedView::new("income", incomes, EntrySort::default(), clock.clone()),
            payments: DerivedView::new("payment", payments, PaymentSort::default(), clock.clone()),
            budget,
            clock,
        }
    }

    /// Loads every list. Unreadable documents are set aside and start empty;
    /// I/O failures abort.
    pub fn load(storage: &dyn Storage, clock: Arc<dyn Clock>) -> Result<LoadReport> {
        let expenses = storage::load_list::<Expense>(storage)?;
        let incomes = storage::load_list::<Income>(storage)?;
        let payments = storage::load_list::<Payment>(storage)?;
        let budget = storage::load_single::<Budget>(storage)?;
        let warnings = [
            expenses.warning,
            incomes.warning,
            payments.warning,
            budget.warning,
        ]
        .into_iter()
        .flatten()
        .collect();
        tracing::info!(
            expenses = expenses.value.len(),
            incomes = incomes.value.len(),
            payments = payments.value.len(),
            "ledger loaded"
        );
        Ok(LoadReport {
            ledger: Self::from_parts(
                expenses.value,
                incomes.value,
                payments.value,
                budget.value,
                clock,
            ),
            warnings,
        })
    }

    /// Applies the preferred sort orders; unknown names keep the defaults.
    pub fn apply_config(&mut self, config: &Config) {
        match <EntrySort as SortCriteria<Expense>>::parse(&config.expense_sort) {
            Ok(sort) => self.expenses.set_sort(sort),
            Err(err) => tracing::warn!(setting = "expense_sort", "{}", err),
        }
        match <EntrySort as SortCriteria<Income>>::parse(&config.income_sort) {
            Ok(sort) => self.incomes.set_sort(sort),
            Err(err) => tracing::warn!(setting = "income_sort", "{}", err),
        }
        match PaymentSort::parse(&config.payment_sort) {
            Ok(sort) => self.payments.set_sort(sort),
            Err(err) => tracing::warn!(setting = "payment_sort", "{}", err),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Confirmed spending in the current month, recurring expenses included.
    pub fn month_spending(&self) -> Decimal {
        self.month_expenses().map(Entry::amount).sum()
    }

    pub fn month_tag_spending(&self, tag: &str) -> Decimal {
        self.month_expenses()
            .filter(|expense| expense.tag.eq_ignore_ascii_case(tag))
            .map(Entry::amount)
            .sum()
    }

    pub fn month_income(&self) -> Decimal {
        let today = self.clock.today();
        let scope = ViewScope::new(ViewScopeName::Month, 0);
        self.incomes
            .backing()
            .iter()
            .filter(|income| scope.includes(*income, today))
            .map(Entry::amount)
            .sum()
    }

    fn month_expenses(&self) -> impl Iterator<Item = &Expense> + '_ {
        let today = self.clock.today();
        let scope = ViewScope::new(ViewScopeName::Month, 0);
        self.expenses
            .backing()
            .iter()
            .filter(move |expense| !expense.tentative && scope.includes(*expense, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::storage::TextStorage;
    use chrono::NaiveDate;
    use std::fs;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()))
    }

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn month_spending_counts_recurring_and_skips_tentative() {
        let ledger = Ledger::from_parts(
            vec![
                Expense::new(Decimal::new(10, 0), "lunch", at(3, 2)).with_tag("food"),
                Expense::new(Decimal::new(5, 0), "maybe", at(3, 3)).with_tentative(true),
                Expense::new(Decimal::new(7, 0), "old", at(2, 3)),
                Expense::new(Decimal::new(20, 0), "gym", at(1, 1)).with_recurring(true),
            ],
            Vec::new(),
            Vec::new(),
            Budget::default(),
            clock(),
        );
        assert_eq!(ledger.month_spending(), Decimal::new(30, 0));
        assert_eq!(ledger.month_tag_spending("FOOD"), Decimal::new(10, 0));
    }

    #[test]
    fn config_sort_applies_and_bad_names_are_ignored() {
        let mut ledger = Ledger::new(clock());
        let config = Config {
            expense_sort: "amount".into(),
            payment_sort: "bogus".into(),
            ..Config::default()
        };
        ledger.apply_config(&config);
        assert_eq!(ledger.expenses.sort(), EntrySort::Amount);
        assert_eq!(ledger.payments.sort(), PaymentSort::Time);
    }

    #[test]
    fn load_recovers_from_one_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TextStorage::new(dir.path()).unwrap();
        storage::save_list(
            &storage,
            &[Income::new(Decimal::new(100, 0), "gift", at(3, 1))],
        )
        .unwrap();
        fs::write(dir.path().join("payments.txt"), "garbage").unwrap();

        let report = Ledger::load(&storage, clock()).unwrap();
        assert_eq!(report.ledger.incomes.backing().len(), 1);
        assert!(report.ledger.payments.backing().is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("payment"));
    }
}
