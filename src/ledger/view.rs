//! Generic filtered, sorted, time-scoped projection over an entity list.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;

use super::criteria::{FilterCriteria, SortCriteria, ViewScope};
use crate::core::Clock;
use crate::domain::{common::format_amount, Entry};
use crate::errors::{FinanceError, Result};

/// Immutable snapshot published after every recompute.
///
/// `total` covers only the visible items and skips tentative ones.
#[derive(Debug, Clone)]
pub struct Projection<T> {
    pub items: Arc<Vec<T>>,
    pub total: Decimal,
    pub sort_label: &'static str,
    pub filter_label: String,
    pub view_label: String,
}

impl<T> Default for Projection<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            total: Decimal::ZERO,
            sort_label: "",
            filter_label: String::new(),
            view_label: String::new(),
        }
    }
}

impl<T> Projection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_string(&self) -> String {
        format!("Total: {}", format_amount(self.total))
    }

    pub fn sort_string(&self) -> String {
        format!("Sort by: {}", self.sort_label)
    }

    pub fn filter_string(&self) -> String {
        format!("Filter: {}", self.filter_label)
    }

    pub fn view_string(&self) -> String {
        format!("Viewscope: {}", self.view_label)
    }
}

type Listener<T> = Box<dyn FnMut(&Projection<T>) + Send>;

/// Backing list plus the three criteria that derive its visible projection.
///
/// Every mutation and every criteria change recomputes as
/// `sort(filter(view(backing)))` and publishes the result in one replacement.
/// Display indices handed to [`DerivedView::get`], [`DerivedView::remove`] and
/// [`DerivedView::update`] are 1-based positions in the current projection.
pub struct DerivedView<T: Entry, S: SortCriteria<T>> {
    kind: &'static str,
    backing: Vec<T>,
    sort: S,
    filter: FilterCriteria,
    scope: ViewScope,
    clock: Arc<dyn Clock>,
    published: Projection<T>,
    positions: Vec<usize>,
    listeners: Vec<Listener<T>>,
    revision: u64,
}

impl<T: Entry, S: SortCriteria<T>> fmt::Debug for DerivedView<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedView")
            .field("kind", &self.kind)
            .field("backing", &self.backing)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("scope", &self.scope)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: Entry, S: SortCriteria<T>> DerivedView<T, S> {
    pub fn new(kind: &'static str, items: Vec<T>, sort: S, clock: Arc<dyn Clock>) -> Self {
        let mut view = Self {
            kind,
            backing: items,
            sort,
            filter: FilterCriteria::All,
            scope: ViewScope::all(),
            clock,
            published: Projection::default(),
            positions: Vec::new(),
            listeners: Vec::new(),
            revision: 0,
        };
        view.recompute();
        view
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn backing(&self) -> &[T] {
        &self.backing
    }

    pub fn published(&self) -> &Projection<T> {
        &self.published
    }

    pub fn sort(&self) -> S {
        self.sort
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn scope(&self) -> ViewScope {
        self.scope
    }

    /// Registers an observer that receives every newly published projection.
    pub fn subscribe(&mut self, listener: impl FnMut(&Projection<T>) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn add(&mut self, item: T) {
        self.backing.push(item);
        self.touch();
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        let position = self.position_of(index)?;
        let removed = self.backing.remove(position);
        self.touch();
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let position = self.position_of(index)?;
        Ok(&self.backing[position])
    }

    /// Applies `change` to a copy of the item and stores it only when `change` succeeds.
    pub fn update<F>(&mut self, index: usize, change: F) -> Result<&T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let position = self.position_of(index)?;
        let mut edited = self.backing[position].clone();
        change(&mut edited)?;
        self.backing[position] = edited;
        self.touch();
        Ok(&self.backing[position])
    }

    pub fn clear(&mut self) {
        self.backing.clear();
        self.touch();
    }

    /// Replaces the backing list wholesale.
    pub fn restore(&mut self, items: Vec<T>) {
        self.backing = items;
        self.touch();
    }

    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
        self.recompute();
    }

    pub fn set_sort_criteria(&mut self, raw: &str) -> Result<S> {
        let sort = S::parse(raw)?;
        self.set_sort(sort);
        Ok(sort)
    }

    pub fn set_filter(&mut self, filter: FilterCriteria) {
        self.filter = filter;
        self.recompute();
    }

    pub fn set_scope(&mut self, scope: ViewScope) {
        self.scope = scope;
        self.recompute();
    }

    pub fn set_view_scope(&mut self, raw: &str, offset: u32) -> Result<ViewScope> {
        let scope = ViewScope::parse(raw, offset)?;
        self.set_scope(scope);
        Ok(scope)
    }

    /// Runs `mutate`, then `persist` on the resulting backing list. When either
    /// step fails after the backing list changed, the previous list is restored.
    pub fn transact<R, M, P>(&mut self, mutate: M, persist: P) -> Result<R>
    where
        M: FnOnce(&mut Self) -> Result<R>,
        P: FnOnce(&[T]) -> Result<()>,
    {
        let before = self.backing.clone();
        let revision = self.revision;
        let outcome = mutate(self);
        let outcome = match outcome {
            Ok(value) if self.revision == revision => return Ok(value),
            Ok(value) => persist(&self.backing).map(|()| value),
            Err(err) => Err(err),
        };
        if outcome.is_err() && self.revision != revision {
            tracing::warn!(kind = self.kind, "rolling back unsaved change");
            self.restore(before);
        }
        outcome
    }

    /// Sum over the whole backing list, tentative items excluded.
    pub fn total_amount(&self) -> Decimal {
        self.backing
            .iter()
            .filter(|item| !item.is_tentative())
            .map(Entry::amount)
            .sum()
    }

    pub fn tag_amount(&self, tag: &str) -> Decimal {
        self.backing
            .iter()
            .filter(|item| !item.is_tentative() && item.tag().eq_ignore_ascii_case(tag))
            .map(Entry::amount)
            .sum()
    }

    /// Sum over items not yet settled.
    pub fn outstanding_amount(&self) -> Decimal {
        self.backing
            .iter()
            .filter(|item| !item.is_settled())
            .map(Entry::amount)
            .sum()
    }

    pub fn recompute(&mut self) {
        let today = self.clock.today();
        let mut positions: Vec<usize> = self
            .backing
            .iter()
            .enumerate()
            .filter(|(_, item)| self.scope.includes(*item, today))
            .filter(|(_, item)| self.filter.accepts(*item, today))
            .map(|(position, _)| position)
            .collect();
        let sort = self.sort;
        positions.sort_by(|a, b| sort.compare(&self.backing[*a], &self.backing[*b]));

        let items: Vec<T> = positions
            .iter()
            .map(|position| self.backing[*position].clone())
            .collect();
        let total = items
            .iter()
            .filter(|item| !item.is_tentative())
            .map(Entry::amount)
            .sum();

        self.positions = positions;
        self.published = Projection {
            items: Arc::new(items),
            total,
            sort_label: sort.label(),
            filter_label: self.filter.label(),
            view_label: self.scope.label(),
        };
        tracing::debug!(
            kind = self.kind,
            visible = self.published.len(),
            backing = self.backing.len(),
            "projection recomputed"
        );
        for listener in &mut self.listeners {
            listener(&self.published);
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.recompute();
    }

    fn position_of(&self, index: usize) -> Result<usize> {
        index
            .checked_sub(1)
            .and_then(|slot| self.positions.get(slot).copied())
            .ok_or(FinanceError::IndexOutOfRange {
                kind: self.kind,
                index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedClock;
    use crate::domain::Expense;
    use crate::ledger::criteria::{EntrySort, ViewScopeName};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()))
    }

    fn expense(cents: i64, description: &str, day: u32) -> Expense {
        let time = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Expense::new(Decimal::new(cents, 2), description, time)
    }

    fn list(items: Vec<Expense>) -> DerivedView<Expense, EntrySort> {
        DerivedView::new("expense", items, EntrySort::Time, clock())
    }

    #[test]
    fn default_time_sort_is_newest_first() {
        let view = list(vec![expense(100, "a", 1), expense(200, "b", 3), expense(300, "c", 2)]);
        let order: Vec<_> = view.published().items.iter().map(|e| e.description.clone()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn remove_uses_display_order() {
        let mut view = list(vec![expense(100, "a", 1), expense(200, "b", 3)]);
        let removed = view.remove(1).unwrap();
        assert_eq!(removed.description, "b");
        assert_eq!(view.backing().len(), 1);
    }

    #[test]
    fn out_of_range_leaves_list_untouched() {
        let mut view = list(vec![expense(100, "a", 1)]);
        for index in [0, 2] {
            assert_eq!(
                view.remove(index).unwrap_err(),
                FinanceError::IndexOutOfRange { kind: "expense", index }
            );
        }
        assert_eq!(view.backing().len(), 1);
        assert_eq!(view.published().len(), 1);
    }

    #[test]
    fn total_skips_tentative_items() {
        let view = list(vec![
            expense(1000, "rent", 1),
            expense(250, "maybe", 2).with_tentative(true),
        ]);
        assert_eq!(view.published().total, Decimal::new(1000, 2));
        assert_eq!(view.total_amount(), Decimal::new(1000, 2));
        assert_eq!(view.published().total_string(), "Total: $10.00");
    }

    #[test]
    fn aggregates_ignore_the_projection() {
        let mut view = list(vec![
            expense(100, "lunch", 13).with_tag("food"),
            expense(900, "dinner", 12).with_tag("Food"),
            expense(500, "bus", 13).with_tag("transport"),
            expense(700, "party", 13).with_tag("food").with_tentative(true),
        ]);
        view.set_view_scope("day", 0).unwrap();
        view.set_filter(FilterCriteria::tag("transport"));
        assert_eq!(view.published().total, Decimal::new(500, 2));

        assert_eq!(view.total_amount(), Decimal::new(1500, 2));
        assert_eq!(view.tag_amount("food"), Decimal::new(1000, 2));
        assert_eq!(view.tag_amount("rent"), Decimal::ZERO);
    }

    #[test]
    fn criteria_compose_in_order() {
        let mut view = list(vec![
            expense(100, "lunch", 13).with_tag("food"),
            expense(900, "dinner", 12).with_tag("food"),
            expense(500, "bus", 13).with_tag("transport"),
        ]);
        view.set_view_scope("day", 0).unwrap();
        view.set_filter(FilterCriteria::tag("food"));
        view.set_sort_criteria("amount").unwrap();
        let visible: Vec<_> = view.published().items.iter().map(|e| e.description.clone()).collect();
        assert_eq!(visible, ["lunch"]);
        assert_eq!(view.scope(), ViewScope::new(ViewScopeName::Day, 0));
        assert_eq!(view.published().view_string(), "Viewscope: DAY");
        assert_eq!(view.published().filter_string(), "Filter: tag food");
        assert_eq!(view.published().sort_string(), "Sort by: Largest");
    }

    #[test]
    fn invalid_criteria_keeps_previous_state() {
        let mut view = list(vec![expense(100, "a", 1)]);
        view.set_sort_criteria("amount").unwrap();
        assert!(view.set_sort_criteria("weight").is_err());
        assert_eq!(view.sort(), EntrySort::Amount);
        assert!(view.set_view_scope("decade", 0).is_err());
        assert_eq!(view.scope(), ViewScope::all());
    }

    #[test]
    fn listeners_see_each_publication() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut view = list(Vec::new());
        view.subscribe(move |projection| sink.lock().unwrap().push(projection.len()));
        view.add(expense(100, "a", 1));
        view.add(expense(100, "b", 2));
        view.clear();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn failed_update_changes_nothing() {
        let mut view = list(vec![expense(100, "a", 1)]);
        let err = view
            .update(1, |item| {
                item.description = "changed".into();
                Err(FinanceError::AmountInvalid("-1".into()))
            })
            .unwrap_err();
        assert_eq!(err, FinanceError::AmountInvalid("-1".into()));
        assert_eq!(view.backing()[0].description, "a");
    }

    #[test]
    fn transact_rolls_back_on_persist_failure() {
        let mut view = list(vec![expense(100, "a", 1)]);
        let err = view
            .transact(
                |list| {
                    list.add(expense(200, "b", 2));
                    Ok(())
                },
                |_| {
                    Err(FinanceError::SaveFailed {
                        path: "expenses.txt".into(),
                        reason: "disk full".into(),
                    })
                },
            )
            .unwrap_err();
        assert!(matches!(err, FinanceError::SaveFailed { .. }));
        assert_eq!(view.backing().len(), 1);
        assert_eq!(view.published().len(), 1);
    }

    #[test]
    fn transact_skips_persist_without_change() {
        let mut view = list(vec![expense(100, "a", 1)]);
        let mut persisted = false;
        view.transact(|list| list.get(1).map(|_| ()), |_| {
            persisted = true;
            Ok(())
        })
        .unwrap();
        assert!(!persisted);
    }
}
