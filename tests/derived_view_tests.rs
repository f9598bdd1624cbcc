mod common;

use chrono::Duration;
use common::{at, clock, today};
use rust_decimal::Decimal;
use tally_core::{
    domain::{Expense, Payment, Priority},
    errors::FinanceError,
    ledger::{DerivedView, EntrySort, FilterCriteria, PaymentSort, ViewScope, ViewScopeName},
};

fn expenses() -> DerivedView<Expense, EntrySort> {
    DerivedView::new(
        "expense",
        vec![
            Expense::new(Decimal::new(450, 2), "coffee", at(2024, 3, 12)).with_tag("drinks"),
            Expense::new(Decimal::new(1200, 2), "lunch", at(2024, 3, 11)).with_tag("food"),
            Expense::new(Decimal::new(450, 2), "tea", at(2024, 2, 2)).with_tag("drinks"),
            Expense::new(Decimal::new(9900, 2), "gym", at(2024, 1, 5)).with_recurring(true),
        ],
        EntrySort::Amount,
        clock(),
    )
}

#[test]
fn recompute_is_idempotent() {
    let mut view = expenses();
    view.set_filter(FilterCriteria::tag("drinks"));
    let first = view.published().clone();
    view.recompute();
    view.recompute();
    let again = view.published();
    assert_eq!(*first.items, *again.items);
    assert_eq!(first.total, again.total);
    assert_eq!(first.filter_label, again.filter_label);
}

#[test]
fn equal_keys_keep_insertion_order() {
    let view = expenses();
    let names: Vec<&str> = view
        .published()
        .items
        .iter()
        .map(|expense| expense.description.as_str())
        .collect();
    assert_eq!(names, ["gym", "lunch", "coffee", "tea"]);
}

#[test]
fn week_scope_starts_on_monday() {
    let weeks_ago = 2u32;
    let target = today() - Duration::weeks(i64::from(weeks_ago));
    let monday = target - Duration::days(2);
    let sunday_before = monday - Duration::days(1);

    let mut view = DerivedView::new(
        "expense",
        vec![
            Expense::new(Decimal::ONE, "on monday", monday.and_hms_opt(0, 0, 0).unwrap()),
            Expense::new(Decimal::ONE, "day before", sunday_before.and_hms_opt(23, 59, 0).unwrap()),
        ],
        EntrySort::Time,
        clock(),
    );
    view.set_scope(ViewScope::new(ViewScopeName::Week, weeks_ago));

    let published = view.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published.items[0].description, "on monday");
    assert_eq!(published.view_string(), "Viewscope: WEEK (2 ago)");
}

#[test]
fn month_scope_keeps_recurring_items() {
    let mut view = expenses();
    view.set_view_scope("month", 0).unwrap();
    let names: Vec<&str> = view
        .published()
        .items
        .iter()
        .map(|expense| expense.description.as_str())
        .collect();
    assert_eq!(names, ["gym", "lunch", "coffee"]);

    view.set_view_scope("day", 1).unwrap();
    assert_eq!(view.published().items[0].description, "coffee");
    assert_eq!(view.published().len(), 1);
}

#[test]
fn out_of_range_removal_changes_nothing() {
    let mut view = expenses();
    view.set_filter(FilterCriteria::tag("food"));
    let before = view.published().clone();

    for index in [0, 2, 99] {
        assert_eq!(
            view.remove(index).unwrap_err(),
            FinanceError::IndexOutOfRange {
                kind: "expense",
                index
            }
        );
    }
    assert_eq!(view.backing().len(), 4);
    assert_eq!(*view.published().items, *before.items);
}

#[test]
fn removal_indexes_the_visible_list() {
    let mut view = expenses();
    view.set_filter(FilterCriteria::tag("drinks"));
    let removed = view.remove(2).unwrap();
    assert_eq!(removed.description, "tea");
    assert_eq!(view.backing().len(), 3);
    assert_eq!(view.published().total_string(), "Total: $4.50");
}

#[test]
fn failed_persist_rolls_back() {
    let mut view = expenses();
    let err = view
        .transact(
            |list| list.remove(1).map(|_| ()),
            |_| Err(FinanceError::SaveFailed {
                path: "expenses.txt".into(),
                reason: "disk full".into(),
            }),
        )
        .unwrap_err();
    assert!(matches!(err, FinanceError::SaveFailed { .. }));
    assert_eq!(view.backing().len(), 4);
    assert_eq!(view.published().items[0].description, "gym");
}

#[test]
fn payments_sort_by_urgency_and_filter_by_window() {
    let mut view = DerivedView::new(
        "payment",
        vec![
            Payment::new("rent", Decimal::new(900, 0), at(2024, 3, 15)).with_priority(Priority::High),
            Payment::new("phone", Decimal::new(30, 0), at(2024, 3, 1)).with_priority(Priority::Low),
            Payment::new("gift", Decimal::new(50, 0), at(2024, 4, 2)),
        ],
        PaymentSort::Priority,
        clock(),
    );
    assert_eq!(view.published().items[0].description, "rent");

    view.set_filter(FilterCriteria::window("overdue").unwrap());
    assert_eq!(view.published().len(), 1);
    assert_eq!(view.published().items[0].description, "phone");

    view.set_filter(FilterCriteria::window("week").unwrap());
    assert_eq!(view.published().items[0].description, "rent");

    assert_eq!(
        FilterCriteria::window("fortnight").unwrap_err(),
        FinanceError::InvalidCriteria("fortnight".into())
    );
}
