pub mod budget;
pub mod expense;
pub mod income;
pub mod payment;
pub mod system;

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::cli::params::CommandParams;
use crate::cli::registry::CommandDescriptor;
use crate::domain::common::amount_in_range;
use crate::domain::{Entry, StorageCodec};
use crate::errors::{FinanceError, Result};
use crate::ledger::{DerivedView, FilterCriteria, SortCriteria};
use crate::storage::{self, Storage};

const MAX_AMOUNT_SCALE: u32 = 2;

pub(crate) fn descriptors() -> Vec<CommandDescriptor> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(income::definitions());
    commands.extend(payment::definitions());
    commands.extend(budget::definitions());
    commands.extend(system::definitions());
    commands
}

/// Positive amount with at most two decimal places, no more than one trillion;
/// a leading `$` is allowed.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let amount =
        Decimal::from_str(digits).map_err(|_| FinanceError::NumberFormatInvalid(raw.to_string()))?;
    if amount <= Decimal::ZERO || amount.scale() > MAX_AMOUNT_SCALE || !amount_in_range(amount) {
        return Err(FinanceError::AmountInvalid(raw.to_string()));
    }
    Ok(amount)
}

/// 1-based list index.
pub(crate) fn parse_index(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| FinanceError::NumberFormatInvalid(raw.to_string()))
}

pub(crate) fn parse_offset(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| FinanceError::NumberFormatInvalid(raw.to_string()))
}

/// `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` for midnight.
pub(crate) fn parse_time(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| FinanceError::TimeFormatInvalid(raw.to_string()))
}

pub(crate) fn optional_time(params: &CommandParams<'_>, name: &str) -> Result<Option<NaiveDateTime>> {
    params.optional_param(name)?.map(parse_time).transpose()
}

/// Applies `mutate` to a list and saves it, undoing the change when saving fails.
pub(crate) fn commit<T, S, R, F>(
    list: &mut DerivedView<T, S>,
    storage: &dyn Storage,
    mutate: F,
) -> Result<R>
where
    T: Entry + StorageCodec,
    S: SortCriteria<T>,
    F: FnOnce(&mut DerivedView<T, S>) -> Result<R>,
{
    list.transact(mutate, |items| storage::save_list(storage, items))
}

pub(crate) fn delete_entry<T, S>(
    list: &mut DerivedView<T, S>,
    storage: &dyn Storage,
    params: &CommandParams<'_>,
) -> Result<String>
where
    T: Entry + StorageCodec,
    S: SortCriteria<T>,
{
    let index = parse_index(params.require_main_param("an index")?)?;
    let kind = list.kind();
    let removed = commit(list, storage, |list| list.remove(index))?;
    Ok(format!("Deleted {}: {}", kind, removed.display_label()))
}

pub(crate) fn filter_by_tag<T, S>(list: &mut DerivedView<T, S>, params: &CommandParams<'_>) -> Result<String>
where
    T: Entry,
    S: SortCriteria<T>,
{
    let filter = FilterCriteria::tag(params.require_main_param("a tag or `all`")?);
    let message = match &filter {
        FilterCriteria::All => format!("Showing every {}", list.kind()),
        other => format!("Filtering {}s by {}", list.kind(), other.label()),
    };
    list.set_filter(filter);
    Ok(message)
}

pub(crate) fn sort_entries<T, S>(list: &mut DerivedView<T, S>, params: &CommandParams<'_>) -> Result<String>
where
    T: Entry,
    S: SortCriteria<T>,
{
    let sort = list.set_sort_criteria(params.require_main_param("a sort criteria")?)?;
    Ok(format!("Sorting {}s by {}", list.kind(), sort.name()))
}

pub(crate) fn view_entries<T, S>(list: &mut DerivedView<T, S>, params: &CommandParams<'_>) -> Result<String>
where
    T: Entry,
    S: SortCriteria<T>,
{
    let scope = params.require_main_param("a view scope")?;
    let offset = params
        .optional_param("previous")?
        .map(parse_offset)
        .transpose()?
        .unwrap_or(0);
    let scope = list.set_view_scope(scope, offset)?;
    Ok(format!("Viewing {}s: {}", list.kind(), scope.label()))
}
