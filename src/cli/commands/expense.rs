use crate::cli::dispatcher::{CommandContext, CommandResult, Pane};
use crate::cli::params::CommandParams;
use crate::cli::registry::CommandDescriptor;
use crate::domain::{Displayable, Expense};
use crate::errors::{FinanceError, Result};

use super::{commit, delete_entry, filter_by_tag, optional_time, parse_amount, parse_index, sort_entries, view_entries};

pub(crate) fn definitions() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "addExpense",
            "Record money spent",
            "addExpense AMOUNT [/description TEXT] [/time YYYY-MM-DD [HH:MM]] [/tag TAG] [/tentative] [/recurring]",
            &[
                ("description", "What the money was spent on"),
                ("time", "When it was spent; defaults to now"),
                ("tag", "Category used by filters and budgets"),
                ("tentative", "Not yet confirmed; excluded from totals"),
                ("recurring", "Repeats every month"),
            ],
            cmd_add_expense,
        ),
        CommandDescriptor::new(
            "deleteExpense",
            "Delete an expense",
            "deleteExpense INDEX",
            &[],
            cmd_delete_expense,
        ),
        CommandDescriptor::new(
            "confirm",
            "Confirm a tentative expense",
            "confirm INDEX",
            &[],
            cmd_confirm,
        ),
        CommandDescriptor::new(
            "filterExpense",
            "Show only expenses with a tag",
            "filterExpense TAG|all",
            &[],
            cmd_filter_expense,
        ),
        CommandDescriptor::new(
            "sortExpense",
            "Order the expense list",
            "sortExpense amount|time|description",
            &[],
            cmd_sort_expense,
        ),
        CommandDescriptor::new(
            "viewExpense",
            "Show expenses from one period",
            "viewExpense day|week|month|year|all [/previous N]",
            &[("previous", "How many periods back to look")],
            cmd_view_expense,
        ),
    ]
}

fn cmd_add_expense(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let amount = parse_amount(params.require_main_param("an amount")?)?;
    let time = optional_time(params, "time")?.unwrap_or_else(|| context.ledger.now());
    let expense = Expense::new(
        amount,
        params.optional_param("description")?.unwrap_or_default(),
        time,
    )
    .with_tag(params.optional_param("tag")?.unwrap_or_default())
    .with_tentative(params.contains_param("tentative"))
    .with_recurring(params.contains_param("recurring"));

    let label = expense.display_label();
    commit(&mut context.ledger.expenses, context.storage, |list| {
        list.add(expense);
        Ok(())
    })?;
    Ok(CommandResult::show(format!("Added expense: {}", label), Pane::Expense))
}

fn cmd_delete_expense(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = delete_entry(&mut context.ledger.expenses, context.storage, params)?;
    Ok(CommandResult::show(message, Pane::Expense))
}

fn cmd_confirm(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let index = parse_index(params.require_main_param("an index")?)?;
    let confirmed = commit(&mut context.ledger.expenses, context.storage, |list| {
        list.update(index, |expense| {
            if !expense.tentative {
                return Err(FinanceError::NotTentative(index));
            }
            expense.tentative = false;
            Ok(())
        })
        .map(Displayable::display_label)
    })?;
    Ok(CommandResult::show(
        format!("Confirmed expense: {}", confirmed),
        Pane::Expense,
    ))
}

fn cmd_filter_expense(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = filter_by_tag(&mut context.ledger.expenses, params)?;
    Ok(CommandResult::show(message, Pane::Expense))
}

fn cmd_sort_expense(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = sort_entries(&mut context.ledger.expenses, params)?;
    Ok(CommandResult::show(message, Pane::Expense))
}

fn cmd_view_expense(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = view_entries(&mut context.ledger.expenses, params)?;
    Ok(CommandResult::show(message, Pane::Expense))
}
