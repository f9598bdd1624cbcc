use crate::cli::dispatcher::{CommandContext, CommandResult, Pane};
use crate::cli::params::CommandParams;
use crate::cli::registry::CommandDescriptor;
use crate::domain::{Displayable, Income};
use crate::errors::Result;

use super::{commit, delete_entry, filter_by_tag, optional_time, parse_amount, sort_entries, view_entries};

pub(crate) fn definitions() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "addIncome",
            "Record money received",
            "addIncome AMOUNT [/description TEXT] [/time YYYY-MM-DD [HH:MM]] [/tag TAG] [/recurring]",
            &[
                ("description", "Where the money came from"),
                ("time", "When it was received; defaults to now"),
                ("tag", "Category used by filters"),
                ("recurring", "Repeats every month"),
            ],
            cmd_add_income,
        ),
        CommandDescriptor::new(
            "deleteIncome",
            "Delete an income",
            "deleteIncome INDEX",
            &[],
            cmd_delete_income,
        ),
        CommandDescriptor::new(
            "filterIncome",
            "Show only incomes with a tag",
            "filterIncome TAG|all",
            &[],
            cmd_filter_income,
        ),
        CommandDescriptor::new(
            "sortIncome",
            "Order the income list",
            "sortIncome amount|time|description",
            &[],
            cmd_sort_income,
        ),
        CommandDescriptor::new(
            "viewIncome",
            "Show incomes from one period",
            "viewIncome day|week|month|year|all [/previous N]",
            &[("previous", "How many periods back to look")],
            cmd_view_income,
        ),
    ]
}

fn cmd_add_income(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let amount = parse_amount(params.require_main_param("an amount")?)?;
    let time = optional_time(params, "time")?.unwrap_or_else(|| context.ledger.now());
    let income = Income::new(
        amount,
        params.optional_param("description")?.unwrap_or_default(),
        time,
    )
    .with_tag(params.optional_param("tag")?.unwrap_or_default())
    .with_recurring(params.contains_param("recurring"));

    let label = income.display_label();
    commit(&mut context.ledger.incomes, context.storage, |list| {
        list.add(income);
        Ok(())
    })?;
    Ok(CommandResult::show(format!("Added income: {}", label), Pane::Income))
}

fn cmd_delete_income(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = delete_entry(&mut context.ledger.incomes, context.storage, params)?;
    Ok(CommandResult::show(message, Pane::Income))
}

fn cmd_filter_income(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = filter_by_tag(&mut context.ledger.incomes, params)?;
    Ok(CommandResult::show(message, Pane::Income))
}

fn cmd_sort_income(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = sort_entries(&mut context.ledger.incomes, params)?;
    Ok(CommandResult::show(message, Pane::Income))
}

fn cmd_view_income(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = view_entries(&mut context.ledger.incomes, params)?;
    Ok(CommandResult::show(message, Pane::Income))
}
