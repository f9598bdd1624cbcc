use crate::cli::dispatcher::{CommandContext, CommandResult, Pane};
use crate::cli::params::CommandParams;
use crate::cli::registry::CommandDescriptor;
use crate::domain::common::format_amount;
use crate::errors::Result;
use crate::storage;

use super::parse_amount;

pub(crate) fn definitions() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "budget",
            "Set the monthly budget, or the limit of one tag",
            "budget AMOUNT [/tag TAG]",
            &[("tag", "Limit only spending with this tag")],
            cmd_budget,
        ),
        CommandDescriptor::new(
            "viewBudget",
            "Show this month's spending against the budget",
            "viewBudget",
            &[],
            cmd_view_budget,
        ),
    ]
}

fn cmd_budget(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let amount = parse_amount(params.require_main_param("an amount")?)?;
    let tag = params.optional_param("tag")?;

    let previous = context.ledger.budget.clone();
    match tag {
        Some(tag) => context.ledger.budget.set_tag(tag, amount),
        None => context.ledger.budget.set_monthly(amount),
    }
    if let Err(err) = storage::save_single(context.storage, &context.ledger.budget) {
        tracing::warn!("rolling back unsaved budget change");
        context.ledger.budget = previous;
        return Err(err);
    }

    let message = match tag {
        Some(tag) => format!("Budget for {} set to {}", tag, format_amount(amount)),
        None => format!("Monthly budget set to {}", format_amount(amount)),
    };
    Ok(CommandResult::show(message, Pane::Budget))
}

fn cmd_view_budget(context: &mut CommandContext<'_>, _params: &CommandParams<'_>) -> Result<CommandResult> {
    let ledger = &context.ledger;
    let message = if ledger.budget.is_set() {
        let spent = ledger.month_spending();
        format!(
            "Spent {} of {} this month",
            format_amount(spent),
            format_amount(ledger.budget.monthly)
        )
    } else {
        "No budget set yet. Use `budget AMOUNT` to set one.".to_string()
    };
    Ok(CommandResult::show(message, Pane::Budget))
}
