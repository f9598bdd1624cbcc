use crate::cli::dispatcher::{CommandContext, CommandResult, Pane};
use crate::cli::params::CommandParams;
use crate::cli::registry::CommandDescriptor;
use crate::domain::{Displayable, Payment, Priority};
use crate::errors::{FinanceError, Result};
use crate::ledger::FilterCriteria;

use super::{commit, delete_entry, optional_time, parse_amount, parse_index, sort_entries};

const EDITABLE: [&str; 6] = ["description", "amount", "due", "priority", "receiver", "remark"];

pub(crate) fn definitions() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "addPayment",
            "Track a payment that is coming up",
            "addPayment DESCRIPTION /amount AMOUNT [/due YYYY-MM-DD [HH:MM]] [/priority high|medium|low|none] [/receiver NAME] [/remark TEXT]",
            &[
                ("amount", "How much has to be paid"),
                ("due", "When it is due; defaults to now"),
                ("priority", "high, medium, low or none"),
                ("receiver", "Who is paid"),
                ("remark", "Free-form note"),
            ],
            cmd_add_payment,
        ),
        CommandDescriptor::new(
            "changePayment",
            "Edit fields of a payment",
            "changePayment INDEX [/description TEXT] [/amount AMOUNT] [/due DATE] [/priority P] [/receiver NAME] [/remark TEXT]",
            &[
                ("description", "New description"),
                ("amount", "New amount"),
                ("due", "New due time"),
                ("priority", "New priority"),
                ("receiver", "New receiver"),
                ("remark", "New remark"),
            ],
            cmd_change_payment,
        ),
        CommandDescriptor::new(
            "deletePayment",
            "Delete a payment",
            "deletePayment INDEX",
            &[],
            cmd_delete_payment,
        ),
        CommandDescriptor::new(
            "donePayment",
            "Mark a payment as paid",
            "donePayment INDEX",
            &[],
            cmd_done_payment,
        ),
        CommandDescriptor::new(
            "filterPayment",
            "Show payments due in a window",
            "filterPayment all|week|month|overdue",
            &[],
            cmd_filter_payment,
        ),
        CommandDescriptor::new(
            "searchPayment",
            "Show payments mentioning a keyword",
            "searchPayment KEYWORD",
            &[],
            cmd_search_payment,
        ),
        CommandDescriptor::new(
            "sortPayment",
            "Order the payment list",
            "sortPayment time|amount|priority",
            &[],
            cmd_sort_payment,
        ),
    ]
}

fn optional_priority(params: &CommandParams<'_>) -> Result<Option<Priority>> {
    params
        .optional_param("priority")?
        .map(str::parse::<Priority>)
        .transpose()
}

fn cmd_add_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let description = params.require_main_param("a description")?;
    let amount = parse_amount(params.param("amount")?)?;
    let due = optional_time(params, "due")?.unwrap_or_else(|| context.ledger.now());
    let payment = Payment::new(description, amount, due)
        .with_priority(optional_priority(params)?.unwrap_or_default())
        .with_receiver(params.optional_param("receiver")?.unwrap_or_default())
        .with_remark(params.optional_param("remark")?.unwrap_or_default());

    let label = payment.display_label();
    commit(&mut context.ledger.payments, context.storage, |list| {
        list.add(payment);
        Ok(())
    })?;
    Ok(CommandResult::show(format!("Added payment: {}", label), Pane::Payment))
}

fn cmd_change_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let index = parse_index(params.require_main_param("an index")?)?;
    if !EDITABLE.iter().any(|name| params.contains_param(name)) {
        return Err(FinanceError::MissingParam(format!(
            "at least one of /{}",
            EDITABLE.join(", /")
        )));
    }
    let description = params.optional_param("description")?;
    let amount = params.optional_param("amount")?.map(parse_amount).transpose()?;
    let due = optional_time(params, "due")?;
    let priority = optional_priority(params)?;
    let receiver = params.optional_param("receiver")?;
    let remark = params.optional_param("remark")?;

    let changed = commit(&mut context.ledger.payments, context.storage, |list| {
        list.update(index, |payment| {
            if let Some(description) = description {
                payment.description = description.to_string();
            }
            if let Some(amount) = amount {
                payment.amount = amount;
            }
            if let Some(due) = due {
                payment.due = due;
            }
            if let Some(priority) = priority {
                payment.priority = priority;
            }
            if let Some(receiver) = receiver {
                payment.receiver = receiver.to_string();
            }
            if let Some(remark) = remark {
                payment.remark = remark.to_string();
            }
            Ok(())
        })
        .map(Displayable::display_label)
    })?;
    Ok(CommandResult::show(format!("Changed payment: {}", changed), Pane::Payment))
}

fn cmd_delete_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = delete_entry(&mut context.ledger.payments, context.storage, params)?;
    Ok(CommandResult::show(message, Pane::Payment))
}

fn cmd_done_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let index = parse_index(params.require_main_param("an index")?)?;
    let done = commit(&mut context.ledger.payments, context.storage, |list| {
        list.update(index, |payment| {
            payment.done = true;
            Ok(())
        })
        .map(Displayable::display_label)
    })?;
    Ok(CommandResult::show(format!("Paid: {}", done), Pane::Payment))
}

fn cmd_filter_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let filter = FilterCriteria::window(params.require_main_param("all, week, month or overdue")?)?;
    let message = match &filter {
        FilterCriteria::All => "Showing every payment".to_string(),
        other => format!("Showing payments {}", other.label()),
    };
    context.ledger.payments.set_filter(filter);
    Ok(CommandResult::show(message, Pane::Payment))
}

fn cmd_search_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let filter = FilterCriteria::keyword(params.require_main_param("a keyword")?);
    let message = format!("Showing payments matching {}", filter.label());
    context.ledger.payments.set_filter(filter);
    Ok(CommandResult::show(message, Pane::Payment))
}

fn cmd_sort_payment(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let message = sort_entries(&mut context.ledger.payments, params)?;
    Ok(CommandResult::show(message, Pane::Payment))
}
