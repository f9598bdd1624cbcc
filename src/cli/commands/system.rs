use crate::cli::dispatcher::{CommandContext, CommandResult, Pane};
use crate::cli::params::CommandParams;
use crate::cli::registry::{CommandDescriptor, CommandRegistry};
use crate::errors::Result;

pub(crate) fn definitions() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new(
            "goto",
            "Switch to another pane",
            "goto expense|income|payment|budget|help",
            &[],
            cmd_goto,
        ),
        CommandDescriptor::new(
            "help",
            "Show available commands, or the details of one",
            "help [COMMAND]",
            &[],
            cmd_help,
        ),
        CommandDescriptor::new("exit", "Save and leave", "exit", &[], cmd_exit),
    ]
}

fn cmd_goto(_context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    let pane: Pane = params.require_main_param("a pane name")?.parse()?;
    Ok(CommandResult::show(format!("Showing the {} pane", pane), pane))
}

fn cmd_help(context: &mut CommandContext<'_>, params: &CommandParams<'_>) -> Result<CommandResult> {
    match params.main_param() {
        Some(name) => {
            let command = context.registry.resolve(name)?;
            Ok(CommandResult::show(command_details(command), Pane::Help))
        }
        None => Ok(CommandResult::show(
            "Type `help COMMAND` for details. Any unambiguous prefix of a command or /parameter works.",
            Pane::Help,
        )),
    }
}

fn cmd_exit(_context: &mut CommandContext<'_>, _params: &CommandParams<'_>) -> Result<CommandResult> {
    Ok(CommandResult::exit("Goodbye!"))
}

pub(crate) fn command_details(command: &CommandDescriptor) -> String {
    let mut lines = vec![
        format!("{}: {}", command.name, command.description),
        format!("Usage: {}", command.usage),
    ];
    lines.extend(
        command
            .params
            .iter()
            .map(|(name, description)| format!("  /{:<12} {}", name, description)),
    );
    lines.join("\n")
}

/// One line per command, in registry order.
pub(crate) fn overview(registry: &CommandRegistry) -> Vec<(&'static str, &'static str)> {
    registry
        .iter()
        .map(|command| (command.name, command.description))
        .collect()
}
