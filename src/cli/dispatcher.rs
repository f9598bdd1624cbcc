use std::{fmt, str::FromStr};

use crate::cli::params::CommandParams;
use crate::cli::registry::CommandRegistry;
use crate::errors::{FinanceError, Result};
use crate::ledger::Ledger;
use crate::storage::Storage;

pub type CommandHandler = fn(&mut CommandContext<'_>, &CommandParams<'_>) -> Result<CommandResult>;

/// Everything a command may read or change.
pub struct CommandContext<'a> {
    pub ledger: &'a mut Ledger,
    pub storage: &'a dyn Storage,
    pub registry: &'a CommandRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Expense,
    Income,
    Payment,
    Budget,
    Help,
}

impl Pane {
    pub const ALL: [Pane; 5] = [
        Pane::Expense,
        Pane::Income,
        Pane::Payment,
        Pane::Budget,
        Pane::Help,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Pane::Expense => "expense",
            Pane::Income => "income",
            Pane::Payment => "payment",
            Pane::Budget => "budget",
            Pane::Help => "help",
        }
    }
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pane {
    type Err = FinanceError;

    /// Accepts any unambiguous prefix, case-insensitively.
    fn from_str(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        let candidates: Vec<Pane> = Pane::ALL
            .into_iter()
            .filter(|pane| !wanted.is_empty() && pane.name().starts_with(&wanted))
            .collect();
        match candidates.as_slice() {
            [pane] => Ok(*pane),
            _ => Err(FinanceError::PaneInvalid(raw.to_string())),
        }
    }
}

/// Outcome of one command: a message for the user and the pane to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub message: String,
    pub pane: Option<Pane>,
    pub exit: bool,
}

impl CommandResult {
    pub fn show(message: impl Into<String>, pane: Pane) -> Self {
        Self {
            message: message.into(),
            pane: Some(pane),
            exit: false,
        }
    }

    /// Keeps whichever pane is currently shown.
    pub fn stay(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pane: None,
            exit: false,
        }
    }

    pub fn exit(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            pane: None,
            exit: true,
        }
    }
}

/// Parses a line and runs the resolved command against the ledger.
pub struct CommandDispatcher<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> CommandDispatcher<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    pub fn dispatch(
        &self,
        line: &str,
        ledger: &mut Ledger,
        storage: &dyn Storage,
    ) -> Result<CommandResult> {
        let params = CommandParams::parse(line, self.registry)?;
        self.execute(&params, ledger, storage)
    }

    pub fn execute(
        &self,
        params: &CommandParams<'_>,
        ledger: &mut Ledger,
        storage: &dyn Storage,
    ) -> Result<CommandResult> {
        let command = params.command();
        let mut context = CommandContext {
            ledger,
            storage,
            registry: self.registry,
        };
        let result = (command.handler)(&mut context, params);
        match &result {
            Ok(outcome) => tracing::info!(command = command.name, pane = ?outcome.pane, "command executed"),
            Err(err) => tracing::warn!(command = command.name, error = %err, "command rejected"),
        }
        result
    }
}
