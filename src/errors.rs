use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures raised while interpreting and executing a command.
///
/// None of these end the interactive session: the shell prints the message and
/// waits for the next line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FinanceError {
    #[error("I don't know what command `{0}` is!")]
    UnknownCommand(String),
    #[error("{0} is not a valid parameter for this command!")]
    UnknownParam(String),
    #[error("/{0} cannot be specified twice!")]
    DuplicateParam(String),
    #[error("/{0} needs a value!")]
    MissingParamValue(String),
    #[error("This command needs {0} to be given!")]
    MissingParam(String),
    #[error("{0} is not a valid criteria!")]
    InvalidCriteria(String),
    #[error("There is no {kind} numbered {index}!")]
    IndexOutOfRange { kind: &'static str, index: usize },
    #[error("{0} is not a valid number!")]
    NumberFormatInvalid(String),
    #[error("{0} is not a valid amount!")]
    AmountInvalid(String),
    #[error("{0} is not a valid time! Use YYYY-MM-DD or YYYY-MM-DD HH:MM.")]
    TimeFormatInvalid(String),
    #[error("{0} is not an available pane!")]
    PaneInvalid(String),
    #[error("Item {0} is not tentative!")]
    NotTentative(usize),
    #[error("The file at {path} could not be loaded: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
    #[error("The file at {path} could not be saved to: {reason}. Close other programs that may be accessing it.")]
    SaveFailed { path: PathBuf, reason: String },
    #[error("Stored data is malformed: {0}")]
    StorageFormatInvalid(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FinanceError>;

/// Failures of the shell itself, as opposed to a single command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}
