use std::{
    borrow::Cow,
    io::{self, BufRead},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use rustyline::{
    completion::Completer,
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, ConditionalEventHandler, Context as ReadlineContext, Editor, Event, EventContext,
    EventHandler, Helper, KeyCode, KeyEvent, Modifiers, Movement, RepeatCount,
};

use crate::cli::completion::AutoCompleter;
use crate::cli::dispatcher::{CommandDispatcher, Pane};
use crate::cli::history::InputHistory;
use crate::cli::io::confirm_action;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::pane;
use crate::cli::registry::CommandRegistry;
use crate::config::ConfigManager;
use crate::core::{Clock, SystemClock};
use crate::errors::{CliError, FinanceError};
use crate::ledger::Ledger;
use crate::storage::{Storage, TextStorage};

const PROMPT: &str = "tally> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Flags raised by list listeners whenever a list publishes a new projection.
#[derive(Default)]
struct StalePanes {
    expense: Arc<AtomicBool>,
    income: Arc<AtomicBool>,
    payment: Arc<AtomicBool>,
}

impl StalePanes {
    fn watch(ledger: &mut Ledger) -> Self {
        let panes = Self::default();
        let flag = Arc::clone(&panes.expense);
        ledger.expenses.subscribe(move |projection| {
            tracing::debug!(visible = projection.len(), "expense pane stale");
            flag.store(true, Ordering::Relaxed);
        });
        let flag = Arc::clone(&panes.income);
        ledger.incomes.subscribe(move |projection| {
            tracing::debug!(visible = projection.len(), "income pane stale");
            flag.store(true, Ordering::Relaxed);
        });
        let flag = Arc::clone(&panes.payment);
        ledger.payments.subscribe(move |projection| {
            tracing::debug!(visible = projection.len(), "payment pane stale");
            flag.store(true, Ordering::Relaxed);
        });
        panes
    }

    /// Clears and returns the flag for `pane`.
    fn take(&self, pane: Pane) -> bool {
        let flag = match pane {
            Pane::Expense => &self.expense,
            Pane::Income => &self.income,
            Pane::Payment => &self.payment,
            Pane::Budget | Pane::Help => return false,
        };
        flag.swap(false, Ordering::Relaxed)
    }
}

/// One running shell: the ledger, where it is saved and what is on screen.
pub struct Session {
    registry: CommandRegistry,
    ledger: Ledger,
    storage: Box<dyn Storage>,
    pane: Pane,
    stale: StalePanes,
    running: bool,
}

impl Session {
    pub fn new(mut ledger: Ledger, storage: Box<dyn Storage>, pane: Pane) -> Self {
        let stale = StalePanes::watch(&mut ledger);
        Self {
            registry: CommandRegistry::standard(),
            ledger,
            storage,
            pane,
            stale,
            running: true,
        }
    }

    /// Loads configuration and every list from the application home.
    pub fn open(clock: Arc<dyn Clock>) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = TextStorage::new(config_manager.data_dir(&config))?;
        tracing::info!(data_dir = %storage.data_dir().display(), "opening ledger");

        let report = Ledger::load(&storage, clock)?;
        for warning in &report.warnings {
            output::warning(warning);
        }
        let mut ledger = report.ledger;
        ledger.apply_config(&config);

        let pane = config.default_pane.parse::<Pane>().unwrap_or_else(|err| {
            tracing::warn!(setting = "default_pane", "{}", err);
            Pane::Expense
        });
        Ok(Self::new(ledger, Box::new(storage), pane))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn render_current(&self) -> String {
        pane::render(self.pane, &self.ledger, &self.registry)
    }

    /// Runs one line. Errors are returned to the caller, which reports them and
    /// keeps the session alive.
    pub fn handle_line(&mut self, line: &str) -> Result<LoopControl, FinanceError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let dispatcher = CommandDispatcher::new(&self.registry);
        let result = dispatcher.dispatch(line, &mut self.ledger, self.storage.as_ref())?;
        if !result.message.is_empty() {
            output::success(&result.message);
        }
        if result.exit {
            self.running = false;
            return Ok(LoopControl::Exit);
        }

        let target = result.pane.unwrap_or(self.pane);
        let stale = self.stale.take(target);
        if result.pane.is_some() || stale {
            self.pane = target;
            println!("{}", self.render_current());
        }
        Ok(LoopControl::Continue)
    }

    pub fn report_error(&self, err: &FinanceError) {
        tracing::warn!(error = %err, "input rejected");
        output::error(err);
        if let FinanceError::UnknownCommand(typed) = err {
            if let Some(suggestion) = self.registry.suggest(typed) {
                output::info(format!("Did you mean `{}`?", suggestion));
            }
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os("TALLY_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain_mode: mode == CliMode::Script,
    });

    let mut session = Session::open(Arc::new(SystemClock))?;
    println!("{}", session.render_current());

    match mode {
        CliMode::Interactive => run_interactive(&mut session),
        CliMode::Script => run_script(&mut session, io::stdin().lock()),
    }
}

fn run_interactive(session: &mut Session) -> Result<(), CliError> {
    let history = Arc::new(Mutex::new(InputHistory::new()));
    let completer = Arc::new(Mutex::new(AutoCompleter::new(session.registry())));

    let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(ShellHelper {
        history: Arc::clone(&history),
    }));
    editor.bind_sequence(
        KeyEvent(KeyCode::Tab, Modifiers::NONE),
        EventHandler::Conditional(Box::new(CompleteLine { completer })),
    );
    editor.bind_sequence(
        KeyEvent(KeyCode::Up, Modifiers::NONE),
        EventHandler::Conditional(Box::new(StepHistory {
            history: Arc::clone(&history),
            backwards: true,
        })),
    );
    editor.bind_sequence(
        KeyEvent(KeyCode::Down, Modifiers::NONE),
        EventHandler::Conditional(Box::new(StepHistory {
            history: Arc::clone(&history),
            backwards: false,
        })),
    );

    while session.is_running() {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if let Ok(mut history) = history.lock() {
                    history.add(line.trim());
                }
                match session.handle_line(&line) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => session.report_error(&err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if confirm_action("Leave tally?", false)? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Goodbye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

/// Reads commands line by line until `exit` or end of input.
pub fn run_script(session: &mut Session, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        if !session.is_running() {
            break;
        }
        let line = line?;
        match session.handle_line(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => session.report_error(&err),
        }
    }
    Ok(())
}

struct ShellHelper {
    history: Arc<Mutex<InputHistory>>,
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = String;
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let history = self.history.lock().ok()?;
        history
            .latest_with_prefix(line)
            .map(|entry| entry[line.len()..].to_string())
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        use colored::Colorize;
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for ShellHelper {}

/// Tab: replace the line with the next completion.
struct CompleteLine {
    completer: Arc<Mutex<AutoCompleter>>,
}

impl ConditionalEventHandler for CompleteLine {
    fn handle(&self, _evt: &Event, _n: RepeatCount, _positive: bool, ctx: &EventContext) -> Option<Cmd> {
        let mut completer = self.completer.lock().ok()?;
        let completed = completer.complete(ctx.line());
        Some(Cmd::Replace(Movement::WholeLine, Some(completed)))
    }
}

/// Up/Down: walk the input history.
struct StepHistory {
    history: Arc<Mutex<InputHistory>>,
    backwards: bool,
}

impl ConditionalEventHandler for StepHistory {
    fn handle(&self, _evt: &Event, _n: RepeatCount, _positive: bool, _ctx: &EventContext) -> Option<Cmd> {
        let mut history = self.history.lock().ok()?;
        let line = if self.backwards {
            history.previous()
        } else {
            history.next()
        };
        Some(Cmd::Replace(Movement::WholeLine, Some(line.to_string())))
    }
}
