pub mod commands;
pub mod completion;
pub mod dispatcher;
pub mod history;
pub mod io;
pub mod output;
pub mod pane;
pub mod params;
pub mod registry;
mod shell;
pub mod tokenizer;

pub use dispatcher::{CommandContext, CommandDispatcher, CommandResult, Pane};
pub use params::CommandParams;
pub use registry::{CommandDescriptor, CommandRegistry};
pub use shell::{run_cli, run_script, CliMode, LoopControl, Session};
