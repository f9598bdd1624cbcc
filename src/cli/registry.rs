use crate::cli::dispatcher::CommandHandler;
use crate::errors::{FinanceError, Result};

/// Immutable description of one command the shell understands.
pub struct CommandDescriptor {
    /// One word, or two words separated by a space.
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// Secondary parameter names and their descriptions.
    pub params: &'static [(&'static str, &'static str)],
    pub handler: CommandHandler,
}

impl CommandDescriptor {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        params: &'static [(&'static str, &'static str)],
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            params,
            handler,
        }
    }

    pub fn word_count(&self) -> usize {
        self.name.split_whitespace().count()
    }

    pub fn param_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|(name, _)| *name)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl PartialEq for CommandDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CommandDescriptor {}

/// Fixed set of commands, resolved by unambiguous prefix.
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self { commands }
    }

    /// Registry holding every command of the tracker.
    pub fn standard() -> Self {
        Self::new(crate::cli::commands::descriptors())
    }

    /// Resolves the leading word(s) of `head` to exactly one descriptor.
    ///
    /// Two typed words are first matched against two-word names (each word by
    /// prefix); otherwise the first typed word is matched against one-word
    /// names. More than one candidate is as much a failure as none.
    pub fn resolve(&self, head: &str) -> Result<&CommandDescriptor> {
        let mut words = head.split_whitespace();
        let first = words.next().unwrap_or_default();
        let second = words.next();

        if let Some(second) = second {
            let candidates: Vec<&CommandDescriptor> = self
                .commands
                .iter()
                .filter(|descriptor| {
                    let mut name = descriptor.name.split_whitespace();
                    match (name.next(), name.next(), name.next()) {
                        (Some(a), Some(b), None) => a.starts_with(first) && b.starts_with(second),
                        _ => false,
                    }
                })
                .collect();
            if let [only] = candidates.as_slice() {
                tracing::debug!(typed = head, resolved = only.name, "command resolved");
                return Ok(*only);
            }
        }

        let candidates: Vec<&CommandDescriptor> = self
            .commands
            .iter()
            .filter(|descriptor| descriptor.word_count() == 1 && descriptor.name.starts_with(first))
            .collect();
        match candidates.as_slice() {
            [only] if !first.is_empty() => {
                tracing::debug!(typed = first, resolved = only.name, "command resolved");
                Ok(*only)
            }
            _ => Err(FinanceError::UnknownCommand(first.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|descriptor| descriptor.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|descriptor| descriptor.name)
    }

    /// Closest known name, for "did you mean" hints.
    pub fn suggest(&self, typed: &str) -> Option<&'static str> {
        let typed = typed.to_ascii_lowercase();
        self.names()
            .map(|name| (name, strsim::jaro_winkler(&typed, &name.to_ascii_lowercase())))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }
}
