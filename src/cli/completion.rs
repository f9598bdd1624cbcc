//! Tab completion of command names and `/param` names.

use crate::cli::registry::CommandRegistry;

const PARAM_INDICATOR: char = '/';

/// What a completion request can do with the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    CompleteCommandName,
    ProduceParameter,
    CompleteParameter,
    /// The line is the previous completion: move to the next candidate.
    Iterate,
    NotDoable,
}

/// Completes the last token of a line; repeated requests cycle through the
/// remaining candidates.
#[derive(Debug, Clone)]
pub struct AutoCompleter {
    commands: Vec<(&'static str, Vec<&'static str>)>,
    last_complement: String,
    candidates: Vec<String>,
    cursor: usize,
}

impl AutoCompleter {
    pub fn new(registry: &CommandRegistry) -> Self {
        Self {
            commands: registry
                .iter()
                .map(|command| (command.name, command.param_names().collect()))
                .collect(),
            last_complement: String::new(),
            candidates: Vec::new(),
            cursor: 0,
        }
    }

    pub fn purpose(&self, input: &str) -> Purpose {
        if input.trim().is_empty() {
            return Purpose::NotDoable;
        }
        if input == self.last_complement {
            return Purpose::Iterate;
        }
        let token_count = input.split_whitespace().count();
        let ends_with_space = input.ends_with(' ');
        if self.params_of(input).is_none() {
            return if token_count > 1 || ends_with_space {
                Purpose::NotDoable
            } else {
                Purpose::CompleteCommandName
            };
        }
        if ends_with_space {
            Purpose::ProduceParameter
        } else if last_token(input).1.starts_with(PARAM_INDICATOR) {
            Purpose::CompleteParameter
        } else if token_count == 1 {
            Purpose::CompleteCommandName
        } else {
            Purpose::NotDoable
        }
    }

    /// Returns `input` with its last token replaced by the chosen candidate, or
    /// unchanged when nothing fits.
    pub fn complete(&mut self, input: &str) -> String {
        let purpose = self.purpose(input);
        match purpose {
            Purpose::Iterate => {
                self.cursor += 1;
                if self.cursor >= self.candidates.len() {
                    self.cursor = 0;
                }
            }
            Purpose::NotDoable => self.candidates.clear(),
            _ => {
                self.candidates = self.candidates_for(input, purpose);
                self.cursor = 0;
            }
        }

        let (start, token) = last_token(input);
        let complement = self
            .candidates
            .get(self.cursor)
            .map_or(token, String::as_str);
        let full = format!("{}{}", &input[..start], complement);
        tracing::debug!(?purpose, candidates = self.candidates.len(), "completion");
        self.last_complement = full.clone();
        full
    }

    fn candidates_for(&self, input: &str, purpose: Purpose) -> Vec<String> {
        let (_, token) = last_token(input);
        match purpose {
            Purpose::CompleteCommandName => self
                .commands
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.starts_with(token))
                .map(str::to_string)
                .collect(),
            Purpose::ProduceParameter => self
                .params_of(input)
                .unwrap_or_default()
                .iter()
                .map(|name| format!("{}{}", PARAM_INDICATOR, name))
                .collect(),
            Purpose::CompleteParameter => {
                let typed = token.trim_start_matches(PARAM_INDICATOR);
                self.params_of(input)
                    .unwrap_or_default()
                    .iter()
                    .filter(|name| name.starts_with(typed))
                    .map(|name| format!("{}{}", PARAM_INDICATOR, name))
                    .collect()
            }
            Purpose::Iterate | Purpose::NotDoable => Vec::new(),
        }
    }

    /// Parameter names of the command named exactly by the first token.
    fn params_of(&self, input: &str) -> Option<&[&'static str]> {
        let first = input.split_whitespace().next()?;
        self.commands
            .iter()
            .find(|(name, _)| *name == first)
            .map(|(_, params)| params.as_slice())
    }
}

/// Byte offset and text of the token after the last space.
fn last_token(input: &str) -> (usize, &str) {
    let start = input.rfind(' ').map_or(0, |idx| idx + 1);
    (start, &input[start..])
}
