use std::collections::BTreeMap;

use crate::cli::registry::{CommandDescriptor, CommandRegistry};
use crate::cli::tokenizer::tokenize;
use crate::errors::{FinanceError, Result};

/// Validated parameters of one command invocation.
#[derive(Debug)]
pub struct CommandParams<'r> {
    command: &'r CommandDescriptor,
    main_param: Option<String>,
    params: BTreeMap<&'static str, Option<String>>,
}

impl<'r> CommandParams<'r> {
    /// Tokenizes `line`, resolves its command and validates every `/param`
    /// against the names that command declares.
    pub fn parse(line: &str, registry: &'r CommandRegistry) -> Result<Self> {
        let (head, tokens) = tokenize(line);
        let command = registry.resolve(head)?;

        let main_param = after_words(head, command.word_count());
        let main_param = (!main_param.is_empty()).then(|| main_param.to_string());

        let mut params = BTreeMap::new();
        for token in tokens {
            let candidates: Vec<&'static str> = command
                .param_names()
                .filter(|name| name.starts_with(token.name))
                .collect();
            let [name] = candidates.as_slice() else {
                return Err(FinanceError::UnknownParam(token.name.to_string()));
            };
            if params.contains_key(name) {
                return Err(FinanceError::DuplicateParam((*name).to_string()));
            }
            params.insert(*name, token.value.map(str::to_string));
        }

        Ok(Self {
            command,
            main_param,
            params,
        })
    }

    pub fn command(&self) -> &'r CommandDescriptor {
        self.command
    }

    pub fn main_param(&self) -> Option<&str> {
        self.main_param.as_deref()
    }

    pub fn contains_main_param(&self) -> bool {
        self.main_param.is_some()
    }

    /// Main param, or `MissingParam` naming what the command expected.
    pub fn require_main_param(&self, what: &str) -> Result<&str> {
        self.main_param()
            .ok_or_else(|| FinanceError::MissingParam(what.to_string()))
    }

    /// Value of a supplied parameter. Absent or valueless parameters are
    /// `MissingParamValue`.
    pub fn param(&self, name: &str) -> Result<&str> {
        self.params
            .get(name)
            .and_then(|value| value.as_deref())
            .ok_or_else(|| FinanceError::MissingParamValue(name.to_string()))
    }

    /// `None` when the parameter was not given at all; an error when it was
    /// given without a value.
    pub fn optional_param(&self, name: &str) -> Result<Option<&str>> {
        if self.contains_param(name) {
            self.param(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn contains_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn contains_params(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.contains_param(name))
    }

    /// Supplied parameter names in canonical form.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.keys().copied()
    }
}

/// Text after the first `count` words, inner whitespace kept as typed.
fn after_words(text: &str, count: usize) -> &str {
    let mut rest = text.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::dispatcher::{CommandContext, CommandResult};
    use crate::cli::registry::CommandDescriptor;

    fn noop(_: &mut CommandContext<'_>, _: &CommandParams<'_>) -> Result<CommandResult> {
        Ok(CommandResult::stay(""))
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::new(vec![
            CommandDescriptor::new(
                "addExpense",
                "",
                "",
                &[("description", "what"), ("tag", "tag"), ("time", "time")],
                noop,
            ),
            CommandDescriptor::new("view expense", "", "", &[("previous", "offset")], noop),
        ])
    }

    #[test]
    fn main_param_and_values() {
        let registry = registry();
        let params = CommandParams::parse("addE 12.50 /tag food /ti 2024-01-01", &registry).unwrap();
        assert_eq!(params.command().name, "addExpense");
        assert_eq!(params.main_param(), Some("12.50"));
        assert_eq!(params.param("tag").unwrap(), "food");
        assert_eq!(params.param("time").unwrap(), "2024-01-01");
        assert!(params.contains_params(&["tag", "time"]));
        assert!(!params.contains_params(&["tag", "description"]));
    }

    #[test]
    fn main_param_keeps_inner_spacing() {
        let registry = registry();
        let params = CommandParams::parse("addExpense  a  b\tc /tag x", &registry).unwrap();
        assert_eq!(params.main_param(), Some("a  b\tc"));
        let two_words = CommandParams::parse("view   expense   last  week", &registry).unwrap();
        assert_eq!(two_words.main_param(), Some("last  week"));
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let registry = registry();
        let a = CommandParams::parse("addExpense 1 /tag x /time y", &registry).unwrap();
        let b = CommandParams::parse("addExpense 1 /time y /tag x", &registry).unwrap();
        assert_eq!(a.names().collect::<Vec<_>>(), b.names().collect::<Vec<_>>());
        assert_eq!(a.param("time").unwrap(), b.param("time").unwrap());
    }

    #[test]
    fn repeated_param_is_duplicate() {
        let registry = registry();
        let err = CommandParams::parse("addExpense 5 /d food /d drink", &registry).unwrap_err();
        assert_eq!(err, FinanceError::DuplicateParam("description".into()));
    }

    #[test]
    fn ambiguous_or_unknown_param_name() {
        let registry = registry();
        assert_eq!(
            CommandParams::parse("addExpense 5 /t x", &registry).unwrap_err(),
            FinanceError::UnknownParam("t".into())
        );
        assert_eq!(
            CommandParams::parse("addExpense 5 /zz x", &registry).unwrap_err(),
            FinanceError::UnknownParam("zz".into())
        );
    }

    #[test]
    fn valueless_param_reports_missing_value() {
        let registry = registry();
        let params = CommandParams::parse("addExpense 5 /tag", &registry).unwrap();
        assert!(params.contains_param("tag"));
        assert_eq!(
            params.param("tag").unwrap_err(),
            FinanceError::MissingParamValue("tag".into())
        );
        assert_eq!(
            params.param("time").unwrap_err(),
            FinanceError::MissingParamValue("time".into())
        );
        assert_eq!(params.optional_param("time").unwrap(), None);
        assert!(params.optional_param("tag").is_err());
    }

    #[test]
    fn two_word_command_skips_both_words() {
        let registry = registry();
        let params = CommandParams::parse("view exp week /previous 2", &registry).unwrap();
        assert_eq!(params.main_param(), Some("week"));
        assert_eq!(params.param("previous").unwrap(), "2");
        let bare = CommandParams::parse("view expense", &registry).unwrap();
        assert!(!bare.contains_main_param());
    }
}
