//! Recognized arguments and their value history.

use crate::errors::ArgumentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Maps each recognized argument name to the values it has been used with.
///
/// A name present as a key is recognized by the tool, even when its history is
/// empty. Absence of the key means the tool does not accept that argument.
/// Histories are append-only logs: the same value may appear more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentHistory {
    args: BTreeMap<String, Vec<String>>,
}

impl ArgumentHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history recognizing `names`, each with no prior values.
    ///
    /// Repeated names collapse into one entry.
    pub fn with_args<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        }
    }

    /// Registers a new recognized argument with an empty history.
    pub fn add_arg(&mut self, name: impl Into<String>) -> Result<(), ArgumentError> {
        let name = name.into();
        if self.args.contains_key(&name) {
            return Err(ArgumentError::already_recognized(name));
        }
        self.args.insert(name, Vec::new());
        Ok(())
    }

    /// Appends one used value to a recognized argument's history.
    pub fn add_arg_val(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), ArgumentError> {
        match self.args.get_mut(name) {
            Some(history) => {
                history.push(value.into());
                Ok(())
            }
            None => Err(ArgumentError::not_recognized(name)),
        }
    }

    /// Appends each value in order, returning how many were recorded.
    ///
    /// Each append is independent; there is no rollback if one fails.
    pub fn add_arg_vals<I, S>(&mut self, name: &str, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values
            .into_iter()
            .map(|v| self.add_arg_val(name, v))
            .filter(Result::is_ok)
            .count()
    }

    /// Removes an argument along with its entire history.
    ///
    /// Returns false when the argument was not recognized.
    pub fn erase_arg(&mut self, name: &str) -> bool {
        let removed = self.args.remove(name).is_some();
        if !removed {
            debug!(argument = %name, "erase_arg on unrecognized argument");
        }
        removed
    }

    /// Removes the first occurrence of `value` from the argument's history.
    ///
    /// Later duplicates stay. Returns false when the argument is unrecognized
    /// or the value is absent.
    pub fn erase_arg_val(&mut self, name: &str, value: &str) -> bool {
        let Some(history) = self.args.get_mut(name) else {
            return false;
        };
        match history.iter().position(|v| v == value) {
            Some(pos) => {
                history.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Checks whether the argument is recognized.
    #[must_use]
    pub fn is_recognized(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Returns the value history of an argument.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.args.get(name).map(Vec::as_slice)
    }

    /// Read-only view of the full argument to history mapping.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, Vec<String>> {
        &self.args
    }

    /// Number of recognized arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if no arguments are recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_arg_twice_fails_without_mutation() {
        let mut history = ArgumentHistory::new();
        history.add_arg("-o").unwrap();
        history.add_arg_val("-o", "out.bin").unwrap();
        let before = history.clone();

        let err = history.add_arg("-o").unwrap_err();
        assert_eq!(err, ArgumentError::already_recognized("-o"));
        assert_eq!(history, before);
    }

    #[test]
    fn test_add_arg_val_requires_recognized_arg() {
        let mut history = ArgumentHistory::with_args(["-v"]);

        assert!(history.add_arg_val("-v", "1").is_ok());
        assert_eq!(
            history.add_arg_val("--help", "yes"),
            Err(ArgumentError::not_recognized("--help"))
        );
        assert!(!history.is_recognized("--help"));
        assert_eq!(history.values("-v"), Some(&["1".to_string()][..]));
    }

    #[test]
    fn test_history_is_append_only() {
        let mut history = ArgumentHistory::with_args(["x"]);
        history.add_arg_val("x", "a").unwrap();
        history.add_arg_val("x", "b").unwrap();
        history.add_arg_val("x", "a").unwrap();

        assert_eq!(history.values("x").unwrap(), ["a", "b", "a"]);
    }

    #[test]
    fn test_batch_add_counts_successes() {
        let mut history = ArgumentHistory::with_args(["x"]);
        assert_eq!(history.add_arg_vals("x", ["1", "2", "3"]), 3);
        assert_eq!(history.add_arg_vals("y", ["1"]), 0);
        assert_eq!(history.values("x").unwrap().len(), 3);
    }

    #[test]
    fn test_erase_arg() {
        let mut history = ArgumentHistory::with_args(["a1", "a2"]);
        history.add_arg_val("a1", "v").unwrap();

        assert!(history.erase_arg("a1"));
        assert!(!history.erase_arg("a1"));
        assert!(!history.is_recognized("a1"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_erase_arg_val_removes_first_match_only() {
        let mut history = ArgumentHistory::with_args(["x"]);
        history.add_arg_vals("x", ["a", "b", "a"]);

        assert!(history.erase_arg_val("x", "a"));
        assert_eq!(history.values("x").unwrap(), ["b", "a"]);

        assert!(!history.erase_arg_val("x", "zzz"));
        assert!(!history.erase_arg_val("missing", "a"));
        assert_eq!(history.values("x").unwrap(), ["b", "a"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut history = ArgumentHistory::with_args(["x"]);
        history.add_arg_val("x", "v").unwrap();

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json, serde_json::json!({"x": ["v"]}));
    }
}
