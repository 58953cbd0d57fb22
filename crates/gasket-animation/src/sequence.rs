//! Ordered, editable animation script

use crate::action::{Action, ActionField, ActionKind};
use gasket_core::{Axis, GasketError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Actions in execution order.
///
/// Owned by the session and lent to the engine on every tick; edits between
/// ticks are always safe. On disk it is a TOML file with an `[[actions]]` array:
/// ```toml
/// [[actions]]
/// type = "rotate"
/// axis = "Z"
/// degrees = 180.0
///
/// [[actions]]
/// type = "bounce"
/// duration = 5.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    #[serde(default)]
    actions: Vec<Action>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Four half turns about Z, grow to 2×, bounce forever, then return to center
    pub fn default_actions() -> Vec<Action> {
        vec![
            Action::rotate(Axis::Z, 180.0),
            Action::rotate(Axis::Z, -180.0),
            Action::rotate(Axis::Z, -180.0),
            Action::rotate(Axis::Z, 180.0),
            Action::scale(2.0),
            Action::bounce_forever(),
            Action::Center,
        ]
    }

    pub fn with_defaults() -> Self {
        Self::from_actions(Self::default_actions())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn append(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn append_kind(&mut self, kind: ActionKind) {
        self.append(Action::from_kind(kind));
    }

    /// Remove and return the action at `index`; out-of-range indices are ignored
    pub fn remove_at(&mut self, index: usize) -> Option<Action> {
        if index < self.actions.len() {
            Some(self.actions.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn reset_to_default(&mut self) {
        self.actions = Self::default_actions();
    }

    /// Edit a numeric parameter in place. False when the index is out of
    /// range, the field does not match the action, or the value is not finite.
    pub fn edit_at(&mut self, index: usize, field: ActionField, value: f64) -> bool {
        match self.actions.get_mut(index) {
            Some(action) => action.set_field(field, value),
            None => false,
        }
    }

    /// Parse a sequence from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load a sequence from a `.toml` file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GasketError::SequenceError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let sequence = Self::from_toml_str(&content).map_err(|e| {
            GasketError::SequenceError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let unsupported = sequence
            .iter()
            .filter(|a| matches!(a, Action::Unsupported))
            .count();
        if unsupported > 0 {
            log::warn!(
                "{}: {} action(s) with unknown type will be skipped",
                path.display(),
                unsupported
            );
        }

        Ok(sequence)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            return f.write_str("(empty sequence)");
        }
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>2}. {}", i + 1, action)?;
        }
        Ok(())
    }
}
