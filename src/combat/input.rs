//! Key-to-action mapping

use serde::{Deserialize, Serialize};

use super::state::Action;
use crate::{Error, Result};

/// Key bindings for the three non-idle actions
///
/// Matching is ASCII case-insensitive. Any key without a binding, and the
/// absence of a key, maps to [`Action::None`].
///
/// # Examples
///
/// ```
/// use sparring::combat::{Action, KeyMap};
///
/// let keys = KeyMap::default();
/// assert_eq!(keys.map(Some("e")), Action::Jab);
/// assert_eq!(keys.map(Some("Q")), Action::Cross);
/// assert_eq!(keys.map(Some("x")), Action::None);
/// assert_eq!(keys.map(None), Action::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyBinding>", into = "Vec<KeyBinding>")]
pub struct KeyMap {
    bindings: Vec<KeyBinding>,
}

/// A single key bound to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

impl KeyBinding {
    pub fn new(key: impl Into<String>, action: Action) -> Self {
        Self {
            key: key.into(),
            action,
        }
    }
}

impl KeyMap {
    /// Create a validated key map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyBinding`] if a key is empty, bound twice
    /// (case-insensitively), or bound to [`Action::None`].
    pub fn new(bindings: Vec<KeyBinding>) -> Result<Self> {
        for (i, binding) in bindings.iter().enumerate() {
            if binding.key.trim().is_empty() {
                return Err(Error::InvalidKeyBinding {
                    key: binding.key.clone(),
                    reason: "key must not be empty".to_string(),
                });
            }
            if binding.action == Action::None {
                return Err(Error::InvalidKeyBinding {
                    key: binding.key.clone(),
                    reason: "keys cannot be bound to 'none'".to_string(),
                });
            }
            if bindings[..i]
                .iter()
                .any(|earlier| earlier.key.eq_ignore_ascii_case(&binding.key))
            {
                return Err(Error::InvalidKeyBinding {
                    key: binding.key.clone(),
                    reason: "key is bound more than once".to_string(),
                });
            }
        }
        Ok(Self { bindings })
    }

    /// Map a raw key, or its absence, to an action. Total.
    pub fn map(&self, key: Option<&str>) -> Action {
        key.and_then(|key| {
            self.bindings
                .iter()
                .find(|binding| binding.key.eq_ignore_ascii_case(key.trim()))
        })
        .map_or(Action::None, |binding| binding.action)
    }

    /// Allowed response keys in binding order
    pub fn choices(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.key.as_str()).collect()
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// First key bound to `action`, if any
    pub fn key_for(&self, action: Action) -> Option<&str> {
        self.bindings
            .iter()
            .find(|binding| binding.action == action)
            .map(|binding| binding.key.as_str())
    }
}

impl Default for KeyMap {
    /// `q` → cross, `w` → block, `e` → jab
    fn default() -> Self {
        Self {
            bindings: vec![
                KeyBinding::new("q", Action::Cross),
                KeyBinding::new("w", Action::Block),
                KeyBinding::new("e", Action::Jab),
            ],
        }
    }
}

impl TryFrom<Vec<KeyBinding>> for KeyMap {
    type Error = Error;

    fn try_from(bindings: Vec<KeyBinding>) -> Result<Self> {
        KeyMap::new(bindings)
    }
}

impl From<KeyMap> for Vec<KeyBinding> {
    fn from(map: KeyMap) -> Self {
        map.bindings
    }
}

/// Map a raw key with the default bindings.
pub fn map_key(key: Option<&str>) -> Action {
    static DEFAULT: std::sync::LazyLock<KeyMap> = std::sync::LazyLock::new(KeyMap::default);
    DEFAULT.map(key)
}
