//! Text lookup for UI labels

use std::fmt::{Display, Write as _};
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;

use super::ConfigError;

/// Key to template map with positional `{0}`, `{1}`... placeholders
#[derive(Debug, Clone, Default)]
pub struct Messages {
    templates: FxHashMap<String, String>,
}

impl Messages {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in English labels
    pub fn with_defaults() -> Self {
        let mut messages = Self::new();
        for (key, template) in [
            ("game.state.paused", "** PAUSED **"),
            ("game.title", "{0}"),
            ("title.start", "Press ENTER to start"),
            ("hud.score", "Score: {0}"),
            ("hud.lives", "Lives: {0}"),
            ("debug.camera", "cam {0} pos=({1},{2}) target={3}"),
        ] {
            messages.insert(key, template);
        }
        messages
    }

    /// Read a flat map from a RON or JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a string map
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let templates: FxHashMap<String, String> = match path.extension().and_then(|e| e.to_str())
        {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => ron::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };
        Ok(Self { templates })
    }

    /// Add or replace every template of `other`
    pub fn merge(&mut self, other: Messages) {
        self.templates.extend(other.templates);
    }

    /// Add or replace a template
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Whether `key` has a template
    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Format the template for `key`; an unknown key yields the key itself
    pub fn get(&self, key: &str, args: &[&dyn Display]) -> String {
        let Some(template) = self.templates.get(key) else {
            log::debug!("No message for key '{key}'");
            return key.to_string();
        };
        format_template(template, args)
    }
}

/// Replace `{n}` with the n-th argument; other braces are kept as written
fn format_template(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|index| (index, close)));
        match placeholder {
            Some((index, close)) if index < args.len() => {
                let _ = write!(out, "{}", args[index]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let messages = Messages::with_defaults();
        assert_eq!(messages.get("hud.score", &[&42]), "Score: 42");
        assert_eq!(
            messages.get("debug.camera", &[&"main", &1.5, &-2, &"player"]),
            "cam main pos=(1.5,-2) target=player"
        );
    }

    #[test]
    fn test_missing_key_and_arguments() {
        let mut messages = Messages::new();
        assert_eq!(messages.get("nope", &[]), "nope");

        messages.insert("pair", "{0} and {1} {x}");
        assert_eq!(messages.get("pair", &[&"one"]), "one and {1} {x}");
    }

    #[test]
    fn test_load_overrides() {
        let dir = std::env::temp_dir().join(format!("arcade-messages-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fr.json");
        fs::write(&path, r#"{ "game.state.paused": "EN PAUSE" }"#).unwrap();

        let mut messages = Messages::with_defaults();
        messages.merge(Messages::load(&path).unwrap());

        assert_eq!(messages.get("game.state.paused", &[]), "EN PAUSE");
        assert_eq!(messages.get("hud.lives", &[&3]), "Lives: 3");
        fs::remove_dir_all(&dir).unwrap();
    }
}
