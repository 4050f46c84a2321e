//! Alias list cache and transfer destination parsing.

use crate::bridge::HostBridge;
use crate::types::AliasList;
use crate::ViewError;

/// Aliases fetched from the host, loaded at most once.
#[derive(Debug, Clone)]
pub struct AliasCache {
    initialized: bool,
    aliases: Vec<String>,
    min_input: usize,
}

impl Default for AliasCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ALIAS_MIN_INPUT)
    }
}

impl AliasCache {
    pub fn new(min_input: usize) -> Self {
        Self {
            initialized: false,
            aliases: Vec::new(),
            min_input,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Loads the alias list unless it is already loaded. Returns true if this call loaded it.
    ///
    /// A reply without a list leaves the cache uninitialized, so the next call asks again.
    pub fn refresh<B: HostBridge + ?Sized>(&mut self, bridge: &B) -> bool {
        if self.initialized {
            tracing::debug!("alias cache already loaded, skipping refresh");
            return false;
        }

        let reply = bridge.request_aliases();
        let list: AliasList = match serde_json::from_str(&reply) {
            Ok(list) => list,
            Err(e) => {
                tracing::error!("failed to decode alias list: {}", e);
                return false;
            }
        };

        match list.aliases {
            Some(entries) => {
                self.aliases = entries.into_iter().map(|entry| entry.alias).collect();
                self.initialized = true;
                tracing::info!("aliases loaded: {}", self.aliases.len());
                true
            }
            None => {
                tracing::error!("internal error: aliases not loaded");
                false
            }
        }
    }

    /// Autocomplete tags (`"@" + alias`) matching `input`.
    ///
    /// Nothing is offered for inputs shorter than the configured minimum. The input, `@`
    /// included, is matched case-insensitively as a substring of the tag.
    pub fn suggestions(&self, input: &str) -> Vec<String> {
        if input.chars().count() < self.min_input {
            return Vec::new();
        }
        let needle = input.to_lowercase();
        self.aliases
            .iter()
            .map(|alias| format!("@{}", alias))
            .filter(|tag| tag.to_lowercase().contains(&needle))
            .collect()
    }
}

/// Where a transfer is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDestination {
    Alias(String),
    Address(String),
}

/// Splits a destination field into an alias reference (`@name`) or a raw address.
pub fn parse_destination(text: &str) -> Result<TransferDestination, ViewError> {
    if text.is_empty() {
        return Err(ViewError::Validation(
            "Destination address is empty".to_string(),
        ));
    }
    match text.strip_prefix('@') {
        Some("") => Err(ViewError::Validation(
            "Alias name is missing after '@'".to_string(),
        )),
        Some(name) => Ok(TransferDestination::Alias(name.to_string())),
        None => Ok(TransferDestination::Address(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(names: &[&str]) -> AliasCache {
        AliasCache {
            initialized: true,
            aliases: names.iter().map(|n| n.to_string()).collect(),
            min_input: 2,
        }
    }

    #[test]
    fn test_suggestions_min_length() {
        let cache = loaded(&["just-mike", "bob"]);
        assert!(cache.suggestions("@").is_empty());
        assert_eq!(cache.suggestions("@b"), vec!["@bob"]);
        assert_eq!(cache.suggestions("MIKE"), vec!["@just-mike"]);
        assert!(cache.suggestions("@m").is_empty());
        assert_eq!(cache.suggestions("@J"), vec!["@just-mike"]);
    }

    #[test]
    fn test_parse_destination() {
        assert_eq!(
            parse_destination("@just-mike").unwrap(),
            TransferDestination::Alias("just-mike".to_string())
        );
        assert_eq!(
            parse_destination("1Htb4dS5").unwrap(),
            TransferDestination::Address("1Htb4dS5".to_string())
        );
        assert!(matches!(parse_destination(""), Err(ViewError::Validation(_))));
        assert!(matches!(parse_destination("@"), Err(ViewError::Validation(_))));
    }
}
