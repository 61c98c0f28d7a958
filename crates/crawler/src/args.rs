// ABOUTME: Spider arguments given on the command line as key=value pairs.
// ABOUTME: Typed accessors for lists, numbers and flags used by the spider constructors.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::warn;

use crate::error::ConfigError;

/// Raw spider arguments.
///
/// Each argument is `key=value`; a bare `key` is a flag with an empty value
/// (`only-schedules`, `all`, `season-stats`). A repeated key keeps its last
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpiderArgs {
    values: BTreeMap<String, String>,
}

impl SpiderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` strings.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::MalformedArgument(arg.to_string()));
            }
            parsed.insert(key, value.trim());
        }
        Ok(parsed)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// True when the key was given at all, with or without a value.
    pub fn flag(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Comma-separated values of `key`, blanks removed.
    pub fn list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect()
        })
    }

    /// Comma-separated values of `key`, each parsed as `T`.
    pub fn parse_list<T: FromStr>(&self, key: &'static str) -> Result<Option<Vec<T>>, ConfigError> {
        let Some(items) = self.list(key) else {
            return Ok(None);
        };
        items
            .into_iter()
            .map(|item| {
                item.parse()
                    .map_err(|_| ConfigError::invalid(key, item, "not a number"))
            })
            .collect::<Result<Vec<T>, _>>()
            .map(Some)
    }

    /// Single value of `key` parsed as `T`.
    pub fn parse_one<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ConfigError::invalid(key, raw, "not a number"))
            })
            .transpose()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Logs every key the spider does not recognize.
    pub fn warn_unknown(&self, spider: &str, known: &[&str]) {
        for key in self.keys().filter(|k| !known.contains(k)) {
            warn!(spider, key, "ignoring unrecognized spider argument");
        }
    }
}
