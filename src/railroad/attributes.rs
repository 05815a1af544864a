use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9\-:._]*$").expect("attribute name regex"));

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Escapes an attribute value for use between double quotes.
pub fn escape_value(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Insertion-ordered attribute set of one markup element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: IndexMap<String, String>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from `(name, value)` pairs, validating every name.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut attributes = Self::new();
        for (name, value) in pairs {
            attributes.add(name, value)?;
        }
        Ok(attributes)
    }

    /// Sets `name` to `value`. Replacing an existing name keeps its position.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(Error::InvalidAttributeName(name));
        }
        self.entries.insert(name, value.into());
        Ok(())
    }

    /// Appends raw text to the current value of `name`, creating it if absent.
    pub fn concat(&mut self, name: impl Into<String>, value: &str) -> Result<()> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(Error::InvalidAttributeName(name));
        }
        self.entries.entry(name).or_default().push_str(value);
        Ok(())
    }

    /// Sets an attribute whose name is a known-good literal.
    pub(crate) fn set(&mut self, name: &'static str, value: impl Into<String>) {
        debug_assert!(is_valid_name(name), "invalid attribute name {name}");
        self.entries.insert(name.to_string(), value.into());
    }

    pub(crate) fn append(&mut self, name: &'static str, value: &str) {
        debug_assert!(is_valid_name(name), "invalid attribute name {name}");
        self.entries.entry(name.to_string()).or_default().push_str(value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn delete(&mut self, name: &str) -> Option<String> {
        self.entries.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Plain name to value view, unescaped.
    pub fn to_dictionary(&self) -> IndexMap<String, String> {
        self.entries.clone()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (name, value)) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}=\"{}\"", escape_value(value))?;
        }
        Ok(())
    }
}
