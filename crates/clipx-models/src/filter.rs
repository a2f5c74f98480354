//! Tag-type filters for querying detector outputs.
//!
//! A filter string is a comma-separated list of `tag_type[:sub]` items:
//!
//! - `transcript` selects every event with tag type `transcript`
//! - `tag:face` selects tag type `tag` whose tag contains `face`
//! - `identity:^speaker_` selects tag type `identity` whose tag does NOT contain `speaker_`
//!
//! Sub-filters apply to the whole query, so `identity:speaker_,shot` keeps
//! only `speaker_` tags from both types. When several items carry a
//! sub-filter of the same kind, the last one wins.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::EventRecord;

/// Tag filter parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagFilterError {
    /// No tag type was given
    #[error("Tag-type filter is empty")]
    Empty,

    /// A `:` was present with nothing after it
    #[error("Tag-type filter item '{0}' has an empty sub-filter")]
    EmptySubFilter(String),
}

/// Parsed tag-type filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagTypeFilter {
    /// Accepted tag types
    pub tag_types: Vec<String>,

    /// Tag must contain this substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_contains: Option<String>,

    /// Tag must not contain this substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_excludes: Option<String>,
}

impl TagTypeFilter {
    /// Filter accepting a single tag type with no sub-filter.
    pub fn tag_type(tag_type: impl Into<String>) -> Self {
        Self {
            tag_types: vec![tag_type.into()],
            tag_contains: None,
            tag_excludes: None,
        }
    }

    /// Whether an event passes this filter.
    pub fn matches(&self, event: &EventRecord) -> bool {
        if !self.tag_types.iter().any(|t| *t == event.tag_type) {
            return false;
        }
        if let Some(sub) = &self.tag_contains {
            if !event.tag.contains(sub.as_str()) {
                return false;
            }
        }
        if let Some(sub) = &self.tag_excludes {
            if event.tag.contains(sub.as_str()) {
                return false;
            }
        }
        true
    }
}

impl FromStr for TagTypeFilter {
    type Err = TagFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut filter = TagTypeFilter {
            tag_types: Vec::new(),
            tag_contains: None,
            tag_excludes: None,
        };

        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let (tag_type, sub) = match item.split_once(':') {
                Some((tag_type, sub)) => (tag_type.trim(), Some(sub.trim())),
                None => (item, None),
            };
            if tag_type.is_empty() {
                return Err(TagFilterError::Empty);
            }
            filter.tag_types.push(tag_type.to_string());

            match sub {
                None => {}
                Some(sub) => match sub.strip_prefix('^') {
                    Some("") => return Err(TagFilterError::EmptySubFilter(item.to_string())),
                    Some(excluded) => filter.tag_excludes = Some(excluded.to_string()),
                    None if sub.is_empty() => {
                        return Err(TagFilterError::EmptySubFilter(item.to_string()))
                    }
                    None => filter.tag_contains = Some(sub.to_string()),
                },
            }
        }

        if filter.tag_types.is_empty() {
            return Err(TagFilterError::Empty);
        }
        Ok(filter)
    }
}

impl fmt::Display for TagTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_types.join(","))?;
        if let Some(sub) = &self.tag_contains {
            write!(f, ":{}", sub)?;
        }
        if let Some(sub) = &self.tag_excludes {
            write!(f, ":^{}", sub)?;
        }
        Ok(())
    }
}

/// A request for events from a detector source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventQuery {
    /// Tag-type filter
    pub filter: TagTypeFilter,

    /// Restrict to events whose extractor name contains one of these
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extractors: Vec<String>,
}

impl EventQuery {
    pub fn new(filter: TagTypeFilter) -> Self {
        Self {
            filter,
            extractors: Vec::new(),
        }
    }

    /// Builder-style setter for the extractor restriction.
    pub fn with_extractors(mut self, extractors: Vec<String>) -> Self {
        self.extractors = extractors;
        self
    }

    /// Whether an event satisfies the query.
    pub fn matches(&self, event: &EventRecord) -> bool {
        if !self.filter.matches(event) {
            return false;
        }
        if self.extractors.is_empty() {
            return true;
        }
        match &event.extractor {
            Some(name) => self.extractors.iter().any(|e| name.contains(e.as_str())),
            None => false,
        }
    }
}
