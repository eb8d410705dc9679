//! CSS-like selectors used to identify drag handles.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::DomainError;

static COMPOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<tag>\*|[A-Za-z][A-Za-z0-9-]*)?(?P<rest>(?:[.#][A-Za-z_-][A-Za-z0-9_-]*)*)$")
        .expect("compound selector pattern compiles")
});
static PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<kind>[.#])(?P<name>[A-Za-z_-][A-Za-z0-9_-]*)")
        .expect("part pattern compiles")
});

/// A comma separated list of compound selectors (`div.handle`, `#grip`, `.a.b, .c`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Whether an element with the given tag, id, and classes matches any alternative.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.matches(tag, id, classes))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Compound {
    fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let captures = COMPOUND.captures(text)?;
        let tag = captures
            .name("tag")
            .map(|m| m.as_str())
            .filter(|tag| *tag != "*")
            .map(str::to_ascii_lowercase);

        let mut id = None;
        let mut classes = Vec::new();
        let rest = captures.name("rest").map_or("", |m| m.as_str());
        for part in PART.captures_iter(rest) {
            let name = part["name"].to_owned();
            if &part["kind"] == "#" {
                if id.replace(name).is_some() {
                    return None;
                }
            } else {
                classes.push(name);
            }
        }

        Some(Self { tag, id, classes })
    }

    fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(expected) = &self.tag
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(expected) = &self.id
            && id != Some(expected.as_str())
        {
            return false;
        }
        self.classes
            .iter()
            .all(|class| classes.iter().any(|candidate| candidate == class))
    }
}

impl FromStr for Selector {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let source = value.trim();
        let alternatives = source
            .split(',')
            .map(|part| Compound::parse(part.trim()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DomainError::InvalidSelector(value.to_owned()))?;

        Ok(Self {
            source: source.to_owned(),
            alternatives,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
