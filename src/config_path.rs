//! Dot-notation config paths, e.g. `jail_descriptions.sshd`.

use std::sync::LazyLock;

use regex::Regex;

/// A whole path made of at least two identifier segments.
static COMPOUND_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$")
        .expect("compound path pattern is valid")
});

/// Splits off the first segment of `path`.
///
/// Only a path that is a well-formed compound path gets split. Anything else
/// (a single identifier, or a string with hyphens, spaces, empty segments...)
/// is returned whole as one opaque key with no remainder.
pub fn split_first(path: &str) -> (&str, Option<&str>) {
    if COMPOUND_PATH.is_match(path) {
        if let Some((head, rest)) = path.split_once('.') {
            return (head, Some(rest));
        }
    }
    (path, None)
}

/// Iterator over the segments of a config path, re-validating the remainder
/// at every step.
#[derive(Debug, Clone)]
pub struct ConfigPath<'a> {
    remaining: Option<&'a str>,
}

impl<'a> ConfigPath<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            remaining: Some(path),
        }
    }
}

impl<'a> Iterator for ConfigPath<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.remaining.take()?;
        let (head, rest) = split_first(path);
        self.remaining = rest;
        Some(head)
    }
}
