//! Display tags parsed from the stored comma-delimited tag string.

use std::fmt;

/// Ordered set of trimmed, non-empty tag tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Separator used by the task store for the raw tag string.
    pub const DELIMITER: char = ',';

    /// Parses a delimited tag string.
    ///
    /// Tokens are trimmed, empty tokens are dropped and duplicates keep their
    /// first position.
    ///
    /// ```
    /// use taskboard::board::domain::Tags;
    ///
    /// let tags = Tags::parse(" design,frontend , ,design");
    /// assert_eq!(tags.as_slice(), ["design", "frontend"]);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for token in raw.split(Self::DELIMITER).map(str::trim) {
            if token.is_empty() || tokens.iter().any(|existing| existing == token) {
                continue;
            }
            tokens.push(token.to_owned());
        }
        Self(tokens)
    }

    /// Returns the tags in display order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over the tags in display order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no tags are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
