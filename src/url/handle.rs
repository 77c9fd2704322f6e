use std::fmt;
use url::Url;

/// A discovered member handle
///
/// Handles are case-sensitive, never empty, and never contain a `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Builds a handle from a raw identifier
    ///
    /// Leading and trailing `/` are stripped. Returns `None` when nothing is
    /// left, or when the remainder still contains a path separator,
    /// whitespace or a control character.
    ///
    /// # Examples
    ///
    /// ```
    /// use letterboxd_harvest::url::Handle;
    ///
    /// assert_eq!(Handle::new("/alice/").unwrap().as_str(), "alice");
    /// assert!(Handle::new("//").is_none());
    /// assert!(Handle::new("/alice/films/").is_none());
    /// ```
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('/');

        if trimmed.is_empty()
            || trimmed.contains('/')
            || trimmed.chars().any(|c| c.is_whitespace() || c.is_control())
        {
            return None;
        }

        Some(Self(trimmed.to_string()))
    }

    /// Normalizes a link target into a handle
    ///
    /// Absolute links are reduced to their path first, so
    /// `https://letterboxd.com/alice/` and `/alice/` yield the same handle.
    /// Query strings and fragments are ignored.
    pub fn from_href(href: &str) -> Option<Self> {
        let href = href.trim();

        if let Ok(absolute) = Url::parse(href) {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return None;
            }
            return Self::new(absolute.path());
        }

        let path = href.split(['?', '#']).next().unwrap_or_default();
        Self::new(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_separators() {
        assert_eq!(Handle::from_href("/bob/").unwrap().as_str(), "bob");
        assert_eq!(Handle::from_href("bob").unwrap().as_str(), "bob");
        assert_eq!(Handle::from_href("  /bob  ").unwrap().as_str(), "bob");
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(Handle::from_href("/BoB/").unwrap().as_str(), "BoB");
        assert_ne!(Handle::from_href("/BoB/"), Handle::from_href("/bob/"));
    }

    #[test]
    fn test_absolute_link() {
        let handle = Handle::from_href("https://letterboxd.com/carol/").unwrap();
        assert_eq!(handle.as_str(), "carol");
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(Handle::from_href("/dave/?ref=x").unwrap().as_str(), "dave");
        assert_eq!(Handle::from_href("/dave/#top").unwrap().as_str(), "dave");
    }

    #[test]
    fn test_rejects_unusable_targets() {
        assert!(Handle::from_href("").is_none());
        assert!(Handle::from_href("/").is_none());
        assert!(Handle::from_href("/erin/films/").is_none());
        assert!(Handle::from_href("mailto:erin@example.com").is_none());
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert!(Handle::new("al ice").is_none());
        assert!(Handle::new("al\nice").is_none());
        assert!(Handle::from_href("/al%20ice/").is_some());
    }
}
