use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A named feed of candidate targets.
///
/// Written as `@account` (or a bare `account`) for an account's follower
/// list, `#tag` / `#tag:recent` for a hashtag's recent posts and `#tag:top`
/// for its top posts. The written form doubles as the counter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Source {
    Followers(String),
    HashtagRecent(String),
    HashtagTop(String),
}

impl Source {
    pub fn followers(account: impl Into<String>) -> Self {
        Source::Followers(account.into())
    }

    pub fn hashtag(tag: impl Into<String>) -> Self {
        Source::HashtagRecent(tag.into())
    }

    /// Account or hashtag name without any prefix.
    pub fn name(&self) -> &str {
        match self {
            Source::Followers(n) | Source::HashtagRecent(n) | Source::HashtagTop(n) => n,
        }
    }

    pub fn is_hashtag(&self) -> bool {
        !matches!(self, Source::Followers(_))
    }

    /// Key under which per-source counters are tracked.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(tag) = raw.strip_prefix('#') {
            let (name, tab) = match tag.split_once(':') {
                Some((name, tab)) => (name, Some(tab)),
                None => (tag, None),
            };
            if name.is_empty() {
                return Err(ConfigError::Source(raw.to_string()));
            }
            return match tab {
                None | Some("recent") => Ok(Source::HashtagRecent(name.to_string())),
                Some("top") => Ok(Source::HashtagTop(name.to_string())),
                Some(_) => Err(ConfigError::Source(raw.to_string())),
            };
        }
        let account = raw.strip_prefix('@').unwrap_or(raw);
        if account.is_empty() || account.contains(char::is_whitespace) {
            return Err(ConfigError::Source(raw.to_string()));
        }
        Ok(Source::Followers(account.to_string()))
    }
}

impl TryFrom<String> for Source {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Source> for String {
    fn from(s: Source) -> Self {
        s.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Followers(n) => write!(f, "@{n}"),
            Source::HashtagRecent(n) => write!(f, "#{n}"),
            Source::HashtagTop(n) => write!(f, "#{n}:top"),
        }
    }
}
