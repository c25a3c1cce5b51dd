use serde::Deserialize;

/// A GitHub account as returned by the `/users/{handle}` API.
///
/// Only `login` is required. Everything else falls back to its absent value so a
/// sparse record still decodes; a record without `login`, or with counters that are
/// not non-negative integers, is rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// A record with only the handle set.
    pub fn with_login(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            avatar_url: None,
            name: None,
            company: None,
            blog: None,
            location: None,
            bio: None,
            twitter_username: None,
            public_repos: 0,
            followers: 0,
            following: 0,
            created_at: None,
        }
    }
}

/// Returns the field's text unless it is missing or blank.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}
