//! Maps lookup state onto what the window shows.

use chrono::DateTime;

use crate::{
    controller::LookupState,
    error::NOT_FOUND_MESSAGE,
    models::{present, Profile},
};

/// Bundled image used when a profile has no avatar.
pub const DEFAULT_AVATAR_PATH: &str = "images/avatar.png";
pub const NO_RESULT_LABEL: &str = "No result";
pub const NOT_AVAILABLE: &str = "Not Available";

/// Label shown next to the search box for a stored error.
pub fn error_label(error: &str) -> String {
    if error == NOT_FOUND_MESSAGE {
        NO_RESULT_LABEL.to_string()
    } else {
        error.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    Remote(String),
    Local(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Location,
    Website,
    Twitter,
    Company,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub kind: LinkKind,
    pub text: String,
    /// Set only for rows that open something when clicked.
    pub href: Option<String>,
    /// Rows without data render dimmed.
    pub available: bool,
}

impl LinkRow {
    fn missing(kind: LinkKind) -> Self {
        Self {
            kind,
            text: NOT_AVAILABLE.to_string(),
            href: None,
            available: false,
        }
    }

    fn plain(kind: LinkKind, value: Option<&str>) -> Self {
        match value {
            Some(text) => Self {
                kind,
                text: text.to_string(),
                href: None,
                available: true,
            },
            None => Self::missing(kind),
        }
    }

    fn linked(kind: LinkKind, value: Option<&str>, href: impl Fn(&str) -> String) -> Self {
        match value {
            Some(text) => Self {
                kind,
                text: text.to_string(),
                href: Some(href(text)),
                available: true,
            },
            None => Self::missing(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub login: String,
    pub avatar: AvatarSource,
    pub display_name: String,
    pub handle_label: String,
    pub joined: String,
    pub bio: String,
    pub repos: String,
    pub followers: String,
    pub following: String,
    pub links: Vec<LinkRow>,
}

impl ProfileView {
    pub fn from_profile(profile: &Profile) -> Self {
        let avatar = match present(&profile.avatar_url) {
            Some(url) => AvatarSource::Remote(url.to_string()),
            None => AvatarSource::Local(DEFAULT_AVATAR_PATH),
        };
        let company = present(&profile.company).map(company_label);

        Self {
            login: profile.login.clone(),
            avatar,
            display_name: present(&profile.name).unwrap_or("No Name").to_string(),
            handle_label: format!("@{}", profile.login),
            joined: joined_label(profile.created_at.as_deref()),
            bio: present(&profile.bio)
                .unwrap_or("No bio available.")
                .to_string(),
            repos: profile.public_repos.to_string(),
            followers: profile.followers.to_string(),
            following: profile.following.to_string(),
            links: vec![
                LinkRow::plain(LinkKind::Location, present(&profile.location)),
                LinkRow::linked(LinkKind::Website, present(&profile.blog), website_href),
                LinkRow::linked(LinkKind::Twitter, present(&profile.twitter_username), |handle| {
                    format!("https://twitter.com/{handle}")
                }),
                LinkRow::plain(LinkKind::Company, company.as_deref()),
            ],
        }
    }
}

/// Everything the window needs for one frame of lookup state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupView {
    pub error_label: Option<String>,
    pub panel: Option<ProfileView>,
    pub fetching: bool,
}

impl LookupView {
    pub fn render(state: &LookupState) -> Self {
        Self {
            error_label: state.error.as_deref().map(error_label),
            panel: state.profile.as_ref().map(ProfileView::from_profile),
            fetching: state.in_flight > 0,
        }
    }
}

/// Remembers the last view pushed to the window, so state changes that only touch
/// the query do not repaint the panel or refetch the avatar.
#[derive(Debug, Default)]
pub struct RenderCache {
    last: Option<LookupView>,
}

impl RenderCache {
    /// Renders `state`, returning the view only when it differs from the last one.
    pub fn refresh(&mut self, state: &LookupState) -> Option<LookupView> {
        let view = LookupView::render(state);
        if self.last.as_ref() == Some(&view) {
            return None;
        }
        self.last = Some(view.clone());
        Some(view)
    }
}

fn company_label(company: &str) -> String {
    if company.starts_with('@') {
        company.to_string()
    } else {
        format!("@{company}")
    }
}

fn joined_label(created_at: Option<&str>) -> String {
    created_at
        .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
        .map(|at| format!("Joined {}", at.format("%d %b %Y")))
        .unwrap_or_else(|| "Joined date unavailable".to_string())
}

fn website_href(blog: &str) -> String {
    if blog.starts_with("http://") || blog.starts_with("https://") {
        blog.to_string()
    } else {
        format!("https://{blog}")
    }
}
