//! GitHub profile lookup: HTTP client, lookup controller, presentation mapping and
//! the light/dark theme preference behind the `devfinder` window.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod theme;
pub mod view;

pub use client::{GitHubClient, ProfileSource};
pub use config::Config;
pub use controller::{LookupController, LookupState, Phase, StalePolicy};
pub use error::{ErrorKind, LookupError};
pub use models::Profile;
pub use theme::{Palette, Rgb, ThemeMode, ThemeProvider};
pub use view::{AvatarSource, LinkKind, LinkRow, LookupView, ProfileView, RenderCache};
