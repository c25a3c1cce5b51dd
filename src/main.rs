#![windows_subsystem = "windows"]
slint::include_modules!();

use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use devfinder::{
    AvatarSource, Config, GitHubClient, LinkKind, LookupController, LookupView, Palette,
    RenderCache, Rgb, ThemeMode, ThemeProvider,
};
use slint::VecModel;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AVATAR_SIZE: u32 = 128;

fn main() -> anyhow::Result<()> {
    // Load .env variables
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    let client = GitHubClient::new(&config)?;
    let controller = Arc::new(LookupController::new(client.clone(), config.stale_policy));
    let theme = Arc::new(ThemeProvider::load(config.theme_store.clone()));

    // Background tokio runtime for async HTTP
    let rt = Arc::new(tokio::runtime::Runtime::new()?);

    let app = AppWindow::new()?;
    apply_theme(&app, theme.current());
    app.set_avatar(app.get_default_avatar());
    app.set_search_query(config.default_handle.as_str().into());
    controller.set_query(config.default_handle.as_str());

    // =============================================
    //  Lookup state -> window
    // =============================================
    {
        let mut states = controller.subscribe();
        let app_weak = app.as_weak();
        let client = client.clone();
        let mut rendered = RenderCache::default();

        rt.spawn(async move {
            while states.changed().await.is_ok() {
                // Keystrokes only change the query; nothing to repaint.
                let view = {
                    let state = states.borrow_and_update();
                    rendered.refresh(&state)
                };
                let Some(view) = view else {
                    continue;
                };
                let remote_avatar = view.panel.as_ref().and_then(|panel| match &panel.avatar {
                    AvatarSource::Remote(url) => Some((panel.login.clone(), url.clone())),
                    AvatarSource::Local(_) => None,
                });

                let app_weak_view = app_weak.clone();
                let _ = slint::invoke_from_event_loop(move || {
                    if let Some(app) = app_weak_view.upgrade() {
                        apply_lookup_view(&app, view);
                    }
                });

                let Some((login, url)) = remote_avatar else {
                    continue;
                };
                let client = client.clone();
                let app_weak_avatar = app_weak.clone();
                tokio::spawn(async move {
                    let Some((pixels, w, h)) = client.avatar_pixels(&url, AVATAR_SIZE).await else {
                        return;
                    };
                    let _ = slint::invoke_from_event_loop(move || {
                        let Some(app) = app_weak_avatar.upgrade() else { return };
                        // A newer lookup may have replaced the panel meanwhile.
                        if app.get_has_profile() && app.get_login() == login.as_str() {
                            let buf = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(
                                &pixels, w, h,
                            );
                            app.set_avatar(slint::Image::from_rgba8(buf));
                        }
                    });
                });
            }
        });
    }

    // =============================================
    //  Theme preference -> window
    // =============================================
    {
        let mut modes = theme.subscribe();
        let app_weak = app.as_weak();

        rt.spawn(async move {
            while modes.changed().await.is_ok() {
                let mode = *modes.borrow_and_update();
                let app_weak = app_weak.clone();
                let _ = slint::invoke_from_event_loop(move || {
                    if let Some(app) = app_weak.upgrade() {
                        apply_theme(&app, mode);
                    }
                });
            }
        });
    }

    // =============================================
    //  CALLBACK: search-requested
    // =============================================
    {
        let controller = controller.clone();
        let rt = rt.clone();

        app.on_search_requested(move |query| {
            let controller = controller.clone();
            let handle = query.to_string();
            controller.set_query(handle.as_str());
            rt.spawn(async move {
                controller.lookup(&handle).await;
            });
        });
    }

    // =============================================
    //  CALLBACK: query-edited
    // =============================================
    {
        let controller = controller.clone();
        app.on_query_edited(move |text| controller.set_query(text.as_str()));
    }

    // =============================================
    //  CALLBACK: theme-toggled
    // =============================================
    {
        let theme = theme.clone();
        app.on_theme_toggled(move || match theme.toggle() {
            Ok(mode) => info!(?mode, "theme switched"),
            Err(err) => warn!(error = %err, "theme preference not saved"),
        });
    }

    // =============================================
    //  CALLBACK: link-clicked
    // =============================================
    app.on_link_clicked(|url| {
        if let Err(err) = open::that(url.as_str()) {
            warn!(%url, error = %err, "failed to open link");
        }
    });

    // Initial lookup of the default handle
    app.invoke_search_requested(app.get_search_query());

    app.run()?;

    Ok(())
}

fn apply_lookup_view(app: &AppWindow, view: LookupView) {
    app.set_error_label(view.error_label.unwrap_or_default().into());
    app.set_is_fetching(view.fetching);

    let Some(panel) = view.panel else {
        app.set_has_profile(false);
        app.set_avatar(app.get_default_avatar());
        return;
    };

    let links: Vec<LinkItem> = panel
        .links
        .into_iter()
        .map(|row| LinkItem {
            kind: link_kind_label(row.kind).into(),
            text: row.text.into(),
            href: row.href.unwrap_or_default().into(),
            available: row.available,
        })
        .collect();

    // Remote avatars are swapped in once downloaded.
    app.set_avatar(app.get_default_avatar());
    app.set_login(panel.login.into());
    app.set_display_name(panel.display_name.into());
    app.set_handle_label(panel.handle_label.into());
    app.set_joined(panel.joined.into());
    app.set_bio(panel.bio.into());
    app.set_repos(panel.repos.into());
    app.set_followers(panel.followers.into());
    app.set_following(panel.following.into());
    app.set_links(Rc::new(VecModel::from(links)).into());
    app.set_has_profile(true);
}

fn apply_theme(app: &AppWindow, mode: ThemeMode) {
    app.set_dark_mode(mode.is_dark());
    app.set_colors(theme_colors(mode.palette()));
}

fn theme_colors(palette: Palette) -> ThemeColors {
    ThemeColors {
        background: color(palette.background),
        card: color(palette.card),
        stats_strip: color(palette.stats_strip),
        heading: color(palette.heading),
        body: color(palette.body),
        link: color(palette.link),
        accent: color(palette.accent),
        accent_hover: color(palette.accent_hover),
        error: color(palette.error),
    }
}

fn color(Rgb(r, g, b): Rgb) -> slint::Color {
    slint::Color::from_rgb_u8(r, g, b)
}

fn link_kind_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Location => "Location",
        LinkKind::Website => "Website",
        LinkKind::Twitter => "Twitter",
        LinkKind::Company => "Company",
    }
}
