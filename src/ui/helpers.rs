//! Helpers shared by input handling and rendering.

use crate::app::App;
use crate::util::validate_url_for_open;
use ratatui::layout::Rect;

pub(super) const ERR_ARTICLE_NO_URL: &str = "Este artigo não tem link.";

/// Braille spinner frames, one per tick.
pub(super) const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Open the selected article's link in the system browser.
///
/// The URL is validated first: only `http`/`https` links to public hosts are
/// handed to the OS.
pub(super) fn open_selected_article(app: &mut App) {
    let url = match app.selected_article().map(|a| a.url.clone()) {
        None => return,
        Some(None) => {
            app.set_status(ERR_ARTICLE_NO_URL);
            return;
        }
        Some(Some(url)) => url,
    };

    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e),
        Ok(valid) => match open::that(valid.as_str()) {
            Ok(()) => {
                tracing::info!(url = %valid, "Opened article in browser");
                app.set_status("Abrindo no navegador...");
            }
            Err(e) => {
                tracing::warn!(url = %valid, error = %e, "Failed to open browser");
                app.set_status(format!("Falha ao abrir o navegador: {}", e));
            }
        },
    }
}

/// A rectangle of `percent_x` × `percent_y` centered in `area`.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
