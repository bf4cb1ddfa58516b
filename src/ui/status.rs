use crate::app::{App, LoadState};
use crate::keybindings::Action;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Key hints for the footer, built from the live bindings so overrides show.
fn hints(app: &App) -> String {
    let key = |action: Action| {
        app.keybindings
            .keys_for(action)
            .into_iter()
            .next()
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        " {}/{} categoria  1-9 escolher  {}/{} artigo  {} abrir  {} recarregar  {} tema  {} ajuda  {} sair",
        key(Action::PrevCategory),
        key(Action::NextCategory),
        key(Action::NavUp),
        key(Action::NavDown),
        key(Action::OpenInBrowser),
        key(Action::Reload),
        key(Action::CycleTheme),
        key(Action::ShowHelp),
        key(Action::Quit),
    )
}

/// Right-hand counter: "<visible>/<loaded>" once loaded.
fn counter(app: &App) -> Option<String> {
    if app.load_state != LoadState::Loaded {
        return None;
    }
    let loaded = app.articles().len() + usize::from(app.hero().is_some());
    Some(format!("{}/{} ", app.visible_items().len(), loaded))
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = match &app.status_message {
        Some((msg, _)) => (
            Cow::Owned(format!(" {}", msg)),
            app.style("status_message"),
        ),
        None => (Cow::Owned(hints(app)), app.style("status_bar")),
    };

    let mut spans = vec![Span::styled(text, style)];
    if let Some(count) = counter(app) {
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let pad = (area.width as usize).saturating_sub(used + count.len());
        spans.push(Span::styled(" ".repeat(pad), app.style("status_bar")));
        spans.push(Span::styled(count, app.style("status_bar")));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
