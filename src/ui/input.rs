//! Keyboard input handling.
//!
//! Keys are resolved through the `KeybindingRegistry`; digits `1`-`9` select
//! a category by its position in the filter bar.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use super::helpers::open_selected_article;
use super::Action;

/// Main input dispatch function.
///
/// The help overlay captures all keys while visible.
pub(super) fn handle_input(
    app: &mut App,
    key: KeyEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return Action::Continue;
    }

    if app.show_help {
        return handle_help_input(app, key);
    }

    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if key.modifiers.is_empty() {
            let index = c as usize - '0' as usize;
            if !app.select_category_index(index) {
                tracing::debug!(index, "No category at position");
            }
            return Action::Continue;
        }
    }

    match app
        .keybindings
        .action_for_key(key.code, key.modifiers, KbContext::Global)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NextCategory) => app.next_category(),
        Some(KbAction::PrevCategory) => app.prev_category(),
        Some(KbAction::AllCategories) => {
            app.select_category_index(0);
        }
        Some(KbAction::Reload) => {
            tracing::info!("Reload requested");
            app.activate(event_tx);
        }
        Some(KbAction::OpenInBrowser) => open_selected_article(app),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Tema: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::Back) => app.status_message = None,
        Some(KbAction::ScrollDown) | Some(KbAction::ScrollUp) | None => {}
    }

    Action::Continue
}

/// Handle input while the help overlay is visible.
fn handle_help_input(app: &mut App, key: KeyEvent) -> Action {
    match app
        .keybindings
        .action_for_key(key.code, key.modifiers, KbContext::Help)
    {
        Some(KbAction::Back) | Some(KbAction::ShowHelp) => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ScrollDown) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        Some(KbAction::ScrollUp) => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        Some(KbAction::Quit) => return Action::Quit,
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LoadState;
    use crate::feed::{Endpoint, FeedClient, FeedPayload};
    use crate::filter::{CategoryMode, ALL_CATEGORIES};
    use crossterm::event::KeyModifiers;
    use std::time::Duration;

    fn app(mode: CategoryMode) -> App {
        let client = FeedClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            Endpoint::default(),
            Duration::from_millis(50),
        )
        .unwrap();
        App::new(client, mode)
    }

    fn press(app: &mut App, tx: &mpsc::Sender<AppEvent>, code: KeyCode) -> Action {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE), tx)
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = app(CategoryMode::Derived);
        let (tx, _rx) = mpsc::channel(4);
        assert!(matches!(press(&mut app, &tx, KeyCode::Char('q')), Action::Quit));
    }

    #[tokio::test]
    async fn test_digit_selects_fixed_category() {
        let mut app = app(CategoryMode::default_fixed());
        let (tx, _rx) = mpsc::channel(4);

        press(&mut app, &tx, KeyCode::Char('2'));
        assert_eq!(app.selected_category, "Pecuária");
        press(&mut app, &tx, KeyCode::Char('9'));
        assert_eq!(app.selected_category, "Pecuária");
        press(&mut app, &tx, KeyCode::Char('0'));
        assert_eq!(app.selected_category, ALL_CATEGORIES);
    }

    #[tokio::test]
    async fn test_category_keys_never_enter_loading() {
        let mut app = app(CategoryMode::default_fixed());
        let (tx, _rx) = mpsc::channel(4);
        let generation = app.activate(&tx);
        app.apply_feed_result(generation, Ok(FeedPayload::default()));
        assert_eq!(app.load_state, LoadState::Loaded);

        press(&mut app, &tx, KeyCode::Char('l'));
        press(&mut app, &tx, KeyCode::Char('l'));
        press(&mut app, &tx, KeyCode::Char('h'));
        assert_eq!(app.selected_category, "Grãos");
        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(app.generation(), generation);
    }

    #[tokio::test]
    async fn test_reload_starts_new_activation() {
        let mut app = app(CategoryMode::Derived);
        let (tx, _rx) = mpsc::channel(4);
        let first = app.activate(&tx);
        app.apply_feed_result(first, Ok(FeedPayload::default()));

        press(&mut app, &tx, KeyCode::Char('r'));
        assert_eq!(app.load_state, LoadState::Loading);
        assert!(app.generation() > first);
        assert!(app.is_fetching());
        app.deactivate();
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let mut app = app(CategoryMode::default_fixed());
        let (tx, _rx) = mpsc::channel(4);

        press(&mut app, &tx, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, &tx, KeyCode::Char('j'));
        assert_eq!(app.help_scroll_offset, 1);
        press(&mut app, &tx, KeyCode::Char('l'));
        assert_eq!(app.selected_category, ALL_CATEGORIES);
        press(&mut app, &tx, KeyCode::Esc);
        assert!(!app.show_help);
        assert_eq!(app.help_scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_theme_cycle_sets_status() {
        let mut app = app(CategoryMode::Derived);
        let (tx, _rx) = mpsc::channel(4);
        press(&mut app, &tx, KeyCode::Char('t'));
        assert_eq!(app.status_message.as_ref().unwrap().0, "Tema: Light");
    }
}
