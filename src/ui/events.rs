//! Application event handling.
//!
//! Applies results from the background load task to the view state.

use crate::app::{App, AppEvent, ViewPhase};

/// Handle an event from a background task.
///
/// Stale events (from a superseded or torn-down activation) are dropped by
/// `App` without touching state; only applied events trigger a redraw.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    let applied = match event {
        AppEvent::FeedLoaded { generation, result } => app.apply_feed_result(generation, result),
        AppEvent::TaskPanicked {
            task,
            generation,
            error,
        } => app.apply_task_panic(generation, task, &error),
    };

    if !applied {
        return;
    }

    if app.phase() == ViewPhase::LoadedNonEmpty {
        let count = app.visible_items().len();
        app.set_status(format!("{} artigos carregados", count));
    }
    app.needs_redraw = true;
}
