use crate::feed::{Article, FeedClient, FeedError, FeedPayload};
use crate::filter::{self, CategoryMode, ALL_CATEGORIES};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use futures::FutureExt;
use ratatui::style::Style;
use std::borrow::Cow;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Message shown when the load task dies without returning a result.
const ERR_TASK_PANICKED: &str = "Erro inesperado ao carregar artigos.";

// ============================================================================
// Load and View State
// ============================================================================

/// Outcome of the current activation's request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Request in flight (initial state of every activation).
    Loading,
    /// Request failed; `message` is the user-facing text. Terminal until the
    /// next activation.
    Failed { message: String },
    /// Articles received and normalized.
    Loaded,
}

/// What the content area shows, derived from [`LoadState`] and the current
/// filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPhase {
    Loading,
    Error,
    LoadedEmpty,
    LoadedNonEmpty,
}

// ============================================================================
// Background Events
// ============================================================================

/// Events sent from background tasks to the UI loop.
pub enum AppEvent {
    /// The feed request for activation `generation` finished.
    FeedLoaded {
        generation: u64,
        result: Result<FeedPayload, FeedError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked
    /// - `generation`: Activation the task belonged to
    /// - `error`: The panic message extracted from the payload
    TaskPanicked {
        task: &'static str,
        generation: u64,
        error: String,
    },
}

/// The in-flight request of the current activation.
///
/// Dropping it aborts the task, so replacing or clearing
/// `App::active_load` is enough to cancel.
struct ActiveLoad {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Drop for ActiveLoad {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!(generation = self.generation, "Aborting in-flight feed request");
        }
        self.handle.abort();
    }
}

/// Wraps a future to catch panics and convert them to errors.
///
/// A panicking task would otherwise vanish silently inside the runtime and
/// leave the view stuck in `Loading`.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

// ============================================================================
// Application State
// ============================================================================

/// State of one feed view instance.
///
/// Primary state is the loaded payload, the load state and the selected
/// category. Category options and the visible subset are recomputed from
/// those on every read.
pub struct App {
    client: FeedClient,
    pub category_mode: CategoryMode,

    // Feed state (replaced wholesale on every load)
    feed: Arc<FeedPayload>,
    pub load_state: LoadState,
    pub selected_category: String,
    /// Index into `visible_items()`.
    pub selected_card: usize,

    // Activation tracking
    load_generation: u64,
    active_load: Option<ActiveLoad>,

    // Presentation
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(client: FeedClient, category_mode: CategoryMode) -> Self {
        Self {
            client,
            category_mode,
            feed: Arc::new(FeedPayload::default()),
            load_state: LoadState::Loading,
            selected_category: ALL_CATEGORIES.to_string(),
            selected_card: 0,
            load_generation: 0,
            active_load: None,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
        }
    }

    pub fn client(&self) -> &FeedClient {
        &self.client
    }

    // ------------------------------------------------------------------------
    // Activation lifecycle
    // ------------------------------------------------------------------------

    /// Start a fresh activation: cancel any in-flight request, clear the
    /// loaded articles, enter `Loading` and spawn exactly one new request.
    ///
    /// The selected category is kept so it can be reconciled against the new
    /// data. Returns the new generation.
    pub fn activate(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> u64 {
        // Drop aborts the previous task before the new one exists.
        self.active_load = None;

        self.load_generation = self.load_generation.wrapping_add(1);
        let generation = self.load_generation;

        self.feed = Arc::new(FeedPayload::default());
        self.load_state = LoadState::Loading;
        self.selected_card = 0;
        self.spinner_frame = 0;
        self.needs_redraw = true;

        let client = self.client.clone();
        let tx = event_tx.clone();
        tracing::debug!(generation, url = %client.url(), "Spawning feed load");

        let handle = tokio::spawn(async move {
            let event = match catch_task_panic(client.fetch()).await {
                Ok(result) => AppEvent::FeedLoaded { generation, result },
                Err(error) => {
                    tracing::error!(error = %error, "Feed load task panicked");
                    AppEvent::TaskPanicked {
                        task: "feed_load",
                        generation,
                        error,
                    }
                }
            };
            if let Err(e) = tx.send(event).await {
                tracing::debug!(error = %e, "Feed result dropped (receiver closed)");
            }
        });

        self.active_load = Some(ActiveLoad { generation, handle });
        generation
    }

    /// Tear down the activation: abort the in-flight request and invalidate
    /// its generation so a result already queued is ignored.
    pub fn deactivate(&mut self) {
        if self.active_load.take().is_some() {
            tracing::debug!(generation = self.load_generation, "Feed view deactivated");
        }
        self.load_generation = self.load_generation.wrapping_add(1);
    }

    /// Whether a request is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.active_load.is_some()
    }

    /// Generation of the most recent activation.
    pub fn generation(&self) -> u64 {
        self.load_generation
    }

    /// Whether a result tagged `generation` may still touch state.
    fn accepts(&self, generation: u64) -> bool {
        self.active_load
            .as_ref()
            .is_some_and(|load| load.generation == generation)
            && generation == self.load_generation
    }

    /// Apply a finished request. Results from a superseded or torn-down
    /// activation are dropped without touching state.
    ///
    /// Returns `true` when state changed.
    pub fn apply_feed_result(
        &mut self,
        generation: u64,
        result: Result<FeedPayload, FeedError>,
    ) -> bool {
        if !self.accepts(generation) {
            tracing::debug!(
                expected = self.load_generation,
                got = generation,
                "Ignoring stale feed result (generation mismatch)"
            );
            return false;
        }
        self.active_load = None;

        match result {
            Ok(payload) => {
                tracing::info!(generation, articles = payload.len(), "Feed applied");
                self.feed = Arc::new(payload);
                self.load_state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Feed load failed");
                self.feed = Arc::new(FeedPayload::default());
                self.load_state = LoadState::Failed {
                    message: e.user_message().to_string(),
                };
            }
        }

        self.settle_category();
        self.clamp_selection();
        self.needs_redraw = true;
        true
    }

    /// Derived options follow the loaded set, so every finished load
    /// (success or failure) re-checks the selection against them.
    fn settle_category(&mut self) {
        if self.category_mode.is_derived() {
            self.reconcile_category();
        }
    }

    /// Apply a panic report from the load task; stale reports are ignored.
    pub fn apply_task_panic(&mut self, generation: u64, task: &str, error: &str) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        tracing::error!(task, error, "Background task panicked");
        self.active_load = None;
        self.feed = Arc::new(FeedPayload::default());
        self.load_state = LoadState::Failed {
            message: ERR_TASK_PANICKED.to_string(),
        };
        self.settle_category();
        self.selected_card = 0;
        self.needs_redraw = true;
        true
    }

    // ------------------------------------------------------------------------
    // Derived state
    // ------------------------------------------------------------------------

    pub fn hero(&self) -> Option<&Article> {
        self.feed.hero.as_ref()
    }

    /// All loaded grid articles, unfiltered, in display order.
    pub fn articles(&self) -> &[Article] {
        &self.feed.latest
    }

    /// Category options for the filter bar.
    pub fn categories(&self) -> Vec<String> {
        self.category_mode
            .options(self.feed.hero.iter().chain(self.feed.latest.iter()))
    }

    /// Grid articles passing the current filter.
    pub fn visible_articles(&self) -> Vec<&Article> {
        filter::project(&self.feed.latest, &self.selected_category)
    }

    /// The hero, if any and if it passes the current filter.
    pub fn visible_hero(&self) -> Option<&Article> {
        self.feed
            .hero
            .as_ref()
            .filter(|h| filter::matches(h, &self.selected_category))
    }

    /// Selectable items in display order: visible hero first, then the grid.
    pub fn visible_items(&self) -> Vec<&Article> {
        self.visible_hero()
            .into_iter()
            .chain(self.visible_articles())
            .collect()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_items().get(self.selected_card).copied()
    }

    pub fn phase(&self) -> ViewPhase {
        match self.load_state {
            LoadState::Loading => ViewPhase::Loading,
            LoadState::Failed { .. } => ViewPhase::Error,
            LoadState::Loaded => {
                if self.visible_hero().is_none() && self.visible_articles().is_empty() {
                    ViewPhase::LoadedEmpty
                } else {
                    ViewPhase::LoadedNonEmpty
                }
            }
        }
    }

    /// User-facing error text, when in the error state.
    pub fn error_message(&self) -> Option<&str> {
        match &self.load_state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Section heading above the grid.
    pub fn section_title(&self) -> Cow<'static, str> {
        if self.selected_category == ALL_CATEGORIES {
            Cow::Borrowed("Todas as notícias")
        } else {
            Cow::Owned(format!("Notícias - {}", self.selected_category))
        }
    }

    // ------------------------------------------------------------------------
    // Category selection
    // ------------------------------------------------------------------------

    /// Reset the selection to "all" if it is not among the current options.
    pub fn reconcile_category(&mut self) -> bool {
        let options = self.categories();
        let reset = filter::reconcile_selection(&mut self.selected_category, &options);
        if reset {
            tracing::debug!("Selected category no longer present, reset to all");
            self.selected_card = 0;
        }
        reset
    }

    /// Select `category` if it is one of the current options.
    pub fn select_category(&mut self, category: &str) -> bool {
        if !self.categories().iter().any(|c| c == category) {
            return false;
        }
        if self.selected_category != category {
            self.selected_category = category.to_string();
            self.selected_card = 0;
        }
        true
    }

    /// Select the option at `index` in the filter bar (0 is "all").
    pub fn select_category_index(&mut self, index: usize) -> bool {
        match self.categories().get(index) {
            Some(c) => {
                let c = c.clone();
                self.select_category(&c)
            }
            None => false,
        }
    }

    pub fn next_category(&mut self) {
        if let Some(next) = filter::next_option(&self.categories(), &self.selected_category) {
            self.select_category(&next);
        }
    }

    pub fn prev_category(&mut self) {
        if let Some(prev) = filter::prev_option(&self.categories(), &self.selected_category) {
            self.select_category(&prev);
        }
    }

    // ------------------------------------------------------------------------
    // Card navigation
    // ------------------------------------------------------------------------

    pub fn nav_down(&mut self) {
        let len = self.visible_items().len();
        if len > 0 && self.selected_card + 1 < len {
            self.selected_card += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    /// Keep `selected_card` within the visible items.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        self.selected_card = self.selected_card.min(len.saturating_sub(1));
    }

    // ------------------------------------------------------------------------
    // Presentation helpers
    // ------------------------------------------------------------------------

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Switch to the next theme variant and return its name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once it is older than 3 seconds.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
