//! Render functions for the TUI.
//!
//! Layout, top to bottom: header banner, category bar, section title, content
//! (loading / error / empty message, or hero + card grid), status bar.

use crate::app::{App, ViewPhase};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    style::Style,
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::helpers::SPINNER;
use super::{articles, categories, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 16;

pub(super) const HEADER_TITLE: &str = "AGRO-RADAR 360";
pub(super) const HEADER_SUBTITLE: &str = "Notícias e análises do agronegócio em tempo real";
pub(super) const LOADING_TEXT: &str = "Carregando artigos...";
pub(super) const EMPTY_TEXT: &str = "Nenhum artigo disponível no momento.";

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Tela pequena")
        } else {
            Paragraph::new(format!(
                "Terminal muito pequeno\n\nMínimo: {}x{}\nAtual: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    categories::render(f, app, chunks[1]);
    render_section_title(f, app, chunks[2]);
    render_content(f, app, chunks[3]);
    status::render(f, app, chunks[4]);

    if app.show_help {
        help::render(f, app);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!(" 🌾 {}", HEADER_TITLE),
            app.style("header"),
        )),
        Line::from(Span::styled(
            format!(" {}", HEADER_SUBTITLE),
            app.style("header_subtitle"),
        )),
    ];
    let paragraph = Paragraph::new(lines).style(app.style("header_subtitle"));
    f.render_widget(paragraph, area);
}

fn render_section_title(f: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", app.section_title()),
        app.style("section_title"),
    )));
    f.render_widget(title, area);
}

fn render_content(f: &mut Frame, app: &App, area: Rect) {
    match app.phase() {
        ViewPhase::Loading => {
            let text = format!("{} {}", SPINNER[app.spinner_frame % SPINNER.len()], LOADING_TEXT);
            render_message(f, area, text, app.style("state_loading"));
        }
        ViewPhase::Error => {
            let text = app.error_message().unwrap_or_default().to_string();
            render_message(f, area, text, app.style("state_error"));
        }
        ViewPhase::LoadedEmpty => {
            render_message(f, area, EMPTY_TEXT.to_string(), app.style("state_empty"));
        }
        ViewPhase::LoadedNonEmpty => articles::render(f, app, area),
    }
}

/// A single centered message, a few lines below the top of `area`.
fn render_message(f: &mut Frame, area: Rect, text: String, style: Style) {
    let top = area.height.min(2);
    let target = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, target);
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::app::App;
    use crate::feed::{
        normalize_article, Endpoint, FeedClient, FeedError, FeedPayload, Position, RawArticle,
        HERO_BUDGET, SUMMARY_BUDGET,
    };
    use crate::filter::CategoryMode;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;

    pub(in crate::ui) fn app() -> App {
        let client = FeedClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            Endpoint::default(),
            Duration::from_millis(50),
        )
        .unwrap();
        App::new(client, CategoryMode::Derived)
    }

    pub(in crate::ui) fn article(id: &str, title: &str, category: &str) -> crate::feed::Article {
        normalize_article(
            RawArticle {
                id: Some(serde_json::Value::String(id.to_string())),
                title: Some(title.to_string()),
                category: Some(category.to_string()),
                ..Default::default()
            },
            0,
            SUMMARY_BUDGET,
        )
    }

    /// Render one frame and return its text, one `String` per row.
    pub(in crate::ui) fn draw(app: &App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    /// Activate (against an unreachable port) and apply `result` directly.
    pub(in crate::ui) async fn loaded(
        app: &mut App,
        result: Result<FeedPayload, FeedError>,
    ) {
        let (tx, _rx) = mpsc::channel(4);
        let generation = app.activate(&tx);
        app.apply_feed_result(generation, result);
    }

    #[tokio::test]
    async fn test_loading_screen() {
        let app = app();
        let rows = draw(&app, 80, 24);
        assert!(screen_contains(&rows, HEADER_TITLE));
        assert!(screen_contains(&rows, LOADING_TEXT));
        assert!(screen_contains(&rows, "Todas as notícias"));
    }

    #[tokio::test]
    async fn test_error_screen_shows_message() {
        let mut app = app();
        loaded(&mut app, Err(FeedError::HttpStatus(500))).await;
        let rows = draw(&app, 80, 24);
        assert!(screen_contains(&rows, "Erro ao carregar artigos."));
        assert!(!screen_contains(&rows, LOADING_TEXT));
    }

    #[tokio::test]
    async fn test_empty_screen() {
        let mut app = app();
        loaded(&mut app, Ok(FeedPayload::default())).await;
        let rows = draw(&app, 80, 24);
        assert!(screen_contains(&rows, EMPTY_TEXT));
    }

    #[tokio::test]
    async fn test_loaded_screen_shows_cards_and_hero() {
        let mut app = app();
        let hero = normalize_article(
            RawArticle {
                id: Some(serde_json::Value::String("h".to_string())),
                title: Some("Safra recorde".to_string()),
                category: Some("Grãos".to_string()),
                position: Some("hero".to_string()),
                ..Default::default()
            },
            0,
            HERO_BUDGET,
        );
        assert_eq!(hero.position, Position::Hero);
        loaded(
            &mut app,
            Ok(FeedPayload {
                hero: Some(hero),
                latest: vec![article("1", "Chuva no Sul", "Clima")],
            }),
        )
        .await;

        let rows = draw(&app, 100, 30);
        assert!(screen_contains(&rows, "Safra recorde"));
        assert!(screen_contains(&rows, "Chuva no Sul"));
        assert!(screen_contains(&rows, "Clima"));
        assert!(!screen_contains(&rows, EMPTY_TEXT));
    }

    #[tokio::test]
    async fn test_too_small_terminal() {
        let app = app();
        let rows = draw(&app, 40, 10);
        assert!(screen_contains(&rows, "Terminal muito pequeno"));
    }
}
