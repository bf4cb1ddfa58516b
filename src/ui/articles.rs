//! Hero block and article card grid.

use crate::app::App;
use crate::feed::Article;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Card height in rows, borders included.
const CARD_HEIGHT: u16 = 7;
/// Hero height in rows, borders included.
const HERO_HEIGHT: u16 = 9;
/// Narrowest card before the grid drops a column.
const MIN_CARD_WIDTH: u16 = 36;
const MAX_COLUMNS: u16 = 3;

const URGENT_BADGE: &str = " URGENTE ";

/// Number of grid columns for a content area `width` columns wide.
fn columns_for(width: u16) -> usize {
    (width / MIN_CARD_WIDTH).clamp(1, MAX_COLUMNS) as usize
}

/// Which part of the content is on screen.
#[derive(Debug, PartialEq, Eq)]
struct Viewport {
    show_hero: bool,
    /// First grid row drawn.
    first_row: usize,
}

/// Scroll so the selected item stays visible.
///
/// `selected_grid` is the selected card's index in the grid, or `None` when
/// the hero is selected.
fn viewport(
    has_hero: bool,
    selected_grid: Option<usize>,
    columns: usize,
    height: u16,
) -> Viewport {
    let Some(index) = selected_grid else {
        return Viewport {
            show_hero: has_hero,
            first_row: 0,
        };
    };
    let row = index / columns.max(1);

    if has_hero {
        let rows_below_hero = (height.saturating_sub(HERO_HEIGHT) / CARD_HEIGHT) as usize;
        if row < rows_below_hero {
            return Viewport {
                show_hero: true,
                first_row: 0,
            };
        }
    }

    let rows_fit = ((height / CARD_HEIGHT) as usize).max(1);
    Viewport {
        show_hero: false,
        first_row: (row + 1).saturating_sub(rows_fit),
    }
}

/// Badge line: category, and the urgency badge for high-urgency articles.
fn badge_line<'a>(article: &'a Article, app: &App) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!("[{}]", article.category),
        app.style("badge_category"),
    )];
    if article.is_urgent() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(URGENT_BADGE, app.style("badge_urgent")));
    }
    Line::from(spans)
}

/// Footer line: "source • read time" on the left, date on the right.
fn meta_line(article: &Article, width: usize, style: Style) -> Line<'static> {
    let left = format!("{} • {}", article.source, article.read_time);
    let right = article.date_label.as_str();
    let right_width = display_width(right);

    let left_max = width.saturating_sub(right_width + 1);
    let left = truncate_to_width(&left, left_max).into_owned();
    let gap = width
        .saturating_sub(display_width(&left) + right_width)
        .max(1);

    Line::from(vec![
        Span::styled(left, style),
        Span::raw(" ".repeat(gap)),
        Span::styled(right.to_string(), style),
    ])
}

/// Lines of one card's body, sized to `width` inner columns.
///
/// Title gets one line (truncated), the summary fills what is left above the
/// footer.
fn card_lines<'a>(article: &'a Article, width: usize, app: &App, title_style: Style) -> Vec<Line<'a>> {
    vec![
        badge_line(article, app),
        Line::from(Span::styled(
            truncate_to_width(&article.title, width).into_owned(),
            title_style,
        )),
        Line::from(Span::styled(
            article.summary.as_str(),
            app.style("card_summary"),
        )),
    ]
}

fn render_card(f: &mut Frame, app: &App, article: &Article, area: Rect, selected: bool) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let border_style = if selected {
        app.style("card_selected")
    } else {
        app.style("card_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    // Footer on the last inner row, body above it.
    let body = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let footer = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    let lines = card_lines(article, inner.width as usize, app, app.style("card_title"));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
    f.render_widget(
        Paragraph::new(meta_line(article, inner.width as usize, app.style("card_meta"))),
        footer,
    );
}

fn render_hero(f: &mut Frame, app: &App, hero: &Article, area: Rect, selected: bool) {
    let border_style = if selected {
        app.style("card_selected")
    } else {
        app.style("hero_border")
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Destaque ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let body = Rect {
        height: inner.height - 1,
        ..inner
    };
    let footer = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    let lines = card_lines(hero, inner.width as usize, app, app.style("hero_title"));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
    f.render_widget(
        Paragraph::new(meta_line(hero, inner.width as usize, app.style("card_meta"))),
        footer,
    );
}

/// Render the hero (when visible) and the card grid into `area`.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let hero = app.visible_hero();
    let grid = app.visible_articles();
    // Index 0 is the hero when one is visible.
    let selected_grid = if hero.is_some() {
        app.selected_card.checked_sub(1)
    } else {
        Some(app.selected_card)
    };

    let columns = columns_for(area.width);
    let view = viewport(hero.is_some(), selected_grid, columns, area.height);

    let mut remaining = area;
    if let (true, Some(hero)) = (view.show_hero, hero) {
        let height = HERO_HEIGHT.min(remaining.height);
        let hero_area = Rect { height, ..remaining };
        render_hero(f, app, hero, hero_area, selected_grid.is_none());
        remaining.y += height;
        remaining.height -= height;
    }

    let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
    for (row_index, row) in grid.chunks(columns).enumerate().skip(view.first_row) {
        if remaining.height < 3 {
            break;
        }
        let height = CARD_HEIGHT.min(remaining.height);
        let row_area = Rect { height, ..remaining };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints.clone())
            .split(row_area);

        for (col, article) in row.iter().enumerate() {
            let index = row_index * columns + col;
            render_card(f, app, article, cells[col], selected_grid == Some(index));
        }

        remaining.y += height;
        remaining.height -= height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedPayload, Urgency};
    use crate::ui::render::tests::{app, article, draw, loaded};

    #[test]
    fn test_columns_for_width() {
        assert_eq!(columns_for(40), 1);
        assert_eq!(columns_for(80), 2);
        assert_eq!(columns_for(120), 3);
        assert_eq!(columns_for(400), 3);
        assert_eq!(columns_for(10), 1);
    }

    #[test]
    fn test_viewport_hero_selected() {
        let v = viewport(true, None, 2, 30);
        assert_eq!(v, Viewport { show_hero: true, first_row: 0 });
    }

    #[test]
    fn test_viewport_keeps_hero_while_row_fits_below() {
        // 30 rows: hero 9, then 3 card rows of 7
        assert!(viewport(true, Some(5), 2, 30).show_hero);
        let v = viewport(true, Some(6), 2, 30);
        assert_eq!(v, Viewport { show_hero: false, first_row: 0 });
    }

    #[test]
    fn test_viewport_scrolls_grid() {
        // 21 rows fit 3 card rows; row 5 must be last
        let v = viewport(false, Some(10), 2, 21);
        assert_eq!(v, Viewport { show_hero: false, first_row: 3 });
        assert_eq!(viewport(false, Some(1), 2, 21).first_row, 0);
    }

    #[test]
    fn test_meta_line_fits_width() {
        let a = article("1", "T", "Clima");
        let line = meta_line(&a, 30, Style::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("AGRO-RADAR • 3 min"));
        assert!(display_width(&text) <= 30);
    }

    #[tokio::test]
    async fn test_urgent_badge_rendered() {
        let mut app = app();
        let mut urgent = article("1", "Geada forte", "Clima");
        urgent.urgency = Some(Urgency::High);
        loaded(
            &mut app,
            Ok(FeedPayload {
                hero: None,
                latest: vec![urgent, article("2", "Soja sobe", "Mercado")],
            }),
        )
        .await;
        let rows = draw(&app, 100, 30);
        assert_eq!(rows.iter().filter(|r| r.contains("URGENTE")).count(), 1);
        assert!(rows.iter().any(|r| r.contains("Soja sobe")));
    }

    #[tokio::test]
    async fn test_selection_scrolls_into_view() {
        let mut app = app();
        let latest = (0..12)
            .map(|i| article(&i.to_string(), &format!("Noticia {:02}", i), "Clima"))
            .collect();
        loaded(&mut app, Ok(FeedPayload { hero: None, latest })).await;
        for _ in 0..11 {
            app.nav_down();
        }
        let rows = draw(&app, 70, 24);
        assert!(rows.iter().any(|r| r.contains("Noticia 11")));
        assert!(!rows.iter().any(|r| r.contains("Noticia 00")));
    }
}
