//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, user overrides included.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::helpers::centered_rect;

/// Context display order and labels for the help screen.
const CONTEXT_ORDER: [(Context, &str); 2] = [(Context::Global, "Geral"), (Context::Help, "Ajuda")];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let bindings = app.keybindings.help_rows();
    let mut rows: Vec<Row> = Vec::new();

    for (ctx, label) in &CONTEXT_ORDER {
        let ctx_rows: Vec<_> = bindings.iter().filter(|(c, _, _)| c == ctx).collect();
        if ctx_rows.is_empty() {
            continue;
        }

        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", label),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("help_heading")),
        );

        if *ctx == Context::Global {
            rows.push(Row::new(vec![
                Line::from(Span::styled("  1-9", app.style("help_key"))),
                Line::from("Categoria pela posição"),
            ]));
        }

        for (_, keys, description) in ctx_rows {
            rows.push(Row::new(vec![
                Line::from(Span::styled(format!("  {}", keys), app.style("help_key"))),
                Line::from(*description),
            ]));
        }

        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // borders + header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Ajuda ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Ajuda (? para fechar) ".to_string()
    };

    let widths = [Constraint::Length(18), Constraint::Min(20)];
    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("card_selected"))
                .title(title),
        )
        .header(
            Row::new(vec!["Tecla", "Ação"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k rolar, ? ou Esc fecha ",
            app.style("card_meta"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use crate::ui::render::tests::{app, draw};

    #[test]
    fn test_help_overlay_lists_bindings() {
        let mut app = app();
        app.show_help = true;
        let rows = draw(&app, 100, 40);
        assert!(rows.iter().any(|r| r.contains("Recarregar artigos")));
        assert!(rows.iter().any(|r| r.contains("Categoria pela posição")));
    }
}
