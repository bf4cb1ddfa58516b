use crate::app::App;
use crate::util::display_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;

const SEPARATOR: &str = " ";

/// Label for the option at `index`: its digit shortcut (0-9) and its name.
fn tab_label(index: usize, name: &str) -> String {
    if index <= 9 {
        format!(" {} {} ", index, name)
    } else {
        format!(" {} ", name)
    }
}

/// The contiguous range of tabs that fits in `avail` columns while keeping
/// `selected` visible. Scrolls as little as possible from the start.
fn visible_window(widths: &[usize], selected: usize, avail: usize) -> Range<usize> {
    if widths.is_empty() {
        return 0..0;
    }
    let selected = selected.min(widths.len() - 1);
    let sep = display_width(SEPARATOR);

    let mut start = 0;
    loop {
        let mut used = 0;
        let mut end = start;
        while end < widths.len() {
            let w = widths[end] + if end > start { sep } else { 0 };
            if used + w > avail && end > start {
                break;
            }
            used += w;
            end += 1;
        }
        if selected < end || start >= selected {
            return start..end.max(start + 1);
        }
        start += 1;
    }
}

/// Render the category filter bar.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let options = app.categories();
    let selected = options
        .iter()
        .position(|c| *c == app.selected_category)
        .unwrap_or(0);

    let labels: Vec<String> = options
        .iter()
        .enumerate()
        .map(|(i, name)| tab_label(i, name))
        .collect();
    let widths: Vec<usize> = labels.iter().map(|l| display_width(l)).collect();

    let inner_width = area.width.saturating_sub(2) as usize;
    let window = visible_window(&widths, selected, inner_width);

    let style_selected = app.style("category_selected");
    let style_normal = app.style("category_normal");

    let mut spans = Vec::with_capacity(window.len() * 2 + 2);
    if window.start > 0 {
        spans.push(Span::styled("‹", style_normal));
    }
    for i in window.clone() {
        if i > window.start {
            spans.push(Span::raw(SEPARATOR));
        }
        let style = if i == selected {
            style_selected
        } else {
            style_normal
        };
        spans.push(Span::styled(labels[i].as_str(), style));
    }
    if window.end < labels.len() {
        spans.push(Span::styled("›", style_normal));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("card_border"))
            .title(" Categorias "),
    );
    f.render_widget(bar, area);
}
