//! Plain-text rendering of the feed view, for `--print`.

use crate::app::{App, ViewPhase};
use crate::feed::Article;
use std::fmt::Write;

fn write_article(out: &mut String, article: &Article, label: Option<&str>) {
    let mut head = String::new();
    if let Some(label) = label {
        let _ = write!(head, "{} ", label);
    }
    let _ = write!(head, "[{}]", article.category);
    if article.is_urgent() {
        head.push_str(" URGENTE");
    }

    let _ = writeln!(out, "{} {}", head, article.title);
    let _ = writeln!(out, "    {}", article.summary);

    let mut meta = format!("{} • {}", article.source, article.read_time);
    if !article.date_label.is_empty() {
        let _ = write!(meta, " • {}", article.date_label);
    }
    let _ = writeln!(out, "    {}", meta);
    if let Some(url) = &article.url {
        let _ = writeln!(out, "    {}", url);
    }
    out.push('\n');
}

/// The current view as plain text: section title, then hero and cards, or
/// the state message.
pub fn render_plain(app: &App) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", app.section_title());

    match app.phase() {
        ViewPhase::Loading => out.push_str("Carregando artigos...\n"),
        ViewPhase::Error => {
            let _ = writeln!(out, "{}", app.error_message().unwrap_or_default());
        }
        ViewPhase::LoadedEmpty => out.push_str("Nenhum artigo disponível no momento.\n"),
        ViewPhase::LoadedNonEmpty => {
            if let Some(hero) = app.visible_hero() {
                write_article(&mut out, hero, Some("DESTAQUE"));
            }
            for article in app.visible_articles() {
                write_article(&mut out, article, None);
            }
        }
    }

    out
}
