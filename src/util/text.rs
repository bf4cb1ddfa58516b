use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Suffix appended to any text cut short, both for summaries and for
/// terminal-width clipping.
pub const ELLIPSIS: &str = "...";

const ELLIPSIS_WIDTH: usize = 3;

/// Number of terminal columns `s` occupies.
///
/// Accented Latin letters count as one column, CJK and most emoji as two.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was dropped.
///
/// This is the budget used for article summaries: a 400-character body with a
/// 150-character budget yields exactly 150 characters followed by `"..."`,
/// while a body that already fits is returned untouched (borrowed).
///
/// # Examples
///
/// ```
/// use agro_radar::util::truncate_chars;
///
/// assert_eq!(truncate_chars("Safra recorde", 50), "Safra recorde");
/// assert_eq!(truncate_chars("Safra recorde", 5), "Safra...");
/// assert_eq!(truncate_chars("Soja à vista", 6), "Soja à...");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max_chars) {
        None => Cow::Borrowed(s),
        Some((cut, _)) => Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS)),
    }
}

/// Clip `s` so it fits in `max_width` terminal columns.
///
/// When clipping is needed the result ends in [`ELLIPSIS`] and the whole thing,
/// ellipsis included, fits the width. Widths of three columns or fewer leave
/// no room for an ellipsis, so the text is simply cut.
///
/// # Examples
///
/// ```
/// use agro_radar::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Milho", 10), "Milho");
/// assert_eq!(truncate_to_width("Exportações de milho", 10), "Exporta...");
/// assert_eq!(truncate_to_width("Milho", 2), "Mi");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_columns(s, max_width).to_string());
    }

    let head = take_columns(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Longest prefix of `s` that fits in `columns`.
fn take_columns(s: &str, columns: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > columns {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Whether a byte is a control character that must not reach the terminal.
///
/// Tab, newline and carriage return are kept.
fn is_unsafe_control(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove control characters and ANSI escape sequences from API-provided text.
///
/// Article titles and bodies come from a remote service and are drawn straight
/// into the terminal, so CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ST`)
/// sequences, bare `ESC`, `DEL` and C0 controls are dropped.
///
/// Returns `Cow::Borrowed` when there is nothing to strip.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_unsafe_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < bytes.len() {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < bytes.len() {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_unsafe_control(b) {
            i += 1;
        } else {
            let start = i;
            while i < bytes.len() && !is_unsafe_control(bytes[i]) {
                i += 1;
            }
            // Only ASCII control bytes end a run, so the slice is valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate_chars_long_body() {
        let body = "a".repeat(400);
        let summary = truncate_chars(&body, 150);
        assert_eq!(summary.chars().count(), 150 + ELLIPSIS.len());
        assert!(summary.ends_with(ELLIPSIS));
        assert_eq!(&summary[..150], &body[..150]);
    }

    #[test]
    fn test_truncate_chars_short_body_unchanged() {
        let body = "b".repeat(100);
        let summary = truncate_chars(&body, 150);
        assert!(matches!(summary, Cow::Borrowed(_)));
        assert_eq!(summary, body);
    }

    #[test]
    fn test_truncate_chars_exact_budget_unchanged() {
        let body = "c".repeat(150);
        assert_eq!(truncate_chars(&body, 150), body);
    }

    #[test]
    fn test_truncate_chars_counts_characters_not_bytes() {
        // Each "ã" is two bytes in UTF-8 but one character.
        let body = "ã".repeat(10);
        let summary = truncate_chars(&body, 4);
        assert_eq!(summary, "ãããã...");
    }

    #[test]
    fn test_truncate_chars_zero_budget() {
        assert_eq!(truncate_chars("Café", 0), "...");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_truncate_to_width_fits() {
        assert_eq!(truncate_to_width("Pecuária", 8), "Pecuária");
        assert_eq!(truncate_to_width("Pecuária", 20), "Pecuária");
    }

    #[test]
    fn test_truncate_to_width_clips_with_ellipsis() {
        assert_eq!(truncate_to_width("Preço do boi gordo", 10), "Preço d...");
    }

    #[test]
    fn test_truncate_to_width_wide_chars() {
        // "你好世界" is 8 columns; 7 leaves 4 for text.
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
    }

    #[test]
    fn test_truncate_to_width_narrow() {
        assert_eq!(truncate_to_width("Trigo", 0), "");
        assert_eq!(truncate_to_width("Trigo", 1), "T");
        assert_eq!(truncate_to_width("Trigo", 3), "Tri");
        assert_eq!(truncate_to_width("你好", 1), "");
    }

    #[test]
    fn test_strip_clean_text_borrowed() {
        let input = "Exportação de soja cresce 12%\nem março";
        let out = strip_control_chars(input);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, input);
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mAlerta\x1b[0m"), "Alerta");
        assert_eq!(
            strip_control_chars("\x1b]0;titulo falso\x07Milho"),
            "Milho"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;titulo falso\x1b\\Milho"),
            "Milho"
        );
    }

    #[test]
    fn test_strip_c0_controls_and_del() {
        assert_eq!(strip_control_chars("bo\x00i\x07 gor\x7fdo"), "boi gordo");
        assert_eq!(strip_control_chars("antes\x1bdepois"), "antesdepois");
    }

    proptest! {
        #[test]
        fn prop_truncate_chars_respects_budget(s in "\\PC{0,300}", max in 0usize..200) {
            let out = truncate_chars(&s, max);
            let len = s.chars().count();
            if len <= max {
                prop_assert_eq!(out.as_ref(), s.as_str());
            } else {
                prop_assert_eq!(out.chars().count(), max + ELLIPSIS.len());
                prop_assert!(out.starts_with(s.chars().take(max).collect::<String>().as_str()));
            }
        }

        #[test]
        fn prop_truncate_to_width_fits(s in "[a-zA-Z0-9 àáâãçéêíóôõú你好]{0,80}", max in 0usize..60) {
            prop_assert!(display_width(&truncate_to_width(&s, max)) <= max);
        }
    }
}
