use std::io::{self, Write};

use crossterm::{queue, style};

use crate::config::KeyBindings;

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item<W: Write>(out: &mut W, item: &str) -> io::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(rest),
                style::SetAttribute(style::Attribute::Reset),
            )?;
            break;
        };
        if open > 0 {
            queue!(
                out,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(&rest[..open]),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            queue!(out, style::Print(rest))?;
            break;
        };
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&rest[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &rest[close + 1..];
    }
    Ok(())
}

/// Short on-screen name for a binding string.
pub fn key_label(binding: &str) -> String {
    match binding {
        "Left" => "←".into(),
        "Right" => "→".into(),
        "Up" => "↑".into(),
        "Down" => "↓".into(),
        other => other.into(),
    }
}

pub fn menu_items(keys: &KeyBindings) -> Vec<String> {
    let k = key_label;
    vec![
        format!("[{}] play", k(&keys.play)),
        format!("[{}] reset", k(&keys.reset)),
        format!("[{}][{}] lesson", k(&keys.prev_lesson), k(&keys.next_lesson)),
        format!("[{}][{}] input", k(&keys.input_down), k(&keys.input_up)),
        format!("[{}][{}] push/pop", k(&keys.push), k(&keys.pop)),
        format!("[{}] explain", k(&keys.explain)),
        format!("[{}] quit", k(&keys.quit)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_follow_bindings() {
        let mut keys = KeyBindings::default();
        keys.play = "p".into();
        let items = menu_items(&keys);
        assert_eq!(items[0], "[p] play");
        assert_eq!(items[2], "[←][→] lesson");
        assert_eq!(items.last().map(String::as_str), Some("[q] quit"));
    }

    #[test]
    fn item_text_survives_styling() {
        let mut out = Vec::new();
        print_menu_item(&mut out, "[e] explain [unclosed").expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("[e]"));
        assert!(text.contains(" explain "));
        assert!(text.contains("[unclosed"));
    }
}
