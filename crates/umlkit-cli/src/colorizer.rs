//! Terminal colorization for the containment tree printed by `demo`
//!
//! Applies ANSI escape codes to tree elements using crossterm.

use crossterm::style::{Color, Stylize};

/// Colorize a rendered containment tree using ANSI escape codes
///
/// - Tree branches: Cyan
/// - Element ids (`n3`, `e2`) and arrows: Yellow
/// - Node type names: Green
/// - Edge type names: Magenta
/// - Labels and geometry: Default (terminal color)
pub fn colorize_tree(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        let mut word = String::new();
        for c in line.chars() {
            if c.is_whitespace() {
                result.push_str(&colorize_word(&word));
                word.clear();
                result.push(c);
            } else {
                word.push(c);
            }
        }
        result.push_str(&colorize_word(&word));
        result.push('\n');
    }

    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn colorize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let color = if word.chars().all(is_branch_char) {
        Some(Color::Cyan)
    } else if word == "->" || is_element_id(word) {
        Some(Color::Yellow)
    } else if word.ends_with("Node") {
        Some(Color::Green)
    } else if word.ends_with("Edge") {
        Some(Color::Magenta)
    } else {
        None
    };
    match color {
        Some(color) => format!("{}", word.to_string().with(color)),
        None => word.to_string(),
    }
}

fn is_branch_char(c: char) -> bool {
    matches!(c, '├' | '└' | '│' | '─')
}

/// `n` or `e` followed by digits, optionally ending in `:`
fn is_element_id(word: &str) -> bool {
    let word = word.strip_suffix(':').unwrap_or(word);
    let mut chars = word.chars();
    matches!(chars.next(), Some('n' | 'e'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}
