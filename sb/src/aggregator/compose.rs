//! Joining module outputs into the published line

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::BarStyle;

static NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r?\n)+").expect("newline pattern is valid"));

/// The ordered outputs of one bar
#[derive(Debug, Clone)]
pub struct Aggregate {
    style: BarStyle,
    slots: Vec<String>,
}

impl Aggregate {
    /// An aggregate with `len` empty slots
    pub fn new(style: BarStyle, len: usize) -> Self {
        Self {
            style,
            slots: vec![String::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Replace the text at `position`; returns false if there is no such slot
    pub fn write(&mut self, position: usize, text: String) -> bool {
        match self.slots.get_mut(position) {
            Some(slot) => {
                *slot = text;
                true
            }
            None => false,
        }
    }

    pub fn values(&self) -> &[String] {
        &self.slots
    }

    /// prefix + values joined by delimiter + suffix
    pub fn render(&self) -> String {
        format!(
            "{}{}{}",
            self.style.prefix,
            self.slots.join(&self.style.delimiter),
            self.style.suffix
        )
    }
}

/// Compose the full line from the top bar and the optional bottom bar
///
/// Every run of newlines in the result becomes a single space.
pub fn compose_line(top: &Aggregate, bottom: Option<&Aggregate>, separator: &str) -> String {
    let mut line = top.render();
    if let Some(bottom) = bottom {
        line.push_str(separator);
        line.push_str(&bottom.render());
    }
    collapse_newlines(&line)
}

/// Replace each run of newline characters with one space
pub fn collapse_newlines(text: &str) -> String {
    NEWLINES.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(prefix: &str, delimiter: &str, suffix: &str) -> BarStyle {
        BarStyle {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            delimiter: delimiter.to_string(),
        }
    }

    fn aggregate(style: BarStyle, values: &[&str]) -> Aggregate {
        let mut agg = Aggregate::new(style, values.len());
        for (i, v) in values.iter().enumerate() {
            assert!(agg.write(i, v.to_string()));
        }
        agg
    }

    #[test]
    fn test_three_modules_with_pipe() {
        let top = aggregate(style("", "|", ""), &["net:ok", "mem:40%", "12:00"]);
        assert_eq!(compose_line(&top, None, ";"), "net:ok|mem:40%|12:00");
    }

    #[test]
    fn test_prefix_and_suffix_wrap() {
        let top = aggregate(style("[", "][", "]"), &["a", "b"]);
        assert_eq!(compose_line(&top, None, ";"), "[a][b]");
    }

    #[test]
    fn test_bottom_bar_after_separator() {
        let top = aggregate(style("<", "|", ">"), &["a", "b"]);
        let bottom = aggregate(style(" ", " | ", " "), &["c", "d"]);
        assert_eq!(compose_line(&top, Some(&bottom), ";"), "<a|b>; c | d ");
    }

    #[test]
    fn test_newline_runs_become_one_space() {
        let top = aggregate(style("", "|", ""), &["12:00\n", "two\n\nlines", "crlf\r\n"]);
        assert_eq!(compose_line(&top, None, ";"), "12:00 |two lines|crlf ");
    }

    #[test]
    fn test_newlines_in_wrapping_strings_collapse_too() {
        let top = aggregate(style("\n\n", "|", "\n"), &["a"]);
        assert_eq!(compose_line(&top, None, ";"), " a ");
    }

    #[test]
    fn test_empty_bar_is_just_wrapping() {
        let top = Aggregate::new(style("[", "|", "]"), 0);
        assert!(top.is_empty());
        assert_eq!(compose_line(&top, None, ";"), "[]");
    }

    #[test]
    fn test_unwritten_slots_are_empty() {
        let mut top = Aggregate::new(style("", "|", ""), 3);
        top.write(1, "mid".to_string());
        assert_eq!(top.render(), "|mid|");
    }

    #[test]
    fn test_write_out_of_range() {
        let mut top = Aggregate::new(style("", "|", ""), 1);
        assert!(!top.write(1, "x".to_string()));
        assert_eq!(top.values(), &["".to_string()]);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let top = aggregate(style("", "|", ""), &["x\n", "y"]);
        assert_eq!(compose_line(&top, None, ";"), compose_line(&top, None, ";"));
    }
}
