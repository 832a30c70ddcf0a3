//! Label formatting
//!
//! Pure functions turning counter state into display strings: `"4.1.2."` for
//! sections, `"Table 2"` for floats, `"3b"` for sub-examples.

use std::sync::OnceLock;

use lingref_ast::FloatKind;
use regex::Regex;

/// Chapter prefix for an explicit chapter number (`"4"` → `"4."`)
pub fn chapter_prefix(number: &str) -> String {
    let number = number.trim();
    if number.is_empty() {
        String::new()
    } else {
        format!("{}.", number)
    }
}

/// Section label: `prefix + path.join(".") + "."`
pub fn format_section_label(prefix: &str, path: &[u32]) -> String {
    let joined = path
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");
    format!("{}{}.", prefix, joined)
}

/// Float label: capitalized kind name, a space, and the ordinal
pub fn format_float_label(kind: FloatKind, ordinal: u32) -> String {
    format!("{} {}", kind.display_name(), ordinal)
}

/// Lowercase letter for a 1-based sub-example ordinal.
///
/// 1 → `a` … 26 → `z`, then `aa`, `ab`, … like spreadsheet columns.
pub fn subexample_letter(ordinal: u32) -> String {
    let mut n = ordinal;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'a' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Example marker: the bare ordinal, or parent ordinal plus letter
pub fn example_marker(ordinal: u32, sub: Option<u32>) -> String {
    match sub {
        Some(sub) => format!("{}{}", ordinal, subexample_letter(sub)),
        None => ordinal.to_string(),
    }
}

/// Matches a section number left by an earlier run (`"3.2. "`)
pub fn stale_section_prefix() -> &'static Regex {
    static SECTION_RE: OnceLock<Regex> = OnceLock::new();
    SECTION_RE.get_or_init(|| Regex::new(r"^\d+(?:\.\d+)*\.\s+").unwrap())
}

/// Matches a float label left by an earlier run, for the given separator
pub fn stale_float_prefix(separator: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"^(?:Table|Figure) \d+{}\s*",
        regex::escape(separator.trim_end())
    ))
}

/// Prefix `text` with `label` and `separator` unless it already carries it.
///
/// The check compares against `label` followed by the separator with its
/// trailing whitespace removed, so `"4.1."` guards `"4.1. Title"` and
/// `"Table 2:"` guards `"Table 2: Caption"`. When `stale` is given, an
/// outdated prefix it matches is removed before the new one is added.
///
/// Returns `None` when the text is already numbered.
pub fn prefix_once(
    text: &str,
    label: &str,
    separator: &str,
    stale: Option<&Regex>,
) -> Option<String> {
    let guard = format!("{}{}", label, separator.trim_end());
    if text.starts_with(&guard) {
        return None;
    }
    let body = match stale.and_then(|re| re.find(text)) {
        Some(found) => &text[found.end()..],
        None => text,
    };
    Some(format!("{}{}{}", label, separator, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_label_without_prefix() {
        assert_eq!(format_section_label("", &[3]), "3.");
        assert_eq!(format_section_label("", &[4, 3, 2]), "4.3.2.");
    }

    #[test]
    fn test_section_label_with_prefix() {
        assert_eq!(format_section_label(&chapter_prefix("4"), &[1, 2]), "4.1.2.");
    }

    #[test]
    fn test_chapter_prefix() {
        assert_eq!(chapter_prefix("4"), "4.");
        assert_eq!(chapter_prefix(" 12 "), "12.");
        assert_eq!(chapter_prefix(""), "");
    }

    #[test]
    fn test_float_label() {
        assert_eq!(format_float_label(FloatKind::Table, 2), "Table 2");
        assert_eq!(format_float_label(FloatKind::Figure, 10), "Figure 10");
    }

    #[test]
    fn test_subexample_letters() {
        assert_eq!(subexample_letter(1), "a");
        assert_eq!(subexample_letter(3), "c");
        assert_eq!(subexample_letter(26), "z");
        assert_eq!(subexample_letter(27), "aa");
        assert_eq!(subexample_letter(28), "ab");
        assert_eq!(subexample_letter(0), "");
    }

    #[test]
    fn test_example_marker() {
        assert_eq!(example_marker(7, None), "7");
        assert_eq!(example_marker(1, Some(2)), "1b");
    }

    #[test]
    fn test_prefix_once_adds_label() {
        assert_eq!(
            prefix_once("Word order", "4.1.2.", " ", None).as_deref(),
            Some("4.1.2. Word order")
        );
        assert_eq!(
            prefix_once("Vowels", "Table 2", ": ", None).as_deref(),
            Some("Table 2: Vowels")
        );
    }

    #[test]
    fn test_prefix_once_is_idempotent() {
        assert_eq!(prefix_once("4.1.2. Word order", "4.1.2.", " ", None), None);
        assert_eq!(prefix_once("Table 2: Vowels", "Table 2", ": ", None), None);
    }

    #[test]
    fn test_prefix_once_distinguishes_longer_numbers() {
        assert_eq!(
            prefix_once("Table 10: Tones", "Table 1", ": ", None).as_deref(),
            Some("Table 1: Table 10: Tones")
        );
        assert_eq!(
            prefix_once("1.10. Clitics", "1.1.", " ", None).as_deref(),
            Some("1.1. 1.10. Clitics")
        );
    }

    #[test]
    fn test_prefix_once_strips_stale_section() {
        let stale = stale_section_prefix();
        assert_eq!(
            prefix_once("3.2. Word order", "3.3.", " ", Some(stale)).as_deref(),
            Some("3.3. Word order")
        );
    }

    #[test]
    fn test_prefix_once_strips_stale_float() {
        let stale = stale_float_prefix(": ").unwrap();
        assert_eq!(
            prefix_once("Table 3: Vowels", "Table 2", ": ", Some(&stale)).as_deref(),
            Some("Table 2: Vowels")
        );
        assert_eq!(
            prefix_once("Tables of tones", "Table 1", ": ", Some(&stale)).as_deref(),
            Some("Table 1: Tables of tones")
        );
    }
}
