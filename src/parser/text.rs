use std::sync::LazyLock;

use regex::Regex;

static NUMBER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d.,]*\s*[\p{L}²\s]*").unwrap());
static LIST_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;|]").unwrap());

/// First capture group of `re` in `text`, trimmed, if non-empty.
pub fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Every full match of `re` in `text`, trimmed.
pub fn all_matches(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Leading number-plus-unit token ("25 tầng", "1.200 căn"), else the trimmed input.
pub fn extract_number(value: &str) -> String {
    match NUMBER_TOKEN_RE.find(value) {
        Some(m) => m.as_str().trim().to_string(),
        None => value.trim().to_string(),
    }
}

/// Split a free-text list on `,` `;` `|`.
pub fn split_list(value: &str) -> Vec<String> {
    LIST_SPLIT_RE
        .split(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Append unless already present; keeps insertion order.
pub fn push_unique(list: &mut Vec<String>, item: impl Into<String>) {
    let item = item.into();
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keeps_unit() {
        assert_eq!(extract_number("25 tầng"), "25 tầng");
        assert_eq!(extract_number("Khoảng 1.200 căn hộ"), "1.200 căn hộ");
        assert_eq!(extract_number("3 block, 2 tầng hầm"), "3 block");
        assert_eq!(extract_number("12.000 m²"), "12.000 m²");
    }

    #[test]
    fn number_without_digits_passes_through() {
        assert_eq!(extract_number("  đang cập nhật "), "đang cập nhật");
        assert_eq!(extract_number(""), "");
    }

    #[test]
    fn number_ignores_leading_separator() {
        assert_eq!(extract_number("A, 25 tầng"), "25 tầng");
    }

    #[test]
    fn list_split() {
        assert_eq!(
            split_list("Coteccons; Hòa Bình | Ricons, "),
            vec!["Coteccons", "Hòa Bình", "Ricons"]
        );
    }

    #[test]
    fn truncation_counts_chars() {
        assert_eq!(truncate_chars("Đà Nẵng", 2), "Đà");
        assert_eq!(char_len("Đà Nẵng"), 7);
    }

    #[test]
    fn push_unique_dedups() {
        let mut v = Vec::new();
        push_unique(&mut v, "Hồ bơi");
        push_unique(&mut v, "Spa");
        push_unique(&mut v, "Hồ bơi");
        assert_eq!(v, vec!["Hồ bơi", "Spa"]);
    }
}
