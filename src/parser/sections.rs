use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Detail, RawSection};

/// A roman-numeral header inside a description body ("II/ VỊ TRÍ"). The
/// heading must start with a capital, so dates like "Quý IV/2026" don't count.
static ROMAN_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)[IVX]{1,4}\s*/\s*\p{Lu}").unwrap());

pub const OVERVIEW_TITLES: &[&str] = &["tổng quan", "giới thiệu", "overview", "nội dung"];
pub const LOCATION_TITLES: &[&str] = &["vị trí", "location", "địa chỉ"];
pub const AMENITY_TITLES: &[&str] = &["tiện ích", "amenities", "tiện nghi"];
pub const DESIGN_TITLES: &[&str] = &["thiết kế", "design", "kiến trúc", "mặt bằng"];
pub const FLOOR_PLAN_TITLES: &[&str] = &["mặt bằng", "floor plan", "layout"];
pub const POLICY_TITLES: &[&str] = &["chính sách", "policies", "chính sách bán hàng"];
pub const INVESTOR_TITLES: &[&str] = &["chủ đầu tư", "investor", "nhà đầu tư"];

/// Mutual substring containment, case-insensitive. Empty labels never match.
pub fn labels_match(label: &str, synonym: &str) -> bool {
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return false;
    }
    let synonym = synonym.to_lowercase();
    label.contains(&synonym) || synonym.contains(&label)
}

/// First pair (in sequence order) whose label matches any synonym.
///
/// The outer loop runs over the pairs, not the synonyms: a later, more
/// specific synonym never beats an earlier pair.
pub fn find_pair<'a>(pairs: &'a [Detail], labels: &[&str]) -> Option<&'a Detail> {
    pairs
        .iter()
        .find(|d| labels.iter().any(|l| labels_match(&d.label, l)))
}

/// Trimmed value of the first matching pair, if that value is non-empty.
pub fn find_value(pairs: &[Detail], labels: &[&str]) -> Option<String> {
    find_pair(pairs, labels)
        .map(|d| d.value.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn find_section<'a>(sections: &'a [RawSection], titles: &[&str]) -> Option<&'a RawSection> {
    sections
        .iter()
        .find(|s| titles.iter().any(|t| labels_match(&s.title, t)))
}

pub fn find_fact(section: Option<&RawSection>, labels: &[&str]) -> Option<String> {
    section.and_then(|s| find_value(&s.facts, labels))
}

/// Joined paragraphs of a section, `None` when that text is empty.
pub fn section_text(section: Option<&RawSection>, sep: &str) -> Option<String> {
    section
        .map(|s| s.paragraphs.join(sep).trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Paragraphs of every section whose prose or facts mention one of `terms`.
pub fn sections_mentioning(sections: &[RawSection], terms: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for section in sections {
        let haystack = section
            .paragraphs
            .iter()
            .cloned()
            .chain(section.facts.iter().map(|f| format!("{}: {}", f.label, f.value)))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if terms.iter().any(|t| haystack.contains(&t.to_lowercase())) {
            out.extend(section.paragraphs.iter().cloned());
        }
    }
    out
}

/// The description and its highlight candidates.
///
/// Uses the overview section when one is titled as such, else the first
/// section. Highlights only come from a titled overview.
pub fn assemble_description(sections: &[RawSection]) -> (String, Vec<String>) {
    if let Some(overview) = find_section(sections, OVERVIEW_TITLES) {
        let description = overview.paragraphs.join("\n\n");
        let highlights = overview
            .paragraphs
            .iter()
            .filter(|p| {
                let n = p.chars().count();
                n > 20 && n < 200
            })
            .cloned()
            .collect();
        return (description, highlights);
    }
    match sections.first() {
        Some(first) => (first.paragraphs.join("\n\n"), Vec::new()),
        None => (String::new(), Vec::new()),
    }
}

/// Body of a headed block inside `text`, from the end of the header up to the
/// next roman-numeral header or the end of the text.
pub fn header_block<'a>(text: &'a str, header: &Regex) -> Option<&'a str> {
    let m = header.find(text)?;
    let rest = &text[m.end()..];
    let end = ROMAN_HEADER_RE.find(rest).map_or(rest.len(), |h| h.start());
    Some(rest[..end].trim())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(label: &str, value: &str) -> Detail {
        Detail {
            label: label.into(),
            value: value.into(),
        }
    }

    fn section(title: &str, paragraphs: &[&str]) -> RawSection {
        RawSection {
            title: title.into(),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            facts: Vec::new(),
        }
    }

    #[test]
    fn match_is_mutual_containment() {
        assert!(labels_match("Chủ đầu tư dự án", "chủ đầu tư"));
        assert!(labels_match("Giá", "giá bán"));
        assert!(labels_match("  SỐ TẦNG ", "số tầng"));
        assert!(!labels_match("Tiến độ", "giá"));
    }

    #[test]
    fn empty_label_matches_nothing() {
        assert!(!labels_match("", "giá"));
        assert!(!labels_match("   ", "giá"));
    }

    #[test]
    fn first_pair_in_sequence_order_wins() {
        let details = vec![
            detail("Tổng diện tích", "5 ha"),
            detail("Diện tích căn hộ", "45-84m2"),
        ];
        // "diện tích" matches both labels; the first pair is taken.
        assert_eq!(
            find_value(&details, &["diện tích căn hộ", "diện tích"]).as_deref(),
            Some("5 ha")
        );
    }

    #[test]
    fn empty_value_is_absent() {
        let details = vec![detail("Giá bán", "  ")];
        assert!(find_value(&details, &["giá"]).is_none());
    }

    #[test]
    fn description_prefers_overview_section() {
        let sections = vec![
            section("Vị trí", &["Gần biển"]),
            section("Tổng quan dự án", &["Đoạn một đủ dài để làm điểm nổi bật.", "Ngắn"]),
        ];
        let (description, highlights) = assemble_description(&sections);
        assert_eq!(description, "Đoạn một đủ dài để làm điểm nổi bật.\n\nNgắn");
        assert_eq!(highlights, vec!["Đoạn một đủ dài để làm điểm nổi bật."]);
    }

    #[test]
    fn description_falls_back_to_first_section() {
        let sections = vec![section("Giá bán", &["A", "B"])];
        let (description, highlights) = assemble_description(&sections);
        assert_eq!(description, "A\n\nB");
        assert!(highlights.is_empty());
    }

    #[test]
    fn header_block_stops_at_next_roman_header() {
        let re = Regex::new(r"VỊ TRÍ").unwrap();
        let text = "I/ TỔNG QUAN abc II/ VỊ TRÍ Phía Đông: biển III/ TIỆN ÍCH hồ bơi";
        assert_eq!(header_block(text, &re), Some("Phía Đông: biển"));
    }

    #[test]
    fn header_block_keeps_quarter_dates() {
        let re = Regex::new(r"CHÍNH SÁCH BÁN HÀNG[:\s]*").unwrap();
        let text = "V/ CHÍNH SÁCH BÁN HÀNG: Bàn giao Quý IV/2026, chiết khấu 5%\nVI/ LIÊN HỆ";
        assert_eq!(
            header_block(text, &re),
            Some("Bàn giao Quý IV/2026, chiết khấu 5%")
        );
    }

    #[test]
    fn sections_mentioning_collects_paragraphs() {
        let mut s = section("Chính sách", &["Chiết khấu 5%"]);
        s.facts.push(detail("Thanh toán", "30% ký HĐMB"));
        let other = section("Vị trí", &["Gần sân bay"]);
        let found = sections_mentioning(&[s, other], &["thanh toán"]);
        assert_eq!(found, vec!["Chiết khấu 5%"]);
    }
}
