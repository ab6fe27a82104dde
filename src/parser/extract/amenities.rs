use std::sync::LazyLock;

use regex::Regex;

use super::Sources;
use crate::model::{Amenities, RawSection};
use crate::parser::sections::AMENITY_TITLES;
use crate::parser::text::{capture, char_len, push_unique};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Internal,
    External,
}

/// Section-text patterns, tried in order. A named rule records its canonical
/// name; an unnamed rule keeps the matched text itself.
const SECTION_RULES: &[(&str, Option<&str>, Category)] = &[
    (r"(?i)hồ bơi[^.\n]*", Some("Hồ bơi"), Category::Internal),
    (r"(?i)(?:phòng|khu|trung tâm)\s*(?:gym|thể dục|thể thao)[^.\n]*", Some("Phòng gym"), Category::Internal),
    (r"(?i)(?:phòng|khu)\s*yoga[^.\n]*", Some("Phòng yoga"), Category::Internal),
    (r"(?i)(?:công viên|vườn)[^.\n]*", Some("Công viên"), Category::Internal),
    (r"(?i)(?:tttm|trung tâm thương mại)[^.\n]*", Some("TTTM"), Category::External),
    (r"(?i)(?:sảnh|lobby)[^.\n]*", Some("Sảnh"), Category::Internal),
    (r"(?i)(?:khu vui chơi|playground|trẻ em)[^.\n]*", Some("Khu vui chơi"), Category::Internal),
    (r"(?i)(?:hầm đỗ xe|parking|đỗ xe)[^.\n]*", Some("Hầm đỗ xe"), Category::Internal),
    (r"(?i)(?:sky lounge|sky bar)[^.\n]*", Some("Sky Lounge"), Category::Internal),
    (r"(?i)(?:phòng sinh hoạt|community room)[^.\n]*", Some("Phòng sinh hoạt"), Category::Internal),
    (r"(?i)(?:shophouse|nhà hàng|quán cà phê|restaurant|cafe|thương mại dịch vụ)[^.\n]*", Some("Thương mại dịch vụ"), Category::External),
    (r"(?i)(?:bảo vệ|security|camera|an ninh)[^.\n]*", Some("An ninh"), Category::Internal),
    (r"(?i)(?:vườn thiền|đường dạo bộ|tiểu cảnh nước)[^.\n]*", Some("Cảnh quan"), Category::Internal),
    (r"(?i)pickleball[^.\n]*", Some("Sân Pickleball"), Category::Internal),
    (r"(?i)concierge[^.\n]*", Some("Concierge"), Category::Internal),
    (r"(?i)\d+\+?\s*tiện ích[^.\n]*", None, Category::Internal),
];

/// Whole-description keyword scan: (lowercase keyword, canonical name, category).
const KEYWORDS: &[(&str, &str, Category)] = &[
    ("hồ bơi", "Hồ bơi", Category::Internal),
    ("công viên", "Công viên", Category::Internal),
    ("tttm", "TTTM", Category::External),
    ("trung tâm thương mại", "TTTM", Category::External),
    ("gym", "Phòng gym", Category::Internal),
    ("yoga", "Phòng yoga", Category::Internal),
    ("spa", "Spa", Category::Internal),
    ("sảnh", "Sảnh", Category::Internal),
    ("lobby", "Lobby", Category::Internal),
    ("khu vui chơi", "Khu vui chơi", Category::Internal),
    ("hầm đỗ xe", "Hầm đỗ xe", Category::Internal),
    ("sky lounge", "Sky Lounge", Category::Internal),
    ("sky bar", "Sky Bar", Category::Internal),
    ("phòng sinh hoạt", "Phòng sinh hoạt", Category::Internal),
    ("shophouse", "Shophouse", Category::External),
    ("nhà hàng", "Nhà hàng", Category::External),
    ("quán cà phê", "Quán cà phê", Category::External),
    ("mall", "Mall", Category::External),
    ("bảo vệ", "An ninh 24/7", Category::Internal),
    ("camera", "Camera giám sát", Category::Internal),
    ("pickleball", "Sân Pickleball", Category::Internal),
];

/// Fragment keywords for the paragraph-splitting pass.
const INTERNAL_FRAGMENT_TERMS: &[&str] = &["hồ bơi", "gym", "spa", "công viên", "sảnh", "lobby"];
const EXTERNAL_FRAGMENT_TERMS: &[&str] = &["tttm", "mall", "trung tâm"];

static SECTION_RES: LazyLock<Vec<(Regex, Option<&'static str>, Category)>> = LazyLock::new(|| {
    SECTION_RULES
        .iter()
        .map(|(p, name, cat)| (Regex::new(p).unwrap(), *name, *cat))
        .collect()
});
static FRAGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\n•\-]").unwrap());
static AMENITY_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*tiện ích").unwrap());

pub fn extract(src: &Sources) -> Amenities {
    let mut out = Amenities::default();

    if let Some(section) = src.section(AMENITY_TITLES) {
        apply_section_rules(&section.paragraphs.join("\n"), &mut out);
        if is_empty(&out) {
            split_fragments(section, &mut out);
        }
    }
    if is_empty(&out) {
        scan_description(src.description, &mut out);
    }
    out
}

fn is_empty(a: &Amenities) -> bool {
    a.internal.is_empty() && a.external.is_empty()
}

fn push(out: &mut Amenities, category: Category, item: impl Into<String>) {
    match category {
        Category::Internal => push_unique(&mut out.internal, item),
        Category::External => push_unique(&mut out.external, item),
    }
}

fn apply_section_rules(text: &str, out: &mut Amenities) {
    for (re, name, category) in SECTION_RES.iter() {
        for m in re.find_iter(text) {
            match name {
                Some(name) => push(out, *category, *name),
                None => {
                    let raw = m.as_str().trim();
                    let n = char_len(raw);
                    if n > 5 && n < 200 {
                        push(out, *category, raw);
                    }
                }
            }
        }
    }
}

fn split_fragments(section: &RawSection, out: &mut Amenities) {
    for paragraph in section.paragraphs.iter().filter(|p| char_len(p) > 20) {
        for fragment in FRAGMENT_SPLIT_RE.split(paragraph).map(str::trim) {
            let n = char_len(fragment);
            if n <= 5 || n >= 100 {
                continue;
            }
            let lower = fragment.to_lowercase();
            if INTERNAL_FRAGMENT_TERMS.iter().any(|t| lower.contains(t)) {
                push(out, Category::Internal, fragment);
            } else if EXTERNAL_FRAGMENT_TERMS.iter().any(|t| lower.contains(t)) {
                push(out, Category::External, fragment);
            }
        }
    }
}

fn scan_description(description: &str, out: &mut Amenities) {
    if description.is_empty() {
        return;
    }
    if let Some(count) = capture(&AMENITY_COUNT_RE, description) {
        push(out, Category::Internal, format!("{} tiện ích", count));
    }
    let lower = description.to_lowercase();
    for (keyword, name, category) in KEYWORDS {
        if lower.contains(keyword) {
            push(out, *category, *name);
        }
    }
}

// ── Tests ──
