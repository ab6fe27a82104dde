use std::sync::LazyLock;

use regex::Regex;

use super::Sources;
use crate::model::{Location, RawSection};
use crate::parser::sections::{header_block, section_text, LOCATION_TITLES};
use crate::parser::text::{all_matches, capture, char_len};
use crate::parser::ExtractOptions;

const ADDRESS_LABELS: &[&str] = &["địa chỉ", "vị trí", "location", "address"];
const CITY_LABELS: &[&str] = &["thành phố", "tỉnh", "city"];
const COORDINATE_LABELS: &[&str] = &["tọa độ", "toạ độ", "coordinates"];

/// Address shapes tried in order against the description.
const ADDRESS_PATTERNS: &[&str] = &[
    // "Vị Trí: Dự án tọa lạc tại đường Trần Hưng Đạo, Ngô Quyền."
    r"(?i)vị trí[:\s]+(?:dự án\s+)?(?:tọa lạc|toạ lạc|nằm|tại)[:\s]+([^.\n]+?)\s*(?:quy mô|gần|\.|\n|$)",
    // "Vị trí: Số 50 Quy Mỹ, Phường Hoà Cường Nam, Quận Hải Châu"
    r"(?i)vị trí[:\s]+(số\s+\d+[^.\n]*?(?:phường|quận)[^.\n]+)",
    r"(?i)(?:tọa lạc|toạ lạc|nằm|tại)\s+(?:số\s+)?([^.\n,]+(?:đường|phường|quận|và)[^.\n,]*)",
    r"(?i)(số\s+\d+[^.\n]*(?:phường|quận)[^.\n]+)",
];

/// A candidate this long is taken without trying later shapes.
const MIN_ADDRESS_CHARS: usize = 20;

static ADDRESS_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ADDRESS_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});
static SECTION_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:tọa lạc|toạ lạc|nằm|tại|địa chỉ|vị trí)[:\s]+([^.\n]+(?:đường|phường|quận)[^.\n]*)")
        .unwrap()
});
static LEADING_TAI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^tại\s+").unwrap());

static DISTRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:phường|quận|huyện)\s+(\p{Lu}\p{Ll}*(?:[ \t]+\p{Lu}\p{Ll}*)*)").unwrap()
});

static DIRECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)phía\s+(?:đông|tây|nam|bắc)[:\s]+[^\n]+").unwrap());
static NEARBY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:tiếp giáp|gần|cách khoảng|cách|nằm giữa)[:\s]+[^\n.]+").unwrap()
});
static LOCATION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VỊ TRÍ[:\s]*").unwrap());

/// Known districts, matched against the project name. Both spellings of
/// "Hoà/Hòa" occur in listings.
const KNOWN_DISTRICTS: &[(&str, &str)] = &[
    ("hoà xuân", "Hoà Xuân"),
    ("hòa xuân", "Hoà Xuân"),
    ("hải châu", "Hải Châu"),
    ("thanh khê", "Thanh Khê"),
    ("liên chiểu", "Liên Chiểu"),
    ("ngũ hành sơn", "Ngũ Hành Sơn"),
    ("sơn trà", "Sơn Trà"),
    ("cẩm lệ", "Cẩm Lệ"),
];

pub fn extract(src: &Sources, opts: &ExtractOptions) -> Location {
    let location_section = src.section(LOCATION_TITLES);

    Location {
        address: address(src, location_section),
        region: opts.default_region.clone(),
        city: src
            .detail(CITY_LABELS)
            .unwrap_or_else(|| opts.default_city.clone()),
        district: district(&src.raw.name, src.description),
        coordinates: src.detail(COORDINATE_LABELS).unwrap_or_default(),
        surrounding: surrounding(location_section, src.description),
    }
}

fn address(src: &Sources, location_section: Option<&RawSection>) -> String {
    src.detail(ADDRESS_LABELS)
        .or_else(|| address_from_description(src.description))
        .or_else(|| address_from_section(location_section))
        .map(|a| clean_address(&a))
        .unwrap_or_default()
}

/// First candidate of at least `MIN_ADDRESS_CHARS`, else the longest one seen.
fn address_from_description(description: &str) -> Option<String> {
    if description.is_empty() {
        return None;
    }
    let mut longest: Option<String> = None;
    for re in ADDRESS_RES.iter() {
        let Some(candidate) = capture(re, description).map(|c| clean_address(&c)) else {
            continue;
        };
        let len = char_len(&candidate);
        if len >= MIN_ADDRESS_CHARS {
            return Some(candidate);
        }
        if longest.as_ref().map_or(true, |l| len > char_len(l)) {
            longest = Some(candidate);
        }
    }
    longest.filter(|l| !l.is_empty())
}

fn address_from_section(section: Option<&RawSection>) -> Option<String> {
    let text = section_text(section, " ")?;
    if let Some(found) = capture(&SECTION_ADDRESS_RE, &text) {
        return Some(found);
    }
    if char_len(&text) <= 50 {
        return None;
    }
    text.split(['.', '\n'])
        .map(str::trim)
        .find(|s| char_len(s) > 30)
        .map(String::from)
}

fn clean_address(raw: &str) -> String {
    let stripped = LEADING_TAI_RE.replace(raw.trim(), "");
    stripped
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '.' | ':'))
        .trim()
        .to_string()
}

pub fn district(name: &str, description: &str) -> String {
    let lower = name.to_lowercase();
    if let Some((_, canonical)) = KNOWN_DISTRICTS.iter().find(|(needle, _)| lower.contains(needle)) {
        return canonical.to_string();
    }
    capture(&DISTRICT_RE, description).unwrap_or_default()
}

fn surrounding(location_section: Option<&RawSection>, description: &str) -> String {
    if let Some(section) = location_section {
        let text = section.paragraphs.join("\n");
        let mut parts = all_matches(&DIRECTION_RE, &text);
        parts.extend(all_matches(&NEARBY_RE, &text));
        if parts.is_empty() {
            return text.trim().to_string();
        }
        return parts.join("; ");
    }

    let Some(block) = header_block(description, &LOCATION_HEADER_RE) else {
        return String::new();
    };
    let directions = all_matches(&DIRECTION_RE, block);
    if !directions.is_empty() {
        return directions.join("; ");
    }
    all_matches(&NEARBY_RE, block).join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Detail, RawRecord};

    fn sources<'a>(raw: &'a RawRecord, description: &'a str) -> Sources<'a> {
        Sources { raw, description }
    }

    fn location_section(paragraphs: &[&str]) -> RawSection {
        RawSection {
            title: "Vị trí dự án".into(),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
            facts: Vec::new(),
        }
    }

    #[test]
    fn district_from_name() {
        assert_eq!(district("Regal Hoà Xuân Residences", ""), "Hoà Xuân");
        assert_eq!(district("The Sang Residence Ngũ Hành Sơn", ""), "Ngũ Hành Sơn");
        assert_eq!(district("Sun Ponte Hòa Xuân", ""), "Hoà Xuân");
    }

    #[test]
    fn district_from_description() {
        let d = district(
            "Sun Cosmo",
            "Dự án nằm tại phường Hoà Cường Nam, quận Hải Châu.",
        );
        assert_eq!(d, "Hoà Cường Nam");
        assert_eq!(district("Sun Cosmo", "không có thông tin"), "");
    }

    #[test]
    fn address_from_detail_wins() {
        let raw = RawRecord {
            details: vec![Detail {
                label: "Địa chỉ".into(),
                value: "Đường Trần Hưng Đạo, Sơn Trà".into(),
            }],
            ..Default::default()
        };
        let loc = extract(&sources(&raw, "Vị trí: Số 1 Lê Lợi, phường Thạch Thang"), &ExtractOptions::default());
        assert_eq!(loc.address, "Đường Trần Hưng Đạo, Sơn Trà");
    }

    #[test]
    fn address_strips_leading_tai() {
        let raw = RawRecord::default();
        let desc = "Vị Trí: Dự án tọa lạc tại đường Trần Hưng Đạo, Ngô Quyền và Nguyễn Công Trứ. Quy mô: 2ha";
        let loc = extract(&sources(&raw, desc), &ExtractOptions::default());
        assert_eq!(loc.address, "đường Trần Hưng Đạo, Ngô Quyền và Nguyễn Công Trứ");
    }

    #[test]
    fn address_numbered_shape() {
        let raw = RawRecord::default();
        let desc = "Vị trí: Số 50 Quy Mỹ, Phường Hoà Cường Nam, Quận Hải Châu, ";
        let loc = extract(&sources(&raw, desc), &ExtractOptions::default());
        assert_eq!(loc.address, "Số 50 Quy Mỹ, Phường Hoà Cường Nam, Quận Hải Châu");
    }

    #[test]
    fn short_candidates_keep_longest() {
        assert_eq!(
            address_from_description("Nằm tại số 3 đường Ba").as_deref(),
            Some("số 3 đường Ba")
        );
    }

    #[test]
    fn address_from_location_section() {
        let raw = RawRecord {
            sections: vec![location_section(&[
                "Dự án nằm tại đường Võ Nguyên Giáp, phường Phước Mỹ",
            ])],
            ..Default::default()
        };
        let loc = extract(&sources(&raw, ""), &ExtractOptions::default());
        assert_eq!(loc.address, "đường Võ Nguyên Giáp, phường Phước Mỹ");
    }

    #[test]
    fn surrounding_from_location_section() {
        let raw = RawRecord {
            sections: vec![location_section(&[
                "Phía Đông: giáp sông Hàn",
                "Phía Tây: đường 2/9",
                "Dự án cách sân bay 10 phút.",
            ])],
            ..Default::default()
        };
        let loc = extract(&sources(&raw, ""), &ExtractOptions::default());
        assert_eq!(
            loc.surrounding,
            "Phía Đông: giáp sông Hàn; Phía Tây: đường 2/9; cách sân bay 10 phút"
        );
    }

    #[test]
    fn surrounding_falls_back_to_raw_section_text() {
        let raw = RawRecord {
            sections: vec![location_section(&["Trung tâm thành phố"])],
            ..Default::default()
        };
        let loc = extract(&sources(&raw, ""), &ExtractOptions::default());
        assert_eq!(loc.surrounding, "Trung tâm thành phố");
    }

    #[test]
    fn surrounding_from_description_block() {
        let raw = RawRecord::default();
        let desc = "I/ TỔNG QUAN\nDự án cao cấp.\nII/ VỊ TRÍ\nPhía Bắc: sông Hàn\nPhía Nam: cầu Rồng\nIII/ TIỆN ÍCH\nPhía Đông: không tính";
        let loc = extract(&sources(&raw, desc), &ExtractOptions::default());
        assert_eq!(loc.surrounding, "Phía Bắc: sông Hàn; Phía Nam: cầu Rồng");
    }

    #[test]
    fn city_and_region_defaults() {
        let raw = RawRecord::default();
        let opts = ExtractOptions {
            default_region: "Miền Trung".into(),
            default_city: "Đà Nẵng".into(),
        };
        let loc = extract(&sources(&raw, ""), &opts);
        assert_eq!(loc.region, "Miền Trung");
        assert_eq!(loc.city, "Đà Nẵng");
    }
}
