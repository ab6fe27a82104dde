use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::Sources;
use crate::model::{Scale, UnitType};
use crate::parser::text::{char_len, extract_number};

const LAND_AREA_LABELS: &[&str] = &["quy mô", "tổng diện tích", "diện tích đất"];
const BLOCK_LABELS: &[&str] = &["số block", "block", "số tòa"];
const FLOOR_LABELS: &[&str] = &["số tầng", "tầng"];
const UNIT_COUNT_LABELS: &[&str] = &["số căn hộ"];
const DENSITY_LABELS: &[&str] = &["mật độ", "mật độ xây dựng"];
const UNIT_AREA_LABELS: &[&str] = &["diện tích căn hộ", "diện tích"];

static LAND_AREA_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)quy mô[:\s]+([\d.,]+\s*(?:m2|m²|ha|hecta)?)").unwrap()
});
static LAND_AREA_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)quy mô[:\s]+([^.\n]+)").unwrap());
static UNIT_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:số lượng căn hộ|số căn hộ)[:\s]+([^.\n]+)").unwrap()
});
static AREA_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)m[²2]").unwrap());
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Land-area values shorter than this are retried against the description.
const MIN_LAND_AREA_CHARS: usize = 5;

pub fn extract(src: &Sources) -> Scale {
    Scale {
        total_land_area: total_land_area(src),
        construction_area: src.detail(&["diện tích xây dựng"]).unwrap_or_default(),
        floor_area: src.detail(&["diện tích sàn"]).unwrap_or_default(),
        building_density: src.detail(DENSITY_LABELS).unwrap_or_default(),
        number_of_blocks: number_field(src.detail(BLOCK_LABELS)),
        number_of_floors: number_field(src.detail(FLOOR_LABELS)),
        number_of_units: number_field(
            src.detail(UNIT_COUNT_LABELS)
                .or_else(|| src.describe(&UNIT_COUNT_RE)),
        ),
        green_area: src.detail(&["cây xanh"]).unwrap_or_default(),
        parking: src.detail(&["bãi đỗ xe", "chỗ đỗ xe"]).unwrap_or_default(),
    }
}

fn total_land_area(src: &Sources) -> String {
    let detail = src.detail(LAND_AREA_LABELS).unwrap_or_default();
    if char_len(&detail) >= MIN_LAND_AREA_CHARS {
        return detail;
    }
    src.describe(&LAND_AREA_NUMBER_RE)
        .filter(|v| char_len(v) >= MIN_LAND_AREA_CHARS)
        .or_else(|| src.describe(&LAND_AREA_TEXT_RE))
        .unwrap_or(detail)
}

fn number_field(value: Option<String>) -> String {
    value.map(|v| extract_number(&v)).unwrap_or_default()
}

/// The apartment-area string the unit types are built from.
pub fn unit_area_source(src: &Sources) -> String {
    src.detail(UNIT_AREA_LABELS).unwrap_or_default()
}

/// One unit type per distinct area, ascending.
///
/// "45-61-77-84m2" yields four types. Any bedroom/area pairing in the
/// source is dropped; only the sorted set of areas survives.
pub fn parse_unit_types(areas: &str) -> Vec<UnitType> {
    if areas.trim().is_empty() {
        return Vec::new();
    }
    let cleaned = AREA_UNIT_RE.replace_all(areas, "");
    let distinct: BTreeSet<u64> = cleaned
        .split(['-', '–', '—', ','])
        .flat_map(|part| INTEGER_RE.find_iter(part))
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    distinct
        .into_iter()
        .enumerate()
        .map(|(i, area)| UnitType {
            kind: format!("Loại {}", i + 1),
            area: format!("{}m²", area),
            bedrooms: String::new(),
            bathrooms: String::new(),
            description: format!("Căn hộ {}m²", area),
        })
        .collect()
}
