use std::sync::LazyLock;

use regex::Regex;

use super::scale::{parse_unit_types, unit_area_source};
use super::Sources;
use crate::model::Design;
use crate::parser::sections::{section_text, DESIGN_TITLES, FLOOR_PLAN_TITLES};

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:thiết kế|kiến trúc|phong cách)[:\s]+([^.\n]+)").unwrap()
});
static FLOOR_PLAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:mặt bằng|layout)[:\s]+([^.\n]+)").unwrap());

pub fn extract(src: &Sources) -> Design {
    let architecture_style = section_text(src.section(DESIGN_TITLES), " ")
        .or_else(|| src.describe(&STYLE_RE))
        .unwrap_or_default();
    let floor_plans = section_text(src.section(FLOOR_PLAN_TITLES), "\n")
        .or_else(|| src.describe(&FLOOR_PLAN_RE))
        .unwrap_or_default();

    Design {
        architecture_style,
        interior: src.detail(&["nội thất", "interior"]).unwrap_or_default(),
        floor_plans,
        unit_types: parse_unit_types(&unit_area_source(src)),
    }
}
