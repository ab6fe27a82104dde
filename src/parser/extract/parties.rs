use std::sync::LazyLock;

use regex::Regex;

use super::Sources;
use crate::parser::sections::{find_fact, section_text, INVESTOR_TITLES};
use crate::parser::text::{char_len, split_list, truncate_chars};

const INVESTOR_LABELS: &[&str] = &["chủ đầu tư", "investor", "nhà đầu tư"];
const DEVELOPER_LABELS: &[&str] = &["nhà phát triển", "developer", "phát triển"];
const CONTRACTOR_LABELS: &[&str] = &["nhà thầu", "contractor", "thi công", "đơn vị xây dựng"];

static INVESTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)chủ đầu tư[:\s]+([^.\n]+?)\s*(?:vị trí|quy mô|\.|\n|$)").unwrap()
});
static DEVELOPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:nhà phát triển|developer)[:\s]+([^.\n]+)").unwrap());
static CONTRACTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:nhà thầu|đơn vị xây dựng|contractor)[:\s]+([^.\n]+)").unwrap()
});
static AND_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+và\s+").unwrap());

/// Names this short are dropped when deriving developers from the investor.
const MIN_PARTY_CHARS: usize = 5;

pub struct Parties {
    pub investor: String,
    pub developers: Vec<String>,
    pub contractors: Vec<String>,
}

pub fn extract(src: &Sources) -> Parties {
    let investor_section = src.section(INVESTOR_TITLES);

    let investor = src
        .detail(INVESTOR_LABELS)
        .or_else(|| src.describe(&INVESTOR_RE))
        .or_else(|| section_text(investor_section, " ").map(|t| truncate_chars(&t, 200)))
        .unwrap_or_default();

    let developers = match src
        .detail(DEVELOPER_LABELS)
        .or_else(|| find_fact(investor_section, &["phát triển", "developer"]))
        .or_else(|| src.describe(&DEVELOPER_RE))
    {
        Some(explicit) => split_list(&explicit),
        None => developers_from_investor(&investor),
    };

    let contractors = src
        .detail(CONTRACTOR_LABELS)
        .or_else(|| find_fact(investor_section, &["nhà thầu", "contractor"]))
        .or_else(|| src.describe(&CONTRACTOR_RE))
        .map(|c| split_list(&c))
        .unwrap_or_default();

    Parties {
        investor,
        developers,
        contractors,
    }
}

/// "A và B" names two developers; otherwise the investor is the developer.
pub fn developers_from_investor(investor: &str) -> Vec<String> {
    if AND_SPLIT_RE.is_match(investor) {
        return AND_SPLIT_RE
            .split(investor)
            .map(str::trim)
            .filter(|p| char_len(p) > MIN_PARTY_CHARS)
            .map(String::from)
            .collect();
    }
    if char_len(investor) > MIN_PARTY_CHARS {
        vec![investor.to_string()]
    } else {
        Vec::new()
    }
}
