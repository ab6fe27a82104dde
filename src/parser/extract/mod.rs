pub mod amenities;
pub mod design;
pub mod location;
pub mod parties;
pub mod policies;
pub mod pricing;
pub mod scale;

use regex::Regex;

use super::sections::{find_section, find_value, sections_mentioning};
use super::text::capture;
use crate::model::{RawRecord, RawSection};

/// The candidate sources a field is resolved from: the raw record's details
/// and sections, plus the assembled description body.
pub struct Sources<'a> {
    pub raw: &'a RawRecord,
    pub description: &'a str,
}

impl<'a> Sources<'a> {
    /// Detail lookup against the record's label/value pairs.
    pub fn detail(&self, labels: &[&str]) -> Option<String> {
        find_value(&self.raw.details, labels)
    }

    pub fn section(&self, titles: &[&str]) -> Option<&'a RawSection> {
        find_section(&self.raw.sections, titles)
    }

    /// First capture group of `re` against the description.
    pub fn describe(&self, re: &Regex) -> Option<String> {
        capture(re, self.description)
    }

    /// Paragraphs of every section mentioning one of `terms`, space-joined.
    pub fn mentioning(&self, terms: &[&str]) -> Option<String> {
        let joined = sections_mentioning(&self.raw.sections, terms).join(" ");
        let joined = joined.trim();
        if joined.is_empty() {
            None
        } else {
            Some(joined.to_string())
        }
    }
}
