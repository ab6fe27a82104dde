pub mod extract;
pub mod sections;
pub mod text;

use crate::model::{Gallery, MediaKind, NormalizedRecord, Overview, RawRecord};
use extract::{amenities, design, location, parties, policies, pricing, scale, Sources};

/// Defaults applied where a record carries no value of its own.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub default_region: String,
    pub default_city: String,
}

/// Characters of description kept as the sole highlight when the overview
/// yields none.
const FALLBACK_HIGHLIGHT_CHARS: usize = 200;

/// Key fields checked for the low-confidence signal.
const KEY_FIELDS: &[(&str, fn(&NormalizedRecord) -> bool)] = &[
    ("address", |r| r.location.address.is_empty()),
    ("district", |r| r.location.district.is_empty()),
    ("investor", |r| r.investor.is_empty()),
    ("description", |r| r.overview.description.is_empty()),
    ("pricing", |r| {
        r.pricing.price_per_sqm.is_empty() && r.pricing.starting_price.is_empty()
    }),
];

/// Raw record → normalized record. Pure and infallible: every field that
/// cannot be resolved comes out as "" or an empty list.
pub fn normalize_record(raw: &RawRecord, opts: &ExtractOptions) -> NormalizedRecord {
    let (description, highlights) = sections::assemble_description(&raw.sections);
    let tagline = raw.tagline.as_deref().map(str::trim).unwrap_or_default();

    let src = Sources {
        raw,
        description: &description,
    };
    let status = src.detail(&["trạng thái", "status"]).unwrap_or_default();
    let parties = parties::extract(&src);
    let location = location::extract(&src, opts);
    let scale = scale::extract(&src);
    let design = design::extract(&src);
    let amenities = amenities::extract(&src);
    let pricing = pricing::extract(&src);
    let policies = policies::extract(&src);
    let ownership = policies::ownership(&src);
    let handover_time = src
        .detail(&["thời gian giao nhà", "giao nhà", "handover"])
        .unwrap_or_default();
    let construction_start = src
        .detail(&["thời gian xây dựng", "khởi công", "construction start"])
        .unwrap_or_default();

    let highlights = if !highlights.is_empty() || description.is_empty() {
        highlights
    } else {
        vec![text::truncate_chars(&description, FALLBACK_HIGHLIGHT_CHARS)]
    };
    let summary = if description.is_empty() {
        tagline.to_string()
    } else {
        description.clone()
    };

    NormalizedRecord {
        project_name: raw.name.trim().to_string(),
        slogan: tagline.to_string(),
        summary,
        location,
        overview: Overview {
            description,
            highlights,
        },
        investor: parties.investor,
        developers: parties.developers,
        contractors: parties.contractors,
        legal_status: status.clone(),
        ownership,
        handover_time,
        construction_start,
        construction_progress: status,
        scale,
        design,
        amenities,
        pricing,
        policies,
        gallery: gallery(raw),
        attachments: Vec::new(),
    }
}

fn gallery(raw: &RawRecord) -> Gallery {
    let urls = |kind: MediaKind| -> Vec<String> {
        raw.media
            .iter()
            .filter(|m| m.kind == kind && !m.url.trim().is_empty())
            .map(|m| m.url.trim().to_string())
            .collect()
    };
    Gallery {
        images: urls(MediaKind::Image),
        videos: urls(MediaKind::Video),
    }
}

/// Names of the key fields the extractor left empty.
pub fn sparse_fields(record: &NormalizedRecord) -> Vec<&'static str> {
    KEY_FIELDS
        .iter()
        .filter(|(_, empty)| empty(record))
        .map(|(name, _)| *name)
        .collect()
}

/// True when every key field came out empty.
pub fn is_sparse(record: &NormalizedRecord) -> bool {
    sparse_fields(record).len() == KEY_FIELDS.len()
}

// ── Tests ──
