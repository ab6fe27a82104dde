use serde::{Deserialize, Deserializer, Serialize};

// ── Raw scraped input ──
//
// Scraped fields may be missing or null; both read as the empty default.

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

/// Null paragraphs are dropped rather than kept as empty strings.
fn strings_skip_null<'de, D>(d: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<String>>> = Option::deserialize(d)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: Vec<Detail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<RawSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Detail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "strings_skip_null")]
    pub paragraphs: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facts: Vec<Detail>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

// ── Normalized output ──
//
// Every string defaults to "" and every list to empty; nothing is optional.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedRecord {
    pub project_name: String,
    pub slogan: String,
    pub summary: String,
    pub location: Location,
    pub overview: Overview,
    pub investor: String,
    pub developers: Vec<String>,
    pub contractors: Vec<String>,
    pub legal_status: String,
    pub ownership: String,
    pub handover_time: String,
    pub construction_start: String,
    pub construction_progress: String,
    pub scale: Scale,
    pub design: Design,
    pub amenities: Amenities,
    pub pricing: Pricing,
    pub policies: Policies,
    pub gallery: Gallery,
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub address: String,
    pub region: String,
    pub city: String,
    pub district: String,
    pub coordinates: String,
    pub surrounding: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overview {
    pub description: String,
    pub highlights: Vec<String>,
}

/// Areas and counts stay display strings ("12.000 m²", "3 block").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scale {
    pub total_land_area: String,
    pub construction_area: String,
    pub floor_area: String,
    pub building_density: String,
    pub number_of_blocks: String,
    pub number_of_floors: String,
    pub number_of_units: String,
    pub green_area: String,
    pub parking: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Design {
    pub architecture_style: String,
    pub interior: String,
    pub floor_plans: String,
    pub unit_types: Vec<UnitType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitType {
    #[serde(rename = "type")]
    pub kind: String,
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Amenities {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    pub starting_price: String,
    pub price_range: String,
    pub price_per_sqm: String,
    pub payment_policy: String,
    pub promotion: String,
    pub maintenance_fee: String,
    pub management_fee: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policies {
    pub sales_policy: String,
    pub bank_support: String,
    pub loan_support: String,
    pub interest_rate_policy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gallery {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

// ── Contact submissions ──

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_record_tolerates_missing_fields() {
        let raw: RawRecord = serde_json::from_str(r#"{"name":"Peninsula"}"#).unwrap();
        assert_eq!(raw.name, "Peninsula");
        assert!(raw.tagline.is_none());
        assert!(raw.details.is_empty());
        assert!(raw.sections.is_empty());
    }

    #[test]
    fn media_kind_uses_type_key() {
        let raw: RawRecord = serde_json::from_str(
            r#"{"name":"x","media":[
                {"type":"image","url":"a.jpg"},
                {"type":"video","url":"b.mp4"},
                {"type":"pdf","url":"c.pdf"}
            ]}"#,
        )
        .unwrap();
        let kinds: Vec<MediaKind> = raw.media.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video, MediaKind::Other]);
    }

    #[test]
    fn nulls_read_as_empty() {
        let raws: Vec<RawRecord> = serde_json::from_str(
            r#"[
                {"name":null,"tagline":null,"details":[{"label":"Giá","value":null}]},
                {"name":"B","sections":[{"title":null,"paragraphs":["a",null,"b"],"facts":null}],"media":null}
            ]"#,
        )
        .unwrap();
        assert_eq!(raws[0].name, "");
        assert!(raws[0].tagline.is_none());
        assert_eq!(raws[0].details[0].label, "Giá");
        assert_eq!(raws[0].details[0].value, "");

        let section = &raws[1].sections[0];
        assert_eq!(section.title, "");
        assert_eq!(section.paragraphs, vec!["a", "b"]);
        assert!(section.facts.is_empty());
        assert!(raws[1].media.is_empty());
    }

    #[test]
    fn media_without_type_is_other() {
        let raw: RawRecord = serde_json::from_str(
            r#"{"name":"A","media":[{"url":"a.jpg"},{"type":null,"url":"b.jpg"},{"type":"image"}]}"#,
        )
        .unwrap();
        let kinds: Vec<MediaKind> = raw.media.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Other, MediaKind::Other, MediaKind::Image]);
        assert_eq!(raw.media[2].url, "");
    }

    #[test]
    fn normalized_record_uses_camel_case() {
        let mut rec = NormalizedRecord::default();
        rec.project_name = "Sun Cosmo".into();
        rec.design.unit_types.push(UnitType {
            kind: "Loại 1".into(),
            ..Default::default()
        });
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["projectName"], "Sun Cosmo");
        assert_eq!(json["scale"]["numberOfBlocks"], "");
        assert_eq!(json["design"]["unitTypes"][0]["type"], "Loại 1");
        assert_eq!(json["pricing"]["pricePerSqm"], "");
        assert!(json["attachments"].as_array().unwrap().is_empty());
    }
}
