use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::db::{StoredContact, StoredProject};

static PRICE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Projects ──

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub city: Option<String>,
    pub district: Option<String>,
    pub investor: Option<String>,
    pub legal_status: Option<String>,
    /// Case-insensitive substring over name, slogan, summary and address.
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &StoredProject) -> bool {
        let r = &project.record;
        if !equals(&self.city, &r.location.city)
            || !equals(&self.district, &r.location.district)
            || !equals(&self.legal_status, &r.legal_status)
        {
            return false;
        }
        if let Some(investor) = &self.investor {
            if !r.investor.contains(investor.as_str()) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = [&r.project_name, &r.slogan, &r.summary, &r.location.address]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let Some(price) = price_value(&r.pricing.price_per_sqm) else {
                return false;
            };
            if self.min_price.is_some_and(|min| price < min)
                || self.max_price.is_some_and(|max| price > max)
            {
                return false;
            }
        }
        true
    }
}

fn equals(wanted: &Option<String>, actual: &str) -> bool {
    wanted.as_deref().map_or(true, |w| w == actual)
}

/// First number in a display price ("32,5 - 38 triệu/m²" → 32.5).
pub fn price_value(price: &str) -> Option<f64> {
    PRICE_NUMBER_RE
        .find(price)
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

pub fn filter_projects(projects: Vec<StoredProject>, filter: &ProjectFilter) -> Vec<StoredProject> {
    projects.into_iter().filter(|p| filter.matches(p)).collect()
}

// ── Pagination ──

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub has_more: bool,
}

/// 1-based pages. Page 0 is treated as page 1; a zero page size yields
/// nothing.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let items: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    let has_more = start + items.len() < total;
    Page {
        items,
        total,
        has_more,
    }
}

// ── Contacts ──

#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    pub service: Option<String>,
    /// Case-insensitive substring of the submitter's name.
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContactFilter {
    pub fn matches(&self, contact: &StoredContact) -> bool {
        // "all" is the catch-all service.
        let service = self.service.as_deref().filter(|s| *s != "all");
        if service.is_some_and(|s| s != contact.form.service) {
            return false;
        }
        if let Some(name) = &self.name {
            if !contact.form.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Ok(created) = NaiveDateTime::parse_from_str(&contact.created_at, TIMESTAMP_FORMAT)
        else {
            return false;
        };
        let day = created.date();
        self.start_date.map_or(true, |s| day >= s) && self.end_date.map_or(true, |e| day <= e)
    }
}

pub fn filter_contacts(contacts: Vec<StoredContact>, filter: &ContactFilter) -> Vec<StoredContact> {
    contacts.into_iter().filter(|c| filter.matches(c)).collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContactForm, NormalizedRecord};

    fn project(name: &str, city: &str, investor: &str, price: &str) -> StoredProject {
        let mut record = NormalizedRecord::default();
        record.project_name = name.into();
        record.location.city = city.into();
        record.investor = investor.into();
        record.pricing.price_per_sqm = price.into();
        StoredProject {
            id: name.to_lowercase(),
            created_at: "2025-03-01 08:00:00".into(),
            updated_at: "2025-03-01 08:00:00".into(),
            record,
        }
    }

    fn contact(name: &str, service: &str, created_at: &str) -> StoredContact {
        StoredContact {
            id: name.into(),
            created_at: created_at.into(),
            form: ContactForm {
                name: name.into(),
                service: service.into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn price_parsing() {
        assert_eq!(price_value("32,5 - 38 triệu/m²"), Some(32.5));
        assert_eq!(price_value("Từ 45 triệu"), Some(45.0));
        assert_eq!(price_value("Liên hệ"), None);
    }

    #[test]
    fn filters_combine() {
        let all = vec![
            project("Sun Cosmo", "Đà Nẵng", "Sun Group", "55 triệu/m²"),
            project("Regal Hoà Xuân", "Đà Nẵng", "Đất Xanh và Regal", "32 triệu/m²"),
            project("Vinhomes Huế", "Huế", "Vingroup", ""),
        ];

        let f = ProjectFilter {
            city: Some("Đà Nẵng".into()),
            ..Default::default()
        };
        assert_eq!(filter_projects(all.clone(), &f).len(), 2);

        let f = ProjectFilter {
            investor: Some("Regal".into()),
            ..Default::default()
        };
        assert_eq!(filter_projects(all.clone(), &f)[0].record.project_name, "Regal Hoà Xuân");

        let f = ProjectFilter {
            search: Some("HOÀ XUÂN".into()),
            ..Default::default()
        };
        assert_eq!(filter_projects(all.clone(), &f).len(), 1);

        // Unpriced records drop out once a bound is given.
        let f = ProjectFilter {
            min_price: Some(40.0),
            ..Default::default()
        };
        let found = filter_projects(all.clone(), &f);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.project_name, "Sun Cosmo");

        let f = ProjectFilter {
            max_price: Some(40.0),
            ..Default::default()
        };
        assert_eq!(filter_projects(all, &f).len(), 1);
    }

    #[test]
    fn pagination() {
        let items: Vec<u32> = (1..=5).collect();
        let p = paginate(items.clone(), 1, 2);
        assert_eq!(p.items, vec![1, 2]);
        assert_eq!(p.total, 5);
        assert!(p.has_more);

        let p = paginate(items.clone(), 3, 2);
        assert_eq!(p.items, vec![5]);
        assert!(!p.has_more);

        let p = paginate(items.clone(), 4, 2);
        assert!(p.items.is_empty());
        assert!(!p.has_more);

        assert_eq!(paginate(items, 0, 2).items, vec![1, 2]);
    }

    #[test]
    fn contact_filters() {
        let all = vec![
            contact("Nguyễn Văn A", "mua-ban", "2025-03-01 08:00:00"),
            contact("Trần Thị B", "cho-thue", "2025-03-05 23:59:59"),
            contact("nguyễn thị C", "mua-ban", "2025-03-10 00:00:00"),
        ];

        let f = ContactFilter {
            service: Some("mua-ban".into()),
            ..Default::default()
        };
        assert_eq!(filter_contacts(all.clone(), &f).len(), 2);

        let f = ContactFilter {
            service: Some("all".into()),
            ..Default::default()
        };
        assert_eq!(filter_contacts(all.clone(), &f).len(), 3);

        let f = ContactFilter {
            name: Some("NGUYỄN".into()),
            ..Default::default()
        };
        assert_eq!(filter_contacts(all.clone(), &f).len(), 2);

        let f = ContactFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 5),
            ..Default::default()
        };
        let found = filter_contacts(all, &f);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].form.name, "Trần Thị B");
    }
}
