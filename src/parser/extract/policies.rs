use std::sync::LazyLock;

use regex::Regex;

use super::Sources;
use crate::model::Policies;
use crate::parser::sections::{find_fact, header_block, section_text, POLICY_TITLES};

static SALES_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CHÍNH SÁCH BÁN HÀNG[:\s]*").unwrap());
static SALES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:chính sách bán hàng|chính sách)[:\s]+([^.\n]+)").unwrap()
});
static BANK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:ngân hàng|bank|hỗ trợ vay|vay)[:\s]+([^.\n]+)").unwrap()
});
static LOAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:hỗ trợ vay|loan support|vay vốn)[:\s]+([^.\n]+)").unwrap()
});
static INTEREST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:lãi suất|interest rate)[:\s]+([^.\n]+)").unwrap());
static OWNERSHIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:pháp lý|hình thức sở hữu|sở hữu)[:\s]+([^.\n]+)").unwrap()
});

pub fn extract(src: &Sources) -> Policies {
    let policy = src.section(POLICY_TITLES);

    let sales_policy = section_text(policy, "\n")
        .or_else(|| {
            header_block(src.description, &SALES_HEADER_RE)
                .filter(|b| !b.is_empty())
                .map(String::from)
        })
        .or_else(|| src.describe(&SALES_RE))
        .unwrap_or_default();

    let bank_support = find_fact(policy, &["ngân hàng", "bank", "hỗ trợ vay"])
        .or_else(|| src.mentioning(&["ngân hàng", "bank", "vay"]))
        .or_else(|| src.describe(&BANK_RE))
        .unwrap_or_default();

    let loan_support = find_fact(policy, &["vay", "loan", "hỗ trợ"])
        .or_else(|| Some(bank_support.clone()).filter(|b| !b.is_empty()))
        .or_else(|| src.describe(&LOAN_RE))
        .unwrap_or_default();

    let interest_rate_policy = find_fact(policy, &["lãi suất", "interest"])
        .or_else(|| src.describe(&INTEREST_RE))
        .unwrap_or_default();

    Policies {
        sales_policy,
        bank_support,
        loan_support,
        interest_rate_policy,
    }
}

pub fn ownership(src: &Sources) -> String {
    src.detail(&["sở hữu", "ownership", "quyền sở hữu", "pháp lý"])
        .or_else(|| find_fact(src.section(POLICY_TITLES), &["sở hữu", "ownership", "pháp lý"]))
        .or_else(|| src.describe(&OWNERSHIP_RE))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Detail, RawRecord, RawSection};

    #[test]
    fn sales_policy_from_description_block() {
        let raw = RawRecord::default();
        let desc = "IV/ CHÍNH SÁCH BÁN HÀNG: Chiết khấu 5% khi thanh toán sớm\nV/ LIÊN HỆ";
        let p = extract(&Sources {
            raw: &raw,
            description: desc,
        });
        assert_eq!(p.sales_policy, "Chiết khấu 5% khi thanh toán sớm");
    }

    #[test]
    fn sales_policy_keeps_handover_quarter() {
        let raw = RawRecord::default();
        let desc = "V/ CHÍNH SÁCH BÁN HÀNG: Bàn giao Quý IV/2026, chiết khấu 5%\nVI/ LIÊN HỆ";
        let p = extract(&Sources {
            raw: &raw,
            description: desc,
        });
        assert_eq!(p.sales_policy, "Bàn giao Quý IV/2026, chiết khấu 5%");
    }

    #[test]
    fn loan_support_falls_back_to_bank() {
        let raw = RawRecord {
            sections: vec![RawSection {
                title: "Chính sách".into(),
                paragraphs: vec!["Ưu đãi mùa mở bán".into()],
                facts: vec![
                    Detail {
                        label: "Ngân hàng".into(),
                        value: "Vietcombank cho vay 70%".into(),
                    },
                    Detail {
                        label: "Lãi suất".into(),
                        value: "0% trong 24 tháng".into(),
                    },
                ],
            }],
            ..Default::default()
        };
        let p = extract(&Sources {
            raw: &raw,
            description: "",
        });
        assert_eq!(p.sales_policy, "Ưu đãi mùa mở bán");
        assert_eq!(p.bank_support, "Vietcombank cho vay 70%");
        assert_eq!(p.loan_support, "Vietcombank cho vay 70%");
        assert_eq!(p.interest_rate_policy, "0% trong 24 tháng");
    }

    #[test]
    fn ownership_cascade() {
        let raw = RawRecord {
            details: vec![Detail {
                label: "Hình thức sở hữu".into(),
                value: "Sổ hồng lâu dài".into(),
            }],
            ..Default::default()
        };
        let src = Sources {
            raw: &raw,
            description: "Pháp lý: đang hoàn thiện",
        };
        assert_eq!(ownership(&src), "Sổ hồng lâu dài");

        let bare = RawRecord::default();
        let src = Sources {
            raw: &bare,
            description: "Pháp lý: đang hoàn thiện. Giá tốt",
        };
        assert_eq!(ownership(&src), "đang hoàn thiện");
    }

    #[test]
    fn empty_record_has_empty_policies() {
        let raw = RawRecord::default();
        let p = extract(&Sources {
            raw: &raw,
            description: "",
        });
        assert_eq!(p, Policies::default());
    }
}
