use super::Sources;
use crate::model::Pricing;
use crate::parser::sections::{find_fact, POLICY_TITLES};

const PRICE_LABELS: &[&str] = &["giá", "price", "giá bán"];
const PAYMENT_TERMS: &[&str] = &["thanh toán", "payment", "trả góp"];
const PROMOTION_TERMS: &[&str] = &["ưu đãi", "promotion", "khuyến mãi"];

/// Tokens that already mark a price as per square metre.
const PER_SQM_TOKENS: &[&str] = &["/m2", "/m²", "/ m2", "/ m²"];

pub fn extract(src: &Sources) -> Pricing {
    let policy = src.section(POLICY_TITLES);
    let per_sqm = src
        .detail(PRICE_LABELS)
        .map(|p| per_sqm(&p))
        .unwrap_or_default();

    Pricing {
        starting_price: src
            .detail(&["giá từ", "giá khởi điểm", "starting price"])
            .unwrap_or_default(),
        price_range: per_sqm.clone(),
        price_per_sqm: per_sqm,
        payment_policy: find_fact(policy, PAYMENT_TERMS)
            .or_else(|| src.mentioning(PAYMENT_TERMS))
            .unwrap_or_default(),
        promotion: find_fact(policy, PROMOTION_TERMS)
            .or_else(|| src.mentioning(PROMOTION_TERMS))
            .unwrap_or_default(),
        maintenance_fee: src.detail(&["phí bảo trì"]).unwrap_or_default(),
        management_fee: src.detail(&["phí quản lý"]).unwrap_or_default(),
    }
}

/// "55 triệu" becomes "55 triệu/m²"; anything already per-m², or without a
/// currency-scale word, passes through.
pub fn per_sqm(price: &str) -> String {
    if PER_SQM_TOKENS.iter().any(|t| price.contains(t)) {
        return price.to_string();
    }
    if price.contains("triệu") {
        return format!("{}/m²", price);
    }
    price.to_string()
}
