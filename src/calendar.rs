use std::collections::BTreeMap;

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::catalog::Catalog;
use crate::models::{Claim, month_key};

/// At most this many category dots are shown per calendar cell.
pub const DAY_DOT_LIMIT: usize = 8;

/// What a calendar cell needs to render one day: a capped list of
/// category colors, one per claim, and the day's tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub colors: Vec<String>,
    pub tag: String,
}

/// Fold one month's claims and tags into per-day summaries.
///
/// Days with no claims and no non-empty tag produce no entry at all, so
/// the map stays sparse over a mostly empty month. Claims keep their
/// listing order within a day; past the dot limit, further claims add to
/// the day without adding colors.
pub fn month_summaries(
    claims: &[Claim],
    tags: &BTreeMap<String, String>,
    catalog: &Catalog,
) -> BTreeMap<String, DaySummary> {
    let mut days: BTreeMap<String, DaySummary> = BTreeMap::new();

    for claim in claims {
        let entry = days.entry(claim.date_key.clone()).or_default();
        if entry.colors.len() < DAY_DOT_LIMIT {
            entry.colors.push(catalog.color_for(&claim.cat_key).to_string());
        }
    }

    for (date_key, tag) in tags {
        if tag.is_empty() {
            continue;
        }
        days.entry(date_key.clone()).or_default().tag = tag.clone();
    }

    days
}

/// The `n` most recent month keys, current month first.
pub fn recent_month_keys(n: u32) -> Vec<String> {
    recent_month_keys_from(Local::now().date_naive(), n)
}

fn recent_month_keys_from(today: NaiveDate, n: u32) -> Vec<String> {
    let first = today.with_day(1).unwrap_or(today);
    (0..n)
        .map(|i| month_key(first - Months::new(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Category {
                key: "wk_full".into(),
                name: "Weekday full".into(),
                amount_cents: 30000,
                color: "#22c55e".into(),
            },
            Category {
                key: "we_half".into(),
                name: "Weekend half".into(),
                amount_cents: 24000,
                color: "#34d399".into(),
            },
        ])
    }

    fn claim_on(date_key: &str, cat_key: &str) -> Claim {
        Claim {
            id: format!("{date_key}-{cat_key}"),
            date_key: date_key.into(),
            month_key: date_key[..7].to_string(),
            cat_key: cat_key.into(),
            qty: 1,
            amount_each_cents: 30000,
            note: None,
            created_at: 0,
        }
    }

    #[test]
    fn colors_follow_claims_in_order() {
        let claims = vec![
            claim_on("2025-03-10", "wk_full"),
            claim_on("2025-03-10", "we_half"),
        ];
        let days = month_summaries(&claims, &BTreeMap::new(), &catalog());

        let day = &days["2025-03-10"];
        assert_eq!(day.colors, vec!["#22c55e", "#34d399"]);
        assert_eq!(day.tag, "");
    }

    #[test]
    fn dots_cap_at_the_limit() {
        let claims: Vec<Claim> = (0..12).map(|_| claim_on("2025-03-05", "wk_full")).collect();
        let days = month_summaries(&claims, &BTreeMap::new(), &catalog());

        assert_eq!(days["2025-03-05"].colors.len(), DAY_DOT_LIMIT);
    }

    #[test]
    fn unknown_category_falls_back_to_neutral() {
        let claims = vec![claim_on("2025-03-07", "retired_key")];
        let days = month_summaries(&claims, &BTreeMap::new(), &catalog());

        assert_eq!(days["2025-03-07"].colors, vec![crate::catalog::FALLBACK_COLOR]);
    }

    #[test]
    fn empty_tags_do_not_create_days() {
        let mut tags = BTreeMap::new();
        tags.insert("2025-03-02".to_string(), String::new());
        tags.insert("2025-03-03".to_string(), "oncall".to_string());

        let days = month_summaries(&[], &tags, &catalog());

        assert!(!days.contains_key("2025-03-02"));
        assert_eq!(days["2025-03-03"].tag, "oncall");
        assert!(days["2025-03-03"].colors.is_empty());
    }

    #[test]
    fn tag_joins_claims_on_the_same_day() {
        let claims = vec![claim_on("2025-03-15", "wk_full")];
        let mut tags = BTreeMap::new();
        tags.insert("2025-03-15".to_string(), "holiday".to_string());

        let days = month_summaries(&claims, &tags, &catalog());

        assert_eq!(days.len(), 1);
        assert_eq!(days["2025-03-15"].colors.len(), 1);
        assert_eq!(days["2025-03-15"].tag, "holiday");
    }

    #[test]
    fn recent_months_cross_year_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let keys = recent_month_keys_from(today, 4);
        assert_eq!(keys, vec!["2025-02", "2025-01", "2024-12", "2024-11"]);
    }
}
