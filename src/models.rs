use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, fixed-rate claim type with a display color.
///
/// Serialized with the backup document's wire names; `amount` carries the
/// unit amount in integer cents (30000 for $300).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub name: String,
    #[serde(rename = "amount")]
    pub amount_cents: i64,
    pub color: String,
}

/// One recorded instance of a category on a date.
///
/// `amount_each_cents` is a snapshot of the category's amount taken when
/// the claim is created, so later catalog edits never change what a stored
/// claim is worth. Claims are created and deleted, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: String,
    /// "YYYY-MM-DD".
    pub date_key: String,
    /// "YYYY-MM"; always the first seven characters of `date_key`.
    pub month_key: String,
    /// Soft reference into the catalog; the category may be gone.
    pub cat_key: String,
    pub qty: i64,
    #[serde(rename = "amountEach")]
    pub amount_each_cents: i64,
    #[serde(default)]
    pub note: Option<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}

impl Claim {
    /// Build a claim for `date_key`, freezing the category's current
    /// amount and deriving the month key. `qty` is clamped to at least 1
    /// and a blank note becomes no note.
    pub fn new(date_key: &str, category: &Category, qty: i64, note: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date_key: date_key.to_string(),
            month_key: month_key_of(date_key).to_string(),
            cat_key: category.key.clone(),
            qty: qty.max(1),
            amount_each_cents: category.amount_cents,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// qty x frozen unit amount, in cents.
    pub fn total_cents(&self) -> i64 {
        self.qty * self.amount_each_cents
    }
}

/// A free-text label attached to a calendar date, independent of claims.
///
/// Clearing a tag stores an empty string rather than deleting the record;
/// readers cannot tell the two states apart and both render as "no tag".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTag {
    pub date_key: String,
    #[serde(default)]
    pub tag: String,
}

/// "YYYY-MM-DD" key for a calendar date.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "YYYY-MM" key for the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The month key embedded in a date key (its first seven characters).
pub fn month_key_of(date_key: &str) -> &str {
    date_key.get(..7).unwrap_or(date_key)
}

/// Today's date key, local time.
pub fn today_date_key() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// The current month key, local time.
pub fn current_month_key() -> String {
    Local::now().date_naive().format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_category() -> Category {
        Category {
            key: "wk_full".to_string(),
            name: "Weekday full call".to_string(),
            amount_cents: 30000,
            color: "#22c55e".to_string(),
        }
    }

    #[test]
    fn month_key_is_date_key_prefix() {
        assert_eq!(month_key_of("2024-03-05"), "2024-03");
        assert_eq!(month_key_of("2024-12-31"), "2024-12");
    }

    #[test]
    fn month_key_of_short_input_passes_through() {
        assert_eq!(month_key_of("2024"), "2024");
    }

    #[test]
    fn new_claim_freezes_amount_and_derives_month() {
        let cat = test_category();
        let claim = Claim::new("2024-03-05", &cat, 2, Some("late finish"));
        assert_eq!(claim.month_key, "2024-03");
        assert_eq!(claim.amount_each_cents, 30000);
        assert_eq!(claim.total_cents(), 60000);
        assert_eq!(claim.note.as_deref(), Some("late finish"));
        assert!(!claim.id.is_empty());
    }

    #[test]
    fn new_claim_clamps_qty_and_drops_blank_note() {
        let cat = test_category();
        let claim = Claim::new("2024-03-05", &cat, 0, Some("   "));
        assert_eq!(claim.qty, 1);
        assert_eq!(claim.note, None);
    }

    #[test]
    fn claim_serializes_with_wire_names() {
        let cat = test_category();
        let claim = Claim::new("2024-03-05", &cat, 1, None);
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["dateKey"], "2024-03-05");
        assert_eq!(json["monthKey"], "2024-03");
        assert_eq!(json["catKey"], "wk_full");
        assert_eq!(json["amountEach"], 30000);
        assert!(json["createdAt"].is_i64());
    }

    #[test]
    fn date_keys_format_with_zero_padding() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(date_key(d), "2024-03-05");
        assert_eq!(month_key(d), "2024-03");
    }
}
