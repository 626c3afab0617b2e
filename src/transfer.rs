use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::db;
use crate::error::{Error, Result};
use crate::models::{Category, Claim, DayTag, month_key_of};

pub const EXPORT_VERSION: u32 = 1;

/// Everything a backup carries: the catalog, all claims and all day
/// tags. Settings never leave the store, so a restored store starts
/// with preferences reset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: u32,
    pub exported_at: String,
    pub categories: Vec<Category>,
    pub claims: Vec<Claim>,
    pub day_tags: Vec<DayTag>,
}

impl ExportDocument {
    /// Pretty-printed JSON, the shape written to a backup file.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Snapshot the whole store into a backup document.
pub fn export_document(conn: &Connection, catalog: &Catalog) -> Result<ExportDocument> {
    Ok(ExportDocument {
        version: EXPORT_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        categories: catalog.categories().to_vec(),
        claims: db::list_all_claims(conn)?,
        day_tags: db::list_all_day_tags(conn)?,
    })
}

/// Suggested file name for a backup taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("allowance-tracker-{}.json", date.format("%Y-%m-%d"))
}

// Incoming documents are looser than what we export: ids, month keys and
// timestamps may be missing and get filled in here, and the whole
// categories or dayTags section may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    categories: Vec<Category>,
    claims: Vec<RawClaim>,
    #[serde(default)]
    day_tags: Vec<RawTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClaim {
    id: Option<String>,
    date_key: String,
    month_key: Option<String>,
    cat_key: String,
    qty: i64,
    #[serde(rename = "amountEach")]
    amount_each_cents: i64,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    created_at: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTag {
    date_key: Option<String>,
    tag: Option<String>,
}

/// A parsed, normalized backup ready to be applied.
#[derive(Debug)]
pub struct ImportDocument {
    pub categories: Vec<Category>,
    pub claims: Vec<Claim>,
    pub day_tags: Vec<DayTag>,
}

/// Parse and normalize a backup document without touching the store.
///
/// Rejects anything that is not a JSON object with a `claims` array.
/// Claims missing an id get a fresh one and missing month keys are
/// derived from the date key; tag entries without a date key are
/// dropped.
pub fn parse_document(json: &str) -> Result<ImportDocument> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(Error::InvalidDocument("not a JSON object"));
    }
    if !value.get("claims").is_some_and(|c| c.is_array()) {
        return Err(Error::InvalidDocument("\"claims\" must be an array"));
    }
    let raw: RawDocument = serde_json::from_value(value)?;

    let claims = raw
        .claims
        .into_iter()
        .map(|c| {
            let month_key = c
                .month_key
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| month_key_of(&c.date_key).to_string());
            Claim {
                id: c
                    .id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                date_key: c.date_key,
                month_key,
                cat_key: c.cat_key,
                qty: c.qty,
                amount_each_cents: c.amount_each_cents,
                note: c.note,
                created_at: c.created_at,
            }
        })
        .collect();

    let day_tags = raw
        .day_tags
        .into_iter()
        .filter_map(|t| {
            let date_key = t.date_key.filter(|d| !d.is_empty())?;
            Some(DayTag {
                date_key,
                tag: t.tag.unwrap_or_default(),
            })
        })
        .collect();

    Ok(ImportDocument {
        categories: raw.categories,
        claims,
        day_tags,
    })
}

/// Replace the store's contents with the document's.
///
/// Destructive: wipes claims, day tags and settings first, and settings
/// stay gone since backups never carry them. Callers confirm with the
/// user before getting here. A document with no categories keeps the
/// current catalog.
pub fn import_replace(
    conn: &Connection,
    catalog: &mut Catalog,
    document: ImportDocument,
) -> Result<()> {
    let ImportDocument {
        categories,
        claims,
        day_tags,
    } = document;

    db::wipe_all(conn)?;

    if !categories.is_empty() {
        catalog.replace(categories);
    }
    for claim in &claims {
        db::put_claim(conn, claim)?;
    }
    for tag in &day_tags {
        db::set_day_tag(conn, &tag.date_key, &tag.tag)?;
    }

    info!(
        claims = claims.len(),
        day_tags = day_tags.len(),
        "replaced store contents from import"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "allowance-tracker-2025-03-09.json");
    }

    #[test]
    fn rejects_documents_that_are_not_objects() {
        assert!(matches!(
            parse_document("[1, 2, 3]"),
            Err(Error::InvalidDocument(_))
        ));
        assert!(matches!(
            parse_document("null"),
            Err(Error::InvalidDocument(_))
        ));
    }

    #[test]
    fn rejects_claims_that_are_not_an_array() {
        let err = parse_document(r#"{"claims": "not-an-array"}"#);
        assert!(matches!(err, Err(Error::InvalidDocument(_))));

        let err = parse_document(r#"{"version": 1}"#);
        assert!(matches!(err, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn fills_in_missing_claim_fields() {
        let json = r#"{
            "claims": [
                {"dateKey": "2025-03-10", "catKey": "wk_full", "qty": 2, "amountEach": 30000}
            ]
        }"#;
        let doc = parse_document(json).unwrap();

        let claim = &doc.claims[0];
        assert!(!claim.id.is_empty());
        assert_eq!(claim.month_key, "2025-03");
        assert_eq!(claim.created_at, 0);
        assert_eq!(claim.note, None);
    }

    #[test]
    fn keeps_supplied_ids_and_month_keys() {
        let json = r#"{
            "claims": [
                {"id": "abc", "dateKey": "2025-03-10", "monthKey": "2025-03",
                 "catKey": "wk_full", "qty": 1, "amountEach": 30000,
                 "note": "swap", "createdAt": 1741600000000}
            ]
        }"#;
        let doc = parse_document(json).unwrap();

        let claim = &doc.claims[0];
        assert_eq!(claim.id, "abc");
        assert_eq!(claim.note.as_deref(), Some("swap"));
        assert_eq!(claim.created_at, 1741600000000);
    }

    #[test]
    fn drops_tags_without_a_date_key() {
        let json = r#"{
            "claims": [],
            "dayTags": [
                {"tag": "orphan"},
                {"dateKey": "", "tag": "blank"},
                {"dateKey": "2025-03-01", "tag": "oncall"},
                {"dateKey": "2025-03-02"}
            ]
        }"#;
        let doc = parse_document(json).unwrap();

        assert_eq!(doc.day_tags.len(), 2);
        assert_eq!(doc.day_tags[0].date_key, "2025-03-01");
        assert_eq!(doc.day_tags[0].tag, "oncall");
        assert_eq!(doc.day_tags[1].tag, "");
    }

    #[test]
    fn absent_sections_default_to_empty() {
        let doc = parse_document(r#"{"claims": []}"#).unwrap();
        assert!(doc.categories.is_empty());
        assert!(doc.day_tags.is_empty());
    }
}
