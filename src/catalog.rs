use crate::models::Category;

/// Swatch used for claims whose category no longer exists in the catalog.
pub const FALLBACK_COLOR: &str = "#94a3b8";

/// The ordered category list for one application session.
///
/// The catalog is session state handed to the aggregation functions;
/// it never lives in the store. Only bulk import replaces it, and
/// always wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The catalog seeded on first run.
    pub fn with_defaults() -> Self {
        Self::new(default_categories())
    }

    /// Categories in display order. This order also fixes the row order
    /// of monthly statistics.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by key. Claims hold a soft reference, so a
    /// missing key is an expected outcome, not an error.
    pub fn resolve(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// The display color for `key`, or the neutral fallback when the
    /// category is gone.
    pub fn color_for(&self, key: &str) -> &str {
        self.resolve(key)
            .map(|c| c.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Replace the whole catalog (bulk import). Stored claims keep their
    /// frozen amounts regardless.
    pub fn replace(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// The six seeded on-call claim categories, amounts in cents.
pub fn default_categories() -> Vec<Category> {
    [
        ("wk_full", "Weekday full call", 30000, "#22c55e"),
        ("weph_full", "Weekend/PH full call", 48000, "#60a5fa"),
        ("work_ph", "Work on public holiday", 25000, "#f59e0b"),
        ("we_round", "Weekend rounds", 24000, "#a78bfa"),
        ("wk_half", "Weekday half call", 15000, "#34d399"),
        ("we_half", "Weekend half call", 24000, "#fb7185"),
    ]
    .into_iter()
    .map(|(key, name, amount_cents, color)| Category {
        key: key.to_string(),
        name: name.to_string(),
        amount_cents,
        color: color.to_string(),
    })
    .collect()
}
