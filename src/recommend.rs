//! Hit-count ranking and product recommendations
//!
//! Turns the per-label hit tally of a session into the two lists shown on the
//! final screen: the most-hit priorities and the best-matching products.
//! Everything here is a pure function of the tally and the catalog, so
//! re-running it on an unchanged tally yields the same order.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Shown when nothing was hit
pub const NO_PRIORITIES_TEXT: &str = "No priorities selected";
/// Shown when no product matches any hit label
pub const NO_RECOMMENDATIONS_TEXT: &str = "Play again to get personalized recommendations!";

/// Per-label hit counter that remembers first-hit order
///
/// Ties in every ranking are broken by this order, so a plain hash map
/// won't do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitTally {
    entries: Vec<(String, u32)>,
}

impl HitTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one destroyed target; returns the label's new total
    pub fn record(&mut self, label: &str) -> u32 {
        if let Some((_, hits)) = self.entries.iter_mut().find(|(l, _)| l == label) {
            *hits += 1;
            *hits
        } else {
            self.entries.push((label.to_string(), 1));
            1
        }
    }

    /// Hits recorded for `label` (0 if never hit)
    pub fn get(&self, label: &str) -> u32 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, hits)| *hits)
            .unwrap_or(0)
    }

    /// Entries in first-hit order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(l, h)| (l.as_str(), *h))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all hits
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, h)| h).sum()
    }

    /// Forget every hit
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// One row of the top-priorities list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedPriority {
    pub label: String,
    pub hits: u32,
}

/// One recommended product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
    /// Sum of hits over the product's matched labels
    pub score: u32,
    /// Matched labels, in catalog order
    pub matched: Vec<String>,
}

/// Final-screen content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub top_priorities: Vec<RankedPriority>,
    pub recommendations: Vec<Recommendation>,
}

impl Summary {
    /// `"Label (3x), Label (1x)"`
    pub fn format_priorities(&self) -> String {
        self.top_priorities
            .iter()
            .map(|p| format!("{} ({}x)", p.label, p.hits))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-joined product names
    pub fn recommended_names(&self) -> String {
        self.recommendations
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Top `n` labels by hit count, descending; ties keep first-hit order
pub fn top_priorities(tally: &HitTally, n: usize) -> Vec<RankedPriority> {
    let mut ranked: Vec<RankedPriority> = tally
        .iter()
        .map(|(label, hits)| RankedPriority {
            label: label.to_string(),
            hits,
        })
        .collect();
    // Stable sort keeps insertion order among equal counts
    ranked.sort_by(|a, b| b.hits.cmp(&a.hits));
    ranked.truncate(n);
    ranked
}

/// Top `n` products by relevance, descending; ties keep catalog order.
/// Products without a single hit label are left out.
pub fn rank_products(tally: &HitTally, catalog: &Catalog, n: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = catalog
        .products
        .iter()
        .filter_map(|product| {
            let matched: Vec<String> = product
                .priorities
                .iter()
                .filter(|p| tally.get(p) > 0)
                .cloned()
                .collect();
            if matched.is_empty() {
                return None;
            }
            let score = matched.iter().map(|p| tally.get(p)).sum();
            Some(Recommendation {
                name: product.name.clone(),
                description: product.description.clone(),
                score,
                matched,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(n);
    ranked
}

/// Both final-screen lists at once
pub fn summarize(
    tally: &HitTally,
    catalog: &Catalog,
    priority_count: usize,
    product_count: usize,
) -> Summary {
    Summary {
        top_priorities: top_priorities(tally, priority_count),
        recommendations: rank_products(tally, catalog, product_count),
    }
}
