//! Restaurant name resolution.
//!
//! Maps free-text restaurant mentions to canonical ids. Two phases: a
//! case-insensitive full-name substring scan, then a fuzzy fallback that
//! scores restaurants by how many significant words (longer than 3
//! characters) they share with the text. A fuzzy match needs a score of at
//! least 2 to be accepted; a single shared word is not enough.
//!
//! Both indexes are built once at construction; resolution has no side
//! effects.

use std::collections::HashMap;

use crate::store::Restaurant;

/// Minimum word length considered significant for fuzzy matching.
const MIN_WORD_LEN: usize = 4;

/// Minimum fuzzy score (shared significant words) for a confident match.
const MIN_FUZZY_SCORE: u32 = 2;

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    name: String,
    name_lower: String,
    rating: f64,
}

/// Resolves restaurant mentions to ids.
#[derive(Debug)]
pub struct RestaurantResolver {
    entries: Vec<Entry>,
    /// Lowercased significant word -> entry indexes whose name contains it.
    word_index: HashMap<String, Vec<usize>>,
}

impl RestaurantResolver {
    pub fn new(restaurants: &[Restaurant]) -> Self {
        let entries: Vec<Entry> = restaurants
            .iter()
            .map(|r| Entry {
                id: r.id.clone(),
                name: r.name.clone(),
                name_lower: r.name.to_lowercase(),
                rating: r.rating,
            })
            .collect();

        let mut word_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            for word in entry.name_lower.split_whitespace() {
                if word.chars().count() >= MIN_WORD_LEN {
                    word_index.entry(word.to_string()).or_default().push(idx);
                }
            }
        }

        tracing::debug!(restaurants = entries.len(), "resolver index built");
        Self {
            entries,
            word_index,
        }
    }

    /// Resolve a restaurant mentioned anywhere in a free-text query.
    ///
    /// Returns `(id, name)` on a confident match. Exact full-name substring
    /// matches win; first match in store order on the (unlikely) chance that
    /// two names both occur in the text.
    pub fn resolve_from_query(&self, query: &str) -> Option<(String, String)> {
        let query_lower = query.to_lowercase();

        for entry in &self.entries {
            if query_lower.contains(&entry.name_lower) {
                return Some((entry.id.clone(), entry.name.clone()));
            }
        }

        self.best_fuzzy_match(&query_lower)
            .map(|entry| (entry.id.clone(), entry.name.clone()))
    }

    /// Resolve an isolated name string (e.g. a model-supplied `restaurant_id`
    /// that is really a name) to an id.
    pub fn resolve_id_from_name(&self, name: &str) -> Option<String> {
        let name_lower = name.to_lowercase();

        if let Some(entry) = self.entries.iter().find(|e| e.name_lower == name_lower) {
            return Some(entry.id.clone());
        }

        self.best_fuzzy_match(&name_lower).map(|e| e.id.clone())
    }

    /// Score every restaurant by shared significant words and pick the best.
    ///
    /// Ties are broken deterministically: higher score, then higher rating,
    /// then lexically smaller id.
    fn best_fuzzy_match(&self, text_lower: &str) -> Option<&Entry> {
        let mut scores: HashMap<usize, u32> = HashMap::new();

        for word in text_lower.split_whitespace() {
            if word.chars().count() < MIN_WORD_LEN {
                continue;
            }
            if let Some(indexes) = self.word_index.get(word) {
                for &idx in indexes {
                    *scores.entry(idx).or_insert(0) += 1;
                }
            }
        }

        scores
            .into_iter()
            .filter(|(_, score)| *score >= MIN_FUZZY_SCORE)
            .map(|(idx, score)| (&self.entries[idx], score))
            .max_by(|(a, sa), (b, sb)| {
                sa.cmp(sb)
                    .then_with(|| a.rating.total_cmp(&b.rating))
                    // Reversed so the smaller id wins when all else is equal.
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|(entry, _)| entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Hours, TableInventory, Tables};

    fn restaurant(id: &str, name: &str, rating: f64) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: name.to_string(),
            location: "Downtown".to_string(),
            cuisine: "Italian".to_string(),
            capacity: 40,
            tables: Tables {
                small: TableInventory { capacity: 2, count: 4 },
                medium: TableInventory { capacity: 4, count: 4 },
                large: TableInventory { capacity: 8, count: 2 },
            },
            hours: Hours {
                open: "11:00".to_string(),
                close: "22:00".to_string(),
            },
            price_range: "$$".to_string(),
            features: vec![],
            description: String::new(),
            rating,
        }
    }

    fn resolver() -> RestaurantResolver {
        RestaurantResolver::new(&[
            restaurant("rest001", "Golden Dragon Palace", 4.2),
            restaurant("rest002", "Silver Bistro", 4.6),
            restaurant("rest003", "Rustic Garden Table", 4.0),
        ])
    }

    #[test]
    fn exact_name_inside_query_resolves() {
        let r = resolver();
        let (id, name) = r
            .resolve_from_query("Can I book a table at Silver Bistro for two?")
            .unwrap();
        assert_eq!(id, "rest002");
        assert_eq!(name, "Silver Bistro");
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let r = resolver();
        let (id, _) = r.resolve_from_query("book at GOLDEN DRAGON PALACE").unwrap();
        assert_eq!(id, "rest001");
    }

    #[test]
    fn two_shared_words_resolve_fuzzily() {
        let r = resolver();
        let (id, _) = r
            .resolve_from_query("is the golden palace open tonight?")
            .unwrap();
        assert_eq!(id, "rest001");
    }

    #[test]
    fn single_shared_word_does_not_resolve() {
        let r = resolver();
        assert!(r.resolve_from_query("any good palace around here?").is_none());
        assert!(r.resolve_from_query("something rustic please").is_none());
    }

    #[test]
    fn short_words_are_ignored(){
        // "the" appears nowhere in the index even though it is in a name.
        let r = RestaurantResolver::new(&[restaurant("rest009", "The Red Table", 4.1)]);
        assert!(r.resolve_from_query("the red one").is_none());
    }

    #[test]
    fn id_from_name_exact_then_fuzzy() {
        let r = resolver();
        assert_eq!(
            r.resolve_id_from_name("silver bistro"),
            Some("rest002".to_string())
        );
        assert_eq!(
            r.resolve_id_from_name("rustic garden"),
            Some("rest003".to_string())
        );
        assert_eq!(r.resolve_id_from_name("unknown spot"), None);
    }

    #[test]
    fn fuzzy_ties_break_on_rating_then_id() {
        // Both share "ocean" and "grill" with the query; the higher-rated one
        // must win regardless of index order.
        let r = RestaurantResolver::new(&[
            restaurant("rest010", "Ocean Grill House", 4.0),
            restaurant("rest011", "Ocean Grill Lounge", 4.8),
        ]);
        assert_eq!(
            r.resolve_id_from_name("ocean grill"),
            Some("rest011".to_string())
        );

        // Equal ratings: lexically smaller id wins.
        let r = RestaurantResolver::new(&[
            restaurant("rest021", "Ocean Grill Lounge", 4.5),
            restaurant("rest020", "Ocean Grill House", 4.5),
        ]);
        assert_eq!(
            r.resolve_id_from_name("ocean grill"),
            Some("rest020".to_string())
        );
    }
}
