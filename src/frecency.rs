//! A generic frecency map: keys ranked by a combined frequency/recency
//! score with exponential decay.
//!
//! Scores are kept in log-space so that a visit "now" can be folded into an
//! arbitrarily old score without ever materializing huge exponentials. The
//! update rule follows Mozilla's revised frecency definition:
//! <https://wiki.mozilla.org/User:Jesse/NewFrecency#Proposed_new_definition>

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::time::{SystemTime, UNIX_EPOCH};

/// Half-life of thirty days, expressed as an exponential decay rate per
/// second.
const DECAY_RATE: f64 = std::f64::consts::LN_2 / (30.0 * 24.0 * 60.0 * 60.0);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Frecency<T>
where
    T: Hash + Eq + Clone,
{
    // Ordering is enforced on access, not on store. Visiting is a far more
    // frequent operation than listing for this tool.
    scores: HashMap<T, f64>,
    max_size: usize,
}

impl<T> Frecency<T>
where
    T: Hash + Eq + Clone,
{
    pub fn new(max_size: usize) -> Self {
        Frecency {
            scores: HashMap::new(),
            max_size,
        }
    }

    /// Record a visit to `key` at the current time.
    pub fn visit(&mut self, key: T) {
        self.visit_at(key, unix_now_secs());
    }

    /// Record a visit at an explicit Unix timestamp (seconds).
    pub fn visit_at(&mut self, key: T, now_secs: f64) {
        let now_decay = now_secs * DECAY_RATE;
        match self.scores.entry(key) {
            Entry::Occupied(mut e) => {
                let score = e.get_mut();
                *score = ((*score - now_decay).exp() + 1.0).ln() + now_decay;
            }
            Entry::Vacant(e) => {
                e.insert(now_decay);
            }
        }
        while self.scores.len() > self.max_size {
            self.evict_min();
        }
    }

    /// Insert a key with an explicit raw score, replacing any existing one.
    /// Used when applying user edits back to the database.
    pub fn set_score(&mut self, key: T, score: f64) {
        self.scores.insert(key, score);
        while self.scores.len() > self.max_size {
            self.evict_min();
        }
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&mut self, key: &T) -> bool {
        self.scores.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn evict_min(&mut self) {
        let min_key = self
            .scores
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k.clone());
        if let Some(min) = min_key {
            self.scores.remove(&min);
        }
    }

    /// Entries ordered by descending score. No NaN scores exist by
    /// construction, so `total_cmp` gives the obvious ordering.
    pub fn items_with_scores(&self) -> Vec<(&T, f64)> {
        let mut v: Vec<(&T, f64)> = self.scores.iter().map(|(k, s)| (k, *s)).collect();
        v.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        v
    }

    /// Entries ordered by descending score, each score min-max normalized
    /// into [0, 1]. A lone entry normalizes to 1.
    pub fn normalized_items(&self) -> Vec<(&T, f64)> {
        let items = self.items_with_scores();
        let (max, min) = match (items.first(), items.last()) {
            (Some(first), Some(last)) => (first.1, last.1),
            _ => return Vec::new(),
        };
        let range = max - min;
        items
            .into_iter()
            .map(|(k, s)| {
                let norm = if range > 0.0 { (s - min) / range } else { 1.0 };
                (k, norm)
            })
            .collect()
    }
}

fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisited_key_outranks_single_visit() {
        let mut f = Frecency::<String>::new(100);
        f.visit_at("foo".to_string(), 10.0);
        f.visit_at("bar".to_string(), 20.0);
        f.visit_at("foo".to_string(), 50.0);
        let items: Vec<&String> = f.items_with_scores().into_iter().map(|(k, _)| k).collect();
        assert_eq!(items, vec!["foo", "bar"]);
    }

    #[test]
    fn test_capacity_evicts_minimum() {
        let mut f = Frecency::<&str>::new(2);
        f.visit_at("foo", 10.0);
        assert_eq!(f.len(), 1);
        f.visit_at("bar", 10.0);
        f.visit_at("bar", 10.0);
        f.visit_at("bar", 20.0);
        let items: Vec<&&str> = f.items_with_scores().into_iter().map(|(k, _)| k).collect();
        assert_eq!(items, vec![&"bar", &"foo"]);
        f.visit_at("baz", 30.0);
        let items: Vec<&&str> = f.items_with_scores().into_iter().map(|(k, _)| k).collect();
        assert_eq!(items, vec![&"bar", &"baz"]);
    }

    #[test]
    fn test_remove() {
        let mut f = Frecency::<&str>::new(10);
        f.visit_at("foo", 10.0);
        assert!(f.remove(&"foo"));
        assert!(!f.remove(&"foo"));
        assert!(f.is_empty());
    }

    #[test]
    fn test_set_score_replaces() {
        let mut f = Frecency::<&str>::new(10);
        f.visit_at("foo", 10.0);
        f.visit_at("bar", 1_000_000.0);
        f.set_score("foo", f64::MAX / 2.0);
        let items: Vec<&&str> = f.items_with_scores().into_iter().map(|(k, _)| k).collect();
        assert_eq!(items[0], &"foo");
    }

    #[test]
    fn test_normalized_items_range() {
        let mut f = Frecency::<&str>::new(10);
        f.visit_at("a", 100.0);
        f.visit_at("b", 200.0);
        f.visit_at("b", 300.0);
        let norm = f.normalized_items();
        assert_eq!(norm[0].1, 1.0);
        assert_eq!(norm[norm.len() - 1].1, 0.0);
    }

    #[test]
    fn test_normalized_single_item_is_one() {
        let mut f = Frecency::<&str>::new(10);
        f.visit_at("a", 100.0);
        assert_eq!(f.normalized_items(), vec![(&"a", 1.0)]);
    }

    #[test]
    fn test_normalized_empty() {
        let f = Frecency::<String>::new(10);
        assert!(f.normalized_items().is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut f = Frecency::<String>::new(5);
        f.visit_at("/home/user/src".to_string(), 100.0);
        let json = serde_json::to_string(&f).unwrap();
        let back: Frecency<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
