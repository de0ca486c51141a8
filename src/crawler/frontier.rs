//! Crawl frontier
//!
//! The frontier owns the visited set and the per-depth work queues. Admission
//! is an atomic check-and-insert: however many tasks try to admit the same URL,
//! exactly one succeeds and the URL keeps the depth it was first admitted at.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// A URL scheduled for fetching at a given depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Absolute URL that passed the link filter
    pub url: Url,

    /// Hops from the start URL
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    /// URL -> depth of first admission
    visited: HashMap<String, u32>,

    /// Targets not yet handed to the coordinator, by depth
    levels: BTreeMap<u32, Vec<CrawlTarget>>,
}

/// Visited set plus depth-partitioned work queues
#[derive(Debug)]
pub struct Frontier {
    max_depth: u32,
    state: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates an empty frontier that refuses anything deeper than `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            state: Mutex::new(FrontierState::default()),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Admits `url` at `depth` if it has never been seen
    ///
    /// # Returns
    ///
    /// * `true` - The URL was reserved and queued at `depth`
    /// * `false` - The URL was already admitted (at any depth), or `depth`
    ///   exceeds the maximum; nothing changed
    pub fn admit(&self, url: &Url, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let mut state = self.lock();
        let key = url.as_str();
        if state.visited.contains_key(key) {
            return false;
        }

        state.visited.insert(key.to_string(), depth);
        state.levels.entry(depth).or_default().push(CrawlTarget {
            url: url.clone(),
            depth,
        });
        true
    }

    /// Removes and returns every target queued at `depth`, in admission order
    pub fn drain_level(&self, depth: u32) -> Vec<CrawlTarget> {
        self.lock().levels.remove(&depth).unwrap_or_default()
    }

    /// Returns true if targets are waiting at `depth`
    pub fn has_more(&self, depth: u32) -> bool {
        self.lock()
            .levels
            .get(&depth)
            .is_some_and(|level| !level.is_empty())
    }

    /// Number of targets admitted but not yet drained, across all depths
    pub fn pending(&self) -> usize {
        self.lock().levels.values().map(Vec::len).sum()
    }

    /// Forgets every target that was admitted but never drained
    ///
    /// The URLs are removed from the visited set as well, so a stopped crawl
    /// only reports levels that were actually fetched. Returns how many
    /// targets were dropped.
    pub fn discard_pending(&self) -> usize {
        let mut state = self.lock();
        let levels = std::mem::take(&mut state.levels);

        let mut dropped = 0;
        for target in levels.into_values().flatten() {
            state.visited.remove(target.url.as_str());
            dropped += 1;
        }
        dropped
    }

    /// Number of URLs ever admitted
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Depth at which `url` was admitted, if it was
    pub fn depth_of(&self, url: &str) -> Option<u32> {
        self.lock().visited.get(url).copied()
    }

    /// Every admitted URL grouped by admission depth, sorted within a depth
    pub fn visited_by_depth(&self) -> BTreeMap<u32, Vec<String>> {
        let state = self.lock();
        let mut grouped: BTreeMap<u32, Vec<String>> = BTreeMap::new();

        for (url, depth) in &state.visited {
            grouped.entry(*depth).or_default().push(url.clone());
        }

        for urls in grouped.values_mut() {
            urls.sort();
        }

        grouped
    }

    // A panic while holding the lock cannot leave the maps half-updated, so a
    // poisoned lock is still safe to use
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
