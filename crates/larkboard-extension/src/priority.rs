//! Priority ordering engine.
//!
//! Entities are registered into one of three buckets (begin/general/end)
//! with an absolute priority, or with a relative before/after constraint
//! against another named entity. [`PriorityRegistry::sort`] resolves every
//! registration into one total order.
//!
//! Register everything before the first `sort()` call: the resolved order
//! is cached and only [`PriorityRegistry::remove_all`] invalidates it.

use tracing::debug;

/// Initial high-water mark of the begin bucket.
const BEGIN_START: i32 = -10_000;
/// Initial high-water mark of the general bucket.
const GENERAL_START: i32 = 0;
/// Initial high-water mark of the end bucket.
const END_START: i32 = 10_000;
/// Distance between two default-priority entities in the same bucket.
const STEP: i32 = 100;

/// Ordering registry with absolute buckets and relative constraints.
///
/// Buckets keep insertion order; the high-water mark of a bucket only
/// advances past the maximum value already stored in it, so default and
/// explicit priorities never collide destructively.
#[derive(Debug, Default)]
pub struct PriorityRegistry {
    /// Begin bucket, `(name, priority)` in insertion order.
    begin: Vec<(String, i32)>,
    /// General bucket.
    general: Vec<(String, i32)>,
    /// End bucket.
    end: Vec<(String, i32)>,
    /// Relative constraints: entity must come directly before its anchor.
    before: Vec<(String, String)>,
    /// Relative constraints: entity must come directly after its anchor.
    after: Vec<(String, String)>,
    /// Next default priority per bucket.
    begin_mark: i32,
    general_mark: i32,
    end_mark: i32,
    /// Cached result of the last `sort()`.
    sorted: Option<Vec<String>>,
}

impl PriorityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            begin: Vec::new(),
            general: Vec::new(),
            end: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            begin_mark: BEGIN_START,
            general_mark: GENERAL_START,
            end_mark: END_START,
            sorted: None,
        }
    }

    /// Registers an entity in the general bucket.
    ///
    /// Without an explicit priority the bucket's next default is used.
    pub fn add(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let value = priority.unwrap_or(self.general_mark);
        Self::insert(&mut self.general, name.into(), value);
        if value >= self.general_mark {
            self.general_mark = value + STEP;
        }
    }

    /// Registers an entity in the begin bucket.
    ///
    /// An explicit priority is negated on storage so that a higher supplied
    /// number sorts earlier within the bucket.
    pub fn add_begin(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let value = match priority {
            Some(p) => -p,
            None => self.begin_mark,
        };
        Self::insert(&mut self.begin, name.into(), value);
        if value >= self.begin_mark {
            self.begin_mark = value + STEP;
        }
    }

    /// Registers an entity in the end bucket.
    pub fn add_end(&mut self, name: impl Into<String>, priority: Option<i32>) {
        let value = priority.unwrap_or(self.end_mark);
        Self::insert(&mut self.end, name.into(), value);
        if value >= self.end_mark {
            self.end_mark = value + STEP;
        }
    }

    /// Registers an entity placed directly before `anchor`.
    pub fn add_before(&mut self, name: impl Into<String>, anchor: impl Into<String>) {
        self.before.push((name.into(), anchor.into()));
    }

    /// Registers an entity placed directly after `anchor`.
    pub fn add_after(&mut self, name: impl Into<String>, anchor: impl Into<String>) {
        self.after.push((name.into(), anchor.into()));
    }

    /// Removes an entity from whichever structure holds it.
    pub fn remove(&mut self, name: &str) {
        self.begin.retain(|(n, _)| n != name);
        self.general.retain(|(n, _)| n != name);
        self.end.retain(|(n, _)| n != name);
        self.before.retain(|(n, _)| n != name);
        self.after.retain(|(n, _)| n != name);
    }

    /// Clears every bucket and constraint, resets the default-priority
    /// counters and drops the cached order.
    pub fn remove_all(&mut self) {
        self.begin.clear();
        self.general.clear();
        self.end.clear();
        self.before.clear();
        self.after.clear();
        self.begin_mark = BEGIN_START;
        self.general_mark = GENERAL_START;
        self.end_mark = END_START;
        self.sorted = None;
    }

    /// Returns whether anything is registered (before the first sort) or
    /// whether the resolved order is non-empty (after it).
    pub fn has_entities(&self) -> bool {
        match &self.sorted {
            Some(order) => !order.is_empty(),
            None => {
                !self.begin.is_empty()
                    || !self.general.is_empty()
                    || !self.end.is_empty()
                    || !self.before.is_empty()
                    || !self.after.is_empty()
            }
        }
    }

    /// Resolves all registrations into one total order and caches it.
    ///
    /// Idempotent until [`remove_all`](Self::remove_all); registrations made
    /// after the first call do not affect the cached order.
    pub fn sort(&mut self) -> &[String] {
        if self.sorted.is_none() {
            let order = self.resolve();
            debug!(entities = order.len(), "resolved priority order");
            self.sorted = Some(order);
        }
        self.sorted.as_deref().unwrap_or_default()
    }

    /// Returns the cached result of the last [`sort`](Self::sort), or `None`
    /// if no sort has happened yet.
    pub fn sorted_entities(&self) -> Option<&[String]> {
        self.sorted.as_deref()
    }

    /// Inserts into a bucket, overwriting the value of an already-present
    /// name without moving it.
    fn insert(bucket: &mut Vec<(String, i32)>, name: String, value: i32) {
        match bucket.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => bucket.push((name, value)),
        }
    }

    /// The resolution algorithm.
    ///
    /// Buckets are merged into a rank table (each bucket pre-sorted by
    /// value, ties keeping insertion order), constraints with unknown
    /// anchors are dropped, then the pending before/after constraints are
    /// folded in over repeated passes so that chains resolve as their
    /// anchors become concrete. The final order is a stable sort of the
    /// rank table.
    fn resolve(&self) -> Vec<String> {
        // Step 1: merge the buckets into one insertion-ordered rank table.
        let mut ranks: Vec<(String, i32)> = Vec::new();
        for bucket in [&self.begin, &self.general, &self.end] {
            let mut entries = bucket.clone();
            entries.sort_by_key(|(_, value)| *value);
            for (name, value) in entries {
                Self::insert(&mut ranks, name, value);
            }
        }

        // Step 2: every name that can serve as a constraint anchor.
        let known: std::collections::HashSet<String> = ranks
            .iter()
            .map(|(n, _)| n.clone())
            .chain(self.before.iter().map(|(n, _)| n.clone()))
            .chain(self.after.iter().map(|(n, _)| n.clone()))
            .collect();

        // Step 3: drop constraints whose anchor nobody registered. The
        // constrained entity falls back to a general-bucket default slot
        // unless it already holds a rank.
        let mut general_mark = self.general_mark;
        let mut pending_after: Vec<(String, String)> = Vec::new();
        let mut pending_before: Vec<(String, String)> = Vec::new();
        for (pending, constraints) in [
            (&mut pending_after, &self.after),
            (&mut pending_before, &self.before),
        ] {
            for (entity, anchor) in constraints {
                if known.contains(anchor.as_str()) {
                    pending.push((entity.clone(), anchor.clone()));
                } else {
                    debug!(entity = %entity, anchor = %anchor, "dropping constraint with unknown anchor");
                    if !ranks.iter().any(|(n, _)| n == entity) {
                        Self::insert(&mut ranks, entity.clone(), general_mark);
                        general_mark += STEP;
                    }
                }
            }
        }

        // Step 4: fold constraints in until none pend. A constraint whose
        // anchor has no rank yet is retried on the next pass; a full pass
        // with no progress means the remaining constraints reference each
        // other, and their entities fall back to general defaults.
        while !pending_after.is_empty() || !pending_before.is_empty() {
            let mut progressed = false;

            let mut retry = Vec::new();
            for (entity, anchor) in pending_after.drain(..) {
                match ranks.iter().find(|(n, _)| *n == anchor).map(|(_, v)| *v) {
                    Some(target) => {
                        for slot in ranks.iter_mut() {
                            if slot.1 <= target {
                                slot.1 -= 1;
                            }
                        }
                        Self::insert(&mut ranks, entity, target);
                        progressed = true;
                    }
                    None => retry.push((entity, anchor)),
                }
            }
            pending_after = retry;

            let mut retry = Vec::new();
            for (entity, anchor) in pending_before.drain(..) {
                match ranks.iter().find(|(n, _)| *n == anchor).map(|(_, v)| *v) {
                    Some(target) => {
                        for slot in ranks.iter_mut() {
                            if slot.1 >= target {
                                slot.1 += 1;
                            }
                        }
                        Self::insert(&mut ranks, entity, target);
                        progressed = true;
                    }
                    None => retry.push((entity, anchor)),
                }
            }
            pending_before = retry;

            if !progressed {
                for (entity, anchor) in pending_after.drain(..).chain(pending_before.drain(..)) {
                    debug!(entity = %entity, anchor = %anchor, "unresolvable constraint, placing at general default");
                    if !ranks.iter().any(|(n, _)| n == &entity) {
                        Self::insert(&mut ranks, entity, general_mark);
                        general_mark += STEP;
                    }
                }
            }
        }

        // Step 5: stable sort; equal ranks keep merge order.
        ranks.sort_by_key(|(_, value)| *value);
        ranks.into_iter().map(|(name, _)| name).collect()
    }
}
