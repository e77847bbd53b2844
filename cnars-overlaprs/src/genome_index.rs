//! Genome-wide interval indexing across chromosomes.
//!
//! [`GenomeIndex`] keeps one [`AIList`] per chromosome so that a query only ever
//! touches the intervals on its own chromosome.
//!
//! # Examples
//!
//! ```
//! use cnars_overlaprs::{GenomeIndex, Interval};
//!
//! let index = GenomeIndex::build(vec![
//!     ("3".to_string(), Interval { start: 100u32, end: 200, val: "seg1" }),
//!     ("3".to_string(), Interval { start: 150, end: 400, val: "seg2" }),
//!     ("X".to_string(), Interval { start: 100, end: 200, val: "seg3" }),
//! ]);
//!
//! let hits: Vec<&str> = index.find_iter("3", 180, 190).map(|iv| iv.val).collect();
//! assert_eq!(hits.len(), 2);
//! assert_eq!(index.find_iter("7", 180, 190).count(), 0);
//! ```

use std::iter;

use fxhash::FxHashMap as HashMap;

use crate::{AIList, Interval, Overlapper};

/// One overlap index per chromosome.
#[derive(Debug, Clone)]
pub struct GenomeIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    index_maps: HashMap<String, AIList<u32, T>>,
}

impl<T> Default for GenomeIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    fn default() -> Self {
        GenomeIndex {
            index_maps: HashMap::default(),
        }
    }
}

impl<T> GenomeIndex<T>
where
    T: Eq + Clone + Send + Sync,
{
    /// Group `(chromosome, interval)` pairs by chromosome and build one list per group.
    pub fn build<C>(entries: impl IntoIterator<Item = (C, Interval<u32, T>)>) -> Self
    where
        C: Into<String>,
    {
        let mut intervals: HashMap<String, Vec<Interval<u32, T>>> = HashMap::default();
        for (chr, interval) in entries {
            intervals.entry(chr.into()).or_default().push(interval);
        }

        let index_maps = intervals
            .into_iter()
            .map(|(chr, chr_intervals)| (chr, AIList::build(chr_intervals)))
            .collect();

        GenomeIndex { index_maps }
    }

    /// Iterate intervals on `chr` overlapping the closed range `[start, end]`.
    ///
    /// Unknown chromosomes yield nothing.
    pub fn find_iter<'a>(
        &'a self,
        chr: &str,
        start: u32,
        end: u32,
    ) -> Box<dyn Iterator<Item = &'a Interval<u32, T>> + 'a> {
        match self.index_maps.get(chr) {
            Some(list) => list.find_iter(start, end),
            None => Box::new(iter::empty()),
        }
    }

    pub fn find(&self, chr: &str, start: u32, end: u32) -> Vec<Interval<u32, T>> {
        self.find_iter(chr, start, end).cloned().collect()
    }

    /// Total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chromosomes with at least one interval, in no particular order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.index_maps.keys().map(String::as_str)
    }
}
