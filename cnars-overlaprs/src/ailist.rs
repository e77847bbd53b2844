use std::ops::Range;

use num_traits::{PrimInt, Unsigned};

use crate::traits::{Interval, Overlapper};

/// Number of following intervals an interval must contain before it is moved
/// into a later component during construction.
const MIN_COVERAGE: usize = 10;

/// An Augmented Interval List over closed intervals.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// Intervals are sorted by start and split into components. Within a component each
/// position also records the largest end seen so far, so a query can walk backwards
/// from the last start `<= end` and stop as soon as no earlier interval can still
/// reach the query start. Intervals that span many of their successors (long
/// segments, whole-arm calls) would defeat that early exit, so they are peeled off
/// into later components.
///
/// # Examples
///
/// ```
/// use cnars_overlaprs::{AIList, Overlapper, Interval};
///
/// let segments = vec![
///     Interval { start: 1000u32, end: 2000, val: "seg1" },
///     Interval { start: 2000, end: 2500, val: "seg2" },
///     Interval { start: 5000, end: 6000, val: "seg3" },
/// ];
///
/// let ailist = AIList::build(segments);
///
/// // closed coordinates: position 2000 belongs to both seg1 and seg2
/// assert_eq!(ailist.find(2000, 2000).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    intervals: Vec<Interval<I, T>>,
    max_ends: Vec<I>,
    components: Vec<Range<usize>>,
}

impl<I, T> Overlapper<I, T> for AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut pending = intervals;
        pending.sort_by_key(|iv| iv.start);

        let mut stored = Vec::with_capacity(pending.len());
        let mut max_ends = Vec::with_capacity(pending.len());
        let mut components = Vec::new();

        while !pending.is_empty() {
            let (kept, deferred) = Self::split_covering(pending);

            let first = stored.len();
            let mut running: Option<I> = None;
            for iv in kept {
                let max = match running {
                    Some(max) if max > iv.end => max,
                    _ => iv.end,
                };
                running = Some(max);
                max_ends.push(max);
                stored.push(iv);
            }
            components.push(first..stored.len());

            pending = deferred;
        }

        AIList {
            intervals: stored,
            max_ends,
            components,
        }
    }

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            component: 0,
            cursor: None,
            start,
            end,
        })
    }
}

impl<I, T> AIList<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Separate intervals that contain at least [`MIN_COVERAGE`] of the next
    /// `2 * MIN_COVERAGE` intervals from the rest. Input must be sorted by start;
    /// both outputs stay sorted.
    fn split_covering(sorted: Vec<Interval<I, T>>) -> (Vec<Interval<I, T>>, Vec<Interval<I, T>>) {
        let covering: Vec<bool> = (0..sorted.len())
            .map(|i| {
                let window = &sorted[i + 1..sorted.len().min(i + 2 * MIN_COVERAGE)];
                window.iter().filter(|next| sorted[i].end > next.end).count() >= MIN_COVERAGE
            })
            .collect();

        let mut kept = Vec::with_capacity(sorted.len());
        let mut deferred = Vec::new();
        for (iv, is_covering) in sorted.into_iter().zip(covering) {
            if is_covering {
                deferred.push(iv);
            } else {
                kept.push(iv);
            }
        }
        (kept, deferred)
    }

    /// Returns the number of intervals in the AIList.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the AIList contains no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of components the intervals were decomposed into.
    pub fn components(&self) -> usize {
        self.components.len()
    }
}

/// Lazy iterator over the intervals of an [`AIList`] overlapping a closed query range.
///
/// Created by [`find_iter`](Overlapper::find_iter).
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    inner: &'a AIList<I, T>,
    component: usize,
    // exclusive upper bound of the candidates still to visit in the current component
    cursor: Option<usize>,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync + 'a,
{
    type Item = &'a Interval<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.inner;

        while let Some(range) = list.components.get(self.component) {
            let mut cursor = match self.cursor {
                Some(cursor) => cursor,
                None => {
                    range.start
                        + list.intervals[range.clone()].partition_point(|iv| iv.start <= self.end)
                }
            };

            while cursor > range.start {
                cursor -= 1;
                let iv = &list.intervals[cursor];
                if iv.end >= self.start {
                    self.cursor = Some(cursor);
                    return Some(iv);
                }
                if list.max_ends[cursor] < self.start {
                    break;
                }
            }

            self.cursor = None;
            self.component += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::{fixture, rstest};

    #[fixture]
    fn intervals() -> Vec<Interval<u32, &'static str>> {
        vec![
            Interval {
                start: 1,
                end: 5,
                val: "a",
            },
            Interval {
                start: 3,
                end: 7,
                val: "b",
            },
            Interval {
                start: 6,
                end: 10,
                val: "c",
            },
            Interval {
                start: 8,
                end: 12,
                val: "d",
            },
        ]
    }

    fn vals(found: Vec<Interval<u32, &'static str>>) -> Vec<&'static str> {
        let mut vals: Vec<&str> = found.iter().map(|iv| iv.val).collect();
        vals.sort();
        vals
    }

    #[rstest]
    fn test_build_and_len(intervals: Vec<Interval<u32, &'static str>>) {
        let ailist = AIList::build(intervals.clone());
        assert_eq!(ailist.len(), intervals.len());
        assert_eq!(ailist.is_empty(), false);
        assert_eq!(ailist.components(), 1);
    }

    #[rstest]
    #[case(2, 4, vec!["a", "b"])]
    #[case(9, 11, vec!["c", "d"])]
    #[case(5, 5, vec!["a", "b"])]
    #[case(7, 8, vec!["b", "c", "d"])]
    #[case(12, 12, vec!["d"])]
    #[case(13, 15, vec![])]
    #[case(0, 0, vec![])]
    fn test_find_closed_coordinates(
        intervals: Vec<Interval<u32, &'static str>>,
        #[case] start: u32,
        #[case] end: u32,
        #[case] expected: Vec<&'static str>,
    ) {
        let ailist = AIList::build(intervals);
        assert_eq!(vals(ailist.find(start, end)), expected);
    }

    #[rstest]
    fn test_empty_ailist() {
        let ailist: AIList<u32, &str> = AIList::build(vec![]);

        assert_eq!(ailist.len(), 0);
        assert_eq!(ailist.is_empty(), true);
        assert_eq!(ailist.find(1, 2).is_empty(), true);
        assert_eq!(ailist.find_iter(1, 2).count(), 0);
    }

    #[rstest]
    fn test_long_intervals_are_decomposed() {
        let iv = |start: u32, end: u32| Interval { start, end, val: () };
        let mut intervals = vec![iv(0, 1000), iv(0, 900)];
        intervals.extend((0..40).map(|i| iv(i * 10 + 1, i * 10 + 5)));

        let ailist = AIList::build(intervals);
        assert_eq!(ailist.components(), 2);

        assert_eq!(ailist.find(6, 8).len(), 2);
        assert_eq!(ailist.find(11, 11).len(), 3);
        assert_eq!(ailist.find(950, 2000).len(), 1);
        assert_eq!(ailist.find(1001, 2000).len(), 0);
    }

    #[rstest]
    fn test_find_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let intervals: Vec<Interval<u32, usize>> = (0..300)
                .map(|i| {
                    let start = rng.random_range(0..10_000u32);
                    let len = if rng.random_bool(0.1) {
                        rng.random_range(0..5_000u32)
                    } else {
                        rng.random_range(0..100u32)
                    };
                    Interval {
                        start,
                        end: start + len,
                        val: i,
                    }
                })
                .collect();
            let ailist = AIList::build(intervals.clone());

            for _ in 0..50 {
                let start = rng.random_range(0..11_000u32);
                let end = start + rng.random_range(0..500u32);

                let mut expected: Vec<usize> = intervals
                    .iter()
                    .filter(|iv| iv.start <= end && iv.end >= start)
                    .map(|iv| iv.val)
                    .collect();
                expected.sort();

                let mut found: Vec<usize> = ailist.find_iter(start, end).map(|iv| iv.val).collect();
                found.sort();

                assert_eq!(found, expected, "query [{start}, {end}]");
            }
        }
    }
}
