//! Random placement of regions and genes, for building null distributions.
//!
//! Nothing here mutates its input: every call returns fresh values.

use std::collections::BTreeMap;

use fxhash::FxHashSet;
use rand::Rng;
use rand::seq::IndexedRandom;

use cnars_core::errors::{CnaError, Result};
use cnars_core::models::Region;

///
/// Place copies of `regions` uniformly at random, keeping their sizes.
///
/// # Arguments
///
/// - regions: regions to place
/// - chrom_sizes: length of every chromosome a region may land on
/// - rand_chrom: also draw a new chromosome for each region; otherwise it stays put
/// - rng: source of randomness
///
/// A region that does not fit its target chromosome is an `InvalidRegion` error, and a
/// region on a chromosome missing from `chrom_sizes` is a `Configuration` error.
///
pub fn randomize_regions<R>(
    regions: &[Region],
    chrom_sizes: &BTreeMap<String, u32>,
    rand_chrom: bool,
    rng: &mut R,
) -> Result<Vec<Region>>
where
    R: Rng + ?Sized,
{
    let chromosomes: Vec<&String> = chrom_sizes.keys().collect();

    regions
        .iter()
        .map(|region| {
            let chromosome = if rand_chrom {
                *chromosomes.choose(rng).ok_or_else(|| {
                    CnaError::Configuration("no chromosome sizes to place regions on".to_string())
                })?
            } else {
                chrom_sizes
                    .get_key_value(region.chromosome())
                    .map(|(name, _)| name)
                    .ok_or_else(|| {
                        CnaError::Configuration(format!(
                            "no size known for chromosome {}",
                            region.chromosome()
                        ))
                    })?
            };

            let length = u64::from(chrom_sizes[chromosome]);
            let size = region.size();
            if size > length + 1 {
                return Err(CnaError::InvalidRegion {
                    chromosome: chromosome.clone(),
                    start: region.start(),
                    end: region.end(),
                });
            }

            // the last start keeping the region's end within the chromosome length
            let start = rng.random_range(0..=length + 1 - size);
            let end = start + size - 1;
            Region::with_count(
                chromosome.clone(),
                start as u32,
                end as u32,
                region.count(),
            )
        })
        .collect()
}

///
/// Draw `n` genes from `universe` with replacement; repeats collapse, so the result may
/// hold fewer than `n` genes.
///
pub fn resample_genes<R>(n: usize, universe: &[String], rng: &mut R) -> FxHashSet<String>
where
    R: Rng + ?Sized,
{
    (0..n)
        .filter_map(|_| universe.choose(rng).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::*;

    #[fixture]
    fn chrom_sizes() -> BTreeMap<String, u32> {
        BTreeMap::from([
            ("1".to_string(), 1_000_000),
            ("2".to_string(), 50_000),
            ("X".to_string(), 200_000),
        ])
    }

    #[rstest]
    fn test_sizes_are_kept(chrom_sizes: BTreeMap<String, u32>) {
        let mut rng = StdRng::seed_from_u64(7);
        let regions = vec![
            Region::with_count("1", 100, 10_099, 12).unwrap(),
            Region::new("X", 0, 49_999).unwrap(),
        ];

        for _ in 0..100 {
            let placed = randomize_regions(&regions, &chrom_sizes, true, &mut rng).unwrap();
            assert_eq!(placed.len(), 2);
            for (before, after) in regions.iter().zip(&placed) {
                assert_eq!(after.size(), before.size());
                assert_eq!(after.count(), before.count());
                let length = u64::from(chrom_sizes[after.chromosome()]);
                assert!(u64::from(after.end()) <= length);
            }
        }
        // inputs untouched
        assert_eq!(regions[0], Region::new("1", 100, 10_099).unwrap());
    }

    #[rstest]
    fn test_chromosome_kept_without_rand_chrom(chrom_sizes: BTreeMap<String, u32>) {
        let mut rng = StdRng::seed_from_u64(11);
        let regions = vec![Region::new("2", 10, 20).unwrap()];
        for _ in 0..50 {
            let placed = randomize_regions(&regions, &chrom_sizes, false, &mut rng).unwrap();
            assert_eq!(placed[0].chromosome(), "2");
        }
    }

    #[rstest]
    fn test_region_too_large(chrom_sizes: BTreeMap<String, u32>) {
        let mut rng = StdRng::seed_from_u64(1);
        let regions = vec![Region::new("2", 0, 60_000).unwrap()];
        let result = randomize_regions(&regions, &chrom_sizes, false, &mut rng);
        assert!(matches!(result, Err(CnaError::InvalidRegion { .. })));
    }

    #[rstest]
    fn test_unknown_chromosome(chrom_sizes: BTreeMap<String, u32>) {
        let mut rng = StdRng::seed_from_u64(1);
        let regions = vec![Region::new("Y", 0, 10).unwrap()];
        let result = randomize_regions(&regions, &chrom_sizes, false, &mut rng);
        assert!(matches!(result, Err(CnaError::Configuration(_))));
    }

    #[rstest]
    fn test_resample_genes() {
        let mut rng = StdRng::seed_from_u64(3);
        let universe: Vec<String> = ["A", "B", "C", "D"].iter().map(|g| g.to_string()).collect();

        let genes = resample_genes(10, &universe, &mut rng);
        assert!(!genes.is_empty() && genes.len() <= 4);
        assert!(genes.iter().all(|g| universe.contains(g)));

        assert!(resample_genes(10, &[], &mut rng).is_empty());
        assert!(resample_genes(0, &universe, &mut rng).is_empty());
    }
}
