use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use fxhash::FxHashMap;
use rayon::prelude::*;

use cnars_core::errors::{CnaError, Result};
use cnars_core::models::{AberrantRegion, GeneRegion, Region};
use cnars_core::utils::{get_dynamic_reader, get_dynamic_writer, numbered_lines};
use cnars_core::GeneDatabase;

use crate::cna_filter::CnaFilter;
use crate::consts::{SEGMENTATION_DELIMITER, SEGMENTATION_HEADER};
use crate::sample::{GeneScoreOptions, SegmentedSample};

///
/// A cohort of segmented samples read from one segmentation file.
///
/// Samples keep the order in which they first appear in the file, and every
/// per-sample score sequence this type returns follows that order.
///
#[derive(Debug, Default)]
pub struct SegmentedSampleSet {
    /// Header line of the file the set was read from.
    header: Option<String>,
    samples: Vec<SegmentedSample>,
    sample_map: FxHashMap<String, usize>,
}

impl TryFrom<&Path> for SegmentedSampleSet {
    type Error = CnaError;

    fn try_from(value: &Path) -> Result<Self> {
        let set = Self::from_reader(get_dynamic_reader(value)?)?;
        log::info!(
            "Read {} samples from {}",
            set.samples.len(),
            value.display()
        );
        Ok(set)
    }
}

impl SegmentedSampleSet {
    ///
    /// Read a segmentation file and, when a filter is given, score its regions.
    ///
    pub fn open(path: &Path, filter: Option<&CnaFilter>) -> Result<Self> {
        let mut set = Self::try_from(path)?;
        if let Some(filter) = filter {
            set.evaluate(filter);
        }
        Ok(set)
    }

    ///
    /// Parse tab-delimited `sample, chromosome, start, end, count, state` rows after a
    /// header line.
    ///
    /// Rows of one sample must be contiguous: a sample name that differs from the
    /// previous row's starts a new sample. The header line and the spelling of each
    /// state are kept for [`write_to`](Self::write_to).
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut set = SegmentedSampleSet::default();

        for (line_no, line) in numbered_lines(reader) {
            let line = line?;
            if line_no == 1 {
                set.header = Some(line.trim_end_matches(['\r', '\n']).to_string());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.trim_end().split(SEGMENTATION_DELIMITER).collect();
            if cells.len() < SEGMENTATION_HEADER.len() {
                return Err(CnaError::Parse(format!(
                    "segmentation line {line_no}: expected {} columns, found {}",
                    SEGMENTATION_HEADER.len(),
                    cells.len()
                )));
            }

            let number = |col: usize| -> Result<u32> {
                cells[col].parse::<u32>().map_err(|_| {
                    CnaError::Parse(format!(
                        "segmentation line {line_no}: {} {:?}",
                        SEGMENTATION_HEADER[col], cells[col]
                    ))
                })
            };
            let state = cells[5].parse::<f64>().map_err(|_| {
                CnaError::Parse(format!("segmentation line {line_no}: state {:?}", cells[5]))
            })?;
            let region = Region::with_count(cells[1], number(2)?, number(3)?, number(4)?)?;

            let name = cells[0];
            let is_new = set.samples.last().is_none_or(|s| s.name != name);
            if is_new {
                if set.sample_map.contains_key(name) {
                    log::warn!("rows of sample {name} are not contiguous (line {line_no})");
                }
                set.sample_map
                    .entry(name.to_string())
                    .or_insert(set.samples.len());
                set.samples.push(SegmentedSample::new(name));
            }

            if let Some(sample) = set.samples.last_mut() {
                sample.append(AberrantRegion::new(region, state).with_state_text(cells[5]));
            }
        }

        Ok(set)
    }

    /// Write the set back out in the layout [`from_reader`](Self::from_reader) reads.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut writer = get_dynamic_writer(path)?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        match &self.header {
            Some(header) => writeln!(writer, "{header}")?,
            None => writeln!(writer, "{}", SEGMENTATION_HEADER.join(SEGMENTATION_DELIMITER))?,
        }
        for sample in &self.samples {
            for region in sample.regions() {
                writeln!(
                    writer,
                    "{}{SEGMENTATION_DELIMITER}{}",
                    sample.name,
                    region.delimited(SEGMENTATION_DELIMITER)
                )?;
            }
        }
        Ok(())
    }

    pub fn samples(&self) -> &[SegmentedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample names in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&SegmentedSample> {
        self.sample_map.get(name).map(|&i| &self.samples[i])
    }

    pub fn evaluate(&mut self, filter: &CnaFilter) {
        for sample in self.samples.iter_mut() {
            sample.evaluate(filter);
        }
    }

    /// Build every sample's overlap index, in parallel.
    pub fn prepare(&mut self) {
        self.samples.par_iter_mut().for_each(|sample| sample.prepare());
        log::debug!("prepared {} samples", self.samples.len());
    }

    pub fn region_scores(&self, query: &Region, overlap_threshold: f64) -> Vec<i32> {
        self.samples
            .iter()
            .map(|s| s.region_score(query, overlap_threshold))
            .collect()
    }

    pub fn gene_scores(&self, gene: &GeneRegion, options: &GeneScoreOptions) -> Result<Vec<i32>> {
        self.samples
            .iter()
            .map(|s| s.gene_score(gene, options))
            .collect()
    }

    pub fn gene_scores_relaxed(&self, gene: &GeneRegion) -> Vec<i32> {
        self.samples
            .iter()
            .map(|s| s.gene_score_relaxed(gene))
            .collect()
    }

    ///
    /// Strict per-gene scores of every sample over the genes in `query`.
    ///
    /// `universe` defaults to every gene the database places in `query`. Genes that
    /// lack the exons coverage is measured over (non-coding genes under `use_cds`) cannot
    /// be scored strictly and are left out with a warning.
    ///
    pub fn scores<D>(
        &self,
        query: &Region,
        db: &D,
        universe: Option<&[String]>,
        options: &GeneScoreOptions,
    ) -> Result<BTreeMap<String, Vec<i32>>>
    where
        D: GeneDatabase + ?Sized,
    {
        let names = match universe {
            Some(genes) => genes.to_vec(),
            None => db.genes(query),
        };

        let mut genes = Vec::with_capacity(names.len());
        for name in &names {
            let gene = GeneRegion::from_database(name, db)?;
            let exons = if options.use_cds {
                gene.coding_exons()
            } else {
                gene.exons()
            };
            if exons.is_empty() {
                log::warn!("{name} has no exons to measure coverage over, skipping");
                continue;
            }
            genes.push(gene);
        }

        let mut scores: BTreeMap<String, Vec<i32>> = genes
            .iter()
            .map(|g| (g.name.clone(), Vec::with_capacity(self.samples.len())))
            .collect();
        for sample in &self.samples {
            for (gene, score) in sample.scores(query, db, Some(genes.as_slice()), options)? {
                scores.entry(gene).or_default().push(score);
            }
        }

        Ok(scores)
    }

    /// Relaxed per-gene scores of every sample over the genes in `query`.
    pub fn scores_relaxed<D>(&self, query: &Region, db: &D) -> BTreeMap<String, Vec<i32>>
    where
        D: GeneDatabase + ?Sized,
    {
        let universe = db.genes(query);

        let mut scores: BTreeMap<String, Vec<i32>> = universe
            .iter()
            .map(|g| (g.clone(), Vec::with_capacity(self.samples.len())))
            .collect();
        for sample in &self.samples {
            for (gene, score) in sample.scores_relaxed(query, db, Some(universe.as_slice())) {
                scores.entry(gene).or_default().push(score);
            }
        }

        scores
    }
}
