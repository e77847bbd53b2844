use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::utils::get_dynamic_writer;
use cnars_io::{
    AnnotationTable, DEFAULT_PEAK_ATTR, DEFAULT_REGION_ATTR, DEFAULT_WIDE_PEAK_ATTR, LesionPeak,
    LesionPeaks, PeakColumns, write_memo,
};

use crate::common;

pub fn run_gistic2memo(matches: &ArgMatches) -> Result<()> {
    let lesions = common::required_path(matches, "lesions")?;
    let delimiter = common::delimiter(matches);
    let item_delimiter = common::item_delimiter(matches);

    let attr = |id: &str, default: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };
    let columns = PeakColumns {
        peak: attr("peak-attr", DEFAULT_PEAK_ATTR),
        wide_peak: attr("wpeak-attr", DEFAULT_WIDE_PEAK_ATTR),
        region: attr("region-attr", DEFAULT_REGION_ATTR),
    };

    let peaks = LesionPeaks::open(&lesions, &delimiter, &columns)?;
    let db = common::open_gene_db(matches)?;

    let ampfile = common::optional_path(matches, "ampfile")
        .unwrap_or_else(|| memo_path(&lesions, "amp"));
    let delfile = common::optional_path(matches, "delfile")
        .unwrap_or_else(|| memo_path(&lesions, "del"));

    for (path, peaks) in [(ampfile, &peaks.amplifications), (delfile, &peaks.deletions)] {
        write_memo_file(&path, peaks, &db, &delimiter, &item_delimiter)?;
        info!("Wrote {} peaks to {}", peaks.len(), path.display());
    }

    Ok(())
}

/// `<lesions>.<kind>.memo` next to the lesions file.
fn memo_path(lesions: &Path, kind: &str) -> PathBuf {
    let mut name = lesions.as_os_str().to_owned();
    name.push(format!(".{kind}.memo"));
    PathBuf::from(name)
}

fn write_memo_file(
    path: &Path,
    peaks: &[LesionPeak],
    db: &AnnotationTable,
    delimiter: &str,
    item_delimiter: &str,
) -> Result<()> {
    let mut writer = get_dynamic_writer(path)?;
    write_memo(&mut writer, peaks, db, delimiter, item_delimiter)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_default_memo_paths() {
        let lesions = Path::new("run/all_lesions.conf_90.txt");
        assert_eq!(
            memo_path(lesions, "amp"),
            PathBuf::from("run/all_lesions.conf_90.txt.amp.memo")
        );
    }
}
