use std::fmt::Display;
use std::io::{self, Write};

///
/// Writes a labelled score matrix: a header of sample names led by an empty cell, then
/// one `label, score...` row per gene or region.
///
pub struct ScoreMatrixWriter<W: Write> {
    writer: W,
    delimiter: String,
    columns: usize,
}

impl<W: Write> ScoreMatrixWriter<W> {
    ///
    /// Start a matrix by writing its header.
    ///
    /// # Arguments
    /// - writer: where to write to
    /// - delimiter: field delimiter
    /// - samples: column names, in column order
    ///
    pub fn new<S: AsRef<str>>(mut writer: W, delimiter: &str, samples: &[S]) -> io::Result<Self> {
        let header = samples
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(delimiter);
        writeln!(writer, "{delimiter}{header}")?;

        Ok(ScoreMatrixWriter {
            writer,
            delimiter: delimiter.to_string(),
            columns: samples.len(),
        })
    }

    pub fn write_row<L, V>(&mut self, label: L, values: &[V]) -> io::Result<()>
    where
        L: Display,
        V: Display,
    {
        if values.len() != self.columns {
            log::warn!(
                "row {label} has {} values for {} samples",
                values.len(),
                self.columns
            );
        }
        let cells = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        writeln!(self.writer, "{label}{}{cells}", self.delimiter)
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

///
/// Write one `label, n, g1<item>g2...` row listing the genes attached to a label.
///
pub fn write_gene_list<W, S>(
    writer: &mut W,
    label: &str,
    genes: &[S],
    delimiter: &str,
    item_delimiter: &str,
) -> io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    let items = genes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(item_delimiter);
    writeln!(writer, "{label}{delimiter}{}{delimiter}{items}", genes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_score_matrix_layout() {
        let mut matrix = ScoreMatrixWriter::new(Vec::new(), "\t", &["s1", "s2", "s3"]).unwrap();
        matrix.write_row("GENEA", &[2, -3, 0]).unwrap();
        matrix.write_row("chr7:1-9|G", &[0, 0, 1]).unwrap();
        let out = String::from_utf8(matrix.finish().unwrap()).unwrap();

        assert_eq!(out, "\ts1\ts2\ts3\nGENEA\t2\t-3\t0\nchr7:1-9|G\t0\t0\t1\n");
    }

    #[rstest]
    fn test_empty_matrix_has_header_only() {
        let samples: Vec<String> = vec![];
        let matrix = ScoreMatrixWriter::new(Vec::new(), ",", &samples).unwrap();
        assert_eq!(matrix.finish().unwrap(), b",\n".to_vec());
    }

    #[rstest]
    #[case(vec!["GENEA", "GENEB"], "chr7:1-9|G\t2\tGENEA,GENEB\n")]
    #[case(vec![], "chr7:1-9|G\t0\t\n")]
    fn test_gene_list(#[case] genes: Vec<&str>, #[case] expected: &str) {
        let mut out = Vec::new();
        write_gene_list(&mut out, "chr7:1-9|G", &genes, "\t", ",").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
