// CNA filter defaults. States are log2 copy-number ratios.
pub const DEFAULT_GAIN: f64 = 0.2;
pub const DEFAULT_LOSS: f64 = -0.2;
pub const DEFAULT_GAIN_SIZE: f64 = 12e6;
pub const DEFAULT_LOSS_SIZE: f64 = 12e6;

/// log2(5/2): five copies over a diploid baseline.
pub fn default_gain_high() -> f64 {
    (5.0f64 / 2.0).log2()
}

/// log2(0.7/2): less than one copy left of two.
pub fn default_loss_high() -> f64 {
    (0.7f64 / 2.0).log2()
}

// gene coverage defaults
pub const DEFAULT_GAIN_COVERAGE: f64 = 0.5;
pub const DEFAULT_LOSS_COVERAGE: f64 = 0.0;

pub const SEGMENTATION_HEADER: [&str; 6] = ["sample", "chromosome", "start", "end", "count", "state"];
pub const SEGMENTATION_DELIMITER: &str = "\t";
