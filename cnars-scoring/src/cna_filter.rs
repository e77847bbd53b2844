use serde::{Deserialize, Serialize};

use cnars_core::models::AberrantRegion;

use crate::consts::*;

///
/// Threshold rules turning a segment's state and size into an ordinal aberration score.
///
/// Gains score `1` above `gain`, `2` when also shorter than `gain_size` (focal), and `3`
/// when also above `gain_high`. Losses mirror this with negative scores. Each step only
/// counts once the previous one has passed. Any state that is not positive, zero
/// included, is tested against the loss thresholds.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CnaFilter {
    pub gain: f64,
    pub gain_high: f64,
    pub gain_size: f64,
    pub loss: f64,
    pub loss_high: f64,
    pub loss_size: f64,
}

impl Default for CnaFilter {
    fn default() -> Self {
        CnaFilter {
            gain: DEFAULT_GAIN,
            gain_high: default_gain_high(),
            gain_size: DEFAULT_GAIN_SIZE,
            loss: DEFAULT_LOSS,
            loss_high: default_loss_high(),
            loss_size: DEFAULT_LOSS_SIZE,
        }
    }
}

impl CnaFilter {
    /// Score a state/size pair.
    pub fn score(&self, state: f64, size: u64) -> i32 {
        let size = size as f64;
        let mut score = 0;

        if state > 0.0 {
            if state > self.gain {
                score += 1;
                if size < self.gain_size {
                    score += 1;
                    if state > self.gain_high {
                        score += 1;
                    }
                }
            }
        } else if state < self.loss {
            score -= 1;
            if size < self.loss_size {
                score -= 1;
                if state < self.loss_high {
                    score -= 1;
                }
            }
        }

        score
    }

    pub fn evaluate(&self, region: &AberrantRegion) -> i32 {
        self.score(region.state, region.size())
    }
}
