//! Linear to exponential lookup used by the positive-exp node.

use crate::sample::{Sample, MAX_POSITIVE};

/// Attenuation at the lowest positive index, in dB.
pub const MIN_DB: f64 = -70.0;

const LEN: usize = MAX_POSITIVE as usize + 1;

/// Precomputed exponential response over the positive sample range.
///
/// Index 0 maps to 0 (fully off). Index 1 sits at [`MIN_DB`] and index 127 at
/// unity, with the attenuation in dB falling linearly in between, which makes
/// the curve exponential in amplitude. Built once, then shared by reference.
#[derive(Clone, PartialEq, Eq)]
pub struct ExpTable {
    values: [Sample; LEN],
}

impl ExpTable {
    pub fn new() -> Self {
        let mut values: [Sample; LEN] = [0; LEN];
        let steps = (LEN - 2) as f64;

        for (i, value) in values.iter_mut().enumerate().skip(1) {
            let db = MIN_DB * (MAX_POSITIVE as usize - i) as f64 / steps;
            let gain = 10f64.powf(db / 20.0);
            *value = (f64::from(MAX_POSITIVE) * gain).round() as Sample;
        }

        Self { values }
    }

    /// Table entry for a positive sample; 0 for everything else.
    #[inline]
    pub fn lookup(&self, input: Sample) -> Sample {
        if input > 0 {
            self.values[input as usize]
        } else {
            0
        }
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.values
    }
}

impl Default for ExpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpTable")
            .field("min_db", &MIN_DB)
            .field("len", &LEN)
            .finish()
    }
}
