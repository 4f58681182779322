//! Out-of-band scalar samples collected alongside span events.
//!
//! The traced process logs its memory footprint as plain fields, unrelated
//! to the span stack. Only the extremes are reported: memory across repeats
//! tends to grow, so the range is what's worth looking at.

use crate::utils::config::BYTE_UNITS;
use log::debug;

/// Bag of memory-size samples for one benchmark
///
/// **Public** - owned by the reducer, one per benchmark
#[derive(Debug, Clone, Default)]
pub struct MetricSampler {
    samples: Vec<u64>,
}

impl MetricSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample
    pub fn record(&mut self, value: u64) {
        debug!("Recording memory sample: {}", value);
        self.samples.push(value);
    }

    pub fn min(&self) -> Option<u64> {
        self.samples.iter().copied().min()
    }

    pub fn max(&self) -> Option<u64> {
        self.samples.iter().copied().max()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest and largest sample as human-readable sizes
    ///
    /// **Public** - used for the `memory_sizes` report field
    ///
    /// # Returns
    /// `None` if nothing was recorded
    pub fn summary(&self) -> Option<(String, String)> {
        let min = self.min()?;
        let max = self.max()?;
        Some((format_bytes(min), format_bytes(max)))
    }
}

/// Format a byte count with binary prefixes, e.g. `"1.000 MiB"`
///
/// **Public** - backs `MetricSampler::summary`
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, BYTE_UNITS[0])
    } else {
        format!("{:.3} {}", value, BYTE_UNITS[unit])
    }
}
