/*!
Split a path-sampled band file into contiguous k-path traversals.

`bands.x` writes every band as one sweep over the k-path. The k-coordinate
never decreases inside a sweep and drops back to the path origin when the
next band starts, so a strict decrease between neighbours is the only
marker of a band boundary.
*/
use crate::error::FormatError;

/// One `(k, energy)` row of a band file, in file order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    k: f64,
    energy: f64,
}

impl Sample {
    pub fn new(k: f64, energy: f64) -> Self {
        Self { k, energy }
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }
}

/**
Consecutive samples between two discontinuity points.
# Notes:
  * Never empty.
  * k is non-decreasing inside a segment.
  * A one-sample segment is valid; whether to draw it is up to the caller.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    samples: Vec<Sample>,
}

impl Segment {
    pub fn samples(&self) -> &[Sample] {
        self.samples.as_ref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// A single point cannot form a line.
    pub fn is_drawable(&self) -> bool {
        self.samples.len() > 1
    }

    pub fn k(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.k).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy).collect()
    }

    /// `(k, E - e_fermi)` pairs ready for line drawing.
    pub fn shifted(&self, e_fermi: f64) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (s.k, s.energy - e_fermi))
            .collect()
    }
}

/**
Zip two parallel columns into samples.
The columns come from the same table, but a caller handing over two
unrelated slices gets an error instead of silently truncated data.
*/
pub fn samples_from_columns(k: &[f64], energy: &[f64]) -> Result<Vec<Sample>, FormatError> {
    if k.len() != energy.len() {
        return Err(FormatError::LengthMismatch {
            k: k.len(),
            energy: energy.len(),
        });
    }
    Ok(k.iter()
        .zip(energy.iter())
        .map(|(k, e)| Sample::new(*k, *e))
        .collect())
}

/**
Boundary indices of the partition: `0`, every `i` with `k[i] < k[i-1]`, then `k.len()`.
Empty input gives no boundaries at all.
*/
pub fn band_breaks(k: &[f64]) -> Vec<usize> {
    if k.is_empty() {
        return vec![];
    }
    let mut breaks = vec![0];
    breaks.extend(
        k.windows(2)
            .enumerate()
            // Strict: equal neighbours stay in the same sweep
            .filter(|(_, pair)| pair[1] < pair[0])
            .map(|(i, _)| i + 1),
    );
    breaks.push(k.len());
    breaks
}

/// Partition `samples` at every k-coordinate reset.
pub fn segment_samples(samples: &[Sample]) -> Vec<Segment> {
    let k: Vec<f64> = samples.iter().map(|s| s.k).collect();
    let segments: Vec<Segment> = band_breaks(&k)
        .windows(2)
        .map(|bounds| Segment {
            samples: samples[bounds[0]..bounds[1]].to_vec(),
        })
        .collect();
    log::debug!(
        "{} samples split into {} segments",
        samples.len(),
        segments.len()
    );
    segments
}

/// Concatenate segments back into the flat sample sequence.
pub fn flatten(segments: &[Segment]) -> Vec<Sample> {
    segments
        .iter()
        .flat_map(|seg| seg.samples.iter().copied())
        .collect()
}
