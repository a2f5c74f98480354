//! Resampling of irregular score series onto a regular time grid.
//!
//! Detectors emit samples only when something is detected, at irregular
//! and sometimes duplicate timestamps. Thresholding needs a dense, evenly
//! spaced series, built in two passes:
//!
//! 1. **Average-fill**: half-width cells (`duration_expand / 2`) take the
//!    mean score and mean `time_end` of every sample whose `time_begin`
//!    falls inside them. Empty cells stay unset.
//! 2. **Back-fill**: full-width buckets (`duration_expand`) take the cell
//!    starting at the same instant. Unset buckets inherit score and end
//!    from the next later known bucket, and any bucket still unset after
//!    that scores 0.
//!
//! Both grids are anchored at the earliest sample. Times are handled as
//! integer nanoseconds so cell assignment never depends on float rounding.

use crate::error::{EventError, EventResult};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

fn to_nanos(secs: f64) -> i64 {
    (secs * NANOS_PER_SEC).round() as i64
}

fn to_secs(nanos: i64) -> f64 {
    nanos as f64 / NANOS_PER_SEC
}

/// One observation of a detector's confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSample {
    pub time_begin: f64,
    pub time_end: f64,
    pub score: f64,
}

/// One cell of the regular output grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBucket {
    /// Grid start in seconds
    pub time_begin: f64,
    /// Mean end of the samples the bucket took its score from, never before
    /// `time_begin`. Zero-filled buckets end at the next grid edge, capped at
    /// the latest sample end.
    pub time_end: f64,
    /// Resampled confidence
    pub score: f64,
}

impl TimeBucket {
    pub fn duration(&self) -> f64 {
        self.time_end - self.time_begin
    }
}

/// Pass-1 aggregate of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CellMean {
    score: f64,
    end_ns: i64,
}

/// Two-pass resampler with a fixed bucket width.
#[derive(Debug, Clone, Copy)]
pub struct TemporalResampler {
    bucket_ns: i64,
    half_ns: i64,
}

impl TemporalResampler {
    /// Create a resampler producing buckets `duration_expand` seconds wide.
    pub fn new(duration_expand: f64) -> EventResult<Self> {
        if !duration_expand.is_finite() || duration_expand <= 0.0 {
            return Err(EventError::invalid_config(format!(
                "duration_expand must be a positive number of seconds, got {}",
                duration_expand
            )));
        }
        let bucket_ns = to_nanos(duration_expand);
        let half_ns = to_nanos(duration_expand / 2.0);
        if half_ns < 1 {
            return Err(EventError::invalid_config(format!(
                "duration_expand {} is below grid resolution",
                duration_expand
            )));
        }
        Ok(Self { bucket_ns, half_ns })
    }

    /// Bucket width in seconds.
    pub fn bucket_width(&self) -> f64 {
        to_secs(self.bucket_ns)
    }

    /// Resample a series into a dense regular grid.
    ///
    /// Samples need not be sorted. Samples with non-finite times or scores
    /// are ignored; if nothing remains, the grid is empty.
    pub fn resample(&self, samples: &[ScoreSample]) -> Vec<TimeBucket> {
        let mut points: Vec<(i64, f64, i64)> = samples
            .iter()
            .filter(|s| s.time_begin.is_finite() && s.time_end.is_finite() && s.score.is_finite())
            .map(|s| {
                let begin = to_nanos(s.time_begin);
                (begin, s.score, to_nanos(s.time_end).max(begin))
            })
            .collect();
        if points.is_empty() {
            return Vec::new();
        }
        points.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)).then(a.2.cmp(&b.2)));

        let origin = points[0].0;
        let span = points[points.len() - 1].0 - origin;
        let latest_end = points.iter().map(|p| p.2).max().unwrap_or(origin);

        let cells = self.average_fill(&points, origin, span);
        let filled = self.back_fill(&cells, span);

        filled
            .into_iter()
            .enumerate()
            .map(|(k, cell)| {
                let begin = origin + k as i64 * self.bucket_ns;
                let (score, end) = match cell {
                    Some(mean) => (mean.score, mean.end_ns),
                    None => (0.0, (begin + self.bucket_ns).min(latest_end)),
                };
                TimeBucket {
                    time_begin: to_secs(begin),
                    time_end: to_secs(end.max(begin)),
                    score,
                }
            })
            .collect()
    }

    /// Pass 1: mean score and end per half-width cell, `None` where no sample fell.
    fn average_fill(&self, points: &[(i64, f64, i64)], origin: i64, span: i64) -> Vec<Option<CellMean>> {
        let n_cells = (span / self.half_ns) as usize + 1;
        let mut score_sums = vec![0.0f64; n_cells];
        let mut end_sums = vec![0i128; n_cells];
        let mut counts = vec![0usize; n_cells];

        for &(t, score, end) in points {
            let idx = ((t - origin) / self.half_ns) as usize;
            score_sums[idx] += score;
            end_sums[idx] += end as i128;
            counts[idx] += 1;
        }

        (0..n_cells)
            .map(|idx| {
                let count = counts[idx];
                (count > 0).then(|| CellMean {
                    score: score_sums[idx] / count as f64,
                    end_ns: (end_sums[idx] / count as i128) as i64,
                })
            })
            .collect()
    }

    /// Pass 2: pick the cell aligned with each full-width bucket and
    /// back-fill gaps from later buckets. Whatever stays `None` is zero-filled
    /// by the caller.
    fn back_fill(&self, cells: &[Option<CellMean>], span: i64) -> Vec<Option<CellMean>> {
        let n_buckets = (span / self.bucket_ns) as usize + 1;
        let mut picked: Vec<Option<CellMean>> = (0..n_buckets)
            .map(|k| {
                let idx = ((k as i64 * self.bucket_ns) / self.half_ns) as usize;
                cells.get(idx).copied().flatten()
            })
            .collect();

        let mut next_known: Option<CellMean> = None;
        for value in picked.iter_mut().rev() {
            if value.is_some() {
                next_known = *value;
            } else {
                *value = next_known;
            }
        }
        picked
    }
}
