//! Run-length encoding of ordered sequences.
//!
//! A run is a maximal stretch of equal adjacent values. Encoding scans
//! adjacent pairs for inequality, records where each run ends, and derives
//! lengths by differencing those end positions.

/// Encoded runs as three parallel sequences.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunLengths<T> {
    /// Length of each run (always at least 1)
    pub lengths: Vec<usize>,
    /// Index into the input where each run starts (strictly increasing)
    pub starts: Vec<usize>,
    /// Value repeated throughout each run
    pub values: Vec<T>,
}

impl<T> RunLengths<T> {
    /// Number of runs.
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Iterate runs as `(start, length, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.starts
            .iter()
            .zip(&self.lengths)
            .zip(&self.values)
            .map(|((start, length), value)| (*start, *length, value))
    }
}

impl<T: Clone> RunLengths<T> {
    /// Expand the runs back into the original sequence.
    pub fn decode(&self) -> Vec<T> {
        let total = self.lengths.iter().sum();
        let mut out = Vec::with_capacity(total);
        for (_, length, value) in self.iter() {
            out.extend(std::iter::repeat(value.clone()).take(length));
        }
        out
    }
}

/// Run-length encode a sequence in O(n).
///
/// Empty input yields empty runs.
pub fn run_length_encode<T: PartialEq + Clone>(input: &[T]) -> RunLengths<T> {
    let n = input.len();
    if n == 0 {
        return RunLengths {
            lengths: Vec::new(),
            starts: Vec::new(),
            values: Vec::new(),
        };
    }

    // Last index of every run; the final element always closes a run.
    let mut ends: Vec<usize> = input
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| i)
        .collect();
    ends.push(n - 1);

    let mut lengths = Vec::with_capacity(ends.len());
    let mut starts = Vec::with_capacity(ends.len());
    let mut values = Vec::with_capacity(ends.len());

    let mut start = 0usize;
    for &end in &ends {
        lengths.push(end + 1 - start);
        starts.push(start);
        values.push(input[end].clone());
        start = end + 1;
    }

    RunLengths {
        lengths,
        starts,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let runs = run_length_encode::<bool>(&[]);
        assert!(runs.is_empty());
        assert!(runs.starts.is_empty());
        assert!(runs.values.is_empty());
    }

    #[test]
    fn test_single_run() {
        let runs = run_length_encode(&[true, true, true]);
        assert_eq!(runs.lengths, vec![3]);
        assert_eq!(runs.starts, vec![0]);
        assert_eq!(runs.values, vec![true]);
    }

    #[test]
    fn test_alternating_runs() {
        let input = [false, true, true, false, false, false, true];
        let runs = run_length_encode(&input);
        assert_eq!(runs.lengths, vec![1, 2, 3, 1]);
        assert_eq!(runs.starts, vec![0, 1, 3, 6]);
        assert_eq!(runs.values, vec![false, true, false, true]);
    }

    #[test]
    fn test_lengths_cover_input_and_decode() {
        let patterns: Vec<Vec<bool>> = vec![
            vec![true],
            vec![false, false],
            vec![true, false, true, false],
            vec![true, true, false, true, true, true, false, false],
        ];
        for input in patterns {
            let runs = run_length_encode(&input);
            assert_eq!(runs.lengths.iter().sum::<usize>(), input.len());
            assert!(runs.lengths.iter().all(|&l| l >= 1));
            assert!(runs.starts.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(runs.decode(), input);
        }
    }

    #[test]
    fn test_non_boolean_values() {
        let runs = run_length_encode(&["a", "a", "b", "c", "c"]);
        assert_eq!(runs.values, vec!["a", "b", "c"]);
        assert_eq!(runs.lengths, vec![2, 1, 2]);
    }
}
