use std::ops::Range;

/// Compressed sparse matrix over `f32` values
///
/// Entries live in a single arena (`indices` / `values`); `offsets[r]..offsets[r + 1]`
/// is the extent of outer slot `r`. Inner indices within a slot are strictly
/// increasing and every stored value is nonzero, so "absent" always means "unrated".
///
/// The same type serves as a row-compressed (user x item) view and, through
/// [`CompressedMatrix::transpose`], as the column-compressed (item x user) view.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedMatrix {
    n_outer: usize,
    n_inner: usize,
    offsets: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f32>,
}

/// Borrowed view of one compressed slot (a row in CSR, a column in CSC)
#[derive(Debug, Clone, Copy)]
pub struct SparseVec<'a> {
    pub indices: &'a [usize],
    pub values: &'a [f32],
}

impl<'a> SparseVec<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + 'a {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Binary search for the value stored at `index`
    pub fn get(&self, index: usize) -> Option<f32> {
        self.indices
            .binary_search(&index)
            .ok()
            .map(|pos| self.values[pos])
    }

    /// Mean of the stored values, 0 when the slot is empty
    pub fn mean(&self) -> f64 {
        mean(self.values)
    }
}

impl CompressedMatrix {
    /// Builds the matrix from `(outer, inner, value)` triplets
    ///
    /// Zero values are dropped. When the same cell appears more than once the
    /// last occurrence wins. Triplets outside the shape are ignored.
    pub fn from_triplets(n_outer: usize, n_inner: usize, triplets: &[(usize, usize, f32)]) -> Self {
        let mut entries: Vec<(usize, usize, f32)> = triplets
            .iter()
            .copied()
            .filter(|&(o, i, v)| o < n_outer && i < n_inner && v != 0.0)
            .collect();

        // Stable sort keeps insertion order among duplicates
        entries.sort_by_key(|&(o, i, _)| (o, i));

        let mut deduped: Vec<(usize, usize, f32)> = Vec::with_capacity(entries.len());
        for entry in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == entry.0 && last.1 == entry.1 => *last = entry,
                _ => deduped.push(entry),
            }
        }

        let mut offsets = vec![0usize; n_outer + 1];
        for &(o, _, _) in &deduped {
            offsets[o + 1] += 1;
        }
        for r in 0..n_outer {
            offsets[r + 1] += offsets[r];
        }

        let indices = deduped.iter().map(|&(_, i, _)| i).collect();
        let values = deduped.iter().map(|&(_, _, v)| v).collect();

        Self {
            n_outer,
            n_inner,
            offsets,
            indices,
            values,
        }
    }

    /// Builds the other compressed orientation over the same entries
    pub fn transpose(&self) -> Self {
        let mut counts = vec![0usize; self.n_inner + 1];
        for &i in &self.indices {
            counts[i + 1] += 1;
        }
        for c in 0..self.n_inner {
            counts[c + 1] += counts[c];
        }

        let offsets = counts.clone();
        let mut cursor = counts;
        let mut indices = vec![0usize; self.indices.len()];
        let mut values = vec![0f32; self.values.len()];

        // Walking outer slots in order keeps the new inner indices sorted
        for outer in 0..self.n_outer {
            for pos in self.extent(outer) {
                let inner = self.indices[pos];
                let slot = cursor[inner];
                indices[slot] = outer;
                values[slot] = self.values[pos];
                cursor[inner] += 1;
            }
        }

        Self {
            n_outer: self.n_inner,
            n_inner: self.n_outer,
            offsets,
            indices,
            values,
        }
    }

    pub fn n_outer(&self) -> usize {
        self.n_outer
    }

    pub fn n_inner(&self) -> usize {
        self.n_inner
    }

    /// Number of stored (nonzero) entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn extent(&self, outer: usize) -> Range<usize> {
        self.offsets[outer]..self.offsets[outer + 1]
    }

    /// The stored entries of one outer slot; out-of-range slots are empty
    pub fn slot(&self, outer: usize) -> SparseVec<'_> {
        if outer >= self.n_outer {
            return SparseVec {
                indices: &[],
                values: &[],
            };
        }
        let range = self.extent(outer);
        SparseVec {
            indices: &self.indices[range.clone()],
            values: &self.values[range],
        }
    }

    pub fn get(&self, outer: usize, inner: usize) -> Option<f32> {
        self.slot(outer).get(inner)
    }

    /// All stored values, outer-major order
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

pub(crate) fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompressedMatrix {
        // 3 users x 4 items
        CompressedMatrix::from_triplets(
            3,
            4,
            &[(0, 2, 4.0), (0, 0, 5.0), (1, 1, 3.0), (2, 0, 1.0), (2, 3, 2.0)],
        )
    }

    #[test]
    fn test_rows_are_sorted() {
        let m = sample();
        let row = m.slot(0);
        assert_eq!(row.indices, &[0, 2]);
        assert_eq!(row.values, &[5.0, 4.0]);
        assert_eq!(m.nnz(), 5);
    }

    #[test]
    fn test_zero_values_are_not_stored() {
        let m = CompressedMatrix::from_triplets(2, 2, &[(0, 0, 0.0), (1, 1, 2.0)]);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.get(0, 0), None);
        assert!(m.slot(0).is_empty());
    }

    #[test]
    fn test_duplicate_cell_keeps_last_value() {
        let m = CompressedMatrix::from_triplets(1, 1, &[(0, 0, 2.0), (0, 0, 4.5)]);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.get(0, 0), Some(4.5));
    }

    #[test]
    fn test_out_of_shape_triplets_ignored() {
        let m = CompressedMatrix::from_triplets(1, 1, &[(3, 0, 2.0), (0, 9, 1.0)]);
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_transpose_gives_columns() {
        let t = sample().transpose();
        assert_eq!(t.n_outer(), 4);
        assert_eq!(t.n_inner(), 3);
        let col0 = t.slot(0);
        assert_eq!(col0.indices, &[0, 2]);
        assert_eq!(col0.values, &[5.0, 1.0]);
        assert_eq!(t.get(3, 2), Some(2.0));
        assert!(t.slot(1).indices == [1]);
    }

    #[test]
    fn test_empty_rows_and_out_of_range_slot() {
        let m = CompressedMatrix::from_triplets(2, 2, &[]);
        assert!(m.slot(1).is_empty());
        assert!(m.slot(10).is_empty());
        assert_eq!(m.slot(1).mean(), 0.0);
    }

    #[test]
    fn test_mean() {
        let m = sample();
        assert!((m.slot(2).mean() - 1.5).abs() < 1e-12);
    }
}
