//! Ordered index sequences used for selection, permutations and samples.

use std::ops::Index;

use crate::error::{MatrixError, Result};

/// An ordered sequence of non-negative indices.
///
/// Serves both as input (row/column selection) and output (sort permutations,
/// sampled unit indices). Duplicates are representable; call sites that
/// require distinct entries (sampling without replacement) check with
/// [`IndexCollection::is_distinct`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexCollection(Vec<usize>);

impl IndexCollection {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// Fail with `IndexOutOfRange` unless every index is below `bound`.
    pub fn validate(&self, bound: usize) -> Result<()> {
        for &index in &self.0 {
            if index >= bound {
                return Err(MatrixError::IndexOutOfRange { index, bound });
            }
        }
        Ok(())
    }

    /// True when no index repeats.
    pub fn is_distinct(&self) -> bool {
        let mut seen = self.0.clone();
        seen.sort_unstable();
        seen.windows(2).all(|w| w[0] != w[1])
    }
}

impl From<Vec<usize>> for IndexCollection {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl Index<usize> for IndexCollection {
    type Output = usize;

    fn index(&self, position: usize) -> &usize {
        &self.0[position]
    }
}

impl<'a> IntoIterator for &'a IndexCollection {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
