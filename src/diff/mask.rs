// Per-position difference mask for one pair of windows.
//
// Positions inside both windows differ when the bytes differ. Positions
// covered by only the longer window always differ. Positions past both
// windows never differ.

/// Reusable difference flags, one per window position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMask {
    flags: Vec<bool>,
}

impl DiffMask {
    pub fn new(capacity: usize) -> Self {
        Self {
            flags: vec![false; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    /// Recompute the mask for `lft` and `rgt`, the valid bytes of each
    /// window. Returns whether any position differs.
    ///
    /// # Panics
    ///
    /// Panics if either window is longer than the mask capacity.
    pub fn compute(&mut self, lft: &[u8], rgt: &[u8]) -> bool {
        let min_len = lft.len().min(rgt.len());
        let max_len = lft.len().max(rgt.len());
        assert!(
            max_len <= self.flags.len(),
            "window of {max_len} bytes exceeds mask capacity {}",
            self.flags.len()
        );
        debug_assert!(max_len > 0, "both windows empty");

        let mut different = false;
        for (flag, (l, r)) in self.flags.iter_mut().zip(lft.iter().zip(rgt)) {
            *flag = l != r;
            different |= *flag;
        }
        if min_len < max_len {
            self.flags[min_len..max_len].fill(true);
            different = true;
        }
        self.flags[max_len..].fill(false);
        different
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    /// Number of differing positions.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Iterate over maximal runs of differing positions as `start..end`.
    pub fn runs(&self) -> impl Iterator<Item = std::ops::Range<usize>> + '_ {
        let mut i = 0;
        std::iter::from_fn(move || {
            while i < self.flags.len() && !self.flags[i] {
                i += 1;
            }
            if i == self.flags.len() {
                return None;
            }
            let start = i;
            while i < self.flags.len() && self.flags[i] {
                i += 1;
            }
            Some(start..i)
        })
    }
}
