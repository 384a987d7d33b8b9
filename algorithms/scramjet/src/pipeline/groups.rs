//! AC group decomposition around zero-run boundaries.
//!
//! A 63-value AC vector splits into groups: each group is a maximal zero
//! prefix plus the single non-zero that terminates it. A run of exactly 16
//! zeros with no terminator is a zero-group (the ZRL-shaped run), and a
//! pure-zero trailing remainder shorter than 16 closes the vector. Both
//! kinds are *pinned*: they keep their group index while the terminated
//! groups shuffle around them, which is what keeps the decomposition stable
//! across shuffle rounds.

// =============================================================================
// DECOMPOSITION
// =============================================================================

/// The groups of one AC vector plus the indices of the pinned ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// All groups in order; group lengths sum to 63.
    pub groups: Vec<Vec<i32>>,
    /// Indices into `groups` of the pinned pure-zero groups.
    pub pinned: Vec<usize>,
}

impl Decomposition {
    /// Number of groups that end in a non-zero and therefore shuffle.
    pub fn terminated_count(&self) -> usize {
        self.groups.len() - self.pinned.len()
    }

    /// Split into the movable groups (order preserved) and the pinned
    /// groups tagged with their original indices.
    pub fn split(self) -> (Vec<Vec<i32>>, Vec<(usize, Vec<i32>)>) {
        let mut movable = Vec::with_capacity(self.terminated_count());
        let mut pinned = Vec::with_capacity(self.pinned.len());
        for (i, group) in self.groups.into_iter().enumerate() {
            if self.pinned.contains(&i) {
                pinned.push((i, group));
            } else {
                movable.push(group);
            }
        }
        (movable, pinned)
    }
}

/// Scan an AC vector into its group decomposition.
pub fn decompose(ac: &[i32]) -> Decomposition {
    let mut groups = Vec::new();
    let mut pinned = Vec::new();
    let mut current = Vec::new();

    for &v in ac {
        current.push(v);
        if v != 0 {
            groups.push(std::mem::take(&mut current));
        } else if current.len() == 16 {
            // ZRL-shaped pure-zero run.
            pinned.push(groups.len());
            groups.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        // Trailing zeros after the last non-zero: one final pinned group.
        pinned.push(groups.len());
        groups.push(current);
    }

    Decomposition { groups, pinned }
}

/// Interleave the movable groups back around the pinned ones.
pub fn reassemble(movable: Vec<Vec<i32>>, pinned: Vec<(usize, Vec<i32>)>) -> Vec<Vec<i32>> {
    let total = movable.len() + pinned.len();
    let mut out = Vec::with_capacity(total);
    let mut movable = movable.into_iter();
    let mut pinned = pinned.into_iter().peekable();

    for i in 0..total {
        if pinned.peek().is_some_and(|(at, _)| *at == i) {
            if let Some((_, group)) = pinned.next() {
                out.push(group);
            }
        } else if let Some(group) = movable.next() {
            out.push(group);
        }
    }
    out
}

/// Flatten a group list back over the 63 AC slots.
pub fn flatten_into(groups: &[Vec<i32>], ac: &mut [i32]) {
    let mut at = 0usize;
    for group in groups {
        for &v in group {
            if at < ac.len() {
                ac[at] = v;
                at += 1;
            }
        }
    }
    debug_assert_eq!(at, ac.len());
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(runs: &[(usize, i32)]) -> Vec<i32> {
        // (zero_run, terminator) pairs; terminator 0 means run only.
        let mut out = Vec::new();
        for &(zeros, term) in runs {
            out.extend(std::iter::repeat_n(0, zeros));
            if term != 0 {
                out.push(term);
            }
        }
        assert_eq!(out.len(), 63);
        out
    }

    #[test]
    fn zrl_run_is_pinned_in_place() {
        // [0,0,3], sixteen zeros, [-2], 43 trailing zeros (16+16+11).
        let ac = vector(&[(2, 3), (16, 0), (0, -2), (43, 0)]);
        let d = decompose(&ac);

        assert_eq!(d.groups.len(), 6);
        assert_eq!(d.groups[0], vec![0, 0, 3]);
        assert_eq!(d.groups[1], vec![0; 16]);
        assert_eq!(d.groups[2], vec![-2]);
        assert_eq!(d.pinned, vec![1, 3, 4, 5]);
        assert_eq!(d.terminated_count(), 2);
    }

    #[test]
    fn trailing_run_longer_than_sixteen_splits() {
        // 59 trailing zeros: three ZRL-shaped groups plus an 11-zero
        // remainder, all pinned.
        let ac = vector(&[(0, 5), (2, 7), (59, 0)]);
        let d = decompose(&ac);
        assert_eq!(d.groups.len(), 5);
        assert_eq!(d.groups[2].len(), 16);
        assert_eq!(d.groups[3].len(), 16);
        assert_eq!(d.groups[4].len(), 11);
        assert_eq!(d.pinned, vec![2, 3, 4]);
    }

    #[test]
    fn group_lengths_sum_to_sixty_three() {
        let ac = vector(&[(0, 1), (3, -4), (16, 0), (5, 2), (36, 0)]);
        let d = decompose(&ac);
        let total: usize = d.groups.iter().map(Vec::len).sum();
        assert_eq!(total, 63);
    }

    #[test]
    fn split_reassemble_flatten_round_trip() {
        let ac = vector(&[(1, 9), (16, 0), (2, -3), (0, 7), (41, 0)]);
        let d = decompose(&ac);
        let (movable, pinned) = d.clone().split();
        let groups = reassemble(movable, pinned);
        assert_eq!(groups, d.groups);

        let mut flat = vec![0i32; 63];
        flatten_into(&groups, &mut flat);
        assert_eq!(flat, ac);
    }

    #[test]
    fn vector_ending_in_nonzero_has_no_trailing_group() {
        let mut ac = vec![0i32; 63];
        ac[62] = 4;
        let d = decompose(&ac);
        // 62 zeros then a terminator: three ZRL groups absorb 48 zeros,
        // the final group is 14 zeros plus the non-zero.
        assert_eq!(d.pinned, vec![0, 1, 2]);
        assert_eq!(d.groups.len(), 4);
        assert_eq!(d.groups[3].len(), 15);
        assert_eq!(*d.groups[3].last().unwrap_or(&0), 4);
        assert_eq!(d.terminated_count(), 1);
    }

    #[test]
    fn all_zero_vector_is_fully_pinned() {
        let ac = vec![0i32; 63];
        let d = decompose(&ac);
        assert_eq!(d.terminated_count(), 0);
        assert_eq!(d.groups.len(), 4); // 16+16+16+15
        assert_eq!(d.pinned.len(), 4);
    }
}
