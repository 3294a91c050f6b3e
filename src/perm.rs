//! Permutation enumeration via Heap's algorithm.
//!
//! Used by the optimal orderer to walk every arrangement of a row consistent
//! with a PQ-tree's consecutive-ones constraint. Heap's algorithm is used
//! because it produces each permutation by a single adjacent-ish swap of the
//! previous one (cheap to apply incrementally) rather than in lexicographic
//! order.

/// Generate every permutation of `0..n`, in Heap's-algorithm order, stopping
/// early once `limit` permutations have been produced (`None` for no limit).
///
/// `n == 0` yields a single empty permutation; `n == 1` yields `[[0]]`.
pub fn generate_permutations(n: usize, limit: Option<usize>) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    generate_permutations_with(n, limit, |perm| {
        out.push(perm.to_vec());
        true
    });
    out
}

/// Streaming variant: invokes `visit` with each permutation in turn (as a
/// borrowed slice, reused across calls — copy it if you need to keep it).
/// Stops as soon as either `limit` permutations have been produced or
/// `visit` returns `false`.
pub fn generate_permutations_with(n: usize, limit: Option<usize>, mut visit: impl FnMut(&[usize]) -> bool) {
    if n == 0 {
        visit(&[]);
        return;
    }
    let mut a: Vec<usize> = (0..n).collect();
    let mut produced = 0usize;
    let mut keep_going = visit(&a);
    produced += 1;
    if !keep_going || limit.is_some_and(|l| produced >= l) {
        return;
    }

    let mut c = vec![0usize; n];
    let mut i = 0usize;
    while i < n {
        if c[i] < i {
            if i % 2 == 0 {
                a.swap(0, i);
            } else {
                a.swap(c[i], i);
            }
            keep_going = visit(&a);
            produced += 1;
            if !keep_going || limit.is_some_and(|l| produced >= l) {
                return;
            }
            c[i] += 1;
            i = 0;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
}
