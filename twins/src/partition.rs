//! Enumeration and counting of set partitions (Stirling numbers of the second kind).

use num_bigint::{BigInt, BigUint};

/// A group of nodes that can talk to each other, as an ascending list of node indices.
pub type Block = Vec<usize>;
/// A division of the node universe into disjunct non-empty blocks, with no communication
/// between different blocks.
pub type Partition = Vec<Block>;

/// Generates every way to split `{0, .., n-1}` into exactly `k` non-empty, unordered blocks.
///
/// The construction mirrors the combinatorial recurrence `S(n, k) = S(n-1, k-1) + k * S(n-1, k)`:
/// element `n-1` either starts a new block appended to a `(k-1)`-partition of the first `n-1`
/// elements, or joins one of the `k` blocks of a `k`-partition of the first `n-1` elements.
/// In the second case each of the `k` variants owns a deep copy of the base partition; sharing
/// block storage between variants would let one variant's insertion corrupt its siblings.
///
/// The output order is deterministic for a fixed `(n, k)` and downstream sharding relies on it.
///
/// Panics unless `n >= k >= 1`.
pub fn enumerate(n: usize, k: usize) -> Vec<Partition> {
    assert!(k >= 1, "partitions cannot be empty or negative in number");
    assert!(n >= k, "cannot split {n} elements into {k} non-empty blocks");
    if k == 1 {
        // All elements in a single block.
        return vec![vec![(0..n).collect()]];
    }
    if k == n {
        // Each element stands alone.
        return vec![(0..n).map(|i| vec![i]).collect()];
    }
    // Element n-1 starts its own block.
    let mut out = enumerate(n - 1, k - 1);
    for partition in &mut out {
        partition.push(vec![n - 1]);
    }
    // Element n-1 joins each existing block in turn.
    let base = enumerate(n - 1, k);
    for block in 0..k {
        for partition in &base {
            let mut partition = partition.clone();
            partition[block].push(n - 1);
            out.push(partition);
        }
    }
    out
}

/// Counts the partitions of an `n`-element set into `k` non-empty blocks without enumerating
/// them: the Stirling number of the second kind,
/// `S(n, k) = (1/k!) * sum_{i=0}^{k} (-1)^i * C(k, i) * (k-i)^n`.
///
/// The result grows super-exponentially, hence the exact big-integer arithmetic.
///
/// Panics unless `n >= k >= 1`.
pub fn count(n: usize, k: usize) -> BigUint {
    assert!(k >= 1, "partitions cannot be empty or negative in number");
    assert!(n >= k, "cannot split {n} elements into {k} non-empty blocks");
    let k_factorial = factorial(k);
    let mut sum = BigInt::from(0);
    for i in 0..=k {
        let binomial = &k_factorial / (factorial(i) * factorial(k - i));
        let term = BigInt::from(binomial) * BigInt::from(BigUint::from(k - i).pow(n as u32));
        if i % 2 == 0 {
            sum += term;
        } else {
            sum -= term;
        }
    }
    // The inclusion-exclusion sum is an exact multiple of k!.
    (sum / BigInt::from(k_factorial))
        .to_biguint()
        .expect("Stirling numbers are non-negative")
}

fn factorial(n: usize) -> BigUint {
    (1..=n).fold(BigUint::from(1_usize), |acc, i| acc * BigUint::from(i))
}

#[cfg(test)]
mod tests {
    use super::{count, enumerate, Partition};
    use num_bigint::BigUint;
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use std::collections::BTreeSet;

    /// Checks that a partition covers `{0, .., n-1}` with exactly `k` non-empty disjunct blocks.
    fn assert_valid_partition(partition: &Partition, n: usize, k: usize) {
        assert_eq!(partition.len(), k, "expected {k} blocks: {partition:?}");
        let mut seen = BTreeSet::new();
        for block in partition {
            assert!(!block.is_empty(), "empty block: {partition:?}");
            for &node in block {
                assert!(seen.insert(node), "node {node} duplicated: {partition:?}");
            }
        }
        assert_eq!(seen, BTreeSet::from_iter(0..n), "bad cover: {partition:?}");
    }

    #[test]
    fn canonical_splits_of_five_into_two() {
        assert_eq!(
            enumerate(5, 2),
            vec![
                vec![vec![0, 1, 2, 3], vec![4]],
                vec![vec![0, 1, 2, 4], vec![3]],
                vec![vec![0, 1, 3, 4], vec![2]],
                vec![vec![0, 2, 3, 4], vec![1]],
                vec![vec![0, 3, 4], vec![1, 2]],
                vec![vec![0, 1, 4], vec![2, 3]],
                vec![vec![0, 2, 4], vec![1, 3]],
                vec![vec![0, 4], vec![1, 2, 3]],
                vec![vec![0, 1, 2], vec![3, 4]],
                vec![vec![0, 1, 3], vec![2, 4]],
                vec![vec![0, 2, 3], vec![1, 4]],
                vec![vec![0, 3], vec![1, 2, 4]],
                vec![vec![0, 1], vec![2, 3, 4]],
                vec![vec![0, 2], vec![1, 3, 4]],
                vec![vec![0], vec![1, 2, 3, 4]],
            ]
        );
    }

    #[test]
    fn prop_enumerate_matches_count() {
        let rng = &mut rand::thread_rng();
        for _ in 0..50 {
            let n = rng.gen_range(1..=8);
            let k = rng.gen_range(1..=n);

            let got = enumerate(n, k);
            assert_eq!(BigUint::from(got.len()), count(n, k), "n={n} k={k}");

            for partition in &got {
                assert_valid_partition(partition, n, k);
            }

            // Every partition appears once, up to block order.
            let unique: BTreeSet<BTreeSet<BTreeSet<usize>>> = got
                .iter()
                .map(|p| p.iter().map(|b| b.iter().copied().collect()).collect())
                .collect();
            assert_eq!(unique.len(), got.len(), "duplicates for n={n} k={k}");
        }
    }

    #[test]
    fn known_counts() {
        assert_eq!(count(1, 1), BigUint::from(1_usize));
        assert_eq!(count(4, 2), BigUint::from(7_usize));
        assert_eq!(count(5, 2), BigUint::from(15_usize));
        assert_eq!(count(10, 3), BigUint::from(9330_usize));
    }

    #[test]
    fn closed_form_satisfies_recurrence() {
        // S(n, k) = S(n-1, k-1) + k * S(n-1, k), checked well past u64 range.
        for n in 2..=60_usize {
            for k in 2..n {
                assert_eq!(
                    count(n, k),
                    count(n - 1, k - 1) + BigUint::from(k) * count(n - 1, k),
                    "n={n} k={k}"
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "non-empty blocks")]
    fn more_blocks_than_elements_panics() {
        let _ = enumerate(2, 3);
    }

    #[test]
    #[should_panic(expected = "cannot be empty")]
    fn zero_blocks_panics() {
        let _ = count(3, 0);
    }
}
