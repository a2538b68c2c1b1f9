//! Distribution of the testcase sequence across machines and workers.
//!
//! Both levels use the same round-robin rule: machine `m` of `M` (1-based) owns every `M`-th
//! global index starting at `m - 1`, and worker `w` of `W` (0-based) owns every `W`-th element
//! of the machine's share. The two compose into a single arithmetic progression, so a shard is
//! fully described by an offset and a stride, every testcase lands in exactly one
//! (machine, worker) pair, and no enumeration is needed to skip over other shards' elements.

/// One (machine, worker) slice of the testcase index space: the arithmetic progression
/// `offset, offset + stride, ..` below the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    offset: u128,
    stride: u128,
}

impl Shard {
    /// The shard owned by worker `worker_index` (0-based, `< num_workers`) on machine
    /// `machine_index` (1-based, `<= num_machines`).
    ///
    /// Panics if either index is out of range; callers validate configuration beforehand.
    pub fn new(
        machine_index: usize,
        num_machines: usize,
        worker_index: usize,
        num_workers: usize,
    ) -> Self {
        assert!(
            machine_index >= 1 && machine_index <= num_machines,
            "machine index {machine_index} out of range [1, {num_machines}]"
        );
        assert!(
            worker_index < num_workers,
            "worker index {worker_index} out of range [0, {num_workers})"
        );
        Self {
            offset: (machine_index as u128 - 1) + worker_index as u128 * num_machines as u128,
            stride: num_machines as u128 * num_workers as u128,
        }
    }

    /// The global indices belonging to this shard, in ascending order, for a space of `total`
    /// testcases.
    pub fn indexes(self, total: u128) -> impl Iterator<Item = u128> {
        std::iter::successors(Some(self.offset), move |i| i.checked_add(self.stride))
            .take_while(move |i| *i < total)
    }
}

#[cfg(test)]
mod tests {
    use super::Shard;

    /// No index is lost or duplicated across the (machine, worker) grid.
    #[test]
    fn shards_cover_the_space_exactly_once() {
        for (num_machines, num_workers) in [(1, 1), (1, 4), (3, 1), (2, 3), (4, 4)] {
            for total in [0_u128, 1, 7, 100, 101] {
                let mut seen = Vec::new();
                for machine in 1..=num_machines {
                    for worker in 0..num_workers {
                        let shard = Shard::new(machine, num_machines, worker, num_workers);
                        seen.extend(shard.indexes(total));
                    }
                }
                seen.sort_unstable();
                let want: Vec<u128> = (0..total).collect();
                assert_eq!(
                    seen, want,
                    "machines={num_machines} workers={num_workers} total={total}"
                );
            }
        }
    }

    #[test]
    fn shard_is_an_arithmetic_progression() {
        let shard = Shard::new(2, 3, 1, 2);
        // offset = (2 - 1) + 1 * 3 = 4, stride = 6.
        assert_eq!(shard.indexes(20).collect::<Vec<_>>(), vec![4, 10, 16]);
    }

    #[test]
    fn more_shards_than_testcases() {
        let shard = Shard::new(5, 8, 3, 4);
        assert_eq!(shard.indexes(3).count(), 0);
    }

    #[test]
    #[should_panic(expected = "machine index")]
    fn zero_machine_index_panics() {
        let _ = Shard::new(0, 2, 0, 1);
    }
}
