//! Generator configuration.

use std::path::PathBuf;

/// Parameters of the combinatorial space: how many nodes take part in the protocol, into how many
/// partitions they are split each round, and how many rounds each testcase spans.
///
/// Constructed once at startup and shared read-only by all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of (non-twin) nodes in the committee.
    pub num_nodes: usize,
    /// Number of disjunct partitions the nodes are split into each round.
    pub num_partitions: usize,
    /// Number of rounds in each testcase.
    pub num_rounds: usize,
}

impl Config {
    /// Validates the parameters. All three counts have to be positive; whether the committee is
    /// large enough for `num_partitions` also depends on the number of twins and is checked by
    /// [`crate::cluster::Cluster::new`].
    pub fn new(num_nodes: usize, num_partitions: usize, num_rounds: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(num_nodes > 0, "number of nodes must be positive");
        anyhow::ensure!(num_partitions > 0, "number of partitions must be positive");
        anyhow::ensure!(num_rounds > 0, "number of rounds must be positive");
        Ok(Self {
            num_nodes,
            num_partitions,
            num_rounds,
        })
    }
}

/// Settings controlling how the testcase corpus is distributed and written out, as opposed to
/// what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of testcases per output file.
    pub testcases_per_file: usize,
    /// Directory where the output files are created. Ignored in dry runs.
    pub out_dir: PathBuf,
    /// 1-based index of this machine within the fleet generating the corpus.
    pub machine_index: usize,
    /// Total number of machines generating the corpus.
    pub num_machines: usize,
    /// Number of worker threads on this machine.
    pub workers: usize,
    /// Write to a scratch directory which is deleted when the run finishes.
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            testcases_per_file: 100,
            out_dir: ".".into(),
            machine_index: 1,
            num_machines: 1,
            workers: 1,
            dry_run: false,
        }
    }
}

impl RunConfig {
    /// Validates the settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.testcases_per_file > 0,
            "testcases per file must be positive"
        );
        anyhow::ensure!(
            self.machine_index >= 1 && self.machine_index <= self.num_machines,
            "machine index {} out of range [1, {}]",
            self.machine_index,
            self.num_machines
        );
        anyhow::ensure!(self.workers > 0, "number of workers must be positive");
        Ok(())
    }
}
