//! Orchestration: validates the configuration, enumerates the partitions once, and fans the
//! testcase space out to independent worker threads.

use crate::{
    cluster::Cluster,
    config::{Config, RunConfig},
    output::{format_testcase, TestcaseWriter},
    partition,
    scenario::{Testcase, TestcaseSpace},
    shard::Shard,
};
use anyhow::Context as _;
use num_bigint::BigUint;
use std::path::Path;

/// Inclusion predicate over a raw testcase; records rejected by it are not written out.
pub type Filter = Box<dyn Fn(&Testcase<'_>) -> bool + Send + Sync>;

/// The testcase generator. All validation happens in [`Generator::new`], before any
/// enumeration work; the instance itself is immutable and shared read-only by the workers.
pub struct Generator {
    config: Config,
    run: RunConfig,
    cluster: Cluster,
    filter: Filter,
}

impl Generator {
    /// Validates the configuration and derives the node taxonomy.
    pub fn new(config: Config, run: RunConfig) -> anyhow::Result<Self> {
        run.validate()?;
        let cluster = Cluster::new(&config)?;
        anyhow::ensure!(
            scenario_count(&config, &cluster).pow(config.num_rounds as u32)
                <= BigUint::from(u128::MAX),
            "testcase space does not fit in the u128 index space"
        );
        tracing::info!(
            nodes = config.num_nodes,
            partitions = config.num_partitions,
            rounds = config.num_rounds,
            testcases_per_file = run.testcases_per_file,
            out_dir = %run.out_dir.display(),
            machine = run.machine_index,
            machines = run.num_machines,
            workers = run.workers,
            "generator instantiated"
        );
        Ok(Self {
            config,
            run,
            cluster,
            filter: Box::new(|_| true),
        })
    }

    /// Replaces the accept-all inclusion filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// The node taxonomy derived from the configuration.
    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// Forecasts the total number of testcases across all machines without enumerating them:
    /// `(S(nodes + f, partitions) * f) ^ rounds`.
    pub fn forecast(&self) -> BigUint {
        scenario_count(&self.config, &self.cluster).pow(self.config.num_rounds as u32)
    }

    /// Generates this machine's share of the corpus.
    ///
    /// The partitions are enumerated once and shared read-only; each worker thread then walks
    /// its own disjoint shard of the testcase space and owns its output files exclusively, so
    /// the workers need no synchronization beyond the final join. Any worker error fails the
    /// run, but does not interrupt the remaining workers.
    pub fn run(&self) -> anyhow::Result<()> {
        tracing::info!("generating {} testcases...", self.forecast());

        let partitions =
            partition::enumerate(self.cluster.num_nodes(), self.config.num_partitions);
        let space = TestcaseSpace::new(
            &partitions,
            self.cluster.target_nodes().len(),
            self.config.num_rounds,
        )?;

        let scratch = if self.run.dry_run {
            tracing::info!("dry run enabled: writing to a scratch directory");
            Some(tempfile::tempdir().context("creating scratch directory")?)
        } else {
            None
        };
        let dir = scratch
            .as_ref()
            .map_or(self.run.out_dir.as_path(), |d| d.path());

        std::thread::scope(|scope| {
            let space = &space;
            let handles: Vec<_> = (0..self.run.workers)
                .map(|worker| scope.spawn(move || self.run_worker(space, dir, worker)))
                .collect();
            let mut result = Ok(());
            for handle in handles {
                let joined = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                if result.is_ok() {
                    result = joined;
                }
            }
            result
        })?;

        tracing::info!("finished");
        Ok(())
    }

    fn run_worker(
        &self,
        space: &TestcaseSpace<'_>,
        dir: &Path,
        worker: usize,
    ) -> anyhow::Result<()> {
        let shard = Shard::new(
            self.run.machine_index,
            self.run.num_machines,
            worker,
            self.run.workers,
        );
        let mut writer = TestcaseWriter::new(
            dir,
            self.run.machine_index,
            worker,
            self.run.testcases_per_file,
            self.run.dry_run,
        );
        let mut written: u64 = 0;
        for testcase in space.iter_shard(shard) {
            if (self.filter)(&testcase) {
                writer.push(&format_testcase(&self.config, &self.cluster, &testcase))?;
                written += 1;
            }
        }
        writer.finish()?;
        tracing::debug!(worker, written, "worker finished");
        Ok(())
    }
}

fn scenario_count(config: &Config, cluster: &Cluster) -> BigUint {
    partition::count(cluster.num_nodes(), config.num_partitions)
        * BigUint::from(cluster.target_nodes().len())
}
