//! Serialization of testcases into the record format consumed by the protocol test harness,
//! and batching of records into bounded-size files.

use crate::{cluster::Cluster, config::Config, scenario::Testcase};
use anyhow::Context as _;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Serializes one testcase. The record is five newline-terminated fields followed by a blank
/// line: the three configured counts, the round-to-leaders map and the round-to-partition map.
/// A target leader is expanded into the `[leader, twin]` pair, in that order.
pub fn format_testcase(config: &Config, cluster: &Cluster, testcase: &Testcase<'_>) -> String {
    let mut leaders = String::from("{");
    let mut partitions = String::from("{");
    for (round, scenario) in testcase.iter().enumerate() {
        if round > 0 {
            leaders.push_str(", ");
            partitions.push_str(", ");
        }

        let mut round_leaders = vec![scenario.leader];
        if cluster.is_target(scenario.leader) {
            round_leaders.push(cluster.twin_of(scenario.leader));
        }
        leaders.push_str(&format!("{round}: {}", index_list(&round_leaders)));

        let blocks: Vec<String> = scenario.partition.iter().map(|b| index_list(b)).collect();
        partitions.push_str(&format!("{round}: [{}]", blocks.join(", ")));
    }
    leaders.push('}');
    partitions.push('}');

    format!(
        "{}\n{}\n{}\n{}\n{}\n\n",
        config.num_rounds, config.num_nodes, config.num_partitions, leaders, partitions
    )
}

fn index_list(indices: &[usize]) -> String {
    let items: Vec<String> = indices.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Batches serialized records and flushes them to sequenced files owned by one
/// (machine, worker) pair. Each worker holds its own writer; nothing is shared.
#[derive(Debug)]
pub struct TestcaseWriter {
    dir: PathBuf,
    machine_index: usize,
    worker_index: usize,
    testcases_per_file: usize,
    dry_run: bool,
    buf: String,
    buffered: usize,
    file_seq: usize,
}

impl TestcaseWriter {
    /// Creates a writer flushing to `dir`.
    pub fn new(
        dir: &Path,
        machine_index: usize,
        worker_index: usize,
        testcases_per_file: usize,
        dry_run: bool,
    ) -> Self {
        assert!(testcases_per_file > 0, "testcases per file must be positive");
        Self {
            dir: dir.to_owned(),
            machine_index,
            worker_index,
            testcases_per_file,
            dry_run,
            buf: String::new(),
            buffered: 0,
            file_seq: 0,
        }
    }

    /// Appends one record, flushing a full batch to a new file.
    pub fn push(&mut self, record: &str) -> anyhow::Result<()> {
        self.buf.push_str(record);
        self.buffered += 1;
        if self.buffered == self.testcases_per_file {
            self.flush()?;
        }
        Ok(())
    }

    /// Flushes the final partial batch. Workers with nothing accepted produce no files.
    pub fn finish(mut self) -> anyhow::Result<()> {
        self.flush()
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        if self.buffered == 0 {
            return Ok(());
        }
        // Dry runs reuse a single placeholder name per worker; the scratch directory is
        // discarded at the end of the run anyway.
        let name = if self.dry_run {
            format!("tmp-testcase-{}-{}", self.machine_index, self.worker_index)
        } else {
            format!(
                "testcase-{}-{}-{}",
                self.machine_index, self.worker_index, self.file_seq
            )
        };
        let path = self.dir.join(name);
        fs::write(&path, &self.buf).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), testcases = self.buffered, "flushed");
        self.file_seq += 1;
        self.buf.clear();
        self.buffered = 0;
        Ok(())
    }
}
