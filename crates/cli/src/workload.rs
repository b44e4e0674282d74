use anyhow::{bail, Context, Result};
use clap::Args;
use pta_datagen::{generate, Distribution, GeneratorConfig};
use pta_kernel::{Dataset, EngineConfig, MergeStrategy, PartitionStrategy, Query, TopkEngine};
use std::time::{Duration, Instant};

/// Dataset and engine options shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct Workload {
    /// Number of tuples
    #[arg(short, long, default_value_t = 100_000)]
    pub n: usize,

    /// Number of attributes
    #[arg(short, long, default_value_t = 4)]
    pub d: usize,

    /// correlated, independent or anticorrelated
    #[arg(long, default_value = "independent")]
    pub distribution: String,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Tuples per block (multiple of 8)
    #[arg(long, default_value_t = 1024)]
    pub block_capacity: usize,

    /// polar or random
    #[arg(long, default_value = "polar")]
    pub partitioning: String,

    /// Bins per angle for polar partitioning
    #[arg(long, default_value_t = 2)]
    pub splits: usize,

    /// Partition count for random partitioning
    #[arg(long, default_value_t = 16)]
    pub partitions: usize,

    /// Worker threads for the threaded execution (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Merge with one shared heap instead of the tournament
    #[arg(long)]
    pub shared_heap: bool,
}

impl Default for Workload {
    fn default() -> Self {
        Self {
            n: 100_000,
            d: 4,
            distribution: "independent".into(),
            seed: 0,
            block_capacity: 1024,
            partitioning: "polar".into(),
            splits: 2,
            partitions: 16,
            threads: 0,
            shared_heap: false,
        }
    }
}

impl Workload {
    pub fn dataset(&self) -> Result<Dataset> {
        let distribution: Distribution = self.distribution.parse()?;
        let config = GeneratorConfig { n: self.n, d: self.d, distribution, seed: self.seed };
        generate(&config).context("Failed to generate dataset")
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        let partitioning = match self.partitioning.to_ascii_lowercase().as_str() {
            "polar" => PartitionStrategy::Polar { splits: self.splits },
            "random" => PartitionStrategy::Random { partitions: self.partitions },
            other => bail!("unknown partitioning '{}' (expected polar or random)", other),
        };
        Ok(EngineConfig {
            block_capacity: self.block_capacity,
            partitioning,
            threads: self.threads,
            merge: if self.shared_heap { MergeStrategy::SharedHeap } else { MergeStrategy::Tournament },
            ..Default::default()
        })
    }

    /// Generates the dataset and builds the engine, returning the build time.
    pub fn build(&self) -> Result<(TopkEngine, Duration)> {
        let dataset = self.dataset()?;
        let config = self.engine_config()?;
        let start = Instant::now();
        let engine = TopkEngine::build(dataset, config).context("Engine build failed")?;
        Ok((engine, start.elapsed()))
    }
}

/// Uniform weights over the last `qq` attributes, or all of them when `qq` is 0.
///
/// `k` and `qq` pass through unchanged; the engine rejects values it cannot serve.
pub fn query_for(k: usize, dims: usize, qq: usize) -> Query {
    if qq == 0 {
        Query::uniform(k, dims)
    } else {
        Query::trailing(k, dims, qq)
    }
}
