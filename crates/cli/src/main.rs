use clap::{Parser, Subcommand};
use pta_cli::commands::{bench, inspect, validate};
use pta_cli::workload::Workload;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pta")]
#[command(about = "Partitioned threshold top-k: benchmark, validate and inspect the engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build once, then time repeated queries per execution
    Bench {
        #[command(flatten)]
        workload: Workload,

        #[arg(short, long, default_value_t = 10)]
        k: usize,

        /// Number of trailing attributes to score (0 = all)
        #[arg(long, default_value_t = 0)]
        qq: usize,

        /// Also time qq + step, qq + 2*step, ... up to d (0 = no sweep)
        #[arg(long, default_value_t = 0)]
        qq_step: usize,

        /// Timed repetitions per execution, after one warm-up query
        #[arg(long, default_value_t = 10)]
        queries: usize,

        /// scalar, simd, threaded or all
        #[arg(long, default_value = "all")]
        execution: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare every execution against a brute-force scan
    Validate {
        #[command(flatten)]
        workload: Workload,

        /// k values to check
        #[arg(short, long, value_delimiter = ',', default_values_t = vec![1, 16, 64, 256])]
        k: Vec<usize>,

        #[arg(long, default_value_t = 0)]
        qq: usize,

        #[arg(long, default_value = "all")]
        execution: String,

        /// Relative score tolerance
        #[arg(long, default_value_t = pta_kernel::config::DEFAULT_VALIDATION_TOLERANCE)]
        tolerance: f64,

        #[arg(long)]
        json: bool,
    },
    /// Build the layout and report partition and block statistics
    Inspect {
        #[command(flatten)]
        workload: Workload,

        /// Also list every partition
        #[arg(long)]
        partitions: bool,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "pta_kernel=info,pta_cli=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { workload, k, qq, qq_step, queries, execution, json } => {
            bench::run(&workload, k, qq, qq_step, queries, &execution, json)
        }
        Commands::Validate { workload, k, qq, execution, tolerance, json } => {
            validate::run(&workload, &k, qq, &execution, tolerance, json)
        }
        Commands::Inspect { workload, partitions, json } => inspect::run(&workload, partitions, json),
    }
}
