use anyhow::Result;
use clap::Parser;
use pta_datagen::{attribute_correlation, generate, Distribution, GeneratorConfig};
use pta_kernel::TupleId;

#[derive(Parser)]
#[command(name = "pta-datagen")]
#[command(about = "Generate a normalized synthetic dataset and print a sample", long_about = None)]
struct Args {
    /// Number of tuples
    #[arg(short, long, default_value_t = 1000)]
    n: usize,

    /// Number of attributes
    #[arg(short, long, default_value_t = 4)]
    d: usize,

    /// correlated, independent or anticorrelated
    #[arg(long, default_value = "independent")]
    distribution: String,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Tuples to print
    #[arg(long, default_value_t = 5)]
    sample: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let distribution: Distribution = args.distribution.parse()?;
    let config = GeneratorConfig { n: args.n, d: args.d, distribution, seed: args.seed };
    let data = generate(&config)?;

    println!("Generated {} {} tuples x {} attributes (seed {})", data.len(), distribution.name(), data.dims(), args.seed);
    if data.dims() > 1 {
        println!("corr(attr0, attr1) = {:.3}", attribute_correlation(&data, 0, 1));
    }
    for i in 0..args.sample.min(data.len()) {
        let row = data.row(TupleId(i as u32));
        let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
        println!("{:>6}: [{}]", i, cells.join(", "));
    }
    Ok(())
}
