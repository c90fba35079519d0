use clap::{Args, Parser, Subcommand};
use log::info;
use recipe_harvest::config::{ErrorPolicy, HarvestConfig};
use recipe_harvest::pipeline::{default_output_prefix, process_file};
use recipe_harvest::Crawler;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Harvest recipes and convert them into CSV tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl the recipe site and write one JSON line per recipe
    Crawl(CrawlArgs),

    /// Convert a JSON Lines file into separate CSV files
    Process(ProcessArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many recipes
    #[arg(long)]
    max_recipes: Option<usize>,

    /// Delay between requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// JSON Lines file written by the crawler
    input: PathBuf,

    /// Prefix CSV filenames with PREFIX (default derived from input file)
    #[arg(short, long, value_name = "PREFIX")]
    output: Option<String>,

    /// Split ingredient amounts into value and unit
    #[arg(short = 's', long = "split-ingredient-amount")]
    split: bool,

    /// Normalize ingredient value (only makes sense with --split-ingredient-amount)
    #[arg(short = 'n', long = "normalize-ingredient-value")]
    normalize: bool,

    /// Skip malformed records instead of aborting
    #[arg(long)]
    skip_malformed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = HarvestConfig::load()?;

    match cli.command {
        Commands::Crawl(args) => {
            let mut crawl = config.crawl;
            if args.max_recipes.is_some() {
                crawl.max_recipes = args.max_recipes;
            }
            if let Some(delay) = args.delay_ms {
                crawl.download_delay_ms = delay;
            }

            let mut out: Box<dyn Write> = match &args.output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            let mut crawler = Crawler::new(crawl)?;
            let summary = crawler.run(&mut out).await?;
            info!("{:?}", summary);
        }
        Commands::Process(args) => {
            let mut options = config.process;
            options.split_amounts |= args.split;
            options.normalize_values |= args.normalize;
            if args.skip_malformed {
                options.error_policy = ErrorPolicy::Skip;
            }

            let prefix = args
                .output
                .unwrap_or_else(|| default_output_prefix(&args.input));
            process_file(&args.input, &prefix, &options)?;
        }
    }

    Ok(())
}
