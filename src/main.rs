use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quantbt::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quantbt")]
#[command(about = "A Rust-based strategy backtesting engine for equities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //import an exported ohlcv csv into the price cache
    Fetch {
        //path to the raw csv file (Date,Open,High,Low,Close,Volume)
        #[arg(long)]
        input: PathBuf,

        //symbol to store the data under (eg GOOGL)
        #[arg(long)]
        symbol: String,

        //price cache directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    //run one strategy on one symbol
    Run {
        //symbol to backtest (eg GOOGL)
        #[arg(long)]
        symbol: String,

        //strategy name (buy_and_hold, sma, rsi, bollinger, ma200, momentum, atr, donchian)
        #[arg(long)]
        strategy: Option<String>,

        //strategy yaml config file; overrides --strategy and parameter flags
        #[arg(long)]
        config: Option<PathBuf>,

        //price cache directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        //initial account cash
        #[arg(long, default_value = "100000")]
        initial_cash: f64,

        //fraction of cash allocated per entry, in [0, 1]
        #[arg(long, default_value = "1.0")]
        allocation: f64,

        //trading periods per year used for annualization
        #[arg(long, default_value = "252")]
        periods_per_year: f64,

        //sma strategy parameters
        #[arg(long)]
        fast: Option<i64>,
        #[arg(long)]
        slow: Option<i64>,

        //rsi / atr period
        #[arg(long)]
        period: Option<i64>,

        //rsi thresholds
        #[arg(long)]
        oversold: Option<f64>,
        #[arg(long)]
        overbought: Option<f64>,

        //bollinger / trend filter / breakout window
        #[arg(long)]
        window: Option<i64>,

        //bollinger band width in standard deviations
        #[arg(long)]
        num_std: Option<f64>,

        //momentum lookback
        #[arg(long)]
        lookback: Option<i64>,

        //atr stop multiplier
        #[arg(long)]
        multiplier: Option<f64>,

        //output options
        #[arg(long)]
        output_equity_csv: Option<PathBuf>,
        #[arg(long)]
        output_trades_csv: Option<PathBuf>,
    },

    //run every configured strategy on every cached symbol
    RunAll {
        //batch yaml config file
        #[arg(long)]
        config: Option<PathBuf>,

        //price cache directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        //directory for batch results and reports
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },

    //compare all strategies on a single symbol
    Compare {
        //symbol to analyze
        #[arg(long)]
        symbol: String,

        //price cache directory
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        //directory for batch results and reports
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,

        //initial account cash
        #[arg(long, default_value = "100000")]
        initial_cash: f64,

        //fraction of cash allocated per entry, in [0, 1]
        #[arg(long, default_value = "1.0")]
        allocation: f64,
    },

    //regenerate report files from the last saved batch run
    Report {
        //directory holding batch_results.json
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            input,
            symbol,
            data_dir,
        } => fetch(input, symbol, data_dir),
        Commands::Run {
            symbol,
            strategy,
            config,
            data_dir,
            initial_cash,
            allocation,
            periods_per_year,
            fast,
            slow,
            period,
            oversold,
            overbought,
            window,
            num_std,
            lookback,
            multiplier,
            output_equity_csv,
            output_trades_csv,
        } => {
            let mut params = ParamMap::new();
            for (key, value) in [
                ("fast", fast),
                ("slow", slow),
                ("period", period),
                ("window", window),
                ("lookback", lookback),
            ] {
                if let Some(v) = value {
                    params.insert(key.to_string(), v as f64);
                }
            }
            for (key, value) in [
                ("oversold", oversold),
                ("overbought", overbought),
                ("num_std", num_std),
                ("multiplier", multiplier),
            ] {
                if let Some(v) = value {
                    params.insert(key.to_string(), v);
                }
            }

            run_one(RunArgs {
                symbol,
                strategy,
                config,
                data_dir,
                initial_cash,
                allocation,
                periods_per_year,
                params,
                output_equity_csv,
                output_trades_csv,
            })
        }
        Commands::RunAll {
            config,
            data_dir,
            output_dir,
        } => run_all(config, data_dir, output_dir),
        Commands::Compare {
            symbol,
            data_dir,
            output_dir,
            initial_cash,
            allocation,
        } => compare(symbol, data_dir, output_dir, initial_cash, allocation),
        Commands::Report { output_dir } => report(output_dir),
    }
}

fn fetch(input: PathBuf, symbol: String, data_dir: PathBuf) -> Result<()> {
    let mut cache = PriceCache::new(&data_dir);
    let count = import_raw_csv(&mut cache, &symbol, &input)
        .context(format!("Failed to import {:?}", input))?;
    println!(
        "Imported {} bars for {} into {:?}",
        count,
        symbol,
        cache.dir()
    );
    Ok(())
}

struct RunArgs {
    symbol: String,
    strategy: Option<String>,
    config: Option<PathBuf>,
    data_dir: PathBuf,
    initial_cash: f64,
    allocation: f64,
    periods_per_year: f64,
    params: ParamMap,
    output_equity_csv: Option<PathBuf>,
    output_trades_csv: Option<PathBuf>,
}

fn run_one(args: RunArgs) -> Result<()> {
    println!("quantbt Equity Backtesting Engine");
    println!("=================================\n");

    //resolve the strategy and account settings, config file first
    let (strategy, config) = match &args.config {
        Some(path) => {
            let file = StrategyConfig::from_yaml_file(path)?;
            let strategy = file.build()?;
            let config = BacktestConfig {
                initial_cash: file.initial_cash,
                allocation: file.allocation,
                periods_per_year: file.periods_per_year,
            };
            (strategy, config)
        }
        None => {
            let name = args
                .strategy
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("either --strategy or --config is required"))?;
            let kind = StrategyKind::parse(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", name))?;
            let strategy = build_strategy(kind, &args.params)?;
            let config = BacktestConfig {
                initial_cash: args.initial_cash,
                allocation: args.allocation,
                periods_per_year: args.periods_per_year,
            };
            (strategy, config)
        }
    };

    let mut cache = PriceCache::new(&args.data_dir);
    let bars = cache.load(&args.symbol)?.to_vec();

    println!("Loaded {} bars for {}", bars.len(), args.symbol);
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!(
            "Date range: {} to {}\n",
            first.timestamp.format("%Y-%m-%d"),
            last.timestamp.format("%Y-%m-%d")
        );
    }

    println!("Strategy: {}", strategy.name());
    println!("Initial cash: ${:.2}", config.initial_cash);
    println!("Allocation: {:.0}%\n", config.allocation * 100.0);

    println!("Running backtest...\n");
    let backtest = Backtest::new(config);
    let result = backtest.run(strategy.as_ref(), &bars)?;

    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    if result.skipped_signals > 0 {
        println!(
            "\n{} buy signal(s) skipped for insufficient cash",
            result.skipped_signals
        );
    }

    if let Some(path) = args.output_equity_csv {
        save_equity_csv(&result.equity_curve, &path)?;
        println!("\nEquity curve saved to {:?}", path);
    }

    if let Some(path) = args.output_trades_csv {
        save_trades_csv(&result.trades, &path)?;
        println!("Trades saved to {:?}", path);
    }

    Ok(())
}

fn load_jobs(
    strategy_names: &[String],
    symbols: &[String],
    cache: &mut PriceCache,
    config: &BacktestConfig,
) -> Result<Vec<BatchJob>> {
    //load each symbol once, clone per job
    let mut series = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let bars = cache.load(symbol)?.to_vec();
        series.push((symbol.clone(), bars));
    }

    //strategies are stateless, so each job gets its own instance
    let mut jobs = Vec::new();
    for name in strategy_names {
        let kind = StrategyKind::parse(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", name))?;
        for (symbol, bars) in &series {
            jobs.push(BatchJob {
                strategy_name: name.clone(),
                symbol: symbol.clone(),
                strategy: build_strategy(kind, &ParamMap::new())?,
                bars: bars.clone(),
                config: config.clone(),
            });
        }
    }

    Ok(jobs)
}

fn run_all(config: Option<PathBuf>, data_dir: PathBuf, output_dir: PathBuf) -> Result<()> {
    let batch_config = match config {
        Some(path) => BatchConfig::from_yaml_file(path)?,
        None => BatchConfig::default(),
    };

    let mut cache = PriceCache::new(&data_dir);
    let symbols = if batch_config.symbols.is_empty() {
        cache.symbols()?
    } else {
        batch_config.symbols.clone()
    };

    if symbols.is_empty() {
        anyhow::bail!("No cached symbols found in {:?}; run fetch first", data_dir);
    }

    //fail early on unknown strategy names before loading any data
    batch_config.build_strategies()?;
    println!(
        "Running {} strategies on {} symbols...\n",
        batch_config.strategies.len(),
        symbols.len()
    );

    let backtest_config = BacktestConfig {
        initial_cash: batch_config.initial_cash,
        allocation: batch_config.allocation,
        periods_per_year: batch_config.periods_per_year,
    };

    let jobs = load_jobs(
        &batch_config.strategies,
        &symbols,
        &mut cache,
        &backtest_config,
    )?;
    let outcomes = run_batch(jobs);
    let records = records_from_outcomes(&outcomes);

    println!("Batch Backtest Results");
    println!("======================\n");
    comparison_table(&records).printstd();

    write_outputs(&records, &output_dir)
}

fn compare(
    symbol: String,
    data_dir: PathBuf,
    output_dir: PathBuf,
    initial_cash: f64,
    allocation: f64,
) -> Result<()> {
    let mut cache = PriceCache::new(&data_dir);
    let bars = cache.load(&symbol)?.to_vec();

    println!(
        "Comparing all strategies on {} ({} bars)...\n",
        symbol,
        bars.len()
    );

    let backtest_config = BacktestConfig {
        initial_cash,
        allocation,
        ..BacktestConfig::default()
    };

    let mut jobs = Vec::new();
    for (name, strategy) in default_strategy_set()? {
        jobs.push(BatchJob {
            strategy_name: name.to_string(),
            symbol: symbol.clone(),
            strategy,
            bars: bars.clone(),
            config: backtest_config.clone(),
        });
    }

    let outcomes = run_batch(jobs);
    let records = records_from_outcomes(&outcomes);

    println!("Strategy Comparison: {}", symbol);
    println!("=====================\n");
    comparison_table(&records).printstd();

    write_outputs(&records, &output_dir)
}

fn report(output_dir: PathBuf) -> Result<()> {
    let records = load_batch_json(output_dir.join("batch_results.json"))
        .context("No saved batch results; run run-all or compare first")?;

    comparison_table(&records).printstd();

    let md_path = output_dir.join("report.md");
    save_markdown_report(&records, &md_path)?;
    println!("\nReport saved to {:?}", md_path);

    let csv_path = output_dir.join("batch_stats.csv");
    save_batch_stats_csv(&records, &csv_path)?;
    println!("Batch stats saved to {:?}", csv_path);

    Ok(())
}

fn write_outputs(records: &[BatchRecord], output_dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .context(format!("Failed to create output directory {:?}", output_dir))?;

    let json_path = output_dir.join("batch_results.json");
    save_batch_json(records, &json_path)?;
    println!("\nBatch results saved to {:?}", json_path);

    let csv_path = output_dir.join("batch_stats.csv");
    save_batch_stats_csv(records, &csv_path)?;
    println!("Batch stats saved to {:?}", csv_path);

    let md_path = output_dir.join("report.md");
    save_markdown_report(records, &md_path)?;
    println!("Report saved to {:?}", md_path);

    Ok(())
}
