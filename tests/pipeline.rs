//end-to-end tests: cache -> strategy -> simulator -> metrics -> report

use chrono::{Duration, TimeZone, Utc};
use quantbt::prelude::*;
use std::io::Write;

//daily bars where each open tracks the previous close
fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar::new(
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap() + Duration::days(i as i64),
                open,
                close.max(open) + 1.0,
                close.min(open) - 1.0,
                close,
                1_000.0,
            )
        })
        .collect()
}

//a deterministic wavy trend long enough for every default-free strategy
fn synthetic_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 0.3 * i as f64 + 8.0 * ((i as f64) * 0.21).sin())
        .collect()
}

#[test]
fn flat_market_never_trading_strategy_yields_all_zero_summary() {
    let bars = bars_from_closes(&[100.0, 100.0, 100.0, 100.0, 100.0]);
    let signals = vec![Signal::Hold; bars.len()];

    let simulator = Simulator::new(100.0, 1.0).unwrap();
    let result = simulator.run(&bars, &signals).unwrap();
    let summary =
        PerformanceSummary::from_backtest(&result.equity_curve, &result.trades, 252.0);

    assert_eq!(result.equity_curve.len(), 5);
    assert!(result.equity_curve.iter().all(|p| p.equity == 100.0));
    assert_eq!(summary.total_return, 0.0);
    assert_eq!(summary.sharpe_ratio, 0.0);
    assert!(!summary.sharpe_ratio.is_nan());
    assert_eq!(summary.max_drawdown, 0.0);
    assert_eq!(summary.num_trades, 0);
    assert_eq!(summary.win_rate, 0.0);
}

#[test]
fn every_default_strategy_emits_one_causal_signal_per_bar() {
    let closes = synthetic_closes(260);
    let bars = bars_from_closes(&closes);

    for (name, strategy) in default_strategy_set().unwrap() {
        let signals = strategy.generate_signals(&bars);
        assert_eq!(signals.len(), bars.len(), "{}", name);
        for (i, signal) in signals.iter().enumerate().take(strategy.warmup()) {
            assert_eq!(*signal, Signal::Hold, "{} at warmup index {}", name, i);
        }

        //causality: truncating the future must not change the past
        let cut = bars.len() / 2;
        let truncated = strategy.generate_signals(&bars[..cut]);
        assert_eq!(&signals[..cut], &truncated[..], "{}", name);

        //perturbing bars after index cut must leave signals up to cut intact
        let mut perturbed = bars.clone();
        for bar in perturbed.iter_mut().skip(cut + 1) {
            bar.open *= 1.5;
            bar.high *= 1.7;
            bar.low *= 1.4;
            bar.close *= 1.6;
        }
        let perturbed_signals = strategy.generate_signals(&perturbed);
        assert_eq!(&signals[..=cut], &perturbed_signals[..=cut], "{}", name);
    }
}

#[test]
fn equity_at_or_before_t_is_unaffected_by_future_prices() {
    let closes = synthetic_closes(80);
    let bars = bars_from_closes(&closes);
    let strategy = SmaCrossoverStrategy::new(5, 15).unwrap();
    let simulator = Simulator::new(10_000.0, 1.0).unwrap();

    let signals = strategy.generate_signals(&bars);
    let baseline = simulator.run(&bars, &signals).unwrap();

    let cut = 40;
    let mut perturbed = bars.clone();
    for bar in perturbed.iter_mut().skip(cut + 1) {
        bar.close += 25.0;
        bar.high += 25.0;
        bar.low += 25.0;
        bar.open += 25.0;
    }
    let perturbed_signals = strategy.generate_signals(&perturbed);
    let perturbed_run = simulator.run(&perturbed, &perturbed_signals).unwrap();

    assert_eq!(
        &baseline.equity_curve[..=cut],
        &perturbed_run.equity_curve[..=cut]
    );
}

#[test]
fn simulation_is_idempotent_across_the_full_pipeline() {
    let bars = bars_from_closes(&synthetic_closes(120));
    let backtest = Backtest::new(BacktestConfig::default());
    let strategy = ChannelBreakoutStrategy::new(10).unwrap();

    let first = backtest.run(&strategy, &bars).unwrap();
    let second = backtest.run(&strategy, &bars).unwrap();
    assert_eq!(first.equity_curve, second.equity_curve);
    assert_eq!(first.trades, second.trades);
    assert_eq!(first.summary, second.summary);
}

#[test]
fn trades_and_drawdown_honor_their_invariants() {
    let bars = bars_from_closes(&synthetic_closes(200));

    for (name, strategy) in default_strategy_set().unwrap() {
        let backtest = Backtest::new(BacktestConfig::default());
        let result = backtest.run(strategy.as_ref(), &bars).unwrap();

        assert_eq!(result.equity_curve.len(), bars.len(), "{}", name);
        assert!(result.summary.max_drawdown <= 0.0, "{}", name);
        assert!(
            (0.0..=1.0).contains(&result.summary.win_rate),
            "{}",
            name
        );
        for trade in &result.trades {
            assert!(trade.exit_time > trade.entry_time, "{}", name);
            assert!(trade.qty > 0, "{}", name);
        }
        for point in &result.equity_curve {
            assert!(point.cash >= 0.0, "{}", name);
            assert!((point.equity - point.cash - point.position_value).abs() < 1e-9);
        }
    }
}

#[test]
fn cache_to_report_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    //write a raw csv the way a data exporter would
    let raw = dir.path().join("raw.csv");
    {
        let mut file = std::fs::File::create(&raw).unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        let closes = synthetic_closes(60);
        for (i, close) in closes.iter().enumerate() {
            let open = if i == 0 { *close } else { closes[i - 1] };
            let date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
                + Duration::days(i as i64);
            writeln!(
                file,
                "{},{},{},{},{},{}",
                date.format("%Y-%m-%d"),
                open,
                close.max(open) + 1.0,
                close.min(open) - 1.0,
                close,
                10_000
            )
            .unwrap();
        }
    }

    let mut cache = PriceCache::new(dir.path().join("data"));
    let imported = import_raw_csv(&mut cache, "GOOGL", &raw).unwrap();
    assert_eq!(imported, 60);

    let bars = cache.load("GOOGL").unwrap().to_vec();
    validate_series(&bars).unwrap();

    let jobs = vec![
        BatchJob {
            strategy_name: "buy_and_hold".to_string(),
            symbol: "GOOGL".to_string(),
            strategy: Box::new(BuyAndHoldStrategy::new()),
            bars: bars.clone(),
            config: BacktestConfig::default(),
        },
        BatchJob {
            strategy_name: "sma_crossover".to_string(),
            symbol: "GOOGL".to_string(),
            strategy: Box::new(SmaCrossoverStrategy::new(5, 15).unwrap()),
            bars,
            config: BacktestConfig::default(),
        },
    ];

    let outcomes = run_batch(jobs);
    let records = records_from_outcomes(&outcomes);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.summary.is_some()));

    let json_path = dir.path().join("batch_results.json");
    save_batch_json(&records, &json_path).unwrap();
    let reloaded = load_batch_json(&json_path).unwrap();
    assert_eq!(reloaded.len(), 2);

    let md_path = dir.path().join("report.md");
    save_markdown_report(&reloaded, &md_path).unwrap();
    assert!(std::fs::read_to_string(&md_path)
        .unwrap()
        .contains("sma_crossover"));
}

#[test]
fn configuration_errors_fire_before_any_data_is_touched() {
    let config = StrategyConfig::from_yaml_str(
        "name: sma_crossover\nparams:\n  fast: -10\n  slow: 50\n",
    )
    .unwrap();
    assert!(matches!(
        config.build(),
        Err(ConfigurationError::InvalidWindow { .. })
    ));

    assert!(matches!(
        Simulator::new(100_000.0, 1.2),
        Err(ConfigurationError::InvalidAllocation(_))
    ));
}

#[test]
fn malformed_series_fails_fast_with_no_partial_curve() {
    let mut bars = bars_from_closes(&synthetic_closes(30));
    //swap two timestamps to break monotonicity
    let t = bars[10].timestamp;
    bars[10].timestamp = bars[11].timestamp;
    bars[11].timestamp = t;

    let strategy = BuyAndHoldStrategy::new();
    let backtest = Backtest::new(BacktestConfig::default());
    assert!(matches!(
        backtest.run(&strategy, &bars),
        Err(BacktestError::Data(
            DataIntegrityError::NonMonotonicTimestamp { .. }
        ))
    ));
}
