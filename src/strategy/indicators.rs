//rolling indicator helpers shared by the strategy implementations
//
//each helper takes the full close (or bar) history plus the index of the
//current bar and returns None while the window is not yet covered, so callers
//cannot accidentally compute an indicator over partial history

use crate::data::Bar;
use statrs::statistics::Statistics;

//simple average of a full slice
pub fn sma(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

//the window of values ending at index i, or None if i+1 < window
pub fn window_ending_at(values: &[f64], i: usize, window: usize) -> Option<&[f64]> {
    if window == 0 || i >= values.len() || i + 1 < window {
        return None;
    }
    Some(&values[i + 1 - window..=i])
}

//simple moving average of the last `window` values ending at index i
pub fn rolling_sma(values: &[f64], i: usize, window: usize) -> Option<f64> {
    window_ending_at(values, i, window).and_then(sma)
}

//sample standard deviation of the last `window` values ending at index i
pub fn rolling_std(values: &[f64], i: usize, window: usize) -> Option<f64> {
    if window < 2 {
        return None;
    }
    window_ending_at(values, i, window).map(|w| w.std_dev())
}

//relative strength index over the last `period` price changes ending at i
//simple (not Wilder-smoothed) averages of gains and losses
pub fn rsi(closes: &[f64], i: usize, period: usize) -> Option<f64> {
    let window = window_ending_at(closes, i, period + 1)?;

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += -change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}

//true range of bar i: max(high-low, |high-prev_close|, |low-prev_close|)
pub fn true_range(bars: &[Bar], i: usize) -> Option<f64> {
    if i == 0 || i >= bars.len() {
        return None;
    }
    let bar = &bars[i];
    let prev_close = bars[i - 1].close;
    Some(
        bar.range()
            .max((bar.high - prev_close).abs())
            .max((bar.low - prev_close).abs()),
    )
}

//average true range over the last `period` bars ending at i
pub fn atr(bars: &[Bar], i: usize, period: usize) -> Option<f64> {
    if period == 0 || i < period {
        return None;
    }
    let mut sum = 0.0;
    for j in i + 1 - period..=i {
        sum += true_range(bars, j)?;
    }
    Some(sum / period as f64)
}

//highest high over the `window` bars strictly before index i
pub fn prior_high(bars: &[Bar], i: usize, window: usize) -> Option<f64> {
    if window == 0 || i < window {
        return None;
    }
    bars[i - window..i]
        .iter()
        .map(|b| b.high)
        .fold(None, |acc, h| Some(acc.map_or(h, |a: f64| a.max(h))))
}

//lowest low over the `window` bars strictly before index i
pub fn prior_low(bars: &[Bar], i: usize, window: usize) -> Option<f64> {
    if window == 0 || i < window {
        return None;
    }
    bars[i - window..i]
        .iter()
        .map(|b| b.low)
        .fold(None, |acc, l| Some(acc.map_or(l, |a: f64| a.min(l))))
}

//highest close over the `window` closes strictly before index i
pub fn prior_close_high(closes: &[f64], i: usize, window: usize) -> Option<f64> {
    if window == 0 || i < window {
        return None;
    }
    closes[i - window..i]
        .iter()
        .copied()
        .fold(None, |acc, c| Some(acc.map_or(c, |a: f64| a.max(c))))
}
