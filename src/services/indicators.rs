//! Indicator math over close-price series.
//!
//! Every function returns a series aligned 1:1 with its input. Windowed
//! indicators use `Option<f64>` and stay `None` until the trailing window is
//! full; that absence is what downstream signal rules key on, never a zero.

/// Simple Moving Average over the trailing `window` values.
///
/// Keeps a running sum and subtracts the value that falls out of the window.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .scan(0.0_f64, move |sum, (i, &v)| {
            *sum += v;
            if i >= window {
                *sum -= values[i - window];
            }

            let out = if i + 1 >= window {
                Some(*sum / window as f64)
            } else {
                None
            };

            Some(out)
        })
        .collect()
}

/// Exponential Moving Average with smoothing factor `alpha = 2 / (window + 1)`.
///
/// Seeded with the first value and recursively smoothed from there, so it is
/// defined at every index. The update is written as
/// `prev + alpha * (v - prev)`, which keeps a constant input exactly constant.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (window as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &v in &values[1..] {
        prev += alpha * (v - prev);
        out.push(prev);
    }

    out
}

/// Relative Strength Index over the trailing `period` close-to-close deltas.
///
/// Average gain and average loss are plain rolling means over the delta
/// window (not Wilder smoothing), so the value is undefined until `period`
/// deltas exist, i.e. for indices < `period`.
///
/// Division edge: when the average loss is zero, RSI is pinned to 100 if the
/// window saw any gain, and left undefined on a perfectly flat window.
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    for i in period..values.len() {
        let window = &deltas[i - period..i];
        let gain: f64 = window.iter().filter(|&&d| d > 0.0).sum::<f64>() / period as f64;
        let loss: f64 = -window.iter().filter(|&&d| d < 0.0).sum::<f64>() / period as f64;

        out[i] = if loss > 0.0 {
            let rs = gain / loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        } else if gain > 0.0 {
            Some(100.0)
        } else {
            None
        };
    }

    out
}

/// MACD line (`EMA(fast) - EMA(slow)`) and its signal line (`EMA` of the
/// MACD line over `signal_period`). Defined from the first bar, like [`ema`].
pub fn macd(
    values: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&line, signal_period);

    (line, signal)
}
