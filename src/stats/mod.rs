//! Numerically-stable single-pass statistics.
//!
//! `Moments` maintains running count, sum, extrema, and central
//! moments up to the fourth via the Welford/Pébay update, so a group
//! of any size aggregates in O(1) space without retaining raw values.
//! Variance and standard deviation are sample statistics; skewness and
//! kurtosis use the bias-corrected estimators (kurtosis is excess).

/// Streaming accumulator over non-null numeric observations.
#[derive(Debug, Clone, Default)]
pub struct Moments {
    n: u64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Moments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation into the running moments.
    pub fn push(&mut self, x: f64) {
        if self.n == 0 {
            self.min = x;
            self.max = x;
        } else {
            self.min = self.min.min(x);
            self.max = self.max.max(x);
        }
        self.sum += x;
        let n1 = self.n as f64;
        self.n += 1;
        let n = self.n as f64;
        let delta = x - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1;
        self.mean += delta_n;
        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
    }

    /// Number of observations folded in.
    pub fn count(&self) -> u64 {
        self.n
    }

    pub fn sum(&self) -> Option<f64> {
        (self.n > 0).then_some(self.sum)
    }

    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean)
    }

    pub fn min(&self) -> Option<f64> {
        (self.n > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.n > 0).then_some(self.max)
    }

    /// Sample variance; needs at least two observations.
    pub fn variance(&self) -> Option<f64> {
        (self.n > 1).then(|| self.m2 / (self.n as f64 - 1.0))
    }

    /// Sample standard deviation.
    pub fn stddev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Bias-corrected sample skewness; needs at least three
    /// observations and non-zero spread.
    pub fn skewness(&self) -> Option<f64> {
        if self.n < 3 {
            return None;
        }
        let n = self.n as f64;
        let std = self.stddev()?;
        if std == 0.0 {
            return None;
        }
        Some(n / ((n - 1.0) * (n - 2.0)) * self.m3 / (std * std * std))
    }

    /// Bias-corrected excess kurtosis; needs at least four
    /// observations and non-zero spread.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.n < 4 {
            return None;
        }
        let n = self.n as f64;
        let var = self.variance()?;
        if var == 0.0 {
            return None;
        }
        let core = n * (n + 1.0) / ((n - 1.0) * (n - 2.0) * (n - 3.0)) * self.m4 / (var * var);
        let correction = 3.0 * (n - 1.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0));
        Some(core - correction)
    }
}

/// Median by in-place selection. The one order statistic in the
/// battery; it has to see the values, so the caller hands them over.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}
