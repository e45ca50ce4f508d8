//! 256-bin intensity histogram with incremental updates.

/// Intensity histogram over `u8` values.
///
/// Kept incrementally by the sliding-window filters; `add` / `remove`
/// are O(1) and every statistic is O(256).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; 256],
    population: u32,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            bins: [0; 256],
            population: 0,
        }
    }

    pub fn from_samples(samples: &[u8]) -> Self {
        let mut h = Self::new();
        for &v in samples {
            h.add(v);
        }
        h
    }

    #[inline]
    pub fn add(&mut self, value: u8) {
        self.bins[value as usize] += 1;
        self.population += 1;
    }

    #[inline]
    pub fn remove(&mut self, value: u8) {
        let bin = &mut self.bins[value as usize];
        debug_assert!(*bin > 0, "removing value {value} not in histogram");
        if *bin > 0 {
            *bin -= 1;
            self.population -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.bins.fill(0);
        self.population = 0;
    }

    pub fn bins(&self) -> &[u32; 256] {
        &self.bins
    }

    pub fn population(&self) -> u32 {
        self.population
    }

    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    pub fn mean(&self) -> Option<f64> {
        if self.population == 0 {
            return None;
        }
        let sum: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &h)| i as f64 * h as f64)
            .sum();
        Some(sum / self.population as f64)
    }

    pub fn min_value(&self) -> Option<u8> {
        self.bins.iter().position(|&h| h > 0).map(|i| i as u8)
    }

    pub fn max_value(&self) -> Option<u8> {
        self.bins.iter().rposition(|&h| h > 0).map(|i| i as u8)
    }

    /// Value at 0-based `rank` in sorted order; `None` if `rank >= population`.
    pub fn rank_value(&self, rank: u32) -> Option<u8> {
        if rank >= self.population {
            return None;
        }
        let mut seen = 0u32;
        for (i, &h) in self.bins.iter().enumerate() {
            seen += h;
            if seen > rank {
                return Some(i as u8);
            }
        }
        None
    }

    /// Otsu threshold of the histogram, as used per pixel by the rank filter.
    ///
    /// Returns the level `t` maximising the between-class variance of
    /// `{v <= t}` vs `{v > t}`. Levels are scanned upward from `1`; the
    /// first strict maximum wins and the search starts from `(0, 0.0)`, so an
    /// empty or single-valued histogram yields `0`.
    pub fn otsu_threshold(&self) -> u8 {
        if self.population == 0 {
            return 0;
        }
        let pop = self.population as u64;
        let sum_total = self.weighted_sum();

        let mut best_t = 0u8;
        let mut best_sigma = 0f64;
        // Class-one count and intensity sum, kept as integers so the
        // `n1 == pop` boundary is exact.
        let mut n1 = self.bins[0] as u64;
        let mut s1 = 0u64;

        for (i, &h) in self.bins.iter().enumerate().skip(1) {
            n1 += h as u64;
            s1 += i as u64 * h as u64;
            if n1 == 0 {
                continue;
            }
            if n1 == pop {
                break;
            }
            let sigma = between_class_variance(n1, s1, pop, sum_total);
            if sigma > best_sigma {
                best_sigma = sigma;
                best_t = i as u8;
            }
        }

        best_t
    }

    /// `Σ i·h[i]`.
    pub(crate) fn weighted_sum(&self) -> u64 {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, &h)| i as u64 * h as u64)
            .sum()
    }
}

/// Between-class variance `q1·q2·(m1 - m2)²` for a split with `n1` pixels
/// (intensity sum `s1`) in class one out of `pop` pixels (sum `sum_total`).
/// Both classes must be non-empty.
#[inline]
pub(crate) fn between_class_variance(n1: u64, s1: u64, pop: u64, sum_total: u64) -> f64 {
    let n2 = pop - n1;
    let m1 = s1 as f64 / n1 as f64;
    let m2 = (sum_total - s1) as f64 / n2 as f64;
    let q1 = n1 as f64 / pop as f64;
    let q2 = n2 as f64 / pop as f64;
    q1 * q2 * (m1 - m2) * (m1 - m2)
}
