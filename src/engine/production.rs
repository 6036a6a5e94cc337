//! Monthly PV yield model with a bounded memoization cache.

use std::collections::{HashMap, VecDeque};

use super::series::{DAYS_IN_MONTH, MonthlySeries};

/// Seasonal irradiance multipliers, January first. Above 1.0 in the southern
/// summer, below 1.0 in the southern winter; fixed for the target latitude.
pub const SEASONAL_FACTORS: [f64; 12] = [
    1.18, 1.12, 1.08, 0.95, 0.85, 0.78, 0.80, 0.88, 0.98, 1.08, 1.15, 1.18,
];

/// Computes the monthly PV energy yield in kWh.
///
/// For month `i`:
/// `yield[i] = capacity × irradiance × SEASONAL_FACTORS[i] × (1 − loss/100) × days[i]`
///
/// Pure function of its three inputs — identical inputs always produce
/// identical output, which is what makes [`YieldCache`] valid.
///
/// # Arguments
///
/// * `capacity_kwc` - Installed peak capacity (kWc, > 0)
/// * `irradiance` - Site irradiance (kWh per kWc per day, > 0)
/// * `loss_pct` - System losses in percent (0 ≤ loss < 100)
pub fn monthly_yield(capacity_kwc: f64, irradiance: f64, loss_pct: f64) -> MonthlySeries {
    let derate = 1.0 - loss_pct / 100.0;
    MonthlySeries::from_fn(|i| {
        capacity_kwc * irradiance * SEASONAL_FACTORS[i] * derate * f64::from(DAYS_IN_MONTH[i])
    })
}

/// Cache key: exact bit patterns of the three yield inputs.
///
/// Bitwise equality is the right notion here — the cache must only ever
/// return a hit for inputs that are byte-identical to a previous call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct YieldKey {
    capacity: u64,
    irradiance: u64,
    loss: u64,
}

impl YieldKey {
    fn new(capacity_kwc: f64, irradiance: f64, loss_pct: f64) -> Self {
        Self {
            capacity: capacity_kwc.to_bits(),
            irradiance: irradiance.to_bits(),
            loss: loss_pct.to_bits(),
        }
    }
}

/// Bounded read-through cache over [`monthly_yield`].
///
/// Holds at most `capacity` entries and evicts the least recently used one
/// when full. Strictly a performance optimization: skipping the cache and
/// calling [`monthly_yield`] directly produces identical results.
#[derive(Debug)]
pub struct YieldCache {
    capacity: usize,
    entries: HashMap<YieldKey, MonthlySeries>,
    // Keys ordered least- to most-recently used.
    order: VecDeque<YieldKey>,
}

/// Default cache capacity.
pub const YIELD_CACHE_CAPACITY: usize = 64;

impl Default for YieldCache {
    fn default() -> Self {
        Self::with_capacity(YIELD_CACHE_CAPACITY)
    }
}

impl YieldCache {
    /// Creates a cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Returns the cached yield for these inputs, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        capacity_kwc: f64,
        irradiance: f64,
        loss_pct: f64,
    ) -> MonthlySeries {
        let key = YieldKey::new(capacity_kwc, irradiance, loss_pct);

        if let Some(series) = self.entries.get(&key) {
            let series = *series;
            self.touch(key);
            return series;
        }

        let series = monthly_yield(capacity_kwc, irradiance, loss_pct);
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, series);
        self.order.push_back(key);
        series
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: YieldKey) {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
            self.order.push_back(key);
        }
    }
}
