// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-free statistic accumulators.
//!
//! Each accumulator tracks `(n, sum, sum², min, max)` with atomics so
//! hot paths can record without locking. The standard deviation uses
//! `Σ(x-x̄)² = Σx² − 2x̄Σx + nx̄²`, computed from one snapshot of the
//! counters.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::hashmap::StrMap;

/// A named statistic accumulator.
#[derive(Debug)]
pub struct Statistic {
    name: String,
    n: AtomicU64,
    sum: AtomicI64,
    sum2: AtomicI64,
    min: AtomicI64,
    max: AtomicI64,
}

impl Statistic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            n: AtomicU64::new(0),
            sum: AtomicI64::new(0),
            sum2: AtomicI64::new(0),
            min: AtomicI64::new(i64::MAX),
            max: AtomicI64::new(i64::MIN),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record(&self, v: i64) {
        self.n.fetch_add(1, Ordering::AcqRel);
        self.sum.fetch_add(v, Ordering::AcqRel);
        self.sum2.fetch_add(v.wrapping_mul(v), Ordering::AcqRel);
        self.min.fetch_min(v, Ordering::AcqRel);
        self.max.fetch_max(v, Ordering::AcqRel);
    }

    pub fn reset(&self) {
        self.n.store(0, Ordering::Release);
        self.sum.store(0, Ordering::Release);
        self.sum2.store(0, Ordering::Release);
        self.min.store(i64::MAX, Ordering::Release);
        self.max.store(i64::MIN, Ordering::Release);
    }

    pub fn sample_n(&self) -> u64 {
        self.n.load(Ordering::Acquire)
    }

    /// Minimum recorded value; `NotFound` before the first sample.
    pub fn min(&self) -> Result<i64> {
        if self.sample_n() == 0 {
            return Err(Error::NotFound);
        }
        Ok(self.min.load(Ordering::Acquire))
    }

    /// Maximum recorded value; `NotFound` before the first sample.
    pub fn max(&self) -> Result<i64> {
        if self.sample_n() == 0 {
            return Err(Error::NotFound);
        }
        Ok(self.max.load(Ordering::Acquire))
    }

    /// Arithmetic mean; zero before the first sample.
    pub fn average(&self) -> f64 {
        let n = self.sample_n();
        if n == 0 {
            return 0.0;
        }
        self.sum.load(Ordering::Acquire) as f64 / n as f64
    }

    /// Standard deviation. `ssd` selects the sample (n−1) divisor.
    pub fn sd(&self, ssd: bool) -> f64 {
        let n = self.sample_n();
        if n == 0 || (ssd && n == 1) {
            return 0.0;
        }
        let sum = self.sum.load(Ordering::Acquire) as f64;
        let sum2 = self.sum2.load(Ordering::Acquire) as f64;
        let nf = n as f64;
        let avg = sum / nf;
        let ssum = sum2 - 2.0 * avg * sum + avg * avg * nf;
        let div = if ssd { nf - 1.0 } else { nf };
        (ssum / div).max(0.0).sqrt()
    }
}

static REGISTRY: std::sync::OnceLock<StrMap<Arc<Statistic>>> = std::sync::OnceLock::new();

fn registry() -> &'static StrMap<Arc<Statistic>> {
    REGISTRY.get_or_init(StrMap::new)
}

/// Create and register a named accumulator; `AlreadyExists` when the
/// name is taken.
pub fn create(name: &str) -> Result<Arc<Statistic>> {
    let stat = Arc::new(Statistic::new(name));
    registry().add(name.to_string(), Arc::clone(&stat))?;
    Ok(stat)
}

/// Look up a registered accumulator.
pub fn find(name: &str) -> Result<Arc<Statistic>> {
    registry().find(name)
}

/// Remove a registered accumulator; existing handles stay usable.
pub fn forget(name: &str) -> Result<()> {
    registry().delete(name).map(|_| ())
}

#[cfg(test)]
#[path = "statistic_tests.rs"]
mod tests;
