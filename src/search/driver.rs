// Extremal search over feasible digit assignments

use crate::config::SolverConfig;
use crate::interpreter::constants::{DIGIT_MAX, DIGIT_MIN};
use crate::interpreter::engine::Analysis;
use crate::interpreter::errors::AnalysisError;
use crate::search::generator::Odometer;
use crate::search::resolver::ResolutionPlan;
use rayon::prelude::*;
use tracing::{debug, info};

/// Largest and smallest feasible numbers, digits read most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extremes {
    pub max: u64,
    pub min: u64,
}

impl Extremes {
    pub fn single(number: u64) -> Self {
        Extremes {
            max: number,
            min: number,
        }
    }

    pub fn including(self, number: u64) -> Self {
        Extremes {
            max: self.max.max(number),
            min: self.min.min(number),
        }
    }

    /// Combine two partial results; `None` means no feasible candidate
    pub fn merge(a: Option<Extremes>, b: Option<Extremes>) -> Option<Extremes> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Extremes {
                max: a.max.max(b.max),
                min: a.min.min(b.min),
            }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Search every surviving path of `analysis` and return the extremes over all
/// of them, or `None` when no assignment is feasible.
#[tracing::instrument(skip_all, name = "search", fields(results = analysis.results.len(), width = analysis.width))]
pub fn search(
    analysis: &Analysis,
    config: &SolverConfig,
) -> Result<Option<Extremes>, AnalysisError> {
    config.validate()?;
    let pool = if config.parallel {
        Some(build_thread_pool(config.threads)?)
    } else {
        None
    };

    let mut best = None;
    for (idx, result) in analysis.results.iter().enumerate() {
        let plan = ResolutionPlan::build(result)?;
        debug!(
            result = idx,
            in_use = plan.in_use.len(),
            free = plan.free.len(),
            pins = plan.pins.len(),
            checks = plan.checks.len(),
            skip_value = plan.value_is_zero,
            "resolution plan"
        );

        let found = match &pool {
            Some(pool) => scan_parallel(&plan, analysis.width, pool)?,
            None => scan(&plan, analysis.width, None)?,
        };
        best = Extremes::merge(best, found);
    }

    match best {
        Some(extremes) => info!(max = extremes.max, min = extremes.min, "search finished"),
        None => info!("search finished without a feasible assignment"),
    }
    Ok(best)
}

/// Scan one plan, fanning out on the value of its most significant free wheel
pub fn scan_parallel(
    plan: &ResolutionPlan,
    width: usize,
    pool: &rayon::ThreadPool,
) -> Result<Option<Extremes>, AnalysisError> {
    if plan.free.is_empty() {
        return scan(plan, width, None);
    }

    let partials: Vec<Result<Option<Extremes>, AnalysisError>> = pool.install(|| {
        (DIGIT_MIN..=DIGIT_MAX)
            .into_par_iter()
            .map(|lead| scan(plan, width, Some(lead)))
            .collect()
    });

    partials
        .into_iter()
        .try_fold(None, |best, partial| Ok(Extremes::merge(best, partial?)))
}

/// Enumerate the free wheels of `plan` over a `width`-digit buffer.
///
/// With `lead` set, the first free wheel is held at that value and only the
/// remaining wheels turn.
pub fn scan(
    plan: &ResolutionPlan,
    width: usize,
    lead: Option<i64>,
) -> Result<Option<Extremes>, AnalysisError> {
    if let Some(&highest) = plan.in_use.last() {
        if highest >= width {
            return Err(AnalysisError::contract(format!(
                "digit d{} is outside the {}-digit assignment",
                highest, width
            )));
        }
    }

    let mut digits = vec![DIGIT_MIN; width];
    let wheels = match lead {
        Some(value) => {
            let (&first, rest) = plan.free.split_first().ok_or_else(|| {
                AnalysisError::contract("a leading wheel value needs at least one free digit")
            })?;
            digits[first] = value;
            rest
        }
        None => &plan.free[..],
    };

    let mut odometer = Odometer::new(wheels.len());
    debug!(
        lead = ?lead,
        wheels = odometer.wheels(),
        candidates = odometer.total(),
        "scanning candidates"
    );
    let mut best: Option<Extremes> = None;
    while let Some(tuple) = odometer.next_tuple() {
        for (&position, &value) in wheels.iter().zip(tuple) {
            digits[position] = value;
        }
        if plan.accepts(&mut digits)? {
            let number = to_number(&digits)?;
            best = Some(match best {
                Some(extremes) => extremes.including(number),
                None => Extremes::single(number),
            });
        }
    }
    Ok(best)
}

/// Base-10 value of a digit buffer
fn to_number(digits: &[i64]) -> Result<u64, AnalysisError> {
    digits
        .iter()
        .try_fold(0u64, |acc, &digit| {
            acc.checked_mul(10)?.checked_add(u64::try_from(digit).ok()?)
        })
        .ok_or_else(|| {
            AnalysisError::contract(format!("{} digits do not fit in a u64", digits.len()))
        })
}

fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool, AnalysisError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| AnalysisError::config(format!("failed to build rayon thread pool: {e}")))
}
