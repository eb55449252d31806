//! Random sampling without replacement.
//!
//! Both engines expose the first-order inclusion probability of every
//! population unit, so goodness-of-fit tests can compare realized inclusion
//! frequencies against the design.

use crate::error::{MatrixError, Result};
use crate::index::IndexCollection;
use crate::random::RandomStream;

/// A drawn sample: the selected unit indices (distinct, increasing) and the
/// per-unit first-order inclusion probabilities of the design.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDraw {
    pub indices: IndexCollection,
    pub inclusion_probabilities: Vec<f64>,
}

/// Draw `sample_size` distinct units from `{0, .., population_size - 1}`
/// with equal inclusion probability `sample_size / population_size`.
///
/// Uses sequential selection: unit `i` is accepted with probability
/// `needed / remaining`, which yields exactly `sample_size` units and the
/// uniform inclusion probability.
pub fn simple_random_sample(
    stream: &mut RandomStream,
    population_size: usize,
    sample_size: usize,
) -> Result<SampleDraw> {
    if sample_size > population_size {
        return Err(MatrixError::IndexOutOfRange {
            index: sample_size,
            bound: population_size + 1,
        });
    }

    let mut indices = Vec::with_capacity(sample_size);
    let mut needed = sample_size;
    for unit in 0..population_size {
        if needed == 0 {
            break;
        }
        let remaining = (population_size - unit) as f64;
        if stream.next_uniform() * remaining < needed as f64 {
            indices.push(unit);
            needed -= 1;
        }
    }
    debug_assert_eq!(needed, 0);

    let probability = sample_size as f64 / population_size as f64;
    Ok(SampleDraw {
        indices: IndexCollection::new(indices),
        inclusion_probabilities: vec![probability; population_size],
    })
}

/// Draw `sample_size` distinct units with inclusion probabilities
/// proportional to `weights`.
///
/// Target probabilities are the weights scaled so they sum to `sample_size`;
/// units whose scaled probability reaches 1 are forced into the sample and
/// the rest are rescaled, so expected sample size is preserved while the
/// remaining probabilities keep the specified ratios. Selection is ordered
/// systematic sampling, whose first-order inclusion probabilities equal the
/// targets exactly.
pub fn unequal_probability_sample(
    stream: &mut RandomStream,
    weights: &[f64],
    sample_size: usize,
) -> Result<SampleDraw> {
    let population_size = weights.len();
    if sample_size > population_size {
        return Err(MatrixError::IndexOutOfRange {
            index: sample_size,
            bound: population_size + 1,
        });
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(MatrixError::ComputationFailed { info: -1 });
    }

    // Scale weights to inclusion probabilities summing to the sample size,
    // forcing any unit that would exceed probability 1 and rescaling the rest
    // until the cap binds nowhere.
    let mut probabilities = vec![0.0; population_size];
    let mut forced = vec![false; population_size];
    loop {
        let forced_count = forced.iter().filter(|&&f| f).count();
        let free_weight: f64 = weights
            .iter()
            .zip(&forced)
            .filter(|(_, &f)| !f)
            .map(|(w, _)| *w)
            .sum();
        let remaining = (sample_size - forced_count) as f64;
        if free_weight <= 0.0 && remaining > 0.0 {
            return Err(MatrixError::ComputationFailed { info: -2 });
        }
        let mut capped = false;
        for unit in 0..population_size {
            if forced[unit] {
                probabilities[unit] = 1.0;
            } else {
                let scaled = weights[unit] * remaining / free_weight;
                if scaled >= 1.0 {
                    forced[unit] = true;
                    capped = true;
                } else {
                    probabilities[unit] = scaled;
                }
            }
        }
        if !capped {
            break;
        }
    }

    // Ordered systematic pass: the points u, u+1, .. land in disjoint unit
    // intervals of the cumulative probabilities, so no unit repeats.
    let start = stream.next_uniform();
    let mut indices = Vec::with_capacity(sample_size);
    let mut cumulative = 0.0;
    let mut next_point = start;
    for (unit, probability) in probabilities.iter().enumerate() {
        cumulative += probability;
        if next_point < cumulative && indices.len() < sample_size {
            indices.push(unit);
            next_point += 1.0;
        }
    }
    // Cumulative rounding can starve the last point of its unit; top up from
    // the tail so the draw always has the requested size.
    let mut unit = population_size;
    while indices.len() < sample_size && unit > 0 {
        unit -= 1;
        if probabilities[unit] > 0.0 && !indices.contains(&unit) {
            indices.push(unit);
        }
    }
    indices.sort_unstable();

    Ok(SampleDraw {
        indices: IndexCollection::new(indices),
        inclusion_probabilities: probabilities,
    })
}
