//! Statistical tests for the sampling engine.

use crate::random::RandomStream;
use crate::sampling::{simple_random_sample, unequal_probability_sample};

/// Chi-squared critical value at the 0.9 quantile with 8 degrees of freedom.
const CHI_SQUARED_CRITICAL: f64 = 13.36157;

#[test]
fn simple_sampling_passes_the_goodness_of_fit_bound() {
    const POPULATION: usize = 9;
    const SAMPLE_SIZE: usize = 4;
    const REPETITIONS: usize = 5000;

    let mut counts = [0usize; POPULATION];
    RandomStream::scoped(0x5eed_2026, |stream| {
        for _ in 0..REPETITIONS {
            let draw = simple_random_sample(stream, POPULATION, SAMPLE_SIZE).unwrap();
            for &unit in &draw.indices {
                counts[unit] += 1;
            }
        }
    });

    let expected = REPETITIONS as f64 * SAMPLE_SIZE as f64 / POPULATION as f64;
    let statistic: f64 = counts
        .iter()
        .map(|&observed| {
            let deviation = observed as f64 - expected;
            deviation * deviation / expected
        })
        .sum();
    assert!(
        statistic < CHI_SQUARED_CRITICAL,
        "chi-squared statistic {statistic} exceeds {CHI_SQUARED_CRITICAL}; counts {counts:?}"
    );
}

#[test]
fn simple_sampling_covers_every_unit_eventually() {
    let mut stream = RandomStream::with_seed(31);
    let mut seen = [false; 9];
    for _ in 0..500 {
        let draw = simple_random_sample(&mut stream, 9, 4).unwrap();
        for &unit in &draw.indices {
            seen[unit] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn unequal_sampling_realizes_its_inclusion_probabilities() {
    const REPETITIONS: usize = 8000;
    let weights = [1.0, 1.0, 2.0, 2.0, 4.0];
    let sample_size = 2;

    let mut counts = [0usize; 5];
    let mut design = Vec::new();
    RandomStream::scoped(0xfeed_beef, |stream| {
        for _ in 0..REPETITIONS {
            let draw = unequal_probability_sample(stream, &weights, sample_size).unwrap();
            design = draw.inclusion_probabilities.clone();
            for &unit in &draw.indices {
                counts[unit] += 1;
            }
        }
    });

    // Frequencies converge on the design probabilities.
    for unit in 0..weights.len() {
        let realized = counts[unit] as f64 / REPETITIONS as f64;
        assert!(
            (realized - design[unit]).abs() < 0.02,
            "unit {unit}: realized {realized}, design {}",
            design[unit]
        );
    }

    // The design itself preserves the expected sample size and weight ratios.
    let total: f64 = design.iter().sum();
    assert!((total - sample_size as f64).abs() < 1e-12);
    assert!((design[2] / design[0] - 2.0).abs() < 1e-12);
    assert!((design[4] / design[0] - 4.0).abs() < 1e-12);
}

#[test]
fn unequal_sampling_draws_are_distinct_and_in_range() {
    let mut stream = RandomStream::with_seed(404);
    let weights = [0.5, 1.5, 2.5, 3.5, 0.1, 1.9];
    for _ in 0..300 {
        let draw = unequal_probability_sample(&mut stream, &weights, 3).unwrap();
        assert_eq!(draw.indices.len(), 3);
        assert!(draw.indices.is_distinct());
        draw.indices.validate(weights.len()).unwrap();
    }
}
