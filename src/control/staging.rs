use tracing::info;

use crate::constants::KG_PER_TONNE;
use crate::control::launch_stages::Stage;
use crate::errors::SimulationError;

/// How far the line search runs. Under either rule a first step that does not
/// improve on the trivial split is reported as non-convergent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoppingRule {
    /// Stop at the first candidate that is worse than its predecessor.
    #[default]
    FirstIncrease,
    /// Evaluate every remaining candidate and keep the lowest cost seen.
    Exhaustive,
}

/// Line search over how the total structure mass of a two-stage rocket is
/// split between its stages, balancing the two stage mass ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagingOptimizer {
    pub structure_fraction: f64, // structure / (structure + propellant)
    pub payload: f64,            // t
    pub iterations: usize,
    pub stopping_rule: StoppingRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedStaging {
    pub stages: Vec<Stage>,
    pub mass_ratios: (f64, f64),
    pub initial_delta: f64,
    pub delta: f64,
    pub evaluations: usize,
}

struct Candidate {
    index: usize,
    ratios: (f64, f64),
    delta: f64,
}

impl StagingOptimizer {
    pub fn new(structure_fraction: f64, payload: f64, iterations: usize) -> Self {
        StagingOptimizer {
            structure_fraction,
            payload,
            iterations,
            stopping_rule: StoppingRule::FirstIncrease,
        }
    }

    pub fn with_stopping_rule(mut self, stopping_rule: StoppingRule) -> Self {
        self.stopping_rule = stopping_rule;
        self
    }

    fn validate(&self, stages: &[Stage]) -> Result<(), SimulationError> {
        if stages.len() != 2 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "staging optimization needs exactly two stages, got {}",
                stages.len()
            )));
        }
        if !(self.structure_fraction > 0.0 && self.structure_fraction < 1.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "structure fraction must lie in (0, 1), got {}",
                self.structure_fraction
            )));
        }
        if !(self.payload > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "payload must be positive, got {} t",
                self.payload
            )));
        }
        if self.iterations < 2 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "at least two candidate splits are needed, got {}",
                self.iterations
            )));
        }
        let total_structure: f64 = stages.iter().map(Stage::structure_mass).sum();
        if !(total_structure > 0.0) {
            return Err(SimulationError::InvalidConfiguration(
                "stages carry no structure mass to redistribute".to_string(),
            ));
        }
        Ok(())
    }

    fn propellant_for(&self, structure: f64) -> f64 {
        structure * (1.0 - self.structure_fraction) / self.structure_fraction
    }

    /// Mass ratios (lower, upper) when the upper stage gets `upper_structure` tonnes.
    fn mass_ratios(&self, total_structure: f64, upper_structure: f64) -> (f64, f64) {
        let lower_structure = total_structure - upper_structure;
        let payload = self.payload * KG_PER_TONNE;
        let lower_dry = lower_structure * KG_PER_TONNE;
        let lower_full = lower_dry + self.propellant_for(lower_structure) * KG_PER_TONNE;
        let upper_dry = upper_structure * KG_PER_TONNE + payload;
        let upper_full = upper_dry + self.propellant_for(upper_structure) * KG_PER_TONNE;

        (
            (lower_full + upper_full) / (lower_dry + upper_full),
            upper_full / upper_dry,
        )
    }

    pub fn optimize(&self, stages: &[Stage]) -> Result<OptimizedStaging, SimulationError> {
        self.validate(stages)?;

        let total_structure: f64 = stages.iter().map(Stage::structure_mass).sum();
        let increment = total_structure / self.iterations as f64;
        let evaluate = |index: usize| {
            let ratios = self.mass_ratios(total_structure, index as f64 * increment);
            Candidate {
                index,
                ratios,
                delta: (ratios.0 - ratios.1).abs(),
            }
        };

        let start = evaluate(0);
        let initial_delta = start.delta;
        let mut evaluations = 1;
        let mut best = start;
        let mut previous_delta = initial_delta;

        for index in 1..self.iterations {
            let candidate = evaluate(index);
            evaluations += 1;

            if candidate.delta >= previous_delta {
                if index == 1 {
                    return Err(SimulationError::NonConvergentOptimization(format!(
                        "first step raised the mass-ratio delta from {initial_delta} to {}",
                        candidate.delta
                    )));
                }
                if self.stopping_rule == StoppingRule::FirstIncrease {
                    break;
                }
            }
            previous_delta = candidate.delta;
            if candidate.delta < best.delta {
                best = candidate;
            }
        }

        let upper_structure = best.index as f64 * increment;
        let lower_structure = total_structure - upper_structure;

        let mut lower = stages[0].clone();
        lower.set_payload_mass(0.0)?;
        lower.set_masses(lower_structure, self.propellant_for(lower_structure))?;

        let mut upper = stages[1].clone();
        upper.set_payload_mass(self.payload)?;
        upper.set_masses(upper_structure, self.propellant_for(upper_structure))?;

        info!(
            evaluations,
            lower_structure,
            upper_structure,
            initial_delta,
            delta = best.delta,
            "Staging optimized"
        );

        Ok(OptimizedStaging {
            stages: vec![lower, upper],
            mass_ratios: best.ratios,
            initial_delta,
            delta: best.delta,
            evaluations,
        })
    }
}

/// Balances a two-stage rocket for `payload` tonnes with the default
/// first-increase stopping rule.
pub fn optimize_staging_two_stages(
    stages: &[Stage],
    structure_fraction: f64,
    payload: f64,
    iterations: usize,
) -> Result<Vec<Stage>, SimulationError> {
    StagingOptimizer::new(structure_fraction, payload, iterations)
        .optimize(stages)
        .map(|optimized| optimized.stages)
}
