use tracing::{debug, info, warn};

use crate::constants::APOAPSIS_TOLERANCE_FRACTION;
use crate::control::environment::Environment;
use crate::control::guidance::GravityTurn;
use crate::control::launch_stages::Stage;
use crate::control::mission::Mission;
use crate::errors::SimulationError;
use crate::trajectory_system::aerodynamics::Aerodynamics;
use crate::trajectory_system::physics::{FlightLosses, PhysicsModel};
use crate::trajectory_system::state::{FlightPhase, FlightState, Trajectory};

const MAX_PREALLOCATED_STATES: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSummary {
    pub gravity_loss: f64,        // m/s
    pub drag_loss: f64,           // m/s
    pub delta_v: f64,             // m/s
    pub residual_propellant: f64, // kg
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightOutcome {
    pub trajectory: Trajectory,
    pub summary: FlightSummary,
}

/// Fixed-step Euler integration of a multi-stage ascent.
#[derive(Debug, Clone)]
pub struct FlightSim {
    stages: Vec<Stage>,
    gravity_turn: GravityTurn,
    mission: Mission,
    physics: PhysicsModel,
}

impl FlightSim {
    pub fn new(
        stages: Vec<Stage>,
        gravity_turn: GravityTurn,
        mission: Mission,
        aerodynamics: Aerodynamics,
    ) -> Result<Self, SimulationError> {
        mission.validate()?;
        if stages.is_empty() {
            return Err(SimulationError::EmptyStageList);
        }
        if let Some(stage) = stages.iter().find(|stage| !(stage.propellant_mass_flow() > 0.0)) {
            return Err(SimulationError::NonPositiveMassFlow(stage.propellant_mass_flow()));
        }

        let physics = PhysicsModel::new(Environment::new(mission.body.clone()), aerodynamics);
        Ok(FlightSim {
            stages,
            gravity_turn,
            mission,
            physics,
        })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn gravity_turn(&self) -> &GravityTurn {
        &self.gravity_turn
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn physics(&self) -> &PhysicsModel {
        &self.physics
    }

    /// Runs the ascent. Every call starts from the pad with fresh loss totals.
    pub fn simulate(&self) -> Result<FlightOutcome, SimulationError> {
        let mut run = FlightRun::new(self);

        for index in 0..self.stages.len() {
            run.burn_stage(index)?;
        }

        let summary = run.summary();
        info!(
            gravity_loss = summary.gravity_loss,
            drag_loss = summary.drag_loss,
            delta_v = summary.delta_v,
            residual_propellant = summary.residual_propellant,
            "Ascent complete"
        );

        Ok(FlightOutcome {
            trajectory: run.trajectory,
            summary,
        })
    }

    fn estimated_steps(&self) -> usize {
        let burn: f64 = self.stages.iter().map(Stage::burn_time).sum();
        ((burn / self.mission.time_step).ceil() as usize + 1).min(MAX_PREALLOCATED_STATES)
    }
}

/// State owned by one simulation run.
struct FlightRun<'a> {
    sim: &'a FlightSim,
    state: FlightState,
    losses: FlightLosses,
    trajectory: Trajectory,
}

impl<'a> FlightRun<'a> {
    fn new(sim: &'a FlightSim) -> Self {
        FlightRun {
            sim,
            state: FlightState::on_pad(
                &sim.mission.body,
                sim.physics.environment.ambient_temperature,
            ),
            losses: FlightLosses::default(),
            trajectory: Trajectory::with_capacity(sim.estimated_steps()),
        }
    }

    fn time_step(&self) -> f64 {
        self.sim.mission.time_step
    }

    fn burn_stage(&mut self, index: usize) -> Result<(), SimulationError> {
        let sim = self.sim;
        let stage = &sim.stages[index];
        let upper_stack_mass: f64 = sim.stages[index + 1..].iter().map(Stage::full_mass).sum();
        let last_stage = index + 1 == sim.stages.len();
        let time_step = self.time_step();

        info!(
            stage = index + 1,
            time = self.state.time,
            burn_time = stage.burn_time(),
            "Igniting stage"
        );

        let mut step = 0usize;
        while (step as f64) * time_step < stage.burn_time() {
            self.advance(stage, (step as f64) * time_step, upper_stack_mass, true)?;
            step += 1;
            self.record(FlightPhase::Ascent);

            if !last_stage {
                continue;
            }
            let Some(target) = sim.mission.target() else {
                continue;
            };
            if self.state.orbit.apoapsis_height < target {
                continue;
            }

            if sim.mission.circularize {
                info!(
                    time = self.state.time,
                    apoapsis_height = self.state.orbit.apoapsis_height,
                    "Apoapsis at target height - shutting off"
                );
                return self.circularize(stage, step, upper_stack_mass, target);
            }
            if self.eccentricity_rising() {
                info!(
                    time = self.state.time,
                    periapsis_height = self.state.orbit.periapsis_height,
                    "Eccentricity rising again - shutting off"
                );
                return Ok(());
            }
        }

        debug!(stage = index + 1, time = self.state.time, "Stage burnout");
        Ok(())
    }

    /// Coast to apoapsis, then burn until the orbit stops getting rounder.
    fn circularize(
        &mut self,
        stage: &Stage,
        mut step: usize,
        upper_stack_mass: f64,
        target: f64,
    ) -> Result<(), SimulationError> {
        if !self.state.orbit.is_bound() {
            warn!(
                time = self.state.time,
                "Vehicle is on an escape trajectory - skipping circularization"
            );
            return Ok(());
        }

        while !self.at_apoapsis(target) {
            self.advance(stage, 0.0, 0.0, false)?;
            self.record(FlightPhase::WaitingForApoapsis);
        }

        info!(
            time = self.state.time,
            height = self.state.height,
            "Apoapsis reached - circularizing"
        );

        let time_step = self.time_step();
        while (step as f64) * time_step < stage.burn_time() {
            self.advance(stage, (step as f64) * time_step, upper_stack_mass, true)?;
            step += 1;
            self.record(FlightPhase::Circularizing);

            if self.eccentricity_rising() {
                break;
            }
        }

        info!(
            time = self.state.time,
            eccentricity = self.state.orbit.eccentricity,
            periapsis_height = self.state.orbit.periapsis_height,
            apoapsis_height = self.state.orbit.apoapsis_height,
            "Circularization finished"
        );
        Ok(())
    }

    fn at_apoapsis(&self, target: f64) -> bool {
        let (Some(previous), Some(current)) = (self.trajectory.previous(), self.trajectory.last())
        else {
            return true;
        };
        let climbing = current.height > previous.height;
        let near_apoapsis = (current.orbit.apoapsis_height - current.height).abs()
            < APOAPSIS_TOLERANCE_FRACTION * target;
        !climbing || near_apoapsis
    }

    fn eccentricity_rising(&self) -> bool {
        match (self.trajectory.previous(), self.trajectory.last()) {
            (Some(previous), Some(current)) => {
                previous.orbit.eccentricity < current.orbit.eccentricity
            }
            _ => false,
        }
    }

    /// One explicit Euler step. With the engines off the mass is frozen and
    /// thrust is zero.
    fn advance(
        &mut self,
        stage: &Stage,
        stage_time: f64,
        upper_stack_mass: f64,
        engines_on: bool,
    ) -> Result<(), SimulationError> {
        let sim = self.sim;
        let physics = &sim.physics;
        let time_step = self.time_step();

        let thrust = if engines_on {
            self.state.mass = upper_stack_mass + stage.mass_at_time(stage_time);
            stage.thrust()
        } else {
            0.0
        };

        let terms = physics.flight_accel(thrust, &self.state)?;
        self.losses.accumulate(&terms, time_step);

        let state = &mut self.state;
        state.velocity += terms.acceleration * time_step;
        state.height += state.vertical_speed() * time_step;
        if state.height < 0.0 {
            state.height = 0.0;
        }
        state.flight_path_angle += physics.turn_rate(thrust, state)? * time_step;
        state.temperature = physics.max_temperature(state.velocity, state.height);
        state.time += time_step;
        state
            .orbit
            .recompute(state.height, state.velocity, state.flight_path_angle)?;

        state.pitch_offset = sim.gravity_turn.pitch_offset(state.height);

        state.local_horizon += (state.velocity * time_step * state.flight_path_angle.cos()
            / physics.environment.distance(state.height))
        .atan();
        Ok(())
    }

    fn record(&mut self, phase: FlightPhase) {
        self.state.phase = phase;
        self.trajectory.push(self.state);
    }

    fn summary(&self) -> FlightSummary {
        let last_stage = self.sim.stages.last().map_or(0.0, Stage::dry_mass);
        FlightSummary {
            gravity_loss: self.losses.gravity,
            drag_loss: self.losses.drag,
            delta_v: self.losses.delta_v,
            residual_propellant: self.state.mass - last_stage,
        }
    }
}
