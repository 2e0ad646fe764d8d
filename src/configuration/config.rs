//! Scenario types loaded from YAML.
//!
//! A scenario describes one ascent: the stack of stages, the gravity turn,
//! the mission and optionally the vehicle's aerodynamic shape and a staging
//! optimization to run before flying.
//!
//! ```yaml
//! stages:
//!   - structure_mass: 30.0       # t
//!     propellant_mass: 300.0     # t
//!     specific_impulse: 3000.0   # m/s
//!     propellant_mass_flow: 1840.0  # kg/s
//!   - structure_mass: 4.0
//!     propellant_mass: 40.0
//!     specific_impulse: 3400.0
//!     propellant_mass_flow: 200.0
//!     payload_mass: 2.0
//!
//! gravity_turn:
//!   start_height: 1000.0    # m
//!   end_height: 15000.0     # m
//!   pitch_angle: 4.0        # deg
//!
//! mission:
//!   target_orbit_height: 200000.0
//!   circularize: true
//!   time_step: 0.05
//!
//! optimizer:                # optional
//!   structure_fraction: 0.0909
//!   payload: 2.0
//!   iterations: 1000
//!   stopping_rule: exhaustive
//! ```
//!
//! `stages` may be omitted when the stack comes from a staging report instead.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{EFFECTIVE_AREA, NOSE_EMISSIVITY, NOSE_RADIUS, TIME_STEP};
use crate::control::guidance::GravityTurn;
use crate::control::launch_stages::Stage;
use crate::control::mission::{CelestialBody, Mission};
use crate::control::staging::{StagingOptimizer, StoppingRule};
use crate::errors::SimulationError;
use crate::trajectory_system::aerodynamics::Aerodynamics;
use crate::trajectory_system::flight::FlightSim;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StageConfig {
    pub structure_mass: f64,       // t
    pub propellant_mass: f64,      // t
    pub specific_impulse: f64,     // effective exhaust velocity, m/s
    pub propellant_mass_flow: f64, // kg/s
    #[serde(default)]
    pub payload_mass: f64, // t
}

impl StageConfig {
    pub fn build(&self) -> Result<Stage, SimulationError> {
        Stage::new(
            self.structure_mass,
            self.propellant_mass,
            self.specific_impulse,
            self.propellant_mass_flow,
            self.payload_mass,
        )
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GravityTurnConfig {
    pub start_height: f64, // m
    pub end_height: f64,   // m
    pub pitch_angle: f64,  // deg
}

/// Body overrides; anything left out falls back to Earth.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BodyConfig {
    pub name: Option<String>,
    pub radius: Option<f64>,
    pub mass: Option<f64>,
    pub sea_level_density: Option<f64>,
    pub density_decay: Option<f64>,
}

impl BodyConfig {
    fn build(&self) -> CelestialBody {
        let earth = CelestialBody::earth();
        CelestialBody::new(
            self.name.clone().unwrap_or(earth.name),
            self.radius.unwrap_or(earth.radius),
            self.mass.unwrap_or(earth.mass),
            self.sea_level_density.unwrap_or(earth.sea_level_density),
            self.density_decay.unwrap_or(earth.density_decay),
        )
    }
}

fn default_time_step() -> f64 {
    TIME_STEP
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MissionConfig {
    pub target_orbit_height: Option<f64>, // m
    #[serde(default)]
    pub circularize: bool,
    #[serde(default = "default_time_step")]
    pub time_step: f64, // s
    #[serde(default)]
    pub body: BodyConfig,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VehicleConfig {
    #[serde(default = "VehicleConfig::default_area")]
    pub effective_area: f64, // m², drag area times drag coefficient
    #[serde(default = "VehicleConfig::default_nose_radius")]
    pub nose_radius: f64, // m
    #[serde(default = "VehicleConfig::default_emissivity")]
    pub emissivity: f64,
}

impl VehicleConfig {
    fn default_area() -> f64 {
        EFFECTIVE_AREA
    }

    fn default_nose_radius() -> f64 {
        NOSE_RADIUS
    }

    fn default_emissivity() -> f64 {
        NOSE_EMISSIVITY
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        VehicleConfig {
            effective_area: EFFECTIVE_AREA,
            nose_radius: NOSE_RADIUS,
            emissivity: NOSE_EMISSIVITY,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoppingRuleConfig {
    #[default]
    #[serde(rename = "first_increase")]
    FirstIncrease,
    #[serde(rename = "exhaustive")]
    Exhaustive,
}

impl From<StoppingRuleConfig> for StoppingRule {
    fn from(config: StoppingRuleConfig) -> Self {
        match config {
            StoppingRuleConfig::FirstIncrease => StoppingRule::FirstIncrease,
            StoppingRuleConfig::Exhaustive => StoppingRule::Exhaustive,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    pub structure_fraction: f64,
    pub payload: f64, // t
    pub iterations: usize,
    #[serde(default)]
    pub stopping_rule: StoppingRuleConfig,
}

impl OptimizerConfig {
    pub fn build(&self) -> StagingOptimizer {
        StagingOptimizer::new(self.structure_fraction, self.payload, self.iterations)
            .with_stopping_rule(self.stopping_rule.into())
    }
}

/// Top-level scenario loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    pub gravity_turn: Option<GravityTurnConfig>,
    pub mission: MissionConfig,
    #[serde(default)]
    pub vehicle: VehicleConfig,
    pub optimizer: Option<OptimizerConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, SimulationError> {
        serde_yaml::from_str(source)
            .map_err(|err| SimulationError::ScenarioError(format!("invalid scenario: {err}")))
    }

    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let file = File::open(path).map_err(|err| {
            SimulationError::ScenarioError(format!("cannot open {}: {err}", path.display()))
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|err| {
            SimulationError::ScenarioError(format!("invalid scenario {}: {err}", path.display()))
        })
    }

    pub fn build_stages(&self) -> Result<Vec<Stage>, SimulationError> {
        self.stages.iter().map(StageConfig::build).collect()
    }

    pub fn gravity_turn(&self) -> GravityTurn {
        self.gravity_turn.map_or_else(GravityTurn::none, |turn| {
            GravityTurn::new(turn.start_height, turn.end_height, turn.pitch_angle)
        })
    }

    pub fn mission(&self) -> Mission {
        Mission::new(
            self.mission.target_orbit_height,
            self.mission.circularize,
            self.mission.time_step,
        )
        .with_body(self.mission.body.build())
    }

    pub fn aerodynamics(&self) -> Aerodynamics {
        Aerodynamics::new(
            self.vehicle.effective_area,
            self.vehicle.nose_radius,
            self.vehicle.emissivity,
        )
    }

    /// Builds a simulator flying `stages` under this scenario's guidance and mission.
    pub fn build_sim(&self, stages: Vec<Stage>) -> Result<FlightSim, SimulationError> {
        FlightSim::new(stages, self.gravity_turn(), self.mission(), self.aerodynamics())
    }

    /// Builds a simulator from the scenario's own stage list.
    pub fn build(&self) -> Result<FlightSim, SimulationError> {
        self.build_sim(self.build_stages()?)
    }
}
