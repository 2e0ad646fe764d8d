pub mod configuration;
pub mod constants;
pub mod control;
pub mod errors;
pub mod telemetry_system;
pub mod trajectory_system;

pub use constants::*;
pub use control::environment::Environment;
pub use control::guidance::GravityTurn;
pub use control::launch_stages::Stage;
pub use control::mission::{CelestialBody, Mission};
pub use control::staging::{
    optimize_staging_two_stages, OptimizedStaging, StagingOptimizer, StoppingRule,
};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::aerodynamics::Aerodynamics;
pub use trajectory_system::flight::{FlightOutcome, FlightSim, FlightSummary};
pub use trajectory_system::orbit::Orbit;
pub use trajectory_system::physics::{AccelerationTerms, FlightLosses, PhysicsModel};
pub use trajectory_system::state::{FlightPhase, FlightState, Trajectory};

// Scenario loading
pub use configuration::config::ScenarioConfig;
pub use configuration::staging_report::{parse_staging_report, read_staging_report};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::Telemetry;
