use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Degenerate kinematics: {0}")]
    DegenerateKinematics(String),

    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),

    #[error("Time step must be strictly positive, got {0}")]
    NonPositiveTimestep(f64),

    #[error("At least one stage is required")]
    EmptyStageList,

    #[error("Propellant mass flow must be strictly positive, got {0} kg/s")]
    NonPositiveMassFlow(f64),

    #[error("Staging optimization did not converge: {0}")]
    NonConvergentOptimization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Scenario error: {0}")]
    ScenarioError(String),
}
