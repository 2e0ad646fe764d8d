// Physical Constants
pub const EARTH_RADIUS: f64 = 6_371_000.0; // meters
pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11; // N⋅m²/kg²
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8; // W/m²K⁴

// Atmosphere (single-scale exponential model)
pub const AIR_DENSITY_SEA_LEVEL: f64 = 1.2; // kg/m³
pub const AIR_DENSITY_DECAY: f64 = 1.244268e-4; // 1/m
pub const AMBIENT_TEMPERATURE: f64 = 293.0; // K

// Vehicle Constants
pub const EFFECTIVE_AREA: f64 = 15.0; // m²
pub const NOSE_RADIUS: f64 = 0.5; // m
pub const NOSE_EMISSIVITY: f64 = 0.8;
pub const SUTTON_GRAVES_CONSTANT: f64 = 1.7415e-4; // kg^0.5/m

// Simulation Parameters
pub const TIME_STEP: f64 = 0.02; // s
pub const APOAPSIS_TOLERANCE_FRACTION: f64 = 1e-3; // of the target orbit height

// Units
pub const KG_PER_TONNE: f64 = 1000.0;
