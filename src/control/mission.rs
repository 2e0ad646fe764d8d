use crate::constants::{
    AIR_DENSITY_DECAY, AIR_DENSITY_SEA_LEVEL, EARTH_MASS, EARTH_RADIUS, GRAVITATIONAL_CONSTANT,
    TIME_STEP,
};
use crate::errors::SimulationError;

#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    pub name: String,
    pub radius: f64,              // m
    pub mass: f64,                // kg
    pub sea_level_density: f64,   // kg/m³
    pub density_decay: f64,       // 1/m
}

impl CelestialBody {
    pub fn new(
        name: String,
        radius: f64,
        mass: f64,
        sea_level_density: f64,
        density_decay: f64,
    ) -> Self {
        CelestialBody {
            name,
            radius,
            mass,
            sea_level_density,
            density_decay,
        }
    }

    pub fn earth() -> Self {
        CelestialBody::new(
            "Earth".to_string(),
            EARTH_RADIUS,
            EARTH_MASS,
            AIR_DENSITY_SEA_LEVEL,
            AIR_DENSITY_DECAY,
        )
    }

    /// Standard gravitational parameter μ = G·M.
    pub fn mu(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * self.mass
    }

    pub fn surface_gravity(&self) -> f64 {
        self.gravity_at_altitude(0.0)
    }

    pub fn gravity_at_altitude(&self, altitude: f64) -> f64 {
        let distance = self.radius + altitude;
        self.mu() / distance.powi(2)
    }

    pub fn circular_velocity(&self, altitude: f64) -> f64 {
        (self.mu() / (self.radius + altitude)).sqrt()
    }
}

impl Default for CelestialBody {
    fn default() -> Self {
        CelestialBody::earth()
    }
}

/// What the ascent is flying toward and how finely it is integrated.
#[derive(Clone, Debug, PartialEq)]
pub struct Mission {
    pub body: CelestialBody,
    pub target_orbit_height: Option<f64>, // m above the surface
    pub circularize: bool,
    pub time_step: f64, // s
}

impl Mission {
    pub fn new(target_orbit_height: Option<f64>, circularize: bool, time_step: f64) -> Self {
        Mission {
            body: CelestialBody::earth(),
            target_orbit_height,
            circularize,
            time_step,
        }
    }

    pub fn with_body(mut self, body: CelestialBody) -> Self {
        self.body = body;
        self
    }

    /// The target height, if one is configured and positive.
    pub fn target(&self) -> Option<f64> {
        self.target_orbit_height.filter(|height| *height > 0.0)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.time_step > 0.0) || !self.time_step.is_finite() {
            return Err(SimulationError::NonPositiveTimestep(self.time_step));
        }
        if !(self.body.radius > 0.0 && self.body.mass > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "celestial body {} needs positive radius and mass",
                self.body.name
            )));
        }
        Ok(())
    }
}

impl Default for Mission {
    fn default() -> Self {
        Mission::new(None, false, TIME_STEP)
    }
}
