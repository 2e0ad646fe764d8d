use crate::constants::AMBIENT_TEMPERATURE;
use crate::control::mission::CelestialBody;

/// Gravity and exponential atmosphere of the body being launched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub body: CelestialBody,
    pub ambient_temperature: f64, // K
}

impl Environment {
    pub fn new(body: CelestialBody) -> Self {
        Environment {
            body,
            ambient_temperature: AMBIENT_TEMPERATURE,
        }
    }

    pub fn gravity(&self, altitude: f64) -> f64 {
        self.body.gravity_at_altitude(altitude)
    }

    pub fn air_density(&self, altitude: f64) -> f64 {
        self.body.sea_level_density * (-self.body.density_decay * altitude).exp()
    }

    /// Distance from the body's center.
    pub fn distance(&self, altitude: f64) -> f64 {
        self.body.radius + altitude
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(CelestialBody::earth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sea_level_density() {
        let environment = Environment::default();
        assert_abs_diff_eq!(environment.air_density(0.0), 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_density_scale_height() {
        let environment = Environment::default();
        // one e-folding every ~8 km
        let scale_height = 1.0 / environment.body.density_decay;
        assert_abs_diff_eq!(
            environment.air_density(scale_height),
            1.2 / std::f64::consts::E,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_density_vanishes_in_orbit() {
        let environment = Environment::default();
        assert!(environment.air_density(400_000.0) < 1e-20);
        assert!(environment.air_density(10_000.0) < environment.air_density(5_000.0));
    }

    #[test]
    fn test_gravity_decreases_with_altitude() {
        let environment = Environment::default();
        assert!(environment.gravity(100_000.0) < environment.gravity(0.0));
        assert_abs_diff_eq!(environment.distance(1000.0), 6_372_000.0, epsilon = 1e-9);
    }
}
