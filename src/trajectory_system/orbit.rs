use crate::control::mission::CelestialBody;
use crate::errors::SimulationError;

// Eccentricity radicands this close below zero are round-off of a circular orbit.
const RADICAND_ROUNDOFF: f64 = 1e-9;
// Relative width of the energy band treated as parabolic.
const PARABOLIC_TOLERANCE: f64 = 1e-12;

/// Osculating conic of the current kinematic state.
///
/// Every field is rebuilt from scratch by [`Orbit::recompute`]; nothing is
/// carried over between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub mu: f64,
    pub body_radius: f64,
    pub distance: f64,
    pub specific_energy: f64,
    pub semi_major_axis: f64,
    pub angular_momentum: f64,
    pub eccentricity: f64,
    pub periapsis: f64,
    pub periapsis_height: f64,
    pub apoapsis: f64,
    pub apoapsis_height: f64,
}

impl Orbit {
    /// An orbit around `body` for a vehicle resting on its surface.
    pub fn new(body: &CelestialBody) -> Self {
        let mu = body.mu();
        let radius = body.radius;
        // at rest on the surface the conic degenerates to a radial line
        Orbit {
            mu,
            body_radius: radius,
            distance: radius,
            specific_energy: -mu / radius,
            semi_major_axis: radius / 2.0,
            angular_momentum: 0.0,
            eccentricity: 1.0,
            periapsis: 0.0,
            periapsis_height: -radius,
            apoapsis: radius,
            apoapsis_height: 0.0,
        }
    }

    pub fn from_kinematics(
        body: &CelestialBody,
        height: f64,
        velocity: f64,
        flight_path_angle: f64,
    ) -> Result<Self, SimulationError> {
        let mut orbit = Orbit::new(body);
        orbit.recompute(height, velocity, flight_path_angle)?;
        Ok(orbit)
    }

    pub fn recompute(
        &mut self,
        height: f64,
        velocity: f64,
        flight_path_angle: f64,
    ) -> Result<(), SimulationError> {
        let mu = self.mu;
        let distance = self.body_radius + height;
        if !(distance > 0.0) {
            return Err(SimulationError::InvalidOrbit(format!(
                "distance from the center must be positive, got {distance} m"
            )));
        }

        let potential = mu / distance;
        let specific_energy = 0.5 * velocity.powi(2) - potential;
        if specific_energy.abs() <= PARABOLIC_TOLERANCE * potential {
            return Err(SimulationError::InvalidOrbit(format!(
                "parabolic trajectory (specific energy {specific_energy:e} J/kg) has no semi-major axis"
            )));
        }

        let semi_major_axis = -mu / (2.0 * specific_energy);
        let angular_momentum = distance * velocity * flight_path_angle.cos();
        let mut radicand =
            1.0 + 2.0 * specific_energy * angular_momentum.powi(2) / mu.powi(2);
        if radicand < 0.0 {
            if radicand < -RADICAND_ROUNDOFF {
                return Err(SimulationError::InvalidOrbit(format!(
                    "eccentricity radicand is negative ({radicand:e})"
                )));
            }
            radicand = 0.0;
        }
        let eccentricity = radicand.sqrt();

        let periapsis = semi_major_axis * (1.0 - eccentricity);
        let apoapsis = if specific_energy < 0.0 {
            semi_major_axis * (1.0 + eccentricity)
        } else {
            f64::INFINITY
        };

        self.distance = distance;
        self.specific_energy = specific_energy;
        self.semi_major_axis = semi_major_axis;
        self.angular_momentum = angular_momentum;
        self.eccentricity = eccentricity;
        self.periapsis = periapsis;
        self.periapsis_height = periapsis - self.body_radius;
        self.apoapsis = apoapsis;
        self.apoapsis_height = apoapsis - self.body_radius;
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.specific_energy < 0.0
    }

    /// Orbital period in seconds, `None` for escape trajectories.
    pub fn period(&self) -> Option<f64> {
        if self.is_bound() {
            Some(2.0 * std::f64::consts::PI * (self.semi_major_axis.powi(3) / self.mu).sqrt())
        } else {
            None
        }
    }
}
