use crate::control::environment::Environment;
use crate::errors::SimulationError;
use crate::trajectory_system::aerodynamics::Aerodynamics;
use crate::trajectory_system::state::FlightState;

/// Along-track acceleration and its three contributions, all in m/s².
/// Multiply the contributions by the step length to get per-step losses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationTerms {
    pub acceleration: f64,
    pub thrust: f64,
    pub drag: f64,
    pub gravity: f64,
}

/// Cumulative ascent losses and achieved delta-v, m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightLosses {
    pub drag: f64,
    pub gravity: f64,
    pub delta_v: f64,
}

impl FlightLosses {
    pub fn accumulate(&mut self, terms: &AccelerationTerms, time_step: f64) {
        self.drag += terms.drag * time_step;
        self.gravity += terms.gravity * time_step;
        self.delta_v += terms.thrust * time_step;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsModel {
    pub environment: Environment,
    pub aerodynamics: Aerodynamics,
}

impl PhysicsModel {
    pub fn new(environment: Environment, aerodynamics: Aerodynamics) -> Self {
        PhysicsModel {
            environment,
            aerodynamics,
        }
    }

    pub fn gravitational_acceleration(&self, height: f64) -> f64 {
        self.environment.gravity(height)
    }

    pub fn atmospheric_density(&self, height: f64) -> f64 {
        self.environment.air_density(height)
    }

    pub fn flight_accel(
        &self,
        thrust: f64,
        state: &FlightState,
    ) -> Result<AccelerationTerms, SimulationError> {
        let mass = state.mass;
        if !(mass > 0.0) {
            return Err(SimulationError::DegenerateKinematics(format!(
                "vehicle mass must be positive, got {mass} kg at t = {:.2} s",
                state.time
            )));
        }

        let thrust_along = thrust * state.pitch_offset.cos();
        let drag = self
            .aerodynamics
            .calculate_drag(state.velocity, self.atmospheric_density(state.height));
        let gravity_along =
            mass * self.gravitational_acceleration(state.height) * state.flight_path_angle.sin();

        Ok(AccelerationTerms {
            acceleration: (thrust_along - drag - gravity_along) / mass,
            thrust: thrust_along / mass,
            drag: drag / mass,
            gravity: gravity_along / mass,
        })
    }

    /// Rate of change of the flight-path angle, rad/s. A positive pitch
    /// offset bends the velocity toward the local horizontal.
    pub fn turn_rate(&self, thrust: f64, state: &FlightState) -> Result<f64, SimulationError> {
        let velocity = state.velocity;
        if !(velocity > 0.0) {
            return Err(SimulationError::DegenerateKinematics(format!(
                "turn rate is undefined at velocity {velocity} m/s (t = {:.2} s, height {:.1} m)",
                state.time, state.height
            )));
        }
        if !(state.mass > 0.0) {
            return Err(SimulationError::DegenerateKinematics(format!(
                "vehicle mass must be positive, got {} kg",
                state.mass
            )));
        }

        let thrust_normal = thrust * state.pitch_offset.sin() / state.mass;
        let centrifugal = velocity.powi(2) / self.environment.distance(state.height)
            - self.gravitational_acceleration(state.height);

        Ok((state.flight_path_angle.cos() * centrifugal - thrust_normal) / velocity)
    }

    /// Radiative-equilibrium nose temperature, K.
    pub fn max_temperature(&self, velocity: f64, height: f64) -> f64 {
        self.aerodynamics.calculate_equilibrium_temperature(
            velocity,
            self.atmospheric_density(height),
            self.environment.ambient_temperature,
        )
    }

    /// Net heat flux into a nose already at `temperature`, W/m².
    pub fn nose_heat_flux(&self, temperature: f64, velocity: f64, height: f64) -> f64 {
        self.aerodynamics.calculate_net_heat_flux(
            temperature,
            velocity,
            self.atmospheric_density(height),
            self.environment.ambient_temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::mission::CelestialBody;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn moving_state(velocity: f64, height: f64, mass: f64) -> FlightState {
        let mut state = FlightState::on_pad(&CelestialBody::earth(), 293.0);
        state.velocity = velocity;
        state.height = height;
        state.mass = mass;
        state
    }

    #[test]
    fn test_flight_accel_vertical_on_pad() {
        let physics = PhysicsModel::default();
        let state = moving_state(0.0, 0.0, 100_000.0);
        let terms = physics.flight_accel(2_000_000.0, &state).unwrap();

        let g0 = physics.gravitational_acceleration(0.0);
        assert_relative_eq!(terms.thrust, 20.0, epsilon = 1e-12);
        assert_eq!(terms.drag, 0.0);
        assert_relative_eq!(terms.gravity, g0, epsilon = 1e-12);
        assert_relative_eq!(terms.acceleration, 20.0 - g0, epsilon = 1e-12);
    }

    #[test]
    fn test_flight_accel_terms_sum() {
        let physics = PhysicsModel::default();
        let mut state = moving_state(800.0, 5_000.0, 250_000.0);
        state.pitch_offset = 3.0_f64.to_radians();
        state.flight_path_angle = 1.2;

        let terms = physics.flight_accel(5_000_000.0, &state).unwrap();
        assert_relative_eq!(
            terms.acceleration,
            terms.thrust - terms.drag - terms.gravity,
            epsilon = 1e-12
        );
        assert!(terms.thrust < 20.0);
        assert!(terms.drag > 0.0);
    }

    #[test]
    fn test_flight_accel_rejects_massless_vehicle() {
        let physics = PhysicsModel::default();
        let state = moving_state(100.0, 0.0, 0.0);
        assert!(matches!(
            physics.flight_accel(1.0, &state),
            Err(SimulationError::DegenerateKinematics(_))
        ));
    }

    #[test]
    fn test_losses_accumulate_per_step() {
        let terms = AccelerationTerms {
            acceleration: 5.0,
            thrust: 20.0,
            drag: 5.0,
            gravity: 10.0,
        };
        let mut losses = FlightLosses::default();
        losses.accumulate(&terms, 0.1);
        losses.accumulate(&terms, 0.1);
        assert_relative_eq!(losses.delta_v, 4.0, epsilon = 1e-12);
        assert_relative_eq!(losses.drag, 1.0, epsilon = 1e-12);
        assert_relative_eq!(losses.gravity, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_turn_rate_fails_at_zero_velocity() {
        let physics = PhysicsModel::default();
        let state = moving_state(0.0, 0.0, 1000.0);
        assert!(matches!(
            physics.turn_rate(1000.0, &state),
            Err(SimulationError::DegenerateKinematics(_))
        ));
        let state = moving_state(-1.0, 0.0, 1000.0);
        assert!(physics.turn_rate(1000.0, &state).is_err());
    }

    #[test]
    fn test_turn_rate_vanishes_for_vertical_flight() {
        let physics = PhysicsModel::default();
        let state = moving_state(300.0, 2_000.0, 100_000.0);
        assert_abs_diff_eq!(physics.turn_rate(2_000_000.0, &state).unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_pitch_offset_bends_toward_horizontal() {
        let physics = PhysicsModel::default();
        let mut state = moving_state(300.0, 2_000.0, 100_000.0);
        state.pitch_offset = 3.0_f64.to_radians();

        let rate = physics.turn_rate(2_000_000.0, &state).unwrap();
        let expected = -2_000_000.0 * state.pitch_offset.sin() / 100_000.0 / 300.0;
        assert!(rate < 0.0);
        assert_relative_eq!(rate, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_gravity_pulls_horizontal_flight_down() {
        let physics = PhysicsModel::default();
        let mut state = moving_state(2_000.0, 50_000.0, 10_000.0);
        state.flight_path_angle = 0.0;

        let rate = physics.turn_rate(0.0, &state).unwrap();
        let radius = physics.environment.distance(50_000.0);
        let g = physics.gravitational_acceleration(50_000.0);
        assert!(rate < 0.0);
        assert_relative_eq!(rate, (2_000.0_f64.powi(2) / radius - g) / 2_000.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orbital_speed_holds_horizontal_flight() {
        let physics = PhysicsModel::default();
        let height = 300_000.0;
        let mut state =
            moving_state(physics.environment.body.circular_velocity(height), height, 10_000.0);
        state.flight_path_angle = 0.0;
        assert_abs_diff_eq!(physics.turn_rate(0.0, &state).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_max_temperature_at_rest_is_ambient() {
        let physics = PhysicsModel::default();
        assert_relative_eq!(physics.max_temperature(0.0, 0.0), 293.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_temperature_peaks_in_dense_air() {
        let physics = PhysicsModel::default();
        let low = physics.max_temperature(2_000.0, 20_000.0);
        let high = physics.max_temperature(2_000.0, 80_000.0);
        assert!(low > high);
        assert!(high > 293.0);
        assert_abs_diff_eq!(physics.nose_heat_flux(low, 2_000.0, 20_000.0), 0.0, epsilon = 1e-3);
    }
}
