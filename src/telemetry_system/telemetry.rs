use crate::trajectory_system::flight::{FlightOutcome, FlightSummary};
use crate::trajectory_system::state::{FlightPhase, FlightState};

/// Samples between two detailed log entries.
const LOG_INTERVAL: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub log: Vec<String>,
    max_velocity: f64,
    max_altitude: f64,
    max_temperature: f64,
    phase_times: Vec<(FlightPhase, f64)>,
    final_state: Option<FlightState>,
    summary: FlightSummary,
}

impl Telemetry {
    pub fn from_outcome(outcome: &FlightOutcome) -> Self {
        let mut telemetry = Telemetry {
            log: Vec::new(),
            max_velocity: 0.0,
            max_altitude: 0.0,
            max_temperature: 0.0,
            phase_times: Vec::new(),
            final_state: outcome.trajectory.last().copied(),
            summary: outcome.summary,
        };

        let count = outcome.trajectory.len();
        for (index, state) in outcome.trajectory.iter().enumerate() {
            telemetry.collect_data(state);
            if index % LOG_INTERVAL == 0 || index + 1 == count {
                telemetry.log.push(Self::format_state(state));
            }
        }
        telemetry
    }

    fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 3600.0 {
            let hours = (elapsed_time / 3600.0).floor();
            let minutes = ((elapsed_time % 3600.0) / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}h {:.0}m {:.2}s", hours, minutes, seconds)
        } else if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    fn format_altitude(altitude: f64) -> String {
        if altitude.is_infinite() {
            "unbounded".to_string()
        } else if altitude.abs() >= 1000.0 {
            format!("{:.2} km", altitude / 1000.0)
        } else {
            format!("{:.2} m", altitude)
        }
    }

    fn format_state(state: &FlightState) -> String {
        format!(
            "Time: {} [{}]\n\
                 Altitude: {}\n\
                 Velocity: {:.2} m/s\n\
                 Flight Path Angle: {:.2}°\n\
                 Pitch Offset: {:.2}°\n\
                 Downrange Angle: {:.3}°\n\
                 Mass: {:.2} kg\n\
                 Nose Temperature: {:.1} K\n\
                 Apoapsis: {}, Periapsis: {}, Eccentricity: {:.4}\n",
            Self::format_time(state.time),
            state.phase,
            Self::format_altitude(state.height),
            state.velocity,
            state.flight_path_angle.to_degrees(),
            state.pitch_offset.to_degrees(),
            state.local_horizon.to_degrees(),
            state.mass,
            state.temperature,
            Self::format_altitude(state.orbit.apoapsis_height),
            Self::format_altitude(state.orbit.periapsis_height),
            state.orbit.eccentricity,
        )
    }

    fn collect_data(&mut self, state: &FlightState) {
        if state.velocity > self.max_velocity {
            self.max_velocity = state.velocity;
        }
        if state.height > self.max_altitude {
            self.max_altitude = state.height;
        }
        if state.temperature > self.max_temperature {
            self.max_temperature = state.temperature;
        }

        // Track phase transitions
        match self.phase_times.last() {
            Some((last_phase, _)) if *last_phase == state.phase => {}
            _ => self.phase_times.push((state.phase, state.time)),
        }
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn max_altitude(&self) -> f64 {
        self.max_altitude
    }

    pub fn max_temperature(&self) -> f64 {
        self.max_temperature
    }

    /// Each phase entered, with the time of its first sample.
    pub fn phase_times(&self) -> &[(FlightPhase, f64)] {
        &self.phase_times
    }

    pub fn final_state(&self) -> Option<&FlightState> {
        self.final_state.as_ref()
    }

    pub fn display_data(&self) {
        println!("--- Telemetry Data ---");
        for entry in &self.log {
            println!("{}", entry);
        }
        println!("--- End of Telemetry ---");

        println!("\n--- Simulation Summary ---");
        println!("Max Velocity: {:.2} m/s", self.max_velocity);
        println!("Max Altitude: {}", Self::format_altitude(self.max_altitude));
        println!("Max Nose Temperature: {:.1} K", self.max_temperature);
        println!("Delta-v: {:.2} m/s", self.summary.delta_v);
        println!("Gravity Loss: {:.2} m/s", self.summary.gravity_loss);
        println!("Drag Loss: {:.2} m/s", self.summary.drag_loss);
        println!("Residual Propellant: {:.2} kg", self.summary.residual_propellant);

        if let Some(state) = &self.final_state {
            println!("\n--- Final Orbit ---");
            println!("Apoapsis: {}", Self::format_altitude(state.orbit.apoapsis_height));
            println!("Periapsis: {}", Self::format_altitude(state.orbit.periapsis_height));
            println!("Eccentricity: {:.4}", state.orbit.eccentricity);
            if let Some(period) = state.orbit.period() {
                println!("Period: {}", Self::format_time(period));
            }
        }

        println!("\n--- Phase Transitions ---");
        for (phase, time) in &self.phase_times {
            println!("{} started at: {}", phase, Self::format_time(*time));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(Telemetry::format_time(12.345), "12.35s");
        assert_eq!(Telemetry::format_time(125.0), "2m 5.00s");
        assert_eq!(Telemetry::format_time(3725.5), "1h 2m 5.50s");
    }

    #[test]
    fn test_format_altitude() {
        assert_eq!(Telemetry::format_altitude(950.0), "950.00 m");
        assert_eq!(Telemetry::format_altitude(200_000.0), "200.00 km");
        assert_eq!(Telemetry::format_altitude(-6_371_000.0), "-6371.00 km");
        assert_eq!(Telemetry::format_altitude(f64::INFINITY), "unbounded");
    }
}
