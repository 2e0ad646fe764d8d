use std::f64::consts::FRAC_PI_2;
use std::fmt;

use crate::control::mission::CelestialBody;
use crate::trajectory_system::orbit::Orbit;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum FlightPhase {
    Ascent,
    WaitingForApoapsis,
    Circularizing,
}

impl fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlightPhase::Ascent => "Ascent",
            FlightPhase::WaitingForApoapsis => "Waiting for apoapsis",
            FlightPhase::Circularizing => "Circularizing",
        };
        f.write_str(label)
    }
}

/// Integration state. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightState {
    pub time: f64,              // s
    pub velocity: f64,          // m/s
    pub mass: f64,              // kg
    pub temperature: f64,       // K, nose equilibrium
    pub local_horizon: f64,     // downrange angle swept over the body
    pub height: f64,            // m
    pub pitch_offset: f64,      // thrust vector relative to velocity
    pub flight_path_angle: f64, // velocity relative to the local horizontal
    pub orbit: Orbit,
    pub phase: FlightPhase,
}

impl FlightState {
    /// At rest on the pad, pointing straight up.
    pub fn on_pad(body: &CelestialBody, ambient_temperature: f64) -> Self {
        FlightState {
            time: 0.0,
            velocity: 0.0,
            mass: 0.0,
            temperature: ambient_temperature,
            local_horizon: 0.0,
            height: 0.0,
            pitch_offset: 0.0,
            flight_path_angle: FRAC_PI_2,
            orbit: Orbit::new(body),
            phase: FlightPhase::Ascent,
        }
    }

    /// Rate of climb, m/s.
    pub fn vertical_speed(&self) -> f64 {
        self.velocity * (FRAC_PI_2 - self.flight_path_angle).cos()
    }
}

/// Time-ordered, append-only record of flight states. Only the engine appends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    states: Vec<FlightState>,
}

impl Trajectory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Trajectory {
            states: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, state: FlightState) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightState> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[FlightState] {
        &self.states
    }

    pub fn last(&self) -> Option<&FlightState> {
        self.states.last()
    }

    /// The sample before the last one.
    pub fn previous(&self) -> Option<&FlightState> {
        self.states.len().checked_sub(2).map(|index| &self.states[index])
    }

    pub fn in_phase(&self, phase: FlightPhase) -> impl Iterator<Item = &FlightState> {
        self.states.iter().filter(move |state| state.phase == phase)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a FlightState;
    type IntoIter = std::slice::Iter<'a, FlightState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
