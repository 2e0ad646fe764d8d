pub mod aerodynamics;
pub mod flight;
pub mod orbit;
pub mod physics;
pub mod state;
