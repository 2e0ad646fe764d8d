use crate::constants::{
    EFFECTIVE_AREA, NOSE_EMISSIVITY, NOSE_RADIUS, STEFAN_BOLTZMANN, SUTTON_GRAVES_CONSTANT,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aerodynamics {
    pub effective_area: f64, // m², drag coefficient folded in
    pub nose_radius: f64,    // m
    pub emissivity: f64,
}

impl Aerodynamics {
    pub fn new(effective_area: f64, nose_radius: f64, emissivity: f64) -> Self {
        Aerodynamics {
            effective_area,
            nose_radius,
            emissivity,
        }
    }

    pub fn calculate_drag(&self, speed: f64, air_density: f64) -> f64 {
        self.calculate_dynamic_pressure(speed, air_density) * self.effective_area
    }

    fn calculate_dynamic_pressure(&self, speed: f64, air_density: f64) -> f64 {
        0.5 * air_density * speed.powi(2)
    }

    /// Sutton-Graves stagnation-point convective heat flux, W/m².
    pub fn calculate_stagnation_heating(&self, speed: f64, air_density: f64) -> f64 {
        SUTTON_GRAVES_CONSTANT * speed.abs().powi(3) * (air_density / self.nose_radius).sqrt()
    }

    /// Nose temperature at which black-body re-radiation balances the
    /// convective heating.
    pub fn calculate_equilibrium_temperature(
        &self,
        speed: f64,
        air_density: f64,
        ambient_temperature: f64,
    ) -> f64 {
        let heating = self.calculate_stagnation_heating(speed, air_density);
        (heating / (self.emissivity * STEFAN_BOLTZMANN) + ambient_temperature.powi(4)).powf(0.25)
    }

    /// Heat flux still going into a nose at `temperature`; zero once it
    /// radiates at least as much as it absorbs.
    pub fn calculate_net_heat_flux(
        &self,
        temperature: f64,
        speed: f64,
        air_density: f64,
        ambient_temperature: f64,
    ) -> f64 {
        let heating = self.calculate_stagnation_heating(speed, air_density);
        let radiated = self.emissivity
            * STEFAN_BOLTZMANN
            * (temperature.powi(4) - ambient_temperature.powi(4));
        (heating - radiated).max(0.0)
    }
}

impl Default for Aerodynamics {
    fn default() -> Self {
        Aerodynamics::new(EFFECTIVE_AREA, NOSE_RADIUS, NOSE_EMISSIVITY)
    }
}
