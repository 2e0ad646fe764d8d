use crate::constants::KG_PER_TONNE;
use crate::errors::SimulationError;

/// One propulsive stage. Masses are given in tonnes, mass flow in kg/s and
/// specific impulse as effective exhaust velocity in m/s.
///
/// `burn_time` and `thrust` are derived from the inputs and are refreshed by
/// every setter, so they can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    structure_mass: f64,
    propellant_mass: f64,
    specific_impulse: f64,
    propellant_mass_flow: f64,
    payload_mass: f64,
    burn_time: f64,
    thrust: f64,
}

impl Stage {
    pub fn new(
        structure_mass: f64,
        propellant_mass: f64,
        specific_impulse: f64,
        propellant_mass_flow: f64,
        payload_mass: f64,
    ) -> Result<Self, SimulationError> {
        if !(propellant_mass_flow > 0.0) {
            return Err(SimulationError::NonPositiveMassFlow(propellant_mass_flow));
        }
        Self::check_masses(structure_mass, propellant_mass, payload_mass)?;

        let mut stage = Stage {
            structure_mass,
            propellant_mass,
            specific_impulse,
            propellant_mass_flow,
            payload_mass,
            burn_time: 0.0,
            thrust: 0.0,
        };
        stage.refresh_derived();
        Ok(stage)
    }

    fn check_masses(structure: f64, propellant: f64, payload: f64) -> Result<(), SimulationError> {
        if structure < 0.0 || propellant < 0.0 || payload < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "stage masses must be non-negative (structure {structure} t, propellant {propellant} t, payload {payload} t)"
            )));
        }
        Ok(())
    }

    fn refresh_derived(&mut self) {
        self.burn_time = self.propellant_mass * KG_PER_TONNE / self.propellant_mass_flow;
        self.thrust = self.specific_impulse * self.propellant_mass_flow;
    }

    pub fn set_masses(
        &mut self,
        structure_mass: f64,
        propellant_mass: f64,
    ) -> Result<(), SimulationError> {
        Self::check_masses(structure_mass, propellant_mass, self.payload_mass)?;
        self.structure_mass = structure_mass;
        self.propellant_mass = propellant_mass;
        self.refresh_derived();
        Ok(())
    }

    pub fn set_payload_mass(&mut self, payload_mass: f64) -> Result<(), SimulationError> {
        Self::check_masses(self.structure_mass, self.propellant_mass, payload_mass)?;
        self.payload_mass = payload_mass;
        Ok(())
    }

    pub fn set_propellant_mass_flow(
        &mut self,
        propellant_mass_flow: f64,
    ) -> Result<(), SimulationError> {
        if !(propellant_mass_flow > 0.0) {
            return Err(SimulationError::NonPositiveMassFlow(propellant_mass_flow));
        }
        self.propellant_mass_flow = propellant_mass_flow;
        self.refresh_derived();
        Ok(())
    }

    pub fn structure_mass(&self) -> f64 {
        self.structure_mass
    }

    pub fn propellant_mass(&self) -> f64 {
        self.propellant_mass
    }

    pub fn specific_impulse(&self) -> f64 {
        self.specific_impulse
    }

    pub fn propellant_mass_flow(&self) -> f64 {
        self.propellant_mass_flow
    }

    pub fn payload_mass(&self) -> f64 {
        self.payload_mass
    }

    /// Seconds until the propellant is exhausted at full flow.
    pub fn burn_time(&self) -> f64 {
        self.burn_time
    }

    /// Thrust in newtons.
    pub fn thrust(&self) -> f64 {
        self.thrust
    }

    /// Stage, payload and remaining propellant in kg after `time` seconds of burn.
    /// The time is clamped to `[0, burn_time]`.
    pub fn mass_at_time(&self, time: f64) -> f64 {
        let elapsed = time.clamp(0.0, self.burn_time);
        let start_mass =
            (self.structure_mass + self.payload_mass + self.propellant_mass) * KG_PER_TONNE;
        let burned = self.propellant_mass_flow * elapsed;
        // burn_time * flow reproduces the propellant mass up to rounding
        (start_mass - burned).max(self.dry_mass())
    }

    /// Mass at ignition, in kg.
    pub fn full_mass(&self) -> f64 {
        self.mass_at_time(0.0)
    }

    /// Structure plus payload, in kg.
    pub fn dry_mass(&self) -> f64 {
        (self.structure_mass + self.payload_mass) * KG_PER_TONNE
    }

    /// Initial over final mass for this stage's burn while carrying `carried_mass` kg on top.
    pub fn mass_ratio(&self, carried_mass: f64) -> f64 {
        (self.full_mass() + carried_mass) / (self.dry_mass() + carried_mass)
    }

    /// Tsiolkovsky delta-v in m/s while carrying `carried_mass` kg on top.
    pub fn ideal_delta_v(&self, carried_mass: f64) -> f64 {
        self.specific_impulse * self.mass_ratio(carried_mass).ln()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_stage() -> Stage {
        Stage::new(20.0, 200.0, 3500.0, 1500.0, 0.0).unwrap()
    }

    #[test]
    fn test_derived_fields() {
        let stage = create_test_stage();
        assert_relative_eq!(stage.burn_time(), 200_000.0 / 1500.0, epsilon = 1e-9);
        assert_relative_eq!(stage.thrust(), 3500.0 * 1500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mass_at_time_bounds() {
        let stage = Stage::new(4.0, 40.0, 3400.0, 200.0, 2.0).unwrap();
        assert_relative_eq!(stage.mass_at_time(0.0), 46_000.0, epsilon = 1e-9);
        assert_relative_eq!(stage.mass_at_time(stage.burn_time()), 6_000.0, epsilon = 1e-6);
        assert_relative_eq!(stage.mass_at_time(stage.burn_time() * 2.0), 6_000.0, epsilon = 1e-6);
        assert_relative_eq!(stage.mass_at_time(-5.0), 46_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mass_at_time_mid_burn() {
        let stage = create_test_stage();
        assert_relative_eq!(stage.mass_at_time(10.0), 220_000.0 - 15_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_setters_refresh_derived_fields() {
        let mut stage = create_test_stage();
        stage.set_masses(10.0, 100.0).unwrap();
        assert_relative_eq!(stage.burn_time(), 100_000.0 / 1500.0, epsilon = 1e-9);

        stage.set_propellant_mass_flow(500.0).unwrap();
        assert_relative_eq!(stage.burn_time(), 200.0, epsilon = 1e-9);
        assert_relative_eq!(stage.thrust(), 3500.0 * 500.0, epsilon = 1e-6);

        stage.set_payload_mass(5.0).unwrap();
        assert_relative_eq!(stage.dry_mass(), 15_000.0, epsilon = 1e-9);
        assert_relative_eq!(stage.burn_time(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_mass_flow_rejected() {
        assert!(matches!(
            Stage::new(1.0, 10.0, 3000.0, 0.0, 0.0),
            Err(SimulationError::NonPositiveMassFlow(_))
        ));
        assert!(matches!(
            Stage::new(1.0, 10.0, 3000.0, -3.0, 0.0),
            Err(SimulationError::NonPositiveMassFlow(_))
        ));

        let mut stage = create_test_stage();
        assert!(stage.set_propellant_mass_flow(0.0).is_err());
        assert_relative_eq!(stage.propellant_mass_flow(), 1500.0);
    }

    #[test]
    fn test_negative_mass_rejected() {
        assert!(matches!(
            Stage::new(-1.0, 10.0, 3000.0, 10.0, 0.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_ideal_delta_v() {
        let stage = create_test_stage();
        assert_relative_eq!(stage.mass_ratio(0.0), 11.0, epsilon = 1e-12);
        assert_relative_eq!(stage.ideal_delta_v(0.0), 3500.0 * 11.0_f64.ln(), epsilon = 1e-9);
        assert!(stage.ideal_delta_v(50_000.0) < stage.ideal_delta_v(0.0));
    }
}
