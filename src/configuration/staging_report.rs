//! Reader for the two-stage report written by the staging design tool.
//!
//! The report is a list of `key: value unit` lines. Masses are given in kg
//! and converted to tonnes; exhaust velocities (`c_1`, `c_2`) are in m/s and
//! mass flows in kg/s. Lines without a colon and unknown keys are skipped.

use std::fs;
use std::path::Path;

use crate::constants::KG_PER_TONNE;
use crate::control::launch_stages::Stage;
use crate::errors::SimulationError;

#[derive(Debug, Default)]
struct ReportFields {
    dry_1: Option<f64>,
    dry_2: Option<f64>,
    propellant_1: Option<f64>,
    propellant_2: Option<f64>,
    exhaust_velocity_1: Option<f64>,
    exhaust_velocity_2: Option<f64>,
    mass_flow_1: Option<f64>,
    mass_flow_2: Option<f64>,
    payload: Option<f64>,
}

fn required(value: Option<f64>, key: &str) -> Result<f64, SimulationError> {
    value.ok_or_else(|| {
        SimulationError::ScenarioError(format!("staging report is missing `{key}`"))
    })
}

fn parse_value(key: &str, raw: &str, line_number: usize) -> Result<f64, SimulationError> {
    let number = raw.split_whitespace().next().unwrap_or_default();
    number.parse::<f64>().map_err(|_| {
        SimulationError::ScenarioError(format!(
            "line {line_number}: `{key}` has no numeric value (got `{}`)",
            raw.trim()
        ))
    })
}

/// Parses a staging report into `(lower, upper)` stages. The payload rides on
/// the upper stage.
pub fn parse_staging_report(report: &str) -> Result<(Stage, Stage), SimulationError> {
    let mut fields = ReportFields::default();

    for (index, line) in report.lines().enumerate() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let key = key.trim();
        let lower = key.to_lowercase();

        let slot = if lower.starts_with("m_dry_1") {
            &mut fields.dry_1
        } else if lower.starts_with("m_dry_2") {
            &mut fields.dry_2
        } else if lower.starts_with("m_propellant_1") {
            &mut fields.propellant_1
        } else if lower.starts_with("m_propellant_2") {
            &mut fields.propellant_2
        } else if key == "c_1" {
            &mut fields.exhaust_velocity_1
        } else if key == "c_2" {
            &mut fields.exhaust_velocity_2
        } else if key == "MassFlow_1" {
            &mut fields.mass_flow_1
        } else if key == "MassFlow_2" {
            &mut fields.mass_flow_2
        } else if lower.starts_with("payload") {
            &mut fields.payload
        } else {
            continue;
        };
        *slot = Some(parse_value(key, value, index + 1)?);
    }

    let lower = Stage::new(
        required(fields.dry_1, "m_dry_1")? / KG_PER_TONNE,
        required(fields.propellant_1, "m_propellant_1")? / KG_PER_TONNE,
        required(fields.exhaust_velocity_1, "c_1")?,
        required(fields.mass_flow_1, "MassFlow_1")?,
        0.0,
    )?;
    let upper = Stage::new(
        required(fields.dry_2, "m_dry_2")? / KG_PER_TONNE,
        required(fields.propellant_2, "m_propellant_2")? / KG_PER_TONNE,
        required(fields.exhaust_velocity_2, "c_2")?,
        required(fields.mass_flow_2, "MassFlow_2")?,
        required(fields.payload, "payload")? / KG_PER_TONNE,
    )?;
    Ok((lower, upper))
}

pub fn read_staging_report(path: &Path) -> Result<(Stage, Stage), SimulationError> {
    let report = fs::read_to_string(path).map_err(|err| {
        SimulationError::ScenarioError(format!("cannot read {}: {err}", path.display()))
    })?;
    parse_staging_report(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const REPORT: &str = "\
Staging results
m_dry_1: 30000 kg
m_dry_2: 4000 kg
m_propellant_1: 300000 kg
m_propellant_2: 40000 kg
c_1: 3000 m/s
c_2: 3400 m/s
MassFlow_1: 1840 kg/s
MassFlow_2: 200 kg/s
Engine weight: 1200 kg
payload: 2000 kg
";

    #[test]
    fn test_parse_report_converts_to_tonnes() {
        let (lower, upper) = parse_staging_report(REPORT).unwrap();

        assert_relative_eq!(lower.structure_mass(), 30.0);
        assert_relative_eq!(lower.propellant_mass(), 300.0);
        assert_relative_eq!(lower.specific_impulse(), 3000.0);
        assert_relative_eq!(lower.propellant_mass_flow(), 1840.0);
        assert_eq!(lower.payload_mass(), 0.0);

        assert_relative_eq!(upper.structure_mass(), 4.0);
        assert_relative_eq!(upper.propellant_mass(), 40.0);
        assert_relative_eq!(upper.specific_impulse(), 3400.0);
        assert_relative_eq!(upper.payload_mass(), 2.0);
    }

    #[test]
    fn test_key_prefixes_are_case_insensitive() {
        let report = REPORT.replace("m_dry_1:", "M_DRY_1 (structure):");
        let (lower, _) = parse_staging_report(&report).unwrap();
        assert_relative_eq!(lower.structure_mass(), 30.0);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let report = REPORT.replace("c_2: 3400 m/s\n", "");
        match parse_staging_report(&report) {
            Err(SimulationError::ScenarioError(message)) => assert!(message.contains("c_2")),
            other => panic!("expected a scenario error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let report = REPORT.replace("MassFlow_1: 1840 kg/s", "MassFlow_1: fast");
        assert!(matches!(
            parse_staging_report(&report),
            Err(SimulationError::ScenarioError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_scenario_error() {
        let result = read_staging_report(Path::new("does/not/exist.txt"));
        assert!(matches!(result, Err(SimulationError::ScenarioError(_))));
    }
}
