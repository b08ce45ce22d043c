//! Measured cooling curves from the lab sessions.
//!
//! Water at 74°C in plastic, ceramic and glass containers, left to cool either
//! at room temperature (`Ta = 20°C`) or in a fridge (`Ta = -8°C`). Times were
//! read off a stopwatch when the thermometer crossed each 5°C mark; both axes
//! carry a 1-unit uncertainty.

use crate::domain::{Dataset, Environment, Material};
use crate::error::CoolingError;

const TEMPERATURE: [f64; 10] = [74.0, 70.0, 65.0, 60.0, 55.0, 50.0, 45.0, 40.0, 35.0, 30.0];
// The ceramic fridge run was started late; its marks are shifted.
const TEMPERATURE_CERAMIC_FRIDGE: [f64; 10] = [71.0, 66.0, 59.0, 53.0, 50.0, 45.0, 40.0, 35.0, 30.0, 25.0];
const SIGMA: [f64; 10] = [1.0; 10];

const PLASTIC_ROOM: [f64; 10] = [
    0.0, 61.012, 154.066, 271.057, 426.037, 635.080, 880.026, 1227.030, 1693.073, 2451.036,
];
const CERAMIC_ROOM: [f64; 10] = [
    0.0, 31.083, 105.037, 193.050, 325.006, 498.057, 734.031, 1040.016, 1478.095, 2105.031,
];
const GLASS_ROOM: [f64; 10] = [
    0.0, 55.041, 140.026, 253.067, 399.059, 582.015, 830.067, 1157.082, 1622.086, 2318.051,
];

const PLASTIC_FRIDGE: [f64; 10] = [
    0.0, 49.046, 123.021, 214.028, 322.074, 591.064, 762.054, 981.024, 1241.062, 1541.059,
];
const CERAMIC_FRIDGE: [f64; 10] = [
    0.0, 60.0, 155.051, 268.006, 334.038, 470.024, 577.038, 768.061, 953.062, 1185.045,
];
const GLASS_FRIDGE: [f64; 10] = [
    0.0, 48.069, 116.010, 201.013, 299.082, 415.034, 545.016, 699.061, 896.004, 1145.097,
];

/// The measured dataset for one material in one environment.
pub fn measured_dataset(env: Environment, material: Material) -> Result<Dataset, CoolingError> {
    let (time, temperature): (&[f64], &[f64]) = match (env, material) {
        (Environment::Room, Material::Plastic) => (&PLASTIC_ROOM, &TEMPERATURE),
        (Environment::Room, Material::Ceramic) => (&CERAMIC_ROOM, &TEMPERATURE),
        (Environment::Room, Material::Glass) => (&GLASS_ROOM, &TEMPERATURE),
        (Environment::Fridge, Material::Plastic) => (&PLASTIC_FRIDGE, &TEMPERATURE),
        (Environment::Fridge, Material::Ceramic) => (&CERAMIC_FRIDGE, &TEMPERATURE_CERAMIC_FRIDGE),
        (Environment::Fridge, Material::Glass) => (&GLASS_FRIDGE, &TEMPERATURE),
    };
    let label = format!("{} ({})", material.display_name(), env.display_name());
    Dataset::from_columns(label, time, temperature, &SIGMA, &SIGMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dataset_is_valid_and_time_ordered() {
        for env in [Environment::Room, Environment::Fridge] {
            for material in Material::ALL {
                let ds = measured_dataset(env, material).unwrap();
                assert_eq!(ds.len(), 10);
                assert_eq!(ds.points[0].time, 0.0);
                assert!(ds.points.windows(2).all(|w| w[1].time > w[0].time), "{}", ds.label);
                assert!(ds.points.windows(2).all(|w| w[1].temperature < w[0].temperature));
                assert!(ds.points.iter().all(|p| p.temperature > env.ambient()));
            }
        }
    }

    #[test]
    fn labels_name_material_and_environment() {
        let ds = measured_dataset(Environment::Fridge, Material::Glass).unwrap();
        assert_eq!(ds.label, "Water-Glass (fridge)");
    }
}
