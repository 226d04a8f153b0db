//! Car catalogue
//!
//! The selectable car models and the default weight/power/torque applied when a
//! car is picked. Defaults are keyed on the model family, matched by name.

use crate::performance::VehicleSpec;

/// Car models offered by the calculator
pub const CAR_MODELS: &[&str] = &[
    // Ford
    "1997 Ford Probe GT",
    // Mitsubishi
    "1999 Mitsubishi 3000GT SL",
    "1999 Mitsubishi Eclipse GSX",
    "1999 Mitsubishi 3000GT VR-4",
    "2005 Mitsubishi Lancer Evolution VIII",
    // Acura
    "1997 Acura Integra Type-R",
    "1997 Acura Integra GSR",
    "1999 Acura NSX",
    // Subaru
    "1998 Subaru WRX STI 22B",
    "2002 Subaru WRX",
    "2002 Subaru WRX STI",
    "2002 Subaru WRX STI RWD",
    "2005 Subaru WRX",
    "2005 Subaru WRX STI",
    // Dodge
    "2005 Dodge Neon SRT-4",
    // Honda
    "1997 Honda Civic Type-R",
    "1997 Honda Civic DX",
    // Mazda
    "1993 Mazda RX-7",
    // Chevrolet
    "2004 Chevrolet Corvette Z06",
];

/// Car selected when nothing else is chosen
pub const DEFAULT_CAR: &str = "1999 Mitsubishi Eclipse GSX";

/// Model families with their own defaults, checked in order
const FAMILY_DEFAULTS: &[(&str, (f64, f64, f64))] = &[
    ("Corvette", (3200.0, 400.0, 400.0)),
    ("Civic", (2600.0, 160.0, 140.0)),
    ("Eclipse", (3200.0, 210.0, 214.0)),
    ("Lancer", (3200.0, 276.0, 286.0)),
];

const FALLBACK_DEFAULTS: (f64, f64, f64) = (3200.0, 250.0, 250.0);

/// Default vehicle spec for a car model name
pub fn default_spec_for(car: &str) -> VehicleSpec {
    let (weight, power, torque) = FAMILY_DEFAULTS
        .iter()
        .find(|(family, _)| car.contains(family))
        .map(|(_, spec)| *spec)
        .unwrap_or(FALLBACK_DEFAULTS);
    VehicleSpec::new(weight, power, torque)
}

/// File-name slug for a car: whitespace runs become `-`, lowercased
pub fn car_slug(car: &str) -> String {
    car.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Check whether a name is one of the catalogue's models
pub fn is_known_model(car: &str) -> bool {
    CAR_MODELS.contains(&car)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_defaults() {
        assert_eq!(default_spec_for("2004 Chevrolet Corvette Z06").power_hp, 400.0);
        assert_eq!(default_spec_for("1997 Honda Civic DX").weight_lb, 2600.0);
        assert_eq!(default_spec_for("2005 Mitsubishi Lancer Evolution VIII").torque_lb_ft, 286.0);
        assert_eq!(default_spec_for("1993 Mazda RX-7"), VehicleSpec::new(3200.0, 250.0, 250.0));
    }

    #[test]
    fn test_car_slug() {
        assert_eq!(car_slug("1999 Mitsubishi  Eclipse GSX"), "1999-mitsubishi-eclipse-gsx");
        assert_eq!(car_slug(" 1993 Mazda RX-7 "), "1993-mazda-rx-7");
    }

    #[test]
    fn test_default_car_is_in_catalogue() {
        assert!(is_known_model(DEFAULT_CAR));
        assert_eq!(default_spec_for(DEFAULT_CAR), VehicleSpec::default());
    }
}
