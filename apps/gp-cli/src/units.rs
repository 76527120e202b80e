//! Unit-tagged numeric input.
//!
//! Values such as `"300 K"`, `"25C"`, `"5 MPa"` or `"14.7 psia"` are converted
//! to kelvin and absolute pascal before they reach the engine. A bare number
//! is taken as SI.

use gp_core::units::constants::ATM_PA;
use thiserror::Error;

const PSI_PA: f64 = 6_894.757;

/// Error in unit parsing or conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Input text did not parse to a number + optional unit
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: &'static str },
    /// Unit not allowed as-is (plain "psi" requires "psia" or "psig")
    #[error("Ambiguous unit '{unit}': {reason}")]
    AmbiguousUnit { unit: String, reason: &'static str },
    #[error("Value {value} out of range: {reason}")]
    OutOfRange { value: f64, reason: &'static str },
}

/// Parse temperature in various units, return Kelvin.
pub fn parse_temperature(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let kelvin = match unit.to_lowercase().as_str() {
        "" | "k" | "kelvin" => value,
        "c" | "°c" | "degc" | "celsius" => value + 273.15,
        "f" | "°f" | "degf" | "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
        "r" | "°r" | "degr" | "rankine" => value * 5.0 / 9.0,
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: "temperature",
            });
        }
    };

    if kelvin <= 0.0 {
        return Err(UnitError::OutOfRange {
            value: kelvin,
            reason: "absolute temperature must be > 0 K",
        });
    }
    Ok(kelvin)
}

/// Parse pressure in various units, return absolute Pa.
///
/// Gauge units are referenced to one standard atmosphere.
pub fn parse_pressure(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let pa = match unit.to_lowercase().as_str() {
        "" | "pa" | "pascal" => value,
        "kpa" => value * 1e3,
        "mpa" => value * 1e6,
        "gpa" => value * 1e9,
        "bar" | "bara" => value * 1e5,
        "mbar" | "millibar" => value * 100.0,
        "atm" => value * ATM_PA,
        "torr" | "mmhg" => value * ATM_PA / 760.0,
        "psia" => value * PSI_PA,
        "psig" => value * PSI_PA + ATM_PA,
        "barg" => value * 1e5 + ATM_PA,
        "kpag" => value * 1e3 + ATM_PA,
        "mpag" => value * 1e6 + ATM_PA,
        "psi" => {
            return Err(UnitError::AmbiguousUnit {
                unit,
                reason: "use 'psia' (absolute) or 'psig' (gauge)",
            });
        }
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: "pressure",
            });
        }
    };

    if pa < 0.0 {
        return Err(UnitError::OutOfRange {
            value: pa,
            reason: "absolute pressure cannot be negative",
        });
    }
    Ok(pa)
}

/// Split `"14.7 psia"` into `(14.7, "psia")`.
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();

    // The numeric part may carry a sign and an exponent ("1.5e6 Pa")
    let bytes = trimmed.as_bytes();
    let mut split_idx = 0;
    while split_idx < bytes.len() {
        let c = bytes[split_idx] as char;
        let exponent = (c == 'e' || c == 'E')
            && bytes
                .get(split_idx + 1)
                .is_some_and(|n| n.is_ascii_digit() || *n == b'-' || *n == b'+');
        if c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || exponent {
            split_idx += 1;
        } else {
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let value: f64 = num_part.trim().parse().map_err(|_| {
        UnitError::ParseError(format!("could not parse numeric value from '{input}'"))
    })?;

    Ok((value, unit_part.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kelvin() {
        assert_eq!(parse_temperature("300 K").unwrap(), 300.0);
        assert_eq!(parse_temperature("300K").unwrap(), 300.0);
        assert_eq!(parse_temperature("300").unwrap(), 300.0);
    }

    #[test]
    fn parse_celsius_and_fahrenheit() {
        assert!((parse_temperature("0C").unwrap() - 273.15).abs() < 1e-9);
        assert!((parse_temperature("32 F").unwrap() - 273.15).abs() < 1e-9);
        assert!((parse_temperature("491.67 R").unwrap() - 273.15).abs() < 1e-9);
    }

    #[test]
    fn reject_non_positive_temperature() {
        assert!(matches!(
            parse_temperature("-300 C"),
            Err(UnitError::OutOfRange { .. })
        ));
    }

    #[test]
    fn parse_pressures() {
        assert_eq!(parse_pressure("101325").unwrap(), 101325.0);
        assert_eq!(parse_pressure("5 MPa").unwrap(), 5e6);
        assert_eq!(parse_pressure("1.5e6 Pa").unwrap(), 1.5e6);
        assert_eq!(parse_pressure("2 bar").unwrap(), 2e5);
        assert_eq!(parse_pressure("1 atm").unwrap(), ATM_PA);
        assert!((parse_pressure("14.7 psia").unwrap() - 101_352.9).abs() < 0.1);
        assert!((parse_pressure("0 psig").unwrap() - ATM_PA).abs() < 1e-9);
    }

    #[test]
    fn reject_ambiguous_psi() {
        assert!(matches!(
            parse_pressure("100 psi"),
            Err(UnitError::AmbiguousUnit { .. })
        ));
    }

    #[test]
    fn reject_unknown_units() {
        assert!(matches!(
            parse_pressure("3 furlongs"),
            Err(UnitError::UnknownUnit { .. })
        ));
        assert!(matches!(
            parse_temperature("abc"),
            Err(UnitError::ParseError(_))
        ));
    }
}
