use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ValidationError;

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 7;
pub const DEFAULT_DELIMITER: &str = " ";

static AIRLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid airline code pattern"));
static FLIGHT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]*[A-Z]*$").expect("valid flight number pattern"));

/// An ICAO flight callsign, e.g. `DLH 2421`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CallsignParts", into = "CallsignParts")]
pub struct Callsign {
    airline_icao_code: String,
    flight_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallsignParts {
    airline_icao_code: String,
    flight_number: String,
}

impl Callsign {
    /// Parse a raw callsign. The airline code is always the first three
    /// normalized characters and the flight number the rest.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase().replace(' ', "");
        let chars: Vec<char> = normalized.chars().collect();

        if chars.len() < MIN_LENGTH {
            return Err(ValidationError::TooShort(normalized));
        }
        if chars.len() > MAX_LENGTH {
            return Err(ValidationError::TooLong(normalized));
        }

        let airline_icao_code: String = chars[..3].iter().collect();
        if !AIRLINE_CODE.is_match(&airline_icao_code) {
            return Err(ValidationError::InvalidAirlineCode(airline_icao_code));
        }

        let flight_number: String = chars[3..].iter().collect();
        if !FLIGHT_NUMBER.is_match(&flight_number) {
            return Err(ValidationError::InvalidFlightNumber(flight_number));
        }

        Ok(Self {
            airline_icao_code,
            flight_number,
        })
    }

    pub fn airline_icao_code(&self) -> &str {
        &self.airline_icao_code
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn full_value(&self, delimiter: &str) -> String {
        format!("{}{}{}", self.airline_icao_code, delimiter, self.flight_number)
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_value(DEFAULT_DELIMITER))
    }
}

impl FromStr for Callsign {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<CallsignParts> for Callsign {
    type Error = ValidationError;

    fn try_from(value: CallsignParts) -> Result<Self, Self::Error> {
        Self::parse(&format!("{}{}", value.airline_icao_code, value.flight_number))
    }
}

impl From<Callsign> for CallsignParts {
    fn from(callsign: Callsign) -> Self {
        Self {
            airline_icao_code: callsign.airline_icao_code,
            flight_number: callsign.flight_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lowercase() {
        let callsign = Callsign::parse("dlh2421").unwrap();
        assert_eq!(callsign.airline_icao_code(), "DLH");
        assert_eq!(callsign.flight_number(), "2421");
        assert_eq!(callsign.full_value(DEFAULT_DELIMITER), "DLH 2421");
    }

    #[test]
    fn test_parse_with_spaces_and_suffix() {
        // "BA12AB": airline code "BA1" is not letters only
        let err = Callsign::parse(" ba 12ab ").unwrap_err();
        assert_eq!(err, ValidationError::InvalidAirlineCode("BA1".to_string()));

        let callsign = Callsign::parse(" baw 12ab ").unwrap();
        assert_eq!(callsign.airline_icao_code(), "BAW");
        assert_eq!(callsign.flight_number(), "12AB");
        assert_eq!(callsign.to_string(), "BAW 12AB");
        assert_eq!(callsign.full_value("-"), "BAW-12AB");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(
            Callsign::parse("DLH"),
            Err(ValidationError::TooShort("DLH".to_string()))
        );
        assert_eq!(
            Callsign::parse("DLH24211"),
            Err(ValidationError::TooLong("DLH24211".to_string()))
        );
        assert!(Callsign::parse("DLH1").is_ok());
        assert!(Callsign::parse("DLH1234").is_ok());
    }

    #[test]
    fn test_invalid_airline_code() {
        assert_eq!(
            Callsign::parse("AB123"),
            Err(ValidationError::InvalidAirlineCode("AB1".to_string()))
        );
    }

    #[test]
    fn test_invalid_flight_number() {
        assert_eq!(
            Callsign::parse("DLH0123"),
            Err(ValidationError::InvalidFlightNumber("0123".to_string()))
        );
        assert_eq!(
            Callsign::parse("DLHA12"),
            Err(ValidationError::InvalidFlightNumber("A12".to_string()))
        );
        assert_eq!(
            Callsign::parse("DLH12A3"),
            Err(ValidationError::InvalidFlightNumber("12A3".to_string()))
        );
    }

    #[test]
    fn test_serialization_shape() {
        let callsign = Callsign::parse("DLH2421").unwrap();
        let json = serde_json::to_value(&callsign).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"airlineIcaoCode": "DLH", "flightNumber": "2421"})
        );

        let back: Callsign = serde_json::from_value(json).unwrap();
        assert_eq!(back, callsign);
    }

    #[test]
    fn test_deserialization_revalidates() {
        let json = serde_json::json!({"airlineIcaoCode": "DLH", "flightNumber": "0421"});
        assert!(serde_json::from_value::<Callsign>(json).is_err());
    }
}
