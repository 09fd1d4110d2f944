//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Six colon-separated hex octets, either case.
    static ref MAC_ADDRESS_RE: Regex =
        Regex::new(r"^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$").unwrap();

    /// Vehicle registration plates: legacy `AAA-1234` or Mercosul `AAA1B23`.
    static ref PLATE_RE: Regex =
        Regex::new(r"^[A-Z]{3}-?\d{4}$|^[A-Z]{3}\d[A-Z]\d{2}$").unwrap();
}

/// Validates that a MAC address has the form `XX:XX:XX:XX:XX:XX`.
///
/// Hex digits are accepted in either case; storage always uses the canonical
/// form produced by [`canonicalize_mac`].
pub fn validate_mac_address(mac: &str) -> Result<(), ValidationError> {
    if MAC_ADDRESS_RE.is_match(mac) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mac_address_format");
        err.message = Some("MAC address must have the form XX:XX:XX:XX:XX:XX".into());
        Err(err)
    }
}

/// Returns the canonical (uppercase) form of a MAC address.
///
/// Callers must validate the address first; this only normalizes case.
pub fn canonicalize_mac(mac: &str) -> String {
    mac.to_ascii_uppercase()
}

/// Validates a vehicle registration plate.
///
/// Accepts the legacy format (`AAA-1234`, hyphen optional) and the Mercosul
/// format (`AAA1B23`). Input must already be uppercase.
pub fn validate_plate(plate: &str) -> Result<(), ValidationError> {
    if PLATE_RE.is_match(plate) {
        Ok(())
    } else {
        let mut err = ValidationError::new("plate_format");
        err.message = Some("Plate must match AAA-1234 or AAA1B23".into());
        Err(err)
    }
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // MAC address tests
    #[test]
    fn test_validate_mac_address() {
        assert!(validate_mac_address("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_mac_address("aa:bb:cc:dd:ee:ff").is_ok());
        assert!(validate_mac_address("00:11:22:33:44:55").is_ok());
        assert!(validate_mac_address("Aa:bB:0c:D1:e2:F3").is_ok());
    }

    #[test]
    fn test_validate_mac_address_rejects_malformed() {
        assert!(validate_mac_address("").is_err());
        assert!(validate_mac_address("AA:BB:CC:DD:EE").is_err());
        assert!(validate_mac_address("AA:BB:CC:DD:EE:FF:00").is_err());
        assert!(validate_mac_address("AA-BB-CC-DD-EE-FF").is_err());
        assert!(validate_mac_address("GG:BB:CC:DD:EE:FF").is_err());
        assert!(validate_mac_address("AABBCCDDEEFF").is_err());
    }

    #[test]
    fn test_validate_mac_address_error_message() {
        let err = validate_mac_address("nope").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "MAC address must have the form XX:XX:XX:XX:XX:XX"
        );
    }

    #[test]
    fn test_canonicalize_mac() {
        assert_eq!(canonicalize_mac("aa:bb:cc:dd:ee:ff"), "AA:BB:CC:DD:EE:FF");
        assert_eq!(canonicalize_mac("AA:BB:CC:DD:EE:FF"), "AA:BB:CC:DD:EE:FF");
        assert_eq!(canonicalize_mac("a1:B2:c3:D4:e5:F6"), "A1:B2:C3:D4:E5:F6");
    }

    // Plate tests
    #[test]
    fn test_validate_plate_legacy() {
        assert!(validate_plate("ABC-1234").is_ok());
        assert!(validate_plate("ABC1234").is_ok());
        assert!(validate_plate("XYZ-0001").is_ok());
    }

    #[test]
    fn test_validate_plate_mercosul() {
        assert!(validate_plate("ABC1D23").is_ok());
        assert!(validate_plate("XYZ9A00").is_ok());
    }

    #[test]
    fn test_validate_plate_rejects_malformed() {
        assert!(validate_plate("").is_err());
        assert!(validate_plate("abc-1234").is_err());
        assert!(validate_plate("AB-1234").is_err());
        assert!(validate_plate("ABCD-1234").is_err());
        assert!(validate_plate("ABC-123").is_err());
        assert!(validate_plate("ABC1DE3").is_err());
        assert!(validate_plate("1234ABC").is_err());
    }

    #[test]
    fn test_validate_plate_error_message() {
        let err = validate_plate("bogus").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Plate must match AAA-1234 or AAA1B23"
        );
    }

    // Latitude tests
    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude(0.0).is_ok());
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        assert!(validate_latitude(90.1).is_err());
        assert!(validate_latitude(-90.1).is_err());
    }

    #[test]
    fn test_validate_latitude_decimals() {
        assert!(validate_latitude(45.123456).is_ok());
        assert!(validate_latitude(-45.123456).is_ok());
        assert!(validate_latitude(89.999999).is_ok());
    }

    #[test]
    fn test_validate_latitude_error_message() {
        let err = validate_latitude(100.0).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Latitude must be between -90 and 90"
        );
    }

    // Longitude tests
    #[test]
    fn test_validate_longitude() {
        assert!(validate_longitude(0.0).is_ok());
        assert!(validate_longitude(180.0).is_ok());
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.1).is_err());
        assert!(validate_longitude(-180.1).is_err());
    }

    #[test]
    fn test_validate_longitude_error_message() {
        let err = validate_longitude(200.0).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Longitude must be between -180 and 180"
        );
    }
}
