//! Error taxonomy for the reservation flow.
//!
//! The backend's atomic procedures fail with free-text messages that
//! embed stable tokens (`CM_NO_CABIN_AVAILABLE`, `no_cabin_available`,
//! ...). The endpoints and the submission client both normalize those
//! messages into this closed set of codes; the client then maps each
//! code to one fixed user-facing message. Raw backend text never
//! reaches an end user.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of reservation error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A required field was absent or blank
    #[serde(rename = "missing_fields")]
    MissingFields,
    /// The request body was not valid JSON
    #[serde(rename = "invalid_payload")]
    InvalidPayload,
    /// Zero or negative total headcount
    #[serde(rename = "CM_INVALID_PEOPLE_COUNT")]
    InvalidPeopleCount,
    /// Unknown package, or a package unable to provide a duration
    #[serde(rename = "CM_INVALID_PACKAGE")]
    InvalidPackage,
    /// The slot token did not resolve to a valid window
    #[serde(rename = "CM_INVALID_TIME_RANGE")]
    InvalidTimeRange,
    /// The backend enforced a minimum headcount
    #[serde(rename = "CM_MIN_PEOPLE_REQUIRED")]
    MinPeopleRequired,
    /// No cabin is free for the requested window
    #[serde(rename = "CM_NO_CABIN_AVAILABLE")]
    NoCabinAvailable,
    /// The group exceeds cabin capacity
    #[serde(rename = "CM_MAX_PEOPLE_EXCEEDED")]
    MaxPeopleExceeded,
    /// The caller is not signed in
    #[serde(rename = "not_authenticated")]
    NotAuthenticated,
    /// Anything the taxonomy does not recognize
    #[serde(rename = "unknown_error")]
    UnknownError,
}

impl ErrorCode {
    /// Stable wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidPayload => "invalid_payload",
            Self::InvalidPeopleCount => "CM_INVALID_PEOPLE_COUNT",
            Self::InvalidPackage => "CM_INVALID_PACKAGE",
            Self::InvalidTimeRange => "CM_INVALID_TIME_RANGE",
            Self::MinPeopleRequired => "CM_MIN_PEOPLE_REQUIRED",
            Self::NoCabinAvailable => "CM_NO_CABIN_AVAILABLE",
            Self::MaxPeopleExceeded => "CM_MAX_PEOPLE_EXCEEDED",
            Self::NotAuthenticated => "not_authenticated",
            Self::UnknownError => "unknown_error",
        }
    }

    /// The fixed message shown to the user for this code.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::MissingFields | Self::InvalidPayload => {
                "Faltan datos de la reserva. Revisa el formulario e intenta de nuevo."
            }
            Self::InvalidPeopleCount => "Indica cuantas personas vienen.",
            Self::InvalidPackage => "El paquete seleccionado ya no esta disponible.",
            Self::InvalidTimeRange => "El horario seleccionado no es valido.",
            Self::MinPeopleRequired => {
                "Esta fecha requiere un minimo de personas mayor al seleccionado."
            }
            Self::NoCabinAvailable => {
                "No hay cabañas disponibles en ese horario. Prueba otra fecha u hora."
            }
            Self::MaxPeopleExceeded => "El grupo supera la capacidad de la cabaña.",
            Self::NotAuthenticated => "Inicia sesion para completar tu reserva.",
            Self::UnknownError => "No pudimos procesar tu reserva. Intenta de nuevo.",
        }
    }

    /// Parses an exact wire code, including the aliases some paths use.
    #[must_use]
    pub fn from_wire(code: &str) -> Option<Self> {
        match code {
            "missing_fields" | "missing_phone" => Some(Self::MissingFields),
            "invalid_payload" => Some(Self::InvalidPayload),
            "CM_INVALID_PEOPLE_COUNT" => Some(Self::InvalidPeopleCount),
            "CM_INVALID_PACKAGE" | "invalid_package" => Some(Self::InvalidPackage),
            "CM_INVALID_TIME_RANGE" => Some(Self::InvalidTimeRange),
            "CM_MIN_PEOPLE_REQUIRED" => Some(Self::MinPeopleRequired),
            "CM_NO_CABIN_AVAILABLE" => Some(Self::NoCabinAvailable),
            "CM_MAX_PEOPLE_EXCEEDED" => Some(Self::MaxPeopleExceeded),
            "not_authenticated" | "CM_NOT_AUTHENTICATED" => Some(Self::NotAuthenticated),
            "unknown_error" => Some(Self::UnknownError),
            _ => None,
        }
    }

    /// Normalizes a backend error message into a code, degrading to
    /// [`ErrorCode::UnknownError`] when nothing in the message is
    /// recognizable.
    #[must_use]
    pub fn from_backend_message(message: &str) -> Self {
        extract_cm_token(message)
            .and_then(|token| Self::from_wire(&token))
            .or_else(|| {
                if message.contains("no_cabin_available") {
                    Some(Self::NoCabinAvailable)
                } else if message.contains("max_people_exceeded") {
                    Some(Self::MaxPeopleExceeded)
                } else {
                    None
                }
            })
            .unwrap_or(Self::UnknownError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finds the first `CM_[A-Z_]+` token embedded in a message.
fn extract_cm_token(message: &str) -> Option<String> {
    let start = message.find("CM_")?;
    let token: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || *c == '_')
        .collect();
    if token.len() > 3 { Some(token) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_round_trip() {
        for code in [
            ErrorCode::MissingFields,
            ErrorCode::InvalidPayload,
            ErrorCode::InvalidPeopleCount,
            ErrorCode::InvalidPackage,
            ErrorCode::InvalidTimeRange,
            ErrorCode::MinPeopleRequired,
            ErrorCode::NoCabinAvailable,
            ErrorCode::MaxPeopleExceeded,
            ErrorCode::NotAuthenticated,
            ErrorCode::UnknownError,
        ] {
            assert_eq!(ErrorCode::from_wire(code.as_str()), Some(code));
        }
    }

    #[test]
    fn embedded_cm_tokens_are_extracted() {
        assert_eq!(
            ErrorCode::from_backend_message("ERROR: CM_NO_CABIN_AVAILABLE (SQLSTATE P0001)"),
            ErrorCode::NoCabinAvailable
        );
        assert_eq!(
            ErrorCode::from_backend_message("CM_MAX_PEOPLE_EXCEEDED"),
            ErrorCode::MaxPeopleExceeded
        );
    }

    #[test]
    fn snake_case_substrings_are_recognized() {
        assert_eq!(
            ErrorCode::from_backend_message("raise exception no_cabin_available"),
            ErrorCode::NoCabinAvailable
        );
        assert_eq!(
            ErrorCode::from_backend_message("max_people_exceeded for cabin"),
            ErrorCode::MaxPeopleExceeded
        );
    }

    #[test]
    fn unrecognized_text_degrades_to_unknown() {
        assert_eq!(
            ErrorCode::from_backend_message("connection reset by peer"),
            ErrorCode::UnknownError
        );
        assert_eq!(ErrorCode::from_backend_message("CM_"), ErrorCode::UnknownError);
        assert_eq!(ErrorCode::from_backend_message(""), ErrorCode::UnknownError);
    }

    #[test]
    fn aliases_map_to_the_same_code() {
        assert_eq!(
            ErrorCode::from_wire("invalid_package"),
            Some(ErrorCode::InvalidPackage)
        );
        assert_eq!(
            ErrorCode::from_wire("CM_NOT_AUTHENTICATED"),
            Some(ErrorCode::NotAuthenticated)
        );
    }

    #[test]
    fn every_code_has_a_user_message() {
        assert!(!ErrorCode::UnknownError.user_message().is_empty());
        assert!(!ErrorCode::NoCabinAvailable.user_message().is_empty());
    }
}
