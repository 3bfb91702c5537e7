//! Error taxonomy and the translation tables that feed it.
//!
//! The backend reports failures as free-text messages inside the response
//! envelope, so translation is substring matching against a known table,
//! kept here as pure functions so the tables can be tested in isolation.

use thiserror::Error;

use crate::transport::TransportFailure;

pub type Result<T> = std::result::Result<T, AppError>;

/// Setup-level failures: configuration, local IO, serialization.
///
/// Operation failures use [`ApiError`] instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("setup error: {0}")]
    Setup(String),
}

/// Every failure a backend operation can surface, as a closed set.
///
/// The presentation layer receives exactly one of these per failed call and
/// renders `kind()` plus the display message; nothing else crosses that
/// boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Bad local input; raised before any network activity.
    #[error("{0}")]
    Validation(String),
    /// Device offline or the endpoint never answered.
    #[error("{0}")]
    Connectivity(String),
    /// A non-2xx status with no more specific meaning.
    #[error("Error HTTP: {status}")]
    Transport { status: u16 },
    #[error("Recurso no encontrado en el servidor")]
    EndpointNotFound,
    #[error("Acceso denegado")]
    AccessDenied,
    #[error("{0}")]
    Server(String),
    #[error("Credenciales inválidas")]
    InvalidCredentials,
    #[error("El usuario ya está registrado")]
    DuplicateUser,
    #[error("Sesión expirada, vuelve a iniciar sesión")]
    SessionExpired,
}

impl ApiError {
    /// Stable kind name for the `{kind, message}` presentation contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Connectivity(_) => "connectivity",
            Self::Transport { .. } => "transport",
            Self::EndpointNotFound => "endpoint_not_found",
            Self::AccessDenied => "access_denied",
            Self::Server(_) => "server",
            Self::InvalidCredentials => "invalid_credentials",
            Self::DuplicateUser => "duplicate_user",
            Self::SessionExpired => "session_expired",
        }
    }
}

const FALLBACK_SERVER_ERROR: &str = "Error en el servidor";

const SESSION_MARKERS: &[&str] = &["Token inválido", "Token expirado", "Sesión expirada"];
const CREDENTIAL_MARKERS: &[&str] = &[
    "Credenciales inválidas",
    "Contraseña incorrecta",
    "Usuario no encontrado",
];
const DUPLICATE_MARKERS: &[&str] = &["ya está registrado", "ya existe"];

/// Maps a backend-reported error message onto the taxonomy.
///
/// Known phrases are matched by substring before falling back to a generic
/// [`ApiError::Server`] carrying the raw message.
pub fn classify_backend_error(raw: &str) -> ApiError {
    let contains_any = |markers: &[&str]| markers.iter().any(|marker| raw.contains(marker));

    if contains_any(SESSION_MARKERS) {
        ApiError::SessionExpired
    } else if contains_any(CREDENTIAL_MARKERS) {
        ApiError::InvalidCredentials
    } else if contains_any(DUPLICATE_MARKERS) {
        ApiError::DuplicateUser
    } else if raw.is_empty() {
        ApiError::Server(FALLBACK_SERVER_ERROR.to_string())
    } else {
        ApiError::Server(raw.to_string())
    }
}

/// Maps a transport-layer failure onto the taxonomy by status band.
pub fn classify_transport(failure: TransportFailure) -> ApiError {
    match failure {
        TransportFailure::NoResponse(reason) => {
            ApiError::Connectivity(format!("Error de conexión: {reason}"))
        }
        TransportFailure::Status { status, body } => match status {
            404 => ApiError::EndpointNotFound,
            403 => ApiError::AccessDenied,
            500 => {
                if body.is_empty() {
                    ApiError::Server(FALLBACK_SERVER_ERROR.to_string())
                } else {
                    ApiError::Server(body)
                }
            }
            _ => ApiError::Transport { status },
        },
        TransportFailure::Decode(reason) => {
            ApiError::Server(format!("Respuesta inválida del servidor: {reason}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_rejection_maps_to_session_expired() {
        assert_eq!(
            classify_backend_error("Token inválido"),
            ApiError::SessionExpired
        );
        assert_eq!(
            classify_backend_error("Error: Sesión expirada, autentícate de nuevo"),
            ApiError::SessionExpired
        );
    }

    #[test]
    fn credential_rejection_maps_to_invalid_credentials() {
        assert_eq!(
            classify_backend_error("Credenciales inválidas"),
            ApiError::InvalidCredentials
        );
        assert_eq!(
            classify_backend_error("Contraseña incorrecta para admin@finpro.com"),
            ApiError::InvalidCredentials
        );
    }

    #[test]
    fn duplicate_registration_maps_to_duplicate_user() {
        assert_eq!(
            classify_backend_error("El email ya está registrado"),
            ApiError::DuplicateUser
        );
    }

    #[test]
    fn unknown_message_falls_back_to_server_error_with_raw_message() {
        assert_eq!(
            classify_backend_error("La hoja de cálculo está bloqueada"),
            ApiError::Server("La hoja de cálculo está bloqueada".to_string())
        );
        assert_eq!(
            classify_backend_error(""),
            ApiError::Server("Error en el servidor".to_string())
        );
    }

    #[test]
    fn transport_statuses_map_by_band() {
        assert_eq!(
            classify_transport(TransportFailure::Status {
                status: 404,
                body: String::new(),
            }),
            ApiError::EndpointNotFound
        );
        assert_eq!(
            classify_transport(TransportFailure::Status {
                status: 403,
                body: String::new(),
            }),
            ApiError::AccessDenied
        );
        assert_eq!(
            classify_transport(TransportFailure::Status {
                status: 500,
                body: "boom".to_string(),
            }),
            ApiError::Server("boom".to_string())
        );
        assert_eq!(
            classify_transport(TransportFailure::Status {
                status: 429,
                body: String::new(),
            }),
            ApiError::Transport { status: 429 }
        );
    }

    #[test]
    fn no_response_maps_to_connectivity() {
        let err = classify_transport(TransportFailure::NoResponse("timeout".to_string()));
        assert_eq!(err.kind(), "connectivity");
    }
}
