use thiserror::Error;

/// Fallback message when a failure carries no text of its own.
pub const CONNECTION_ERROR: &str = "Error de conexión con la API";

/// Every way a catalog request can fail.
///
/// Messages are meant for display. Cancellation is kept apart so callers can
/// drop it silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No HTTP response: refused connection, DNS failure, timeout.
    #[error("{0}")]
    Network(String),

    /// Non-success HTTP status. `message` comes from the body's `detail` or
    /// `message` field when present.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status with a body that is not the expected JSON.
    #[error("Respuesta inválida de la API: {0}")]
    Decode(String),

    #[error("Solicitud cancelada")]
    Cancelled,
}

impl ApiError {
    /// HTTP status, or 0 when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == 404
    }

    /// Build a status error from a response body, preferring its `detail`
    /// then `message` string fields.
    pub fn from_status(status: u16, body: &str) -> Self {
        let from_body = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["detail", "message"]
                    .iter()
                    .find_map(|k| v.get(k).and_then(|m| m.as_str()).map(String::from))
            })
            .filter(|m| !m.trim().is_empty());
        ApiError::Status {
            status,
            message: from_body
                .unwrap_or_else(|| format!("La solicitud falló con estado {status}")),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("La API no respondió a tiempo".into())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status.as_u16(), "")
        } else {
            ApiError::Network(CONNECTION_ERROR.into())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
