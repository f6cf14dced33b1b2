use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Ingresa usuario y contraseña.")]
    MissingCredentials,
    #[error("Primero inicia sesión como Admin.")]
    NotLoggedIn,
    #[error("Selecciona un archivo Excel.")]
    MissingFile,
    #[error("No se pudo leer el archivo enviado.")]
    UnreadableUpload,
    #[error("Selecciona la columna DNI.")]
    MissingIdentifierColumn,
    #[error("Selecciona la columna Fecha.")]
    MissingDateColumn,
    #[error("Selecciona al menos una columna visible.")]
    NoVisibleColumns,
    #[error("Completa DNI y Fecha.")]
    MissingQueryFields,
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("HTTP {status}: {body}")]
    Request { status: u16, body: String },

    #[error("no se pudo contactar al servidor: {0}")]
    Network(#[from] reqwest::Error),

    #[error("respuesta inesperada del servidor: {0}")]
    Schema(String),
}

impl PortalError {
    pub fn is_validation(&self) -> bool {
        matches!(self, PortalError::Validation(_))
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Validation(_) => Self::bad_request(err.to_string()),
            other => Self {
                status: StatusCode::BAD_GATEWAY,
                message: other.to_string(),
            },
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
