//! Tienda Error Types
//!
//! Store-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. The taxonomy matters to the
//! handlers: not-found is a warning, constraint violations get their own
//! user-visible messages, and everything else collapses into a generic
//! data-access failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Store-specific result type alias
pub type TiendaResult<T> = Result<T, TiendaError>;

/// Store-specific error variants
#[derive(Debug, Error)]
pub enum TiendaError {
    /// Target row does not exist
    #[error("Producto no encontrado.")]
    ProductoNoEncontrado,

    /// Insert with an id that is already taken
    #[error("Ya existe un producto con ese id.")]
    IdDuplicado,

    /// Delete blocked by a referential-integrity rule
    #[error("No se puede eliminar: el producto está referenciado por una factura.")]
    ReferenciadoPorFactura,

    /// Login failure. One message for unknown user and wrong password;
    /// the text must never reveal which check failed.
    #[error("Usuario o contraseña inválidos.")]
    CredencialesInvalidas,

    /// Session token missing, malformed, tampered or expired
    #[error("Sesión no válida o expirada.")]
    SesionInvalida,

    /// Malformed form input (missing field, unparsable number)
    #[error("Formulario inválido: {0}")]
    FormularioInvalido(String),

    /// Generic data-access failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TiendaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TiendaError::ProductoNoEncontrado => StatusCode::NOT_FOUND,
            TiendaError::IdDuplicado | TiendaError::ReferenciadoPorFactura => StatusCode::CONFLICT,
            TiendaError::CredencialesInvalidas | TiendaError::SesionInvalida => {
                StatusCode::UNAUTHORIZED
            }
            TiendaError::FormularioInvalido(_) => StatusCode::BAD_REQUEST,
            TiendaError::Database(_) | TiendaError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TiendaError::ProductoNoEncontrado => ErrorKind::NotFound,
            TiendaError::IdDuplicado | TiendaError::ReferenciadoPorFactura => ErrorKind::Conflict,
            TiendaError::CredencialesInvalidas | TiendaError::SesionInvalida => {
                ErrorKind::Unauthorized
            }
            TiendaError::FormularioInvalido(_) => ErrorKind::BadRequest,
            TiendaError::Database(_) | TiendaError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TiendaError::Database(e) => {
                tracing::error!(error = %e, "Tienda database error");
            }
            TiendaError::Internal(msg) => {
                tracing::error!(message = %msg, "Tienda internal error");
            }
            TiendaError::CredencialesInvalidas => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Tienda error");
            }
        }
    }
}

impl IntoResponse for TiendaError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for TiendaError {
    fn from(err: sqlx::Error) -> Self {
        // Constraint violations carry semantics the handlers must
        // distinguish; everything else stays a generic database error.
        // https://www.postgresql.org/docs/current/errcodes-appendix.html
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => return TiendaError::IdDuplicado,
                Some("23503") | Some("23001") => return TiendaError::ReferenciadoPorFactura,
                _ => {}
            }
        }
        TiendaError::Database(err)
    }
}

impl From<serde_json::Error> for TiendaError {
    fn from(err: serde_json::Error) -> Self {
        TiendaError::Internal(format!("Session payload corrupt: {err}"))
    }
}
