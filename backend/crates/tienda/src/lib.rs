//! Tienda Backend Module
//!
//! Administrative backend for a small retail store: staff sign in, see a
//! dashboard of counts, manage product records (with one photo upload)
//! and browse customers.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities and repository traits
//! - `application/` - Use cases, session tokens, configuration
//! - `infra/` - PostgreSQL repository, photo storage
//! - `presentation/` - HTTP handlers, contexts, router, auth gate
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Server-side sessions; the cookie token is HMAC-SHA256 signed
//! - Every user-supplied value reaches SQL as a bind parameter
//! - One generic message for every login failure

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::TiendaConfig;
pub use error::{TiendaError, TiendaResult};
pub use infra::fotos::AlmacenFotos;
pub use infra::postgres::PgTiendaRepository;
pub use presentation::router::{tienda_router, tienda_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
