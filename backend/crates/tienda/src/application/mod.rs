//! Application Layer - Use cases and application services

pub mod cerrar_sesion;
pub mod config;
pub mod iniciar_sesion;
pub mod mensajes;
pub mod token;
pub mod verificar_sesion;

pub use cerrar_sesion::CerrarSesionUseCase;
pub use iniciar_sesion::{IniciarSesionOutput, IniciarSesionUseCase};
pub use mensajes::Mensajeria;
pub use verificar_sesion::VerificarSesionUseCase;
