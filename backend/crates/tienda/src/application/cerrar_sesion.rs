//! Cerrar Sesión Use Case
//!
//! Clears the three user keys on the session. The row itself survives so
//! the goodbye banner can ride it through the redirect; when the request
//! carries no usable session, a fresh anonymous one is created just to
//! hold the banner. Calling this twice in a row is fine.

use std::sync::Arc;

use crate::application::config::TiendaConfig;
use crate::application::{token, verificar_sesion::VerificarSesionUseCase};
use crate::domain::entity::sesion::{Mensaje, Sesion};
use crate::domain::repository::SesionRepository;
use crate::error::TiendaResult;

/// Sign out use case
pub struct CerrarSesionUseCase<R>
where
    R: SesionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<TiendaConfig>,
}

impl<R> CerrarSesionUseCase<R>
where
    R: SesionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<TiendaConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns the token the cookie should carry after logout
    pub async fn execute(&self, session_token: Option<&str>) -> TiendaResult<String> {
        let despedida = Mensaje::info("Has cerrado sesión exitosamente.");

        if let Some(token_str) = session_token {
            let verificar =
                VerificarSesionUseCase::new(self.repo.clone(), self.config.clone());
            if let Ok(mut sesion) = verificar.obtener(token_str).await {
                sesion.cerrar();
                sesion.agregar_mensaje(despedida);
                self.repo.actualizar_sesion(&sesion).await?;

                tracing::info!(id_sesion = %sesion.id_sesion, "Usuario cerró sesión");
                return Ok(token_str.to_string());
            }
        }

        // No session to close; the banner still has to reach the login page
        let mut sesion = Sesion::anonima(self.config.session_ttl_chrono());
        sesion.agregar_mensaje(despedida);
        self.repo.crear_sesion(&sesion).await?;

        Ok(token::firmar_token(
            sesion.id_sesion,
            &self.config.session_secret,
        ))
    }
}
