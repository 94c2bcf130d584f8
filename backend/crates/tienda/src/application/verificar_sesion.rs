//! Verificar Sesión Use Case
//!
//! Resolves a browser token to a live session row. Expired rows are
//! removed on sight.

use std::sync::Arc;

use crate::application::config::TiendaConfig;
use crate::application::token;
use crate::domain::entity::sesion::Sesion;
use crate::domain::repository::SesionRepository;
use crate::error::{TiendaError, TiendaResult};

/// Check session use case
pub struct VerificarSesionUseCase<R>
where
    R: SesionRepository + Clone + Send + Sync + 'static,
{
    repo: Arc<R>,
    config: Arc<TiendaConfig>,
}

impl<R> VerificarSesionUseCase<R>
where
    R: SesionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, config: Arc<TiendaConfig>) -> Self {
        Self { repo, config }
    }

    /// Get the session for a token, or `SesionInvalida`
    pub async fn obtener(&self, session_token: &str) -> TiendaResult<Sesion> {
        let id_sesion = token::verificar_token(session_token, &self.config.session_secret)?;

        let sesion = self
            .repo
            .obtener_sesion(id_sesion)
            .await?
            .ok_or(TiendaError::SesionInvalida)?;

        if sesion.esta_expirada() {
            self.repo.eliminar_sesion(id_sesion).await?;
            return Err(TiendaError::SesionInvalida);
        }

        Ok(sesion)
    }

    /// Session with a user attached, as the auth gate requires
    pub async fn obtener_autenticada(&self, session_token: &str) -> TiendaResult<Sesion> {
        let sesion = self.obtener(session_token).await?;
        if !sesion.tiene_usuario() {
            return Err(TiendaError::SesionInvalida);
        }
        Ok(sesion)
    }
}
