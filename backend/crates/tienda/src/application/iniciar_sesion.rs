//! Iniciar Sesión Use Case
//!
//! Authenticates a staff user and creates a session with the user keys
//! populated. Unknown user and wrong password both collapse into
//! `CredencialesInvalidas`: the caller has no way to tell which field was
//! wrong.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::TiendaConfig;
use crate::application::token;
use crate::domain::entity::sesion::{Mensaje, Sesion};
use crate::domain::repository::{SesionRepository, UsuarioRepository};
use crate::error::{TiendaError, TiendaResult};

/// Sign in output
pub struct IniciarSesionOutput {
    /// Signed token for the session cookie
    pub token: String,
    pub sesion: Sesion,
}

/// Sign in use case
pub struct IniciarSesionUseCase<R>
where
    R: UsuarioRepository + SesionRepository,
{
    repo: Arc<R>,
    config: Arc<TiendaConfig>,
}

impl<R> IniciarSesionUseCase<R>
where
    R: UsuarioRepository + SesionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<TiendaConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        nombre: &str,
        contrasena: ClearTextPassword,
    ) -> TiendaResult<IniciarSesionOutput> {
        let usuario = self
            .repo
            .buscar_usuario_por_nombre(nombre)
            .await?
            .ok_or(TiendaError::CredencialesInvalidas)?;

        // A corrupt stored hash also reads as bad credentials; anything
        // more specific would reveal that the user exists.
        let hash = HashedPassword::from_phc_string(&usuario.contrasena_hash)
            .map_err(|_| TiendaError::CredencialesInvalidas)?;

        if !hash.verify(&contrasena) {
            return Err(TiendaError::CredencialesInvalidas);
        }

        let mut sesion = Sesion::autenticada(&usuario, self.config.session_ttl_chrono());
        sesion.agregar_mensaje(Mensaje::exito(format!("Bienvenido {}", usuario.nombre)));

        self.repo.crear_sesion(&sesion).await?;

        let token = token::firmar_token(sesion.id_sesion, &self.config.session_secret);

        tracing::info!(
            id_usuario = usuario.id_usuario,
            id_sesion = %sesion.id_sesion,
            "Usuario inició sesión"
        );

        Ok(IniciarSesionOutput { token, sesion })
    }
}
