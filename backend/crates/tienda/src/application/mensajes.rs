//! Flash Messages
//!
//! One-shot banners stored on the session row and drained into the next
//! rendered context. Persistence failures are logged and swallowed: a
//! lost banner must never take a page down with it.

use std::sync::Arc;

use crate::domain::entity::sesion::{Mensaje, Sesion};
use crate::domain::repository::SesionRepository;

/// Session-backed message queue
pub struct Mensajeria<R>
where
    R: SesionRepository,
{
    repo: Arc<R>,
}

impl<R> Mensajeria<R>
where
    R: SesionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Queue a banner for the next rendered page
    pub async fn publicar(&self, sesion: &mut Sesion, mensaje: Mensaje) {
        sesion.agregar_mensaje(mensaje);
        if let Err(e) = self.repo.actualizar_sesion(sesion).await {
            tracing::warn!(error = %e, id_sesion = %sesion.id_sesion, "No se pudo guardar el mensaje");
        }
    }

    /// Take all pending banners for the page being rendered
    pub async fn tomar(&self, sesion: &mut Sesion) -> Vec<Mensaje> {
        if sesion.mensajes.is_empty() {
            return Vec::new();
        }

        let mensajes = sesion.drenar_mensajes();
        if let Err(e) = self.repo.actualizar_sesion(sesion).await {
            tracing::warn!(error = %e, id_sesion = %sesion.id_sesion, "No se pudo vaciar la cola de mensajes");
        }
        mensajes
    }
}
