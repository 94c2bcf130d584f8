//! Sesion Entity
//!
//! A server-side session row, referenced from the browser by a signed
//! cookie token. The three user keys are nullable: a session exists before
//! login (to carry flash messages) and survives logout with the keys
//! cleared.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::usuario::Usuario;

/// Flash message severity, mirrored into rendered contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NivelMensaje {
    Exito,
    Info,
    Advertencia,
    Error,
}

impl NivelMensaje {
    pub fn as_str(&self) -> &'static str {
        match self {
            NivelMensaje::Exito => "exito",
            NivelMensaje::Info => "info",
            NivelMensaje::Advertencia => "advertencia",
            NivelMensaje::Error => "error",
        }
    }
}

/// One-shot banner queued on the session and drained into the next view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mensaje {
    pub nivel: NivelMensaje,
    pub texto: String,
}

impl Mensaje {
    pub fn exito(texto: impl Into<String>) -> Self {
        Self {
            nivel: NivelMensaje::Exito,
            texto: texto.into(),
        }
    }

    pub fn info(texto: impl Into<String>) -> Self {
        Self {
            nivel: NivelMensaje::Info,
            texto: texto.into(),
        }
    }

    pub fn advertencia(texto: impl Into<String>) -> Self {
        Self {
            nivel: NivelMensaje::Advertencia,
            texto: texto.into(),
        }
    }

    pub fn error(texto: impl Into<String>) -> Self {
        Self {
            nivel: NivelMensaje::Error,
            texto: texto.into(),
        }
    }
}

/// Session entity
#[derive(Debug, Clone, PartialEq)]
pub struct Sesion {
    /// Session ID (UUID v4); the cookie token is this id plus an HMAC tag
    pub id_sesion: Uuid,
    pub id_usuario: Option<i32>,
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    /// Pending flash messages, oldest first
    pub mensajes: Vec<Mensaje>,
    /// Expiration (Unix timestamp ms)
    pub expira_en_ms: i64,
    pub creada_en: DateTime<Utc>,
}

impl Sesion {
    /// Session with no user attached (pre-login, or carrying a banner)
    pub fn anonima(ttl: Duration) -> Self {
        let ahora = Utc::now();
        Self {
            id_sesion: Uuid::new_v4(),
            id_usuario: None,
            nombre_usuario: None,
            rol_usuario: None,
            mensajes: Vec::new(),
            expira_en_ms: (ahora + ttl).timestamp_millis(),
            creada_en: ahora,
        }
    }

    /// Fresh session for a user that just authenticated
    pub fn autenticada(usuario: &Usuario, ttl: Duration) -> Self {
        let mut sesion = Self::anonima(ttl);
        sesion.id_usuario = Some(usuario.id_usuario);
        sesion.nombre_usuario = Some(usuario.nombre.clone());
        sesion.rol_usuario = Some(usuario.rol.clone());
        sesion
    }

    /// A gated request requires a session with a user attached
    pub fn tiene_usuario(&self) -> bool {
        self.id_usuario.is_some()
    }

    pub fn esta_expirada(&self) -> bool {
        Utc::now().timestamp_millis() > self.expira_en_ms
    }

    /// Clear the three user keys; clearing an already-clear session is fine
    pub fn cerrar(&mut self) {
        self.id_usuario = None;
        self.nombre_usuario = None;
        self.rol_usuario = None;
    }

    pub fn agregar_mensaje(&mut self, mensaje: Mensaje) {
        self.mensajes.push(mensaje);
    }

    /// Take all pending messages, leaving the queue empty
    pub fn drenar_mensajes(&mut self) -> Vec<Mensaje> {
        std::mem::take(&mut self.mensajes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario() -> Usuario {
        Usuario {
            id_usuario: 7,
            nombre: "ana".to_string(),
            rol: "admin".to_string(),
            contrasena_hash: "$argon2id$...".to_string(),
        }
    }

    #[test]
    fn test_autenticada_carries_user_keys() {
        let sesion = Sesion::autenticada(&usuario(), Duration::hours(12));
        assert_eq!(sesion.id_usuario, Some(7));
        assert_eq!(sesion.nombre_usuario.as_deref(), Some("ana"));
        assert_eq!(sesion.rol_usuario.as_deref(), Some("admin"));
        assert!(sesion.tiene_usuario());
        assert!(!sesion.esta_expirada());
    }

    #[test]
    fn test_cerrar_is_idempotent() {
        let mut sesion = Sesion::autenticada(&usuario(), Duration::hours(12));
        sesion.cerrar();
        assert!(!sesion.tiene_usuario());
        assert!(sesion.nombre_usuario.is_none());
        assert!(sesion.rol_usuario.is_none());

        // second close on an already-anonymous session
        sesion.cerrar();
        assert!(!sesion.tiene_usuario());
    }

    #[test]
    fn test_expiry() {
        let sesion = Sesion::anonima(Duration::milliseconds(-1));
        assert!(sesion.esta_expirada());
    }

    #[test]
    fn test_drenar_mensajes_empties_queue() {
        let mut sesion = Sesion::anonima(Duration::hours(1));
        sesion.agregar_mensaje(Mensaje::exito("uno"));
        sesion.agregar_mensaje(Mensaje::error("dos"));

        let drenados = sesion.drenar_mensajes();
        assert_eq!(drenados.len(), 2);
        assert_eq!(drenados[0].texto, "uno");
        assert_eq!(drenados[0].nivel, NivelMensaje::Exito);
        assert!(sesion.mensajes.is_empty());
        assert!(sesion.drenar_mensajes().is_empty());
    }
}
