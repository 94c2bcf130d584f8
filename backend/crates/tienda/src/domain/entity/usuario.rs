//! Usuario Entity
//!
//! Staff accounts. Seeded externally; this system only reads them to
//! authenticate.

use std::fmt;

/// Staff user record
#[derive(Clone, PartialEq, sqlx::FromRow)]
pub struct Usuario {
    pub id_usuario: i32,
    /// Login key, unique
    pub nombre: String,
    /// Free-form role label ("admin", "vendedor", ...)
    pub rol: String,
    /// Argon2id PHC string
    pub contrasena_hash: String,
}

impl fmt::Debug for Usuario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Usuario")
            .field("id_usuario", &self.id_usuario)
            .field("nombre", &self.nombre)
            .field("rol", &self.rol)
            .field("contrasena_hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_no_hash_leak() {
        let usuario = Usuario {
            id_usuario: 1,
            nombre: "ana".to_string(),
            rol: "admin".to_string(),
            contrasena_hash: "$argon2id$v=19$secret".to_string(),
        };
        let debug = format!("{:?}", usuario);
        assert!(!debug.contains("argon2id"));
        assert!(debug.contains("[HASH]"));
    }
}
