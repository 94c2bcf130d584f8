//! Session Token Signing
//!
//! The browser-facing token is `"{session_id}.{signature}"` where the
//! signature is HMAC-SHA256 over the session id, base64url without
//! padding. The id alone is never accepted: a token that fails
//! verification is indistinguishable from a missing session.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{TiendaError, TiendaResult};

type HmacSha256 = Hmac<Sha256>;

/// Generate a signed session token
pub fn firmar_token(id_sesion: Uuid, secret: &[u8; 32]) -> String {
    let id = id_sesion.to_string();

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        id,
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Parse and verify a session token
pub fn verificar_token(token: &str, secret: &[u8; 32]) -> TiendaResult<Uuid> {
    let Some((id_str, signature_b64)) = token.split_once('.') else {
        return Err(TiendaError::SesionInvalida);
    };

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(id_str.as_bytes());

    let signature = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TiendaError::SesionInvalida)?;

    mac.verify_slice(&signature)
        .map_err(|_| TiendaError::SesionInvalida)?;

    id_str.parse().map_err(|_| TiendaError::SesionInvalida)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_roundtrip() {
        let id = Uuid::new_v4();
        let token = firmar_token(id, &SECRET);
        assert_eq!(verificar_token(&token, &SECRET).unwrap(), id);
    }

    #[test]
    fn test_tampered_id_rejected() {
        let token = firmar_token(Uuid::new_v4(), &SECRET);
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", Uuid::new_v4(), sig);
        assert!(verificar_token(&forged, &SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = firmar_token(Uuid::new_v4(), &SECRET);
        let otra: [u8; 32] = [8u8; 32];
        assert!(verificar_token(&token, &otra).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verificar_token("", &SECRET).is_err());
        assert!(verificar_token("no-dot-here", &SECRET).is_err());
        assert!(verificar_token("a.b.c", &SECRET).is_err());
        assert!(verificar_token("id-only.", &SECRET).is_err());
    }
}
