//! Photo Storage
//!
//! Writes uploaded product photos to a fixed directory and derives the
//! public `/static/<archivo>` path stored on the product row.
//!
//! The client-supplied filename is used verbatim: no sanitization and no
//! collision handling. See DESIGN.md for the security implications of
//! that choice.

use std::path::PathBuf;

/// Fixed-directory photo store
#[derive(Debug, Clone)]
pub struct AlmacenFotos {
    directorio: PathBuf,
}

impl AlmacenFotos {
    pub fn new(directorio: impl Into<PathBuf>) -> Self {
        Self {
            directorio: directorio.into(),
        }
    }

    pub fn directorio(&self) -> &PathBuf {
        &self.directorio
    }

    /// Write the uploaded bytes and return the public path
    ///
    /// An existing file with the same name is overwritten.
    pub async fn guardar(&self, nombre_archivo: &str, contenido: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.directorio).await?;

        let destino = self.directorio.join(nombre_archivo);
        tokio::fs::write(&destino, contenido).await?;

        Ok(format!("/static/{}", nombre_archivo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn directorio_temporal() -> PathBuf {
        std::env::temp_dir().join(format!("tienda-fotos-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_guardar_writes_file_and_returns_public_path() {
        let dir = directorio_temporal();
        let almacen = AlmacenFotos::new(&dir);

        let ruta = almacen.guardar("tornillo.png", b"png-bytes").await.unwrap();
        assert_eq!(ruta, "/static/tornillo.png");

        let contenido = tokio::fs::read(dir.join("tornillo.png")).await.unwrap();
        assert_eq!(contenido, b"png-bytes");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_guardar_overwrites_existing_name() {
        let dir = directorio_temporal();
        let almacen = AlmacenFotos::new(&dir);

        almacen.guardar("foto.png", b"v1").await.unwrap();
        almacen.guardar("foto.png", b"v2").await.unwrap();

        let contenido = tokio::fs::read(dir.join("foto.png")).await.unwrap();
        assert_eq!(contenido, b"v2");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
