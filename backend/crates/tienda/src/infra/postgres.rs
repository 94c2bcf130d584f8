//! PostgreSQL Repository Implementation
//!
//! Every user-supplied value (search text, ids, form fields) is bound as
//! a statement parameter. None of the SQL below interpolates input into
//! statement text.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    cliente::ClienteConTelefonos,
    producto::Producto,
    sesion::{Mensaje, Sesion},
    usuario::Usuario,
};
use crate::domain::repository::{
    ClienteRepository, ConteoRepository, ProductoRepository, SesionRepository, UsuarioRepository,
};
use crate::error::TiendaResult;

/// PostgreSQL-backed store repository
#[derive(Clone)]
pub struct PgTiendaRepository {
    pool: PgPool,
}

impl PgTiendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Usuario Repository Implementation
// ============================================================================

impl UsuarioRepository for PgTiendaRepository {
    async fn buscar_usuario_por_nombre(&self, nombre: &str) -> TiendaResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id_usuario, nombre, rol, contrasena_hash
            FROM usuarios
            WHERE nombre = $1
            "#,
        )
        .bind(nombre)
        .fetch_optional(&self.pool)
        .await?;

        Ok(usuario)
    }
}

// ============================================================================
// Producto Repository Implementation
// ============================================================================

impl ProductoRepository for PgTiendaRepository {
    async fn buscar_productos(&self, filtro: Option<&str>) -> TiendaResult<Vec<Producto>> {
        // No ORDER BY: callers get storage order, same as the listing
        // page always has.
        let productos = match filtro {
            Some(texto) => {
                sqlx::query_as::<_, Producto>(
                    r#"
                    SELECT id_producto, nombre, precio_venta, cantidad, stock_minimo, ruta_foto
                    FROM productos
                    WHERE nombre LIKE $1
                    "#,
                )
                .bind(format!("%{}%", texto))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Producto>(
                    r#"
                    SELECT id_producto, nombre, precio_venta, cantidad, stock_minimo, ruta_foto
                    FROM productos
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(productos)
    }

    async fn obtener_producto(&self, id_producto: i32) -> TiendaResult<Option<Producto>> {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            SELECT id_producto, nombre, precio_venta, cantidad, stock_minimo, ruta_foto
            FROM productos
            WHERE id_producto = $1
            "#,
        )
        .bind(id_producto)
        .fetch_optional(&self.pool)
        .await?;

        Ok(producto)
    }

    async fn insertar_producto(&self, producto: &Producto) -> TiendaResult<()> {
        sqlx::query(
            r#"
            INSERT INTO productos (
                id_producto,
                nombre,
                precio_venta,
                cantidad,
                stock_minimo,
                ruta_foto
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(producto.id_producto)
        .bind(&producto.nombre)
        .bind(producto.precio_venta)
        .bind(producto.cantidad)
        .bind(producto.stock_minimo)
        .bind(&producto.ruta_foto)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn actualizar_producto(&self, producto: &Producto) -> TiendaResult<u64> {
        let rows = sqlx::query(
            r#"
            UPDATE productos SET
                nombre = $2,
                precio_venta = $3,
                cantidad = $4,
                stock_minimo = $5,
                ruta_foto = $6
            WHERE id_producto = $1
            "#,
        )
        .bind(producto.id_producto)
        .bind(&producto.nombre)
        .bind(producto.precio_venta)
        .bind(producto.cantidad)
        .bind(producto.stock_minimo)
        .bind(&producto.ruta_foto)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn eliminar_producto(&self, id_producto: i32) -> TiendaResult<u64> {
        let rows = sqlx::query("DELETE FROM productos WHERE id_producto = $1")
            .bind(id_producto)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows)
    }
}

// ============================================================================
// Cliente Repository Implementation
// ============================================================================

impl ClienteRepository for PgTiendaRepository {
    async fn buscar_clientes(&self, filtro: Option<&str>) -> TiendaResult<Vec<ClienteConTelefonos>> {
        // LEFT JOIN so a customer without phones still shows up once;
        // STRING_AGG over the empty set is NULL, hence the COALESCE.
        let clientes = match filtro {
            Some(texto) => {
                sqlx::query_as::<_, ClienteConTelefonos>(
                    r#"
                    SELECT
                        c.id_cliente,
                        c.nombre,
                        c.apellido,
                        COALESCE(
                            STRING_AGG(t.numero_telefono, ', ' ORDER BY t.numero_telefono),
                            ''
                        ) AS telefonos
                    FROM clientes c
                    LEFT JOIN cliente_telefonos t ON t.id_cliente = c.id_cliente
                    WHERE c.nombre LIKE $1 OR c.apellido LIKE $1
                    GROUP BY c.id_cliente, c.nombre, c.apellido
                    "#,
                )
                .bind(format!("%{}%", texto))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ClienteConTelefonos>(
                    r#"
                    SELECT
                        c.id_cliente,
                        c.nombre,
                        c.apellido,
                        COALESCE(
                            STRING_AGG(t.numero_telefono, ', ' ORDER BY t.numero_telefono),
                            ''
                        ) AS telefonos
                    FROM clientes c
                    LEFT JOIN cliente_telefonos t ON t.id_cliente = c.id_cliente
                    GROUP BY c.id_cliente, c.nombre, c.apellido
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(clientes)
    }
}

// ============================================================================
// Conteo Repository Implementation
// ============================================================================

impl ConteoRepository for PgTiendaRepository {
    async fn contar_clientes(&self) -> TiendaResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clientes")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn contar_productos(&self) -> TiendaResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn contar_proveedores(&self) -> TiendaResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM proveedores")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

// ============================================================================
// Sesion Repository Implementation
// ============================================================================

impl SesionRepository for PgTiendaRepository {
    async fn crear_sesion(&self, sesion: &Sesion) -> TiendaResult<()> {
        let mensajes = serde_json::to_string(&sesion.mensajes)?;

        sqlx::query(
            r#"
            INSERT INTO sesiones (
                id_sesion,
                id_usuario,
                nombre_usuario,
                rol_usuario,
                mensajes,
                expira_en_ms,
                creada_en
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(sesion.id_sesion)
        .bind(sesion.id_usuario)
        .bind(&sesion.nombre_usuario)
        .bind(&sesion.rol_usuario)
        .bind(mensajes)
        .bind(sesion.expira_en_ms)
        .bind(sesion.creada_en)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn obtener_sesion(&self, id_sesion: Uuid) -> TiendaResult<Option<Sesion>> {
        let row = sqlx::query_as::<_, SesionRow>(
            r#"
            SELECT
                id_sesion,
                id_usuario,
                nombre_usuario,
                rol_usuario,
                mensajes,
                expira_en_ms,
                creada_en
            FROM sesiones
            WHERE id_sesion = $1
            "#,
        )
        .bind(id_sesion)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_sesion()).transpose()
    }

    async fn actualizar_sesion(&self, sesion: &Sesion) -> TiendaResult<()> {
        let mensajes = serde_json::to_string(&sesion.mensajes)?;

        sqlx::query(
            r#"
            UPDATE sesiones SET
                id_usuario = $2,
                nombre_usuario = $3,
                rol_usuario = $4,
                mensajes = $5,
                expira_en_ms = $6
            WHERE id_sesion = $1
            "#,
        )
        .bind(sesion.id_sesion)
        .bind(sesion.id_usuario)
        .bind(&sesion.nombre_usuario)
        .bind(&sesion.rol_usuario)
        .bind(mensajes)
        .bind(sesion.expira_en_ms)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn eliminar_sesion(&self, id_sesion: Uuid) -> TiendaResult<()> {
        // Deleting an absent session is a no-op by design of DELETE
        sqlx::query("DELETE FROM sesiones WHERE id_sesion = $1")
            .bind(id_sesion)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn limpiar_sesiones_expiradas(&self) -> TiendaResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sesiones WHERE expira_en_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sesiones_eliminadas = deleted, "Sesiones expiradas eliminadas");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct SesionRow {
    id_sesion: Uuid,
    id_usuario: Option<i32>,
    nombre_usuario: Option<String>,
    rol_usuario: Option<String>,
    mensajes: String,
    expira_en_ms: i64,
    creada_en: DateTime<Utc>,
}

impl SesionRow {
    fn into_sesion(self) -> TiendaResult<Sesion> {
        let mensajes: Vec<Mensaje> = serde_json::from_str(&self.mensajes)?;

        Ok(Sesion {
            id_sesion: self.id_sesion,
            id_usuario: self.id_usuario,
            nombre_usuario: self.nombre_usuario,
            rol_usuario: self.rol_usuario,
            mensajes,
            expira_en_ms: self.expira_en_ms,
            creada_en: self.creada_en,
        })
    }
}
