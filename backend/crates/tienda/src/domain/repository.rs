//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in the
//! infrastructure layer. Every method takes already-typed values; the
//! implementations bind them as SQL parameters, never splice them into
//! statement text.

use uuid::Uuid;

use crate::domain::entity::{
    cliente::ClienteConTelefonos, producto::Producto, sesion::Sesion, usuario::Usuario,
};
use crate::error::TiendaResult;

/// Staff user lookup (read-only; accounts are seeded externally)
#[trait_variant::make(UsuarioRepository: Send)]
pub trait LocalUsuarioRepository {
    /// Find a user by login name
    async fn buscar_usuario_por_nombre(&self, nombre: &str) -> TiendaResult<Option<Usuario>>;
}

/// Product CRUD
#[trait_variant::make(ProductoRepository: Send)]
pub trait LocalProductoRepository {
    /// List products; a filter matches `nombre` as a substring.
    /// Row order is storage order - callers must not assume one.
    async fn buscar_productos(&self, filtro: Option<&str>) -> TiendaResult<Vec<Producto>>;

    /// Fetch a single product
    async fn obtener_producto(&self, id_producto: i32) -> TiendaResult<Option<Producto>>;

    /// Insert with the caller-supplied id; a duplicate id is an
    /// `IdDuplicado` error
    async fn insertar_producto(&self, producto: &Producto) -> TiendaResult<()>;

    /// Full-row overwrite of the mutable fields; returns rows affected
    /// (0 = target vanished)
    async fn actualizar_producto(&self, producto: &Producto) -> TiendaResult<u64>;

    /// Delete; 0 rows affected means "not found" and is not an error.
    /// A product referenced from an invoice fails with
    /// `ReferenciadoPorFactura`.
    async fn eliminar_producto(&self, id_producto: i32) -> TiendaResult<u64>;
}

/// Customer listing with phone aggregation
#[trait_variant::make(ClienteRepository: Send)]
pub trait LocalClienteRepository {
    /// List customers; a filter matches `nombre` OR `apellido` as a
    /// substring. Phones come back comma-joined; zero phones yield an
    /// empty string.
    async fn buscar_clientes(&self, filtro: Option<&str>) -> TiendaResult<Vec<ClienteConTelefonos>>;
}

/// Dashboard counters
#[trait_variant::make(ConteoRepository: Send)]
pub trait LocalConteoRepository {
    async fn contar_clientes(&self) -> TiendaResult<i64>;
    async fn contar_productos(&self) -> TiendaResult<i64>;
    async fn contar_proveedores(&self) -> TiendaResult<i64>;
}

/// Session persistence
#[trait_variant::make(SesionRepository: Send)]
pub trait LocalSesionRepository {
    async fn crear_sesion(&self, sesion: &Sesion) -> TiendaResult<()>;

    async fn obtener_sesion(&self, id_sesion: Uuid) -> TiendaResult<Option<Sesion>>;

    /// Full overwrite (user keys and message queue included)
    async fn actualizar_sesion(&self, sesion: &Sesion) -> TiendaResult<()>;

    /// Idempotent: deleting an absent session is not an error
    async fn eliminar_sesion(&self, id_sesion: Uuid) -> TiendaResult<()>;

    /// Startup cleanup; returns the number of rows removed
    async fn limpiar_sesiones_expiradas(&self) -> TiendaResult<u64>;
}

/// Everything the handlers need, as one bound
pub trait TiendaRepository:
    UsuarioRepository
    + ProductoRepository
    + ClienteRepository
    + ConteoRepository
    + SesionRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> TiendaRepository for T where
    T: UsuarioRepository
        + ProductoRepository
        + ClienteRepository
        + ConteoRepository
        + SesionRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
