//! View Contexts and Form DTOs
//!
//! The JSON contexts are what the external renderer consumes; their field
//! names are the template vocabulary (`nombre_usuario`, `search_query`,
//! `mensajes`, ...). Form field names match the HTML forms exactly.

use std::str::FromStr;

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::cliente::ClienteConTelefonos;
use crate::domain::entity::producto::Producto;
use crate::domain::entity::sesion::{Mensaje, Sesion};
use crate::error::{TiendaError, TiendaResult};

// ============================================================================
// Banners
// ============================================================================

/// Rendered banner
#[derive(Debug, Clone, Serialize)]
pub struct MensajeDto {
    pub nivel: &'static str,
    pub texto: String,
}

impl From<Mensaje> for MensajeDto {
    fn from(mensaje: Mensaje) -> Self {
        Self {
            nivel: mensaje.nivel.as_str(),
            texto: mensaje.texto,
        }
    }
}

pub fn a_dtos(mensajes: Vec<Mensaje>) -> Vec<MensajeDto> {
    mensajes.into_iter().map(MensajeDto::from).collect()
}

// ============================================================================
// Login
// ============================================================================

/// Login form (POST /login/)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login page context
#[derive(Debug, Clone, Serialize)]
pub struct LoginContext {
    pub mensajes: Vec<MensajeDto>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Dashboard context
#[derive(Debug, Clone, Serialize)]
pub struct DashboardContext {
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    pub total_clientes: i64,
    pub total_productos: i64,
    pub total_proveedores: i64,
    pub mensajes: Vec<MensajeDto>,
}

// ============================================================================
// Productos
// ============================================================================

/// Product row for listings and the edit form
#[derive(Debug, Clone, Serialize)]
pub struct ProductoDto {
    pub id_producto: i32,
    pub nombre: String,
    pub precio_venta: Decimal,
    pub cantidad: i32,
    pub stock_minimo: i32,
    pub ruta_foto: String,
    pub bajo_stock: bool,
}

impl From<Producto> for ProductoDto {
    fn from(producto: Producto) -> Self {
        let bajo_stock = producto.bajo_stock();
        Self {
            id_producto: producto.id_producto,
            nombre: producto.nombre,
            precio_venta: producto.precio_venta,
            cantidad: producto.cantidad,
            stock_minimo: producto.stock_minimo,
            ruta_foto: producto.ruta_foto,
            bajo_stock,
        }
    }
}

/// Product listing context
#[derive(Debug, Clone, Serialize)]
pub struct ProductosContext {
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    pub productos: Vec<ProductoDto>,
    /// Echoed back so the search box keeps its text
    pub search_query: String,
    pub mensajes: Vec<MensajeDto>,
}

/// Add-product form context. Carries no field values: a failed submit
/// renders the form blank again.
#[derive(Debug, Clone, Serialize)]
pub struct AgregarProductoContext {
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    pub mensajes: Vec<MensajeDto>,
}

impl AgregarProductoContext {
    pub fn nuevo(sesion: &Sesion, mensajes: Vec<Mensaje>) -> Self {
        Self {
            nombre_usuario: sesion.nombre_usuario.clone(),
            rol_usuario: sesion.rol_usuario.clone(),
            mensajes: a_dtos(mensajes),
        }
    }
}

/// Edit-product form context
#[derive(Debug, Clone, Serialize)]
pub struct EditarProductoContext {
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    pub producto: ProductoDto,
    pub mensajes: Vec<MensajeDto>,
}

// ============================================================================
// Clientes
// ============================================================================

/// Customer row with aggregated phones
#[derive(Debug, Clone, Serialize)]
pub struct ClienteDto {
    pub id_cliente: i32,
    pub nombre: String,
    pub apellido: String,
    /// Comma-joined; empty string when the customer has no phones
    pub telefonos: String,
}

impl From<ClienteConTelefonos> for ClienteDto {
    fn from(cliente: ClienteConTelefonos) -> Self {
        Self {
            id_cliente: cliente.id_cliente,
            nombre: cliente.nombre,
            apellido: cliente.apellido,
            telefonos: cliente.telefonos,
        }
    }
}

/// Customer listing context
#[derive(Debug, Clone, Serialize)]
pub struct ClientesContext {
    pub nombre_usuario: Option<String>,
    pub rol_usuario: Option<String>,
    pub clientes: Vec<ClienteDto>,
    pub search_query: String,
    pub mensajes: Vec<MensajeDto>,
}

// ============================================================================
// Query params
// ============================================================================

/// `?q=` search box parameter; absent means empty means "no filter"
#[derive(Debug, Deserialize)]
pub struct BusquedaParams {
    #[serde(default)]
    pub q: String,
}

// ============================================================================
// Product multipart form
// ============================================================================

/// Uploaded photo, held in memory until stored
pub struct FotoSubida {
    pub nombre_archivo: String,
    pub datos: Vec<u8>,
}

/// The add/edit product form, fields as posted
///
/// Numeric fields stay text until [`FormularioProducto::a_producto`]; the
/// form itself performs no validation beyond what parsing forces.
#[derive(Default)]
pub struct FormularioProducto {
    pub id_producto: String,
    pub nombre: String,
    pub precio_venta: String,
    pub cantidad: String,
    pub stock_minimo: String,
    /// Hidden field on the edit form with the stored photo path
    pub ruta_foto_actual: String,
    pub foto: Option<FotoSubida>,
}

impl FormularioProducto {
    /// Read the multipart body. Field names match the HTML form inputs.
    pub async fn leer(mut multipart: Multipart) -> TiendaResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| TiendaError::FormularioInvalido(e.to_string()))?
        {
            let nombre_campo = field.name().unwrap_or_default().to_string();
            match nombre_campo.as_str() {
                "Id_Producto" => form.id_producto = texto(field).await?,
                "Nombre" => form.nombre = texto(field).await?,
                "PrecioVenta" => form.precio_venta = texto(field).await?,
                "Cantidad" => form.cantidad = texto(field).await?,
                "StockMinimo" => form.stock_minimo = texto(field).await?,
                "rutaFotoActual" => form.ruta_foto_actual = texto(field).await?,
                "foto_del_producto" => {
                    let nombre_archivo = field.file_name().unwrap_or_default().to_string();
                    let datos = field
                        .bytes()
                        .await
                        .map_err(|e| TiendaError::FormularioInvalido(e.to_string()))?;
                    // a file input left empty still posts a nameless part
                    if !nombre_archivo.is_empty() && !datos.is_empty() {
                        form.foto = Some(FotoSubida {
                            nombre_archivo,
                            datos: datos.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The caller-supplied product id
    pub fn parsear_id(&self) -> TiendaResult<i32> {
        campo_i32("Id_Producto", &self.id_producto)
    }

    /// Assemble the product row with an already-resolved id and photo path
    pub fn a_producto(&self, id_producto: i32, ruta_foto: String) -> TiendaResult<Producto> {
        Ok(Producto {
            id_producto,
            nombre: self.nombre.clone(),
            precio_venta: Decimal::from_str(self.precio_venta.trim()).map_err(|_| {
                TiendaError::FormularioInvalido(format!("PrecioVenta: '{}'", self.precio_venta))
            })?,
            cantidad: campo_i32("Cantidad", &self.cantidad)?,
            stock_minimo: campo_i32("StockMinimo", &self.stock_minimo)?,
            ruta_foto,
        })
    }
}

fn campo_i32(nombre: &str, valor: &str) -> TiendaResult<i32> {
    valor
        .trim()
        .parse()
        .map_err(|_| TiendaError::FormularioInvalido(format!("{}: '{}'", nombre, valor)))
}

async fn texto(field: Field<'_>) -> TiendaResult<String> {
    field
        .text()
        .await
        .map_err(|e| TiendaError::FormularioInvalido(e.to_string()))
}
