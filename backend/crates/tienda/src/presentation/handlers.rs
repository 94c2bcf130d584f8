//! HTTP Handlers
//!
//! One handler per use case. Handlers build a JSON context (the input of
//! the external renderer) or redirect; either way every error path still
//! produces a response. Banners follow two rules: a redirect flashes them
//! onto the session, a directly rendered page carries them in its context.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::{SameSite, TiendaConfig};
use crate::application::{
    CerrarSesionUseCase, IniciarSesionUseCase, Mensajeria, VerificarSesionUseCase,
};
use crate::domain::entity::sesion::{Mensaje, Sesion};
use crate::domain::repository::TiendaRepository;
use crate::error::{TiendaError, TiendaResult};
use crate::infra::fotos::AlmacenFotos;
use crate::presentation::dto::{
    AgregarProductoContext, BusquedaParams, ClienteDto, ClientesContext, DashboardContext,
    EditarProductoContext, FormularioProducto, LoginContext, LoginForm, ProductoDto,
    ProductosContext, a_dtos,
};
use crate::presentation::middleware::SesionActiva;

/// Shared state for all handlers
#[derive(Clone)]
pub struct TiendaAppState<R>
where
    R: TiendaRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<TiendaConfig>,
    pub fotos: Arc<AlmacenFotos>,
}

// ============================================================================
// Login
// ============================================================================

/// GET /login/
pub async fn login_form<R>(
    State(state): State<TiendaAppState<R>>,
    headers: HeaderMap,
) -> Json<LoginContext>
where
    R: TiendaRepository,
{
    // An anonymous session may be carrying a banner (e.g. after logout)
    let mensajes = match sesion_desde_cookie(&state, &headers).await {
        Some(mut sesion) => Mensajeria::new(state.repo.clone()).tomar(&mut sesion).await,
        None => Vec::new(),
    };

    Json(LoginContext {
        mensajes: a_dtos(mensajes),
    })
}

/// POST /login/
pub async fn login<R>(
    State(state): State<TiendaAppState<R>>,
    Form(form): Form<LoginForm>,
) -> TiendaResult<Response>
where
    R: TiendaRepository,
{
    let use_case = IniciarSesionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case
        .execute(&form.username, ClearTextPassword::new(form.password))
        .await
    {
        Ok(salida) => {
            let cookie = construir_cookie_sesion(&state.config, &salida.token);
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
        }
        Err(TiendaError::CredencialesInvalidas) => {
            // Unknown user and wrong password render the exact same page
            let contexto = LoginContext {
                mensajes: a_dtos(vec![Mensaje::error(
                    TiendaError::CredencialesInvalidas.to_string(),
                )]),
            };
            Ok((StatusCode::UNAUTHORIZED, Json(contexto)).into_response())
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// GET/POST /logout/
pub async fn logout<R>(
    State(state): State<TiendaAppState<R>>,
    headers: HeaderMap,
) -> TiendaResult<Response>
where
    R: TiendaRepository,
{
    let token = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = CerrarSesionUseCase::new(state.repo.clone(), state.config.clone());
    let token = use_case.execute(token.as_deref()).await?;

    let cookie = construir_cookie_sesion(&state.config, &token);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login/")).into_response())
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /
pub async fn dashboard<R>(
    State(state): State<TiendaAppState<R>>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> Json<DashboardContext>
where
    R: TiendaRepository,
{
    // This is the one view that degrades silently: a failed count renders
    // zeros, never an error banner.
    let (total_clientes, total_productos, total_proveedores) =
        match contar_totales(state.repo.as_ref()).await {
            Ok(totales) => totales,
            Err(e) => {
                tracing::warn!(error = %e, "Error al contar los totales del dashboard");
                (0, 0, 0)
            }
        };

    let mensajes = Mensajeria::new(state.repo.clone()).tomar(&mut sesion).await;

    Json(DashboardContext {
        nombre_usuario: sesion.nombre_usuario.clone(),
        rol_usuario: sesion.rol_usuario.clone(),
        total_clientes,
        total_productos,
        total_proveedores,
        mensajes: a_dtos(mensajes),
    })
}

async fn contar_totales<R>(repo: &R) -> TiendaResult<(i64, i64, i64)>
where
    R: TiendaRepository,
{
    let clientes = repo.contar_clientes().await?;
    let productos = repo.contar_productos().await?;
    let proveedores = repo.contar_proveedores().await?;
    Ok((clientes, productos, proveedores))
}

// ============================================================================
// Productos: list / search
// ============================================================================

/// GET /productos/?q=
pub async fn productos_lista<R>(
    State(state): State<TiendaAppState<R>>,
    Query(params): Query<BusquedaParams>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> Json<ProductosContext>
where
    R: TiendaRepository,
{
    let mut mensajes = Mensajeria::new(state.repo.clone()).tomar(&mut sesion).await;

    let productos = match state.repo.buscar_productos(filtro_de(&params.q)).await {
        Ok(productos) => productos,
        Err(e) => {
            tracing::error!(error = %e, "Error al consultar productos");
            mensajes.push(Mensaje::error("No se pudieron consultar los productos."));
            Vec::new()
        }
    };

    Json(ProductosContext {
        nombre_usuario: sesion.nombre_usuario.clone(),
        rol_usuario: sesion.rol_usuario.clone(),
        productos: productos.into_iter().map(ProductoDto::from).collect(),
        search_query: params.q,
        mensajes: a_dtos(mensajes),
    })
}

// ============================================================================
// Productos: add
// ============================================================================

/// GET /productos/agregar/
pub async fn productos_agregar_form<R>(
    State(state): State<TiendaAppState<R>>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> Json<AgregarProductoContext>
where
    R: TiendaRepository,
{
    let mensajes = Mensajeria::new(state.repo.clone()).tomar(&mut sesion).await;
    Json(AgregarProductoContext::nuevo(&sesion, mensajes))
}

/// POST /productos/agregar/
pub async fn productos_agregar<R>(
    State(state): State<TiendaAppState<R>>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
    multipart: Multipart,
) -> TiendaResult<Response>
where
    R: TiendaRepository,
{
    let form = FormularioProducto::leer(multipart).await?;
    let mut banners: Vec<Mensaje> = Vec::new();

    // Photo first; a failed write leaves an empty path and the insert
    // still happens.
    let ruta_foto = guardar_foto(&state, &form, &mut banners).await;

    let producto = match form
        .parsear_id()
        .and_then(|id| form.a_producto(id, ruta_foto))
    {
        Ok(producto) => producto,
        Err(e) => {
            tracing::warn!(error = %e, "Formulario de producto inválido");
            banners.push(Mensaje::error("Error al agregar el producto."));
            return Ok(Json(AgregarProductoContext::nuevo(&sesion, banners)).into_response());
        }
    };

    match state.repo.insertar_producto(&producto).await {
        Ok(()) => {
            let mensajeria = Mensajeria::new(state.repo.clone());
            for banner in banners {
                mensajeria.publicar(&mut sesion, banner).await;
            }
            mensajeria
                .publicar(
                    &mut sesion,
                    Mensaje::exito(format!(
                        "¡Producto '{}' agregado con éxito!",
                        producto.nombre
                    )),
                )
                .await;
            Ok(Redirect::to("/productos/").into_response())
        }
        Err(e @ TiendaError::IdDuplicado) => {
            banners.push(Mensaje::error(e.to_string()));
            Ok(Json(AgregarProductoContext::nuevo(&sesion, banners)).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Error al agregar el producto");
            banners.push(Mensaje::error("Error al agregar el producto."));
            Ok(Json(AgregarProductoContext::nuevo(&sesion, banners)).into_response())
        }
    }
}

// ============================================================================
// Productos: edit
// ============================================================================

/// GET /productos/editar/{id}/
pub async fn productos_editar_form<R>(
    State(state): State<TiendaAppState<R>>,
    Path(id_producto): Path<i32>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> TiendaResult<Response>
where
    R: TiendaRepository,
{
    let mensajeria = Mensajeria::new(state.repo.clone());

    match state.repo.obtener_producto(id_producto).await {
        Ok(Some(producto)) => {
            let mensajes = mensajeria.tomar(&mut sesion).await;
            Ok(Json(EditarProductoContext {
                nombre_usuario: sesion.nombre_usuario.clone(),
                rol_usuario: sesion.rol_usuario.clone(),
                producto: ProductoDto::from(producto),
                mensajes: a_dtos(mensajes),
            })
            .into_response())
        }
        Ok(None) => {
            mensajeria
                .publicar(&mut sesion, Mensaje::error("Producto no encontrado."))
                .await;
            Ok(Redirect::to("/productos/").into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, id_producto, "Error al cargar el producto");
            mensajeria
                .publicar(&mut sesion, Mensaje::error("No se pudo cargar el producto."))
                .await;
            Ok(Redirect::to("/productos/").into_response())
        }
    }
}

/// POST /productos/editar/{id}/
pub async fn productos_editar<R>(
    State(state): State<TiendaAppState<R>>,
    Path(id_producto): Path<i32>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
    multipart: Multipart,
) -> TiendaResult<Response>
where
    R: TiendaRepository,
{
    let form = FormularioProducto::leer(multipart).await?;
    let mensajeria = Mensajeria::new(state.repo.clone());
    let mut banners: Vec<Mensaje> = Vec::new();

    // Without a new file the hidden field keeps the stored path
    let ruta_foto = if form.foto.is_some() {
        guardar_foto(&state, &form, &mut banners).await
    } else {
        form.ruta_foto_actual.clone()
    };

    // The id comes from the URL; it is not editable
    let producto = match form.a_producto(id_producto, ruta_foto) {
        Ok(producto) => producto,
        Err(e) => {
            tracing::warn!(error = %e, id_producto, "Formulario de edición inválido");
            flashear(&mensajeria, &mut sesion, banners).await;
            mensajeria
                .publicar(
                    &mut sesion,
                    Mensaje::error("Error al actualizar el producto."),
                )
                .await;
            return Ok(redirigir_a_editar(id_producto));
        }
    };

    match state.repo.actualizar_producto(&producto).await {
        Ok(0) => {
            flashear(&mensajeria, &mut sesion, banners).await;
            mensajeria
                .publicar(&mut sesion, Mensaje::advertencia("Producto no encontrado."))
                .await;
            Ok(Redirect::to("/productos/").into_response())
        }
        Ok(_) => {
            flashear(&mensajeria, &mut sesion, banners).await;
            mensajeria
                .publicar(
                    &mut sesion,
                    Mensaje::exito(format!(
                        "¡Producto '{}' actualizado con éxito!",
                        producto.nombre
                    )),
                )
                .await;
            Ok(Redirect::to("/productos/").into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, id_producto, "Error al actualizar el producto");
            flashear(&mensajeria, &mut sesion, banners).await;
            mensajeria
                .publicar(
                    &mut sesion,
                    Mensaje::error("Error al actualizar el producto."),
                )
                .await;
            Ok(redirigir_a_editar(id_producto))
        }
    }
}

// ============================================================================
// Productos: delete
// ============================================================================

/// GET /productos/eliminar/{id}/
///
/// A single irreversible navigation, no confirmation step.
pub async fn productos_eliminar<R>(
    State(state): State<TiendaAppState<R>>,
    Path(id_producto): Path<i32>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> Response
where
    R: TiendaRepository,
{
    let banner = match state.repo.eliminar_producto(id_producto).await {
        // rows_affected == 0 is "not found", a warning rather than a fault
        Ok(0) => Mensaje::advertencia("Producto no encontrado."),
        Ok(_) => Mensaje::exito("Producto eliminado."),
        Err(e @ TiendaError::ReferenciadoPorFactura) => Mensaje::error(e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, id_producto, "Error al eliminar el producto");
            Mensaje::error("Error al eliminar el producto.")
        }
    };

    Mensajeria::new(state.repo.clone())
        .publicar(&mut sesion, banner)
        .await;

    Redirect::to("/productos/").into_response()
}

// ============================================================================
// Clientes: list / search
// ============================================================================

/// GET /clientes/?q=
pub async fn clientes_lista<R>(
    State(state): State<TiendaAppState<R>>,
    Query(params): Query<BusquedaParams>,
    Extension(SesionActiva(mut sesion)): Extension<SesionActiva>,
) -> Json<ClientesContext>
where
    R: TiendaRepository,
{
    let mut mensajes = Mensajeria::new(state.repo.clone()).tomar(&mut sesion).await;

    let clientes = match state.repo.buscar_clientes(filtro_de(&params.q)).await {
        Ok(clientes) => clientes,
        Err(e) => {
            tracing::error!(error = %e, "Error al consultar clientes");
            mensajes.push(Mensaje::error("No se pudieron consultar los clientes."));
            Vec::new()
        }
    };

    Json(ClientesContext {
        nombre_usuario: sesion.nombre_usuario.clone(),
        rol_usuario: sesion.rol_usuario.clone(),
        clientes: clientes.into_iter().map(ClienteDto::from).collect(),
        search_query: params.q,
        mensajes: a_dtos(mensajes),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Empty search text means "no filter"
fn filtro_de(q: &str) -> Option<&str> {
    if q.is_empty() { None } else { Some(q) }
}

async fn sesion_desde_cookie<R>(
    state: &TiendaAppState<R>,
    headers: &HeaderMap,
) -> Option<Sesion>
where
    R: TiendaRepository,
{
    let token = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name)?;
    let use_case = VerificarSesionUseCase::new(state.repo.clone(), state.config.clone());
    use_case.obtener(&token).await.ok()
}

/// Store the uploaded photo if one was posted. A write failure queues a
/// banner and falls back to an empty path; it never aborts the operation.
async fn guardar_foto<R>(
    state: &TiendaAppState<R>,
    form: &FormularioProducto,
    banners: &mut Vec<Mensaje>,
) -> String
where
    R: TiendaRepository,
{
    let Some(foto) = &form.foto else {
        return String::new();
    };

    match state.fotos.guardar(&foto.nombre_archivo, &foto.datos).await {
        Ok(ruta) => ruta,
        Err(e) => {
            tracing::error!(error = %e, archivo = %foto.nombre_archivo, "Error al guardar la imagen");
            banners.push(Mensaje::error("Error al guardar la imagen."));
            String::new()
        }
    }
}

async fn flashear<R>(mensajeria: &Mensajeria<R>, sesion: &mut Sesion, banners: Vec<Mensaje>)
where
    R: TiendaRepository,
{
    for banner in banners {
        mensajeria.publicar(sesion, banner).await;
    }
}

fn redirigir_a_editar(id_producto: i32) -> Response {
    Redirect::to(&format!("/productos/editar/{}/", id_producto)).into_response()
}

fn construir_cookie_sesion(config: &TiendaConfig, token: &str) -> String {
    let mut parts = vec![
        format!("{}={}", config.session_cookie_name, token),
        "HttpOnly".to_string(),
        "Path=/".to_string(),
        format!("Max-Age={}", config.session_ttl.as_secs()),
    ];

    if config.cookie_secure {
        parts.push("Secure".to_string());
    }

    match config.cookie_same_site {
        SameSite::Strict => parts.push("SameSite=Strict".to_string()),
        SameSite::Lax => parts.push("SameSite=Lax".to_string()),
        SameSite::None => parts.push("SameSite=None".to_string()),
    }

    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtro_de() {
        assert_eq!(filtro_de(""), None);
        assert_eq!(filtro_de("Tornillo"), Some("Tornillo"));
    }

    #[test]
    fn test_construir_cookie_sesion() {
        let config = TiendaConfig {
            cookie_secure: true,
            ..TiendaConfig::default()
        };
        let cookie = construir_cookie_sesion(&config, "abc.def");

        assert!(cookie.starts_with("sesion_tienda=abc.def"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=43200"));
    }

    #[test]
    fn test_cookie_insecure_for_development() {
        let cookie = construir_cookie_sesion(&TiendaConfig::development(), "t");
        assert!(!cookie.contains("Secure"));
    }
}
