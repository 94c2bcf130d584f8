//! Tienda Router
//!
//! The HTTP surface. Everything except login and logout sits behind the
//! auth gate.

use axum::{
    Router, middleware,
    routing::get,
};
use std::sync::Arc;

use crate::application::config::TiendaConfig;
use crate::domain::repository::TiendaRepository;
use crate::infra::fotos::AlmacenFotos;
use crate::infra::postgres::PgTiendaRepository;
use crate::presentation::handlers::{self, TiendaAppState};
use crate::presentation::middleware::requiere_sesion;

/// Create the router with the PostgreSQL repository
pub fn tienda_router(
    repo: PgTiendaRepository,
    config: TiendaConfig,
    fotos: AlmacenFotos,
) -> Router {
    tienda_router_generic(repo, config, fotos)
}

/// Create a generic router for any repository implementation
pub fn tienda_router_generic<R>(repo: R, config: TiendaConfig, fotos: AlmacenFotos) -> Router
where
    R: TiendaRepository,
{
    let state = TiendaAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        fotos: Arc::new(fotos),
    };

    let protegidas = Router::new()
        .route("/", get(handlers::dashboard::<R>))
        .route("/productos/", get(handlers::productos_lista::<R>))
        .route(
            "/productos/agregar/",
            get(handlers::productos_agregar_form::<R>).post(handlers::productos_agregar::<R>),
        )
        .route(
            "/productos/editar/{id}/",
            get(handlers::productos_editar_form::<R>).post(handlers::productos_editar::<R>),
        )
        .route(
            "/productos/eliminar/{id}/",
            get(handlers::productos_eliminar::<R>),
        )
        .route("/clientes/", get(handlers::clientes_lista::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            requiere_sesion::<R>,
        ));

    Router::new()
        .route(
            "/login/",
            get(handlers::login_form::<R>).post(handlers::login::<R>),
        )
        .route(
            "/logout/",
            get(handlers::logout::<R>).post(handlers::logout::<R>),
        )
        .merge(protegidas)
        .with_state(state)
}
