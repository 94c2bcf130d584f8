//! Auth Gate Middleware
//!
//! The login-check wrapper, applied as a layer around every protected
//! route. Handlers behind it can rely on [`SesionActiva`] being present
//! in the request extensions.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{Redirect, Response};

use crate::application::VerificarSesionUseCase;
use crate::domain::entity::sesion::Sesion;
use crate::domain::repository::TiendaRepository;
use crate::presentation::handlers::TiendaAppState;

/// The authenticated session, inserted by the gate for the wrapped handler
#[derive(Clone)]
pub struct SesionActiva(pub Sesion);

/// Middleware that requires a session with a user attached
///
/// Anything short of that - no cookie, bad signature, expired row, a
/// session whose user keys were cleared by logout - redirects to the
/// login page. The wrapped handler never executes.
pub async fn requiere_sesion<R>(
    State(state): State<TiendaAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Redirect>
where
    R: TiendaRepository,
{
    let token =
        platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name)
            .ok_or_else(|| Redirect::to("/login/"))?;

    let use_case = VerificarSesionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.obtener_autenticada(&token).await {
        Ok(sesion) => {
            req.extensions_mut().insert(SesionActiva(sesion));
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Solicitud sin sesión válida");
            Err(Redirect::to("/login/"))
        }
    }
}
