//! Server-rendered HTML interface under `/clinica/`.
//!
//! Per record type (`{prefix}` from `EntityKind::prefix`):
//! - `GET  /clinica/{prefix}/`                  list (+ pending flash)
//! - `GET|POST /clinica/{prefix}/nuevo/`        create form
//! - `GET|POST /clinica/{prefix}/:id/editar/`   edit form
//! - `GET  /clinica/{prefix}/:id/eliminar/`     confirm page
//! - `POST /clinica/{prefix}/:id/eliminar/`     safe delete → 303 to list

pub mod flash;
pub mod forms;
pub mod handlers;
pub mod pages;

use std::sync::{Arc, Mutex};

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::core_state::{CoreError, CoreState};
use crate::db::repository::Table;
use crate::models::{
    Consultation, Enrollment, InsurancePlan, Medication, Patient, Physician, Prescription,
    Specialty, Treatment,
};
use flash::{Flash, FlashStore};

/// Shared context for the HTML routes.
#[derive(Clone)]
pub struct WebContext {
    pub core: Arc<CoreState>,
    pub flashes: Arc<Mutex<FlashStore>>,
}

impl WebContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self {
            core,
            flashes: Arc::new(Mutex::new(FlashStore::new())),
        }
    }

    pub fn issue_flash(&self, flash: Flash) -> Result<String, CoreError> {
        let mut store = self.flashes.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(store.issue(flash))
    }

    pub fn take_flash(&self, token: &str) -> Result<Option<Flash>, CoreError> {
        let mut store = self.flashes.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(store.take(token))
    }
}

/// Build the HTML router.
pub fn web_router(core: Arc<CoreState>) -> Router {
    let routes = Router::new()
        .route(pages::BASE, get(handlers::home))
        .route(&format!("{}/", pages::BASE), get(handlers::home));
    let routes = mount::<Patient>(routes);
    let routes = mount::<Physician>(routes);
    let routes = mount::<Specialty>(routes);
    let routes = mount::<Consultation>(routes);
    let routes = mount::<Treatment>(routes);
    let routes = mount::<Medication>(routes);
    let routes = mount::<Prescription>(routes);
    let routes = mount::<InsurancePlan>(routes);
    let routes = mount::<Enrollment>(routes);

    routes
        .with_state(WebContext::new(core))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}

fn mount<T: Table>(router: Router<WebContext>) -> Router<WebContext> {
    let base = pages::list_url(T::KIND);
    router
        .route(&base, get(handlers::list::<T>))
        .route(
            &format!("{base}nuevo/"),
            get(handlers::new_form::<T>).post(handlers::create::<T>),
        )
        .route(
            &format!("{base}:id/editar/"),
            get(handlers::edit_form::<T>).post(handlers::update::<T>),
        )
        .route(
            &format!("{base}:id/eliminar/"),
            get(handlers::confirm_delete::<T>).post(handlers::delete::<T>),
        )
}
