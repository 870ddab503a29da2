//! REST API router.
//!
//! Returns a composable `Router` with every resource under `/api/`.
//! Each record type gets the same generic handler set, mounted at its
//! URL prefix (`EntityKind::prefix`).

use std::sync::Arc;

use axum::routing::{get, MethodRouter};
use axum::Router;

use crate::api::endpoints::{self, resources};
use crate::api::types::ApiContext;
use crate::core_state::CoreState;
use crate::db::repository::Table;
use crate::models::{
    Consultation, Enrollment, InsurancePlan, Medication, Patient, Physician, Prescription,
    Specialty, Treatment,
};

/// Build the REST API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new().route("/health", get(endpoints::health::check));
    let routes = mount::<Patient>(routes);
    let routes = mount::<Physician>(routes);
    let routes = mount::<Specialty>(routes);
    let routes = mount::<Consultation>(routes);
    let routes = mount::<Treatment>(routes);
    let routes = mount::<Medication>(routes);
    let routes = mount::<Prescription>(routes);
    let routes = mount::<InsurancePlan>(routes);
    let routes = mount::<Enrollment>(routes);

    Router::new().nest("/api", routes.with_state(ctx))
}

/// Mount the handler set for `T`, with and without the trailing slash.
fn mount<T: Table>(router: Router<ApiContext>) -> Router<ApiContext> {
    let base = format!("/{}", T::KIND.prefix());
    let collection = || -> MethodRouter<ApiContext> {
        get(resources::list::<T>).post(resources::create::<T>)
    };
    let member = || -> MethodRouter<ApiContext> {
        get(resources::retrieve::<T>)
            .put(resources::update::<T>)
            .patch(resources::partial_update::<T>)
            .delete(resources::destroy::<T>)
    };
    let delete_check = || -> MethodRouter<ApiContext> { get(resources::delete_check::<T>) };

    router
        .route(&base, collection())
        .route(&format!("{base}/"), collection())
        .route(&format!("{base}/:id"), member())
        .route(&format!("{base}/:id/"), member())
        .route(&format!("{base}/:id/delete-check"), delete_check())
        .route(&format!("{base}/:id/delete-check/"), delete_check())
}
