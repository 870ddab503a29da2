//! CRUD endpoints, one generic set mounted once per record type.
//!
//! - `GET    /api/{prefix}`                   list
//! - `POST   /api/{prefix}`                   create → 201
//! - `GET    /api/{prefix}/:id`               retrieve
//! - `PUT    /api/{prefix}/:id`               full replacement
//! - `PATCH  /api/{prefix}/:id`               partial replacement
//! - `DELETE /api/{prefix}/:id`               safe delete → 204 / 409
//! - `GET    /api/{prefix}/:id/delete-check`  advisory check

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::{self, Table};
use crate::integrity::DeleteCheck;
use crate::models::Record;

type IdPath = Result<Path<i64>, PathRejection>;

pub async fn list<T: Table>(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<Record<T>>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::list::<T>(&conn)?))
}

pub async fn create<T: Table>(
    State(ctx): State<ApiContext>,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<(StatusCode, Json<Record<T>>), ApiError> {
    let Json(fields) = payload?;
    let conn = ctx.core.open_db()?;
    let record = repository::insert(&conn, &fields)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn retrieve<T: Table>(
    State(ctx): State<ApiContext>,
    id: IdPath,
) -> Result<Json<Record<T>>, ApiError> {
    let Path(id) = id?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::require::<T>(&conn, id)?))
}

pub async fn update<T: Table>(
    State(ctx): State<ApiContext>,
    id: IdPath,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<Json<Record<T>>, ApiError> {
    let Path(id) = id?;
    let Json(fields) = payload?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::update(&conn, id, &fields)?))
}

pub async fn partial_update<T: Table>(
    State(ctx): State<ApiContext>,
    id: IdPath,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Record<T>>, ApiError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::patch::<T>(&conn, id, &changes)?))
}

pub async fn destroy<T: Table>(
    State(ctx): State<ApiContext>,
    id: IdPath,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let mut conn = ctx.core.open_db()?;
    ctx.core.deletion_policy().delete(&mut conn, T::KIND, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_check<T: Table>(
    State(ctx): State<ApiContext>,
    id: IdPath,
) -> Result<Json<DeleteCheck>, ApiError> {
    let Path(id) = id?;
    let conn = ctx.core.open_db()?;
    Ok(Json(ctx.core.deletion_policy().check(&conn, T::KIND, id)?))
}
