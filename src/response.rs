//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize, ToSchema)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize, ToSchema)]
pub struct MetaCount {
    pub count: u64,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::CREATED, Json(SuccessOne { data }))
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data }))
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaCount { count },
        }),
    )
}
