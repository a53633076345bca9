//! JSON body extractor whose rejections use the API error envelope.

use crate::error::AppError;
use axum::extract::FromRequest;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);
