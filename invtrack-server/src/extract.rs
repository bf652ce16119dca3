//! Request extractors that reject with the API's JSON error body
//!
//! Plain `axum::Json` and `axum::extract::Query` answer malformed input with
//! a text/plain body. These wrappers route the rejection through `ApiError`
//! so every 4xx has the `{error, message}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
