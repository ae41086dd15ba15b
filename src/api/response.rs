use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Success envelope shared by every REST endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = Value> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            results: None,
            data,
        })
    }

    pub fn list(results: usize, data: T) -> Json<Self> {
        Json(Self {
            status: "success",
            results: Some(results),
            data,
        })
    }
}
