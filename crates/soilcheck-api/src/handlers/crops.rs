use axum::Json;

use crate::dto::CropsResponse;

pub async fn list_crops() -> Json<CropsResponse> {
    Json(CropsResponse::catalog())
}
