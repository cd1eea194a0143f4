use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for Data<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_payload_under_data() {
        let json = serde_json::to_value(Data::new("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "ok" }));
    }
}
