#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Query, payload::Json, ApiResponse};

use crate::api::responses::RespMessage;
use crate::utils::errors::HttpError;
use crate::utils::params::ParamValue;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct RequestNameApi;

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum AppResponse {
    #[oai(status = 200)]
    Http200(Json<RespMessage>),
    #[oai(status = 400)]
    Http400(Json<HttpError>),
}

fn make_http_200(resp: RespMessage) -> AppResponse {
    AppResponse::Http200(Json(resp))
}
fn make_http_400(msg: &str) -> AppResponse {
    AppResponse::Http400(Json(HttpError::new(msg)))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl RequestNameApi {
    /// Like /api/getandreturnname, but a missing or empty name is an error.
    #[oai(path = "/api/requestname", method = "get")]
    async fn request_name(&self, name: Query<Option<String>>) -> AppResponse {
        let name = ParamValue::resolve(name.0, None);
        match name.non_empty() {
            Some(n) => make_http_200(RespMessage::new(format!("hello {}", n))),
            None => make_http_400("name is required"),
        }
    }
}
