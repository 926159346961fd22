#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, payload::Json};

use crate::api::responses::RespMessage;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct FinacleHelloApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FinacleHelloApi {
    #[oai(path = "/api/finacle", method = "get")]
    async fn hello_from_finacle(&self) -> Json<RespMessage> {
        Json(RespMessage::new("hello from finacle"))
    }
}
