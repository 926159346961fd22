#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, payload::Json};

use crate::api::responses::RespMessage;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct HomeApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl HomeApi {
    #[oai(path = "/", method = "get")]
    async fn home(&self) -> Json<RespMessage> {
        Json(RespMessage::new("Hello world"))
    }
}
