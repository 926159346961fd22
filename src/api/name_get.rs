#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Query, payload::Json};

use crate::api::responses::RespMessage;
use crate::utils::params::ParamValue;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct GetNameApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetNameApi {
    #[oai(path = "/api/getandreturnname", method = "get")]
    async fn get_and_return_name(&self, name: Query<Option<String>>) -> Json<RespMessage> {
        let name = ParamValue::resolve(name.0, None);
        Json(RespMessage::new(format!("hello {}", name)))
    }
}
