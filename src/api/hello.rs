#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Query, payload::Json, Object};

use crate::utils::params::ParamValue;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct HelloApi;

#[derive(Object, Debug)]
pub struct RespReturnName
{
    #[oai(rename = "return name")]
    return_name: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl HelloApi {
    /// Greets `name1`.  A missing name is rendered as `None`.
    #[oai(path = "/api/hello", method = "get")]
    async fn hello(&self, name1: Query<Option<String>>) -> Json<RespReturnName> {
        let name1 = ParamValue::resolve(name1.0, None);
        Json(RespReturnName {return_name: format!("hello {}", name1)})
    }
}
