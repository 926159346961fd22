#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{OpenApi, payload::Json, Object};
use serde_json::Value;

use crate::utils::app_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct PostDataApi;

#[derive(Object, Debug)]
pub struct RespData
{
    data: Value,
}

// Implement the debug record trait for logging.
impl RequestDebug for Value {
    fn get_request_info(&self) -> String {
        format!("  Request body: {}", self)
    }
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl PostDataApi {
    /// Echo any JSON document back under `data`.  Bodies that don't parse as
    /// JSON are rejected by the framework with 400.
    #[oai(path = "/api/getpostdata", method = "post")]
    async fn get_post_data(&self, http_req: &Request, body: Json<Value>) -> Json<RespData> {
        app_utils::debug_request(http_req, &body.0);
        Json(RespData {data: body.0})
    }
}
