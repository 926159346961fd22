#![forbid(unsafe_code)]

use log::debug;
use poem_openapi::{OpenApi, param::Path, payload::Json, Object};

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct NameStatusApi;

#[derive(Object, Debug)]
pub struct RespStatus
{
    status: i32,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl NameStatusApi {
    /// Acknowledge a name.  The router never matches an empty trailing
    /// segment, so `/api/getname/` is a 404 and this handler always sees a
    /// non-empty name.
    #[oai(path = "/api/getname/:nameed", method = "get")]
    async fn get_name_status(&self, nameed: Path<String>) -> Json<RespStatus> {
        debug!("Name status requested for '{}'.", nameed.0);
        Json(RespStatus {status: 1})
    }
}
