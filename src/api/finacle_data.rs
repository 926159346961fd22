#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Query, payload::Json};

use crate::api::responses::RespMessage;
use crate::utils::params::ParamValue;

// Company reported when the caller doesn't name one.
const DEFAULT_COMPANY: &str = "infosys private limited";

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct FinacleDataApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl FinacleDataApi {
    #[oai(path = "/api/getdatafromfinacle", method = "get")]
    async fn get_finacle_data(&self, finalename: Query<Option<String>>) -> Json<RespMessage> {
        let company = ParamValue::resolve(finalename.0, Some(DEFAULT_COMPANY));
        Json(RespMessage::new(format!("gotten data from finacle {}", company)))
    }
}
