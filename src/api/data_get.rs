#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Query, payload::Json, Object};
use serde_json::Value;

use crate::utils::params::ParamValue;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct GetDataApi;

#[derive(Object, Debug)]
pub struct RespHello
{
    /// The raw query value, or null when it wasn't sent.
    hello: Value,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetDataApi {
    #[oai(path = "/api/getdata", method = "get")]
    async fn get_data(&self, hello: Query<Option<String>>) -> Json<RespHello> {
        let hello = ParamValue::resolve(hello.0, None);
        Json(RespHello {hello: hello.to_json()})
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::api::test_client;

    #[tokio::test]
    async fn returns_raw_value() {
        let cli = test_client();
        let resp = cli.get("/api/getdata?hello=world").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"hello": "world"})).await;
    }

    #[tokio::test]
    async fn missing_value_is_null() {
        let cli = test_client();
        let resp = cli.get("/api/getdata").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"hello": null})).await;
    }
}
