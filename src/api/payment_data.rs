#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, payload::Json, Object};

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct PaymentDataApi;

#[derive(Object, Debug)]
pub struct RespReturn
{
    #[oai(rename = "return")]
    return_value: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl PaymentDataApi {
    #[oai(path = "/api/getpaymentdata", method = "get")]
    async fn get_payment_data(&self) -> Json<RespReturn> {
        Json(RespReturn {return_value: "world".to_string()})
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
    async fn ignores_input() {
        let cli = test_client();
        let resp = cli.get("/api/getpaymentdata?amount=100").send().await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"return": "world"})).await;
    }
}
