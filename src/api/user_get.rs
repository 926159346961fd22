#![forbid(unsafe_code)]

use poem_openapi::{OpenApi, param::Path, payload::Json};

use crate::api::responses::RespUser;

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
pub struct GetUserApi;

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl GetUserApi {
    #[oai(path = "/api/user/:username", method = "get")]
    async fn get_user(&self, username: Path<String>) -> Json<RespUser> {
        Json(RespUser::new(username.0))
    }

    // Older clients still call this path.
    #[oai(path = "/api/getuser/:username", method = "get")]
    async fn get_user_by_name(&self, username: Path<String>) -> Json<RespUser> {
        Json(RespUser::new(username.0))
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use poem::http::StatusCode;
    use serde_json::json;
    use crate::api::test_client;

    #[tokio::test]
    async fn binds_username() {
        let cli = test_client();
        for path in ["/api/user/alice", "/api/getuser/alice"] {
            let resp = cli.get(path).send().await;
            resp.assert_status_is_ok();
            resp.assert_json(json!({"user": "alice"})).await;
        }
    }

    #[tokio::test]
    async fn extra_segment_is_not_found() {
        let cli = test_client();
        let resp = cli.get("/api/getuser/alice/extra").send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }
}
