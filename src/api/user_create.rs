#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{OpenApi, payload::Json, Object, ApiResponse};
use log::error;
use serde_json::Value;

use crate::utils::app_utils::{self, RequestDebug};
use crate::utils::config::DbConfig;
use crate::utils::db::{self, GatewayError};
use crate::utils::db_types::UserInput;
use crate::utils::errors::HttpError;

// Client visible error messages.
const MSG_FIELDS_REQUIRED: &str = "name and email required";
const MSG_CONNECT_FAILED:  &str = "DB connection failed";
const MSG_INSERT_FAILED:   &str = "DB insert failed";

// ***************************************************************************
//                          Request/Response Definitions
// ***************************************************************************
/** Create-user endpoint.  The database settings are injected at startup. */
pub struct CreateUserApi {
    db: DbConfig,
}

impl CreateUserApi {
    pub fn new(db: DbConfig) -> Self {
        Self {db}
    }
}

// Both fields are untyped at the parsing level so that a missing or non-string
// field gets our own 400 body.  The framework's string parser would otherwise
// coerce numbers into text.
#[derive(Object)]
pub struct ReqCreateUser
{
    name: Option<Value>,
    email: Option<Value>,
}

#[derive(Object, Debug)]
pub struct RespCreateUser
{
    status: String,
    message: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqCreateUser {
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request body:");
        s.push_str("\n    name: ");
        s.push_str(&field_info(&self.name));
        s.push_str("\n    email: ");
        s.push_str(&field_info(&self.email));
        s
    }
}

fn field_info(field: &Option<Value>) -> String {
    match field {
        Some(v) => v.to_string(),
        None => "<absent>".to_string(),
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum AppResponse {
    #[oai(status = 200)]
    Http200(Json<RespCreateUser>),
    #[oai(status = 400)]
    Http400(Json<HttpError>),
    #[oai(status = 500)]
    Http500(Json<HttpError>),
}

fn make_http_200(resp: RespCreateUser) -> AppResponse {
    AppResponse::Http200(Json(resp))
}
fn make_http_400(msg: &str) -> AppResponse {
    AppResponse::Http400(Json(HttpError::new(msg)))
}
fn make_http_500(msg: &str) -> AppResponse {
    AppResponse::Http500(Json(HttpError::new(msg)))
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl CreateUserApi {
    #[oai(path = "/api/user", method = "post")]
    async fn create_user(&self, http_req: &Request, req: Json<ReqCreateUser>) -> AppResponse {
        // Conditional logging depending on log level.
        app_utils::debug_request(http_req, &req.0);

        // -------------------- Validate -----------------------------
        // Nothing touches the database unless both fields are non-empty.
        let input = match req.0.validate() {
            Some(input) => input,
            None => return make_http_400(MSG_FIELDS_REQUIRED),
        };

        // -------------------- Process Request ----------------------
        match db::create_user(&self.db, &input).await {
            Ok(_) => make_http_200(RespCreateUser::new("success", "User created")),
            Err(e @ (GatewayError::Connect(_) | GatewayError::ConnectTimeout(_))) => {
                error!("{}", e);
                make_http_500(MSG_CONNECT_FAILED)
            }
            Err(e @ GatewayError::Insert(_)) => {
                error!("{}", e);
                make_http_500(MSG_INSERT_FAILED)
            }
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl ReqCreateUser {
    /// Both fields present as non-empty strings, or nothing.
    fn validate(self) -> Option<UserInput> {
        match (self.name, self.email) {
            (Some(Value::String(name)), Some(Value::String(email)))
                if !name.is_empty() && !email.is_empty() =>
                Some(UserInput::new(name, email)),
            _ => None,
        }
    }
}

impl RespCreateUser {
    fn new(status: &str, message: &str) -> Self {
        Self {status: status.to_string(), message: message.to_string()}
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use poem::http::StatusCode;
    use serde_json::json;

    use crate::api::test_client_with_db;
    use crate::utils::db::test_support::{TempDb, silent_mysql_db, unreachable_db};

    #[tokio::test]
    async fn creates_user() {
        let db = TempDb::with_users_table().await;
        let cli = test_client_with_db(db.config.clone());
        let resp = cli.post("/api/user")
            .body_json(&json!({"name": "A", "email": "a@x.com"}))
            .send()
            .await;
        resp.assert_status_is_ok();
        resp.assert_json(json!({"status": "success", "message": "User created"})).await;
        assert_eq!(db.users().await, vec![("A".to_string(), "a@x.com".to_string())]);
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_database() {
        // Any attempt to connect would fail with a 500, so a 400 proves none was made.
        let cli = test_client_with_db(unreachable_db());
        let bodies = [
            json!({"name": ""}),
            json!({"email": "a@x.com"}),
            json!({"name": "A", "email": ""}),
            json!({}),
        ];
        for body in bodies {
            let resp = cli.post("/api/user").body_json(&body).send().await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            resp.assert_json(json!({"error": "name and email required"})).await;
        }
    }

    #[tokio::test]
    async fn rejected_input_inserts_nothing() {
        let db = TempDb::with_users_table().await;
        let cli = test_client_with_db(db.config.clone());
        let resp = cli.post("/api/user").body_json(&json!({"name": ""})).send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert!(db.users().await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_database_is_server_error() {
        let cli = test_client_with_db(unreachable_db());
        let resp = cli.post("/api/user")
            .body_json(&json!({"name": "A", "email": "a@x.com"}))
            .send()
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(json!({"error": "DB connection failed"})).await;
    }

    #[tokio::test]
    async fn insert_failure_is_server_error() {
        let db = TempDb::empty().await;
        let cli = test_client_with_db(db.config.clone());
        let resp = cli.post("/api/user")
            .body_json(&json!({"name": "A", "email": "a@x.com"}))
            .send()
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(json!({"error": "DB insert failed"})).await;
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let cli = test_client_with_db(unreachable_db());
        let resp = cli.post("/api/user")
            .content_type("application/json")
            .body("{\"name\": \"A\", ")
            .send()
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_string_fields_never_reach_the_database() {
        let cli = test_client_with_db(unreachable_db());
        let bodies = [
            json!({"name": 5, "email": "a@x.com"}),
            json!({"name": "A", "email": true}),
            json!({"name": ["A"], "email": {"x": 1}}),
            json!({"name": null, "email": "a@x.com"}),
        ];
        for body in bodies {
            let resp = cli.post("/api/user").body_json(&body).send().await;
            resp.assert_status(StatusCode::BAD_REQUEST);
            resp.assert_json(json!({"error": "name and email required"})).await;
        }
    }

    #[tokio::test]
    async fn numeric_name_is_not_stored() {
        let db = TempDb::with_users_table().await;
        let cli = test_client_with_db(db.config.clone());
        let resp = cli.post("/api/user").body_json(&json!({"name": 5, "email": "a@x.com"})).send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert!(db.users().await.is_empty());
    }

    #[tokio::test]
    async fn connect_timeout_is_server_error() {
        let (_listener, config) = silent_mysql_db().await;
        let cli = test_client_with_db(config);
        let resp = cli.post("/api/user")
            .body_json(&json!({"name": "A", "email": "a@x.com"}))
            .send()
            .await;
        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        resp.assert_json(json!({"error": "DB connection failed"})).await;
    }

    #[tokio::test]
    async fn concurrent_creates_each_insert_one_row() {
        let db = TempDb::with_users_table().await;
        let cli = test_client_with_db(db.config.clone());
        let cli = &cli;

        let requests = (0..8).map(|i| async move {
            cli.post("/api/user")
                .body_json(&json!({"name": format!("user{}", i), "email": format!("user{}@x.com", i)}))
                .send()
                .await
        });
        for resp in join_all(requests).await {
            resp.assert_status_is_ok();
        }

        let mut users = db.users().await;
        users.sort();
        let mut expected: Vec<(String, String)> = (0..8)
            .map(|i| (format!("user{}", i), format!("user{}@x.com", i)))
            .collect();
        expected.sort();
        assert_eq!(users, expected);
    }
}
