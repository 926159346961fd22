#![forbid(unsafe_code)]

use poem::Route;
use poem_openapi::OpenApiService;

use crate::utils::config::{Config, DbConfig};
use crate::utils::errors::Errors;
use crate::utils::route_table::{validate_route_table, RouteSpec};

use self::data_get::GetDataApi;
use self::finacle_data::FinacleDataApi;
use self::finacle_hello::FinacleHelloApi;
use self::hello::HelloApi;
use self::home::HomeApi;
use self::name_get::GetNameApi;
use self::name_request::RequestNameApi;
use self::name_status::NameStatusApi;
use self::payment_data::PaymentDataApi;
use self::post_data::PostDataApi;
use self::user_create::CreateUserApi;
use self::user_get::GetUserApi;

pub mod data_get;
pub mod finacle_data;
pub mod finacle_hello;
pub mod hello;
pub mod home;
pub mod name_get;
pub mod name_request;
pub mod name_status;
pub mod payment_data;
pub mod post_data;
pub mod responses;
pub mod user_create;
pub mod user_get;

// From cargo.toml.
const API_VERSION: &str = env!("CARGO_PKG_VERSION");

// ***************************************************************************
//                               Route Table
// ***************************************************************************
// Every operation registered by the endpoint structs below.  The table is
// checked for ambiguous templates before the server accepts any traffic.
pub const ROUTE_TABLE: &[RouteSpec] = &[
    RouteSpec::get("/"),
    RouteSpec::get("/api/finacle"),
    RouteSpec::get("/api/hello"),
    RouteSpec::get("/api/getdatafromfinacle"),
    RouteSpec::get("/api/getandreturnname"),
    RouteSpec::get("/api/getdata"),
    RouteSpec::post("/api/getpostdata"),
    RouteSpec::get("/api/getpaymentdata"),
    RouteSpec::get("/api/user/:username"),
    RouteSpec::get("/api/getuser/:username"),
    RouteSpec::get("/api/requestname"),
    RouteSpec::get("/api/getname/:nameed"),
    RouteSpec::post("/api/user"),
];

type Endpoints = (
    HomeApi,
    FinacleHelloApi,
    HelloApi,
    FinacleDataApi,
    GetNameApi,
    GetDataApi,
    PostDataApi,
    PaymentDataApi,
    GetUserApi,
    RequestNameApi,
    NameStatusApi,
    CreateUserApi,
);

// ***************************************************************************
//                             Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// api_service:
// ---------------------------------------------------------------------------
pub fn api_service(db: DbConfig, title: &str, server_url: &str) -> OpenApiService<Endpoints, ()> {
    let endpoints = (
        HomeApi,
        FinacleHelloApi,
        HelloApi,
        FinacleDataApi,
        GetNameApi,
        GetDataApi,
        PostDataApi,
        PaymentDataApi,
        GetUserApi,
        RequestNameApi,
        NameStatusApi,
        CreateUserApi::new(db),
    );
    OpenApiService::new(endpoints, title, API_VERSION).server(server_url.to_string())
}

// ---------------------------------------------------------------------------
// build_app:
// ---------------------------------------------------------------------------
/** Validate the route table and assemble the application: the API itself at
 * the root, plus the generated OpenAPI documents and a Swagger UI.
 */
pub fn build_app(config: &Config) -> Result<Route, Errors> {
    validate_route_table(ROUTE_TABLE)?;

    let server_url = format!("{}:{}", config.http_addr, config.http_port);
    let api_service = api_service(config.db.clone(), &config.title, &server_url);

    // Allow the generated openapi specs to be retrieved from the server.
    let spec = api_service.spec_endpoint();
    let spec_yaml = api_service.spec_endpoint_yaml();
    let ui = api_service.swagger_ui();

    Ok(Route::new()
        .at("/spec", spec)
        .at("/spec_yaml", spec_yaml)
        .nest("/docs", ui)
        .nest("/", api_service))
}

// ***************************************************************************
//                              Test Support
// ***************************************************************************
#[cfg(test)]
pub fn test_client_with_db(db: DbConfig) -> poem::test::TestClient<Route> {
    let config = Config {db, ..Config::new()};
    poem::test::TestClient::new(build_app(&config).expect("valid app"))
}

// Endpoints that never touch the database.
#[cfg(test)]
pub fn test_client() -> poem::test::TestClient<Route> {
    test_client_with_db(DbConfig::default())
}
