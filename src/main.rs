#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::{error, info};
use poem::listener::TcpListener;

// App Utilities
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx, APP_ARGS, APP_DIRS};
use crate::utils::errors::Errors;

// Modules
mod api;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "FinacleApi"; // for poem logging

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Server --------------
    println!("Starting finacle_api!");

    // Directories only: compute and create them, then quit.
    if APP_ARGS.create_dirs_only {
        println!("Data directories initialized under {}.", APP_DIRS.root_dir);
        return Ok(());
    }

    app_init();

    // --------------- Main Loop Set Up ---------------
    // The route table is validated before anything is bound.
    let config = &RUNTIME_CTX.parms.config;
    let app = match api::build_app(config) {
        Ok(app) => app,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let addr = format!("{}{}", "0.0.0.0:", config.http_port);
    info!("{} listening on {}.", SERVER_NAME, addr);

    // ------------------ Main Loop -------------------
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// app_init:
// ---------------------------------------------------------------------------
/** Initialize logging and the runtime context. */
fn app_init() {
    init_log();

    // Force the reading of input parameters and initialization of runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    print_version_info();
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running finacle_api={}, BRANCH={}, COMMIT={}, DIRTY={}, RUSTC={}.",
          env!("CARGO_PKG_VERSION"),
          env!("GIT_BRANCH"),
          env!("GIT_COMMIT_SHORT"),
          env!("GIT_DIRTY"),
          env!("RUSTC_VERSION"),
    );
}
