#![forbid(unsafe_code)]

use std::time::Duration;

use log::{info, warn};
use sqlx::{AnyConnection, Connection};
use thiserror::Error;

use crate::utils::config::DbConfig;
use crate::utils::db_statements::INSERT_USER;
use crate::utils::db_types::UserInput;

// ***************************************************************************
//                                 Errors
// ***************************************************************************
/// Failures at the two storage boundaries of a request.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Database connection error: {}", .0)]
    Connect(#[source] sqlx::Error),

    #[error("Database connection timed out after {} seconds", .0)]
    ConnectTimeout(u64),

    #[error("Database insert error: {}", .0)]
    Insert(#[source] sqlx::Error),
}

// ***************************************************************************
//                             Public Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// open_connection:
// ---------------------------------------------------------------------------
/** Open a new, unpooled connection.  The url scheme in the configuration
 * selects the driver.
 */
pub async fn open_connection(cfg: &DbConfig) -> Result<AnyConnection, GatewayError> {
    sqlx::any::install_default_drivers();

    let url = cfg.connection_url();
    let limit = Duration::from_secs(cfg.connect_timeout_secs);
    match tokio::time::timeout(limit, AnyConnection::connect(&url)).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(GatewayError::Connect(e)),
        Err(_) => Err(GatewayError::ConnectTimeout(cfg.connect_timeout_secs)),
    }
}

// ---------------------------------------------------------------------------
// insert_user:
// ---------------------------------------------------------------------------
pub async fn insert_user(conn: &mut AnyConnection, rec: &UserInput) -> Result<u64, GatewayError> {
    // Uncommitted transactions are rolled back when they go out of scope.
    let mut tx = conn.begin().await.map_err(GatewayError::Insert)?;

    let result = sqlx::query(INSERT_USER)
        .bind(rec.name.as_str())
        .bind(rec.email.as_str())
        .execute(&mut *tx)
        .await
        .map_err(GatewayError::Insert)?;

    tx.commit().await.map_err(GatewayError::Insert)?;

    Ok(result.rows_affected())
}

// ---------------------------------------------------------------------------
// create_user:
// ---------------------------------------------------------------------------
/** Open a connection, insert one user and close the connection.  Nothing is
 * shared between calls.  The connection is closed explicitly whether or not
 * the insert succeeded.
 */
pub async fn create_user(cfg: &DbConfig, rec: &UserInput) -> Result<u64, GatewayError> {
    let mut conn = open_connection(cfg).await?;
    let result = insert_user(&mut conn, rec).await;

    if let Err(e) = conn.close().await {
        warn!("Error closing database connection: {}", e);
    }

    if result.is_ok() {
        info!("User '{}' <{}> created.", rec.name, rec.email);
    }
    result
}

// ***************************************************************************
//                              Test Support
// ***************************************************************************
#[cfg(test)]
pub mod test_support {
    use std::path::PathBuf;

    use sqlx::{AnyConnection, Connection, Row};

    use crate::utils::config::DbConfig;
    use super::open_connection;

    const CREATE_USERS: &str = concat!(
        "CREATE TABLE users (",
        "id INTEGER PRIMARY KEY AUTOINCREMENT, ",
        "name TEXT NOT NULL, ",
        "email TEXT NOT NULL)",
    );

    /// A throwaway sqlite database file, removed on drop.
    pub struct TempDb {
        pub path: PathBuf,
        pub config: DbConfig,
    }

    impl TempDb {
        pub async fn with_users_table() -> Self {
            let db = Self::empty().await;
            let mut conn = db.connect().await;
            sqlx::query(CREATE_USERS).execute(&mut conn).await.expect("create users table");
            conn.close().await.expect("close");
            db
        }

        /// The file exists and is reachable, but has no users table.
        pub async fn empty() -> Self {
            let path = std::env::temp_dir().join(format!("finacle_api_{}.db", uuid::Uuid::new_v4()));
            let url = format!("sqlite://{}?mode=rwc", path.display());
            let config = DbConfig { url: Some(url), ..DbConfig::default() };
            let db = Self { path, config };
            db.connect().await.close().await.expect("close");
            db
        }

        pub async fn users(&self) -> Vec<(String, String)> {
            let mut conn = self.connect().await;
            let rows = sqlx::query("SELECT name, email FROM users ORDER BY id")
                .fetch_all(&mut conn)
                .await
                .expect("select users");
            rows.iter()
                .map(|r| (r.try_get::<String, _>(0).unwrap(), r.try_get::<String, _>(1).unwrap()))
                .collect()
        }

        async fn connect(&self) -> AnyConnection {
            open_connection(&self.config).await.expect("open temp db")
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    /// A mysql url pointing at a listener that accepts nothing, so the server
    /// greeting never arrives.  Keep the listener alive for the whole test.
    pub async fn silent_mysql_db() -> (tokio::net::TcpListener, DbConfig) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let config = DbConfig {
            url: Some(format!("mysql://root@127.0.0.1:{}/testdb", port)),
            connect_timeout_secs: 1,
            ..DbConfig::default()
        };
        (listener, config)
    }

    /// A sqlite file in a directory that doesn't exist, so every open fails.
    pub fn unreachable_db() -> DbConfig {
        let url = format!("sqlite:///nonexistent-{}/users.db", uuid::Uuid::new_v4());
        DbConfig { url: Some(url), ..DbConfig::default() }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use super::test_support::{TempDb, silent_mysql_db, unreachable_db};

    fn user(name: &str, email: &str) -> UserInput {
        UserInput::new(name.to_string(), email.to_string())
    }

    #[tokio::test]
    async fn create_user_inserts_one_row() {
        let db = TempDb::with_users_table().await;
        let n = create_user(&db.config, &user("A", "a@x.com")).await.expect("insert");
        assert_eq!(n, 1);
        assert_eq!(db.users().await, vec![("A".to_string(), "a@x.com".to_string())]);
    }

    #[tokio::test]
    async fn unreachable_database_is_a_connect_error() {
        let err = create_user(&unreachable_db(), &user("A", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Connect(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn silent_server_is_a_connect_timeout() {
        let (_listener, config) = silent_mysql_db().await;
        let err = create_user(&config, &user("A", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectTimeout(1)), "{:?}", err);
    }

    #[tokio::test]
    async fn missing_table_is_an_insert_error() {
        let db = TempDb::empty().await;
        let err = create_user(&db.config, &user("A", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Insert(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn values_are_bound_not_interpolated() {
        let db = TempDb::with_users_table().await;
        let name = "Robert'); DROP TABLE users;--";
        create_user(&db.config, &user(name, "bobby@x.com")).await.expect("insert");
        assert_eq!(db.users().await, vec![(name.to_string(), "bobby@x.com".to_string())]);
    }
}
