// This file contains all SQL statements issued by the server.
#![forbid(unsafe_code)]

// ========================= users table =========================
// The users table is created and owned outside of this server.  Both the
// mysql and sqlite drivers use ? placeholders.
pub const INSERT_USER: &str = concat!(
    "INSERT INTO users (name, email) ",
    "VALUES (?, ?)",
);
