// This file contains the database structs and related definitions.
#![forbid(unsafe_code)]

// ---------------------------------------------------------------------------
// users:
// ---------------------------------------------------------------------------
#[derive(Debug, Clone)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

impl UserInput {
    pub fn new(name: String, email: String) -> Self {
        Self { name, email }
    }
}
