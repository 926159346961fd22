#![forbid(unsafe_code)]

use poem_openapi::Object;

// ***************************************************************************
//                          Shared Response Bodies
// ***************************************************************************
// Bodies returned by more than one endpoint.  OpenAPI schema names must be
// unique, so they live here instead of in the endpoint files.

#[derive(Object, Debug)]
pub struct RespMessage
{
    message: String,
}

impl RespMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {message: message.into()}
    }
}

#[derive(Object, Debug)]
pub struct RespUser
{
    user: String,
}

impl RespUser {
    pub fn new(user: String) -> Self {
        Self {user}
    }
}
