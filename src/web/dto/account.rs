use serde::{Deserialize, Serialize};

pub const USER_EXISTS_MESSAGE: &str = "User already exists.";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// What a form page needs besides its static markup: which form, and the message shown
/// above it after a failed attempt.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FormView {
    pub form: String,
    pub fields: Vec<String>,
    pub message: Option<String>,
}

impl FormView {
    pub fn registration(message: Option<&str>) -> Self {
        Self {
            form: String::from("registration"),
            fields: ["username", "password", "first_name", "last_name"]
                .map(String::from)
                .to_vec(),
            message: message.map(String::from),
        }
    }

    pub fn login(message: Option<&str>) -> Self {
        Self {
            form: String::from("login"),
            fields: ["username", "password"].map(String::from).to_vec(),
            message: message.map(String::from),
        }
    }
}
