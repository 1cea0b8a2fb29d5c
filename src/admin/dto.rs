use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The add form: email, name and the password entered twice.
#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password1: String,
    pub password2: String,
}

/// The change form. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeUserForm {
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ChangeList {
    pub columns: &'static [&'static str],
    pub rows: Vec<Value>,
}
