//! Declarative admin layout for user accounts.
//!
//! The layout only says which fields appear where; the admin handlers
//! render every user record through it.

use serde::Serialize;
use serde_json::{json, Map, Value};
use time::format_description::well_known::Rfc3339;

use crate::{auth::password::describe_hash, users::User};

/// A titled group of fields on an admin form.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Fieldset {
    pub title: Option<&'static str>,
    pub classes: &'static [&'static str],
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub ordering: &'static [&'static str],
    pub list_display: &'static [&'static str],
    pub fieldsets: &'static [Fieldset],
    pub add_fieldsets: &'static [Fieldset],
}

pub const USER_ADMIN: ModelAdmin = ModelAdmin {
    model: "user",
    // ids are UUIDs, creation order stands in for id order
    ordering: &["created_at", "id"],
    list_display: &["id", "email", "name", "is_staff"],
    fieldsets: &[
        Fieldset {
            title: None,
            classes: &[],
            fields: &["email", "password", "name"],
        },
        Fieldset {
            title: Some("Permissions"),
            classes: &[],
            fields: &["is_active", "is_staff", "is_superuser"],
        },
        Fieldset {
            title: Some("Important dates"),
            classes: &[],
            fields: &["last_login"],
        },
    ],
    add_fieldsets: &[Fieldset {
        title: None,
        classes: &["wide"],
        fields: &["email", "name", "password1", "password2"],
    }],
};

/// Value of a single user field as shown in the admin.
pub fn field_value(user: &User, field: &str) -> Value {
    match field {
        "id" => json!(user.id),
        "email" => json!(user.email),
        "name" => json!(user.name),
        "password" => json!(describe_hash(&user.password_hash)),
        "is_active" => json!(user.is_active),
        "is_staff" => json!(user.is_staff),
        "is_superuser" => json!(user.is_superuser),
        "last_login" => json!(user.last_login.and_then(|t| t.format(&Rfc3339).ok())),
        "created_at" => json!(user.created_at.format(&Rfc3339).ok()),
        _ => Value::Null,
    }
}

impl ModelAdmin {
    /// One changelist row: exactly the `list_display` fields.
    pub fn render_row(&self, user: &User) -> Value {
        let row: Map<String, Value> = self
            .list_display
            .iter()
            .map(|f| (f.to_string(), field_value(user, f)))
            .collect();
        Value::Object(row)
    }

    /// The change form: the record split into its fieldsets.
    pub fn render_change_form(&self, user: &User) -> Value {
        let fieldsets: Vec<Value> = self
            .fieldsets
            .iter()
            .map(|fs| {
                let fields: Map<String, Value> = fs
                    .fields
                    .iter()
                    .map(|f| (f.to_string(), field_value(user, f)))
                    .collect();
                json!({ "title": fs.title, "fields": fields })
            })
            .collect();
        json!({ "id": user.id, "fieldsets": fieldsets })
    }
}
