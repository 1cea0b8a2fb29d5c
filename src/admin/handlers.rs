use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{AddUserForm, ChangeList, ChangeUserForm},
    layout::{ModelAdmin, USER_ADMIN},
};
use crate::{
    auth::{
        services::{create_account, is_valid_email, normalize_email, NewAccount},
        StaffUser,
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::{UserChanges, UserSort, UserStore},
};

pub fn user_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users/layout", get(layout))
        .route("/admin/users/", get(changelist).post(add_user))
        .route(
            "/admin/users/:id",
            get(change_form).patch(change_user).delete(delete_user),
        )
}

pub async fn layout(_staff: StaffUser) -> Json<ModelAdmin> {
    Json(USER_ADMIN)
}

#[instrument(skip_all, fields(staff_id = %staff.id))]
pub async fn changelist(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
) -> ApiResult<Json<ChangeList>> {
    let ordering = UserSort::parse_all(USER_ADMIN.ordering)?;
    let users = state.store.list_users(&ordering).await?;
    Ok(Json(ChangeList {
        columns: USER_ADMIN.list_display,
        rows: users.iter().map(|u| USER_ADMIN.render_row(u)).collect(),
    }))
}

#[instrument(skip_all, fields(staff_id = %staff.id, %id))]
pub async fn change_form(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let user = state.store.find_user(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(USER_ADMIN.render_change_form(&user)))
}

#[instrument(skip_all, fields(staff_id = %staff.id))]
pub async fn add_user(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(form): Json<AddUserForm>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    if form.password1 != form.password2 {
        warn!("admin add user: password mismatch");
        return Err(ApiError::bad_request(
            "password2: The two password fields didn't match.",
        ));
    }

    let user = create_account(
        state.store.as_ref(),
        NewAccount {
            email: &form.email,
            name: &form.name,
            password: &form.password1,
            is_staff: false,
            is_superuser: false,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "admin created user");
    Ok((StatusCode::CREATED, Json(USER_ADMIN.render_change_form(&user))))
}

#[instrument(skip_all, fields(staff_id = %staff.id, %id))]
pub async fn change_user(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(form): Json<ChangeUserForm>,
) -> ApiResult<Json<Value>> {
    let email = match form.email.as_deref() {
        Some(raw) => {
            let email = normalize_email(raw);
            if !is_valid_email(&email) {
                return Err(ApiError::bad_request("email: Enter a valid email address."));
            }
            if let Some(existing) = state.store.find_user_by_email(&email).await? {
                if existing.id != id {
                    return Err(ApiError::Conflict("Email already registered".into()));
                }
            }
            Some(email)
        }
        None => None,
    };

    let changes = UserChanges {
        email,
        name: form.name.map(|n| n.trim().to_string()),
        is_active: form.is_active,
        is_staff: form.is_staff,
        is_superuser: form.is_superuser,
        ..Default::default()
    };
    let user = state
        .store
        .update_user(id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(user_id = %user.id, "admin changed user");
    Ok(Json(USER_ADMIN.render_change_form(&user)))
}

#[instrument(skip_all, fields(staff_id = %staff.id, %id))]
pub async fn delete_user(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_user(id).await? {
        return Err(ApiError::NotFound);
    }
    info!(user_id = %id, "admin deleted user");
    Ok(StatusCode::NO_CONTENT)
}
