use std::{cmp::Ordering, str::FromStr};

use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String, // Argon2 PHC string, never rendered
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user. New accounts are always active.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    pub fn regular(email: impl Into<String>, name: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            is_staff: false,
            is_superuser: false,
        }
    }
}

/// Partial update; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Failures of user writes that callers need to tell apart.
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Columns the user list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Id,
    Email,
    Name,
    IsActive,
    IsStaff,
    IsSuperuser,
    LastLogin,
    CreatedAt,
}

/// One ordering entry; `-email` sorts by email descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSort {
    pub column: UserColumn,
    pub descending: bool,
}

impl UserColumn {
    pub fn sql(self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::Email => "email",
            UserColumn::Name => "name",
            UserColumn::IsActive => "is_active",
            UserColumn::IsStaff => "is_staff",
            UserColumn::IsSuperuser => "is_superuser",
            UserColumn::LastLogin => "last_login",
            UserColumn::CreatedAt => "created_at",
        }
    }

    pub fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            UserColumn::Id => a.id.cmp(&b.id),
            UserColumn::Email => a.email.cmp(&b.email),
            UserColumn::Name => a.name.cmp(&b.name),
            UserColumn::IsActive => a.is_active.cmp(&b.is_active),
            UserColumn::IsStaff => a.is_staff.cmp(&b.is_staff),
            UserColumn::IsSuperuser => a.is_superuser.cmp(&b.is_superuser),
            UserColumn::LastLogin => a.last_login.cmp(&b.last_login),
            UserColumn::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

impl FromStr for UserSort {
    type Err = anyhow::Error;

    fn from_str(field: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match field.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, field),
        };
        let column = match name {
            "id" => UserColumn::Id,
            "email" => UserColumn::Email,
            "name" => UserColumn::Name,
            "is_active" => UserColumn::IsActive,
            "is_staff" => UserColumn::IsStaff,
            "is_superuser" => UserColumn::IsSuperuser,
            "last_login" => UserColumn::LastLogin,
            "created_at" => UserColumn::CreatedAt,
            other => anyhow::bail!("cannot order users by {other:?}"),
        };
        Ok(Self { column, descending })
    }
}

impl UserSort {
    /// Parse a whole ordering list such as `["created_at", "id"]`.
    pub fn parse_all(fields: &[&str]) -> anyhow::Result<Vec<UserSort>> {
        fields.iter().map(|f| f.parse()).collect()
    }

    pub fn compare(self, a: &User, b: &User) -> Ordering {
        let ord = self.column.compare(a, b);
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_fields_parse() {
        let keys = UserSort::parse_all(&["created_at", "-email"]).unwrap();
        assert_eq!(
            keys,
            vec![
                UserSort { column: UserColumn::CreatedAt, descending: false },
                UserSort { column: UserColumn::Email, descending: true },
            ]
        );
        assert!(UserSort::parse_all(&["password_hash"]).is_err());
    }
}
