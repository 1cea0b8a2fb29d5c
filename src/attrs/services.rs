use crate::error::{ApiError, ApiResult};

pub const MAX_NAME_LEN: usize = 255;

/// Trim and bound-check a tag/ingredient name.
pub fn clean_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("name: This field may not be blank."));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "name: Ensure this field has no more than {MAX_NAME_LEN} characters."
        )));
    }
    Ok(name.to_string())
}

/// `assigned_only` is an integer flag: absent or 0 is false, anything else true.
pub fn parse_assigned_only(raw: Option<&str>) -> ApiResult<bool> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) => v
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| ApiError::bad_request("assigned_only: A valid integer is required.")),
    }
}
