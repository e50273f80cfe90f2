//! Schema-validated extraction from raw JSON records
//!
//! Field access is an explicit validation step with named error kinds, so a
//! record missing an expected field fails as a data-shape error rather than
//! being conflated with transport failures.

use crate::model::{Comment, Post, User, UNKNOWN_SOURCE};
use serde_json::Value;
use thiserror::Error;

/// Errors describing a raw record that does not match the expected shape
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Missing field '{field}' in {record} record")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("Field '{field}' in {record} record has an unexpected type")]
    InvalidType {
        record: &'static str,
        field: &'static str,
    },
}

/// Result type for extraction operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Looks up a required field on a JSON object
pub fn field<'a>(data: &'a Value, record: &'static str, name: &'static str) -> SchemaResult<&'a Value> {
    data.get(name)
        .ok_or(SchemaError::MissingField {
            record,
            field: name,
        })
}

/// Reads a required string field
fn str_field(data: &Value, record: &'static str, name: &'static str) -> SchemaResult<String> {
    field(data, record, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or(SchemaError::InvalidType {
            record,
            field: name,
        })
}

/// Reads a required unsigned integer field
pub(crate) fn u64_field(data: &Value, record: &'static str, name: &'static str) -> SchemaResult<u64> {
    field(data, record, name)?
        .as_u64()
        .ok_or(SchemaError::InvalidType {
            record,
            field: name,
        })
}

/// Reads an identifier field, accepting either a JSON number or a string
///
/// The platform is inconsistent here: numeric ids in post and user records,
/// string ids (`mblogid`) in repost items.
pub fn id_field(data: &Value, record: &'static str, name: &'static str) -> SchemaResult<String> {
    let value = field(data, record, name)?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SchemaError::InvalidType {
            record,
            field: name,
        }),
    }
}

/// Maps a raw user record to a [`User`]
pub fn extract_user(data: &Value) -> SchemaResult<User> {
    Ok(User {
        id: id_field(data, "user", "id")?,
        screen_name: str_field(data, "user", "screen_name")?,
        location: str_field(data, "user", "location")?,
        description: str_field(data, "user", "description")?,
        followers_count: u64_field(data, "user", "followers_count")?,
        friends_count: u64_field(data, "user", "friends_count")?,
        gender: str_field(data, "user", "gender")?,
    })
}

/// Maps a raw post detail record to a [`Post`]
pub fn extract_post(data: &Value) -> SchemaResult<Post> {
    Ok(Post {
        id: id_field(data, "post", "id")?,
        text_raw: str_field(data, "post", "text_raw")?,
        created_at: str_field(data, "post", "created_at")?,
    })
}

/// Reads the authoring user's identifier nested in a post detail record
pub fn post_author_id(data: &Value) -> SchemaResult<String> {
    let user = field(data, "post", "user")?;
    id_field(user, "post", "id")
}

/// Maps a raw comment record to a [`Comment`]
///
/// The `source` label is optional and defaults to [`UNKNOWN_SOURCE`].
pub fn extract_comment(data: &Value) -> SchemaResult<Comment> {
    let source = match data.get("source") {
        Some(Value::String(s)) => s.clone(),
        _ => UNKNOWN_SOURCE.to_string(),
    };

    Ok(Comment {
        id: id_field(data, "comment", "id")?,
        text_raw: str_field(data, "comment", "text_raw")?,
        source,
        created_at: str_field(data, "comment", "created_at")?,
    })
}
