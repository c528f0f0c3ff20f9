use rusqlite::Connection;
use shared::{
    api::{error::ServerError, response_errors::UserLookupError},
    model::User,
    types::Uuid,
};

mod add_exercise;
pub use add_exercise::*;

mod exercise_log;
pub use exercise_log::*;

/// Loads the user named in the path. Ids that aren't valid uuids can't match
/// anyone so they get the same not found error
fn lookup_user(conn: &Connection, id: &str) -> Result<User, ServerError<UserLookupError>> {
    let Ok(id) = Uuid::parse(id) else {
        return Err(UserLookupError::UserNotFound.into());
    };

    User::fetch_by_id(conn, &id)?.ok_or_else(|| UserLookupError::UserNotFound.into())
}
