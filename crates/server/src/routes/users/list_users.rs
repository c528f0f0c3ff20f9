use axum::Json;
use shared::{
    api::{error::ServerError, response_errors::FetchError},
    model::User,
};
use tracing::instrument;

use crate::db::DatabaseConnection;

#[instrument(skip(conn))]
pub async fn list_users(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<User>>, ServerError<FetchError>> {
    let users = conn
        .interact(|conn| User::fetch_all::<FetchError>(conn))
        .await??;
    Ok(Json(users))
}
