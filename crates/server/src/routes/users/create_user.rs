use axum::Json;
use shared::{
    api::{
        error::ServerError,
        payloads::{CreateUserRequest, CreateUserResponse},
        response_errors::CreateUserError,
    },
    model::{User, ValidateModel},
};
use tracing::{info, instrument};

use crate::{db::DatabaseConnection, extract::JsonOrForm};

#[instrument(skip(conn))]
pub async fn create_user(
    DatabaseConnection(conn): DatabaseConnection,
    JsonOrForm(request): JsonOrForm<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, ServerError<CreateUserError>> {
    let new_user = request.validate()?;

    let user = conn
        .interact(move |conn| {
            let user = User::create(conn, new_user)?;
            Ok::<_, ServerError<CreateUserError>>(user)
        })
        .await??;

    info!(id = %user.id, username = %user.username, "Created user");
    Ok(Json(CreateUserResponse::from(&user)))
}
