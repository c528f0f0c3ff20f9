use axum::{extract::Path, Json};
use axum_extra::extract::WithRejection;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{AddExerciseRequest, AddExerciseResponse},
        response_errors::AddExerciseError,
    },
    model::{Exercise, NewExercise, ValidateModel},
};
use tracing::{info, instrument};

use super::lookup_user;
use crate::{db::DatabaseConnection, extract::JsonOrForm};

/// Logs an exercise against an existing user. Nothing is written unless the
/// user exists and the request is valid
#[instrument(skip(conn))]
pub async fn add_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    WithRejection(Path(id), _): WithRejection<Path<String>, ServerError<Nothing>>,
    JsonOrForm(request): JsonOrForm<AddExerciseRequest>,
) -> Result<Json<AddExerciseResponse>, ServerError<AddExerciseError>> {
    let res = conn
        .interact(move |conn| {
            let user = lookup_user(conn, &id)?;
            let details = request.validate()?;
            let exercise = Exercise::create(conn, NewExercise::new(user.id, details))?;

            info!(id = %exercise.id, user_id = %user.id, "Added exercise");
            Ok::<_, ServerError<AddExerciseError>>(AddExerciseResponse::new(&user, &exercise))
        })
        .await??;

    Ok(Json(res))
}
