use axum::{
    extract::{Path, Query},
    Json,
};
use axum_extra::extract::WithRejection;
use shared::{
    api::{
        error::{Nothing, ServerError},
        payloads::{ExerciseLogQuery, ExerciseLogResponse},
        response_errors::ExerciseLogError,
    },
    model::{Exercise, ValidateModel},
};
use tracing::instrument;

use super::lookup_user;
use crate::db::DatabaseConnection;

#[instrument(skip(conn))]
pub async fn exercise_log(
    DatabaseConnection(conn): DatabaseConnection,
    WithRejection(Path(id), _): WithRejection<Path<String>, ServerError<Nothing>>,
    WithRejection(Query(query), _): WithRejection<Query<ExerciseLogQuery>, ServerError<Nothing>>,
) -> Result<Json<ExerciseLogResponse>, ServerError<ExerciseLogError>> {
    let res = conn
        .interact(move |conn| {
            let user = lookup_user(conn, &id)?;
            let filter = query.validate()?;
            let exercises = Exercise::fetch_for_user(conn, &user.id, &filter)?;

            Ok::<_, ServerError<ExerciseLogError>>(ExerciseLogResponse::new(&user, &exercises))
        })
        .await??;

    Ok(Json(res))
}
