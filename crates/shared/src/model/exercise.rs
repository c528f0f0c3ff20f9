use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Uuid;

#[cfg(feature = "backend")]
use {
    crate::api::error::ServerError,
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    std::error::Error,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", check("../../../server/migrations/002-exercise/up.sql"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    /// Minutes
    pub duration: i64,
    pub date: NaiveDate,
    pub creation_date: DateTime<Utc>,
}

/// The validated, user supplied part of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetails {
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
pub struct NewExercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub duration: i64,
    pub date: NaiveDate,
}

impl NewExercise {
    pub fn new<I: Into<Uuid>>(user_id: I, details: ExerciseDetails) -> Self {
        let ExerciseDetails {
            description,
            duration,
            date,
        } = details;

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            description,
            duration,
            date,
        }
    }
}

/// Restricts which of a user's exercises are returned. Both date bounds are
/// inclusive and `None` means unbounded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
}

#[cfg(feature = "backend")]
impl Exercise {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([
                ExerciseIden::Id,
                ExerciseIden::UserId,
                ExerciseIden::Description,
                ExerciseIden::Duration,
                ExerciseIden::Date,
                ExerciseIden::CreationDate,
            ])
            .from(ExerciseIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id<T: Error>(
        conn: &Connection,
        id: &Uuid,
    ) -> Result<Option<Exercise>, ServerError<T>> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let exercise = stmt
            .query_row(&*values.as_params(), Exercise::from_row)
            .optional()?;
        Ok(exercise)
    }

    /// A user's exercises in the order they were logged. Clauses are only
    /// added for the parts of the filter that are set
    pub fn fetch_for_user<T: Error>(
        conn: &Connection,
        user_id: &Uuid,
        filter: &ExerciseFilter,
    ) -> Result<Vec<Exercise>, ServerError<T>> {
        let mut query = Self::select_star();
        query.and_where(Expr::col(ExerciseIden::UserId).eq(user_id));

        if let Some(from) = filter.from {
            query.and_where(Expr::col(ExerciseIden::Date).gte(from));
        }
        if let Some(to) = filter.to {
            query.and_where(Expr::col(ExerciseIden::Date).lte(to));
        }
        if let Some(limit) = filter.limit {
            query.limit(limit);
        }

        let (sql, values) = query
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let exercises = stmt
            .query_map(&*values.as_params(), Exercise::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(exercises)
    }

    pub fn create<T: Error>(
        conn: &mut Connection,
        new_exercise: NewExercise,
    ) -> Result<Exercise, ServerError<T>> {
        let tx = conn.transaction()?;
        let exercise = {
            new_exercise.insert(&tx)?;
            Exercise::fetch_by_id(&tx, &new_exercise.id)?.ok_or_else(|| {
                crate::other_error!("Exercise {} missing after insert", new_exercise.id)
            })?
        };
        tx.commit()?;

        Ok(exercise)
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::{ExerciseDetails, NewExercise};
    use crate::types::Uuid;

    #[test]
    fn test_new_exercise_keeps_details() {
        let user_id = Uuid::new_v4();
        let details = ExerciseDetails {
            description: "swim".to_string(),
            duration: 20,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        let a = NewExercise::new(user_id, details.clone());
        let b = NewExercise::new(user_id, details);

        assert_eq!(a.user_id, user_id);
        assert_eq!(a.description, "swim");
        assert_eq!(a.duration, 20);
        assert_eq!(a.date, b.date);
        assert_ne!(a.id, b.id);
    }
}
