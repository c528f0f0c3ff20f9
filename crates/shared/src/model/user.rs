use chrono::{DateTime, Utc};
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
#[cfg_attr(feature = "backend", table("user"))]
#[cfg_attr(feature = "backend", check("../../../server/migrations/001-user/up.sql"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("user"))]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
}

impl NewUser {
    pub fn new<I: Into<Uuid>, T: Into<String>>(id: I, username: T) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

#[cfg(feature = "backend")]
impl User {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns([UserIden::Id, UserIden::Username, UserIden::CreationDate])
            .from(UserIden::Table)
            .to_owned()
    }

    pub fn fetch_by_id<T: Error>(
        conn: &Connection,
        id: &Uuid,
    ) -> Result<Option<User>, ServerError<T>> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt
            .query_row(&*values.as_params(), User::from_row)
            .optional()?;
        Ok(user)
    }

    /// All users in the order they were created
    pub fn fetch_all<T: Error>(conn: &Connection) -> Result<Vec<User>, ServerError<T>> {
        let (sql, values) = Self::select_star()
            .order_by_expr(Expr::cust("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let users = stmt
            .query_map(&*values.as_params(), User::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(users)
    }

    pub fn create<T: Error>(
        conn: &mut Connection,
        new_user: NewUser,
    ) -> Result<User, ServerError<T>> {
        let tx = conn.transaction()?;
        let user = {
            new_user.insert(&tx)?;
            User::fetch_by_id(&tx, &new_user.id)?
                .ok_or_else(|| crate::other_error!("User {} missing after insert", new_user.id))?
        };
        tx.commit()?;

        Ok(user)
    }
}
