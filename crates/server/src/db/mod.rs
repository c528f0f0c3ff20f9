use std::{
    ffi::c_int,
    fs::remove_file,
    io,
    sync::Once,
    time::{Duration, Instant},
};

use deadpool_sqlite::{Config, Hook, Pool, Runtime};
use include_dir::{include_dir, Dir};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use rusqlite_migration::{Migrations, SchemaVersion};
use shared::{
    api::error::{Nothing, ServerError, ServerErrorContext},
    other_error,
};
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

mod database_connection;
pub use database_connection::*;

static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");

/// Applied to every connection, including the one migrations run on
const CONNECTION_PRAGMAS: [(&str, &str); 3] = [
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("foreign_keys", "ON"),
];

fn log_statement(query: &str) {
    trace!(target: "sql", query);
}

fn log_statement_timing(query: &str, duration: Duration) {
    trace!(target: "sql", ?duration, query);
}

/// Forwards sqlite's own diagnostics. The low byte of the code is the primary
/// result code, see https://www.sqlite.org/rescode.html
fn forward_sqlite_log(sqlite_code: c_int, msg: &str) {
    use rusqlite::ffi;
    let code = ffi::Error::new(sqlite_code);

    match sqlite_code & 0xff {
        ffi::SQLITE_NOTICE => info!(target: "sqlite", %code, msg),
        ffi::SQLITE_WARNING => warn!(target: "sqlite", %code, msg),
        _ => error!(target: "sqlite", %code, msg),
    }
}

pub fn get_migrations() -> Result<Migrations<'static>, ServerError<Nothing>> {
    Migrations::from_directory(&MIGRATIONS_DIR)
        .map_err(|e| other_error!("Migrations::from_directory: {:?}", e))
}

/// Pragmas plus statement logging. Debug builds log every statement, release
/// builds only log statements with their timings
#[instrument(skip(conn))]
pub fn configure_new_connection(conn: &mut Connection) -> Result<(), ServerError<Nothing>> {
    run_pragmas(conn)?;

    if cfg!(debug_assertions) {
        conn.trace(Some(log_statement));
    } else {
        conn.profile(Some(log_statement_timing));
    }

    Ok(())
}

pub fn run_pragmas(conn: &Connection) -> Result<(), ServerError<Nothing>> {
    for (name, value) in CONNECTION_PRAGMAS {
        conn.pragma_update(None, name, value)
            .with_context(|| format!("PRAGMA {name} = {value}"))?;
    }
    Ok(())
}

fn schema_version(
    migrations: &Migrations<'static>,
    conn: &Connection,
) -> Result<usize, ServerError<Nothing>> {
    match migrations
        .current_version(conn)
        .map_err(|e| other_error!("Migrations::current_version: {:?}", e))?
    {
        SchemaVersion::Inside(n) => Ok(n.into()),
        SchemaVersion::Outside(n) => Err(other_error!(
            "Schema version {n} is outside of known schema migrations. Manual intervention required"
        )),
        SchemaVersion::NoneSet => Ok(0),
    }
}

/// Brings the database up to the latest schema, returning how many migrations
/// were applied. Runs on its own connection so it has to happen before the
/// pool is created
#[instrument]
pub fn run_migrations(connection_string: &str) -> Result<usize, ServerError<Nothing>> {
    // Configure the log callback before opening the database. This only works
    // if sqlite hasn't been initialized yet, so a failure isn't fatal
    static CONFIG_LOG: Once = Once::new();
    let mut config_result = Ok(());
    CONFIG_LOG.call_once(|| unsafe {
        config_result = rusqlite::trace::config_log(Some(forward_sqlite_log));
    });
    if let Err(e) = config_result {
        warn!("Failed to route sqlite logs to tracing: {e}");
    }

    let open_flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_CREATE;

    let mut conn = Connection::open_with_flags(connection_string, open_flags)
        .with_context(|| format!("Opening {connection_string}"))?;
    configure_new_connection(&mut conn)?;

    debug!("Checking DB is writable");
    conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;

    let migrations = get_migrations()?;
    let ran = {
        let _span = span!(Level::INFO, "Running migrations").entered();

        let initial_version = schema_version(&migrations, &conn)?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| other_error!("Migrations::to_latest: {:?}", e))?;
        let final_version = schema_version(&migrations, &conn)?;

        final_version - initial_version
    };

    close_database(conn)?;

    Ok(ran)
}

/// Creates the connection pool. Every new connection gets the same pragmas
/// and tracing as the migration connection
pub fn create_pool(connection_string: &str) -> Result<Pool, ServerError<Nothing>> {
    Config::new(connection_string)
        .builder(Runtime::Tokio1)
        .map_err(|e| other_error!("Pool builder: {e}"))?
        .post_create(Hook::async_fn(|object, _| {
            Box::pin(async move {
                object
                    .interact(configure_new_connection)
                    .await
                    .map_err(ServerError::<Nothing>::from)??;
                Ok(())
            })
        }))
        .build()
        .map_err(|e| other_error!("Pool build: {e}"))
}

/// Removes the database along with its WAL files. Missing files are ignored
#[instrument]
pub fn delete_database(connection_string: &str) -> Result<(), ServerError<Nothing>> {
    for suffix in ["", "-wal", "-shm"] {
        let path = format!("{connection_string}{suffix}");
        match remove_file(&path) {
            Ok(()) => info!("Deleted {path}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => return Err(other_error!("Deleting {path}: {e}")),
        }
    }
    Ok(())
}

/// Runs an optimize on the database. Should be run periodically to keep the
/// database running optimally. It should be very fast if run regularly
#[instrument(skip(conn))]
pub fn optimize_database(conn: &Connection) -> Result<Duration, ServerError<Nothing>> {
    let start = Instant::now();
    conn.pragma_update(None, "analysis_limit", "400")?;
    conn.pragma_update(None, "optimize", "")?;

    Ok(start.elapsed())
}

#[instrument(skip(conn))]
pub fn close_database(conn: Connection) -> Result<(), ServerError<Nothing>> {
    let d1 = optimize_database(&conn)?;
    let d2 = vacuum_database(&conn)?;

    info!(
        "Optimize db took: {:.3}, vacuum took: {:.3}, total: {:.3}",
        d1.as_secs_f32(),
        d2.as_secs_f32(),
        (d1 + d2).as_secs_f32()
    );
    if let Err((_conn, e)) = conn.close() {
        Err(e)?;
    }

    Ok(())
}

// Vacuums the database to free up space and improve fragmentation
#[instrument(skip(conn))]
pub fn vacuum_database(conn: &Connection) -> Result<Duration, ServerError<Nothing>> {
    let start = Instant::now();
    conn.execute("VACUUM", ())?;
    Ok(start.elapsed())
}
