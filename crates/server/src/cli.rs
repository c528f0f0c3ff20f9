use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "exercise tracker server")]
pub struct Cli {
    #[clap(long, env, default_value = "public")]
    pub assets_dir: PathBuf,
    /// Page served at `/`
    #[clap(long, env, default_value = "views/index.html")]
    pub index_file: PathBuf,
    #[clap(long, env, default_value = "exercise.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "3000")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Origin allowed to make cross origin requests. Any origin is allowed if
    /// this isn't set
    #[arg(long, env)]
    pub cors_origin: Option<String>,
    #[arg(long, env, default_value = "16384")]
    pub request_body_limit_bytes: usize,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}
