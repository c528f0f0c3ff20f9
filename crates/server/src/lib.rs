pub mod cli;
pub mod db;
pub mod extract;
pub mod routes;

mod utils;
pub use utils::*;

mod state;
pub use state::*;
