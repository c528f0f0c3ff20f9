mod create_user;
pub use create_user::*;

mod list_users;
pub use list_users::*;
