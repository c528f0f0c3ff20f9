use const_format::concatcp;

pub mod error;
pub mod payloads;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    Users,
    UserExercises,
    UserLogs,
}

impl Object {
    pub const fn path(&self) -> &'static str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            Users => concatcp!(API_BASE_PATH, "users"),
            UserExercises => concatcp!(API_BASE_PATH, "users/:id/exercises"),
            UserLogs => concatcp!(API_BASE_PATH, "users/:id/logs"),
        }
    }

    /// Fills in the `:id` segment of the path
    pub fn id_path<T: AsRef<str>>(&self, id: T) -> String {
        self.path().replace(":id", id.as_ref())
    }
}
