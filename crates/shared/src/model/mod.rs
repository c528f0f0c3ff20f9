mod user;
pub use user::*;

mod exercise;
pub use exercise::*;

use crate::api::error::ValidationError;

/// Turns a raw request payload into the value the route works with
pub trait ValidateModel {
    type Valid;

    fn validate(self) -> Result<Self::Valid, ValidationError>;
}
