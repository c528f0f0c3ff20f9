use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::{Nothing, ServerError};

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            #[error($message:literal)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error($message)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl $name {
            pub fn code(&self) -> StatusCode {
                match self {
                    $( $name::$variant { .. } => $variant_code, )*
                }
            }
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = inner.code();
                Self::Inner { code, inner }
            }
        }
    };
}

// 400 rather than 404 to stay compatible with existing clients of the api
response_error!(UserLookupError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("User not found")]
    UserNotFound,
});

// Aliases used to allow future expansion of the errors without having to go
// back and update all routes that use them
pub type CreateUserError = Nothing;
pub type FetchError = Nothing;
pub type AddExerciseError = UserLookupError;
pub type ExerciseLogError = UserLookupError;
