use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{NewUser, User, ValidateModel},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
}

impl CreateUserRequest {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self {
            username: Some(username.into()),
        }
    }
}

impl ValidateModel for CreateUserRequest {
    type Valid = NewUser;

    /// Usernames only have to be present. Empty and duplicate names are allowed
    fn validate(self) -> Result<NewUser, ValidationError> {
        match self.username {
            Some(username) => Ok(NewUser::new(Uuid::new_v4(), username)),
            None => Err(ValidationError::new("username is required")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

impl From<&User> for CreateUserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            id: user.id,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_username_is_rejected() {
        let req: CreateUserRequest = serde_json::from_str("{}").unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.error_messages, vec!["username is required"]);
    }

    #[test]
    fn test_empty_username_is_allowed() {
        let new_user = CreateUserRequest::new("").validate().unwrap();
        assert_eq!(new_user.username, "");
    }

    #[test]
    fn test_each_new_user_gets_a_fresh_id() {
        let a = CreateUserRequest::new("fcc_test").validate().unwrap();
        let b = CreateUserRequest::new("fcc_test").validate().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_response_uses_underscore_id() {
        let id = Uuid::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let res = CreateUserResponse {
            username: "fcc_test".to_string(),
            id,
        };
        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            serde_json::json!({
                "username": "fcc_test",
                "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            })
        );
    }
}
