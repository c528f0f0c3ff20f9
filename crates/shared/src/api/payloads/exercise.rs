use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{Exercise, ExerciseDetails, ExerciseFilter, User, ValidateModel},
    types::{display_date, parse_input_date, today, Uuid},
};

/// Html forms send everything as strings, json clients may send a number.
/// Anything else is kept so validation can report it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    String(String),
    Other(serde_json::Value),
}

impl fmt::Display for NumberOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrString::Number(n) => n.fmt(f),
            NumberOrString::String(s) => s.fmt(f),
            NumberOrString::Other(v) => v.fmt(f),
        }
    }
}

impl From<i64> for NumberOrString {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NumberOrString {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddExerciseRequest {
    pub description: Option<String>,
    pub duration: Option<NumberOrString>,
    pub date: Option<String>,
}

impl AddExerciseRequest {
    pub fn new<D: Into<String>, N: Into<NumberOrString>>(description: D, duration: N) -> Self {
        Self {
            description: Some(description.into()),
            duration: Some(duration.into()),
            date: None,
        }
    }

    pub fn with_date<T: Into<String>>(mut self, date: T) -> Self {
        self.date = Some(date.into());
        self
    }
}

impl ValidateModel for AddExerciseRequest {
    type Valid = ExerciseDetails;

    fn validate(self) -> Result<ExerciseDetails, ValidationError> {
        let mut errors = ValidationError::default();

        let description = non_empty(self.description);
        if description.is_none() {
            errors.push("description is required");
        }

        let duration = match self.duration {
            None => {
                errors.push("duration is required");
                None
            },
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::String(s)) if s.trim().is_empty() => {
                errors.push("duration is required");
                None
            },
            Some(NumberOrString::String(s)) => match s.trim().parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.push(format!(
                        "duration must be a whole number of minutes, got '{s}'"
                    ));
                    None
                },
            },
            Some(other @ NumberOrString::Other(_)) => {
                errors.push(format!(
                    "duration must be a whole number of minutes, got '{other}'"
                ));
                None
            },
        };

        // Missing dates default to today
        let date = match non_empty(self.date) {
            None => Some(today()),
            Some(d) => match parse_input_date(&d) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(format!(
                        "date must be formatted as YYYY-MM-DD, got '{d}'"
                    ));
                    None
                },
            },
        };

        errors.into_result()?;

        match (description, duration, date) {
            (Some(description), Some(duration), Some(date)) => Ok(ExerciseDetails {
                description,
                duration,
                date,
            }),
            // Every None pushed a message above
            _ => Err(ValidationError::new("invalid exercise")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddExerciseResponse {
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
    /// The id of the user the exercise was logged against
    #[serde(rename = "_id")]
    pub id: Uuid,
}

impl AddExerciseResponse {
    pub fn new(user: &User, exercise: &Exercise) -> Self {
        Self {
            username: user.username.clone(),
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: display_date(&exercise.date),
            id: user.id,
        }
    }
}

/// Raw query string of the log route. Everything is kept as a string so bad
/// values get a validation error instead of a generic rejection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl ValidateModel for ExerciseLogQuery {
    type Valid = ExerciseFilter;

    fn validate(self) -> Result<ExerciseFilter, ValidationError> {
        let mut errors = ValidationError::default();
        let mut filter = ExerciseFilter::default();

        for (name, value, bound) in [
            ("from", self.from, &mut filter.from),
            ("to", self.to, &mut filter.to),
        ] {
            if let Some(value) = non_empty(value) {
                match parse_input_date(&value) {
                    Ok(date) => *bound = Some(date),
                    Err(_) => errors.push(format!(
                        "{name} must be formatted as YYYY-MM-DD, got '{value}'"
                    )),
                }
            }
        }

        if let Some(value) = non_empty(self.limit) {
            // Bound by what sqlite can bind as a LIMIT
            match value.trim().parse::<u32>() {
                // 0 means no limit
                Ok(0) => {},
                Ok(limit) => filter.limit = Some(limit.into()),
                Err(_) => errors.push(format!(
                    "limit must be a non-negative whole number, got '{value}'"
                )),
            }
        }

        errors.into_result()?;
        Ok(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<&Exercise> for ExerciseLogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: display_date(&exercise.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub log: Vec<ExerciseLogEntry>,
}

impl ExerciseLogResponse {
    pub fn new(user: &User, exercises: &[Exercise]) -> Self {
        let log: Vec<ExerciseLogEntry> = exercises.iter().map(ExerciseLogEntry::from).collect();
        Self {
            username: user.username.clone(),
            count: log.len(),
            id: user.id,
            log,
        }
    }
}
