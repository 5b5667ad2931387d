//! Participant Models
//! Mission: Typed participant records and their field-level update rules

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Trial arm assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StudyGroup {
    #[serde(rename = "treatment")]
    Treatment,
    #[serde(rename = "control")]
    Control,
}

impl StudyGroup {
    pub fn as_str(&self) -> &str {
        match self {
            StudyGroup::Treatment => "treatment",
            StudyGroup::Control => "control",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "treatment" => Some(StudyGroup::Treatment),
            "control" => Some(StudyGroup::Control),
            _ => None,
        }
    }
}

/// Participation status. Only active and completed count toward metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParticipantStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "withdrawn")]
    Withdrawn,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ParticipantStatus::Active => "active",
            ParticipantStatus::Completed => "completed",
            ParticipantStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ParticipantStatus::Active),
            "completed" => Some(ParticipantStatus::Completed),
            "withdrawn" => Some(ParticipantStatus::Withdrawn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    M,
    F,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
            Gender::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Gender::M),
            "F" => Some(Gender::F),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// A trial participant record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Participant {
    pub participant_id: Uuid,
    pub subject_id: String,
    pub study_group: StudyGroup,
    pub enrollment_date: NaiveDate,
    pub status: ParticipantStatus,
    pub age: i64,
    pub gender: Gender,
}

impl Participant {
    /// Apply one update field through an explicit typed-setter mapping.
    ///
    /// Unknown field names are rejected rather than silently ignored, and the
    /// identifiers are immutable. Type checks always apply; the enrollment
    /// rules (age range etc.) are the repository's concern.
    pub fn apply_field(
        &mut self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(), ParticipantError> {
        match name {
            "participant_id" => Err(ParticipantError::ImmutableField("participant_id")),
            "subject_id" => Err(ParticipantError::ImmutableField("subject_id")),
            "study_group" => {
                self.study_group = parse_field(value, "study_group")?;
                Ok(())
            }
            "enrollment_date" => {
                self.enrollment_date = parse_field(value, "enrollment_date")?;
                Ok(())
            }
            "status" => {
                self.status = parse_field(value, "status")?;
                Ok(())
            }
            "age" => {
                self.age = parse_field(value, "age")?;
                Ok(())
            }
            "gender" => {
                self.gender = parse_field(value, "gender")?;
                Ok(())
            }
            other => Err(ParticipantError::UnknownField(other.to_string())),
        }
    }
}

fn parse_field<T: DeserializeOwned>(
    value: &serde_json::Value,
    field: &'static str,
) -> Result<T, ParticipantError> {
    serde_json::from_value(value.clone()).map_err(|_| ParticipantError::InvalidFieldValue(field))
}

/// Creation request: participant fields minus the generated identifier.
///
/// `study_group` arrives as a plain string so the membership rule can reject
/// bad values with its own error code instead of a generic decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantCreate {
    pub subject_id: String,
    pub study_group: String,
    pub enrollment_date: NaiveDate,
    pub status: ParticipantStatus,
    pub age: i64,
    pub gender: Gender,
}

/// Domain errors for the participant layer.
#[derive(Debug)]
pub enum ParticipantError {
    DuplicateSubjectId,
    InvalidAge,
    InvalidStudyGroup,
    NotFound,
    UnknownField(String),
    ImmutableField(&'static str),
    InvalidFieldValue(&'static str),
    Storage(anyhow::Error),
}

impl ParticipantError {
    /// Machine-readable code for validation failures.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            ParticipantError::DuplicateSubjectId => Some("DUPLICATE_SUBJECT_ID"),
            ParticipantError::InvalidAge => Some("INVALID_AGE"),
            ParticipantError::InvalidStudyGroup => Some("INVALID_STUDY_GROUP"),
            ParticipantError::UnknownField(_) => Some("UNKNOWN_FIELD"),
            ParticipantError::ImmutableField(_) => Some("IMMUTABLE_FIELD"),
            ParticipantError::InvalidFieldValue(_) => Some("INVALID_FIELD_VALUE"),
            ParticipantError::NotFound | ParticipantError::Storage(_) => None,
        }
    }
}

impl std::fmt::Display for ParticipantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantError::DuplicateSubjectId => write!(f, "Subject ID already exists"),
            ParticipantError::InvalidAge => write!(f, "Age must be between 18 and 100"),
            ParticipantError::InvalidStudyGroup => {
                write!(f, "Study group must be 'treatment' or 'control'")
            }
            ParticipantError::NotFound => write!(f, "Participant not found"),
            ParticipantError::UnknownField(name) => write!(f, "Unknown field: {}", name),
            ParticipantError::ImmutableField(name) => {
                write!(f, "Field '{}' cannot be updated", name)
            }
            ParticipantError::InvalidFieldValue(name) => {
                write!(f, "Invalid value for field '{}'", name)
            }
            ParticipantError::Storage(source) => write!(f, "Storage error: {}", source),
        }
    }
}

impl std::error::Error for ParticipantError {}
