//! Record shapes consumed verbatim from the backend (snake_case JSON,
//! ISO-8601 timestamps). The engine never mutates these, it only reads
//! them. Hard invariants the classifiers depend on live in the `validate`
//! methods, which the classifiers call before doing any work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

fn parse_record<T>(kind: &str, raw: &serde_json::Value) -> Result<T, EngineError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(raw.clone()).map_err(|e| {
        EngineError::malformed_record(format!("bad {kind} record: {e}"))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: i64,
    pub course_id: i64,
    pub due_date: DateTime<Utc>,
    pub max_points: f64,
    pub is_published: bool,
}

impl AssignmentRecord {
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, EngineError> {
        let record: Self = parse_record("assignment", raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.max_points.is_finite() || self.max_points <= 0.0 {
            return Err(EngineError::malformed_record(format!(
                "assignment {} has non-positive max_points {}",
                self.id, self.max_points
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub assignment_id: i64,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl SubmissionRecord {
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, EngineError> {
        let record: Self = parse_record("submission", raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        // A grade can only exist for work that was handed in.
        if self.grade.is_some() && self.submitted_at.is_none() {
            return Err(EngineError::malformed_record(format!(
                "submission {} has a grade but no submitted_at",
                self.id
            )));
        }
        if let Some(grade) = self.grade {
            if !grade.is_finite() {
                return Err(EngineError::malformed_record(format!(
                    "submission {} has non-finite grade",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub id: i64,
    pub course_id: i64,
    /// Minutes a started attempt may run; enforced by the quiz runner,
    /// carried here as a validated fact.
    pub time_limit: i64,
    pub max_attempts: i64,
    pub is_published: bool,
}

impl QuizRecord {
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, EngineError> {
        let record: Self = parse_record("quiz", raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_attempts < 1 {
            return Err(EngineError::malformed_record(format!(
                "quiz {} has max_attempts {}, expected at least 1",
                self.id, self.max_attempts
            )));
        }
        if self.time_limit < 1 {
            return Err(EngineError::malformed_record(format!(
                "quiz {} has non-positive time_limit {}",
                self.id, self.time_limit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub id: i64,
    pub attempt_number: i64,
    #[serde(default)]
    pub score: Option<f64>,
    pub total_points: f64,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuizAttemptRecord {
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, EngineError> {
        let record: Self = parse_record("quiz attempt", raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.attempt_number < 1 {
            return Err(EngineError::malformed_record(format!(
                "attempt {} has attempt_number {}, numbering starts at 1",
                self.id, self.attempt_number
            )));
        }
        if let Some(score) = self.score {
            if !score.is_finite() {
                return Err(EngineError::malformed_record(format!(
                    "attempt {} has non-finite score",
                    self.id
                )));
            }
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Enrolled,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => "enrolled",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Dropped => "dropped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub student_id: i64,
    pub course_id: i64,
    pub semester_id: i64,
    pub status: EnrollmentStatus,
    pub credit_hours: f64,
}

impl EnrollmentRecord {
    pub fn from_json(raw: &serde_json::Value) -> Result<Self, EngineError> {
        let record: Self = parse_record("enrollment", raw)?;
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.credit_hours.is_finite() || self.credit_hours < 0.0 {
            return Err(EngineError::malformed_record(format!(
                "enrollment for course {} has bad credit_hours {}",
                self.course_id, self.credit_hours
            )));
        }
        Ok(())
    }
}
