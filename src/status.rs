use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::grading;
use crate::models::{AssignmentRecord, SubmissionRecord};
use crate::policy::EnginePolicy;
use crate::urgency::{self, UrgencyTier};

/// Assignment lifecycle as staff see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StaffAssignmentStatus {
    Draft,
    Overdue,
    DueSoon,
    Active,
}

impl StaffAssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffAssignmentStatus::Draft => "draft",
            StaffAssignmentStatus::Overdue => "overdue",
            StaffAssignmentStatus::DueSoon => "dueSoon",
            StaffAssignmentStatus::Active => "active",
        }
    }
}

/// Assignment lifecycle as one student sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentAssignmentStatus {
    Pending,
    Submitted,
    Graded,
    Overdue,
}

impl StudentAssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudentAssignmentStatus::Pending => "pending",
            StudentAssignmentStatus::Submitted => "submitted",
            StudentAssignmentStatus::Graded => "graded",
            StudentAssignmentStatus::Overdue => "overdue",
        }
    }
}

/// Everything the student-facing row needs in one computed view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentView {
    pub status: StudentAssignmentStatus,
    /// Handed in after the deadline. An independent fact attached to
    /// `Submitted`/`Graded` rows; it never changes which status is
    /// returned, and late work is never rejected.
    pub is_late: bool,
    pub urgency: UrgencyTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_percent: Option<f64>,
    pub score_clamped: bool,
}

/// Staff projection, evaluated in order: unpublished drafts first, then
/// the urgency tier. `DueToday` reports as `Active`; the due-today signal
/// stays on the urgency tier.
pub fn staff_status(
    policy: &EnginePolicy,
    assignment: &AssignmentRecord,
    now: DateTime<Utc>,
) -> Result<StaffAssignmentStatus, EngineError> {
    assignment.validate()?;

    if !assignment.is_published {
        return Ok(StaffAssignmentStatus::Draft);
    }
    Ok(
        match urgency::classify_urgency(policy, assignment.due_date, now) {
            UrgencyTier::Overdue => StaffAssignmentStatus::Overdue,
            UrgencyTier::DueSoon => StaffAssignmentStatus::DueSoon,
            UrgencyTier::DueToday | UrgencyTier::Normal => StaffAssignmentStatus::Active,
        },
    )
}

/// Student projection over the same fact set, evaluated in order:
/// graded, then submitted, then overdue, then pending.
pub fn student_status(
    policy: &EnginePolicy,
    assignment: &AssignmentRecord,
    submission: Option<&SubmissionRecord>,
    now: DateTime<Utc>,
) -> Result<StudentAssignmentView, EngineError> {
    assignment.validate()?;
    if let Some(sub) = submission {
        sub.validate()?;
    }

    let tier = urgency::classify_urgency(policy, assignment.due_date, now);
    let submitted_at = submission.and_then(|s| s.submitted_at);
    let is_late = submitted_at
        .map(|at| at > assignment.due_date)
        .unwrap_or(false);

    if let Some(grade) = submission.and_then(|s| s.grade) {
        let normalized = grading::normalize_score(grade, assignment.max_points)?;
        return Ok(StudentAssignmentView {
            status: StudentAssignmentStatus::Graded,
            is_late,
            urgency: tier,
            graded_percent: Some(normalized.percent),
            score_clamped: normalized.clamped,
        });
    }

    if submitted_at.is_some() {
        return Ok(StudentAssignmentView {
            status: StudentAssignmentStatus::Submitted,
            is_late,
            urgency: tier,
            graded_percent: None,
            score_clamped: false,
        });
    }

    let status = if tier == UrgencyTier::Overdue {
        StudentAssignmentStatus::Overdue
    } else {
        StudentAssignmentStatus::Pending
    };
    Ok(StudentAssignmentView {
        status,
        is_late: false,
        urgency: tier,
        graded_percent: None,
        score_clamped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn assignment(due: DateTime<Utc>, published: bool) -> AssignmentRecord {
        AssignmentRecord {
            id: 1,
            course_id: 10,
            due_date: due,
            max_points: 50.0,
            is_published: published,
        }
    }

    fn submitted(at: DateTime<Utc>, grade: Option<f64>) -> SubmissionRecord {
        SubmissionRecord {
            id: 2,
            assignment_id: 1,
            submitted_at: Some(at),
            grade,
            feedback: None,
        }
    }

    #[test]
    fn unpublished_is_draft_regardless_of_deadline() {
        let now = noon();
        let a = assignment(now - Duration::days(5), false);
        let policy = EnginePolicy::default();
        assert_eq!(
            staff_status(&policy, &a, now).unwrap(),
            StaffAssignmentStatus::Draft
        );
    }

    #[test]
    fn due_today_reports_active_for_staff() {
        let now = noon();
        let a = assignment(now + Duration::hours(6), true);
        let policy = EnginePolicy::default();
        assert_eq!(
            staff_status(&policy, &a, now).unwrap(),
            StaffAssignmentStatus::Active
        );
    }

    #[test]
    fn grade_wins_over_overdue_in_student_view() {
        let now = noon();
        let a = assignment(now - Duration::days(2), true);
        let sub = submitted(now - Duration::days(3), Some(45.0));
        let view = student_status(&EnginePolicy::default(), &a, Some(&sub), now).unwrap();
        assert_eq!(view.status, StudentAssignmentStatus::Graded);
        assert_eq!(view.graded_percent, Some(90.0));
        assert!(!view.is_late);
    }

    #[test]
    fn late_flag_does_not_change_status() {
        let now = noon();
        let a = assignment(now - Duration::days(2), true);
        let sub = submitted(now - Duration::days(1), None);
        let view = student_status(&EnginePolicy::default(), &a, Some(&sub), now).unwrap();
        assert_eq!(view.status, StudentAssignmentStatus::Submitted);
        assert!(view.is_late);
    }

    #[test]
    fn missing_submission_past_due_is_overdue() {
        let now = noon();
        let a = assignment(now - Duration::days(1), true);
        let view = student_status(&EnginePolicy::default(), &a, None, now).unwrap();
        assert_eq!(view.status, StudentAssignmentStatus::Overdue);
        assert!(!view.is_late);
    }
}
