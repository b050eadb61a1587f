use serde::Serialize;

use crate::error::EngineError;
use crate::grading;
use crate::models::EnrollmentStatus;
use crate::policy::EnginePolicy;

/// One graded assessment (assignment or quiz) feeding a course roll-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradedScore {
    pub score: f64,
    pub max_points: f64,
}

/// Course-level snapshot for one student. Derived, not authoritative:
/// recomputed from current facts on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGradeSummary {
    pub course_id: i64,
    pub student_id: i64,
    /// `None` means no graded work yet, which is not the same as 0%.
    pub current_percent: Option<f64>,
    pub letter_grade: Option<String>,
    pub assignments_completed: usize,
    pub assignments_total: usize,
    /// How many scores had to be clamped into range. Surfaced so the data
    /// problem is visible to the caller instead of vanishing into a mean.
    pub clamped_count: usize,
}

/// A course's outcome feeding the semester roll-up.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOutcome {
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub credit_hours: f64,
    /// Final letter for completed courses; absent while still enrolled.
    pub letter_grade: Option<String>,
}

/// Semester-level snapshot for one student. Derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterSummary {
    pub semester_id: i64,
    pub student_id: i64,
    /// `None` when no completed course carries credit yet.
    pub gpa: Option<f64>,
    pub credits_earned: f64,
    pub credits_total: f64,
    pub completion_percent: f64,
    pub standing: AcademicStanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AcademicStanding {
    DeansList,
    Good,
    Probation,
}

impl AcademicStanding {
    pub fn as_str(self) -> &'static str {
        match self {
            AcademicStanding::DeansList => "deansList",
            AcademicStanding::Good => "good",
            AcademicStanding::Probation => "probation",
        }
    }
}

/// Arithmetic mean of normalized percentages over all graded records.
/// Empty input is `None`: "no grade yet" must stay distinct from 0%.
pub fn course_current_grade(records: &[GradedScore]) -> Result<Option<f64>, EngineError> {
    if records.is_empty() {
        return Ok(None);
    }
    let mut sum = 0.0;
    for record in records {
        sum += grading::normalize_score(record.score, record.max_points)?.percent;
    }
    Ok(Some(sum / records.len() as f64))
}

pub fn course_summary(
    policy: &EnginePolicy,
    course_id: i64,
    student_id: i64,
    graded: &[GradedScore],
    assignments_total: usize,
) -> Result<CourseGradeSummary, EngineError> {
    let mut sum = 0.0;
    let mut clamped_count = 0;
    for record in graded {
        let normalized = grading::normalize_score(record.score, record.max_points)?;
        sum += normalized.percent;
        if normalized.clamped {
            clamped_count += 1;
        }
    }

    let current_percent = if graded.is_empty() {
        None
    } else {
        Some(sum / graded.len() as f64)
    };
    let letter_grade = match current_percent {
        Some(percent) => Some(grading::letter_for_percent(policy, percent)?.letter.clone()),
        None => None,
    };

    Ok(CourseGradeSummary {
        course_id,
        student_id,
        current_percent,
        letter_grade,
        assignments_completed: graded.len(),
        assignments_total,
        clamped_count,
    })
}

/// Standing tier for a semester GPA. `None` (no completed coursework yet)
/// reports as good standing.
pub fn academic_standing(policy: &EnginePolicy, gpa: Option<f64>) -> AcademicStanding {
    match gpa {
        Some(g) if g >= policy.deans_list_min_gpa => AcademicStanding::DeansList,
        Some(g) if g < policy.good_standing_min_gpa => AcademicStanding::Probation,
        _ => AcademicStanding::Good,
    }
}

/// Credit-hour-weighted GPA over completed courses. Courses still
/// enrolled count toward `credits_total` but not the GPA; dropped courses
/// count toward neither. Credits are earned by completed courses whose
/// letter carries points.
pub fn semester_gpa(
    policy: &EnginePolicy,
    semester_id: i64,
    student_id: i64,
    courses: &[CourseOutcome],
) -> Result<SemesterSummary, EngineError> {
    let mut weighted_points = 0.0;
    let mut completed_hours = 0.0;
    let mut credits_earned = 0.0;
    let mut credits_total = 0.0;

    for course in courses {
        if !course.credit_hours.is_finite() || course.credit_hours < 0.0 {
            return Err(EngineError::malformed_record(format!(
                "course {} has bad credit_hours {}",
                course.course_id, course.credit_hours
            )));
        }
        match course.status {
            EnrollmentStatus::Dropped => {}
            EnrollmentStatus::Enrolled => {
                credits_total += course.credit_hours;
            }
            EnrollmentStatus::Completed => {
                let Some(letter) = course.letter_grade.as_deref() else {
                    return Err(EngineError::malformed_record(format!(
                        "completed course {} has no final letter grade",
                        course.course_id
                    )));
                };
                let points = grading::points_for_letter(policy, letter)?;
                credits_total += course.credit_hours;
                completed_hours += course.credit_hours;
                weighted_points += points * course.credit_hours;
                if points > 0.0 {
                    credits_earned += course.credit_hours;
                }
            }
        }
    }

    let gpa = if completed_hours > 0.0 {
        Some(weighted_points / completed_hours)
    } else {
        None
    };
    let completion_percent = if credits_total > 0.0 {
        credits_earned / credits_total * 100.0
    } else {
        0.0
    };

    Ok(SemesterSummary {
        semester_id,
        student_id,
        gpa,
        credits_earned,
        credits_total,
        completion_percent,
        standing: academic_standing(policy, gpa),
    })
}
