use serde::Serialize;

use crate::error::EngineError;
use crate::grading::{self, NormalizedScore};
use crate::models::{QuizAttemptRecord, QuizRecord};

/// Quiz lifecycle for one student, derived from attempt history and the
/// publication flag. Recomputed fresh from facts on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QuizState {
    Available,
    InProgress,
    Completed,
    Expired,
}

impl QuizState {
    pub fn as_str(self) -> &'static str {
        match self {
            QuizState::Available => "available",
            QuizState::InProgress => "inProgress",
            QuizState::Completed => "completed",
            QuizState::Expired => "expired",
        }
    }
}

fn in_progress_count(
    quiz: &QuizRecord,
    attempts: &[QuizAttemptRecord],
) -> Result<usize, EngineError> {
    let open = attempts.iter().filter(|a| !a.is_completed()).count();
    if open > 1 {
        return Err(EngineError::malformed_record(format!(
            "quiz {} has {open} attempts in progress at once, expected at most 1",
            quiz.id
        )));
    }
    Ok(open)
}

/// Evaluated in order: unpublished quizzes are `Expired`, an open attempt
/// means `InProgress`, a spent attempt budget means `Completed`, otherwise
/// `Available`. In-progress attempts occupy a slot, but the `InProgress`
/// check runs first so the `Completed` threshold only ever counts finished
/// attempts.
pub fn quiz_state(
    quiz: &QuizRecord,
    attempts: &[QuizAttemptRecord],
) -> Result<QuizState, EngineError> {
    quiz.validate()?;
    for attempt in attempts {
        attempt.validate()?;
    }
    let open = in_progress_count(quiz, attempts)?;

    if !quiz.is_published {
        return Ok(QuizState::Expired);
    }
    if open > 0 {
        return Ok(QuizState::InProgress);
    }
    if attempts.len() as i64 >= quiz.max_attempts {
        return Ok(QuizState::Completed);
    }
    Ok(QuizState::Available)
}

/// Read-side gate: decides whether to *offer* a new attempt. The limit
/// itself is enforced by the system of record with an atomic
/// check-and-insert keyed on (student, quiz); two simultaneous starts
/// racing for the last slot cannot be told apart from here.
pub fn can_start(
    quiz: &QuizRecord,
    attempts: &[QuizAttemptRecord],
) -> Result<bool, EngineError> {
    Ok(quiz_state(quiz, attempts)? == QuizState::Available)
}

/// Attempt slots still open, for the "attempt N of M" label.
pub fn attempts_remaining(
    quiz: &QuizRecord,
    attempts: &[QuizAttemptRecord],
) -> Result<i64, EngineError> {
    quiz.validate()?;
    Ok((quiz.max_attempts - attempts.len() as i64).max(0))
}

/// Best normalized score across completed, scored attempts. `None` when
/// nothing qualifies; a student with no attempts is not a student who
/// scored zero. In-progress and unscored attempts are skipped.
pub fn best_score(
    attempts: &[QuizAttemptRecord],
) -> Result<Option<NormalizedScore>, EngineError> {
    let mut best: Option<NormalizedScore> = None;
    for attempt in attempts {
        attempt.validate()?;
        if !attempt.is_completed() {
            continue;
        }
        let Some(score) = attempt.score else {
            continue;
        };
        let normalized = grading::normalize_score(score, attempt.total_points)?;
        if best.map(|b| normalized.percent > b.percent).unwrap_or(true) {
            best = Some(normalized);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn quiz(max_attempts: i64, published: bool) -> QuizRecord {
        QuizRecord {
            id: 9,
            course_id: 4,
            time_limit: 30,
            max_attempts,
            is_published: published,
        }
    }

    fn done_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 10, 30, 0).unwrap()
    }

    fn completed(number: i64, score: Option<f64>) -> QuizAttemptRecord {
        QuizAttemptRecord {
            id: number,
            attempt_number: number,
            score,
            total_points: 20.0,
            completed_at: Some(done_at()),
        }
    }

    fn open_attempt(number: i64) -> QuizAttemptRecord {
        QuizAttemptRecord {
            id: number,
            attempt_number: number,
            score: None,
            total_points: 20.0,
            completed_at: None,
        }
    }

    #[test]
    fn unpublished_quiz_is_expired_even_mid_attempt() {
        let attempts = vec![open_attempt(1)];
        assert_eq!(
            quiz_state(&quiz(2, false), &attempts).unwrap(),
            QuizState::Expired
        );
    }

    #[test]
    fn open_attempt_means_in_progress_and_blocks_the_gate() {
        let attempts = vec![completed(1, Some(15.0)), open_attempt(2)];
        let q = quiz(3, true);
        assert_eq!(quiz_state(&q, &attempts).unwrap(), QuizState::InProgress);
        assert!(!can_start(&q, &attempts).unwrap());
    }

    #[test]
    fn spent_budget_means_completed() {
        let attempts = vec![completed(1, Some(10.0)), completed(2, Some(12.0))];
        let q = quiz(2, true);
        assert_eq!(quiz_state(&q, &attempts).unwrap(), QuizState::Completed);
        assert!(!can_start(&q, &attempts).unwrap());
        assert_eq!(attempts_remaining(&q, &attempts).unwrap(), 0);
    }

    #[test]
    fn two_open_attempts_is_malformed() {
        let attempts = vec![open_attempt(1), open_attempt(2)];
        let err = quiz_state(&quiz(3, true), &attempts).expect_err("double open");
        assert_eq!(err.code, "malformed_record");
    }

    #[test]
    fn best_score_skips_open_and_unscored_attempts() {
        let attempts = vec![
            completed(1, Some(10.0)),
            completed(2, None),
            open_attempt(3),
        ];
        let best = best_score(&attempts).unwrap().expect("one scored attempt");
        assert_eq!(best.percent, 50.0);
    }

    #[test]
    fn no_completed_attempts_is_no_score_not_zero() {
        assert!(best_score(&[]).unwrap().is_none());
        assert!(best_score(&[open_attempt(1)]).unwrap().is_none());
    }
}
