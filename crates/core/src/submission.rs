//! Questionnaire submission input, validation, and participant codes.
//!
//! The survey page posts loosely typed JSON: numbers sometimes arrive as
//! strings and optional fields arrive as empty strings. [`validate_submission`]
//! turns that into a [`NewSubmission`] the recorder can persist without
//! further checks.

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Youngest accepted participant age.
pub const MIN_AGE: i32 = 1;

/// Oldest accepted participant age.
pub const MAX_AGE: i32 = 120;

/// Length of a generated participant code.
pub const PARTICIPANT_CODE_LENGTH: usize = 10;

/// Characters a participant code is drawn from.
pub const PARTICIPANT_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// How many codes the recorder tries before giving up on a collision streak.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Response text shown to the participant after a successful submission.
pub const SUBMISSION_THANKS: &str = "Thank you for your submission!";

// ---------------------------------------------------------------------------
// Wire input
// ---------------------------------------------------------------------------

/// Body of `POST /submit` as sent by the survey page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub highest_education: Option<String>,
    pub submitted_before: Option<bool>,
    pub feedback: Option<String>,
    #[serde(default)]
    pub results: Vec<ResponseForm>,
}

/// One rated sample inside a [`SubmissionForm`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseForm {
    pub sound_code: Option<String>,
    pub emotion1: Option<String>,
    pub rating1: Option<Value>,
    pub emotion2: Option<String>,
    pub rating2: Option<Value>,
}

// ---------------------------------------------------------------------------
// Validated input
// ---------------------------------------------------------------------------

/// A submission that passed validation and is ready to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub age: i32,
    pub gender: String,
    pub education_level: String,
    pub prior_participation: bool,
    pub feedback: Option<String>,
    pub responses: Vec<NewResponse>,
}

/// A validated response to a single sample.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
    pub sample_id: String,
    pub emotion_primary: String,
    pub rating_primary: f64,
    pub emotion_secondary: Option<String>,
    pub rating_secondary: Option<f64>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw submission form.
///
/// Checks:
/// - `age` is an integer (or integer string) in `MIN_AGE..=MAX_AGE`
/// - `gender` and `highest_education` are present and non-blank
/// - every result names a sample, a primary emotion, and a numeric primary rating
/// - secondary rating, when present, is numeric
pub fn validate_submission(form: &SubmissionForm) -> Result<NewSubmission, CoreError> {
    let age = parse_age(form.age.as_ref())?;
    let gender = required_text(form.gender.as_deref(), "gender")?;
    let education_level = required_text(form.highest_education.as_deref(), "highest_education")?;

    let responses = form
        .results
        .iter()
        .enumerate()
        .map(|(index, result)| validate_response(index, result))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NewSubmission {
        age,
        gender,
        education_level,
        prior_participation: form.submitted_before.unwrap_or(false),
        feedback: optional_text(form.feedback.as_deref()),
        responses,
    })
}

fn validate_response(index: usize, form: &ResponseForm) -> Result<NewResponse, CoreError> {
    let field = |name: &str| format!("results[{index}].{name}");

    let sample_id = required_text(form.sound_code.as_deref(), &field("sound_code"))?;
    let emotion_primary = required_text(form.emotion1.as_deref(), &field("emotion1"))?;
    let rating_primary = match form.rating1.as_ref() {
        Some(value) if !is_blank(value) => parse_rating(value, &field("rating1"))?,
        _ => {
            return Err(CoreError::Validation(format!(
                "{} is required",
                field("rating1")
            )))
        }
    };

    let rating_secondary = match form.rating2.as_ref() {
        Some(value) if !is_blank(value) => Some(parse_rating(value, &field("rating2"))?),
        _ => None,
    };

    Ok(NewResponse {
        sample_id,
        emotion_primary,
        rating_primary,
        emotion_secondary: optional_text(form.emotion2.as_deref()),
        rating_secondary,
    })
}

/// Validate that an age falls within `MIN_AGE..=MAX_AGE`.
pub fn validate_age(age: i64) -> Result<i32, CoreError> {
    if !(i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&age) {
        return Err(CoreError::Validation(format!(
            "age must be between {MIN_AGE} and {MAX_AGE}, got {age}"
        )));
    }
    // In range, so the narrowing cannot truncate.
    Ok(age as i32)
}

fn parse_age(value: Option<&Value>) -> Result<i32, CoreError> {
    let invalid = || CoreError::Validation("age must be an integer".to_string());

    let age = match value {
        None | Some(Value::Null) => {
            return Err(CoreError::Validation("age is required".to_string()))
        }
        Some(Value::Number(n)) => match n.as_i64() {
            Some(age) => age,
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
                .ok_or_else(invalid)?,
        },
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };

    validate_age(age)
}

fn parse_rating(value: &Value, field: &str) -> Result<f64, CoreError> {
    let invalid = || CoreError::Validation(format!("{field} must be a number"));

    let rating = match value {
        Value::Number(n) => n.as_f64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if !rating.is_finite() {
        return Err(invalid());
    }
    Ok(rating)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, CoreError> {
    optional_text(value).ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Participant codes
// ---------------------------------------------------------------------------

/// Generate a random participant code of [`PARTICIPANT_CODE_LENGTH`]
/// characters from [`PARTICIPANT_CODE_ALPHABET`].
///
/// Uniqueness is enforced by the database; callers retry on conflict.
pub fn generate_participant_code() -> String {
    let mut rng = rand::rng();
    (0..PARTICIPANT_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..PARTICIPANT_CODE_ALPHABET.len());
            char::from(PARTICIPANT_CODE_ALPHABET[idx])
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
