//! Field validation for job records.
//!
//! Runs on every job extracted from a document, before its natural key is
//! computed. Checks are ordered: presence of the natural key first, then
//! `depCode`, `depJob` and `description` lengths.

use crate::model::Job;

/// Maximum length of `depCode`, in characters.
pub const MAX_DEP_CODE_LEN: usize = 20;

/// Maximum length of `depJob`, in characters.
pub const MAX_DEP_JOB_LEN: usize = 100;

/// Maximum length of `description`, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A semantic field violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing natural key")]
    MissingNaturalKey,

    #[error("depCode too long ({len} > {MAX_DEP_CODE_LEN}): '{value}'")]
    DepCodeTooLong { value: String, len: usize },

    #[error("depJob too long ({len} > {MAX_DEP_JOB_LEN}): '{value}'")]
    DepJobTooLong { value: String, len: usize },

    #[error("description too long ({len} > {MAX_DESCRIPTION_LEN})")]
    DescriptionTooLong { len: usize },
}

/// Fields of a job as extracted from a document, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFields {
    pub dep_code: Option<String>,
    pub dep_job: Option<String>,
    pub description: Option<String>,
}

/// Validate extracted fields and build an unpersisted [`Job`].
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_job(fields: JobFields) -> Result<Job, ValidationError> {
    let (Some(dep_code), Some(dep_job)) = (fields.dep_code, fields.dep_job) else {
        return Err(ValidationError::MissingNaturalKey);
    };

    let len = char_len(&dep_code);
    if len > MAX_DEP_CODE_LEN {
        return Err(ValidationError::DepCodeTooLong { value: dep_code, len });
    }

    let len = char_len(&dep_job);
    if len > MAX_DEP_JOB_LEN {
        return Err(ValidationError::DepJobTooLong { value: dep_job, len });
    }

    if let Some(description) = &fields.description {
        let len = char_len(description);
        if len > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooLong { len });
        }
    }

    Ok(Job::new(dep_code, dep_job, fields.description))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
