use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CourseId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course owned by a single user. Lessons hang off it by `CourseId`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    user_id: UserId,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Course {
    /// Creates a new course.
    ///
    /// Title and description are trimmed; a blank description is stored as `None`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: CourseId,
        user_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        Ok(Self {
            id,
            user_id,
            title: normalize_title(title.into())?,
            description: normalize_description(description),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a course from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the stored title is blank.
    pub fn from_persisted(
        id: CourseId,
        user_id: UserId,
        title: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        Ok(Self {
            id,
            user_id,
            title: normalize_title(title)?,
            description: normalize_description(description),
            created_at,
            updated_at,
        })
    }

    /// Applies a partial update. `description: Some(None)` clears it.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if a new title is blank. The course is
    /// left unchanged in that case.
    pub fn update(
        &mut self,
        title: Option<String>,
        description: Option<Option<String>>,
        now: DateTime<Utc>,
    ) -> Result<(), CourseError> {
        let title = title.map(normalize_title).transpose()?;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = normalize_description(description);
        }
        self.updated_at = now;
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn normalize_title(title: String) -> Result<String, CourseError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CourseError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build(title: &str, description: Option<&str>) -> Result<Course, CourseError> {
        Course::new(
            CourseId::new(1),
            UserId::new(1),
            title,
            description.map(str::to_owned),
            fixed_now(),
        )
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(build("   ", None).unwrap_err(), CourseError::EmptyTitle);
    }

    #[test]
    fn title_and_description_are_trimmed() {
        let course = build("  Rust  ", Some("  ownership  ")).unwrap();
        assert_eq!(course.title(), "Rust");
        assert_eq!(course.description(), Some("ownership"));
    }

    #[test]
    fn blank_description_becomes_none() {
        let course = build("Rust", Some("   ")).unwrap();
        assert_eq!(course.description(), None);
    }

    #[test]
    fn update_keeps_course_on_invalid_title() {
        let mut course = build("Rust", Some("intro")).unwrap();
        let later = fixed_now() + Duration::hours(1);

        let err = course.update(Some(" ".into()), None, later).unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
        assert_eq!(course.title(), "Rust");
        assert_eq!(course.updated_at(), fixed_now());

        course.update(None, Some(None), later).unwrap();
        assert_eq!(course.description(), None);
        assert_eq!(course.updated_at(), later);
    }
}
