use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson status, completed flag and completion timestamp disagree")]
    InconsistentCompletion,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown lesson status: {0:?}")]
pub struct ParseStatusError(String);

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Kanban column a lesson sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LessonStatus {
    #[default]
    Planned,
    #[serde(alias = "progress")]
    InProgress,
    Completed,
}

impl LessonStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::Planned => "planned",
            LessonStatus::InProgress => "in-progress",
            LessonStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "planned" => Ok(Self::Planned),
            "in-progress" | "progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A unit of work inside a course.
///
/// `completed_at` is set exactly when the lesson is completed; the dashboard
/// streak is derived from those timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    course_id: CourseId,
    title: String,
    status: LessonStatus,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Lesson {
    /// Creates a new planned lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        course_id: CourseId,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, LessonError> {
        Ok(Self {
            id,
            course_id,
            title: normalize_title(title.into())?,
            status: LessonStatus::Planned,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrate a lesson from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` for a blank title, or
    /// `LessonError::InconsistentCompletion` when `completed`, `completed_at`
    /// and a `Completed` status do not all agree.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: LessonId,
        course_id: CourseId,
        title: String,
        status: LessonStatus,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, LessonError> {
        if completed != completed_at.is_some() || completed != (status == LessonStatus::Completed)
        {
            return Err(LessonError::InconsistentCompletion);
        }
        Ok(Self {
            id,
            course_id,
            title: normalize_title(title)?,
            status,
            completed_at,
            created_at,
            updated_at,
        })
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn rename(
        &mut self,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), LessonError> {
        self.title = normalize_title(title.into())?;
        self.updated_at = now;
        Ok(())
    }

    /// Moves the lesson to another kanban column.
    ///
    /// Entering `Completed` stamps `completed_at` unless the lesson was
    /// already complete; leaving it clears the stamp.
    pub fn move_to(&mut self, status: LessonStatus, now: DateTime<Utc>) {
        match status {
            LessonStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
            }
            LessonStatus::Planned | LessonStatus::InProgress => self.completed_at = None,
        }
        self.status = status;
        self.updated_at = now;
    }

    /// Toggles completion directly, keeping the status column in step.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed {
            self.completed_at = Some(now);
            self.status = LessonStatus::Completed;
        } else {
            self.completed_at = None;
            if self.status == LessonStatus::Completed {
                self.status = LessonStatus::InProgress;
            }
        }
        self.updated_at = now;
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> LessonStatus {
        self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
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

fn normalize_title(title: String) -> Result<String, LessonError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(LessonError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
