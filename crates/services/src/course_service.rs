use std::sync::Arc;

use stride_core::model::{Course, CourseId, UserId};
use stride_storage::CourseRepository;
use tracing::{debug, info, instrument};

use crate::error::CourseServiceError;
use crate::ids::IdSequence;
use crate::Clock;

/// Orchestrates course creation and persistence for a single owner at a time.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    ids: Arc<IdSequence>,
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    #[must_use]
    pub fn new(clock: Clock, ids: Arc<IdSequence>, courses: Arc<dyn CourseRepository>) -> Self {
        Self {
            clock,
            ids,
            courses,
        }
    }

    /// Create a new course and persist it.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` for validation failures.
    /// Returns `CourseServiceError::Storage` if persistence fails, with
    /// `Conflict` when the allocated ID is already taken.
    #[instrument(skip(self, title, description))]
    pub async fn create_course(
        &self,
        user_id: UserId,
        title: String,
        description: Option<String>,
    ) -> Result<Course, CourseServiceError> {
        let course = Course::new(
            self.ids.next_course_id(),
            user_id,
            title,
            description,
            self.clock.now(),
        )?;
        self.courses.insert_course(&course).await?;
        info!(course_id = %course.id(), "course created");
        Ok(course)
    }

    /// Apply a partial update to a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Course` if validation fails.
    /// Returns `CourseServiceError::Storage` if the course is missing or persistence fails.
    #[instrument(skip(self, title, description))]
    pub async fn update_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
        title: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<Course, CourseServiceError> {
        let mut course = self.courses.get_course(user_id, course_id).await?;
        course.update(title, description, self.clock.now())?;
        self.courses.upsert_course(&course).await?;
        debug!("course updated");
        Ok(course)
    }

    /// List a user's courses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if repository access fails.
    pub async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses(user_id).await?)
    }

    /// Fetch a course owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` with `NotFound` when the course is
    /// missing or belongs to another user.
    pub async fn get_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Course, CourseServiceError> {
        Ok(self.courses.get_course(user_id, course_id).await?)
    }

    /// Delete a course together with its lessons.
    ///
    /// # Errors
    ///
    /// Returns `CourseServiceError::Storage` if the course is missing or deletion fails.
    #[instrument(skip(self))]
    pub async fn delete_course(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<(), CourseServiceError> {
        self.courses.delete_course(user_id, course_id).await?;
        info!("course deleted");
        Ok(())
    }
}
