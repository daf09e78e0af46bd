use std::sync::Arc;

use stride_core::model::{CourseId, Lesson, LessonId, LessonStatus, UserId};
use stride_storage::{CourseRepository, LessonRepository};
use tracing::{debug, info, instrument};

use crate::error::LessonServiceError;
use crate::ids::IdSequence;
use crate::Clock;

/// Lesson lifecycle: creation, kanban moves, completion toggles.
///
/// Every operation first checks that the lesson's course belongs to the
/// caller; a foreign lesson is reported as not found.
#[derive(Clone)]
pub struct LessonService {
    clock: Clock,
    ids: Arc<IdSequence>,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl LessonService {
    #[must_use]
    pub fn new(
        clock: Clock,
        ids: Arc<IdSequence>,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            clock,
            ids,
            courses,
            lessons,
        }
    }

    /// Add a planned lesson to one of the user's courses.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Lesson` for a blank title, or
    /// `LessonServiceError::Storage` if the course is not the user's
    /// (`NotFound`) or the allocated ID is already taken (`Conflict`).
    #[instrument(skip(self, title))]
    pub async fn create_lesson(
        &self,
        user_id: UserId,
        course_id: CourseId,
        title: String,
    ) -> Result<Lesson, LessonServiceError> {
        self.courses.get_course(user_id, course_id).await?;
        let lesson = Lesson::new(self.ids.next_lesson_id(), course_id, title, self.clock.now())?;
        self.lessons.insert_lesson(&lesson).await?;
        info!(lesson_id = %lesson.id(), "lesson created");
        Ok(lesson)
    }

    /// List the lessons of one of the user's courses.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if the course is not the user's.
    pub async fn list_lessons(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<Lesson>, LessonServiceError> {
        self.courses.get_course(user_id, course_id).await?;
        Ok(self.lessons.list_lessons(course_id).await?)
    }

    /// Fetch one of the user's lessons.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` with `NotFound` when the lesson is
    /// missing or sits in another user's course.
    pub async fn get_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Lesson, LessonServiceError> {
        self.owned_lesson(user_id, lesson_id).await
    }

    /// Replace a lesson's title.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Lesson` for a blank title, or
    /// `LessonServiceError::Storage` if the lesson is not the user's.
    #[instrument(skip(self, title))]
    pub async fn rename_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        title: String,
    ) -> Result<Lesson, LessonServiceError> {
        let mut lesson = self.owned_lesson(user_id, lesson_id).await?;
        lesson.rename(title, self.clock.now())?;
        self.lessons.upsert_lesson(&lesson).await?;
        Ok(lesson)
    }

    /// Move a lesson to another kanban column.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if the lesson is not the user's.
    #[instrument(skip(self))]
    pub async fn move_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        status: LessonStatus,
    ) -> Result<Lesson, LessonServiceError> {
        let mut lesson = self.owned_lesson(user_id, lesson_id).await?;
        let from = lesson.status();
        lesson.move_to(status, self.clock.now());
        self.lessons.upsert_lesson(&lesson).await?;
        debug!(%from, to = %status, "lesson moved");
        Ok(lesson)
    }

    /// Mark a lesson complete or reopen it.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if the lesson is not the user's.
    #[instrument(skip(self))]
    pub async fn set_completed(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
        completed: bool,
    ) -> Result<Lesson, LessonServiceError> {
        let mut lesson = self.owned_lesson(user_id, lesson_id).await?;
        lesson.set_completed(completed, self.clock.now());
        self.lessons.upsert_lesson(&lesson).await?;
        debug!(completed_at = ?lesson.completed_at(), "lesson completion changed");
        Ok(lesson)
    }

    /// Delete a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if the lesson is not the user's.
    #[instrument(skip(self))]
    pub async fn delete_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<(), LessonServiceError> {
        self.owned_lesson(user_id, lesson_id).await?;
        self.lessons.delete_lesson(lesson_id).await?;
        info!("lesson deleted");
        Ok(())
    }

    async fn owned_lesson(
        &self,
        user_id: UserId,
        lesson_id: LessonId,
    ) -> Result<Lesson, LessonServiceError> {
        let lesson = self.lessons.get_lesson(lesson_id).await?;
        self.courses.get_course(user_id, lesson.course_id()).await?;
        Ok(lesson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use stride_core::time::{fixed_clock, fixed_now};
    use stride_storage::{InMemoryRepository, StorageError};

    use crate::CourseService;

    struct Fixture {
        courses: CourseService,
        lessons: LessonService,
    }

    fn fixture(clock: Clock) -> Fixture {
        let repo = Arc::new(InMemoryRepository::new());
        let ids = Arc::new(IdSequence::default());
        Fixture {
            courses: CourseService::new(clock, Arc::clone(&ids), repo.clone()),
            lessons: LessonService::new(clock, ids, repo.clone(), repo),
        }
    }

    #[tokio::test]
    async fn kanban_flow_tracks_completion() {
        let fx = fixture(fixed_clock());
        let user = UserId::new(1);
        let course = fx.courses.create_course(user, "Rust".into(), None).await.unwrap();
        let lesson = fx
            .lessons
            .create_lesson(user, course.id(), "Lifetimes".into())
            .await
            .unwrap();
        assert_eq!(lesson.status(), LessonStatus::Planned);

        let lesson = fx
            .lessons
            .move_lesson(user, lesson.id(), LessonStatus::InProgress)
            .await
            .unwrap();
        assert!(!lesson.is_completed());

        let lesson = fx
            .lessons
            .move_lesson(user, lesson.id(), LessonStatus::Completed)
            .await
            .unwrap();
        assert_eq!(lesson.completed_at(), Some(fixed_now()));

        let lesson = fx.lessons.set_completed(user, lesson.id(), false).await.unwrap();
        assert_eq!(lesson.status(), LessonStatus::InProgress);
        assert_eq!(lesson.completed_at(), None);
    }

    #[tokio::test]
    async fn completion_uses_injected_clock() {
        let earlier = fixed_now() - Duration::days(3);
        let fx = fixture(Clock::fixed(earlier));
        let user = UserId::new(1);
        let course = fx.courses.create_course(user, "Rust".into(), None).await.unwrap();
        let lesson = fx
            .lessons
            .create_lesson(user, course.id(), "Traits".into())
            .await
            .unwrap();

        let lesson = fx.lessons.set_completed(user, lesson.id(), true).await.unwrap();
        assert_eq!(lesson.completed_at(), Some(earlier));
    }

    #[tokio::test]
    async fn foreign_lessons_are_not_found() {
        let fx = fixture(fixed_clock());
        let owner = UserId::new(1);
        let stranger = UserId::new(2);
        let course = fx.courses.create_course(owner, "Rust".into(), None).await.unwrap();
        let lesson = fx
            .lessons
            .create_lesson(owner, course.id(), "Macros".into())
            .await
            .unwrap();

        let err = fx
            .lessons
            .create_lesson(stranger, course.id(), "Sneaky".into())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Storage(StorageError::NotFound)));

        let err = fx
            .lessons
            .set_completed(stranger, lesson.id(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Storage(StorageError::NotFound)));

        let err = fx.lessons.delete_lesson(stranger, lesson.id()).await.unwrap_err();
        assert!(matches!(err, LessonServiceError::Storage(StorageError::NotFound)));

        fx.lessons.delete_lesson(owner, lesson.id()).await.unwrap();
        assert!(fx.lessons.list_lessons(owner, course.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_rejects_blank_title() {
        let fx = fixture(fixed_clock());
        let user = UserId::new(1);
        let course = fx.courses.create_course(user, "Rust".into(), None).await.unwrap();
        let lesson = fx
            .lessons
            .create_lesson(user, course.id(), "Closures".into())
            .await
            .unwrap();

        let err = fx
            .lessons
            .rename_lesson(user, lesson.id(), " ".into())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Lesson(_)));

        let renamed = fx
            .lessons
            .rename_lesson(user, lesson.id(), "Iterators".into())
            .await
            .unwrap();
        assert_eq!(renamed.title(), "Iterators");
    }

    #[tokio::test]
    async fn get_lesson_is_scoped_to_owner() {
        let fx = fixture(fixed_clock());
        let owner = UserId::new(1);
        let course = fx.courses.create_course(owner, "Rust".into(), None).await.unwrap();
        let lesson = fx
            .lessons
            .create_lesson(owner, course.id(), "Modules".into())
            .await
            .unwrap();

        assert_eq!(fx.lessons.get_lesson(owner, lesson.id()).await.unwrap(), lesson);
        let err = fx
            .lessons
            .get_lesson(UserId::new(2), lesson.id())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Storage(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn create_never_replaces_another_users_lesson() {
        let repo = Arc::new(InMemoryRepository::new());
        let clock = fixed_clock();
        let owner_ids = Arc::new(IdSequence::default());
        let owner_courses = CourseService::new(clock, Arc::clone(&owner_ids), repo.clone());
        let owner_lessons = LessonService::new(clock, owner_ids, repo.clone(), repo.clone());
        let owner = UserId::new(1);
        let course = owner_courses.create_course(owner, "Rust".into(), None).await.unwrap();
        let original = owner_lessons
            .create_lesson(owner, course.id(), "Generics".into())
            .await
            .unwrap();

        // A second sequence that starts over hands out lesson 1 again.
        let other_ids = Arc::new(IdSequence::starting_after(CourseId::new(1), LessonId::new(0)));
        let other_courses = CourseService::new(clock, Arc::clone(&other_ids), repo.clone());
        let other_lessons = LessonService::new(clock, other_ids, repo.clone(), repo);
        let stranger = UserId::new(2);
        let theirs = other_courses.create_course(stranger, "Go".into(), None).await.unwrap();

        let err = other_lessons
            .create_lesson(stranger, theirs.id(), "Goroutines".into())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Storage(StorageError::Conflict)));
        assert_eq!(
            owner_lessons.get_lesson(owner, original.id()).await.unwrap(),
            original
        );
    }
}
