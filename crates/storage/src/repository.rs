use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use stride_core::model::{
    Course, CourseError, CourseId, Lesson, LessonError, LessonId, LessonStatus, UserId,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<CourseError> for StorageError {
    fn from(err: CourseError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<LessonError> for StorageError {
    fn from(err: LessonError) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// Persisted shape for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub id: CourseId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseRecord {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id(),
            user_id: course.user_id(),
            title: course.title().to_owned(),
            description: course.description().map(str::to_owned),
            created_at: course.created_at(),
            updated_at: course.updated_at(),
        }
    }

    /// Convert the record back into a domain `Course`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the title fails validation.
    pub fn into_course(self) -> Result<Course, CourseError> {
        Course::from_persisted(
            self.id,
            self.user_id,
            self.title,
            self.description,
            self.created_at,
            self.updated_at,
        )
    }
}

/// Persisted shape for a lesson.
///
/// This is also the wire shape of a lesson inside dashboard payloads, so the
/// redundant `completed` flag is kept alongside `completed_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: LessonId,
    pub title: String,
    pub status: LessonStatus,
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub course_id: CourseId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LessonRecord {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id(),
            title: lesson.title().to_owned(),
            status: lesson.status(),
            completed: lesson.is_completed(),
            completed_at: lesson.completed_at(),
            course_id: lesson.course_id(),
            created_at: lesson.created_at(),
            updated_at: lesson.updated_at(),
        }
    }

    /// Convert the record back into a domain `Lesson`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank or the completion fields disagree.
    pub fn into_lesson(self) -> Result<Lesson, LessonError> {
        Lesson::from_persisted(
            self.id,
            self.course_id,
            self.title,
            self.status,
            self.completed,
            self.completed_at,
            self.created_at,
            self.updated_at,
        )
    }
}

/// Full dump of a repository, the layout of JSON data files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for courses. Every read is scoped to the owning user.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Store a brand-new course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the ID is already taken.
    async fn insert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Persist or update a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;

    /// Fetch a course owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by someone else.
    async fn get_course(&self, user_id: UserId, id: CourseId) -> Result<Course, StorageError>;

    /// List a user's courses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>, StorageError>;

    /// Delete a course and all of its lessons.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing or owned by someone else.
    async fn delete_course(&self, user_id: UserId, id: CourseId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Store a brand-new lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the ID is already taken or the
    /// lesson's course does not exist.
    async fn insert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Persist or update a lesson. A stored lesson keeps its course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the lesson's course does not exist
    /// or differs from the stored one.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, StorageError>;

    /// List the lessons of a course, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError>;

    /// Delete a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn delete_lesson(&self, id: LessonId) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Lock order is always courses before lessons.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<HashMap<CourseId, Course>>>,
    lessons: Arc<Mutex<HashMap<LessonId, Lesson>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from a snapshot, validating every record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for invalid records, or
    /// `StorageError::Conflict` for duplicate IDs and lessons whose course is
    /// not part of the snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StorageError> {
        let mut courses = HashMap::with_capacity(snapshot.courses.len());
        for record in snapshot.courses {
            let course = record.into_course()?;
            if courses.insert(course.id(), course).is_some() {
                return Err(StorageError::Conflict);
            }
        }

        let mut lessons = HashMap::with_capacity(snapshot.lessons.len());
        for record in snapshot.lessons {
            let lesson = record.into_lesson()?;
            if !courses.contains_key(&lesson.course_id()) {
                return Err(StorageError::Conflict);
            }
            if lessons.insert(lesson.id(), lesson).is_some() {
                return Err(StorageError::Conflict);
            }
        }

        Ok(Self {
            courses: Arc::new(Mutex::new(courses)),
            lessons: Arc::new(Mutex::new(lessons)),
        })
    }

    /// Dump the current contents, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if a lock is poisoned.
    pub fn snapshot(&self) -> Result<Snapshot, StorageError> {
        let courses = lock(&self.courses)?;
        let lessons = lock(&self.lessons)?;

        let mut snapshot = Snapshot {
            courses: courses.values().map(CourseRecord::from_course).collect(),
            lessons: lessons.values().map(LessonRecord::from_lesson).collect(),
        };
        snapshot.courses.sort_by_key(|c| c.id);
        snapshot.lessons.sort_by_key(|l| l.id);
        Ok(snapshot)
    }
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn insert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = lock(&self.courses)?;
        if guard.contains_key(&course.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(course.id(), course.clone());
        Ok(())
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = lock(&self.courses)?;
        if let Some(existing) = guard.get(&course.id()) {
            if existing.user_id() != course.user_id() {
                return Err(StorageError::Conflict);
            }
        }
        guard.insert(course.id(), course.clone());
        Ok(())
    }

    async fn get_course(&self, user_id: UserId, id: CourseId) -> Result<Course, StorageError> {
        let guard = lock(&self.courses)?;
        guard
            .get(&id)
            .filter(|course| course.user_id() == user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_courses(&self, user_id: UserId) -> Result<Vec<Course>, StorageError> {
        let guard = lock(&self.courses)?;
        let mut courses: Vec<Course> = guard
            .values()
            .filter(|course| course.user_id() == user_id)
            .cloned()
            .collect();
        courses.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(courses)
    }

    async fn delete_course(&self, user_id: UserId, id: CourseId) -> Result<(), StorageError> {
        let mut courses = lock(&self.courses)?;
        let mut lessons = lock(&self.lessons)?;
        match courses.get(&id) {
            Some(course) if course.user_id() == user_id => {}
            _ => return Err(StorageError::NotFound),
        }
        courses.remove(&id);
        lessons.retain(|_, lesson| lesson.course_id() != id);
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn insert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let courses = lock(&self.courses)?;
        let mut lessons = lock(&self.lessons)?;
        if !courses.contains_key(&lesson.course_id()) || lessons.contains_key(&lesson.id()) {
            return Err(StorageError::Conflict);
        }
        lessons.insert(lesson.id(), lesson.clone());
        Ok(())
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let courses = lock(&self.courses)?;
        let mut lessons = lock(&self.lessons)?;
        if !courses.contains_key(&lesson.course_id()) {
            return Err(StorageError::Conflict);
        }
        if let Some(existing) = lessons.get(&lesson.id()) {
            if existing.course_id() != lesson.course_id() {
                return Err(StorageError::Conflict);
            }
        }
        lessons.insert(lesson.id(), lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, StorageError> {
        let guard = lock(&self.lessons)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, StorageError> {
        let guard = lock(&self.lessons)?;
        let mut lessons: Vec<Lesson> = guard
            .values()
            .filter(|lesson| lesson.course_id() == course_id)
            .cloned()
            .collect();
        lessons.sort_by_key(|lesson| (lesson.created_at(), lesson.id()));
        Ok(lessons)
    }

    async fn delete_lesson(&self, id: LessonId) -> Result<(), StorageError> {
        let mut guard = lock(&self.lessons)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

/// Aggregates course and lesson repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_repository(repo: InMemoryRepository) -> Self {
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo);
        Self { courses, lessons }
    }
}
