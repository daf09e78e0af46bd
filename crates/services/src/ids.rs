use std::sync::atomic::{AtomicU64, Ordering};

use stride_core::model::{CourseId, LessonId};
use stride_storage::Snapshot;

/// Monotonic ID source for new courses and lessons.
///
/// A default sequence hands out 1, 2, …; use [`IdSequence::after`] when
/// records are already stored so new IDs do not collide with them.
#[derive(Debug, Default)]
pub struct IdSequence {
    course: AtomicU64,
    lesson: AtomicU64,
}

impl IdSequence {
    /// Continue after the given last-used IDs.
    #[must_use]
    pub fn starting_after(course: CourseId, lesson: LessonId) -> Self {
        Self {
            course: AtomicU64::new(course.value()),
            lesson: AtomicU64::new(lesson.value()),
        }
    }

    /// Continue after the highest IDs present in `snapshot`.
    #[must_use]
    pub fn after(snapshot: &Snapshot) -> Self {
        let course = snapshot.courses.iter().map(|c| c.id).max();
        let lesson = snapshot.lessons.iter().map(|l| l.id).max();
        Self::starting_after(
            course.unwrap_or(CourseId::new(0)),
            lesson.unwrap_or(LessonId::new(0)),
        )
    }

    pub fn next_course_id(&self) -> CourseId {
        CourseId::new(self.course.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn next_lesson_id(&self) -> LessonId {
        LessonId::new(self.lesson.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
