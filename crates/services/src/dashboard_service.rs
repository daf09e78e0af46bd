use std::sync::Arc;

use serde::Serialize;
use stride_core::model::{Lesson, UserId};
use stride_core::{StreakCalculator, progress_percentage};
use stride_storage::{CourseRepository, LessonRecord, LessonRepository};
use tracing::{debug, instrument};

use crate::Clock;
use crate::error::DashboardError;

/// Number of open lessons surfaced as "today's tasks".
pub const DEFAULT_TODAY_TASK_LIMIT: usize = 5;

/// Dashboard statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_courses: usize,
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub progress_percentage: u8,
    pub streak: u32,
    pub today_tasks: Vec<LessonRecord>,
}

/// Wire envelope: `{ "stats": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self { stats }
    }
}

/// Assembles dashboard statistics from a user's courses and lessons.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    calculator: StreakCalculator,
    today_task_limit: usize,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            clock,
            calculator: StreakCalculator::default(),
            today_task_limit: DEFAULT_TODAY_TASK_LIMIT,
            courses,
            lessons,
        }
    }

    /// Use a calculator with a different calendar-day offset.
    #[must_use]
    pub fn with_calculator(mut self, calculator: StreakCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    #[must_use]
    pub fn with_today_task_limit(mut self, limit: usize) -> Self {
        self.today_task_limit = limit;
        self
    }

    /// Compute statistics for `user_id`.
    ///
    /// Today's tasks are the first open lessons, walking courses newest
    /// first and lessons oldest first within each course.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Storage` if repository access fails.
    #[instrument(skip(self))]
    pub async fn get_stats(&self, user_id: UserId) -> Result<DashboardStats, DashboardError> {
        let courses = self.courses.list_courses(user_id).await?;

        let mut lessons: Vec<Lesson> = Vec::new();
        for course in &courses {
            lessons.extend(self.lessons.list_lessons(course.id()).await?);
        }

        let completed_lessons = lessons.iter().filter(|l| l.is_completed()).count();
        let streak = self
            .calculator
            .streak_with_clock(lessons.iter().filter_map(Lesson::completed_at), &self.clock);
        let today_tasks = lessons
            .iter()
            .filter(|l| !l.is_completed())
            .take(self.today_task_limit)
            .map(LessonRecord::from_lesson)
            .collect();

        let stats = DashboardStats {
            total_courses: courses.len(),
            total_lessons: lessons.len(),
            completed_lessons,
            progress_percentage: progress_percentage(completed_lessons, lessons.len()),
            streak,
            today_tasks,
        };
        debug!(
            total_lessons = stats.total_lessons,
            completed = stats.completed_lessons,
            streak = stats.streak,
            "dashboard stats computed"
        );
        Ok(stats)
    }
}
