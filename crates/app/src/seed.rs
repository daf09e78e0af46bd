use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use stride_core::model::{LessonStatus, UserId};
use stride_core::time::days_before;
use stride_services::{Clock, CourseService, IdSequence, LessonService};
use stride_storage::Storage;
use tracing::info;

/// Longest demo history, in days. One lesson is created per day.
pub const MAX_DEMO_DAYS: u32 = 3650;

const SAMPLE_LESSONS: [&str; 8] = [
    "Variables and Types",
    "Ownership",
    "Borrowing",
    "Structs and Enums",
    "Pattern Matching",
    "Error Handling",
    "Traits",
    "Iterators",
];

/// Seed a demo course with one completed lesson per day for the last `days`
/// days (ending at `now`), one lesson in progress and the rest planned.
///
/// # Errors
///
/// Returns an error if `days` exceeds [`MAX_DEMO_DAYS`], if the history would
/// start before the earliest representable time, or if any service call fails.
pub async fn seed_demo(
    storage: &Storage,
    ids: &Arc<IdSequence>,
    user_id: UserId,
    now: DateTime<Utc>,
    days: u32,
) -> anyhow::Result<()> {
    if days > MAX_DEMO_DAYS {
        bail!("demo history of {days} days exceeds the limit of {MAX_DEMO_DAYS}");
    }
    let start = days_before(now, days)
        .with_context(|| format!("{days} days before {now} is out of range"))?;
    let courses = CourseService::new(
        Clock::fixed(start),
        Arc::clone(ids),
        Arc::clone(&storage.courses),
    );
    let course = courses
        .create_course(
            user_id,
            "Introduction to Rust".to_string(),
            Some("Learn the basics of Rust".to_string()),
        )
        .await
        .context("create demo course")?;

    let lessons_at = |at: DateTime<Utc>| {
        LessonService::new(
            Clock::fixed(at),
            Arc::clone(ids),
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
        )
    };

    let total = usize::try_from(days)?.saturating_add(2);
    let mut titles: Vec<String> = SAMPLE_LESSONS.iter().map(|t| (*t).to_string()).collect();
    for n in titles.len()..total {
        titles.push(format!("Exercise {}", n + 1));
    }

    let mut created = Vec::with_capacity(titles.len());
    for title in titles.into_iter().take(total) {
        let lesson = lessons_at(start)
            .create_lesson(user_id, course.id(), title)
            .await
            .context("create demo lesson")?;
        created.push(lesson.id());
    }

    let mut open = created.iter();
    for day in (0..days).rev() {
        let Some(lesson_id) = open.next() else { break };
        let at = days_before(now, day).context("completion day out of range")?;
        lessons_at(at)
            .move_lesson(user_id, *lesson_id, LessonStatus::Completed)
            .await
            .context("complete demo lesson")?;
    }
    if let Some(lesson_id) = open.next() {
        lessons_at(now)
            .move_lesson(user_id, *lesson_id, LessonStatus::InProgress)
            .await
            .context("start demo lesson")?;
    }

    info!(lessons = created.len(), days, "seeded demo data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use stride_core::time::{fixed_clock, fixed_now};
    use stride_services::DashboardService;

    async fn seeded_stats(days: u32) -> stride_services::DashboardStats {
        let storage = Storage::in_memory();
        let ids = Arc::new(IdSequence::default());
        seed_demo(&storage, &ids, UserId::new(1), fixed_now(), days)
            .await
            .unwrap();
        DashboardService::new(
            fixed_clock(),
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
        )
        .get_stats(UserId::new(1))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn demo_streak_matches_requested_days() {
        let stats = seeded_stats(3).await;
        assert_eq!(stats.total_courses, 1);
        assert_eq!(stats.total_lessons, 5);
        assert_eq!(stats.completed_lessons, 3);
        assert_eq!(stats.streak, 3);
        assert_eq!(stats.today_tasks[0].status, LessonStatus::InProgress);
    }

    #[tokio::test]
    async fn long_demo_pads_lesson_titles() {
        let stats = seeded_stats(10).await;
        assert_eq!(stats.total_lessons, 12);
        assert_eq!(stats.streak, 10);
        assert_eq!(stats.today_tasks.last().unwrap().title, "Exercise 12");
    }

    #[tokio::test]
    async fn zero_days_seeds_open_lessons_only() {
        let stats = seeded_stats(0).await;
        assert_eq!(stats.completed_lessons, 0);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.today_tasks.len(), 2);
    }

    #[tokio::test]
    async fn oversized_history_is_an_error() {
        let storage = Storage::in_memory();
        let ids = Arc::new(IdSequence::default());

        let err = seed_demo(&storage, &ids, UserId::new(1), fixed_now(), 200_000_000)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"));
        assert!(storage.courses.list_courses(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_before_earliest_time_is_an_error() {
        let storage = Storage::in_memory();
        let ids = Arc::new(IdSequence::default());
        let earliest = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap().and_utc();

        let err = seed_demo(&storage, &ids, UserId::new(1), earliest, 3)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
