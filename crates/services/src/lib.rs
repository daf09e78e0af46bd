#![forbid(unsafe_code)]

pub mod course_service;
pub mod dashboard_service;
pub mod error;
pub mod ids;
pub mod lesson_service;

pub use stride_core::{Clock, StreakCalculator};

pub use course_service::CourseService;
pub use dashboard_service::{DashboardResponse, DashboardService, DashboardStats};
pub use error::{CourseServiceError, DashboardError, LessonServiceError};
pub use ids::IdSequence;
pub use lesson_service::LessonService;
