mod course;
mod ids;
mod lesson;

pub use ids::{CourseId, LessonId, ParseIdError, UserId};

pub use course::{Course, CourseError};
pub use lesson::{Lesson, LessonError, LessonStatus, ParseStatusError};
