#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    CourseRecord, CourseRepository, InMemoryRepository, LessonRecord, LessonRepository, Snapshot,
    Storage, StorageError,
};
