#![forbid(unsafe_code)]

pub mod model;
pub mod progress;
pub mod streak;
pub mod time;

pub use progress::progress_percentage;
pub use streak::{StreakCalculator, calculate_streak};
pub use time::Clock;
