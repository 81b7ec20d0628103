//! Headless Rubik'scape host
//!
//! Glue between the `rubik` and `avatar` crates: TOML configuration, level
//! files, course layout from painted tiles, and scripted runs.

pub mod config;
pub mod course;
pub mod levels;
pub mod session;

pub use config::RubikscapeConfig;
pub use course::{build_course, CourseLayout};
pub use levels::{load_level, select_level};
pub use session::{
    parse_choices, parse_moves, parse_swipes, run_moves, run_swipes, walk, Swipe, WalkOutcome,
    WalkReport,
};
