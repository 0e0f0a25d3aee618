#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod sequencer;
pub mod stats;
pub mod time;

pub use catalog::{Catalog, CatalogError, LessonLocation};
pub use sequencer::{LessonPosition, LessonSequencer};
pub use time::Clock;
