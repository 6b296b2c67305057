pub mod course;
pub mod error;

pub use course::{
    Activity, CourseOutline, CourseSpec, MIN_ILOS_PER_TOPIC, OutcomeSet, Reference, SearchHit,
    Topic, TopicQuery, validate_outline_value,
};
pub use error::{Degradation, LoomError, ProviderError, Result, RunDiagnostics};
