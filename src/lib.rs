pub mod batch;
pub mod config;
pub mod engine;
pub mod frames;
pub mod technique;
pub mod transforms;

pub use batch::{ImageBatch, TargetShape};
pub use config::{AugmentConfig, AugmentSize};
pub use engine::{AppliedChain, AugmentSummary, Augmenter};
pub use frames::SeriesFrames;
pub use technique::{list_available, Technique, TechniqueSet};
