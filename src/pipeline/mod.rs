//! Headless training: arena episodes, observers and run summaries.

pub mod observers;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, Observation, ProgressObserver};
pub use training::{FastestClear, TrainingConfig, TrainingPipeline, TrainingResult};
