//! Detection policy definitions.

pub mod detection;

pub use detection::{
    DetectionPolicy, DEFAULT_BODY_PATH, DEFAULT_ROW_THRESHOLD, DEFAULT_SMALLRANGE_THRESHOLD,
};
