//! Timelapse capture daemon.
//!
//! Wires the frame store, FFmpeg seams, Telegram boundary and scheduler
//! loop together behind one environment-driven configuration.

pub mod config;
pub mod error;
pub mod ops;
pub mod pipeline;
pub mod scheduler;

pub use config::DaemonConfig;
pub use error::{DaemonError, DaemonResult};
pub use ops::{BucketEncoder, CameraSource, ConcatMerger, FrameSource, MasterMerger, TimelapseEncoder};
pub use pipeline::{DayFinalizer, FinalizeOutcome};
pub use scheduler::Scheduler;
