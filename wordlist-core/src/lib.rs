//! Wordlist preprocessing core
//!
//! Classifies raw lines by their punctuation delimiters and routes the results
//! to a primary payload output and an optional secondary output that mirrors
//! flagged original lines.
//!
//! ```rust,no_run
//! use wordlist_core::{Orchestrator, RunConfig};
//!
//! let config = RunConfig::new(vec!["dump.txt".into()], "payloads.txt")
//!     .with_errors("flagged.txt");
//! let summary = Orchestrator::new().run(&config)?;
//! println!("{} payloads", summary.payload_lines);
//! # Ok::<(), wordlist_core::CoreError>(())
//! ```

pub mod classifier;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod sink;

pub use classifier::{classify, Classification, Rule};
pub use error::{CoreError, Result};
pub use orchestrator::{InputSource, Orchestrator, RunConfig, RunState, RunSummary};
pub use progress::{NoProgress, ProgressReporter};
pub use sink::OutputSink;
