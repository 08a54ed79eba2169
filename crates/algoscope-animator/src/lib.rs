//! Algoscope Animator
//!
//! Plays a finished trace back at a controllable pace.
//!
//! # Architecture
//!
//! - **Animator**: cloneable handle; at most one trace plays through it at a
//!   time. Starting a new trace cancels the current one and waits for it to
//!   unwind before the first new step is handed out.
//! - **Waits**: the only suspension points. Pause holds the next step,
//!   resume releases it, cancel ends the run without its completion callback.
//! - **Delay**: re-read on every wait, so a speed change applies from the
//!   next step onward.
//!
//! # Usage
//!
//! ```ignore
//! let animator = Animator::new(AnimatorConfig::default());
//! let outcome = bst.insert(42.0);
//! animator
//!     .animate(outcome.steps, |step, index, total| async move {
//!         println!("[{}/{}] {}", index + 1, total, step.message);
//!     })
//!     .await;
//! ```

mod config;
mod scheduler;

pub use config::{millis_serde, AnimatorConfig};
pub use scheduler::{Animator, AnimatorStatus, Phase, PlaybackOutcome};
