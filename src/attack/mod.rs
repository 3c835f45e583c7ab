//! Backdoor triggers
//!
//! A trigger imprints a pattern onto images and carries a [`TriggerMode`]:
//!
//! - `Train`: imprint poison carriers (positions past the clean set) with
//!   probability `train_prob`; labels untouched
//! - `EvalClean`: pass samples through unchanged, never eligible
//! - `EvalBackdoor`: imprint everything and relabel to the target; samples
//!   already of the target class are not eligible
//!
//! # Example
//!
//! ```
//! use backdoor_transfer::attack::{build_trigger, AttackKind, Trigger, TriggerMode, TriggerSpec};
//!
//! let spec = TriggerSpec::new(AttackKind::BadNets, 32, 3, 50_000, 0);
//! let mut trigger = build_trigger(spec).unwrap();
//! trigger.set_mode(TriggerMode::EvalBackdoor);
//! assert_eq!(trigger.mode(), TriggerMode::EvalBackdoor);
//! ```

mod mode;
mod pattern;
mod trigger;

pub use mode::{AttackKind, TriggerMode};
pub use pattern::{TriggerPattern, BLEND_ALPHA, SIG_DELTA, SIG_FREQUENCY};
pub use trigger::{build_trigger, BackdoorTrigger, Trigger, TriggerSpec};
