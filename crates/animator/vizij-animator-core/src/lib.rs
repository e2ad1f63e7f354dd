//! Vizij Animator Core (engine-agnostic)
//!
//! Frame-based sprite animator: a table of animations (frame rate, looping,
//! frame count, per-orientation directions), a fixed tree of properties that
//! own per-(animation, frame, orientation) data, and a body that plays the
//! table and broadcasts every structural edit and playback transition to the
//! tree in depth-first pre-order.
//!
//! The host calls [`AnimatorBody::tick`] once per frame. Concrete property
//! behaviour (sprites, hitboxes, sorting) lives outside this crate behind the
//! [`AnimatorProperty`] trait.

pub mod body;
pub mod clipboard;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod outputs;
pub mod property;
pub mod table;

// Re-exports for consumers (adapters)
pub use body::{AnimatorBody, CompletionCallback};
pub use clipboard::{ClipAddress, Clipboard};
pub use clock::{ClockState, FrameKey, OrientationKey, PlaybackClock};
pub use config::{AnimationDefaults, AnimatorConfig};
pub use data::{AnimationSlot, Vec2};
pub use error::AnimatorError;
pub use ids::PropertyId;
pub use inputs::AnimatorCommand;
pub use outputs::{AnimatorEvent, Outputs};
pub use property::{AnimatorProperty, PropertyClip, PropertyNode, PropertyTree};
pub use table::AnimationTable;
