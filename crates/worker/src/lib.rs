//! Worker primitives shared by type-ahead controllers.
//!
//! Background work (debounce timers, search invocations) runs through
//! [`spawn_guarded`], tagged with a [`TaskClass`] for tracing and owned by a
//! [`GenerationToken`] from a [`GenerationClock`]. Cancelling the token
//! aborts the work and silences its result; panics come back as
//! [`Settled::Panicked`].

mod class;
mod spawn;
mod token;

pub use class::TaskClass;
pub use spawn::{Settled, runtime_handle, spawn_guarded};
pub use token::{GenerationClock, GenerationToken};
