//! Handler targets shipped with the service binary.
//!
//! Config files name these by `Controller::action`; embedding applications
//! usually register their own controllers instead.

pub mod builtin;

pub use builtin::builtin_registry;
