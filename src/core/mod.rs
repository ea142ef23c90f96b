/*!
# Core Module

Shared error types used across the engine and the command surface.
*/

pub mod errors;

pub use errors::{EngineError, EngineResult};
