//! Host-compiler bridge and compile-and-check surface.
//!
//! The declaration core defines the bridge contract and the in-process model
//! compiler; this crate supplies the outward-facing half: handing rendered
//! source to a real host compiler ([`CommandCompiler`]) and the convenience
//! wrappers callers use to turn a finished graph into in-memory types or a
//! verified compile.

mod command;
mod verify;

pub use command::CommandCompiler;
pub use verify::{compile_and_check, compile_to_types};
