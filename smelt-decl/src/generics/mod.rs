//! Generic parameters and their synthesized backing types.
//!
//! Expression trees require real concrete types as operand types, so every
//! configured generic parameter is backed by a synthesized type that
//! satisfies the same structural contract as its constraints. Synthesis is
//! lazy (nothing compiles until the parameter type is first asked for) and
//! memoized process-wide by structural equality of the descriptor, so equal
//! descriptors share one compiled type across graphs and threads.

mod cache;
mod param;
mod synthesizer;

pub use param::{GenericParam, GenericParamBuilder};
