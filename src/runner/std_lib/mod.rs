//! Standard host objects.
//!
//! Array and string methods are always reachable through property lookup.
//! `console`, `JSON` and `Math` are ordinary capabilities: a host opts in with
//! [`register_standard`] and they still pass through the compiler's allow-list.

pub mod array;
pub mod console;
pub mod json;
pub mod math;
pub mod string;

use crate::runner::plugin::CapabilitySet;

pub const STANDARD_CAPABILITIES: [&str; 3] = ["console", "JSON", "Math"];

/// Adds `console`, `JSON` and `Math` to a capability set.
pub fn register_standard(capabilities: &mut CapabilitySet) {
    capabilities.register_object(console::console_object());
    capabilities.register_object(json::json_object());
    capabilities.register_object(math::math_object());
}
