pub mod concurrent_primitives;
pub mod harness_utils;
