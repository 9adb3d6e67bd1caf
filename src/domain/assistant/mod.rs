//! Assistant domain: the fixed sales persona and its course catalog.

mod persona;

pub use persona::{
    Course, CATALOG, DEFAULT_MODEL, EMPTY_REPLY, FALLBACK_REPLY, SYSTEM_INSTRUCTION, TEMPERATURE,
};
