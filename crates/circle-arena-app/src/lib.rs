//! Circle Arena Application
//!
//! A headless host that feeds commands and pointer events into an arena
//! and reports what a renderer would draw.

mod script;

pub use script::{Script, ScriptError, ScriptResult, Step};
