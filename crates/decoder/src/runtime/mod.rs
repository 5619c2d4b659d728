//! Runtime module — process lifecycle: boot, then run the stdin → stdout loop.

pub mod boot;
pub mod run;
