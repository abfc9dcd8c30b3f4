pub mod config;
pub mod logging;

pub mod archive;
pub mod catalog;
pub mod classify;
pub mod control;
pub mod encoding;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod placement;
pub mod report;
pub mod retry;
