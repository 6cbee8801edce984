//! Progress reporting for model calls and pacing delays

pub mod reporter;
