//! Command implementations

pub mod apply;
pub mod inspect;
pub mod run;
