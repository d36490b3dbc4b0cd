//! Patterns sub-module: observable, singleton.

pub mod observable;
pub mod singleton;
