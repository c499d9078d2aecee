//! Registered-property syntax: descriptor compilation and value matching.

pub mod descriptor;
pub mod matcher;

pub use descriptor::{Component, ComponentName, DataType, Descriptor, Multiplier, SyntaxError};
pub use matcher::{MatchContext, MatchResult, NoContext};
