//! The typed rule tree.
//!
//! [`RuleNode`] replaces the loosely-shaped style objects of declarative theme
//! sources with explicit fields, and [`RuleKey`] records what each raw key
//! meant. [`variations`] generates the repetitive modifier families (gutters,
//! margins) that theme sources tend to spell out by hand.

mod key;
mod node;
mod variations;

pub use key::{ComponentSelector, RuleKey};
pub use node::RuleNode;
pub use variations::{variations, SIDE_SUFFIXES};
