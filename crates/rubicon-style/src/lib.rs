//! # Rubicon Style - Style Fragment Composition and Resolution
//!
//! `rubicon-style` flattens a registry of named, partially overlapping style
//! fragments into one concrete style for a component. It is the resolution
//! engine behind a declarative component theme: the rendering side asks for a
//! style once per component instance and modifier set, and gets back a flat
//! property map plus the animation functions bound for that component.
//!
//! ## Core Concepts
//!
//! - [`RuleNode`]: typed unit of the rule tree (inclusions, properties,
//!   modifier children, component children, wildcard child, animations)
//! - [`FragmentStore`] / [`SealedStore`]: register fragments, then seal into a
//!   read-only store that any number of threads can resolve against
//! - [`ResolutionContext`]: the component path being resolved, each segment
//!   with its own active modifiers
//! - [`Resolution`]: the flattened [`ResolvedStyle`] and the
//!   [`BoundAnimations`] for one context
//!
//! ## Pipeline
//!
//! ```text
//! resolve(context)
//!   -> Expander      splice $include fragments, own keys last
//!   -> match_path    pick the layers that apply, lowest priority first
//!   -> merge_layers  scalars overwrite, nested slots merge key by key
//!   -> bind          animation functions by name, later layer wins
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rubicon_style::{FragmentStore, PathSegment, ResolutionContext, RuleNode, StyleValue};
//!
//! let mut store = FragmentStore::new();
//! store
//!     .register("base", RuleNode::new().set("color", "red").set("padding", 4))
//!     .unwrap();
//! store
//!     .register(
//!         "Button",
//!         RuleNode::new()
//!             .include("base")
//!             .set("padding", 8)
//!             .child("Text", RuleNode::new().set("fontWeight", "500"))
//!             .wildcard(RuleNode::new().set("marginBottom", 10)),
//!     )
//!     .unwrap();
//! let store = store.seal().unwrap();
//!
//! let text = store
//!     .resolve(&ResolutionContext::for_tag("Button").child(PathSegment::new("Text")))
//!     .unwrap();
//! assert_eq!(text.style["fontWeight"], StyleValue::from("500"));
//! assert_eq!(text.style["marginBottom"], StyleValue::from(10));
//! ```
//!
//! ## Stylesheets
//!
//! Fragments can also be loaded from YAML with [`FragmentStore::from_yaml`]
//! and [`FragmentStore::from_file`]. See [`stylesheet`] for the format.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events at `debug` and `trace` level for
//! registration, sealing, expansion and resolution. It never installs a
//! subscriber.

pub mod animation;
mod error;
pub mod expand;
pub mod matcher;
pub mod resolve;
pub mod rule;
pub mod store;
pub mod style;
pub mod stylesheet;

// Error type
pub use error::{Result, StyleError};

// Style values and merging
pub use style::{merge_into, merge_layers, ResolvedStyle, StyleMap, StyleValue};

// Rule tree
pub use rule::{variations, ComponentSelector, RuleKey, RuleNode, SIDE_SUFFIXES};

// Animations
pub use animation::{
    bind_animations, Animation, AnimationCatalog, AnimationContext, AnimationFn, BoundAnimations,
    Extrapolate, Interpolation, Layout,
};

// Store and resolution
pub use expand::{ExpandedNode, Expander};
pub use matcher::{match_path, Contribution, LayerOrigin, PathSegment, ResolutionContext};
pub use resolve::Resolution;
pub use store::{FragmentStore, SealedStore, StoreConfig, DEFAULT_MAX_INCLUSION_DEPTH};

// Stylesheet loading
pub use stylesheet::{parse_stylesheet, StylesheetError};
