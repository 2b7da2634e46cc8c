//! Selector matching.
//!
//! A resolution walks a component path from the root tag down to the leaf.
//! Every segment gets a *scope*: the ordered list of expanded rule layers
//! that apply to it. Layers are ordered lowest priority first, and the
//! matcher never reorders or mutates them.
//!
//! The root scope holds the root tag's registered fragment. A child scope is
//! seeded, lowest priority first, with:
//!
//! 1. the child tag's own registered fragment, if there is one
//! 2. every wildcard (`*`) layer of the parent scope
//! 3. every bare-tag layer of the parent scope
//! 4. the active modifier children of the layers above
//! 5. every `tag.modifier` layer for the child's active modifiers, followed
//!    by their own active modifier children
//!
//! Each applied modifier child joins the scope itself, so its own modifier,
//! component and wildcard children take part as well. A `Text.muted` entry
//! therefore outranks the `.muted` child of a bare `Text` entry. Keys that
//! match nothing are skipped.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::expand::{ExpandedNode, Expander};

/// One segment of a component path: a tag and its active modifiers.
///
/// Modifiers form a set. Adding one twice keeps the first position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    tag: String,
    modifiers: Vec<String>,
}

impl PathSegment {
    /// Creates a segment with no active modifiers.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            modifiers: Vec::new(),
        }
    }

    /// Activates a modifier, returning `self` for chaining.
    pub fn modifier(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.modifiers.contains(&name) {
            self.modifiers.push(name);
        }
        self
    }

    /// Activates several modifiers in order.
    pub fn modifiers<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |segment, name| segment.modifier(name))
    }

    /// Parses the `Tag` / `Tag.mod,other` shorthand used on the command line.
    ///
    /// The tag may itself be dotted; the modifier list follows the last dot
    /// after the last capitalised segment, as with component keys.
    ///
    /// ```rust
    /// use rubicon_style::PathSegment;
    ///
    /// let seg = PathSegment::parse("shoutem.ui.Text.muted,bold").unwrap();
    /// assert_eq!(seg.tag(), "shoutem.ui.Text");
    /// assert_eq!(seg.active_modifiers(), ["muted", "bold"]);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<&str> = raw.split('.').collect();
        let tag_end = segments
            .iter()
            .rposition(|s| s.chars().next().is_some_and(|c| c.is_ascii_uppercase()))?;
        let tag = segments[..=tag_end].join(".");
        if tag.split('.').any(str::is_empty) {
            return None;
        }

        let rest = segments[tag_end + 1..].join(".");
        let modifiers = rest.split(',').filter(|m| !m.is_empty());
        Some(Self::new(tag).modifiers(modifiers))
    }

    /// Returns the component tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the active modifiers in the order they were added.
    pub fn active_modifiers(&self) -> &[String] {
        &self.modifiers
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        if !self.modifiers.is_empty() {
            write!(f, ".{}", self.modifiers.join(","))?;
        }
        Ok(())
    }
}

/// The component path one resolution is computed for.
///
/// # Example
///
/// ```rust
/// use rubicon_style::{PathSegment, ResolutionContext};
///
/// let cx = ResolutionContext::new(PathSegment::new("Button").modifier("clear"))
///     .child(PathSegment::new("Text"));
///
/// assert_eq!(cx.root().tag(), "Button");
/// assert_eq!(cx.leaf().tag(), "Text");
/// assert_eq!(cx.to_string(), "Button.clear > Text");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionContext {
    root: PathSegment,
    children: Vec<PathSegment>,
}

impl ResolutionContext {
    /// Creates a context for a root component.
    pub fn new(root: PathSegment) -> Self {
        Self {
            root,
            children: Vec::new(),
        }
    }

    /// Creates a context for a root tag with no modifiers.
    pub fn for_tag(tag: impl Into<String>) -> Self {
        Self::new(PathSegment::new(tag))
    }

    /// Appends a nested child segment.
    pub fn child(mut self, segment: PathSegment) -> Self {
        self.children.push(segment);
        self
    }

    /// Returns the root segment.
    pub fn root(&self) -> &PathSegment {
        &self.root
    }

    /// Returns the nested segments below the root.
    pub fn children(&self) -> &[PathSegment] {
        &self.children
    }

    /// Returns the segment the style is resolved for.
    pub fn leaf(&self) -> &PathSegment {
        self.children.last().unwrap_or(&self.root)
    }

    /// Returns every segment, root first.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> + '_ {
        std::iter::once(&self.root).chain(self.children.iter())
    }
}

impl fmt::Display for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Where a contributing layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerOrigin {
    /// The root tag's registered fragment.
    Root,
    /// A child tag's own registered fragment.
    Standalone,
    /// The parent's wildcard child.
    Wildcard,
    /// The parent's bare-tag child entry.
    Component,
    /// The parent's `tag.modifier` child entry.
    ComponentModifier(String),
    /// A modifier child of a layer already in scope.
    Modifier(String),
}

/// One layer contributing to a resolved style.
#[derive(Debug, Clone)]
pub struct Contribution<'a> {
    /// Rank within the scope. Higher ranks override lower ones.
    pub priority: usize,
    /// How the layer was selected.
    pub origin: LayerOrigin,
    /// The expanded layer.
    pub node: Rc<ExpandedNode<'a>>,
}

#[derive(Default)]
struct Scope<'a> {
    layers: Vec<Contribution<'a>>,
}

impl<'a> Scope<'a> {
    fn push(&mut self, origin: LayerOrigin, node: Rc<ExpandedNode<'a>>) {
        let priority = self.layers.len();
        self.layers.push(Contribution {
            priority,
            origin,
            node,
        });
    }
}

/// Computes the ordered contributions for the leaf of `context`.
///
/// Contributions are returned lowest priority first.
pub fn match_path<'a>(
    expander: &mut Expander<'a>,
    context: &ResolutionContext,
) -> Result<Vec<Contribution<'a>>> {
    let mut scope = root_scope(expander, context.root())?;
    for segment in context.children() {
        scope = child_scope(expander, &scope, segment)?;
    }
    tracing::trace!(path = %context, layers = scope.layers.len(), "matched path");
    Ok(scope.layers)
}

fn root_scope<'a>(expander: &mut Expander<'a>, segment: &PathSegment) -> Result<Scope<'a>> {
    let mut scope = Scope::default();
    if expander.store().contains(segment.tag()) {
        scope.push(LayerOrigin::Root, expander.expand_fragment(segment.tag())?);
    } else {
        tracing::debug!(tag = segment.tag(), "root tag has no registered rules");
    }
    apply_modifiers(expander, &mut scope, 0, segment.active_modifiers())?;
    Ok(scope)
}

fn child_scope<'a>(
    expander: &mut Expander<'a>,
    parent: &Scope<'a>,
    segment: &PathSegment,
) -> Result<Scope<'a>> {
    let tag = segment.tag();
    let mut scope = Scope::default();

    if expander.store().contains(tag) {
        scope.push(LayerOrigin::Standalone, expander.expand_fragment(tag)?);
    }
    for layer in &parent.layers {
        for &child in layer.node.wildcard_layers() {
            scope.push(LayerOrigin::Wildcard, Rc::new(expander.expand_node(child)?));
        }
    }
    for layer in &parent.layers {
        for &child in layer.node.component_layers(tag, None) {
            scope.push(LayerOrigin::Component, Rc::new(expander.expand_node(child)?));
        }
    }
    // `tag.modifier` entries outrank the bare entries' own modifier children.
    apply_modifiers(expander, &mut scope, 0, segment.active_modifiers())?;

    let specific = scope.layers.len();
    for modifier in segment.active_modifiers() {
        for layer in &parent.layers {
            for &child in layer.node.component_layers(tag, Some(modifier)) {
                scope.push(
                    LayerOrigin::ComponentModifier(modifier.clone()),
                    Rc::new(expander.expand_node(child)?),
                );
            }
        }
    }

    apply_modifiers(expander, &mut scope, specific, segment.active_modifiers())?;
    Ok(scope)
}

/// Applies active modifiers to the layers in scope from index `from` on,
/// including the layers this call adds.
fn apply_modifiers<'a>(
    expander: &mut Expander<'a>,
    scope: &mut Scope<'a>,
    from: usize,
    modifiers: &[String],
) -> Result<()> {
    if modifiers.is_empty() {
        return Ok(());
    }
    let mut next = from;
    while next < scope.layers.len() {
        let node = Rc::clone(&scope.layers[next].node);
        for modifier in modifiers {
            for &child in node.modifier_layers(modifier) {
                scope.push(
                    LayerOrigin::Modifier(modifier.clone()),
                    Rc::new(expander.expand_node(child)?),
                );
            }
        }
        next += 1;
    }
    Ok(())
}
