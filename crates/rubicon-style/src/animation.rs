//! Animation functions and the animation binder.
//!
//! Rule nodes may carry named animations: functions from a driver value and a
//! layout/options context to a partial style. Static resolution never calls
//! them. The binder only decides which function wins for a resolution
//! context; the rendering side evaluates it once per frame or transition tick.
//!
//! An [`Animation`] is plain data: a function pointer plus the values it
//! would otherwise have captured from its surrounding theme configuration.
//! That keeps rule nodes `Send + Sync` and lets sealed stores be shared
//! across threads.
//!
//! # Example
//!
//! ```rust
//! use rubicon_style::{Animation, AnimationContext, Interpolation, StyleMap, StyleValue};
//!
//! fn fade(driver: f64, _cx: &AnimationContext, captures: &StyleMap) -> StyleMap {
//!     let peak = captures.get("peak").and_then(StyleValue::as_number).unwrap_or(1.0);
//!     let curve = Interpolation::new(vec![0.0, 100.0], vec![peak, 0.0]).unwrap();
//!     let mut out = StyleMap::new();
//!     out.insert("opacity".into(), curve.at(driver).into());
//!     out
//! }
//!
//! let animation = Animation::new(fade).capture("peak", 0.5);
//! let frame = animation.evaluate(50.0, &AnimationContext::default());
//! assert_eq!(frame["opacity"], StyleValue::Number(0.25));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::style::{StyleMap, StyleValue};

/// Signature shared by every animation function.
///
/// Arguments are the driver value (scroll offset, transition progress, …),
/// the evaluation context, and the values bundled with the function when the
/// rule node was built.
pub type AnimationFn = fn(driver: f64, cx: &AnimationContext, captures: &StyleMap) -> StyleMap;

/// Animations bound for one resolution, keyed by animation name.
pub type BoundAnimations = BTreeMap<String, Animation>;

/// Layout of the component an animation is evaluated for.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Layout {
    /// Horizontal offset within the parent.
    pub x: f64,
    /// Vertical offset within the parent.
    pub y: f64,
    /// Measured width.
    pub width: f64,
    /// Measured height.
    pub height: f64,
}

impl Layout {
    /// Creates a layout with the given size at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }
}

/// Context handed to an animation function at evaluation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationContext {
    /// Measured layout of the animated component.
    pub layout: Layout,
    /// Free-form options supplied by the animation driver.
    pub options: StyleMap,
}

impl AnimationContext {
    /// Creates a context with the given layout and no options.
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            options: StyleMap::new(),
        }
    }

    /// Adds a driver option, returning `self` for chaining.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// A named animation entry: a function plus its captured values.
#[derive(Clone)]
pub struct Animation {
    func: AnimationFn,
    captures: StyleMap,
}

impl Animation {
    /// Wraps an animation function with no captured values.
    pub fn new(func: AnimationFn) -> Self {
        Self {
            func,
            captures: StyleMap::new(),
        }
    }

    /// Wraps an animation function with a full capture map.
    pub fn with_captures(func: AnimationFn, captures: StyleMap) -> Self {
        Self { func, captures }
    }

    /// Bundles a value with the function, returning `self` for chaining.
    pub fn capture(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.captures.insert(key.into(), value.into());
        self
    }

    /// Returns the captured values.
    pub fn captures(&self) -> &StyleMap {
        &self.captures
    }

    /// Evaluates the animation for one driver value.
    pub fn evaluate(&self, driver: f64, cx: &AnimationContext) -> StyleMap {
        (self.func)(driver, cx, &self.captures)
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

/// Collects animation entries from ordered layers.
///
/// Layers are supplied lowest priority first; a later layer's function
/// replaces an earlier one with the same name.
pub fn bind_animations<'a, I>(layers: I) -> BoundAnimations
where
    I: IntoIterator<Item = &'a BTreeMap<String, Animation>>,
{
    let mut bound = BoundAnimations::new();
    for layer in layers {
        for (name, animation) in layer {
            bound.insert(name.clone(), animation.clone());
        }
    }
    bound
}

/// How an [`Interpolation`] treats values outside its input range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Extrapolate {
    /// Continue along the first or last segment.
    #[default]
    Extend,
    /// Hold the first or last output value.
    Clamp,
}

impl Extrapolate {
    /// Parses `"extend"` or `"clamp"`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "extend" => Some(Self::Extend),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

/// Piecewise-linear mapping from an input range to an output range.
///
/// Values outside the input range are extrapolated along the first or last
/// segment unless [`Extrapolate::Clamp`] is set.
///
/// ```rust
/// use rubicon_style::{Extrapolate, Interpolation};
///
/// let curve = Interpolation::new(vec![250.0, 300.0], vec![0.0, 1.0])
///     .unwrap()
///     .extrapolate(Extrapolate::Clamp);
/// assert_eq!(curve.at(275.0), 0.5);
/// assert_eq!(curve.at(400.0), 1.0);
/// assert_eq!(curve.at(0.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    input: Vec<f64>,
    output: Vec<f64>,
    extrapolate: Extrapolate,
}

impl Interpolation {
    /// Creates an interpolation.
    ///
    /// Returns `None` unless both ranges have the same length, at least two
    /// points, and the input range is non-decreasing.
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Option<Self> {
        if input.len() < 2 || input.len() != output.len() {
            return None;
        }
        if input.windows(2).any(|w| w[1] < w[0]) {
            return None;
        }
        Some(Self {
            input,
            output,
            extrapolate: Extrapolate::Extend,
        })
    }

    /// Sets the out-of-range behaviour, returning `self` for chaining.
    pub fn extrapolate(mut self, extrapolate: Extrapolate) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    /// Maps a driver value through the ranges.
    pub fn at(&self, value: f64) -> f64 {
        let last = self.input.len() - 1;
        if self.extrapolate == Extrapolate::Clamp {
            if value <= self.input[0] {
                return self.output[0];
            }
            if value >= self.input[last] {
                return self.output[last];
            }
        }

        let segment = self
            .input
            .windows(2)
            .position(|w| value <= w[1])
            .unwrap_or(last - 1);

        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let (y0, y1) = (self.output[segment], self.output[segment + 1]);
        if x1 == x0 {
            return y0;
        }
        y0 + (value - x0) * (y1 - y0) / (x1 - x0)
    }
}

/// Named animation kinds for rule sources that cannot hold functions.
///
/// Textual stylesheets refer to an animation by kind and list the values to
/// capture; the catalog turns that into an [`Animation`].
#[derive(Clone)]
pub struct AnimationCatalog {
    kinds: HashMap<String, AnimationFn>,
}

impl AnimationCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Creates a catalog holding the built-in kinds.
    ///
    /// - `interpolate`: maps the driver through `inputRange`/`outputRange`
    ///   into `property`. With `relativeTo: height` (or `width`) the input
    ///   range is scaled by that layout dimension. `extrapolate: clamp` holds
    ///   the end values past either end of the input range. An output range
    ///   holding any non-numeric value (colors, for instance) steps instead:
    ///   each output holds from its input point up to the next one.
    pub fn with_builtins() -> Self {
        Self::new().register("interpolate", interpolate_property)
    }

    /// Registers an animation kind, returning `self` for chaining.
    pub fn register(mut self, kind: impl Into<String>, func: AnimationFn) -> Self {
        self.kinds.insert(kind.into(), func);
        self
    }

    /// Returns true if the kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Builds an animation of the given kind with the given captures.
    pub fn instantiate(&self, kind: &str, captures: StyleMap) -> Option<Animation> {
        self.kinds
            .get(kind)
            .map(|func| Animation::with_captures(*func, captures))
    }
}

impl Default for AnimationCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for AnimationCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("AnimationCatalog")
            .field("kinds", &kinds)
            .finish()
    }
}

fn number_list(captures: &StyleMap, key: &str) -> Option<Vec<f64>> {
    match captures.get(key)? {
        StyleValue::List(items) => items.iter().map(StyleValue::as_number).collect(),
        _ => None,
    }
}

fn interpolate_property(driver: f64, cx: &AnimationContext, captures: &StyleMap) -> StyleMap {
    let mut out = StyleMap::new();
    let Some(property) = captures.get("property").and_then(StyleValue::as_str) else {
        return out;
    };
    let (Some(mut input), Some(StyleValue::List(output))) =
        (number_list(captures, "inputRange"), captures.get("outputRange"))
    else {
        return out;
    };

    let scale = match captures.get("relativeTo").and_then(StyleValue::as_str) {
        Some("height") => Some(cx.layout.height),
        Some("width") => Some(cx.layout.width),
        _ => None,
    };
    if let Some(scale) = scale {
        for point in &mut input {
            *point *= scale;
        }
    }

    let numbers: Option<Vec<f64>> = output.iter().map(StyleValue::as_number).collect();
    let value: Option<StyleValue> = match numbers {
        Some(numbers) => {
            let extrapolate = captures
                .get("extrapolate")
                .and_then(StyleValue::as_str)
                .and_then(Extrapolate::parse)
                .unwrap_or_default();
            Interpolation::new(input, numbers)
                .map(|curve| curve.extrapolate(extrapolate).at(driver).into())
        }
        None => step(&input, output, driver),
    };
    if let Some(value) = value {
        out.insert(property.to_string(), value);
    }
    out
}

fn step(input: &[f64], output: &[StyleValue], driver: f64) -> Option<StyleValue> {
    if input.is_empty() || input.len() != output.len() {
        return None;
    }
    let index = input.iter().rposition(|&point| point <= driver).unwrap_or(0);
    Some(output[index].clone())
}
