//! Strategy registry: masking functions keyed by value category and name.
//!
//! A strategy is a pure function from one leaf value to its masked
//! replacement. Functions are stored as tagged variants of [`StrategyFn`], so
//! the category of a registration is always the category of the function.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::error::{FieldPath, MaskError, StrategyFailure};

pub mod builtin;

/// The value categories strategies are registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    String,
    Int,
    Uint,
    Float,
    /// Matches any leaf, including booleans and chars.
    Any,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "signed integer",
            Self::Uint => "unsigned integer",
            Self::Float => "floating-point",
            Self::Any => "any",
        })
    }
}

/// A leaf value as seen by strategies.
///
/// Narrower integer and float types are widened to the category type before
/// masking and narrowed back afterwards.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl Primitive {
    /// The registry category used to look up strategies for this value.
    ///
    /// Booleans and chars only resolve `Any` strategies.
    pub fn category(&self) -> Category {
        match self {
            Self::String(_) => Category::String,
            Self::Int(_) => Category::Int,
            Self::Uint(_) => Category::Uint,
            Self::Float(_) => Category::Float,
            Self::Bool(_) | Self::Char(_) => Category::Any,
        }
    }

    /// Short name of the runtime type, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
        }
    }

    /// The zero value of the same runtime type.
    #[must_use]
    pub fn zeroed(&self) -> Self {
        match self {
            Self::String(_) => Self::String(String::new()),
            Self::Int(_) => Self::Int(0),
            Self::Uint(_) => Self::Uint(0),
            Self::Float(_) => Self::Float(0.0),
            Self::Bool(_) => Self::Bool(false),
            Self::Char(_) => Self::Char(char::default()),
        }
    }
}

/// Per-call inputs of a strategy function.
#[derive(Clone, Copy, Debug)]
pub struct StrategyContext<'a> {
    argument: &'a str,
    mask_char: char,
}

impl<'a> StrategyContext<'a> {
    pub fn new(argument: &'a str, mask_char: char) -> Self {
        Self {
            argument,
            mask_char,
        }
    }

    /// The annotation argument, empty when absent.
    pub fn argument(&self) -> &'a str {
        self.argument
    }

    /// The mask character configured on the masker.
    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    /// Returns the mask character repeated `count` times.
    pub fn mask(&self, count: usize) -> String {
        std::iter::repeat(self.mask_char).take(count).collect()
    }
}

type StringFn = dyn Fn(&StrategyContext<'_>, &str) -> Result<String, StrategyFailure> + Send + Sync;
type IntFn = dyn Fn(&StrategyContext<'_>, i64) -> Result<i64, StrategyFailure> + Send + Sync;
type UintFn = dyn Fn(&StrategyContext<'_>, u64) -> Result<u64, StrategyFailure> + Send + Sync;
type FloatFn = dyn Fn(&StrategyContext<'_>, f64) -> Result<f64, StrategyFailure> + Send + Sync;
type AnyFn =
    dyn Fn(&StrategyContext<'_>, Primitive) -> Result<Primitive, StrategyFailure> + Send + Sync;

/// A masking function tagged with the category it accepts.
#[derive(Clone)]
pub enum StrategyFn {
    String(Arc<StringFn>),
    Int(Arc<IntFn>),
    Uint(Arc<UintFn>),
    Float(Arc<FloatFn>),
    /// Receives any leaf and must return a value of the same runtime type.
    Any(Arc<AnyFn>),
}

impl StrategyFn {
    pub fn string<F>(function: F) -> Self
    where
        F: Fn(&StrategyContext<'_>, &str) -> Result<String, StrategyFailure> + Send + Sync + 'static,
    {
        Self::String(Arc::new(function))
    }

    pub fn int<F>(function: F) -> Self
    where
        F: Fn(&StrategyContext<'_>, i64) -> Result<i64, StrategyFailure> + Send + Sync + 'static,
    {
        Self::Int(Arc::new(function))
    }

    pub fn uint<F>(function: F) -> Self
    where
        F: Fn(&StrategyContext<'_>, u64) -> Result<u64, StrategyFailure> + Send + Sync + 'static,
    {
        Self::Uint(Arc::new(function))
    }

    pub fn float<F>(function: F) -> Self
    where
        F: Fn(&StrategyContext<'_>, f64) -> Result<f64, StrategyFailure> + Send + Sync + 'static,
    {
        Self::Float(Arc::new(function))
    }

    pub fn any<F>(function: F) -> Self
    where
        F: Fn(&StrategyContext<'_>, Primitive) -> Result<Primitive, StrategyFailure>
            + Send
            + Sync
            + 'static,
    {
        Self::Any(Arc::new(function))
    }

    pub fn category(&self) -> Category {
        match self {
            Self::String(_) => Category::String,
            Self::Int(_) => Category::Int,
            Self::Uint(_) => Category::Uint,
            Self::Float(_) => Category::Float,
            Self::Any(_) => Category::Any,
        }
    }

    /// Invokes the function on a leaf of a matching category.
    pub fn call(
        &self,
        ctx: &StrategyContext<'_>,
        value: Primitive,
    ) -> Result<Primitive, StrategyFailure> {
        match (self, value) {
            (Self::String(function), Primitive::String(text)) => {
                function(ctx, &text).map(Primitive::String)
            }
            (Self::Int(function), Primitive::Int(number)) => {
                function(ctx, number).map(Primitive::Int)
            }
            (Self::Uint(function), Primitive::Uint(number)) => {
                function(ctx, number).map(Primitive::Uint)
            }
            (Self::Float(function), Primitive::Float(number)) => {
                function(ctx, number).map(Primitive::Float)
            }
            (Self::Any(function), value) => {
                let kind = value.kind();
                let masked = function(ctx, value)?;
                if masked.kind() != kind {
                    return Err(StrategyFailure::custom(format!(
                        "strategy returned a {} value for a {kind} value",
                        masked.kind()
                    )));
                }
                Ok(masked)
            }
            (function, value) => Err(StrategyFailure::custom(format!(
                "{} strategy cannot mask a {} value",
                function.category(),
                value.kind()
            ))),
        }
    }
}

impl fmt::Debug for StrategyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StrategyFn").field(&self.category()).finish()
    }
}

/// Registered strategies, keyed by `(category, name)`.
#[derive(Clone, Debug, Default)]
pub struct StrategyRegistry {
    entries: HashMap<Category, HashMap<String, StrategyFn>>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in strategies.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Stores `strategy` under its category and `name`, replacing any previous
    /// registration for the same key.
    pub fn register(&mut self, name: impl Into<String>, strategy: StrategyFn) {
        let name = name.into();
        let category = strategy.category();
        let previous = self
            .entries
            .entry(category)
            .or_default()
            .insert(name.clone(), strategy);
        if previous.is_some() {
            tracing::trace!(%category, strategy = %name, "replaced masking strategy");
        }
    }

    /// Finds the function for a leaf of `category`, falling back to `Any`.
    pub fn resolve(&self, category: Category, name: &str) -> Option<&StrategyFn> {
        self.lookup(category, name)
            .or_else(|| self.lookup(Category::Any, name))
    }

    /// Whether a function is registered for exactly this key, without fallback.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.lookup(category, name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies the strategy `name` to one leaf.
    ///
    /// Errors carry the root path; the traversal engine relocates them to the
    /// member being masked.
    pub fn apply(
        &self,
        name: &str,
        ctx: &StrategyContext<'_>,
        value: Primitive,
    ) -> Result<Primitive, MaskError> {
        let category = value.category();
        let Some(function) = self.resolve(category, name) else {
            return Err(MaskError::UnknownStrategy {
                path: FieldPath::root(),
                category,
                strategy: name.to_string(),
            });
        };
        function.call(ctx, value).map_err(|failure| {
            MaskError::strategy_failure(FieldPath::root(), name, ctx.argument(), failure)
        })
    }

    fn lookup(&self, category: Category, name: &str) -> Option<&StrategyFn> {
        self.entries.get(&category)?.get(name)
    }
}
