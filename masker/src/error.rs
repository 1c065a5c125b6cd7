//! Error and warning types reported by masking calls.
//!
//! Every failure carries the [`FieldPath`] of the member that was being masked
//! so callers can tell which field broke without seeing its value.

use std::{error::Error as StdError, fmt};

use thiserror::Error;

use crate::{annotation::Annotation, strategy::Category, traverse::Shape};

/// One step from the root value to a nested member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A struct or enum member, by declared name (tuple members use their index).
    Field(&'static str),
    /// A sequence element.
    Index(usize),
    /// A map entry with a string key.
    Key(String),
    /// A map entry whose key is not a string, by iteration position.
    Entry(usize),
}

/// Location of a member inside the value passed to `mask`.
///
/// Displays as `account.credentials[0].password`, `headers["authorization"]`,
/// or `<root>` for the top-level value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The path of the top-level value.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
                PathSegment::Entry(ordinal) => write!(f, "[#{ordinal}]")?,
            }
        }
        Ok(())
    }
}

/// Failure reported by a strategy function.
///
/// Strategy functions only see one value, so they do not know where it lives.
/// The engine turns a `StrategyFailure` into a [`MaskError`] carrying the path.
#[derive(Debug, Error)]
pub enum StrategyFailure {
    /// The annotation argument cannot be used by this strategy.
    #[error("{0}")]
    InvalidArgument(String),
    /// The strategy could not produce a masked value.
    #[error(transparent)]
    Failed(Box<dyn StdError + Send + Sync>),
}

impl StrategyFailure {
    /// Rejects the annotation argument with a human readable reason.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }

    /// Wraps any error (or message) produced while masking.
    pub fn custom(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Failed(error.into())
    }
}

/// Error returned by `Masker::mask` and the direct helpers.
///
/// Any error aborts the whole call; no partially masked value is returned.
#[derive(Debug, Error)]
pub enum MaskError {
    /// No strategy with this name is registered for the value's category.
    #[error("unknown masking strategy `{strategy}` for {category} value at `{path}`")]
    UnknownStrategy {
        path: FieldPath,
        category: Category,
        strategy: String,
    },
    /// The annotation argument could not be used by the strategy.
    #[error("invalid argument `{argument}` for strategy `{strategy}` at `{path}`: {reason}")]
    InvalidArgument {
        path: FieldPath,
        strategy: String,
        argument: String,
        reason: String,
    },
    /// The strategy function failed.
    #[error("strategy `{strategy}` failed at `{path}`: {source}")]
    Strategy {
        path: FieldPath,
        strategy: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl MaskError {
    /// Path of the member that failed.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::UnknownStrategy { path, .. }
            | Self::InvalidArgument { path, .. }
            | Self::Strategy { path, .. } => path,
        }
    }

    /// Name of the strategy involved in the failure.
    pub fn strategy(&self) -> &str {
        match self {
            Self::UnknownStrategy { strategy, .. }
            | Self::InvalidArgument { strategy, .. }
            | Self::Strategy { strategy, .. } => strategy,
        }
    }

    pub(crate) fn from_failure(
        path: FieldPath,
        annotation: &Annotation,
        failure: StrategyFailure,
    ) -> Self {
        Self::strategy_failure(path, annotation.strategy(), annotation.argument(), failure)
    }

    pub(crate) fn strategy_failure(
        path: FieldPath,
        strategy: &str,
        argument: &str,
        failure: StrategyFailure,
    ) -> Self {
        match failure {
            StrategyFailure::InvalidArgument(reason) => Self::InvalidArgument {
                path,
                strategy: strategy.to_string(),
                argument: argument.to_string(),
                reason,
            },
            StrategyFailure::Failed(source) => Self::Strategy {
                path,
                strategy: strategy.to_string(),
                source,
            },
        }
    }

    /// Replaces the path, used when a registry error surfaces during traversal.
    #[must_use]
    pub(crate) fn at(mut self, location: &FieldPath) -> Self {
        match &mut self {
            Self::UnknownStrategy { path, .. }
            | Self::InvalidArgument { path, .. }
            | Self::Strategy { path, .. } => path.clone_from(location),
        }
        self
    }
}

/// Non-fatal condition observed while masking.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MaskWarning {
    /// A strategy annotation was found on a composite member. The member was
    /// walked as if it had no annotation.
    #[error("strategy `{strategy}` cannot be applied to {shape} member at `{path}`")]
    UnsupportedCombination {
        path: FieldPath,
        strategy: String,
        shape: Shape,
    },
}
