//! Error types for the prepass traversal.
//!
//! A suspension is never an error: it is a control-flow value handled by the
//! retry loop in [`crate::traverse`]. Everything that reaches this module is a
//! genuine failure, and the original error value is carried through untouched
//! so callers can downcast and match on it.

use thiserror::Error;

/// Boxed error value produced by a render step, a visitor, or a suspension.
///
/// The traversal never wraps or translates these beyond tagging which stage
/// produced them; use [`PrepassError::into_inner`] to recover the original
/// value for downcasting.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a prepass traversal.
///
/// The first genuine error encountered anywhere in the tree aborts the whole
/// call; sibling branches already in flight are dropped, not rolled back.
#[derive(Debug, Error)]
pub enum PrepassError {
	/// A render step failed with a non-suspension error.
	#[error("{0}")]
	Render(BoxError),
	/// The visitor callback failed.
	#[error("{0}")]
	Visitor(BoxError),
}

impl PrepassError {
	/// Returns the original error value, discarding the stage tag.
	pub fn into_inner(self) -> BoxError {
		match self {
			PrepassError::Render(inner) | PrepassError::Visitor(inner) => inner,
		}
	}

	/// Borrows the original error value.
	pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
		match self {
			PrepassError::Render(inner) | PrepassError::Visitor(inner) => inner.as_ref(),
		}
	}
}
