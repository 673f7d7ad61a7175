//! Nested attributes: turning one composite payload into create, update and
//! destroy operations on a parent's children.
//!
//! Assignment runs [`sanitize`] then [`resolve`] and stores the resulting
//! [`PendingAction`]s on the parent [`Entity`](crate::Entity). Saving the
//! parent validates it and every staged child, lifting child errors into the
//! parent through [`aggregate`], then applies everything in one transaction.

mod aggregate;
pub use aggregate::aggregate;

mod resolve;
pub use resolve::{resolve, ActionKind, PendingAction};

pub(crate) mod save;

mod sanitize;
pub use sanitize::sanitize;

pub use quilt_core::schema::nested::{ALL_BLANK, DESTROY_MARKER};
