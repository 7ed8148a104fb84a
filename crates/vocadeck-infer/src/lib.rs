//! # vocadeck-infer
//!
//! Decides, from the set of column tags in a deck's header, which note
//! templates to generate and how their front, back and extra regions are laid
//! out.
//!
//! ## Overview
//!
//! - [`Transform`] -- the additive change one tag makes to a draft template.
//! - [`TransformRule`] -- binds a tag to its transform with a priority.
//! - [`TemplateEngine`] -- applies rules in priority order and emits templates.
//! - [`infer`] -- shorthand for the default catalog.

pub mod engine;
pub mod transform;

pub use engine::{infer, TemplateEngine};
pub use transform::{catalog, Draft, Transform, TransformRule};
