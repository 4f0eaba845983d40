//! Static site generator for short object-creation lessons.
//!
//! Content flows through a single pipeline: the [`application::registry`]
//! loads items from a content source, the [`application::render`] service
//! turns each item into a page, the optional [`application::runner`] captures
//! the output of runnable samples, and [`application::assemble`] writes the
//! finished site.

pub mod application;
pub mod config;
pub mod demos;
pub mod domain;
pub mod infra;
pub mod presentation;
