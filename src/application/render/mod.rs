//! Rendering of items into display-ready pages.
//!
//! The rendering pipeline is kept pure: it accepts an item, produces
//! deterministic HTML fragments, and surfaces structured errors. Running
//! samples and writing documents happen in the caller.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{RenderError, RenderService, RenderedPage, RenderedSample};
