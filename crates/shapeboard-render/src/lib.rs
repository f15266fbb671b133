//! Shapeboard Render Library
//!
//! Renderer abstraction and implementations for Shapeboard.
//! The default implementation uses Vello for GPU-accelerated rendering.

pub mod image_loader;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use image_loader::{ImageLoadError, ImageLoader, ImageStatus};
pub use renderer::{RenderContext, Renderer};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
