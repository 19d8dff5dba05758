//! Visit report document: pure layout, then genpdf rendering.

pub mod layout;
mod renderer;

pub use renderer::PdfRenderer;
