// Article layout: vocabulary stripping, word wrap, and pagination onto A4 pages.
// Everything here is pure and synchronous; callers run it inside
// tokio::task::spawn_blocking together with PDF serialisation.

pub mod classifier;
pub mod engine;
pub mod font_metrics;
pub mod wrap;

// Re-export the public API consumed by the renderer and the generation pipeline.
pub use engine::{render_article_document, Align, Document};
pub use font_metrics::{get_metrics, FontFace};
