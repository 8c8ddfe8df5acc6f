// Output encoders for laid-out documents.

pub mod pdf;

pub use pdf::render_pdf;
