// Article pipeline: model-written Markdown in, date-keyed JSON / PDF / MP3 out.
// All model calls go through the ArticleWriter trait; no direct HTTP here.

pub mod generator;
pub mod markdown;
pub mod store;
pub mod writer;
