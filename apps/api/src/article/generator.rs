//! Article Generation — orchestrates the full daily pipeline.
//!
//! Flow: pick topic → writer.write_article → parse outline → persist JSON →
//!       classify + lay out + render PDF (blocking thread) → narrate → persist MP3.
//!
//! The JSON record is written first so a failed PDF or audio step still
//! leaves the article text on disk.

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::article::markdown::{narration_text, parse_outline};
use crate::article::store::{ArticleRecord, ArticleStore};
use crate::article::writer::ArticleWriter;
use crate::errors::AppError;
use crate::layout::render_article_document;
use crate::llm_client::prompts::DEFAULT_TOPICS;
use crate::render::render_pdf;

/// Request body for article generation. Both fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub topic: Option<String>,
    pub lexile: Option<String>,
}

/// What the pipeline produced.
#[derive(Debug, Clone)]
pub struct GeneratedArticle {
    pub prefix: String,
    pub record: ArticleRecord,
}

/// The topic used when a request names none, rotated by day of year.
pub fn default_topic(date: NaiveDate) -> &'static str {
    DEFAULT_TOPICS[date.ordinal0() as usize % DEFAULT_TOPICS.len()]
}

/// Runs the whole pipeline for `date` and stores the three artifacts under its prefix.
pub async fn generate_article(
    writer: &dyn ArticleWriter,
    store: &ArticleStore,
    request: GenerateRequest,
    date: NaiveDate,
) -> Result<GeneratedArticle, AppError> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let prefix = date_str.clone();

    let topic = request
        .topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| {
            let topic = default_topic(date);
            info!(topic, "No topic given, using the rotation");
            topic.to_string()
        });

    let markdown = writer.write_article(&topic).await?;
    let outline = parse_outline(&markdown);
    info!(
        prefix = %prefix,
        topic = %topic,
        subtitles = outline.subtitles.len(),
        "Article text generated"
    );

    let record = ArticleRecord {
        date: date_str.clone(),
        title: outline
            .title
            .clone()
            .unwrap_or_else(|| format!("Article {date_str}")),
        subtitles: outline.subtitles,
        topic: Some(topic),
        lexile: request.lexile.filter(|l| !l.trim().is_empty()),
        content: markdown.clone(),
    };
    store.save_record(&prefix, &record).await?;

    // Layout and serialisation are CPU-bound; keep them off the async executor.
    let pdf_title = outline.title.unwrap_or_default();
    let pdf_markdown = markdown.clone();
    let pdf_date = date_str.clone();
    let pdf = tokio::task::spawn_blocking(move || {
        let doc = render_article_document(&pdf_markdown, &pdf_title, &pdf_date);
        info!(pages = doc.page_count(), "Article laid out");
        render_pdf(&doc)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF render: {e}")))?;
    store.save_pdf(&prefix, &pdf).await?;

    let audio = writer.narrate(&narration_text(&markdown)).await?;
    store.save_audio(&prefix, &audio).await?;

    info!(
        prefix = %prefix,
        pdf_bytes = pdf.len(),
        audio_bytes = audio.len(),
        "Article generation complete"
    );
    Ok(GeneratedArticle { prefix, record })
}
