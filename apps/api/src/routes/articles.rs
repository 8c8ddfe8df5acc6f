//! Axum route handlers for the Article API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::article::generator::{generate_article, GenerateRequest};
use crate::article::store::{validate_prefix, ArticleRecord, StoredArticle};
use crate::errors::AppError;
use crate::state::AppState;

const UNSPECIFIED: &str = "Not specified";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub date: String,
    pub title: String,
    pub subtitles: Vec<String>,
    pub topic: String,
    pub lexile: String,
    pub file_prefix: String,
    pub pdf_url: String,
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub date: String,
    pub title: String,
    pub subtitles: Vec<String>,
    pub article: ArticleRecord,
    pub file_prefix: String,
    pub pdf_url: String,
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub date: String,
    pub title: String,
    pub subtitles: Vec<String>,
    pub topic: String,
    pub lexile: String,
    pub article: ArticleRecord,
    pub file_prefix: String,
    pub pdf_url: String,
    pub audio_url: String,
}

fn pdf_url(prefix: &str) -> String {
    format!("/articles/{prefix}.pdf")
}

fn audio_url(prefix: &str) -> String {
    format!("/articles/{prefix}.mp3")
}

fn title_or_default(record: &ArticleRecord, date: &str) -> String {
    if record.title.trim().is_empty() {
        format!("Article {date}")
    } else {
        record.title.clone()
    }
}

fn or_unspecified(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| UNSPECIFIED.to_string())
}

fn summarize(article: &StoredArticle, date: &str) -> ArticleSummary {
    let record = &article.record;
    ArticleSummary {
        date: date.to_string(),
        title: title_or_default(record, date),
        subtitles: record.subtitles.clone(),
        topic: or_unspecified(&record.topic),
        lexile: or_unspecified(&record.lexile),
        file_prefix: article.prefix.clone(),
        pdf_url: pdf_url(&article.prefix),
        audio_url: audio_url(&article.prefix),
    }
}

fn detail(article: StoredArticle) -> ArticleDetail {
    let date = article.date().to_string();
    ArticleDetail {
        title: title_or_default(&article.record, &date),
        subtitles: article.record.subtitles.clone(),
        pdf_url: pdf_url(&article.prefix),
        audio_url: audio_url(&article.prefix),
        file_prefix: article.prefix,
        article: article.record,
        date,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/articles
///
/// Every stored article, newest first.
pub async fn handle_list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArticleSummary>>, AppError> {
    let articles = state.store.list().await?;
    Ok(Json(
        articles.iter().map(|a| summarize(a, a.date())).collect(),
    ))
}

/// GET /api/latest-article
pub async fn handle_latest_article(
    State(state): State<AppState>,
) -> Result<Json<ArticleDetail>, AppError> {
    let latest = state
        .store
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("No articles available".to_string()))?;
    Ok(Json(detail(latest)))
}

/// GET /api/articles/:date
///
/// All articles whose prefix starts with `date`.
pub async fn handle_articles_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<ArticleSummary>>, AppError> {
    validate_prefix(&date)?;
    let articles = state.store.by_date(&date).await?;
    if articles.is_empty() {
        return Err(AppError::NotFound(format!("No articles for {date}")));
    }
    Ok(Json(articles.iter().map(|a| summarize(a, &date)).collect()))
}

/// GET /api/article-by-prefix/:prefix
pub async fn handle_article_by_prefix(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<ArticleDetail>, AppError> {
    let article = state
        .store
        .load(&prefix)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article {prefix} not found")))?;
    Ok(Json(detail(article)))
}

/// POST /api/generate-today
///
/// Full pipeline for today's date. Body `{topic?, lexile?}` may be omitted;
/// a body sent as JSON must parse.
pub async fn handle_generate_today(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => GenerateRequest::default(),
        Err(rejection) => {
            return Err(AppError::Validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    };
    let today = Utc::now().date_naive();

    let generated = generate_article(state.writer.as_ref(), &state.store, request, today).await?;
    let record = generated.record;
    let prefix = generated.prefix;

    Ok(Json(GenerateResponse {
        success: true,
        date: record.date.clone(),
        title: title_or_default(&record, &record.date),
        subtitles: record.subtitles.clone(),
        topic: or_unspecified(&record.topic),
        lexile: or_unspecified(&record.lexile),
        pdf_url: pdf_url(&prefix),
        audio_url: audio_url(&prefix),
        file_prefix: prefix,
        article: record,
    }))
}
