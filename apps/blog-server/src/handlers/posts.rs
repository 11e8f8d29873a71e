//! Post listing, detail and search handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blog_shared::dto::{PostDetailResponse, PostListResponse, SearchResponse};

use super::present;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Kept as raw text: bad values fall back to a valid page instead of
    /// failing extraction.
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /
pub async fn list(state: web::Data<AppState>, query: web::Query<PageQuery>) -> AppResult<HttpResponse> {
    render_list(&state, None, query.page.as_deref()).await
}

/// GET /{tag_slug}/
pub async fn list_by_tag(
    state: web::Data<AppState>,
    tag_slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    render_list(&state, Some(tag_slug.as_str()), query.page.as_deref()).await
}

async fn render_list(
    state: &AppState,
    tag_slug: Option<&str>,
    page: Option<&str>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.list(tag_slug, page).await?;
    let sidebar = state.blog.sidebar().await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        tag: listing.tag.as_ref().map(present::tag),
        posts: present::page(listing.page),
        sidebar: present::sidebar(&sidebar),
    }))
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    let detail = state.blog.detail(year, month, day, &slug).await?;
    let sidebar = state.blog.sidebar().await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        comment_url: format!("/{}/comment/", detail.post.id),
        post: present::post(&detail.post),
        comments: detail.comments.iter().map(present::comment).collect(),
        similar_posts: present::posts(&detail.similar),
        sidebar: present::sidebar(&sidebar),
    }))
}

/// GET /search/?query=...
///
/// Without a `query` parameter nothing has been searched yet, which is
/// reported as an empty result list.
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let raw = query.into_inner().query.unwrap_or_default();
    let hits = state.blog.search(&raw).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        query: raw,
        results: hits.iter().map(present::search_hit).collect(),
    }))
}
