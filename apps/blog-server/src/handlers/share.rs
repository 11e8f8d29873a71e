//! Recommend a post by email.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use blog_core::forms::EmailPostForm;
use blog_shared::ApiResponse;
use blog_shared::dto::ShareResponse;

use super::{decoded, present};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /{post_id}/share/
///
/// The post the share form is for; nothing is sent.
pub async fn show(state: web::Data<AppState>, post_id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ShareResponse {
        post: present::post(&post),
        sent: false,
    }))
}

/// POST /{post_id}/share/
///
/// A draft or unknown id is a 404 before the body is looked at.
pub async fn send(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    form: Result<web::Form<EmailPostForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(post_id.into_inner()).await?;
    let form = decoded(form)?;

    let site_url = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    let recipient = form.to.trim().to_string();
    let outcome = state.blog.share(post.id, form, &site_url).await?;

    let message = format!(
        "\"{}\" was successfully sent to {}.",
        outcome.post.title, recipient
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        ShareResponse {
            post: present::post(&outcome.post),
            sent: outcome.sent,
        },
        message,
    )))
}
