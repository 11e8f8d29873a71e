//! Comment submission.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::forms::CommentForm;
use blog_shared::ApiResponse;
use blog_shared::dto::CommentCreatedResponse;

use super::{decoded, present};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /{post_id}/comment/
///
/// The post is looked up before the body is decoded, so a draft or unknown
/// id is a 404 whatever was submitted.
pub async fn create(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    form: Result<web::Form<CommentForm>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(post_id.into_inner()).await?;
    let comment = state.blog.add_comment(post.id, decoded(form)?).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        CommentCreatedResponse {
            post: present::post(&post),
            comment: present::comment(&comment),
        },
        "Your comment has been added.",
    )))
}
