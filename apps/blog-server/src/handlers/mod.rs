//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod present;
mod share;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use blog_shared::ErrorResponse;

use crate::middleware::error::AppError;

/// Configure all application routes.
///
/// Literal routes come before the catch-all `/{tag_slug}/`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(path_config())
        .route("/api/health", web::get().to(health::health_check))
        .route("/search/", web::get().to(posts::search))
        .route("/", web::get().to(posts::list))
        .route("/{year}/{month}/{day}/{slug}/", web::get().to(posts::detail))
        .route("/{post_id}/comment/", web::post().to(comments::create))
        .service(
            web::resource("/{post_id}/share/")
                .route(web::get().to(share::show))
                .route(web::post().to(share::send)),
        )
        .route("/{tag_slug}/", web::get().to(posts::list_by_tag));
}

/// Unwrap a form body that was extracted leniently. Handlers call this only
/// once the post it targets is known to exist.
fn decoded<T>(form: Result<web::Form<T>, actix_web::Error>) -> Result<T, AppError> {
    form.map(web::Form::into_inner)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Path segments that do not parse (a non-numeric year, a malformed post
/// id) name nothing, so they are reported as missing.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse::not_found(err.to_string());
        InternalError::from_response(err, HttpResponse::NotFound().json(body)).into()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use uuid::Uuid;

    use blog_core::domain::Post;
    use blog_core::forms::{CommentForm, EmailPostForm};
    use blog_core::services::NewPost;
    use blog_infra::InMemoryMailer;

    use super::configure_routes;
    use crate::state::AppState;

    struct Fixture {
        state: AppState,
        mailer: Arc<InMemoryMailer>,
        published: Post,
        draft: Post,
    }

    async fn post(state: &AppState, title: &str, tags: &[&str], publish: bool) -> Post {
        let draft = state
            .blog
            .create_draft(NewPost {
                author_id: Uuid::new_v4(),
                title: title.to_string(),
                body: format!("All about {title}"),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                publish: Some(Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()),
            })
            .await
            .unwrap();

        if publish {
            state.blog.publish(draft.id).await.unwrap()
        } else {
            draft
        }
    }

    async fn fixture() -> Fixture {
        let mailer = Arc::new(InMemoryMailer::new());
        let state = AppState::in_memory(mailer.clone(), "blog@example.com");

        let published = post(&state, "Rust ownership", &["rust"], true).await;
        post(&state, "Rust traits", &["rust"], true).await;
        let draft = post(&state, "Unfinished draft", &["rust"], false).await;

        Fixture {
            state,
            mailer,
            published,
            draft,
        }
    }

    fn comment_form(email: &str) -> CommentForm {
        CommentForm {
            name: "Ann".to_string(),
            email: email.to_string(),
            body: "Thanks for writing this".to_string(),
        }
    }

    #[actix_web::test]
    async fn health_reports_in_memory_storage() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
    }

    #[actix_web::test]
    async fn list_shows_published_posts_with_sidebar() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/?page=abc").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["posts"]["number"], 1);
        assert_eq!(body["posts"]["total"], 2);
        assert_eq!(body["posts"]["has_next"], false);
        assert_eq!(body["sidebar"]["total_posts"], 2);
        assert!(body.get("tag").is_none());

        let titles: Vec<&str> = body["posts"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap())
            .collect();
        assert!(!titles.contains(&"Unfinished draft"));
    }

    #[actix_web::test]
    async fn tag_listing_filters_and_unknown_tag_is_404() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/rust/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tag"]["slug"], "rust");
        assert_eq!(body["posts"]["total"], 2);

        let req = test::TestRequest::get().uri("/golang/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
    }

    #[actix_web::test]
    async fn detail_by_date_and_slug() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&f.published.absolute_path())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["post"]["title"], "Rust ownership");
        assert_eq!(body["post"]["url"], "/2024/3/20/rust-ownership/");
        assert_eq!(
            body["comment_url"],
            format!("/{}/comment/", f.published.id)
        );
        assert_eq!(body["similar_posts"][0]["title"], "Rust traits");
        assert_eq!(body["similar_posts"].as_array().unwrap().len(), 1);

        for uri in [
            f.draft.absolute_path(),
            "/2024/2/30/rust-ownership/".to_string(),
            "/year/3/20/rust-ownership/".to_string(),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[actix_web::test]
    async fn invalid_comment_is_422_and_valid_comment_is_201() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;
        let uri = format!("/{}/comment/", f.published.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form(comment_form("not-an-email"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["email"][0], "Enter a valid email address.");

        let req = test::TestRequest::post()
            .uri(&uri)
            .set_form(comment_form("ann@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["comment"]["name"], "Ann");
        assert!(body["data"]["comment"].get("email").is_none());

        let req = test::TestRequest::get()
            .uri(&f.published.absolute_path())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn missing_comment_fields_are_reported() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/{}/comment/", f.published.id))
            .set_form([("name", "Ann")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"].get("email").is_some());
        assert!(body["errors"].get("body").is_some());
        assert!(body["errors"].get("name").is_none());
    }

    #[actix_web::test]
    async fn comment_routes_reject_drafts_and_get() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/{}/comment/", f.draft.id))
            .set_form(comment_form("ann@example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/{}/comment/", f.published.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[actix_web::test]
    async fn share_sends_mail_with_absolute_url() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;
        let uri = format!("/{}/share/", f.published.id);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["sent"], false);
        assert!(f.mailer.outbox().await.is_empty());

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(("host", "blog.test"))
            .set_form(EmailPostForm {
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                to: "bob@example.com".to_string(),
                comments: String::new(),
            })
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["sent"], true);

        let outbox = f.mailer.outbox().await;
        assert_eq!(outbox.len(), 1);
        assert!(
            outbox[0]
                .body
                .contains("http://blog.test/2024/3/20/rust-ownership/")
        );
    }

    #[actix_web::test]
    async fn share_of_draft_is_404_even_with_invalid_form() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/{}/share/", f.draft.id))
            .set_form([("to", "nobody")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(f.mailer.outbox().await.is_empty());
    }

    #[actix_web::test]
    async fn draft_lookup_runs_before_body_decoding() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        for action in ["share", "comment"] {
            let req = test::TestRequest::post()
                .uri(&format!("/{}/{action}/", f.draft.id))
                .set_json(serde_json::json!({ "to": "nobody" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{action}");
        }

        let req = test::TestRequest::post()
            .uri(&format!("/{}/share/", f.published.id))
            .set_json(serde_json::json!({ "to": "nobody" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 400);
        assert!(f.mailer.outbox().await.is_empty());
    }

    #[actix_web::test]
    async fn search_ranks_and_handles_misses() {
        let f = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(f.state.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/search/?query=ownership")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["query"], "ownership");
        assert_eq!(body["results"][0]["post"]["title"], "Rust ownership");
        assert_eq!(body["results"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/search/?query=kubernetes")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["results"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get().uri("/search/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
