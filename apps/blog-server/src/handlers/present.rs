//! Conversions from domain values to response DTOs.

use blog_core::domain::{Comment, Post, Tag};
use blog_core::pagination::Page;
use blog_core::ports::CommentedPost;
use blog_core::search::SearchHit;
use blog_core::services::Sidebar;
use blog_shared::dto::{
    CommentResponse, CommentedPostResponse, PageResponse, PostResponse, SearchResultResponse,
    SidebarResponse, TagResponse,
};

pub fn tag(tag: &Tag) -> TagResponse {
    TagResponse {
        name: tag.name.clone(),
        slug: tag.slug.clone(),
    }
}

pub fn post(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        slug: post.slug.clone(),
        author_id: post.author_id,
        body: post.body.clone(),
        publish: post.publish,
        updated: post.updated_at,
        url: post.absolute_path(),
        tags: post.tags.iter().map(tag).collect(),
    }
}

pub fn posts(posts: &[Post]) -> Vec<PostResponse> {
    posts.iter().map(post).collect()
}

pub fn comment(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        name: comment.name.clone(),
        body: comment.body.clone(),
        created: comment.created_at,
    }
}

pub fn page(page: Page<Post>) -> PageResponse<PostResponse> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(|p| post(&p));

    PageResponse {
        items: page.items,
        number: page.number,
        num_pages: page.num_pages,
        total: page.total,
        has_next,
        has_previous,
    }
}

fn commented_post(entry: &CommentedPost) -> CommentedPostResponse {
    CommentedPostResponse {
        post: post(&entry.post),
        total_comments: entry.total_comments,
    }
}

pub fn sidebar(sidebar: &Sidebar) -> SidebarResponse {
    SidebarResponse {
        total_posts: sidebar.total_posts,
        latest: posts(&sidebar.latest),
        most_commented: sidebar.most_commented.iter().map(commented_post).collect(),
    }
}

pub fn search_hit(hit: &SearchHit<Post>) -> SearchResultResponse {
    SearchResultResponse {
        post: post(&hit.post),
        rank: hit.rank,
    }
}
