use crate::blog::{self, paginate, parse_id, parse_page, parse_post_id, posts_newest_first};
use crate::errors::AppError;
use crate::markdown::render_markdown;
use crate::models::{
    BlogData, CommentForm, EditPost, LikeQuery, LikeResponse, NewPost, Page, PageQuery, Post,
    PostDetail, PostSummary,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::{render_listing, render_post, visible_comments, Sidebar};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Utc;
use tracing::info;

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let data = state.data.lock().await;
    let page = paginate(
        posts_newest_first(data.posts.values()),
        parse_page(query.page.as_deref()),
        state.config.posts_per_page,
    );
    Html(render_listing("Dexcode", "/", &page, &sidebar(&data)))
}

pub async fn category(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let data = state.data.lock().await;
    if !data.categories.contains_key(&tag) {
        return Err(AppError::not_found(format!("category {tag} not found")));
    }

    let page = paginate(
        posts_newest_first(data.posts.values().filter(|post| post.category == tag)),
        parse_page(query.page.as_deref()),
        state.config.posts_per_page,
    );
    Ok(Html(render_listing(&tag, &format!("/category/{tag}"), &page, &sidebar(&data))))
}

pub async fn show_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id);
    let data = state.data.lock().await;
    let post = find_post(&data, id)?;
    let comments = paginate(
        visible_comments(post),
        parse_page(query.page.as_deref()),
        state.config.comments_per_page,
    );
    Ok(Html(render_post(post, &comments, &sidebar(&data), &state.config.script_root)))
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id);
    mutate(&state, |data| blog::add_comment(data, id, &form.comment, Utc::now())).await?;
    Ok(Redirect::to(&format!("/post/{id}")))
}

pub async fn like_post(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
) -> Result<Json<LikeResponse>, AppError> {
    let post_id = parse_post_id(query.post_id.as_deref());
    let likes = mutate(&state, |data| blog::like_post(data, post_id)).await?;
    info!(post_id, likes, "post liked");
    Ok(Json(LikeResponse { likes }))
}

pub async fn undo_like_post(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
) -> Result<Json<LikeResponse>, AppError> {
    let post_id = parse_post_id(query.post_id.as_deref());
    let likes = mutate(&state, |data| blog::undo_like_post(data, post_id)).await?;
    info!(post_id, likes, "post like withdrawn");
    Ok(Json(LikeResponse { likes }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id);
    let removed = mutate(&state, |data| blog::delete_post(data, id)).await?;
    info!(post_id = id, comments = removed.comments.len(), "post deleted");
    Ok(Redirect::to("/"))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id);
    let post_id = mutate(&state, |data| blog::delete_comment(data, id)).await?;
    Ok(Redirect::to(&format!("/post/{post_id}")))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<Page<PostSummary>> {
    let data = state.data.lock().await;
    let page = paginate(
        posts_newest_first(data.posts.values())
            .into_iter()
            .map(to_summary)
            .collect(),
        parse_page(query.page.as_deref()),
        state.config.posts_per_page,
    );
    Json(page)
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<NewPost>,
) -> Result<(StatusCode, Json<PostDetail>), AppError> {
    let detail = mutate(&state, |data| {
        let id = blog::create_post(data, payload, Utc::now())?;
        find_post(data, id).map(to_detail)
    })
    .await?;
    info!(post_id = detail.id, "post created");
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    let id = parse_id(&id);
    let data = state.data.lock().await;
    Ok(Json(to_detail(find_post(&data, id)?)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EditPost>,
) -> Result<Json<PostDetail>, AppError> {
    let id = parse_id(&id);
    let detail = mutate(&state, |data| {
        blog::edit_post(data, id, payload)?;
        find_post(data, id).map(to_detail)
    })
    .await?;
    Ok(Json(detail))
}

/// Applies `change` under the lock and writes the store only if it succeeded.
async fn mutate<T>(
    state: &AppState,
    change: impl FnOnce(&mut BlogData) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut data = state.data.lock().await;
    let result = change(&mut *data)?;
    persist_data(&state.config.data_path, &data).await?;
    Ok(result)
}

fn find_post(data: &BlogData, id: u64) -> Result<&Post, AppError> {
    data.posts.get(&id).ok_or_else(|| AppError::post_not_found(id))
}

fn sidebar(data: &BlogData) -> Sidebar<'_> {
    Sidebar {
        categories: &data.categories,
        labels: &data.labels,
    }
}

fn to_summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        summary_html: render_markdown(&post.summary),
        category: post.category.clone(),
        labels: post.labels.clone(),
        timestamp: post.timestamp,
        like_num: post.like_num,
        comment_num: post.comment_num,
    }
}

fn to_detail(post: &Post) -> PostDetail {
    PostDetail {
        id: post.id,
        title: post.title.clone(),
        summary_html: render_markdown(&post.summary),
        body_html: render_markdown(&post.body),
        category: post.category.clone(),
        labels: post.labels.clone(),
        timestamp: post.timestamp,
        like_num: post.like_num,
        comment_num: post.comment_num,
    }
}
