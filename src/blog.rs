use crate::errors::AppError;
use crate::models::{BlogData, Comment, EditPost, NewPost, Page, Post};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub fn create_post(
    data: &mut BlogData,
    new: NewPost,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let title = new.title.trim();
    let category = new.category.trim();
    if title.is_empty() || new.body.trim().is_empty() || category.is_empty() {
        return Err(AppError::bad_request("title, body and category are required"));
    }

    data.next_post_id = data.next_post_id.saturating_add(1);
    let id = data.next_post_id;
    let labels = parse_labels(&new.labels);

    bump(&mut data.categories, category);
    for label in &labels {
        bump(&mut data.labels, label);
    }

    data.posts.insert(
        id,
        Post {
            id,
            title: title.to_string(),
            summary: new.summary,
            body: new.body,
            category: category.to_string(),
            labels,
            timestamp: now,
            like_num: 0,
            comment_num: 0,
            comments: Vec::new(),
        },
    );

    Ok(id)
}

pub fn edit_post(data: &mut BlogData, id: u64, edit: EditPost) -> Result<(), AppError> {
    let title = edit.title.trim();
    if title.is_empty() || edit.body.trim().is_empty() {
        return Err(AppError::bad_request("title and body are required"));
    }

    let post = data.posts.get_mut(&id).ok_or_else(|| AppError::post_not_found(id))?;
    let labels = parse_labels(&edit.labels);

    // Only labels that actually changed move their counts.
    for label in labels.iter().filter(|label| !post.labels.contains(*label)) {
        bump(&mut data.labels, label);
    }
    for label in post.labels.iter().filter(|label| !labels.contains(*label)) {
        drop_one(&mut data.labels, label);
    }

    post.title = title.to_string();
    post.summary = edit.summary;
    post.body = edit.body;
    post.labels = labels;
    Ok(())
}

pub fn delete_post(data: &mut BlogData, id: u64) -> Result<Post, AppError> {
    let post = data.posts.remove(&id).ok_or_else(|| AppError::post_not_found(id))?;
    drop_one(&mut data.categories, &post.category);
    for label in &post.labels {
        drop_one(&mut data.labels, label);
    }
    Ok(post)
}

pub fn add_comment(
    data: &mut BlogData,
    post_id: u64,
    body: &str,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::bad_request("comment must not be empty"));
    }
    if !data.posts.contains_key(&post_id) {
        return Err(AppError::post_not_found(post_id));
    }

    data.next_comment_id = data.next_comment_id.saturating_add(1);
    let id = data.next_comment_id;
    if let Some(post) = data.posts.get_mut(&post_id) {
        post.comments.push(Comment {
            id,
            body: body.to_string(),
            timestamp: now,
        });
        post.comment_num = post.comment_num.saturating_add(1);
    }
    Ok(id)
}

/// Removes a comment and returns the id of the post it belonged to.
pub fn delete_comment(data: &mut BlogData, comment_id: u64) -> Result<u64, AppError> {
    for post in data.posts.values_mut() {
        if let Some(index) = post.comments.iter().position(|c| c.id == comment_id) {
            post.comments.remove(index);
            post.comment_num = post.comment_num.saturating_sub(1);
            return Ok(post.id);
        }
    }
    Err(AppError::not_found(format!("comment {comment_id} not found")))
}

pub fn like_post(data: &mut BlogData, post_id: u64) -> Result<u64, AppError> {
    let post = data.posts.get_mut(&post_id).ok_or_else(|| AppError::post_not_found(post_id))?;
    post.like_num = post.like_num.saturating_add(1);
    Ok(post.like_num)
}

pub fn undo_like_post(data: &mut BlogData, post_id: u64) -> Result<u64, AppError> {
    let post = data.posts.get_mut(&post_id).ok_or_else(|| AppError::post_not_found(post_id))?;
    post.like_num = post.like_num.saturating_sub(1);
    Ok(post.like_num)
}

/// Newest first; ties broken by the higher id.
pub fn posts_newest_first<'a>(posts: impl Iterator<Item = &'a Post>) -> Vec<&'a Post> {
    let mut posts: Vec<&Post> = posts.collect();
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    posts
}

pub fn comments_newest_first(post: &Post) -> Vec<&Comment> {
    let mut comments: Vec<&Comment> = post.comments.iter().collect();
    comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    comments
}

/// 1-based. A page past the end yields no items rather than an error.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = items.len();
    let pages = total.div_ceil(per_page);
    let items: Vec<T> = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        pages,
        has_prev: page > 1,
        has_next: page < pages,
    }
}

/// Invalid or missing page numbers fall back to the first page.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Unparseable ids become 0, which never names a post or a comment.
pub fn parse_id(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(0)
}

pub fn parse_post_id(raw: Option<&str>) -> u64 {
    raw.map(parse_id).unwrap_or(0)
}

pub fn parse_labels(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|label| !label.is_empty()) {
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

fn bump(counts: &mut BTreeMap<String, u64>, key: &str) {
    let entry = counts.entry(key.to_string()).or_default();
    *entry = entry.saturating_add(1);
}

fn drop_one(counts: &mut BTreeMap<String, u64>, key: &str) {
    if let Some(count) = counts.get_mut(key) {
        *count = count.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 9, 25, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn new_post(title: &str, category: &str, labels: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            summary: "short".to_string(),
            body: "# body".to_string(),
            category: category.to_string(),
            labels: labels.to_string(),
        }
    }

    #[test]
    fn create_post_counts_category_and_labels() {
        let mut data = BlogData::default();
        let first = create_post(&mut data, new_post("One", "backend", "rust, web"), at(0)).unwrap();
        let second =
            create_post(&mut data, new_post("Two", "backend", "rust,,rust"), at(1)).unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(data.categories["backend"], 2);
        assert_eq!(data.labels["rust"], 2);
        assert_eq!(data.labels["web"], 1);
        assert_eq!(data.posts[&second].labels, vec!["rust".to_string()]);
    }

    #[test]
    fn create_post_rejects_missing_fields() {
        let mut data = BlogData::default();
        let err = create_post(&mut data, new_post("  ", "backend", ""), at(0)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(data.posts.is_empty());
        assert!(data.categories.is_empty());
    }

    #[test]
    fn edit_post_moves_only_changed_labels() {
        let mut data = BlogData::default();
        let id = create_post(&mut data, new_post("One", "backend", "rust, web"), at(0)).unwrap();
        edit_post(
            &mut data,
            id,
            EditPost {
                title: "One, revised".to_string(),
                summary: String::new(),
                body: "new body".to_string(),
                labels: "rust, async".to_string(),
            },
        )
        .unwrap();

        assert_eq!(data.labels["rust"], 1);
        assert_eq!(data.labels["web"], 0);
        assert_eq!(data.labels["async"], 1);
        assert_eq!(data.posts[&id].title, "One, revised");
        assert_eq!(data.posts[&id].category, "backend");
    }

    #[test]
    fn delete_post_releases_counts() {
        let mut data = BlogData::default();
        let id = create_post(&mut data, new_post("One", "backend", "rust"), at(0)).unwrap();
        add_comment(&mut data, id, "nice", at(1)).unwrap();

        let removed = delete_post(&mut data, id).unwrap();
        assert_eq!(removed.comments.len(), 1);
        assert_eq!(data.categories["backend"], 0);
        assert_eq!(data.labels["rust"], 0);
        assert_eq!(delete_post(&mut data, id).unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn comments_track_comment_num() {
        let mut data = BlogData::default();
        let id = create_post(&mut data, new_post("One", "backend", ""), at(0)).unwrap();
        let first = add_comment(&mut data, id, "first", at(1)).unwrap();
        add_comment(&mut data, id, "second", at(2)).unwrap();
        assert_eq!(data.posts[&id].comment_num, 2);

        let owner = delete_comment(&mut data, first).unwrap();
        assert_eq!(owner, id);
        assert_eq!(data.posts[&id].comment_num, 1);

        let newest = comments_newest_first(&data.posts[&id]);
        assert_eq!(newest[0].body, "second");
        assert_eq!(delete_comment(&mut data, first).unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn likes_increment_without_idempotence_check() {
        let mut data = BlogData::default();
        let id = create_post(&mut data, new_post("One", "backend", ""), at(0)).unwrap();
        assert_eq!(like_post(&mut data, id).unwrap(), 1);
        assert_eq!(like_post(&mut data, id).unwrap(), 2);
        assert_eq!(undo_like_post(&mut data, id).unwrap(), 1);
        assert_eq!(undo_like_post(&mut data, id).unwrap(), 0);
        assert_eq!(undo_like_post(&mut data, id).unwrap(), 0);
        assert_eq!(like_post(&mut data, 0).unwrap_err().status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = paginate((1..=10).collect::<Vec<_>>(), 2, 8);
        assert_eq!(page.items, vec![9, 10]);
        assert_eq!(page.pages, 2);
        assert!(page.has_prev);
        assert!(!page.has_next);

        let beyond = paginate((1..=10).collect::<Vec<_>>(), 5, 8);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 10);
    }

    #[test]
    fn listing_is_newest_first() {
        let mut data = BlogData::default();
        create_post(&mut data, new_post("Old", "backend", ""), at(0)).unwrap();
        create_post(&mut data, new_post("New", "backend", ""), at(5)).unwrap();
        create_post(&mut data, new_post("Same time", "backend", ""), at(5)).unwrap();

        let titles: Vec<&str> = posts_newest_first(data.posts.values())
            .into_iter()
            .map(|post| post.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Same time", "New", "Old"]);
    }

    #[test]
    fn query_parsing_falls_back() {
        assert_eq!(parse_post_id(Some("17")), 17);
        assert_eq!(parse_post_id(Some("abc")), 0);
        assert_eq!(parse_post_id(None), 0);
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("x")), 1);
    }

    #[test]
    fn malformed_path_ids_resolve_to_nothing() {
        let mut data = BlogData::default();
        let id = create_post(&mut data, new_post("One", "backend", ""), at(0)).unwrap();
        add_comment(&mut data, id, "first", at(1)).unwrap();

        assert_eq!(parse_id(" 1 "), id);
        for raw in ["abc", "-1", "1.5", "", "99999999999999999999999"] {
            let parsed = parse_id(raw);
            assert_eq!(parsed, 0);
            let post_err = delete_post(&mut data, parsed).unwrap_err();
            assert_eq!(post_err.status, StatusCode::NOT_FOUND);
            let comment_err = delete_comment(&mut data, parsed).unwrap_err();
            assert_eq!(comment_err.status, StatusCode::NOT_FOUND);
        }
        assert_eq!(data.posts[&id].comment_num, 1);
    }
}
