use crate::blog::comments_newest_first;
use crate::like_client::ACTIVE_COLOR;
use crate::markdown::{escape_text, render_markdown};
use crate::models::{Comment, Page, Post};
use crate::page::{SHADOW_RAISED, SHADOW_RESTING};
use std::collections::BTreeMap;

pub struct Sidebar<'a> {
    pub categories: &'a BTreeMap<String, u64>,
    pub labels: &'a BTreeMap<String, u64>,
}

/// Post listing used by both the front page and the category pages.
pub fn render_listing(
    heading: &str,
    base_path: &str,
    page: &Page<&Post>,
    sidebar: &Sidebar<'_>,
) -> String {
    let mut posts = String::new();
    if page.items.is_empty() {
        posts.push_str(r#"<p class="empty">Nothing here yet.</p>"#);
    }
    for post in &page.items {
        posts.push_str(&format!(
            r#"<article class="blog-box">
        <h2><a href="/post/{id}">{title}</a></h2>
        <p class="meta">{date} · <a href="/category/{category}">{category}</a>
          · {likes} likes · {comments} comments</p>
        <div class="summary">{summary}</div>
      </article>
"#,
            id = post.id,
            title = escape_text(&post.title),
            date = post.timestamp.format("%Y-%m-%d %H:%M"),
            category = escape_text(&post.category),
            likes = post.like_num,
            comments = post.comment_num,
            summary = render_markdown(&post.summary),
        ));
    }

    let heading = escape_text(heading);
    let main = format!("<h1>{heading}</h1>\n{posts}{}", pager(base_path, page));
    fill(
        LAYOUT_HTML,
        &[
            ("TITLE", &heading),
            ("MAIN", &main),
            ("SIDEBAR", &render_sidebar(sidebar)),
            ("SCRIPT", &page_script(None)),
        ],
    )
}

pub fn render_post(
    post: &Post,
    comments: &Page<&Comment>,
    sidebar: &Sidebar<'_>,
    script_root: &str,
) -> String {
    let mut comment_list = String::new();
    for comment in &comments.items {
        comment_list.push_str(&format!(
            r#"<li class="comment"><span class="meta">{date}</span>{body}
  <a class="delete" href="/delete_comment/{id}">delete</a></li>
"#,
            date = comment.timestamp.format("%Y-%m-%d %H:%M"),
            body = render_markdown(&comment.body),
            id = comment.id,
        ));
    }

    let labels = post
        .labels
        .iter()
        .map(|label| format!(r#"<span class="label">{}</span>"#, escape_text(label)))
        .collect::<Vec<_>>()
        .join(" ");

    let title = escape_text(&post.title);
    let main = fill(
        POST_HTML,
        &[
            ("ID", &post.id.to_string()),
            ("POST_TITLE", &title),
            ("DATE", &post.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            ("CATEGORY", &escape_text(&post.category)),
            ("LABELS", &labels),
            ("BODY", &render_markdown(&post.body)),
            ("LIKES", &post.like_num.to_string()),
            ("COMMENT_COUNT", &post.comment_num.to_string()),
            ("COMMENTS", &comment_list),
            ("PAGER", &pager(&format!("/post/{}", post.id), comments)),
        ],
    );

    fill(
        LAYOUT_HTML,
        &[
            ("TITLE", &title),
            ("MAIN", &main),
            ("SIDEBAR", &render_sidebar(sidebar)),
            ("SCRIPT", &page_script(Some(script_root))),
        ],
    )
}

/// Substitutes `{{NAME}}` markers in a single pass over `template`.
/// Inserted values are never rescanned, so text containing a marker stays literal.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let marker = &rest[start..];
        let Some(end) = marker.find("}}") else {
            break;
        };
        let name = &marker[2..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&marker[..end + 2]),
        }
        rest = &marker[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Comments of a post in display order.
pub fn visible_comments(post: &Post) -> Vec<&Comment> {
    comments_newest_first(post)
}

fn render_sidebar(sidebar: &Sidebar<'_>) -> String {
    let categories = sidebar
        .categories
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(tag, count)| {
            let tag = escape_text(tag);
            format!(r#"<li><a href="/category/{tag}">{tag}</a> ({count})</li>"#)
        })
        .collect::<String>();
    let labels = sidebar
        .labels
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(label, count)| format!(r#"<li>{} ({count})</li>"#, escape_text(label)))
        .collect::<String>();

    format!("<h3>Categories</h3><ul>{categories}</ul><h3>Labels</h3><ul>{labels}</ul>")
}

fn pager<T>(base_path: &str, page: &Page<T>) -> String {
    if page.pages <= 1 {
        return String::new();
    }
    let mut links = String::from(r#"<nav class="pager">"#);
    if page.has_prev {
        links.push_str(&format!(r#"<a href="{base_path}?page={}">« newer</a>"#, page.page - 1));
    }
    links.push_str(&format!(r#"<span>{} / {}</span>"#, page.page, page.pages));
    if page.has_next {
        links.push_str(&format!(r#"<a href="{base_path}?page={}">older »</a>"#, page.page + 1));
    }
    links.push_str("</nav>");
    links
}

/// Cosmetic behaviours for every page, plus the like action when `script_root` is given.
fn page_script(script_root: Option<&str>) -> String {
    let mut script = fill(
        COMMON_SCRIPT,
        &[("SHADOW_RAISED", SHADOW_RAISED), ("SHADOW_RESTING", SHADOW_RESTING)],
    );
    if let Some(root) = script_root {
        let root = serde_json::to_string(root).unwrap_or_else(|_| "\"\"".to_string());
        script.push_str(&fill(
            LIKE_SCRIPT,
            &[("SCRIPT_ROOT", &root), ("ACTIVE_COLOR", ACTIVE_COLOR)],
        ));
    }
    script
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Dexcode</title>
  <style>
    :root {
      --ink: #2b2a28;
      --muted: #7a746d;
      --accent: #28a0f6;
      --paper: #fdfcfa;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: #f2f1ee;
      color: var(--ink);
      font-family: "Georgia", serif;
    }

    .site {
      width: min(1080px, 100%);
      margin: 0 auto;
      padding: 32px 18px 48px;
      display: grid;
      grid-template-columns: 1fr 240px;
      gap: 28px;
    }

    .blog-box {
      background: var(--paper);
      border-radius: 6px;
      padding: 18px 22px;
      margin-bottom: 20px;
      box-shadow: 3px 3px 10px #ababab;
      transition: box-shadow 150ms ease;
    }

    .img-responsive {
      display: block;
      max-width: 100%;
      height: auto;
    }

    .meta {
      color: var(--muted);
      font-size: 0.9rem;
    }

    .label {
      background: #e6eef5;
      border-radius: 4px;
      padding: 2px 6px;
      font-size: 0.85rem;
    }

    #like {
      color: var(--muted);
      text-decoration: none;
      font-weight: 600;
    }

    #post_id {
      display: none;
    }

    .comment .delete {
      margin-left: 8px;
      font-size: 0.8rem;
      color: var(--muted);
    }

    .pager {
      display: flex;
      gap: 12px;
    }

    @media (max-width: 760px) {
      .site {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <div class="site">
    <main>
{{MAIN}}
    </main>
    <aside>
{{SIDEBAR}}
    </aside>
  </div>
  <script>
{{SCRIPT}}
  </script>
</body>
</html>
"#;

const POST_HTML: &str = r##"<article class="blog-box">
  <span id="post_id">{{ID}}</span>
  <h1>{{POST_TITLE}}</h1>
  <p class="meta">{{DATE}} · <a href="/category/{{CATEGORY}}">{{CATEGORY}}</a> {{LABELS}}</p>
  <div class="body">{{BODY}}</div>
  <p>
    <a id="like" href="#">♥ like</a>
    <span id="likes_num">{{LIKES}}</span>
    <span id="like_status" class="meta"></span>
  </p>
  <p><a href="/delete/{{ID}}">delete post</a></p>
</article>
<section class="blog-box">
  <h2>Comments ({{COMMENT_COUNT}})</h2>
  <form method="post" action="/post/{{ID}}">
    <textarea name="comment" rows="4" cols="60" placeholder="Markdown supported"></textarea>
    <button type="submit">Submit</button>
  </form>
  <ul>
{{COMMENTS}}
  </ul>
{{PAGER}}
</section>
"##;

const COMMON_SCRIPT: &str = r#"
    document.querySelectorAll('img').forEach((img) => img.classList.add('img-responsive'));

    document.querySelectorAll('.blog-box').forEach((box) => {
      box.addEventListener('mouseover', () => {
        box.style.boxShadow = '{{SHADOW_RAISED}}';
      });
      box.addEventListener('mouseout', () => {
        box.style.boxShadow = '{{SHADOW_RESTING}}';
      });
    });
"#;

const LIKE_SCRIPT: &str = r#"
    const SCRIPT_ROOT = {{SCRIPT_ROOT}};
    const likeEl = document.getElementById('like');
    const likesNumEl = document.getElementById('likes_num');
    let likesIssued = 0;
    let likesApplied = 0;

    const likePost = (event) => {
      event.preventDefault();
      const seq = ++likesIssued;
      const postId = document.getElementById('post_id').textContent;
      fetch(`${SCRIPT_ROOT}/like_post?post_id=${encodeURIComponent(postId)}`)
        .then((res) => (res.ok ? res.json() : Promise.reject(new Error(res.status))))
        .then((data) => {
          if (seq < likesApplied) {
            return;
          }
          likesApplied = seq;
          if (data.likes != null) {
            likesNumEl.textContent = data.likes;
          }
          likeEl.style.color = '{{ACTIVE_COLOR}}';
        })
        .catch(() => {});
      return false;
    };

    if (likeEl) {
      likeEl.addEventListener('click', likePost);
    }
"#;
