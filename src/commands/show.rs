//! Show a single rendered post

use anyhow::Result;

use crate::content::Post;
use crate::Folio;

/// Print one post, failing when it cannot be found or processed
pub fn run(folio: &Folio, slug: &str, json: bool) -> Result<()> {
    let post = folio
        .pipeline()?
        .post_by_slug(slug)
        .ok_or_else(|| anyhow::anyhow!("Post not found: {}", slug))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print!("{}", format_post(&post));
    }
    Ok(())
}

/// Plain-text header followed by the rendered HTML
pub fn format_post(post: &Post) -> String {
    let mut out = format!("Title:   {}\n", post.title);
    out.push_str(&format!("Date:    {}\n", post.date.format("%Y-%m-%d %H:%M:%S")));
    if !post.author.is_empty() {
        out.push_str(&format!("Author:  {}\n", post.author));
    }
    if !post.tags.is_empty() {
        out.push_str(&format!("Tags:    {}\n", post.tags.join(", ")));
    }
    if !post.excerpt.is_empty() {
        out.push_str(&format!("Excerpt: {}\n", post.excerpt));
    }
    out.push_str(&format!("Reading: {} min\n\n", post.reading_time));
    out.push_str(&post.content);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_post() {
        let post = Post {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: "2024-05-04T12:00:00Z".parse().unwrap(),
            excerpt: String::new(),
            tags: vec!["rust".to_string(), "web".to_string()],
            author: "Jane".to_string(),
            content: "<p>Hi</p>\n".to_string(),
            reading_time: 1,
        };
        let out = format_post(&post);
        assert!(out.starts_with("Title:   Hello\nDate:    2024-05-04 12:00:00\n"));
        assert!(out.contains("Author:  Jane\n"));
        assert!(out.contains("Tags:    rust, web\n"));
        assert!(!out.contains("Excerpt:"));
        assert!(out.ends_with("Reading: 1 min\n\n<p>Hi</p>\n"));
    }
}
