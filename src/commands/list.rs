//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::Post;
use crate::Folio;

/// List site content by type
pub async fn run(folio: &Folio, content_type: &str, json: bool) -> Result<()> {
    print!("{}", render(folio, content_type, json).await?);
    Ok(())
}

/// List the posts carrying `tag`
pub async fn run_tag(folio: &Folio, tag: &str, json: bool) -> Result<()> {
    let posts = folio.pipeline()?.posts_by_tag(tag).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print!("{}", post_table(&format!("Posts tagged '{}'", tag), &posts)?);
    }
    Ok(())
}

/// Build the listing for a content type
pub async fn render(folio: &Folio, content_type: &str, json: bool) -> Result<String> {
    let pipeline = folio.pipeline()?;

    let out = match content_type {
        "post" | "posts" => {
            let posts = pipeline.all_posts().await;
            if json {
                serde_json::to_string_pretty(&posts)? + "\n"
            } else {
                post_table(&format!("{} posts", folio.config.title), &posts)?
            }
        }
        "slug" | "slugs" => {
            let mut slugs = pipeline.all_slugs();
            slugs.sort();
            if json {
                serde_json::to_string_pretty(&slugs)? + "\n"
            } else {
                let mut out = format!("Slugs ({}):\n", slugs.len());
                for slug in slugs {
                    writeln!(out, "  {}", slug)?;
                }
                out
            }
        }
        "tag" | "tags" => {
            let tags = pipeline.tag_counts().await;
            if json {
                serde_json::to_string_pretty(&tags)? + "\n"
            } else {
                let mut out = format!("Tags ({}):\n", tags.len());
                for (tag, count) in tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
                out
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, slug, tag",
                content_type
            );
        }
    };

    Ok(out)
}

fn post_table(heading: &str, posts: &[Post]) -> Result<String> {
    let mut out = format!("{} ({}):\n", heading, posts.len());
    for post in posts {
        writeln!(
            out,
            "  {} - {} [{}] {} min",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.slug,
            post.reading_time
        )?;
    }
    Ok(out)
}
