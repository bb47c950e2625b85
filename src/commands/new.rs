//! Create a new post

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Scaffold a new post in the content directory, returning its path
pub fn create_post(folio: &Folio, title: &str, path: Option<&str>) -> Result<PathBuf> {
    // Same timezone the pipeline reads dates in, so file names and dates agree
    let now = Utc::now().with_timezone(&folio.config.tz()?);
    fs::create_dir_all(&folio.content_dir)?;

    // Generate filename
    let filename = if let Some(p) = path {
        format!("{}.md", p.trim_end_matches(".md"))
    } else {
        let slug = slug::slugify(title);
        if slug.is_empty() {
            anyhow::bail!("Cannot derive a file name from title {:?}", title);
        }

        folio
            .config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    let file_path = folio.content_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut content = String::from("---\n");
    content.push_str(&format!("title: {}\n", serde_json::to_string(title)?));
    content.push_str(&format!(
        "date: {}\n",
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    ));
    content.push_str("excerpt: \"\"\n");
    if !folio.config.author.is_empty() {
        content.push_str(&format!(
            "author: {}\n",
            serde_json::to_string(&folio.config.author)?
        ));
    }
    content.push_str("tags: []\n---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(folio: &Folio, title: &str, path: Option<&str>) -> Result<()> {
    let file_path = create_post(folio, title, path)?;
    println!("Created: {:?}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_post_is_loadable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "author: \"Jane: the Dev\"\n").unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let path = create_post(&folio, "Hello: A \"Quoted\" World", None).unwrap();
        assert_eq!(path, folio.content_dir.join("hello-a-quoted-world.md"));

        let post = folio
            .pipeline()
            .unwrap()
            .try_post_by_slug("hello-a-quoted-world")
            .unwrap();
        assert_eq!(post.title, "Hello: A \"Quoted\" World");
        assert_eq!(post.author, "Jane: the Dev");
        assert!(post.tags.is_empty());
        assert_eq!(post.reading_time, 0);
    }

    #[test]
    fn test_created_post_is_dated_now() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), "timezone: Asia/Tokyo\n").unwrap();
        let folio = Folio::new(dir.path()).unwrap();

        let before = Utc::now();
        folio.new_post("Fresh").unwrap();
        let post = folio.pipeline().unwrap().try_post_by_slug("fresh").unwrap();

        let skew = (post.date - before).num_seconds().abs();
        assert!(skew <= 5, "post dated {} but created at {}", post.date, before);
    }

    #[test]
    fn test_create_post_with_explicit_path() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        let path = create_post(&folio, "Whatever", Some("custom-name")).unwrap();
        assert_eq!(path, folio.content_dir.join("custom-name.md"));
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        folio.new_post("Twice").unwrap();
        assert!(folio.new_post("Twice").is_err());
    }
}
