use anyhow::Result;
use tempfile::TempDir;
use yt_comment_exporter::{
    CommentExporter, DocumentSource, ExportSettings, ExtractionOutcome, LocalStorage,
    SnapshotDocument,
};

struct Comment<'a> {
    author: &'a str,
    body: Option<&'a str>,
    time: &'a str,
    likes: &'a str,
}

fn comment<'a>(author: &'a str, body: &'a str) -> Comment<'a> {
    Comment {
        author,
        body: Some(body),
        time: "3 weeks ago",
        likes: "12",
    }
}

fn render_thread(c: &Comment<'_>) -> String {
    let body = c
        .body
        .map(|body| {
            format!(
                r#"<ytd-expander><yt-attributed-string id="content-text"><span>{}</span></yt-attributed-string></ytd-expander>"#,
                body
            )
        })
        .unwrap_or_default();

    format!(
        r#"<ytd-comment-thread-renderer class="style-scope ytd-item-section-renderer">
  <ytd-comment-view-model id="comment">
    <div id="header-author">
      <a id="author-text" href="/@someone"><span> {} </span></a>
      <span id="published-time-text"><yt-formatted-string class="published-time-text"><a href="/watch?v=x&lc=y">{}</a></yt-formatted-string></span>
    </div>
    {}
    <div id="toolbar"><span id="vote-count-middle" aria-label="likes"> {} </span></div>
  </ytd-comment-view-model>
</ytd-comment-thread-renderer>"#,
        c.author, c.time, body, c.likes
    )
}

fn render_page(title: &str, with_container: bool, comments: &[Comment<'_>]) -> String {
    let threads: String = comments.iter().map(render_thread).collect();
    let section = if with_container {
        format!(
            r#"<ytd-comments id="comments"><div id="contents">{}</div></ytd-comments>"#,
            threads
        )
    } else {
        format!(r#"<div id="related">{}</div>"#, threads)
    };

    format!(
        "<!DOCTYPE html><html><head><title>{}</title></head><body><ytd-app>{}</ytd-app></body></html>",
        title, section
    )
}

fn settings(target_count: usize, output: &TempDir) -> ExportSettings {
    let mut settings = ExportSettings::new(
        target_count,
        DocumentSource::Snapshots {
            paths: vec!["unused.html".to_string()],
        },
    );
    settings.scroll_delay_ms = 0;
    settings.settle_delay_ms = 0;
    settings.stable_scroll_limit = 3;
    settings.output_path = output.path().to_str().unwrap().to_string();
    settings
}

fn files_in(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

fn numbered(count: usize) -> Vec<(String, String)> {
    (1..=count)
        .map(|i| (format!("@viewer{}", i), format!("Comment number {}", i)))
        .collect()
}

#[tokio::test]
async fn test_ten_preloaded_comments_exported() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = numbered(10);
    let comments: Vec<Comment<'_>> = data.iter().map(|(a, b)| comment(a, b)).collect();
    let page = render_page("Learning Rust - YouTube", true, &comments);

    let document = SnapshotDocument::from_html(vec![page])?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(10, &temp_dir))?;

    let outcome = exporter.run().await?;

    let file_name = "youtube_comments_learning_rust___youtube.csv";
    assert!(matches!(
        &outcome,
        ExtractionOutcome::Exported { records: 10, requested: 10, file_name: name, .. } if name == file_name
    ));

    let bytes = std::fs::read(temp_dir.path().join(file_name))?;
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));

    let text = String::from_utf8(bytes[3..].to_vec())?;
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "username,comment,published_time,likes");
    assert_eq!(lines[1], "@viewer1,Comment number 1,3 weeks ago,12");
    assert_eq!(lines[10], "@viewer10,Comment number 10,3 weeks ago,12");

    Ok(())
}

#[tokio::test]
async fn test_missing_container_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let comments = vec![comment("@a", "hello")];
    let page = render_page("Video - YouTube", false, &comments);

    let document = SnapshotDocument::from_html(vec![page])?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(5, &temp_dir))?;

    let outcome = exporter.run().await?;

    assert_eq!(outcome, ExtractionOutcome::ContainerMissing);
    assert!(!outcome.is_success());
    assert!(files_in(&temp_dir).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_stalled_loading_exports_what_loaded() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = numbered(3);
    let all: Vec<Comment<'_>> = data.iter().map(|(a, b)| comment(a, b)).collect();

    // 每次捲動多載入一則，之後停滯
    let frames = vec![
        render_page("Slow Video", true, &all[..1]),
        render_page("Slow Video", true, &all[..2]),
        render_page("Slow Video", true, &all[..3]),
    ];

    let document = SnapshotDocument::from_html(frames)?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(5, &temp_dir))?;

    let outcome = exporter.run().await?;

    match &outcome {
        ExtractionOutcome::Exported {
            records,
            requested,
            loaded,
            file_name,
            ..
        } => {
            assert_eq!(*records, 3);
            assert_eq!(*requested, 5);
            assert_eq!(*loaded, 3);
            assert_eq!(file_name, "youtube_comments_slow_video.csv");
        }
        other => panic!("expected export, got {:?}", other),
    }
    assert!(outcome.is_success());

    let text = std::fs::read_to_string(temp_dir.path().join("youtube_comments_slow_video.csv"))?;
    assert_eq!(text.split('\n').count(), 4);

    Ok(())
}

#[tokio::test]
async fn test_items_without_body_yield_no_records() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let comments: Vec<Comment<'_>> = (0..4)
        .map(|_| Comment {
            author: "@silent",
            body: None,
            time: "1 day ago",
            likes: "",
        })
        .collect();
    let page = render_page("Empty Bodies", true, &comments);

    let document = SnapshotDocument::from_html(vec![page])?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(4, &temp_dir))?;

    let outcome = exporter.run().await?;

    assert_eq!(outcome, ExtractionOutcome::NoRecords { loaded: 4 });
    assert!(outcome.message().contains("Could not extract any comments"));
    assert!(files_in(&temp_dir).is_empty());

    Ok(())
}

#[tokio::test]
async fn test_more_loaded_than_requested_is_truncated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = numbered(12);
    let comments: Vec<Comment<'_>> = data.iter().map(|(a, b)| comment(a, b)).collect();
    let page = render_page("Busy Video", true, &comments);

    let document = SnapshotDocument::from_html(vec![page])?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(10, &temp_dir))?;

    let outcome = exporter.run().await?;
    assert!(matches!(
        outcome,
        ExtractionOutcome::Exported {
            records: 10,
            loaded: 12,
            ..
        }
    ));

    let text = std::fs::read_to_string(temp_dir.path().join("youtube_comments_busy_video.csv"))?;
    assert_eq!(text.split('\n').count(), 11);
    assert!(text.contains("@viewer10,"));
    assert!(!text.contains("@viewer11"));

    Ok(())
}

#[tokio::test]
async fn test_blank_like_counts_and_special_characters() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let comments = vec![
        Comment {
            author: "@quoter",
            body: Some("He said \"wow\", then left"),
            time: "5 hours ago",
            likes: "",
        },
        Comment {
            author: "@plain",
            body: Some("nothing special"),
            time: "5 hours ago",
            likes: "  ",
        },
    ];
    let page = render_page("Quotes & Commas", true, &comments);

    let document = SnapshotDocument::from_html(vec![page])?;
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(2, &temp_dir))?;

    exporter.run().await?;

    let text = std::fs::read_to_string(
        temp_dir
            .path()
            .join("youtube_comments_quotes___commas.csv"),
    )?;
    let lines: Vec<&str> = text.trim_start_matches('\u{FEFF}').split('\n').collect();
    assert_eq!(lines[1], r#"@quoter,"He said ""wow"", then left",5 hours ago,0"#);
    assert_eq!(lines[2], "@plain,nothing special,5 hours ago,0");

    Ok(())
}

#[tokio::test]
async fn test_snapshot_files_on_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out_dir = TempDir::new()?;
    let comments = vec![comment("@disk", "saved page")];
    let capture = temp_dir.path().join("capture.html");
    tokio::fs::write(&capture, render_page("Saved Page", true, &comments)).await?;

    let document = SnapshotDocument::from_files(&[capture]).await?;
    let storage = LocalStorage::new(out_dir.path().to_str().unwrap().to_string());
    let exporter = CommentExporter::new(document, storage, settings(1, &out_dir))?;

    let outcome = exporter.run().await?;

    assert!(outcome.is_success());
    assert_eq!(files_in(&out_dir), vec!["youtube_comments_saved_page.csv".to_string()]);

    Ok(())
}
