use channel_audit::report::{build_recommendation_prompt, render_summary};
use channel_audit::store::HISTORY_LIMIT;
use channel_audit::{audit_channel, AuditStore, CatalogSnapshot, ChannelMetadata, PipelineError, VideoRecord};
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

fn snapshot() -> CatalogSnapshot {
    let start = Utc.with_ymd_and_hms(2022, 1, 3, 9, 0, 0).unwrap();
    let videos = (0..30)
        .map(|i| {
            let title = match i % 3 {
                0 => format!("{} Rust Tricks You Missed", i + 3),
                1 => format!("Why Rust {}?", i),
                _ => format!("Building a CLI: part {}", i),
            };
            let duration = if i % 6 == 0 { 40 } else { 480 + (i % 4) * 300 };
            let views = 1_000 + (i * 3_731) % 40_000;
            VideoRecord::new(
                format!("vid{:02}", i),
                title,
                start + Duration::days(i as i64 * 14),
                views,
                views / 30,
                views / 200,
                duration,
            )
        })
        .collect();

    let channel = ChannelMetadata {
        channel_id: "UCworkflowworkflowworkfl".to_string(),
        title: "Workflow Channel".to_string(),
        subscriber_count: 48_200,
        video_count: 30,
        custom_url: Some("@workflow".to_string()),
        ..Default::default()
    };

    CatalogSnapshot::new(channel, videos)
}

#[tokio::test]
async fn test_snapshot_audit_is_saved_and_listed() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = temp_dir.path().join("catalog.json");
    snapshot().save(&snapshot_path).await.unwrap();

    let source = CatalogSnapshot::load(&snapshot_path).await.unwrap();
    let analysis = audit_channel(&source, "https://www.youtube.com/@workflow").await.unwrap();

    assert_eq!(analysis.total_videos, 30);
    assert_eq!(analysis.shorts_count, 5);
    assert_eq!(analysis.format_split.long_form.count, 25);
    assert_eq!(analysis.top_videos.len(), 10);
    assert!(analysis
        .top_videos
        .windows(2)
        .all(|pair| pair[0].view_count >= pair[1].view_count));

    let store = AuditStore::new(temp_dir.path().join("audits"));
    let record = store.save(analysis).await.unwrap();

    let listed = store.list(HISTORY_LIMIT).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, record.id);
    assert_eq!(listed[0].channel_title, "Workflow Channel");
    assert!(!listed[0].has_recommendations);

    let loaded = store.load(&record.id).await.unwrap().unwrap();
    assert_eq!(
        serde_json::to_string(&loaded.analysis).unwrap(),
        serde_json::to_string(&record.analysis).unwrap()
    );

    let prompt = build_recommendation_prompt(&loaded.analysis);
    assert!(prompt.contains("## Channel: Workflow Channel"));
    assert!(prompt.contains("- Subscribers: 48,200"));

    let summary = render_summary(&loaded.analysis);
    assert!(summary.contains("48.2K subscribers"));
}

#[tokio::test]
async fn test_unknown_channel_is_not_found() {
    let source = snapshot();
    let result = audit_channel(&source, "@nobody").await;
    assert!(matches!(result, Err(PipelineError::Source(_))));
}
