#![allow(clippy::unwrap_used)]

mod common;

use common::{GatedSite, StubSite, full_site, site_manifest};
use docsite_core::index::{CACHE_KEY, CACHE_VERSION_KEY, INDEX_FORMAT_VERSION};
use docsite_core::{
    BuildSource, CacheStore, FileCacheStore, FsDocumentStore, IndexStatus, MemoryCacheStore,
    SearchField, SearchIndex, SearchOptions, SearchSession, SiteConfig,
};
use std::sync::Arc;
use std::time::Duration;

fn index_over(site: &Arc<StubSite>, cache: &Arc<MemoryCacheStore>) -> SearchIndex {
    SearchIndex::new(
        Arc::clone(site) as Arc<_>,
        Arc::clone(cache) as Arc<_>,
        SearchOptions::default(),
    )
}

#[tokio::test]
async fn build_indexes_every_manifest_document() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);

    assert_eq!(index.status(), IndexStatus::Idle);
    let report = index.build_index().await;

    assert_eq!(report.source, BuildSource::Fresh);
    assert_eq!(report.documents, 5);
    assert_eq!(report.skipped, 0);
    assert_eq!(site.document_fetches(), 5);
    assert_eq!(index.status(), IndexStatus::Ready);
}

#[tokio::test]
async fn second_build_is_a_no_op() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);

    index.build_index().await;
    let again = index.build_index().await;

    assert_eq!(again.source, BuildSource::Memory);
    assert_eq!(again.documents, 5);
    assert_eq!(site.manifest_fetches(), 1);
    assert_eq!(site.document_fetches(), 5);
}

#[tokio::test]
async fn fresh_instance_reuses_cached_snapshot() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());

    index_over(&site, &cache).build_index().await;
    assert_eq!(
        cache.get(CACHE_VERSION_KEY).unwrap().as_deref(),
        Some(INDEX_FORMAT_VERSION)
    );

    let second = index_over(&site, &cache);
    let report = second.build_index().await;

    assert_eq!(report.source, BuildSource::Cache);
    assert_eq!(report.documents, 5);
    assert_eq!(site.manifest_fetches(), 1);
    assert_eq!(site.document_fetches(), 5);
    assert!(!second.search("installation").await.into_results().is_empty());
}

#[tokio::test]
async fn version_change_forces_rebuild() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());

    index_over(&site, &cache).build_index().await;
    cache.set(CACHE_VERSION_KEY, "0.9.0").unwrap();

    let report = index_over(&site, &cache).build_index().await;

    assert_eq!(report.source, BuildSource::Fresh);
    assert_eq!(site.document_fetches(), 10);
    assert_eq!(
        cache.get(CACHE_VERSION_KEY).unwrap().as_deref(),
        Some(INDEX_FORMAT_VERSION)
    );
}

#[tokio::test]
async fn expired_snapshot_forces_rebuild() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    cache.set(CACHE_VERSION_KEY, INDEX_FORMAT_VERSION).unwrap();
    cache
        .set(
            CACHE_KEY,
            r#"{"version":"1.0.0","timestamp":0,"documents":[]}"#,
        )
        .unwrap();

    let report = index_over(&site, &cache).build_index().await;

    assert_eq!(report.source, BuildSource::Fresh);
    assert_eq!(report.documents, 5);
}

#[tokio::test]
async fn malformed_snapshot_forces_rebuild() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    cache.set(CACHE_VERSION_KEY, INDEX_FORMAT_VERSION).unwrap();
    cache.set(CACHE_KEY, "not json at all").unwrap();

    let report = index_over(&site, &cache).build_index().await;

    assert_eq!(report.source, BuildSource::Fresh);
}

#[tokio::test]
async fn missing_documents_are_skipped() {
    let site = Arc::new(
        StubSite::new(site_manifest()).with_document("/docs/changelog", "# Changelog\n"),
    );
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);

    let report = index.build_index().await;

    assert_eq!(report.documents, 1);
    assert_eq!(report.skipped, 4);
    assert_eq!(index.skipped_count(), 4);
}

#[tokio::test]
async fn manifest_failure_yields_empty_uncached_index() {
    let site = Arc::new(StubSite::without_manifest());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);

    let report = index.build_index().await;

    assert_eq!(report.documents, 0);
    assert_eq!(index.status(), IndexStatus::Ready);
    assert!(cache.is_empty());
    assert!(index.search("anything").await.into_results().is_empty());
}

#[tokio::test]
async fn short_queries_return_nothing() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);
    index.build_index().await;

    assert!(index.search("").await.into_results().is_empty());
    assert!(index.search("i").await.into_results().is_empty());
    assert!(index.search("  t  ").await.into_results().is_empty());
}

#[tokio::test]
async fn title_match_outranks_body_match() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);
    index.build_index().await;

    let results = index.search("install").await.into_results();
    let paths: Vec<&str> = results.iter().map(|r| r.document.path.as_str()).collect();

    assert_eq!(paths[0], "/docs/getting-started/installation");
    assert!(paths.contains(&"/docs/guides/theming"));
    assert!(results.windows(2).all(|w| w[0].score <= w[1].score));
    assert!(results[0].matched_fields.contains(&SearchField::Title));
    assert!(results[0].matched_fields.contains(&SearchField::Keywords));
}

#[tokio::test]
async fn results_carry_snippet_and_section() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);
    index.build_index().await;

    let results = index.search("palette").await.into_results();
    assert_eq!(results.len(), 1);

    let hit = &results[0];
    assert_eq!(hit.document.section, "Guides");
    assert!(hit.snippet.to_lowercase().contains("palette"));
    assert!(!hit.document.content.contains('#'));
}

#[tokio::test]
async fn search_before_build_is_empty_and_dispose_resets() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = index_over(&site, &cache);

    assert!(!index.search("theming").await.is_indexing());
    assert!(index.search("theming").await.into_results().is_empty());

    index.build_index().await;
    assert!(!index.search("theming").await.into_results().is_empty());

    index.dispose().await;
    assert_eq!(index.status(), IndexStatus::Idle);
    assert_eq!(index.document_count(), 0);
    assert!(!cache.is_empty());
}

#[tokio::test]
async fn clear_cache_forces_next_build_fresh() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());

    let index = index_over(&site, &cache);
    index.build_index().await;
    index.clear_cache().unwrap();
    assert!(cache.is_empty());

    let report = index_over(&site, &cache).build_index().await;
    assert_eq!(report.source, BuildSource::Fresh);
}

#[tokio::test]
async fn file_cache_survives_between_instances() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let site = Arc::new(full_site());

    let build = |site: &Arc<StubSite>| -> anyhow::Result<SearchIndex> {
        Ok(SearchIndex::new(
            Arc::clone(site) as Arc<_>,
            Arc::new(FileCacheStore::new(dir.path())?),
            SearchOptions::default(),
        ))
    };

    assert_eq!(build(&site)?.build_index().await.source, BuildSource::Fresh);
    assert_eq!(build(&site)?.build_index().await.source, BuildSource::Cache);
    Ok(())
}

#[tokio::test]
async fn session_caps_and_groups_results() {
    let site = Arc::new(full_site());
    let cache = Arc::new(MemoryCacheStore::new());
    let index = Arc::new(index_over(&site, &cache));
    index.build_index().await;

    let session = SearchSession::new(index, 1);
    let view = session.query("install").await.unwrap();

    assert!(!view.indexing);
    assert!(view.total_matches >= 2);
    assert_eq!(view.results.len(), 1);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].section, "Getting Started");
    assert_eq!(session.current(), Some(view));
}

#[tokio::test]
async fn corpus_older_than_ttl_is_rebuilt() {
    let site = Arc::new(full_site());
    let options = SearchOptions {
        cache_ttl: Duration::from_millis(200),
        ..SearchOptions::default()
    };
    let index = SearchIndex::new(
        Arc::clone(&site) as Arc<_>,
        Arc::new(MemoryCacheStore::new()),
        options,
    );

    assert_eq!(index.build_index().await.source, BuildSource::Fresh);
    assert_eq!(index.build_index().await.source, BuildSource::Memory);

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(index.build_index().await.source, BuildSource::Fresh);
    assert_eq!(site.manifest_fetches(), 2);
    assert_eq!(index.status(), IndexStatus::Ready);
}

fn write_site(root: &std::path::Path, slug: &str, body: &str) -> anyhow::Result<()> {
    let docs = root.join("docs").join("guides");
    std::fs::create_dir_all(&docs)?;
    std::fs::write(docs.join(format!("{slug}.md")), body)?;
    std::fs::write(
        root.join("docs").join("sidebar.json"),
        format!(
            r#"[{{"type":"folder","title":"Guides","path":"/docs/guides","children":[
                {{"type":"file","title":"{slug}","path":"/docs/guides/{slug}"}}]}}]"#
        ),
    )?;
    Ok(())
}

#[tokio::test]
async fn sites_sharing_a_cache_dir_keep_their_own_corpus() -> anyhow::Result<()> {
    let alpha_root = tempfile::TempDir::new()?;
    let bravo_root = tempfile::TempDir::new()?;
    let cache_dir = tempfile::TempDir::new()?;
    write_site(alpha_root.path(), "alpha", "# Alpha\n\nFirst site.\n")?;
    write_site(bravo_root.path(), "bravo", "# Bravo\n\nSecond site.\n")?;

    let index_for = |root: &std::path::Path| -> anyhow::Result<SearchIndex> {
        Ok(SearchIndex::new(
            Arc::new(FsDocumentStore::new(root, &SiteConfig::default())),
            Arc::new(FileCacheStore::new(cache_dir.path())?),
            SearchOptions::default(),
        ))
    };

    let alpha = index_for(alpha_root.path())?;
    assert_eq!(alpha.build_index().await.source, BuildSource::Fresh);

    let bravo = index_for(bravo_root.path())?;
    let report = bravo.build_index().await;
    assert_eq!(report.source, BuildSource::Fresh);
    assert_eq!(report.documents, 1);

    let hits = bravo.search("bravo").await.into_results();
    assert_eq!(hits[0].document.path, "/docs/guides/bravo");
    assert!(bravo.search("alpha").await.into_results().is_empty());

    let bravo_again = index_for(bravo_root.path())?;
    assert_eq!(bravo_again.build_index().await.source, BuildSource::Cache);
    Ok(())
}

#[tokio::test]
async fn search_during_build_reports_indexing() {
    let site = Arc::new(GatedSite::new(full_site()));
    let index = SearchIndex::new(
        Arc::clone(&site) as Arc<_>,
        Arc::new(MemoryCacheStore::new()),
        SearchOptions::default(),
    );

    let during = async {
        site.entered.notified().await;
        let outcome = index.search("install").await;
        let status = index.status();
        site.release.notify_one();
        (outcome, status)
    };
    let (report, (outcome, status)) = tokio::join!(index.build_index(), during);

    assert!(outcome.is_indexing());
    assert_eq!(status, IndexStatus::Indexing);
    assert_eq!(report.source, BuildSource::Fresh);

    let results = index.search("install").await.into_results();
    assert_eq!(results[0].document.path, "/docs/getting-started/installation");
}

#[tokio::test]
async fn cancelled_build_does_not_leave_index_indexing() {
    let site = Arc::new(GatedSite::new(full_site()));
    let index = SearchIndex::new(
        Arc::clone(&site) as Arc<_>,
        Arc::new(MemoryCacheStore::new()),
        SearchOptions::default(),
    );

    let timed_out = tokio::time::timeout(Duration::from_millis(50), index.build_index()).await;
    assert!(timed_out.is_err());
    assert_eq!(index.status(), IndexStatus::Idle);
    assert!(!index.search("install").await.is_indexing());

    site.release.notify_one();
    assert_eq!(index.build_index().await.source, BuildSource::Fresh);
    assert_eq!(index.status(), IndexStatus::Ready);
}
