#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::SiteFixture;
use predicates::prelude::*;
use serde_json::Value;

fn index_json(site: &SiteFixture, extra: &[&str]) -> Value {
    let stdout = site
        .cmd()
        .arg("index")
        .args(extra)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&stdout).unwrap()
}

#[test]
fn second_run_loads_from_cache() {
    let site = SiteFixture::new();

    let first = index_json(&site, &[]);
    assert_eq!(first["source"], "fresh");
    assert_eq!(first["documents"], 3);
    assert_eq!(first["skipped"], 0);

    let second = index_json(&site, &[]);
    assert_eq!(second["source"], "cache");
    assert_eq!(second["documents"], 3);
}

#[test]
fn force_rebuilds() {
    let site = SiteFixture::new();
    index_json(&site, &[]);

    assert_eq!(index_json(&site, &["--force"])["source"], "fresh");
}

#[test]
fn missing_documents_are_reported_as_skipped() {
    let site = SiteFixture::new();
    std::fs::remove_file(site.docs_dir().join("guides/theming.md")).unwrap();

    let report = index_json(&site, &[]);
    assert_eq!(report["documents"], 2);
    assert_eq!(report["skipped"], 1);

    site.cmd()
        .args(["index", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 documents could not be loaded"));
}

#[test]
fn cache_clear_forces_fresh_build() {
    let site = SiteFixture::new();
    index_json(&site, &[]);

    site.cmd()
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared search cache"));

    assert_eq!(index_json(&site, &[])["source"], "fresh");
}

#[test]
fn cache_dir_can_come_from_env() {
    let site = SiteFixture::new();
    let env_cache = site.dir.path().join("env-cache");

    common::docsite_cmd()
        .env("DOCSITE_CACHE_DIR", &env_cache)
        .arg("--content-root")
        .arg(site.content_root())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 3 documents"));

    assert!(env_cache.join("docsite_search_index.json").exists());
}

#[test]
fn sites_sharing_a_cache_dir_are_indexed_separately() {
    let first = SiteFixture::new();
    let second = SiteFixture::new();
    second.write(
        "guides/theming.md",
        "---\ntitle: Typography\n---\n# Typography\n\nKerning and font pairing.\n",
    );
    assert_eq!(index_json(&first, &[])["source"], "fresh");

    let stdout = common::docsite_cmd()
        .arg("--content-root")
        .arg(second.content_root())
        .arg("--cache-dir")
        .arg(first.cache_dir())
        .args(["search", "kerning", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let payload: Value = serde_json::from_slice(&stdout).unwrap();

    let results = payload["results"].as_array().unwrap();
    assert_eq!(results[0]["path"], "/docs/guides/theming");
    assert_eq!(results[0]["title"], "Typography");
}
