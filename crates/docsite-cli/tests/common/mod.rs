#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// A `docsite` command isolated from the user's config and colors.
pub fn docsite_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsite"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("DOCSITE_CONFIG_DIR", empty_config_dir());
    cmd.env_remove("DOCSITE_CACHE_DIR");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn empty_config_dir() -> &'static Path {
    static DIR: std::sync::OnceLock<TempDir> = std::sync::OnceLock::new();
    DIR.get_or_init(|| tempfile::tempdir().expect("failed to create config dir for tests"))
        .path()
}

pub const SIDEBAR: &str = r#"[
  {
    "type": "folder",
    "title": "Getting Started",
    "path": "/docs/getting-started",
    "children": [
      { "type": "file", "title": "Introduction", "path": "/docs/getting-started/introduction" },
      { "type": "file", "title": "Installation", "path": "/docs/getting-started/installation" }
    ]
  },
  {
    "type": "folder",
    "title": "Guides",
    "path": "/docs/guides",
    "description": "Step-by-step walkthroughs",
    "children": [
      { "type": "file", "title": "Theming", "path": "/docs/guides/theming" }
    ]
  }
]"#;

pub const INTRODUCTION: &str =
    "---\ntitle: Introduction\ndescription: Start here\n---\n# Introduction\n\nWelcome to the documentation.\n";
pub const INSTALLATION: &str = "---\ntitle: Installation\nkeywords: [install, setup]\norder: 2\n---\n# Installation\n\n## Requirements\n\nRun the installer and follow the prompts.\n";
pub const THEMING: &str = "---\ntitle: Theming\n---\n# Theming\n\n## Colors\n\nChange the palette, then install the theme package.\n";

/// A site directory laid out as `public/docs/...` with its own cache dir.
pub struct SiteFixture {
    pub dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fixture.write("getting-started/introduction.md", INTRODUCTION);
        fixture.write("getting-started/installation.md", INSTALLATION);
        fixture.write("guides/theming.md", THEMING);
        fixture.write("sidebar.json", SIDEBAR);
        fixture
    }

    pub fn content_root(&self) -> PathBuf {
        self.dir.path().join("public")
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.content_root().join("docs")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.docs_dir().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// `docsite` pointed at this site's content root and cache.
    pub fn cmd(&self) -> Command {
        let mut cmd = docsite_cmd();
        cmd.arg("--content-root")
            .arg(self.content_root())
            .arg("--cache-dir")
            .arg(self.cache_dir());
        cmd
    }
}
