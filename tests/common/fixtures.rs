//! Test fixture creation for the download portal

use super::constants::*;
use anyhow::Result;
use portal_server::DownloadsLayout;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

/// A temporary site: `<root>/public` is the public directory and
/// `<root>/secret.txt` sits outside of it.
pub struct TestSite {
    pub layout: DownloadsLayout,
    _root: TempDir,
}

/// Creates a site with the portal page, a two-entry manifest and only the
/// guide file deployed.
pub fn create_test_site() -> Result<TestSite> {
    let root = TempDir::new()?;
    fs::write(root.path().join(SECRET_FILENAME), SECRET_CONTENT)?;

    let public_dir = root.path().join("public");
    let layout = DownloadsLayout::from_public_dir(&public_dir);
    fs::create_dir_all(&layout.downloads_dir)?;
    fs::write(&layout.portal_page, PORTAL_PAGE_CONTENT)?;
    fs::write(layout.downloads_dir.join(GUIDE_FILENAME), GUIDE_BYTES)?;

    write_manifest(
        &layout,
        &json!([
            {
                "filename": GUIDE_FILENAME,
                "name": GUIDE_NAME,
                "version": GUIDE_VERSION,
                "description": "Everything about local services",
                "size": "1 KB"
            },
            {
                "filename": MAP_FILENAME,
                "name": MAP_NAME,
                "version": MAP_VERSION
            }
        ]),
    )?;

    Ok(TestSite {
        layout,
        _root: root,
    })
}

/// Overwrites the manifest document with any JSON value, valid or not.
pub fn write_manifest(layout: &DownloadsLayout, manifest: &Value) -> Result<()> {
    fs::write(&layout.manifest_path, serde_json::to_string_pretty(manifest)?)?;
    Ok(())
}
