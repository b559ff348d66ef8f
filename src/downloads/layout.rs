use super::{DownloadResolver, ManifestStore};
use std::path::{Path, PathBuf};

pub const DEFAULT_DOWNLOADS_DIR_NAME: &str = "downloads";
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "downloads.json";
pub const DEFAULT_PORTAL_PAGE_NAME: &str = "downloads.html";

/// Where the portal lives on disk.
///
/// Built once from the resolved configuration, the server and the health
/// check both derive their stores from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadsLayout {
    pub public_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub portal_page: PathBuf,
}

impl DownloadsLayout {
    /// The conventional layout: `<public>/downloads/downloads.json` and
    /// `<public>/downloads.html`.
    pub fn from_public_dir(public_dir: &Path) -> Self {
        let downloads_dir = public_dir.join(DEFAULT_DOWNLOADS_DIR_NAME);
        Self {
            public_dir: public_dir.to_owned(),
            manifest_path: downloads_dir.join(DEFAULT_MANIFEST_FILE_NAME),
            downloads_dir,
            portal_page: public_dir.join(DEFAULT_PORTAL_PAGE_NAME),
        }
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::new(&self.manifest_path)
    }

    pub fn resolver(&self) -> DownloadResolver {
        DownloadResolver::new(&self.downloads_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conventional_layout() {
        let layout = DownloadsLayout::from_public_dir(Path::new("/srv/public"));
        assert_eq!(layout.downloads_dir, PathBuf::from("/srv/public/downloads"));
        assert_eq!(
            layout.manifest_path,
            PathBuf::from("/srv/public/downloads/downloads.json")
        );
        assert_eq!(
            layout.portal_page,
            PathBuf::from("/srv/public/downloads.html")
        );
        assert_eq!(layout.resolver().root(), Path::new("/srv/public/downloads"));
        assert_eq!(
            layout.manifest_store().path(),
            Path::new("/srv/public/downloads/downloads.json")
        );
    }
}
