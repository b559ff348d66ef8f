mod filename;
mod layout;
mod manifest;
mod resolver;

pub use filename::{validate_filename, FilenameError, SafeFilename};
pub use layout::{DownloadsLayout, DEFAULT_MANIFEST_FILE_NAME};
pub use manifest::{DownloadEntry, Manifest, ManifestError, ManifestStore};
pub use resolver::{DownloadResolver, ResolveError, ResolvedFile};
