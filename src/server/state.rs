use axum::extract::FromRef;

use crate::downloads::{DownloadResolver, DownloadsLayout, ManifestStore};
use std::time::Instant;

#[derive(Clone)]
pub struct ServerState {
    pub start_time: Instant,
    pub manifest_store: ManifestStore,
    pub resolver: DownloadResolver,
}

impl ServerState {
    pub fn new(layout: &DownloadsLayout) -> ServerState {
        ServerState {
            start_time: Instant::now(),
            manifest_store: layout.manifest_store(),
            resolver: layout.resolver(),
        }
    }
}

impl FromRef<ServerState> for ManifestStore {
    fn from_ref(input: &ServerState) -> Self {
        input.manifest_store.clone()
    }
}

impl FromRef<ServerState> for DownloadResolver {
    fn from_ref(input: &ServerState) -> Self {
        input.resolver.clone()
    }
}
