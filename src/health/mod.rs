//! Out-of-band health checks for the download portal.
//!
//! Every check always runs, a failing one does not stop the next. The report
//! keeps the checks in a fixed order so deployment logs stay comparable.

use crate::downloads::{validate_filename, DownloadsLayout, Manifest, ManifestError, ResolveError};
use std::collections::HashSet;
use std::fmt;
use std::io::ErrorKind;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass(String),
    Fail(String),
}

impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheck {
    DownloadsDir,
    ManifestParse,
    PortalPage,
    ManifestFilenames,
    /// Only runs when [`HealthOptions::check_entry_files`] is set.
    ManifestFilesPresent,
}

impl HealthCheck {
    pub fn name(&self) -> &'static str {
        match self {
            HealthCheck::DownloadsDir => "downloads-dir",
            HealthCheck::ManifestParse => "manifest-parse",
            HealthCheck::PortalPage => "portal-page",
            HealthCheck::ManifestFilenames => "manifest-filenames",
            HealthCheck::ManifestFilesPresent => "manifest-files-present",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HealthCheck::DownloadsDir => "Downloads directory exists",
            HealthCheck::ManifestParse => "Manifest exists and is a JSON array",
            HealthCheck::PortalPage => "Portal page exists",
            HealthCheck::ManifestFilenames => "Manifest entries have safe, unique filenames",
            HealthCheck::ManifestFilesPresent => "Manifest entries point to existing files",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub check: HealthCheck,
    pub outcome: CheckOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct HealthReport {
    pub results: Vec<CheckResult>,
}

impl HealthReport {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_pass())
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.outcome.is_pass()).count()
    }

    pub fn get(&self, check: HealthCheck) -> Option<&CheckOutcome> {
        self.results
            .iter()
            .find(|r| r.check == check)
            .map(|r| &r.outcome)
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "Checking: {}", result.check.description())?;
            match &result.outcome {
                CheckOutcome::Pass(detail) => writeln!(f, "  ✓ {}", detail)?,
                CheckOutcome::Fail(reason) => writeln!(f, "  ✗ Failed: {}", reason)?,
            }
        }
        write!(
            f,
            "\n{}/{} checks passed",
            self.results.len() - self.failed_count(),
            self.results.len()
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct HealthOptions {
    /// Also require every manifest entry to exist under the downloads root.
    /// Off by default: manifests may be deployed before the files they list.
    pub check_entry_files: bool,
}

pub struct HealthVerifier {
    layout: DownloadsLayout,
    options: HealthOptions,
}

impl HealthVerifier {
    pub fn new(layout: DownloadsLayout, options: HealthOptions) -> Self {
        Self { layout, options }
    }

    pub async fn run_all(&self) -> HealthReport {
        let manifest = self.layout.manifest_store().load().await;

        let mut results = vec![
            CheckResult {
                check: HealthCheck::DownloadsDir,
                outcome: self.check_downloads_dir().await,
            },
            CheckResult {
                check: HealthCheck::ManifestParse,
                outcome: check_manifest_parse(&manifest),
            },
            CheckResult {
                check: HealthCheck::PortalPage,
                outcome: self.check_portal_page().await,
            },
            CheckResult {
                check: HealthCheck::ManifestFilenames,
                outcome: check_manifest_filenames(&manifest),
            },
        ];
        if self.options.check_entry_files {
            results.push(CheckResult {
                check: HealthCheck::ManifestFilesPresent,
                outcome: self.check_entry_files(&manifest).await,
            });
        }

        for result in &results {
            match &result.outcome {
                CheckOutcome::Pass(detail) => info!("[{}] {}", result.check.name(), detail),
                CheckOutcome::Fail(reason) => error!("[{}] {}", result.check.name(), reason),
            }
        }

        HealthReport { results }
    }

    async fn check_downloads_dir(&self) -> CheckOutcome {
        let dir = &self.layout.downloads_dir;
        if self.layout.resolver().root_exists().await {
            CheckOutcome::Pass(format!("Directory exists: {}", dir.display()))
        } else {
            CheckOutcome::Fail(format!("Directory does not exist: {}", dir.display()))
        }
    }

    async fn check_portal_page(&self) -> CheckOutcome {
        let page = &self.layout.portal_page;
        match tokio::fs::metadata(page).await {
            Ok(metadata) if metadata.is_file() => {
                CheckOutcome::Pass(format!("Portal page exists: {}", page.display()))
            }
            Ok(_) => CheckOutcome::Fail(format!("Portal page is not a file: {}", page.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                CheckOutcome::Fail(format!("Portal page does not exist: {}", page.display()))
            }
            Err(err) => CheckOutcome::Fail(format!(
                "Could not inspect portal page {}: {}",
                page.display(),
                err
            )),
        }
    }

    async fn check_entry_files(&self, manifest: &Result<Manifest, ManifestError>) -> CheckOutcome {
        let manifest = match manifest {
            Ok(manifest) => manifest,
            Err(err) => return CheckOutcome::Fail(format!("Manifest could not be loaded: {}", err)),
        };

        let resolver = self.layout.resolver();
        let mut missing = Vec::new();
        for entry in manifest.entries() {
            // Unsafe names are reported by the filename check, never touch the disk for them.
            let Ok(filename) = validate_filename(&entry.filename) else {
                continue;
            };
            match resolver.resolve(&filename).await {
                Ok(_) => {}
                Err(ResolveError::NotFound) => missing.push(entry.filename.clone()),
                Err(ResolveError::Io(err)) => {
                    return CheckOutcome::Fail(format!(
                        "Could not inspect {}: {}",
                        entry.filename, err
                    ))
                }
            }
        }

        if missing.is_empty() {
            CheckOutcome::Pass(format!("All {} manifest files exist", manifest.len()))
        } else {
            CheckOutcome::Fail(format!(
                "{} manifest file(s) missing: {}",
                missing.len(),
                missing.join(", ")
            ))
        }
    }
}

fn check_manifest_parse(manifest: &Result<Manifest, ManifestError>) -> CheckOutcome {
    match manifest {
        Ok(manifest) => CheckOutcome::Pass(format!("Manifest valid ({} entries)", manifest.len())),
        Err(err) => CheckOutcome::Fail(err.to_string()),
    }
}

fn check_manifest_filenames(manifest: &Result<Manifest, ManifestError>) -> CheckOutcome {
    let manifest = match manifest {
        Ok(manifest) => manifest,
        Err(err) => return CheckOutcome::Fail(format!("Manifest could not be loaded: {}", err)),
    };

    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    for (index, entry) in manifest.entries().iter().enumerate() {
        if let Err(err) = validate_filename(&entry.filename) {
            problems.push(format!("entry {}: {}", index, err));
        } else if !seen.insert(entry.filename.as_str()) {
            problems.push(format!("entry {}: duplicate filename {}", index, entry.filename));
        }
    }

    if problems.is_empty() {
        CheckOutcome::Pass("All manifest entries have safe filenames".to_owned())
    } else {
        CheckOutcome::Fail(format!(
            "Unsafe manifest entries: {}",
            problems.join("; ")
        ))
    }
}
