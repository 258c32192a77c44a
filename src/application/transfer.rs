//! Transfer planning and execution
//!
//! Planning expands the manifest into concrete files under the project root;
//! the exclusion list prunes whole subtrees during the walk so excluded data
//! never reaches a transfer tool. Execution hands each artifact to the first
//! available `TransferStrategy` and mirrors directory artifacts.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::remote::exec_ok;
use crate::domain::entities::{Artifact, EnvironmentProfile, TransferManifest};
use crate::domain::ports::{
    DeployEvent, DeployEventSink, PlannedFile, PushRequest, RemoteShell, TransferStrategy,
};
use crate::domain::services::shell::quote;
use crate::domain::value_objects::{ExclusionList, Fingerprint, FingerprintBuilder, SshEndpoint, Stage};
use crate::error::{DeployError, DeployResult};

/// Outcome of planning one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPlan {
    pub artifact: Artifact,
    /// Number of files planned for this artifact
    pub files: usize,
    /// Set when nothing of this artifact will be pushed
    pub skipped: Option<String>,
    /// Directory artifacts are mirrored: remote files absent locally go
    pub directory: bool,
}

#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub files: Vec<PlannedFile>,
    /// Paths pruned by the exclusion list, relative to the project root
    pub excluded: Vec<PathBuf>,
    pub artifacts: Vec<ArtifactPlan>,
    pub warnings: Vec<String>,
    pub fingerprint: Fingerprint,
    /// Gate every push request re-applies
    pub exclusions: ExclusionList,
}

impl TransferPlan {
    /// Artifacts that will be pushed, each with its slice of `files`
    pub fn pushable(&self) -> impl Iterator<Item = (&ArtifactPlan, &[PlannedFile])> {
        let mut offset = 0;
        self.artifacts.iter().filter_map(move |artifact| {
            let files = &self.files[offset..offset + artifact.files];
            offset += artifact.files;
            artifact.skipped.is_none().then_some((artifact, files))
        })
    }

    pub fn total_bytes(&self, project_root: &Path) -> u64 {
        self.files
            .iter()
            .filter_map(|f| fs::metadata(project_root.join(&f.source)).ok())
            .map(|m| m.len())
            .sum()
    }
}

/// Plan the transfer a deploy of `profile` would perform, honouring the
/// project's ignore file.
pub fn plan_for_profile(
    project_root: &Path,
    profile: &EnvironmentProfile,
    ignore_file: &str,
) -> DeployResult<TransferPlan> {
    let exclusions = ExclusionList::load(project_root, ignore_file)?;
    let manifest = TransferManifest::standard(&profile.env_file, exclusions);
    plan_transfer(project_root, &manifest)
}

/// Expand `manifest` into the files a deploy would push.
///
/// Missing required artifacts fail here, before any remote action. An
/// artifact covered by the exclusion list is withheld with a warning even
/// when required.
pub fn plan_transfer(project_root: &Path, manifest: &TransferManifest) -> DeployResult<TransferPlan> {
    let exclusions = manifest.exclusions();
    let mut files = Vec::new();
    let mut excluded = Vec::new();
    let mut artifacts = Vec::new();
    let mut warnings = Vec::new();

    for artifact in manifest.artifacts() {
        let local = project_root.join(&artifact.source);
        let is_dir = local.is_dir();

        if exclusions.is_excluded(&artifact.source, is_dir)
            || exclusions.is_excluded(&artifact.destination, is_dir)
        {
            excluded.push(artifact.source.clone());
            warnings.push(format!(
                "'{}' is covered by the exclusion list and will not be pushed",
                artifact.source.display()
            ));
            artifacts.push(ArtifactPlan {
                artifact: artifact.clone(),
                files: 0,
                skipped: Some("excluded".to_string()),
                directory: is_dir,
            });
            continue;
        }

        if !local.exists() {
            if artifact.required {
                return Err(DeployError::RequiredTransferFailure {
                    artifact: artifact.source.clone(),
                    reason: format!("not found at {}", local.display()),
                });
            }
            artifacts.push(ArtifactPlan {
                artifact: artifact.clone(),
                files: 0,
                skipped: Some("not present locally".to_string()),
                directory: false,
            });
            continue;
        }

        let before = files.len();
        if is_dir {
            let mut walk = Walk {
                project_root,
                artifact,
                exclusions,
                files: &mut files,
                excluded: &mut excluded,
                warnings: &mut warnings,
            };
            if let Err(e) = walk.dir(&local) {
                if artifact.required {
                    return Err(DeployError::RequiredTransferFailure {
                        artifact: artifact.source.clone(),
                        reason: e.to_string(),
                    });
                }
                warnings.push(format!("skipping '{}': {}", artifact.source.display(), e));
                files.truncate(before);
                artifacts.push(ArtifactPlan {
                    artifact: artifact.clone(),
                    files: 0,
                    skipped: Some(e.to_string()),
                    directory: true,
                });
                continue;
            }
        } else {
            files.push(PlannedFile {
                source: artifact.source.clone(),
                destination: artifact.destination.clone(),
            });
        }

        artifacts.push(ArtifactPlan {
            artifact: artifact.clone(),
            files: files.len() - before,
            skipped: None,
            directory: is_dir,
        });
    }

    let fingerprint = fingerprint(project_root, &files)?;
    Ok(TransferPlan {
        files,
        excluded,
        artifacts,
        warnings,
        fingerprint,
        exclusions: exclusions.clone(),
    })
}

struct Walk<'a> {
    project_root: &'a Path,
    artifact: &'a Artifact,
    exclusions: &'a ExclusionList,
    files: &'a mut Vec<PlannedFile>,
    excluded: &'a mut Vec<PathBuf>,
    warnings: &'a mut Vec<String>,
}

impl Walk<'_> {
    fn dir(&mut self, dir: &Path) -> std::io::Result<()> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type()?;
            let rel = match path.strip_prefix(self.project_root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => continue,
            };
            let dest = match rel.strip_prefix(&self.artifact.source) {
                Ok(inner) => self.artifact.destination.join(inner),
                Err(_) => rel.clone(),
            };

            if file_type.is_symlink() {
                self.warnings
                    .push(format!("not following symlink '{}'", rel.display()));
                continue;
            }

            let is_dir = file_type.is_dir();
            if self.exclusions.is_excluded(&rel, is_dir) || self.exclusions.is_excluded(&dest, is_dir)
            {
                self.excluded.push(rel);
                continue;
            }

            if is_dir {
                self.dir(&path)?;
            } else if file_type.is_file() {
                self.files.push(PlannedFile {
                    source: rel,
                    destination: dest,
                });
            }
        }
        Ok(())
    }
}

fn fingerprint(project_root: &Path, files: &[PlannedFile]) -> DeployResult<Fingerprint> {
    let mut builder = FingerprintBuilder::new();
    let mut sorted: Vec<&PlannedFile> = files.iter().collect();
    sorted.sort_by(|a, b| a.destination.cmp(&b.destination));
    for file in sorted {
        let content = fs::read(project_root.join(&file.source))?;
        builder.add(&file.destination.to_string_lossy(), &content);
    }
    Ok(builder.finish())
}

/// Where a plan is pushed
pub struct TransferTarget<'a> {
    pub project_root: &'a Path,
    pub remote_root: &'a str,
    pub endpoint: &'a SshEndpoint,
    /// Session used to list and remove stale files under mirrored directories
    pub shell: &'a dyn RemoteShell,
}

/// What a transfer changed on the remote host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Destinations written
    pub pushed: Vec<PathBuf>,
    /// Sources refused by the exclusion gate
    pub refused: Vec<PathBuf>,
    /// Stale destinations removed from mirrored directories
    pub removed: Vec<PathBuf>,
    /// Optional artifacts that failed to push or prune
    pub warnings: Vec<String>,
}

/// Paths per `rm` invocation when pruning
const REMOVE_CHUNK: usize = 100;

/// Push a plan with the first available strategy, one artifact at a time.
///
/// A failed required artifact aborts the run and is named in the error; a
/// failed optional artifact becomes a warning. After a directory artifact is
/// pushed, remote files under it that were neither pushed nor excluded are
/// removed, so the directory mirrors the local tree.
pub fn execute_transfer(
    plan: &TransferPlan,
    target: &TransferTarget<'_>,
    strategies: &[Box<dyn TransferStrategy>],
    events: &dyn DeployEventSink,
) -> DeployResult<TransferOutcome> {
    for path in &plan.excluded {
        events.on_event(DeployEvent::Excluded { path: path.clone() });
    }
    for artifact in plan.artifacts.iter().filter(|a| a.skipped.is_some()) {
        events.on_event(DeployEvent::ArtifactSkipped {
            artifact: artifact.artifact.source.clone(),
            reason: artifact.skipped.clone().unwrap_or_default(),
        });
    }
    for warning in &plan.warnings {
        events.on_event(DeployEvent::Warning {
            stage: Stage::Transfer,
            message: warning.clone(),
        });
    }

    let strategy = strategies.iter().find(|s| s.is_available()).ok_or_else(|| {
        let first_required = plan
            .artifacts
            .iter()
            .find(|a| a.artifact.required && a.skipped.is_none())
            .map(|a| a.artifact.source.clone())
            .unwrap_or_default();
        DeployError::RequiredTransferFailure {
            artifact: first_required,
            reason: "neither rsync nor scp is available".to_string(),
        }
    })?;

    let mut outcome = TransferOutcome::default();
    for (artifact, files) in plan.pushable() {
        let source = &artifact.artifact.source;
        let request = PushRequest {
            local_root: target.project_root,
            remote_root: target.remote_root,
            endpoint: target.endpoint,
            files,
            exclusions: &plan.exclusions,
        };

        let report = match strategy.push(&request) {
            Ok(report) => report,
            Err(e) => {
                let reason = format!("{}: {}", strategy.name(), e);
                artifact_failure(artifact, reason, &mut outcome, events)?;
                continue;
            }
        };

        for refused in &report.refused {
            events.on_event(DeployEvent::Excluded {
                path: refused.clone(),
            });
        }
        events.on_event(DeployEvent::ArtifactPushed {
            artifact: source.clone(),
            files: report.pushed.len(),
            method: strategy.name(),
        });

        if artifact.directory {
            let destination = &artifact.artifact.destination;
            match prune(target, destination, &report.pushed, &plan.exclusions, events) {
                Ok(removed) => {
                    if !removed.is_empty() {
                        events.on_event(DeployEvent::StaleRemoved {
                            artifact: source.clone(),
                            files: removed.len(),
                        });
                    }
                    outcome.removed.extend(removed);
                }
                Err(reason) => {
                    let reason = format!("removing stale files: {}", reason);
                    artifact_failure(artifact, reason, &mut outcome, events)?;
                }
            }
        }

        outcome.pushed.extend(report.pushed);
        outcome.refused.extend(report.refused);
    }

    Ok(outcome)
}

/// Error for a required artifact, warning for an optional one
fn artifact_failure(
    artifact: &ArtifactPlan,
    reason: String,
    outcome: &mut TransferOutcome,
    events: &dyn DeployEventSink,
) -> DeployResult<()> {
    if artifact.artifact.required {
        return Err(DeployError::RequiredTransferFailure {
            artifact: artifact.artifact.source.clone(),
            reason,
        });
    }
    let message = format!(
        "optional '{}' not pushed: {}",
        artifact.artifact.source.display(),
        reason
    );
    events.on_event(DeployEvent::Warning {
        stage: Stage::Transfer,
        message: message.clone(),
    });
    outcome.warnings.push(message);
    Ok(())
}

/// Remove remote files under `dir` that this push did not write.
fn prune(
    target: &TransferTarget<'_>,
    dir: &Path,
    pushed: &[PathBuf],
    exclusions: &ExclusionList,
    events: &dyn DeployEventSink,
) -> Result<Vec<PathBuf>, String> {
    let root = quote(target.remote_root);
    let dir_arg = quote(&dir.to_string_lossy());
    let listing = exec_ok(
        target.shell,
        events,
        &format!(
            "cd {} && if [ -d {} ]; then find {} -type f; fi",
            root, dir_arg, dir_arg
        ),
    )?;

    let pushed: BTreeSet<&Path> = pushed.iter().map(PathBuf::as_path).collect();
    let stale = stale_files(&listing.stdout, &pushed, exclusions);
    for chunk in stale.chunks(REMOVE_CHUNK) {
        let args: Vec<String> = chunk.iter().map(|p| quote(&p.to_string_lossy())).collect();
        exec_ok(
            target.shell,
            events,
            &format!("cd {} && rm -f -- {}", root, args.join(" ")),
        )?;
    }
    Ok(stale)
}

/// Entries of a remote `find` listing that were not pushed and are not
/// covered by the exclusion list.
pub fn stale_files(
    listing: &str,
    pushed: &BTreeSet<&Path>,
    exclusions: &ExclusionList,
) -> Vec<PathBuf> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| PathBuf::from(line.strip_prefix("./").unwrap_or(line)))
        .filter(|path| !pushed.contains(path.as_path()))
        .filter(|path| !exclusions.is_excluded(path, false))
        .collect()
}
