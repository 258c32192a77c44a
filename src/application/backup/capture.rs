//! Backup capture steps

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::application::remote::{exec, exec_ok, probe};
use crate::config::STATE_DIR;
use crate::domain::entities::{
    BackupManifest, BackupMode, ContainerSet, EnvironmentProfile, VolumeArchive, REMOTE_ENV_FILE,
};
use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteShell};
use crate::domain::services::shell::quote;
use crate::domain::services::{select_expired, DockerCommands};
use crate::domain::value_objects::{Environment, Stage};
use crate::error::{DeployError, DeployResult};

/// Backups live under `<remote_dir>/backups`
pub const BACKUPS_DIR: &str = "backups";

/// Deployed files copied by a full backup
const CONFIG_FILES: &[&str] = &[
    REMOTE_ENV_FILE,
    "docker-compose.yml",
    "Dockerfile",
    "alembic.ini",
    "requirements.txt",
];

pub struct BackupRequest<'a> {
    pub profile: &'a EnvironmentProfile,
    pub containers: &'a ContainerSet,
    pub mode: BackupMode,
    /// Backups kept per mode after rotation (at least 1)
    pub keep: usize,
    pub log_tail: usize,
    /// Image providing `pg_dump`
    pub dump_image: &'a str,
    /// Local directory for manifest copies
    pub local_dir: PathBuf,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created {
        manifest: BackupManifest,
        local_copy: PathBuf,
        rotated: Vec<String>,
        warnings: Vec<String>,
    },
    /// Nothing deployed yet, so there is nothing to capture
    Skipped { reason: String },
}

fn failure(step: impl Into<String>) -> impl FnOnce(String) -> DeployError {
    let step = step.into();
    move |reason| DeployError::BackupFailure { step, reason }
}

/// Capture a backup over an open shell.
///
/// The database dump, volume archives, `static/` archive, config copy and
/// manifest are required; log capture, disk usage and rotation only warn.
pub fn run_backup(
    shell: &dyn RemoteShell,
    request: &BackupRequest<'_>,
    events: &dyn DeployEventSink,
) -> DeployResult<BackupOutcome> {
    let profile = request.profile;
    let docker = DockerCommands::new(profile.privilege);
    let env_file = profile.remote_path(REMOTE_ENV_FILE);
    let mut warnings = Vec::new();

    let deployed = probe(shell, events, &format!("test -f {}", quote(&env_file)))
        .map_err(|e| failure("inspect")(e.to_string()))?;
    if !deployed {
        return Ok(BackupOutcome::Skipped {
            reason: format!("{} has no deployed {}", profile.remote_dir, REMOTE_ENV_FILE),
        });
    }

    let backups_root = profile.remote_path(BACKUPS_DIR);
    let mut manifest = BackupManifest::new(
        profile.environment,
        request.mode,
        request.created_at,
        profile.host.clone(),
        &backups_root,
    );

    exec_ok(
        shell,
        events,
        &format!("mkdir -p {}", quote(&manifest.file("logs"))),
    )
    .map_err(failure("prepare"))?;

    // Database
    let dump = manifest.file("database.sql");
    let dump_cmd = format!(
        "{} > {}",
        docker.run_once(request.dump_image, &env_file, "sh -c 'pg_dump --no-owner \"$DATABASE_URL\"'"),
        quote(&dump)
    );
    exec_ok(shell, events, &dump_cmd).map_err(failure("database"))?;
    manifest.database_dump = Some(dump);

    // Named volumes
    for volume in request.containers.volume_names() {
        let archive = format!("{}.tar.gz", volume);
        exec_ok(
            shell,
            events,
            &docker.archive_volume(&volume, &manifest.directory, &archive),
        )
        .map_err(failure(format!("volume {}", volume)))?;
        let archive = manifest.file(&archive);
        manifest
            .volume_archives
            .push(VolumeArchive { volume, archive });
    }

    // static/ (operator uploads, never written by deploy)
    let static_dir = profile.remote_path("static");
    let has_static = probe(shell, events, &format!("test -d {}", quote(&static_dir)))
        .map_err(|e| failure("static")(e.to_string()))?;
    if has_static {
        let archive = manifest.file("static.tar.gz");
        exec_ok(
            shell,
            events,
            &format!(
                "tar czf {} -C {} static",
                quote(&archive),
                quote(&profile.remote_dir)
            ),
        )
        .map_err(failure("static"))?;
        manifest.static_archive = Some(archive);
    }

    // Container logs
    for spec in request.containers.stop_order() {
        let log_file = manifest.file(&format!("logs/{}.log", spec.name));
        let command = format!(
            "{} && {} > {} 2>&1",
            docker.container_inspect(&spec.name),
            docker.logs(&spec.name, request.log_tail),
            quote(&log_file)
        );
        match exec(shell, events, &command) {
            Ok(out) if out.is_success() => manifest.container_logs.push(log_file),
            Ok(_) => warnings.push(format!("no logs captured for {} (not running)", spec.name)),
            Err(e) => warnings.push(format!("log capture for {} failed: {}", spec.name, e)),
        }
    }

    // Deployed configuration
    if request.mode.includes_config() {
        let config_dir = manifest.file("config");
        let files = CONFIG_FILES
            .iter()
            .map(|f| quote(f))
            .collect::<Vec<_>>()
            .join(" ");
        let command = format!(
            "mkdir -p {dst} && cd {src} && for f in {files}; do if [ -e \"$f\" ]; then cp -p \"$f\" {dst}/; fi; done",
            dst = quote(&config_dir),
            src = quote(&profile.remote_dir),
            files = files,
        );
        exec_ok(shell, events, &command).map_err(failure("config"))?;
        manifest.config_copy = Some(config_dir);
    }

    // Disk usage
    match exec(shell, events, &format!("du -sh {}", quote(&manifest.directory))) {
        Ok(out) if out.is_success() => {
            manifest.disk_usage = out.stdout.split_whitespace().next().map(str::to_string);
        }
        _ => warnings.push("could not measure backup size".to_string()),
    }

    // Manifest, remote then local
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| failure("manifest")(e.to_string()))?;
    let output = shell
        .run_with_input(
            &format!("cat > {}", quote(&manifest.file("manifest.json"))),
            json.as_bytes(),
        )
        .map_err(|e| failure("manifest")(e.to_string()))?;
    if !output.is_success() {
        return Err(failure("manifest")(output.failure_reason()));
    }
    let local_copy = write_local_copy(&request.local_dir, &manifest.id, &json)
        .map_err(|e| failure("local manifest")(e.to_string()))?;

    events.on_event(DeployEvent::BackupCreated {
        id: manifest.id.clone(),
        directory: manifest.directory.clone(),
    });

    let keep = request.keep.max(1);
    let rotated = match rotate_remote(shell, &backups_root, request.mode, keep, events) {
        Ok(removed) => removed,
        Err(reason) => {
            warnings.push(format!("remote rotation failed: {}", reason));
            Vec::new()
        }
    };
    if let Err(e) = rotate_local(&request.local_dir, request.mode, keep) {
        warnings.push(format!("local rotation failed: {}", e));
    }
    if !rotated.is_empty() {
        events.on_event(DeployEvent::BackupsRotated {
            removed: rotated.clone(),
        });
    }

    for warning in &warnings {
        events.on_event(DeployEvent::Warning {
            stage: Stage::Backup,
            message: warning.clone(),
        });
    }

    Ok(BackupOutcome::Created {
        manifest,
        local_copy,
        rotated,
        warnings,
    })
}

fn write_local_copy(dir: &Path, id: &str, json: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", id));
    fs::write(&path, json)?;
    Ok(path)
}

fn rotate_remote(
    shell: &dyn RemoteShell,
    backups_root: &str,
    mode: BackupMode,
    keep: usize,
    events: &dyn DeployEventSink,
) -> Result<Vec<String>, String> {
    let listing = exec_ok(shell, events, &format!("ls -1 {}", quote(backups_root)))?;
    let names: Vec<&str> = listing.stdout.lines().map(str::trim).collect();
    let expired = select_expired(&names, mode, keep);
    for name in &expired {
        exec_ok(
            shell,
            events,
            &format!("rm -rf {}", quote(&format!("{}/{}", backups_root, name))),
        )?;
    }
    Ok(expired)
}

fn rotate_local(dir: &Path, mode: BackupMode, keep: usize) -> std::io::Result<()> {
    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }
    for stem in select_expired(&stems, mode, keep) {
        fs::remove_file(dir.join(format!("{}.json", stem)))?;
    }
    Ok(())
}

/// Local directory holding manifest copies for `environment`.
pub fn local_backup_dir(project_root: &Path, environment: Environment) -> PathBuf {
    project_root
        .join(STATE_DIR)
        .join(BACKUPS_DIR)
        .join(environment.as_str())
}
