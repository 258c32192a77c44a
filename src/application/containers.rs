//! Container lifecycle and health verification
//!
//! Replacement is stop-then-start: the previous containers are gone before
//! the new ones run. Named volumes and the bind-mounted `static/` directory
//! survive because only containers are removed.

use std::thread;
use std::time::Duration;

use crate::domain::entities::{ContainerSet, EnvironmentProfile};
use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteShell};
use crate::domain::services::{health, DockerCommands};
use crate::domain::value_objects::Stage;
use crate::error::{DeployError, DeployResult};

use super::remote::{exec, exec_ok, probe};

/// Ensure volumes, remove old containers, start new ones.
pub fn replace_containers(
    shell: &dyn RemoteShell,
    profile: &EnvironmentProfile,
    set: &ContainerSet,
    events: &dyn DeployEventSink,
) -> DeployResult<()> {
    let docker = DockerCommands::new(profile.privilege);
    let failure = |operation: String| {
        move |reason: String| DeployError::ContainerFailure { operation, reason }
    };

    for volume in set.volume_names() {
        let exists = probe(shell, events, &docker.volume_inspect(&volume))
            .map_err(|e| failure(format!("inspect volume {}", volume))(e.to_string()))?;
        if !exists {
            exec_ok(shell, events, &docker.volume_create(&volume))
                .map_err(failure(format!("create volume {}", volume)))?;
            events.on_event(DeployEvent::VolumeCreated { name: volume });
        }
    }

    for spec in set.stop_order() {
        let exists = probe(shell, events, &docker.container_inspect(&spec.name))
            .map_err(|e| failure(format!("inspect {}", spec.name))(e.to_string()))?;
        if !exists {
            continue;
        }
        // A non-zero `stop` on an already stopped container is fine; a lost
        // session is not.
        exec(shell, events, &docker.stop(&spec.name))
            .map_err(|e| failure(format!("stop {}", spec.name))(e.to_string()))?;
        exec_ok(shell, events, &docker.remove(&spec.name))
            .map_err(failure(format!("remove {}", spec.name)))?;
        events.on_event(DeployEvent::ContainerRemoved {
            name: spec.name.clone(),
        });
    }

    for spec in set.start_order() {
        exec_ok(shell, events, &docker.run_detached(spec))
            .map_err(failure(format!("start {}", spec.name)))?;
        events.on_event(DeployEvent::ContainerStarted {
            name: spec.name.clone(),
        });
    }

    Ok(())
}

/// Health polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub settle: Duration,
    pub retries: u32,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthOutcome {
    Healthy { attempts: u32 },
    Unhealthy { attempts: u32, last_status: Option<u16> },
}

impl HealthOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthOutcome::Healthy { .. })
    }
}

/// Wait `settle`, then probe the health endpoint up to `retries` times.
pub fn verify_health(
    shell: &dyn RemoteShell,
    profile: &EnvironmentProfile,
    policy: HealthPolicy,
    events: &dyn DeployEventSink,
) -> HealthOutcome {
    if !policy.settle.is_zero() {
        events.on_event(DeployEvent::Info {
            stage: Stage::Health,
            message: format!("waiting {}s for containers to settle", policy.settle.as_secs()),
        });
        thread::sleep(policy.settle);
    }

    let command = health::probe_command(profile.app_port, &profile.health_path);
    let max = policy.retries.max(1);
    let mut last_status = None;

    for attempt in 1..=max {
        let status = exec(shell, events, &command)
            .ok()
            .and_then(|out| health::parse_status(&out.stdout));
        events.on_event(DeployEvent::HealthAttempt {
            attempt,
            max,
            status,
        });
        if health::is_healthy(status) {
            return HealthOutcome::Healthy { attempts: attempt };
        }
        last_status = status;
        if attempt < max {
            thread::sleep(policy.interval);
        }
    }

    HealthOutcome::Unhealthy {
        attempts: max,
        last_status,
    }
}
