//! Container runtime command lines
//!
//! Builds the docker invocations issued over the remote shell. Nothing here
//! executes anything.

use crate::domain::entities::{ContainerSpec, Privilege};
use crate::domain::services::shell::quote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockerCommands {
    privilege: Privilege,
}

impl DockerCommands {
    pub fn new(privilege: Privilege) -> Self {
        Self { privilege }
    }

    fn bin(&self) -> &'static str {
        match self.privilege {
            Privilege::User => "docker",
            Privilege::Sudo => "sudo docker",
        }
    }

    pub fn build(&self, context_dir: &str, tag: &str) -> String {
        format!("cd {} && {} build -t {} .", quote(context_dir), self.bin(), quote(tag))
    }

    /// Throwaway container on the host network with the remote env file.
    ///
    /// `command` is passed through unquoted so configured commands keep
    /// their arguments.
    pub fn run_once(&self, image: &str, env_file: &str, command: &str) -> String {
        format!(
            "{} run --rm --network host --env-file {} {} {}",
            self.bin(),
            quote(env_file),
            quote(image),
            command
        )
    }

    pub fn volume_inspect(&self, name: &str) -> String {
        format!("{} volume inspect {} >/dev/null 2>&1", self.bin(), quote(name))
    }

    pub fn volume_create(&self, name: &str) -> String {
        format!("{} volume create {}", self.bin(), quote(name))
    }

    pub fn container_inspect(&self, name: &str) -> String {
        format!("{} container inspect {} >/dev/null 2>&1", self.bin(), quote(name))
    }

    pub fn stop(&self, name: &str) -> String {
        format!("{} stop {}", self.bin(), quote(name))
    }

    pub fn remove(&self, name: &str) -> String {
        format!("{} rm {}", self.bin(), quote(name))
    }

    pub fn run_detached(&self, spec: &ContainerSpec) -> String {
        let mut parts = vec![
            format!("{} run -d", self.bin()),
            format!("--name {}", quote(&spec.name)),
            format!("--restart {}", spec.restart),
        ];
        for (host, container) in &spec.ports {
            parts.push(format!("-p {}:{}", host, container));
        }
        if let Some(env_file) = &spec.env_file {
            parts.push(format!("--env-file {}", quote(env_file)));
        }
        for mount in &spec.volumes {
            parts.push(format!("-v {}", quote(&format!("{}:{}", mount.volume, mount.target))));
        }
        for bind in &spec.binds {
            parts.push(format!("-v {}", quote(&format!("{}:{}", bind.source, bind.target))));
        }
        parts.push(quote(&spec.image));
        parts.join(" ")
    }

    pub fn logs(&self, name: &str, tail: usize) -> String {
        format!("{} logs --tail {} {}", self.bin(), tail, quote(name))
    }

    /// Throwaway container that writes `volume` as a tar archive into
    /// `<out_dir>/<archive>`.
    pub fn archive_volume(&self, volume: &str, out_dir: &str, archive: &str) -> String {
        format!(
            "{} run --rm -v {} -v {} alpine tar czf {} -C /source .",
            self.bin(),
            quote(&format!("{}:/source:ro", volume)),
            quote(&format!("{}:/backup", out_dir)),
            quote(&format!("/backup/{}", archive))
        )
    }
}
