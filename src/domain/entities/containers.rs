//! Container set entity
//!
//! The service containers a deploy replaces, with the volumes that must
//! survive the replacement.

use crate::domain::entities::EnvironmentProfile;

/// Named docker volume mounted into a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub volume: String,
    pub target: String,
}

/// Host directory bind-mounted into a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// (host port, container port)
    pub ports: Vec<(u16, u16)>,
    pub env_file: Option<String>,
    pub volumes: Vec<VolumeMount>,
    pub binds: Vec<BindMount>,
    pub restart: String,
}

/// Naming and mount layout of the service containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLayout {
    pub app_name: String,
    pub app_container_port: u16,
    pub app_volumes: Vec<VolumeMount>,
    /// Where the remote `static/` directory is mounted inside the app
    pub static_mount: String,
    pub cache_name: String,
    pub cache_image: String,
    pub cache_container_port: u16,
    pub cache_volumes: Vec<VolumeMount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSet {
    pub app: ContainerSpec,
    pub cache: ContainerSpec,
}

impl ContainerSet {
    pub fn for_profile(profile: &EnvironmentProfile, layout: &ContainerLayout) -> Self {
        let cache = ContainerSpec {
            name: layout.cache_name.clone(),
            image: layout.cache_image.clone(),
            ports: vec![(profile.cache_port, layout.cache_container_port)],
            env_file: None,
            volumes: layout.cache_volumes.clone(),
            binds: Vec::new(),
            restart: "unless-stopped".to_string(),
        };

        let app = ContainerSpec {
            name: layout.app_name.clone(),
            image: profile.image_tag.clone(),
            ports: vec![(profile.app_port, layout.app_container_port)],
            env_file: Some(profile.remote_path(super::manifest::REMOTE_ENV_FILE)),
            volumes: layout.app_volumes.clone(),
            binds: vec![BindMount {
                source: profile.remote_path("static"),
                target: layout.static_mount.clone(),
            }],
            restart: "unless-stopped".to_string(),
        };

        Self { app, cache }
    }

    /// Containers in start order (cache first, the app depends on it).
    pub fn start_order(&self) -> [&ContainerSpec; 2] {
        [&self.cache, &self.app]
    }

    /// Containers in stop order.
    pub fn stop_order(&self) -> [&ContainerSpec; 2] {
        [&self.app, &self.cache]
    }

    /// Every named volume, without duplicates, in mount order.
    pub fn volume_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for spec in self.start_order() {
            for mount in &spec.volumes {
                if !names.contains(&mount.volume) {
                    names.push(mount.volume.clone());
                }
            }
        }
        names
    }
}

#[cfg(test)]
pub(crate) fn sample_layout() -> ContainerLayout {
    ContainerLayout {
        app_name: "campaigns-api".to_string(),
        app_container_port: 8000,
        app_volumes: vec![VolumeMount {
            volume: "campaigns_logs".to_string(),
            target: "/app/logs".to_string(),
        }],
        static_mount: "/app/static".to_string(),
        cache_name: "campaigns-redis".to_string(),
        cache_image: "redis:7-alpine".to_string(),
        cache_container_port: 6379,
        cache_volumes: vec![VolumeMount {
            volume: "campaigns_redis_data".to_string(),
            target: "/data".to_string(),
        }],
    }
}
