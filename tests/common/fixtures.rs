//! Config snippets shared across CLI tests.

/// Homolog fully configured, pointing at an address that is never dialed in
/// these tests. The key path is relative to the project root.
pub const HOMOLOG_CONFIG: &str = r#"
[environments.homolog]
host = "192.0.2.10"
user = "deploy"
ssh_key = "keys/homolog_ed25519"
remote_dir = "/opt/campaigns"
"#;

/// Development run command that leaves a marker file behind.
pub fn development_config(run_command: &str) -> String {
    format!(
        "[development]\nrun_command = \"{}\"\n{}",
        run_command, HOMOLOG_CONFIG
    )
}
