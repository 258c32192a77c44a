//! Health endpoint probing

/// `curl` line printing only the HTTP status of the app's health endpoint.
pub fn probe_command(port: u16, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    format!(
        "curl -s -o /dev/null -w '%{{http_code}}' --max-time 5 http://127.0.0.1:{}{}",
        port, path
    )
}

/// Status code printed by the probe. `000` (no response) is `None`.
pub fn parse_status(stdout: &str) -> Option<u16> {
    let code: u16 = stdout.trim().parse().ok()?;
    (code != 0).then_some(code)
}

pub fn is_healthy(status: Option<u16>) -> bool {
    matches!(status, Some(code) if (200..300).contains(&code))
}
