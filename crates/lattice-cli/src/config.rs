use lattice_common::{DesiredLrpCreateRequest, EnvironmentVariable};
use lattice_receptor::Credentials;

use crate::args::TemplateArgs;

/// Log source tag attached to application output.
const APP_LOG_SOURCE: &str = "APP";

pub fn build_template(defaults: &TemplateArgs) -> DesiredLrpCreateRequest {
    let env = defaults
        .ports
        .first()
        .map(|port| vec![EnvironmentVariable::new("PORT", port.to_string())])
        .unwrap_or_default();

    DesiredLrpCreateRequest {
        domain: defaults.domain.clone(),
        stack: defaults.stack.clone(),
        instances: defaults.instances,
        memory_mb: defaults.memory_mb,
        disk_mb: defaults.disk_mb,
        cpu_weight: defaults.cpu_weight,
        start_timeout: defaults.start_timeout,
        ports: defaults.ports.clone(),
        env,
        log_source: APP_LOG_SOURCE.to_string(),
        ..Default::default()
    }
}

/// Basic-auth credentials when a username was given.
pub fn build_credentials(
    username: Option<&str>,
    password: Option<&str>,
) -> Option<Credentials> {
    let username = username.filter(|u| !u.is_empty())?;
    Some(Credentials {
        username: username.to_string(),
        password: password.unwrap_or_default().to_string(),
    })
}
