use std::time::Duration;

use lattice_receptor::ReceptorClient;

use crate::args::Args;
use crate::config::build_credentials;

pub fn connect(args: &Args) -> anyhow::Result<ReceptorClient> {
    let credentials = build_credentials(args.username.as_deref(), args.password.as_deref());
    let client = ReceptorClient::new(
        &args.receptor_url,
        credentials,
        Duration::from_secs(args.timeout_secs),
    )?;
    Ok(client)
}
