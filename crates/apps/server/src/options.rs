use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Add-on options written by the supervisor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddonOptions {
    #[serde(default)]
    pub allow_all_ips: bool,
    /// Options this server does not interpret; kept for the startup log.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddonOptions {
    /// A missing file means defaults.
    pub async fn load(path: &Path) -> Result<Self, String> {
        match tokio::fs::read_to_string(path).await {
            Ok(s) => serde_json::from_str(&s).map_err(|e| e.to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(author, version, about = "Zones editor server")]
pub struct Args {
    /// Accept requests from every address, not only the ingress proxy
    #[arg(short = 'a', long)]
    pub allow_all_ips: bool,
}
