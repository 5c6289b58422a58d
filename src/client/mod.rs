//! Kubernetes client bootstrap

use crate::error::{KtError, Result};
use kube::{config::KubeConfigOptions, Client, Config};

/// Create a Kubernetes client.
///
/// With an explicit context the kubeconfig is consulted directly.
/// Without one the configuration is inferred, which also covers
/// running inside a cluster with a mounted service account, the usual
/// deployment mode of the monitor.
pub async fn create_client(context: Option<&str>) -> Result<Client> {
    let config = load_config(context).await?;
    Client::try_from(config).map_err(KtError::from)
}

async fn load_config(context: Option<&str>) -> Result<Config> {
    match context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            };
            Config::from_kubeconfig(&options)
                .await
                .map_err(|e| KtError::Config(format!("Failed to load kubeconfig: {e}")))
        }
        None => Config::infer()
            .await
            .map_err(|e| KtError::Config(format!("Failed to infer cluster config: {e}"))),
    }
}
