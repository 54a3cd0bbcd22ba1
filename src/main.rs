//! Meshgate webhook server - GatewayRoute admission validation

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use clap::{Args, Parser};
use kube::{Api, Client, CustomResourceExt};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meshgate::cache::{run_route_watch, ObjectCache};
use meshgate::crd::GatewayRoute;
use meshgate::webhook::{webhook_router, API_PATH_VALIDATE_GATEWAY_ROUTE};
use meshgate::DEFAULT_WEBHOOK_PORT;

/// Meshgate - admission-time validation for service-mesh gateway routes
#[derive(Parser, Debug)]
#[command(name = "meshgate", version, about, long_about = None)]
struct Cli {
    /// Generate the GatewayRoute CRD manifest and exit
    #[arg(long)]
    crd: bool,

    #[command(flatten)]
    serve: ServeArgs,
}

/// Webhook server arguments
#[derive(Args, Debug)]
struct ServeArgs {
    /// Address for the webhook HTTPS server
    #[arg(long, default_value = "0.0.0.0:8443")]
    addr: SocketAddr,

    /// Path to the TLS certificate (PEM), typically a mounted secret
    #[arg(long, env = "MESHGATE_TLS_CERT", default_value = "/etc/meshgate/tls/tls.crt")]
    tls_cert: PathBuf,

    /// Path to the TLS private key (PEM)
    #[arg(long, env = "MESHGATE_TLS_KEY", default_value = "/etc/meshgate/tls/tls.key")]
    tls_key: PathBuf,

    /// Path to the CA bundle advertised in the webhook registration
    ///
    /// When absent the ValidatingWebhookConfiguration bootstrap is skipped
    /// and registration is left to external tooling (e.g. cert-manager).
    #[arg(long, env = "MESHGATE_CA_BUNDLE")]
    ca_bundle: Option<PathBuf>,

    /// Namespace the webhook Service lives in
    #[arg(long, env = "MESHGATE_NAMESPACE", default_value = "meshgate-system")]
    namespace: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install crypto provider - FIPS-validated aws-lc-rs.
    // This MUST succeed for the webhook to terminate TLS at all.
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!(
            "CRITICAL: Failed to install FIPS-validated crypto provider: {:?}. \
             The webhook cannot serve TLS without a working crypto provider.",
            e
        );
        std::process::exit(1);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.crd {
        // Generate CRD YAML
        let crd = serde_yaml::to_string(&GatewayRoute::crd())
            .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;
        println!("{crd}");
        return Ok(());
    }

    run_server(cli.serve).await
}

/// Run the webhook server
///
/// Installs the CRD and (when a CA bundle is supplied) the webhook
/// registration on startup, keeps the route cache warm with a watcher, and
/// serves the admission endpoint over HTTPS until interrupted.
async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    info!("meshgate webhook starting...");

    let tls_config = RustlsConfig::from_pem_file(&args.tls_cert, &args.tls_key)
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load TLS material from {:?} / {:?}: {}",
                args.tls_cert,
                args.tls_key,
                e
            )
        })?;

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

    // The webhook installs its own CRD on startup so the schema version
    // always matches the binary version.
    ensure_crd_installed(&client).await?;

    match &args.ca_bundle {
        Some(path) => {
            let ca_bundle = tokio::fs::read(path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read CA bundle {:?}: {}", path, e))?;
            ensure_webhook_config(&client, ca_bundle, &args.namespace).await?;
        }
        None => {
            warn!("No CA bundle provided, skipping ValidatingWebhookConfiguration bootstrap");
        }
    }

    // Keep an indexed cache of GatewayRoutes warm for consumers that need
    // by-namespace lookups. Validation itself never reads it.
    let cache: Arc<ObjectCache<GatewayRoute>> = Arc::new(ObjectCache::new());
    let watch_client = client.clone();
    let watch_cache = cache.clone();
    tokio::spawn(async move {
        loop {
            if let Err(e) = run_route_watch(watch_client.clone(), watch_cache.clone()).await {
                error!(error = %e, "GatewayRoute watch failed, restarting");
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    });

    info!(addr = %args.addr, "Webhook HTTPS server listening");
    let server = axum_server::bind_rustls(args.addr, tls_config)
        .serve(webhook_router().into_make_service());

    tokio::select! {
        result = server => {
            result.map_err(|e| anyhow::anyhow!("Webhook server error: {}", e))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("meshgate webhook shutting down");
    Ok(())
}

/// Ensure the GatewayRoute CRD is installed
///
/// Uses server-side apply so create and upgrade are the same operation.
async fn ensure_crd_installed(client: &Client) -> anyhow::Result<()> {
    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
    use kube::api::{Patch, PatchParams};

    let crds: Api<CustomResourceDefinition> = Api::all(client.clone());
    let params = PatchParams::apply("meshgate-webhook").force();

    info!("Installing GatewayRoute CRD...");
    crds.patch(
        "gatewayroutes.meshgate.dev",
        &params,
        &Patch::Apply(&GatewayRoute::crd()),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to install GatewayRoute CRD: {}", e))?;

    info!("GatewayRoute CRD installed/updated");
    Ok(())
}

/// Ensure the ValidatingWebhookConfiguration for GatewayRoutes is installed
///
/// This creates a webhook that intercepts GatewayRoute CREATE/UPDATE and
/// routes them to the validation endpoint, plus the ClusterIP Service that
/// exposes the endpoint inside the cluster.
async fn ensure_webhook_config(
    client: &Client,
    ca_bundle: Vec<u8>,
    namespace: &str,
) -> anyhow::Result<()> {
    use k8s_openapi::api::admissionregistration::v1::{
        RuleWithOperations, ServiceReference, ValidatingWebhook, ValidatingWebhookConfiguration,
        WebhookClientConfig,
    };
    use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
    use kube::api::{Patch, PatchParams};

    let params = PatchParams::apply("meshgate-webhook").force();

    // 1. ClusterIP Service exposing the webhook endpoint internally
    let webhook_service = Service {
        metadata: kube::api::ObjectMeta {
            name: Some("meshgate-webhook".to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector: Some(std::collections::BTreeMap::from([(
                "app".to_string(),
                "meshgate".to_string(),
            )])),
            ports: Some(vec![ServicePort {
                name: Some("https".to_string()),
                port: 443,
                target_port: Some(k8s_openapi::apimachinery::pkg::util::intstr::IntOrString::Int(
                    DEFAULT_WEBHOOK_PORT as i32,
                )),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    };

    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    services
        .patch("meshgate-webhook", &params, &Patch::Apply(&webhook_service))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create webhook Service: {}", e))?;

    // 2. ValidatingWebhookConfiguration routing GatewayRoute admission to us
    let webhook_config = ValidatingWebhookConfiguration {
        metadata: kube::api::ObjectMeta {
            name: Some("meshgate-gatewayroute-validator".to_string()),
            ..Default::default()
        },
        webhooks: Some(vec![ValidatingWebhook {
            name: "vgatewayroute.meshgate.dev".to_string(),
            admission_review_versions: vec!["v1".to_string()],
            side_effects: "None".to_string(),
            failure_policy: Some("Fail".to_string()),
            match_policy: Some("Equivalent".to_string()),
            rules: Some(vec![RuleWithOperations {
                operations: Some(vec!["CREATE".to_string(), "UPDATE".to_string()]),
                api_groups: Some(vec!["meshgate.dev".to_string()]),
                api_versions: Some(vec!["v1beta2".to_string()]),
                resources: Some(vec!["gatewayroutes".to_string()]),
                scope: Some("Namespaced".to_string()),
            }]),
            client_config: WebhookClientConfig {
                service: Some(ServiceReference {
                    name: "meshgate-webhook".to_string(),
                    namespace: namespace.to_string(),
                    path: Some(API_PATH_VALIDATE_GATEWAY_ROUTE.to_string()),
                    port: Some(443),
                }),
                ca_bundle: Some(k8s_openapi::ByteString(ca_bundle)),
                ..Default::default()
            },
            ..Default::default()
        }]),
    };

    let webhooks: Api<ValidatingWebhookConfiguration> = Api::all(client.clone());
    webhooks
        .patch(
            "meshgate-gatewayroute-validator",
            &params,
            &Patch::Apply(&webhook_config),
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create ValidatingWebhookConfiguration: {}", e))?;

    info!("Webhook configuration installed");
    Ok(())
}
