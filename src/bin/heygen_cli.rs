//! HeyGen CLI: 列出操作、批量执行参数项、验证凭据的命令行工具
//!
//! Usage:
//!   heygen-cli operations                                             List the operation table
//!   heygen-cli run <resource> <operation> --items <file> [--continue-on-fail]
//!   heygen-cli test-credentials                                       Call GET /v1/user_info

use anyhow::{anyhow, bail, Context};
use heygen_lib_rust::{HeyGenClient, HeyGenClientBuilder, Item, OperationKey};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heygen_lib_rust=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "operations" => cmd_operations(),
        "run" => cmd_run(&args[2..]).await,
        "test-credentials" => cmd_test_credentials(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("heygen-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"heygen-cli - HeyGen API 命令行工具

USAGE:
    heygen-cli <COMMAND> [OPTIONS]

COMMANDS:
    operations                                   List every resource/operation and its endpoint
    run <resource> <operation> --items <file>    Run one operation over a JSON/YAML items file
        [--continue-on-fail]                     Record item failures instead of stopping
        [--base-url <url>]                       Send to another base URL (mock servers)
    test-credentials [--base-url <url>]          Verify the API key against /v1/user_info
    version                                      Show version information
    help                                         Show this help message

ENVIRONMENT:
    HEYGEN_API_KEY                      API key (used when none is stored in the keyring)
    HEYGEN_HTTP_TIMEOUT_SECS            Request timeout (default 30)
    HEYGEN_PROXY_URL                    Proxy for all traffic
    RUST_LOG                            Log filter (default heygen_lib_rust=info)"#
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn client_builder(args: &[String]) -> HeyGenClientBuilder {
    let mut builder = HeyGenClient::builder();
    if let Some(base_url) = flag_value(args, "--base-url") {
        builder = builder.base_url_override(base_url);
    }
    builder
}

fn cmd_operations() -> anyhow::Result<()> {
    println!("{:<14} {:<22} {:<6} {}", "RESOURCE", "OPERATION", "METHOD", "ENDPOINT");
    for key in OperationKey::ALL {
        let endpoint = key.endpoint();
        println!(
            "{:<14} {:<22} {:<6} https://{}.heygen.com/{}{}",
            key.resource().as_str(),
            key.name(),
            endpoint.method.as_str(),
            endpoint.host.as_str(),
            endpoint.version.as_str(),
            endpoint.path
        );
    }
    Ok(())
}

fn load_items(path: &PathBuf) -> anyhow::Result<Vec<Item>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read items file {}", path.display()))?;
    // Accepts YAML and JSON.
    serde_yaml::from_str::<Vec<Item>>(&content)
        .with_context(|| format!("invalid items file {}", path.display()))
}

async fn cmd_run(args: &[String]) -> anyhow::Result<()> {
    let (resource, operation) = match (args.first(), args.get(1)) {
        (Some(r), Some(o)) if !r.starts_with("--") && !o.starts_with("--") => (r, o),
        _ => bail!("usage: heygen-cli run <resource> <operation> --items <file>"),
    };
    let key = OperationKey::parse(resource, operation)?;
    let items_path = flag_value(args, "--items")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("--items <file> is required"))?;
    let items = load_items(&items_path)?;

    let client = client_builder(args)
        .continue_on_fail(args.iter().any(|a| a == "--continue-on-fail"))
        .build()?;

    let result = client.execute(key, &items).await?;
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    if result.failure_count() > 0 {
        eprintln!(
            "{} of {} item(s) failed",
            result.failure_count(),
            result.total_items
        );
    }
    Ok(())
}

async fn cmd_test_credentials(args: &[String]) -> anyhow::Result<()> {
    let client = client_builder(args).build()?;
    let body = client.test_credentials().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
