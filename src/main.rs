// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Probflow CLI entrypoint.
//!
//! By default this serves the editor over MCP streamable HTTP at `http://127.0.0.1:<port>/mcp`
//! until interrupted.
//!
//! Use `--mcp` to run the MCP server over stdio instead (intended for tool integrations).

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use probflow::analysis::{AnalysisRequest, ChannelHandoff};
use probflow::model::{ProcessDiagram, ProcessId};
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

const DEFAULT_MCP_HTTP_PORT: u16 = 27436;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<diagram.bpmn>] [--verbose] [--mcp-http-port <port>]\n  {program} [--diagram <file>] [--verbose] [--mcp-http-port <port>]\n  {program} --demo [--mcp-http-port <port>]\n  {program} [<diagram.bpmn>] --mcp\n  {program} --demo --mcp\n\nBy default MCP is served over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n\nWithout a diagram file an empty process is opened.\n--demo opens a built-in branching process and cannot be combined with a diagram file.\n\nLogs go to stderr; RUST_LOG overrides the level (--verbose defaults to debug)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    demo: bool,
    diagram_path: Option<String>,
    mcp_http_port: Option<u16>,
    verbose: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--diagram" => {
                if options.diagram_path.is_some() {
                    return Err(());
                }
                let path = args.next().ok_or(())?;
                options.diagram_path = Some(path);
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            "--verbose" | "-v" => {
                if options.verbose {
                    return Err(());
                }
                options.verbose = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.diagram_path.is_some() {
                    return Err(());
                }
                options.diagram_path = Some(arg);
            }
        }
    }

    if options.demo && options.diagram_path.is_some() {
        return Err(());
    }

    if options.mcp && options.mcp_http_port.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_diagram(options: &CliOptions) -> Result<ProcessDiagram, Box<dyn Error>> {
    if options.demo {
        return Ok(probflow::model::fixtures::branching_process());
    }
    let Some(path) = options.diagram_path.as_deref() else {
        return Ok(ProcessDiagram::new("Definitions_1", ProcessId::new("Process_1")?));
    };
    let xml = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read diagram {path}: {err}"))?;
    let diagram = probflow::format::bpmn::parse_bpmn(&xml)?;
    tracing::info!(path, elements = diagram.len(), "diagram loaded");
    Ok(diagram)
}

/// Logs queued analysis requests. The converter and simulator live outside this process.
async fn drain_handoff(mut rx: UnboundedReceiver<AnalysisRequest>) {
    while let Some(request) = rx.recv().await {
        let bytes = request.to_json().map(|payload| payload.len()).unwrap_or(0);
        tracing::info!(endpoint = request.endpoint(), bytes, "analysis request ready for delivery");
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "probflow".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing(options.verbose);

        let diagram = load_diagram(&options)?;
        let (handoff, handoff_rx) = ChannelHandoff::channel();
        let mcp = probflow::mcp::ProbflowMcp::new(diagram).with_handoff(Arc::new(handoff));

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.mcp {
            runtime.block_on(async move {
                tokio::spawn(drain_handoff(handoff_rx));
                mcp.serve_stdio().await
            })?;
            return Ok(());
        }

        let mcp_http_port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
            tracing::info!(addr = %listener.local_addr()?, "serving MCP at /mcp");

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();
            let server_shutdown = shutdown_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let mcp = mcp.clone();
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
            };

            let drain = tokio::spawn(drain_handoff(handoff_rx));

            let router = Router::new().nest_service("/mcp", mcp_service);
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                });
                if let Err(err) = serve.await {
                    tracing::error!(%err, "MCP HTTP server error");
                }
            });

            let interrupted = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
            shutdown_token.cancel();
            let _ = server_handle.await;
            drain.abort();

            interrupted?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("probflow: {err}");
        std::process::exit(1);
    }
}
