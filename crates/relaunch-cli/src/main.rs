// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use relaunch_cli::{
    LaunchSource, build_request, filter_directive, parse_redirect, render_plan, schema_json,
};
use relaunch_config::{RelaunchConfig, load_config, validate_config};
use relaunch_core::{Redirect, RelaunchedProcess};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "relaunch",
    version,
    about = "Relaunch a VM process with its original command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report whether a process can be relaunched.
    Check {
        /// Inspect this process instead of `relaunch` itself.
        #[arg(long)]
        pid: Option<u32>,
    },

    /// Print the reconstructed command without running it.
    Plan {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Print JSON instead of one token per line.
        #[arg(long)]
        json: bool,
    },

    /// Reconstruct the command, run it, and exit with its exit code.
    Run {
        #[command(flatten)]
        launch: LaunchArgs,

        /// Child stdin: pipe | inherit | discard | file:PATH | append:PATH.
        #[arg(long, default_value = "inherit", value_parser = parse_redirect)]
        stdin: Redirect,

        /// Child stdout: pipe | inherit | discard | file:PATH | append:PATH.
        #[arg(long, default_value = "inherit", value_parser = parse_redirect)]
        stdout: Redirect,

        /// Child stderr: pipe | inherit | discard | file:PATH | append:PATH.
        #[arg(long, default_value = "inherit", value_parser = parse_redirect)]
        stderr: Redirect,
    },

    /// Print the JSON schema of the configuration file.
    Schema,
}

#[derive(Args, Debug)]
struct LaunchArgs {
    /// Take the command line of this process (via /proc).
    #[arg(long, conflicts_with = "exe")]
    pid: Option<u32>,

    /// Take the command line from this executable and the arguments after `--`.
    #[arg(long)]
    exe: Option<String>,

    /// Replace the entry point.
    #[arg(long = "main")]
    main: Option<String>,

    /// Replace the trailing arguments. Can be repeated.
    #[arg(long = "arg")]
    args: Vec<String>,

    /// Launch arguments, used with --exe.
    #[arg(last = true)]
    launch_args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("load relaunch configuration")?;

    let filter = EnvFilter::new(filter_directive(cli.debug, &config));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    for warning in validate_config(&config)? {
        tracing::warn!(target: "relaunch", "{warning}");
    }

    match cli.command {
        Commands::Check { pid } => cmd_check(&config, pid),
        Commands::Plan { launch, json } => cmd_plan(&config, launch, json),
        Commands::Run {
            launch,
            stdin,
            stdout,
            stderr,
        } => {
            let code = cmd_run(&config, launch, stdin, stdout, stderr)?;
            std::process::exit(code);
        }
        Commands::Schema => {
            println!("{}", schema_json()?);
            Ok(())
        }
    }
}

fn cmd_check(config: &RelaunchConfig, pid: Option<u32>) -> Result<()> {
    let relauncher = LaunchSource::from_inputs(pid, None, Vec::new())?.relauncher(config);
    println!("{}", relauncher.capability());
    Ok(())
}

fn cmd_plan(config: &RelaunchConfig, launch: LaunchArgs, json: bool) -> Result<()> {
    let relauncher =
        LaunchSource::from_inputs(launch.pid, launch.exe, launch.launch_args)?.relauncher(config);
    let command = relauncher.plan(&build_request(launch.main, launch.args))?;
    print!("{}", render_plan(&command, json)?);
    Ok(())
}

fn cmd_run(
    config: &RelaunchConfig,
    launch: LaunchArgs,
    stdin: Redirect,
    stdout: Redirect,
    stderr: Redirect,
) -> Result<i32> {
    let source = LaunchSource::from_inputs(launch.pid, launch.exe, launch.launch_args)?;
    source.ensure_runnable(launch.main.as_deref())?;
    let relauncher = source.relauncher(config);
    let request = build_request(launch.main, launch.args)
        .with_stdin(stdin)
        .with_stdout(stdout)
        .with_stderr(stderr);
    let mut child = relauncher.relaunch(&request)?;
    tracing::info!(target: "relaunch", pid = child.id(), "relaunched process started");

    let status = forward_and_wait(&mut child)?;
    // Signal deaths have no code; report the conventional failure.
    Ok(status.code().unwrap_or(1))
}

/// Copy piped child output to our own streams while waiting for the child.
fn forward_and_wait(child: &mut RelaunchedProcess) -> Result<std::process::ExitStatus> {
    drop(child.take_stdin());
    let out = child.take_stdout().map(|mut pipe| {
        std::thread::spawn(move || std::io::copy(&mut pipe, &mut std::io::stdout()))
    });
    let err = child.take_stderr().map(|mut pipe| {
        std::thread::spawn(move || std::io::copy(&mut pipe, &mut std::io::stderr()))
    });

    let status = child.wait().context("wait for relaunched process")?;
    for handle in [out, err].into_iter().flatten() {
        if let Ok(Err(e)) = handle.join() {
            tracing::warn!(target: "relaunch", error = %e, "failed to forward child output");
        }
    }
    std::io::stdout().flush().context("flush stdout")?;
    Ok(status)
}
