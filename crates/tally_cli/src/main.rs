// crates/tally_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup, and the run path
// (load snapshot → resolve params → service call → JSON document with digest).

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Bad input: flags, snapshot shape/integrity, unknown office or district.
    pub const VALIDATION: u8 = 2;
    /// Internal invariant broken inside the allocators.
    pub const INTERNAL: u8 = 3;
    /// Read/write failures and data-source errors.
    pub const IO: u8 = 4;
    /// Business rule: e.g. no seat count defined for the office.
    pub const BUSINESS: u8 = 5;
}

use std::fmt;
use std::io::Write;
use std::process::ExitCode;

use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use args::{parse_and_validate as parse_cli, Args, Command};
use tally_core::variables::AllocationParams;
use tally_io::{canonical_json, hasher, loader, snapshot::ElectionSnapshot, IoError};
use tally_pipeline::{
    parse_office, DistrictSeatAllocationService, PipelineError, ResultsAggregationService,
};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Business(String),
    Internal(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m)
            | MainError::Io(m)
            | MainError::Business(m)
            | MainError::Internal(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("tally: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION);
        }
    };
    init_tracing(&args);

    match run(&args) {
        Ok(()) => ExitCode::from(exitcodes::OK),
        Err(e) => {
            eprintln!("tally: error: {e}");
            ExitCode::from(map_error(&e))
        }
    }
}

/// `TALLY_LOG`, then `RUST_LOG`, then `warn`. `--quiet` / `-v` win over both.
fn init_tracing(args: &Args) {
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TALLY_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tfmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn map_error(e: &MainError) -> u8 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
        MainError::Business(_) => exitcodes::BUSINESS,
        MainError::Internal(_) => exitcodes::INTERNAL,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Snapshot(m) => MainError::Validation(format!("snapshot: {m}")),
        IoError::Hash(m) => MainError::Validation(format!("hash: {m}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::InvalidOffice(_) | PipelineError::DistrictNotFound(_) => {
            MainError::Validation(e.to_string())
        }
        PipelineError::SeatsUndefined { .. } => MainError::Business(e.to_string()),
        PipelineError::Allocate(_) => MainError::Internal(e.to_string()),
        PipelineError::Source(_) => MainError::Io(e.to_string()),
    }
}

fn to_json<T: serde::Serialize>(v: &T) -> Result<Value, MainError> {
    serde_json::to_value(v).map_err(|e| MainError::Io(format!("serialize: {e}")))
}

/// File params first, then flag overrides.
fn resolve_params(args: &Args) -> Result<AllocationParams, MainError> {
    let mut params = match &args.params {
        Some(p) => loader::load_params(p).map_err(map_io_err)?,
        None => AllocationParams::default(),
    };
    if let Some(policy) = args.tie_policy {
        params.tie_policy = policy;
    }
    if let Some(seed) = args.seed {
        params.tie_seed = seed;
    }
    debug!(tie_policy = %params.tie_policy, seed = params.tie_seed, "params resolved");
    Ok(params)
}

fn run(args: &Args) -> Result<(), MainError> {
    let snap = loader::load_snapshot(&args.snapshot).map_err(map_io_err)?;
    let params = resolve_params(args)?;
    let result = execute(&args.command, &snap, params)?;
    emit(args, result)
}

fn execute(cmd: &Command, snap: &ElectionSnapshot, params: AllocationParams) -> Result<Value, MainError> {
    let allocator = DistrictSeatAllocationService::with_params(snap, params);
    let results = ResultsAggregationService::new(snap);

    match cmd {
        Command::Allocate { district, office } => {
            to_json(&allocator.allocate_by_name(*district, office).map_err(map_pipeline_err)?)
        }
        Command::AllocateAll { office } => {
            let office = parse_office(office).map_err(map_pipeline_err)?;
            to_json(&allocator.allocate_all(office).map_err(map_pipeline_err)?)
        }
        Command::National { office } => {
            let office = parse_office(office).map_err(map_pipeline_err)?;
            to_json(&results.national_results(office).map_err(map_pipeline_err)?)
        }
        Command::DistrictStats { district, office } => {
            let office = parse_office(office).map_err(map_pipeline_err)?;
            to_json(&results.district_statistics(*district, office).map_err(map_pipeline_err)?)
        }
        Command::Summaries { office } => {
            let office = parse_office(office).map_err(map_pipeline_err)?;
            to_json(&results.district_summaries(office).map_err(map_pipeline_err)?)
        }
        Command::Validate => Ok(json!({
            "status": "ok",
            "snapshot_digest": loader::snapshot_digest(snap).map_err(map_io_err)?,
            "districts": snap.districts.len(),
            "stations": snap.stations.len(),
            "lists": snap.lists.len(),
            "candidates": snap.candidates.len(),
            "tallies": snap.tallies.len(),
        })),
    }
}

/// `{"command", "digest", "result"}`; the digest covers `result` only.
fn emit(args: &Args, result: Value) -> Result<(), MainError> {
    let digest = hasher::sha256_canonical(&result).map_err(map_io_err)?;
    let doc = json!({
        "command": args.command.name(),
        "digest": digest,
        "result": result,
    });

    let mut bytes = if args.pretty {
        serde_json::to_vec_pretty(&doc).map_err(|e| MainError::Io(format!("serialize: {e}")))?
    } else {
        canonical_json::to_canonical_json_bytes(&doc).map_err(map_io_err)?
    };

    match &args.out {
        Some(path) => canonical_json::write_canonical_file(path, &bytes).map_err(map_io_err),
        None => {
            bytes.push(b'\n');
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| MainError::Io(format!("stdout: {e}")))
        }
    }
}
