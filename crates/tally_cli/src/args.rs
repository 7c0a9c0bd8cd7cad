// crates/tally_cli/src/args.rs
//
// Offline CLI argument surface.
// - Inputs are local files only (any scheme:// is rejected)
// - --snapshot is required; --params optional, --tie-policy / --seed override it
// - Seed accepts decimal u64 or 0x-hex (up to 16 nybbles)
// - Office stays a raw token here; the pipeline parses it so a bad value
//   surfaces as InvalidOffice

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tally_core::{ids::DistrictId, variables::TiePolicy};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "tally",
    version,
    disable_help_subcommand = true,
    about = "Offline vote aggregation and seat allocation over an election snapshot"
)]
pub struct Args {
    /// Election snapshot JSON (districts, stations, lists, candidates, tallies).
    #[arg(long)]
    pub snapshot: PathBuf,

    /// AllocationParams JSON (tie_policy, tie_seed).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Override the tie policy: deterministic_order | random.
    #[arg(long, value_parser = parse_tie_policy)]
    pub tie_policy: Option<TiePolicy>,

    /// Override the tie seed. Decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Write the JSON document here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Indented JSON instead of canonical compact bytes.
    #[arg(long)]
    pub pretty: bool,

    /// Only log errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug logging (every D'Hont round and tie).
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Allocate one district's seats for an office.
    Allocate {
        #[arg(long)]
        district: DistrictId,
        #[arg(long)]
        office: String,
    },
    /// Allocate every district; per-district business errors are reported inline.
    AllocateAll {
        #[arg(long)]
        office: String,
    },
    /// National totals, participation, ranking and district rows.
    National {
        #[arg(long)]
        office: String,
    },
    /// Participation and valid/invalid split for one district.
    DistrictStats {
        #[arg(long)]
        district: DistrictId,
        #[arg(long)]
        office: String,
    },
    /// One row per district, name ascending.
    Summaries {
        #[arg(long)]
        office: String,
    },
    /// Load and check the snapshot only.
    Validate,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Allocate { .. } => "allocate",
            Command::AllocateAll { .. } => "allocate-all",
            Command::National { .. } => "national",
            Command::DistrictStats { .. } => "district-stats",
            Command::Summaries { .. } => "summaries",
            Command::Validate => "validate",
        }
    }
}

/// Errors surfaced by argument validation. Messages are short and stable.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

fn validate(args: Args) -> Result<Args, CliError> {
    for p in [Some(args.snapshot.as_path()), args.params.as_deref(), args.out.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_local_path(p)?;
    }
    ensure_exists(&args.snapshot)?;
    if let Some(p) = &args.params {
        ensure_exists(p)?;
    }
    Ok(args)
}

/// Decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>().map_err(|_| "decimal seed must be a valid u64".into())
    }
}

fn parse_tie_policy(s: &str) -> Result<TiePolicy, String> {
    s.parse::<TiePolicy>().map_err(|e| e.to_string())
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    match p.to_str() {
        Some(s) if has_scheme(s) => Err(CliError::NonLocalPath(s.to_string())),
        _ => Ok(()),
    }
}

fn ensure_exists(p: &Path) -> Result<(), CliError> {
    if p.is_file() {
        Ok(())
    } else {
        Err(CliError::NotFound(p.display().to_string()))
    }
}
