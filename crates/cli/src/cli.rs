use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nsload_config::PrefixEntry;

#[derive(Parser, Debug)]
#[command(name = "nsload")]
#[command(about = "Resolve and load symbols through a prefix-tree autoloader")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file to read instead of the default locations
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Root for names whose first segment is not registered
	#[arg(long, value_name = "DIR", global = true)]
	pub external_root: Option<PathBuf>,

	/// Extra registration, `NAME=DIR`; append `!` to replace the parent directory
	#[arg(long = "prefix", short = 'p', value_name = "NAME=DIR[!]", value_parser = parse_prefix, global = true)]
	pub prefixes: Vec<PrefixEntry>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print candidate paths for symbols, in probe order
	Resolve {
		/// Symbol names, e.g. `Vendor.Package.Unit`
		#[arg(required = true)]
		names: Vec<String>,
	},
	/// Load symbols through the loader chain
	Load {
		/// Symbol names, e.g. `Vendor.Package.Unit`
		#[arg(required = true)]
		names: Vec<String>,
	},
	/// List registered prefixes
	Prefixes,
}

/// Parses `NAME=DIR` or `NAME=DIR!`.
pub fn parse_prefix(input: &str) -> Result<PrefixEntry, String> {
	let (name, dir) = input
		.split_once('=')
		.ok_or_else(|| format!("expected NAME=DIR, got '{input}'"))?;
	let (dir, ignore) = match dir.strip_suffix('!') {
		Some(dir) => (dir, Some(true)),
		None => (dir, None),
	};
	if name.trim().is_empty() || dir.trim().is_empty() {
		return Err(format!("expected NAME=DIR, got '{input}'"));
	}
	Ok(PrefixEntry {
		name: name.trim().to_owned(),
		dir: dir.trim().to_owned(),
		ignore,
	})
}
