//! nsload binary.
//!
//! Builds the prefix registry from configuration, then resolves or loads the
//! symbols named on the command line.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use nsload_autoload::{
	CollectingMaterializer, ExplicitLoader, Filesystem, LoaderChain, OsFilesystem, PrefixLoader, Resolver, SymbolName,
};
use nsload_config::LoaderConfig;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
	let subscriber = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let mut config = LoaderConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
	if let Some(root) = cli.external_root {
		config.external_root = root;
	}
	for entry in cli.prefixes {
		config.push_prefix(entry);
	}
	debug!(
		source = ?config.source,
		prefixes = config.prefixes.len(),
		units = config.units.len(),
		"Configuration loaded"
	);

	let registry = Arc::new(config.registry_builder()?.build());
	let resolver = Resolver::new(registry, config.resolver_settings());

	match cli.command {
		Command::Resolve { names } => {
			for name in parse_names(&names)? {
				println!("{name}");
				for (placement, path) in resolver.resolve(&name).iter() {
					let mark = if OsFilesystem.exists(path) { "*" } else { " " };
					println!("  {mark} {placement:?}: {}", path.display());
				}
			}
		}
		Command::Load { names } => {
			let sink = Arc::new(CollectingMaterializer::new());
			let mut explicit = ExplicitLoader::new(sink.clone());
			for (name, path) in config.explicit_units()? {
				explicit = explicit.with_entry(name, path);
			}
			let chain = LoaderChain::new()
				.with(Arc::new(PrefixLoader::new(resolver, sink.clone())))
				.with(Arc::new(explicit));
			info!(loaders = ?chain.ids(), "Loader chain ready");

			let mut unresolved = Vec::new();
			for name in parse_names(&names)? {
				match chain.require(&name) {
					Ok(resolution) => {
						let (path, bytes) = sink
							.get(&name)
							.map(|unit| (unit.path.display().to_string(), unit.source.len()))
							.unwrap_or_default();
						println!("{name}: {path} ({bytes} bytes, via {})", resolution.loader);
					}
					Err(error) => {
						println!("{name}: {error}");
						unresolved.push(name);
					}
				}
			}

			if !unresolved.is_empty() {
				anyhow::bail!("{} symbol(s) could not be resolved", unresolved.len());
			}
		}
		Command::Prefixes => {
			for entry in resolver.registry().entries() {
				let path = entry
					.path
					.as_ref()
					.map(|p| p.display().to_string())
					.unwrap_or_else(|| "-".to_owned());
				let ignore = if entry.ignore_previous { " (ignore)" } else { "" };
				println!("{} => {path}{ignore}", entry.prefix);
			}
			println!(
				"<unregistered> => {}",
				resolver.settings().external_root.display()
			);
		}
	}

	Ok(())
}

fn parse_names(names: &[String]) -> anyhow::Result<Vec<SymbolName>> {
	names
		.iter()
		.map(|n| SymbolName::parse(n).with_context(|| format!("invalid symbol name '{n}'")))
		.collect()
}
