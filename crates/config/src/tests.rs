use std::collections::HashMap;
use std::fs;

use nsload_autoload::{Resolver, SymbolName};

use super::*;

const CONFIG: &str = r#"
external_root = "/srv/externals"
extension = "unit"

[[prefix]]
name = "App"
dir = "/srv/app/"

[[prefix]]
name = "App.Plugins"
dir = "/opt/plugins"
ignore = true

[units]
"Legacy.Helpers" = "/srv/legacy/helpers.unit"
"#;

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
	let vars: HashMap<String, String> = vars
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_parse_full_config() {
	let config = LoaderConfig::parse(CONFIG).unwrap();

	assert_eq!(config.external_root, PathBuf::from("/srv/externals"));
	assert_eq!(config.extension, "unit");
	assert_eq!(config.prefixes.len(), 2);
	assert_eq!(config.prefixes[1].ignore, Some(true));
	assert_eq!(config.prefixes[0].ignore, None);

	let units = config.explicit_units().unwrap();
	assert_eq!(units[0].0, SymbolName::parse("Legacy.Helpers").unwrap());
}

#[test]
fn test_parse_defaults() {
	let config = LoaderConfig::parse("").unwrap();
	assert_eq!(config, LoaderConfig::default());
	assert_eq!(config.external_root, PathBuf::from(DEFAULT_EXTERNAL_ROOT));
	assert_eq!(config.extension, DEFAULT_EXTENSION);
}

#[test]
fn test_unknown_field_rejected() {
	let err = LoaderConfig::parse("extention = \"x\"").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_registry_builder_resolves() {
	let config = LoaderConfig::parse(CONFIG).unwrap();
	let registry = std::sync::Arc::new(config.registry_builder().unwrap().build());
	let resolver = Resolver::new(registry, config.resolver_settings());

	let plugin = resolver.resolve(&"App.Plugins.Cache.Redis".parse().unwrap());
	assert_eq!(plugin.primary(), Path::new("/opt/plugins/cache/Redis.unit"));

	let external = resolver.resolve(&"Other.Lib".parse().unwrap());
	assert_eq!(external.primary(), Path::new("/srv/externals/other/Lib.unit"));
}

#[test]
fn test_malformed_prefix_is_error() {
	let config = LoaderConfig::parse("[[prefix]]\nname = \"\"\ndir = \"/x\"\n").unwrap();
	assert!(matches!(config.registry_builder(), Err(ConfigError::Registry(_))));
}

#[test]
fn test_invalid_unit_name() {
	let config = LoaderConfig::parse("[units]\n\"A..B\" = \"/x\"\n").unwrap();
	assert!(matches!(
		config.explicit_units(),
		Err(ConfigError::InvalidUnit { .. })
	));
}

#[test]
fn test_from_file_anchors_relative_paths() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.toml");
	fs::write(
		&path,
		r#"
external_root = "vendor"

[[prefix]]
name = "App"
dir = "src"

[[prefix]]
name = "App.Extensions"
dir = "../extensions"

[units]
"Legacy.Helpers" = "legacy/helpers.mod"
"#,
	)
	.unwrap();

	let config = LoaderConfig::from_file(&path).unwrap();
	assert_eq!(config.source.as_deref(), Some(path.as_path()));
	assert_eq!(config.external_root, dir.path().join("vendor"));
	assert_eq!(PathBuf::from(&config.prefixes[0].dir), dir.path().join("src"));
	assert_eq!(config.prefixes[1].dir, "../extensions");
	assert_eq!(
		config.units["Legacy.Helpers"],
		dir.path().join("legacy/helpers.mod")
	);
}

#[test]
fn test_missing_explicit_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let missing = dir.path().join("missing.toml");
	let err = LoaderConfig::load_with(Some(&missing), env(&[])).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_with_env_config_and_overrides() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nsload.toml");
	fs::write(&path, "extension = \"mod\"\n").unwrap();

	let config = LoaderConfig::load_with(
		None,
		env(&[
			(CONFIG_ENV, path.to_str().unwrap()),
			(EXTERNAL_ROOT_ENV, "/override/root"),
			(EXTENSION_ENV, ".lib"),
		]),
	)
	.unwrap();

	assert_eq!(config.source.as_deref(), Some(path.as_path()));
	assert_eq!(config.external_root, PathBuf::from("/override/root"));
	assert_eq!(config.extension, "lib");
}

#[test]
fn test_load_with_xdg_default_location() {
	let dir = tempfile::tempdir().unwrap();
	let config_dir = dir.path().join("nsload");
	fs::create_dir_all(&config_dir).unwrap();
	fs::write(config_dir.join("config.toml"), "extension = \"xdg\"\n").unwrap();

	let config =
		LoaderConfig::load_with(None, env(&[("XDG_CONFIG_HOME", dir.path().to_str().unwrap())])).unwrap();
	assert_eq!(config.extension, "xdg");
}

#[test]
fn test_load_with_nothing_found_uses_defaults() {
	let dir = tempfile::tempdir().unwrap();
	let config =
		LoaderConfig::load_with(None, env(&[("XDG_CONFIG_HOME", dir.path().to_str().unwrap())])).unwrap();
	assert_eq!(config, LoaderConfig::default());
}

fn resolve_from_file(dir: &Path, contents: &str, name: &str) -> PathBuf {
	let path = dir.join("config.toml");
	fs::write(&path, contents).unwrap();
	let config = LoaderConfig::from_file(&path).unwrap();
	let registry = std::sync::Arc::new(config.registry_builder().unwrap().build());
	let resolver = Resolver::new(registry, config.resolver_settings());
	resolver.resolve(&name.parse().unwrap()).primary().to_path_buf()
}

#[test]
fn test_from_file_anchors_ignoring_nested_prefix() {
	let dir = tempfile::tempdir().unwrap();
	let primary = resolve_from_file(
		dir.path(),
		r#"
[[prefix]]
name = "App"
dir = "src"

[[prefix]]
name = "App.Plugins"
dir = "plugins"
ignore = true
"#,
		"App.Plugins.X",
	);
	assert_eq!(primary, dir.path().join("plugins/X.mod"));
}

#[test]
fn test_from_file_anchors_nested_prefix_without_ancestor_dir() {
	let dir = tempfile::tempdir().unwrap();
	let primary = resolve_from_file(
		dir.path(),
		r#"
[[prefix]]
name = "Lib.Core"
dir = "core"
"#,
		"Lib.Core.Thing",
	);
	assert_eq!(primary, dir.path().join("core/Thing.mod"));
}

#[test]
fn test_from_file_nested_prefix_extends_ancestor() {
	let dir = tempfile::tempdir().unwrap();
	let primary = resolve_from_file(
		dir.path(),
		r#"
[[prefix]]
name = "App.Extensions"
dir = "../extensions"

[[prefix]]
name = "App"
dir = "engine"
"#,
		"App.Extensions.Cache",
	);
	assert_eq!(primary, dir.path().join("engine/../extensions/Cache.mod"));
}

#[test]
fn test_default_prefixes_are_overridden_by_file() {
	let config = LoaderConfig::parse("[[prefix]]\nname = \"App\"\ndir = \"/srv/custom\"\n")
		.unwrap()
		.with_default_prefixes([
			PrefixEntry {
				name: "App".into(),
				dir: "/opt/engine".into(),
				ignore: None,
			},
			PrefixEntry {
				name: "App.Extensions".into(),
				dir: "../extensions".into(),
				ignore: None,
			},
		]);
	assert_eq!(config.prefixes[0].dir, "/opt/engine");
	assert_eq!(config.prefixes[2].dir, "/srv/custom");

	let registry = std::sync::Arc::new(config.registry_builder().unwrap().build());
	let resolver = Resolver::new(registry, config.resolver_settings());
	assert_eq!(
		resolver.resolve(&"App.Model".parse().unwrap()).primary(),
		Path::new("/srv/custom/Model.mod")
	);
	assert_eq!(
		resolver.resolve(&"App.Extensions.Cache".parse().unwrap()).primary(),
		Path::new("/srv/custom/../extensions/Cache.mod")
	);
}
