use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use configdict::{Document, Options};

#[derive(Parser)]
#[command(name = "configdict")]
#[command(
	author,
	version,
	about = "Parse INI-style configuration files with defaults, inheritance and interpolation"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the parsed structure as TOML
	Show {
		/// INI file to read
		file: PathBuf,

		/// Print resolved values instead of stored ones
		#[arg(long)]
		resolved: bool,

		#[command(flatten)]
		lookup: LookupArgs,
	},
	/// Print the document re-serialized as INI text
	Fmt {
		/// INI file to read
		file: PathBuf,
	},
	/// Print a single resolved value
	Get {
		/// INI file to read
		file: PathBuf,

		/// Section name (case-sensitive)
		section: String,

		/// Key name
		key: String,

		#[command(flatten)]
		lookup: LookupArgs,
	},
}

#[derive(Args)]
struct LookupArgs {
	/// Fail on missing keys instead of treating them as empty
	#[arg(long)]
	strict: bool,

	/// Fallback value used after the DEFAULT section (repeatable)
	#[arg(short = 'D', long = "default", value_name = "KEY=VALUE", value_parser = parse_key_value)]
	defaults: Vec<(String, String)>,
}

impl LookupArgs {
	fn options(&self) -> Options {
		Options::new()
			.defaults(self.defaults.iter().cloned())
			.keyerror(self.strict)
	}
}

fn parse_key_value(input: &str) -> std::result::Result<(String, String), String> {
	let (key, value) = input
		.split_once('=')
		.ok_or_else(|| format!("expected KEY=VALUE, got '{}'", input))?;
	Ok((key.trim().to_string(), value.trim().to_string()))
}

fn main() -> ExitCode {
	init_tracing();

	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing() {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "configdict=warn".into()))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Show {
			file,
			resolved,
			lookup,
		} => handle_show(&file, resolved, lookup.options()),
		Commands::Fmt { file } => handle_fmt(&file),
		Commands::Get {
			file,
			section,
			key,
			lookup,
		} => handle_get(&file, &section, &key, lookup.options()),
	}
}

fn load(path: &Path, options: Options) -> Result<Document> {
	options
		.parse_file(path)
		.with_context(|| format!("Failed to load {}", path.display()))
}

fn handle_show(path: &Path, resolved: bool, options: Options) -> Result<ExitCode> {
	let doc = load(path, options)?;

	let rendered = if resolved {
		let mut sections: IndexMap<&str, IndexMap<String, String>> = IndexMap::new();
		for view in doc.section_names().filter_map(|name| doc.section(name)) {
			let values = view
				.resolved()
				.with_context(|| format!("Failed to resolve section [{}]", view.name()))?;
			sections.insert(view.name(), values);
		}
		toml::to_string(&sections)
	} else {
		toml::to_string(&doc)
	};
	let rendered = rendered.context("Failed to render structure")?;

	print!("{}", rendered);
	Ok(ExitCode::SUCCESS)
}

fn handle_fmt(path: &Path) -> Result<ExitCode> {
	let doc = load(path, Options::default())?;
	print!("{}", doc);
	Ok(ExitCode::SUCCESS)
}

fn handle_get(path: &Path, section: &str, key: &str, options: Options) -> Result<ExitCode> {
	let doc = load(path, options)?;

	let value = doc
		.get(section, key)
		.with_context(|| format!("Failed to resolve [{}] {}", section, key))?;

	match value {
		Some(value) => {
			println!("{}", value);
			Ok(ExitCode::SUCCESS)
		}
		// Sentinel: nothing to print
		None => Ok(ExitCode::FAILURE),
	}
}
