//! Command-line interface for leztew
//! This binary extracts node catalogs from specification documents and writes them as JSON or YAML.
//!
//! Usage:
//!   leztew extract `<path>` [--format json|yaml] [--compact]       - Print the generic catalog
//!   leztew spread `<path>` [--format ...] [--subcategories]        - Print the concrete catalog
//!   leztew convert `<path>` [--out-dir `<dir>`] [--format ...]     - Write both catalogs to files
//!
//! Global options: --config `<file>`, --diagnostics, -v/--verbose (repeatable)

use clap::{Arg, ArgAction, ArgMatches, Command};
use leztew_config::{ConfigError, LeztewConfig, Loader, LOCAL_CONFIG_FILE};
use leztew_parser::leztew::catalog::Category;
use leztew_parser::leztew::diagnostics::Diagnostics;
use leztew_parser::leztew::loader::CatalogLoader;
use leztew_parser::leztew::output::render;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let matches = build_cli().get_matches();
    let Some((command, sub_matches)) = matches.subcommand() else {
        unreachable!("a subcommand is required");
    };
    // Global options are propagated into the subcommand's matches
    init_logging(sub_matches.get_count("verbose"));

    let config = load_config(sub_matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let path = sub_matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let show_diagnostics = sub_matches.get_flag("diagnostics");

    match command {
        "extract" => handle_extract_command(path, &config, show_diagnostics),
        "spread" => handle_spread_command(path, &config, show_diagnostics),
        "convert" => {
            let out_dir = sub_matches
                .get_one::<String>("out-dir")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            handle_convert_command(path, &out_dir, &config, show_diagnostics)
        }
        _ => unreachable!("unknown subcommand {}", command),
    }
}

fn build_cli() -> Command {
    let path_arg = Arg::new("path")
        .help("Path to the specification (.adoc, .asciidoc, .asc or a .json document tree)")
        .required(true)
        .index(1);
    let format_arg = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format (default from configuration: json)")
        .value_parser(["json", "yaml"]);
    let compact_arg = Arg::new("compact")
        .long("compact")
        .help("Write JSON on a single line")
        .action(ArgAction::SetTrue);
    let subcategories_arg = Arg::new("subcategories")
        .long("subcategories")
        .help("Group the instances of each templated node into their own category")
        .action(ArgAction::SetTrue);

    Command::new("leztew")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts node catalogs from the operation tables of a specification document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .global(true),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .short('d')
                .help("Print extraction diagnostics to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Raise the log level (-v info, -vv debug); RUST_LOG takes precedence")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("extract")
                .about("Print the generic catalog, with templated types as written")
                .arg(path_arg.clone())
                .arg(format_arg.clone())
                .arg(compact_arg.clone()),
        )
        .subcommand(
            Command::new("spread")
                .about("Print the concrete catalog; the input may also be a generic catalog file")
                .arg(
                    path_arg
                        .clone()
                        .help("Path to a specification or a generic catalog (.json, .yaml)"),
                )
                .arg(format_arg.clone())
                .arg(compact_arg.clone())
                .arg(subcategories_arg.clone()),
        )
        .subcommand(
            Command::new("convert")
                .about("Write the generic and the concrete catalog into a directory")
                .arg(path_arg)
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .help("Output directory (default: current directory)"),
                )
                .arg(format_arg)
                .arg(compact_arg)
                .arg(subcategories_arg),
        )
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Defaults, then `leztew.toml` from the working directory, then `--config`, then flags.
fn load_config(sub_matches: &ArgMatches) -> Result<LeztewConfig, ConfigError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = sub_matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = sub_matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if sub_matches.get_flag("compact") {
        loader = loader.set_override("output.pretty", false)?;
    }
    if has_flag(sub_matches, "subcategories") {
        loader = loader.set_override("spread.instance_subcategories", true)?;
    }
    loader.build()
}

fn has_flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

fn open(path: &str) -> CatalogLoader {
    CatalogLoader::from_path(path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", path, e);
        std::process::exit(1);
    })
}

fn report(diagnostics: &Diagnostics, show: bool) {
    if !show {
        return;
    }
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
    eprintln!("{} diagnostics", diagnostics.len());
}

fn render_or_exit(catalog: &Category, config: &LeztewConfig) -> String {
    render(catalog, config.output.output_format(), config.output.pretty).unwrap_or_else(|e| {
        eprintln!("Error writing catalog: {}", e);
        std::process::exit(1);
    })
}

/// Handle the extract command
fn handle_extract_command(path: &str, config: &LeztewConfig, show_diagnostics: bool) {
    let extraction = open(path)
        .extract(config.layout.section_layout())
        .unwrap_or_else(|e| {
            eprintln!("Error processing {}: {}", path, e);
            std::process::exit(1);
        });
    report(&extraction.diagnostics, show_diagnostics);
    print!("{}", render_or_exit(&extraction.catalog, config));
}

/// Handle the spread command
fn handle_spread_command(path: &str, config: &LeztewConfig, show_diagnostics: bool) {
    let conversion = open(path)
        .convert(
            config.layout.section_layout(),
            config.spread.spread_options(),
        )
        .unwrap_or_else(|e| {
            eprintln!("Error processing {}: {}", path, e);
            std::process::exit(1);
        });
    report(&conversion.diagnostics, show_diagnostics);
    print!("{}", render_or_exit(&conversion.concrete, config));
}

/// Handle the convert command
fn handle_convert_command(
    path: &str,
    out_dir: &Path,
    config: &LeztewConfig,
    show_diagnostics: bool,
) {
    let conversion = open(path)
        .convert(
            config.layout.section_layout(),
            config.spread.spread_options(),
        )
        .unwrap_or_else(|e| {
            eprintln!("Error processing {}: {}", path, e);
            std::process::exit(1);
        });
    report(&conversion.diagnostics, show_diagnostics);

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Error creating {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }
    let extension = config.output.output_format().extension();
    let outputs = [
        (&config.output.generic_file, &conversion.generic),
        (&config.output.spread_file, &conversion.concrete),
    ];
    for (name, catalog) in outputs {
        let target = out_dir.join(format!("{}.{}", name, extension));
        if let Err(e) = fs::write(&target, render_or_exit(catalog, config)) {
            eprintln!("Error writing {}: {}", target.display(), e);
            std::process::exit(1);
        }
        println!("Wrote {}", target.display());
    }
}
