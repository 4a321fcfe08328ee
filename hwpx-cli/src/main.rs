// Command-line interface for md2hwpx
//
// This binary converts markdown files into HWPX documents (the Hancom Office word processor
// format), and can show the intermediate stages of that conversion.
//
// All conversion logic lives in hwpx-babel. This crate reads files, layers configuration
// (hwpx-config) and writes the result.
//
// Usage:
//  md2hwpx <input.md> [-o <out.hwpx>]            - Convert (default command)
//  md2hwpx convert <input.md> [-o <out.hwpx>]    - Same as above (explicit)
//  md2hwpx inspect <input.md> [<transform>]      - Print a pipeline stage (defaults to "model-json")
//  md2hwpx --list-transforms                     - List available transforms
//
// Configuration:
//
// Defaults are embedded in the binary. hwpx.toml in the working directory is layered on top
// when present, then --config <path>, then flags such as --strict and --page-break-h1.
// --reference-doc <file.hwpx> finally replaces the page setup and fonts with those of an
// existing document.

mod images;
mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use hwpx_babel::{ConversionOptions, Converter, ReferenceDocument};
use images::LocalImages;
use hwpx_config::{HwpxConfig, Loader};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "help"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

fn build_cli() -> Command {
    Command::new("md2hwpx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert markdown documents to HWPX")
        .long_about(
            "md2hwpx converts markdown files into HWPX documents for Hancom Office.\n\n\
            Commands:\n  \
            - convert: Write an .hwpx file (default command)\n  \
            - inspect: Print an intermediate stage of the conversion\n\n\
            Examples:\n  \
            md2hwpx notes.md                          # Writes notes.hwpx next to notes.md\n  \
            md2hwpx notes.md -o out/report.hwpx       # Explicit output path\n  \
            md2hwpx notes.md --strict                 # Fail on raw HTML instead of keeping it as text\n  \
            md2hwpx notes.md -r template.hwpx         # Page setup and fonts from template.hwpx\n  \
            md2hwpx inspect notes.md catalog-json     # Show the style catalog",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .long("version")
                .short('v')
                .help("Print version")
                .action(ArgAction::Version),
        )
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available inspect transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a hwpx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("reference-doc")
                .long("reference-doc")
                .short('r')
                .value_name("PATH")
                .help("Take page setup and fonts from an existing .hwpx document")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Log progress (debug level)")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Reject raw HTML instead of keeping it as plain text")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("page-break-h1")
                .long("page-break-h1")
                .value_name("BOOL")
                .help("Start level-1 headings on a new page")
                .value_parser(clap::value_parser!(bool))
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a markdown file to HWPX (default command)")
                .long_about(
                    "Convert a markdown file to an HWPX document.\n\n\
                    The output defaults to the input path with an .hwpx extension.\n\
                    Input files must end in .md or .markdown unless --force is given.\n\n\
                    Examples:\n  \
                    md2hwpx convert notes.md                   # Writes notes.hwpx\n  \
                    md2hwpx convert notes.txt --force -o a.hwpx\n  \
                    md2hwpx notes.md                           # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to <input stem>.hwpx)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Accept inputs without a markdown extension")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print an intermediate stage of the conversion")
                .long_about(
                    "View the conversion of a markdown file at different stages.\n\n\
                    Transforms:\n  \
                    - markdown-json: parsed markdown tree\n  \
                    - model-json:    flat document model (default)\n  \
                    - catalog-json:  style catalog the document resolves to\n  \
                    - preview-text:  plain-text preview stored in the package",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'model-json'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // First, try normal parsing. If that fails and the first argument looks like a file,
    // retry with "convert" injected as the subcommand.
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(&matches);

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let config = load_cli_config(&matches);
    let mut options = ConversionOptions::from(&config);
    if let Some(path) = matches.get_one::<String>("reference-doc") {
        apply_reference_doc(Path::new(path), &mut options);
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("an input file is required");
            };
            let output = sub_matches.get_one::<String>("output").map(PathBuf::from);
            let force = sub_matches.get_flag("force");
            let input = Path::new(input);
            let converter = Converter::new(options).with_image_resolver(LocalImages::beside(input));
            handle_convert_command(input, output, force, &converter);
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("an input file is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            let path = Path::new(path);
            let converter = Converter::new(options).with_image_resolver(LocalImages::beside(path));
            handle_inspect_command(path, transform, &converter);
        }
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else if matches.get_flag("quiet") {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    // RUST_LOG, when set, wins over the flags
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn read_input(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| fail(&format!("reading file '{}': {e}", path.display())))
}

fn apply_reference_doc(path: &Path, options: &mut ConversionOptions) {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        fail(&format!("reading reference document '{}': {e}", path.display()))
    });
    let reference = ReferenceDocument::read(&bytes).unwrap_or_else(|e| fail(&e.to_string()));
    reference.apply(&mut options.layout);
}

/// Handle the convert command
fn handle_convert_command(input: &Path, output: Option<PathBuf>, force: bool, converter: &Converter) {
    if !force && !has_markdown_extension(input) {
        fail(&format!(
            "'{}' does not look like a markdown file (expected .md or .markdown). Use --force to convert it anyway.",
            input.display()
        ));
    }

    let bytes = read_input(input);
    let conversion = converter
        .convert_bytes(&bytes)
        .unwrap_or_else(|e| fail(&e.to_string()));

    let output = output.unwrap_or_else(|| default_output_path(input));
    fs::write(&output, &conversion.bytes)
        .unwrap_or_else(|e| fail(&format!("writing file '{}': {e}", output.display())));
    log::info!("wrote {}", output.display());
}

/// Handle the inspect command
fn handle_inspect_command(path: &Path, transform: &str, converter: &Converter) {
    let bytes = read_input(path);
    let source = String::from_utf8(bytes)
        .unwrap_or_else(|e| fail(&format!("'{}' is not valid UTF-8: {e}", path.display())));

    let output = transforms::execute_transform(&source, transform, converter)
        .unwrap_or_else(|e| fail(&e));
    print!("{output}");
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("hwpx")
}

fn load_cli_config(matches: &ArgMatches) -> HwpxConfig {
    let loader = Loader::new().with_optional_file("hwpx.toml");
    let loader = match matches.get_one::<String>("config") {
        Some(path) => loader.with_file(path),
        None => loader,
    };

    apply_flag_overrides(loader, matches)
        .and_then(Loader::build)
        .unwrap_or_else(|err| fail(&format!("Failed to load configuration: {err}")))
}

fn apply_flag_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, config::ConfigError> {
    if matches.get_flag("strict") {
        loader = loader.set_override("input.unsupported", "reject")?;
    }
    if let Some(enabled) = matches.get_one::<bool>("page-break-h1") {
        loader = loader.set_override("document.page_break_before_h1", *enabled)?;
    }
    Ok(loader)
}
