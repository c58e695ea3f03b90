// vm-translator - VM to Hack assembly translator
// Translates a .vm file, or a directory of .vm files, into one .asm file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use hackvm::vm_translator::source::load_units;
use hackvm::vm_translator::{ReturnLabelScheme, TranslatorConfig, VmTranslator};

fn main() {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let mut input = "";
    let mut output_file = String::new();
    let mut config_file: Option<String> = None;
    let mut temp_base: Option<u16> = None;
    let mut legacy_return_labels = false;
    let mut bootstrap = false;
    let mut no_annotate = false;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                output_file = option_value(&args, i, "-o requires a filename").to_string();
                i += 2;
            }
            "--config" => {
                config_file = Some(option_value(&args, i, "--config requires a filename").to_string());
                i += 2;
            }
            "--temp-base" => {
                let value = option_value(&args, i, "--temp-base requires a number");
                match value.parse::<u16>() {
                    Ok(base) => temp_base = Some(base),
                    Err(_) => {
                        eprintln!("Error: invalid temp base '{}'", value);
                        process::exit(1);
                    }
                }
                i += 2;
            }
            "--legacy-return-labels" => {
                legacy_return_labels = true;
                i += 1;
            }
            "--bootstrap" => {
                bootstrap = true;
                i += 1;
            }
            "--no-annotate" => {
                no_annotate = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                print_usage(&args[0]);
                process::exit(1);
            }
            _ => {
                if input.is_empty() {
                    input = &args[i];
                } else {
                    eprintln!("Error: Multiple inputs specified");
                    process::exit(1);
                }
                i += 1;
            }
        }
    }

    if input.is_empty() {
        eprintln!("Error: No input file or directory specified");
        print_usage(&args[0]);
        process::exit(1);
    }

    // Configuration file first, then command-line overrides
    let mut config = match &config_file {
        Some(path) => match TranslatorConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {}", err);
                process::exit(1);
            }
        },
        None => TranslatorConfig::default(),
    };
    if let Some(base) = temp_base {
        config.temp_base = base;
    }
    if legacy_return_labels {
        config.return_labels = ReturnLabelScheme::PerCallee;
    }
    if bootstrap {
        config.bootstrap = true;
    }
    if no_annotate {
        config.annotate = false;
    }

    let input_path = Path::new(input);
    if output_file.is_empty() {
        output_file = default_output(input_path)
            .unwrap_or_else(|| {
                eprintln!("Error: Invalid input name '{}'", input);
                process::exit(1);
            })
            .to_string_lossy()
            .into_owned();
    }

    if verbose {
        println!("Translating {} -> {}", input, output_file);
    }

    let started = Instant::now();
    let units = match load_units(input_path, &config.entry_point) {
        Ok(units) => units,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    let translator = VmTranslator::with_config(config);
    match translator.translate(&units) {
        Ok(assembly) => {
            if let Err(err) = fs::write(&output_file, &assembly) {
                eprintln!("Error writing '{}': {}", output_file, err);
                process::exit(1);
            }
            if verbose {
                println!(
                    "Translated {} unit(s) into {} lines in {} ms",
                    units.len(),
                    assembly.lines().count(),
                    started.elapsed().as_millis()
                );
            }
        }
        Err(err) => {
            eprintln!("Translation error: {}", err);
            process::exit(1);
        }
    }
}

fn option_value<'a>(args: &'a [String], i: usize, message: &str) -> &'a str {
    if i + 1 >= args.len() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
    &args[i + 1]
}

/// `Prog.vm` -> `Prog.asm` beside it; `dir/` -> `dir/dir.asm`.
fn default_output(input: &Path) -> Option<PathBuf> {
    if input.is_dir() {
        let name = input
            .canonicalize()
            .ok()?
            .file_name()?
            .to_string_lossy()
            .into_owned();
        Some(input.join(format!("{}.asm", name)))
    } else {
        Some(input.with_extension("asm"))
    }
}

fn print_usage(program_name: &str) {
    println!("Usage: {} [options] <input.vm | directory>", program_name);
    println!();
    println!("Options:");
    println!("  -o, --output <file>       Output filename (default: input.asm)");
    println!("  --config <file>           TOML configuration file");
    println!("  --temp-base <n>           Cell before temp 1 (default: 5)");
    println!("  --legacy-return-labels    Use <callee>$ret return labels");
    println!("  --bootstrap               Emit SP=256 and call Sys.init first");
    println!("  --no-annotate             Omit source-line comments");
    println!("  -v, --verbose             Verbose output");
    println!("  -h, --help                Show this help message");
    println!();
    println!("Directory input translates every .vm file in it as one program,");
    println!("with the entry-point unit (default Sys.vm) first.");
    println!();
    println!("Examples:");
    println!("  {} SimpleAdd.vm              # writes SimpleAdd.asm", program_name);
    println!("  {} --bootstrap FibonacciElement/", program_name);
    println!("  RUST_LOG=debug {} Prog.vm    # trace every instruction", program_name);
}
