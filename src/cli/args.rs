//! Command-line argument parsing for `lz4opt`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit tests).
//!
//! Short options aggregate (`-cvf`).  `-B` consumes its selector from the
//! same argument (`-B5`, `-BD`, `-BI`), `-D` takes its dictionary path
//! either attached (`-Dwords.dict`) or as the next argument.  A bare `--`
//! ends option processing.  Unrecognised or malformed options return an
//! `Err` whose message begins with `bad usage:`.

use anyhow::{bail, Result};

use crate::cli::constants::{set_display_level, TOOL_NAME, TOOL_VERSION};
use crate::io::driver::Prefs;

/// Selected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Compress,
    Decompress,
}

/// Complete set of options and filenames produced by the parsing loop.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Codec and driver preferences.
    pub prefs: Prefs,
    /// Compress (default) or decompress.
    pub op_mode: OpMode,
    /// Input path.
    pub input: String,
    /// Output path.
    pub output: String,
    /// A help or version flag was handled; the caller should exit 0.
    pub exit_early: bool,
}

/// Parse `std::env::args()` (skipping argv[0]).
pub fn parse_args() -> Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&argv)
}

fn print_usage() {
    println!(
        "usage: {TOOL_NAME} [-z|-d] [-c] [-v|-q] [-f] [-r] [-B4..7] [-BD|-BI] \
         [-D <dict>] [--content-checksum] <in> <out>"
    );
}

fn print_help() {
    print_usage();
    println!();
    println!("  -z    compress (default)");
    println!("  -d    decompress");
    println!("  -c    after compressing, re-decode and compare against the source");
    println!("  -v    verbose: progress and summary on stdout");
    println!("  -q    quiet: errors only");
    println!("  -f    overwrite the destination if it exists");
    println!("  -r    raw block mode (single block, no frame, input <= 65535 bytes)");
    println!("  -B4..7        block maximum: 64 KiB, 256 KiB, 1 MiB, 4 MiB (default 7)");
    println!("  -BD / -BI     dependent (default) / independent blocks");
    println!("  -D <dict>     dictionary file (final 65535 bytes are used)");
    println!("  --content-checksum    append and verify an XXH32 content checksum");
    println!("  -h    this help          -V    version");
}

/// Parse an explicit argument list (argv without the program name).
pub fn parse_args_from(argv: &[String]) -> Result<ParsedArgs> {
    let mut prefs = Prefs::default();
    let mut op_mode = OpMode::Compress;
    let mut positionals: Vec<String> = Vec::new();
    let mut exit_early = false;
    let mut options_done = false;

    let mut i = 0;
    while i < argv.len() {
        let arg = &argv[i];
        i += 1;

        if options_done || !arg.starts_with('-') || arg == "-" {
            positionals.push(arg.clone());
            continue;
        }
        if arg == "--" {
            options_done = true;
            continue;
        }
        if let Some(long) = arg.strip_prefix("--") {
            match long {
                "content-checksum" => prefs.content_checksum = true,
                "help" => {
                    print_help();
                    exit_early = true;
                }
                "version" => {
                    println!("{TOOL_NAME} v{TOOL_VERSION}");
                    exit_early = true;
                }
                _ => bail!("bad usage: unknown option --{long}"),
            }
            continue;
        }

        // Aggregated short options.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            let c = chars[j];
            j += 1;
            match c {
                'z' => op_mode = OpMode::Compress,
                'd' => op_mode = OpMode::Decompress,
                'c' => prefs.verify = true,
                'v' => set_display_level(3),
                'q' => set_display_level(1),
                'f' => prefs.force_overwrite = true,
                'r' => prefs.raw_block = true,
                'h' => {
                    print_help();
                    exit_early = true;
                }
                'V' => {
                    println!("{TOOL_NAME} v{TOOL_VERSION}");
                    exit_early = true;
                }
                'B' => {
                    let Some(&sel) = chars.get(j) else {
                        bail!("bad usage: -B expects 4..7, D, or I");
                    };
                    j += 1;
                    match sel {
                        '4'..='7' => prefs.block_max_code = sel as u8 - b'0',
                        'D' => prefs.independent = false,
                        'I' => prefs.independent = true,
                        _ => bail!("bad usage: -B expects 4..7, D, or I (got {sel})"),
                    }
                }
                'D' => {
                    let rest: String = chars[j..].iter().collect();
                    if !rest.is_empty() {
                        prefs.dictionary = Some(rest);
                        j = chars.len();
                    } else {
                        let Some(path) = argv.get(i) else {
                            bail!("bad usage: -D expects a dictionary path");
                        };
                        prefs.dictionary = Some(path.clone());
                        i += 1;
                    }
                }
                _ => bail!("bad usage: unknown option -{c}"),
            }
        }
    }

    if exit_early {
        return Ok(ParsedArgs {
            prefs,
            op_mode,
            input: String::new(),
            output: String::new(),
            exit_early,
        });
    }
    let [input, output]: [String; 2] = positionals.try_into().map_err(|p: Vec<String>| {
        anyhow::anyhow!("bad usage: expected <in> <out>, got {} file argument(s)", p.len())
    })?;
    Ok(ParsedArgs {
        prefs,
        op_mode,
        input,
        output,
        exit_early,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ParsedArgs> {
        let argv: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args_from(&argv)
    }

    #[test]
    fn defaults() {
        let a = parse(&["in.bin", "out.lz4o"]).unwrap();
        assert_eq!(a.op_mode, OpMode::Compress);
        assert_eq!(a.prefs.block_max_code, 7);
        assert!(!a.prefs.independent);
        assert!(!a.prefs.verify);
        assert_eq!(a.input, "in.bin");
        assert_eq!(a.output, "out.lz4o");
    }

    #[test]
    fn block_selectors() {
        let a = parse(&["-B5", "-BI", "in", "out"]).unwrap();
        assert_eq!(a.prefs.block_max_code, 5);
        assert!(a.prefs.independent);
        let a = parse(&["-B4", "-BD", "in", "out"]).unwrap();
        assert_eq!(a.prefs.block_max_code, 4);
        assert!(!a.prefs.independent);
        assert!(parse(&["-B9", "in", "out"]).is_err());
        assert!(parse(&["-B", "in", "out"]).is_err());
    }

    #[test]
    fn aggregated_short_options() {
        let a = parse(&["-dcf", "in", "out"]).unwrap();
        assert_eq!(a.op_mode, OpMode::Decompress);
        assert!(a.prefs.verify);
        assert!(a.prefs.force_overwrite);
    }

    #[test]
    fn dictionary_forms() {
        let a = parse(&["-D", "words.dict", "in", "out"]).unwrap();
        assert_eq!(a.prefs.dictionary.as_deref(), Some("words.dict"));
        let a = parse(&["-Dwords.dict", "in", "out"]).unwrap();
        assert_eq!(a.prefs.dictionary.as_deref(), Some("words.dict"));
        assert!(parse(&["in", "out", "-D"]).is_err());
    }

    #[test]
    fn double_dash_ends_options() {
        let a = parse(&["--", "-weird", "out"]).unwrap();
        assert_eq!(a.input, "-weird");
    }

    #[test]
    fn wrong_positional_count() {
        let e = parse(&["only-one"]).unwrap_err();
        assert!(e.to_string().starts_with("bad usage:"));
        assert!(parse(&["a", "b", "c"]).is_err());
    }

    #[test]
    fn content_checksum_long_option() {
        let a = parse(&["--content-checksum", "in", "out"]).unwrap();
        assert!(a.prefs.content_checksum);
        assert!(parse(&["--no-such", "in", "out"]).is_err());
    }
}
