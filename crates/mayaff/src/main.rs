use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rayon::prelude::*;
use regex::Regex;
use tracing_subscriber::EnvFilter;

use mayaff_core::api::{FormatOptions, format_file};
use mayaff_core::config::{self, MayaFlagsConfig, parse_module_list};
use mayaff_core::filesystem::find_python_files;
use mayaff_core::output::print_failed;

#[derive(Debug, Parser)]
#[command(
    name = "mayaff",
    version,
    disable_version_flag = true,
    about = "Command line tool to find and replace short maya flags."
)]
struct Cli {
    #[arg(
        required = true,
        value_name = "PATH",
        help = "Directory or files you want to format."
    )]
    source: Vec<PathBuf>,
    #[arg(
        short = 't',
        long,
        value_name = "VERSION",
        conflicts_with = "config",
        help = "Target Maya version to use when formatting flags."
    )]
    target_version: Option<String>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Custom maya config file, instead of one of the target versions."
    )]
    config: Option<PathBuf>,
    #[arg(long, help = "Don't write to files. Just return the return code.")]
    check: bool,
    #[arg(
        long,
        help = "Don't write the files back, just output a diff for each file to stdout."
    )]
    diff: bool,
    #[arg(
        short = 'q',
        long,
        help = "Output nothing to stdout and set return value."
    )]
    quiet: bool,
    #[arg(
        long,
        default_value = r"\..+",
        value_name = "REGEX",
        help = "A regular expression for file names to exclude."
    )]
    exclude: String,
    #[arg(
        long,
        num_args = 1..,
        value_name = "FILE",
        help = "Exclude files. Separate files with space."
    )]
    exclude_files: Vec<PathBuf>,
    #[arg(
        long,
        default_value = config::DEFAULT_MODULES,
        help = "Maya modules to use for import. Example: --modules 'maya:cmds,pymel:core'"
    )]
    modules: String,
    #[arg(long, help = "Only execute mayaff on a single thread.")]
    single_thread: bool,
    #[arg(
        short = 'v',
        long = "version",
        action = clap::ArgAction::Version,
        help = "Show the version number and exit."
    )]
    version: Option<bool>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            print_failed(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let modules = parse_module_list(&cli.modules)?;
    let config = match (&cli.config, &cli.target_version) {
        (Some(path), _) => MayaFlagsConfig::from_file(path, modules)?,
        (None, Some(version)) => MayaFlagsConfig::embedded(version, modules)?,
        (None, None) => MayaFlagsConfig::latest(modules)?,
    };

    let exclude = Regex::new(&cli.exclude).context("invalid exclude regular expression")?;
    let files = find_python_files(&cli.source, &cli.exclude_files, &exclude);
    if files.is_empty() {
        bail!("no input files found");
    }

    let options = FormatOptions {
        quiet: cli.quiet,
        check_only: cli.check,
        print_diff: cli.diff,
    };

    let workers = if cli.single_thread {
        1
    } else {
        files
            .len()
            .min(std::thread::available_parallelism().map_or(1, usize::from))
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to build worker pool")?;

    // One file per task; each pipeline is pure over its own text plus the
    // shared read-only config, so aggregation is just counts.
    let (changed, failed) = pool.install(|| {
        files
            .par_iter()
            .map(|path| match format_file(path, &config, &options) {
                Ok(0) => (0usize, 0usize),
                Ok(_) => (1, 0),
                Err(err) => {
                    print_failed(&err.to_string());
                    if !cli.quiet {
                        print_failed(&format!("Failed to reformat {}.", path.display()));
                    }
                    (0, 1)
                }
            })
            .reduce(|| (0, 0), |left, right| (left.0 + right.0, left.1 + right.1))
    });

    if !cli.quiet {
        let mut message = Vec::new();
        if changed > 0 {
            let plural = if changed > 1 { "s" } else { "" };
            message.push(format!("{changed} file{plural} reformatted"));
        }
        if files.len() != changed + failed {
            message.push(format!("{} files left unchanged.", files.len() - changed));
        }
        if failed > 0 {
            let plural = if failed > 1 { "s" } else { "" };
            print_failed(&format!("{failed} file{plural} failed to reformat."));
            return Ok(ExitCode::FAILURE);
        }
        println!("{}", message.join(", "));
        println!("Done ✨");
    } else if failed > 0 {
        return Ok(ExitCode::FAILURE);
    }

    if changed > 0 && (cli.diff || cli.check) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
