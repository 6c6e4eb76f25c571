use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use pcgfont::{
    geometry, CharacterStore, EditMode, FileFormat, ImportOptions, LoadMode, ReduceMode, Transform,
    CHAR_COUNT,
};
use std::path::{Path, PathBuf};

use crate::console::render_to_ansi;
mod console;

#[derive(Parser)]
#[command(name = "pcgfont", about = "PCG character bank toolkit CLI")]
struct Cli {
    /// Log decoder details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Convert a character bank between formats
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Input format (bin, bin3, bas, asc, png); detected from the extension if omitted
        #[arg(long)]
        from: Option<FileFormat>,
        /// Output format; detected from the extension if omitted
        #[arg(long)]
        to: Option<FileFormat>,
        #[arg(long, default_value = "0", value_parser = parse_code)]
        start: usize,
        #[arg(long, default_value = "255", value_parser = parse_code)]
        end: usize,
        #[arg(long, default_value = "original")]
        load_mode: LoadMode,
        #[arg(long, default_value = "none")]
        reduce: ReduceMode,
    },
    /// List the defined characters of a bank
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        from: Option<FileFormat>,
    },
    /// Print characters to the terminal
    Render {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        from: Option<FileFormat>,
        #[arg(long, default_value = "0", value_parser = parse_code)]
        code: usize,
        #[arg(long, default_value = "256")]
        count: usize,
    },
    /// Move, rotate or flip the edit region (codes 0, 1, 16, 17)
    Transform {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        from: Option<FileFormat>,
        #[arg(long)]
        to: Option<FileFormat>,
        #[arg(long)]
        op: Transform,
        #[arg(long, default_value = "separate")]
        mode: EditMode,
        #[arg(long, default_value = "0")]
        cursor_x: usize,
        #[arg(long, default_value = "0")]
        cursor_y: usize,
    },
}

/// Accepts decimal or `0x` prefixed hex character codes.
fn parse_code(s: &str) -> std::result::Result<usize, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid character code '{s}': {e}"))
}

fn detect(path: &Path, explicit: Option<FileFormat>) -> Result<FileFormat> {
    explicit
        .or_else(|| FileFormat::from_path(path))
        .with_context(|| format!("cannot detect the format of {}, pass --from/--to", path.display()))
}

fn load(path: &Path, format: FileFormat, options: &ImportOptions) -> Result<(CharacterStore, usize)> {
    let mut store = CharacterStore::new();
    let count = format
        .import_file(path, &mut store, options)
        .with_context(|| format!("loading {} as {}", path.display(), format.name()))?;
    log::debug!("{}: {count} characters", path.display());
    Ok((store, count))
}

fn save(path: &Path, format: FileFormat, store: &CharacterStore, start: usize, end: usize) -> Result<()> {
    format
        .export_file(path, store, start, end)
        .with_context(|| format!("writing {} as {}", path.display(), format.name()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    let logger = if cli.verbose {
        Logger::try_with_str(level)
    } else {
        Logger::try_with_env_or_str(level)
    };
    let _logger = logger?.log_to_stderr().start()?;

    match cli.command {
        Cmd::Convert {
            input,
            output,
            from,
            to,
            start,
            end,
            load_mode,
            reduce,
        } => {
            let from = detect(&input, from)?;
            let to = detect(&output, to)?;
            let options = ImportOptions {
                start,
                load_mode,
                reduce_mode: reduce,
            };
            let (store, count) = load(&input, from, &options)?;
            save(&output, to, &store, start, end)?;
            eprintln!(
                "Converted {count} characters: {} -> {} ({})",
                from.name(),
                to.name(),
                output.display()
            );
        }
        Cmd::Inspect { input, from } => {
            let from = detect(&input, from)?;
            let (store, count) = load(&input, from, &ImportOptions::default())?;
            let defined: Vec<u8> = (0..CHAR_COUNT)
                .map(|code| code as u8)
                .filter(|code| !store.is_blank(*code))
                .collect();
            println!("{}: {}", from.name(), input.display());
            println!("  Loaded characters: {count}");
            println!("  Defined characters: {}", defined.len());
            for row in defined.chunks(16) {
                let codes: Vec<String> = row.iter().map(|c| format!("{c:02X}")).collect();
                println!("    {}", codes.join(" "));
            }
        }
        Cmd::Render {
            input,
            from,
            code,
            count,
        } => {
            if code >= CHAR_COUNT {
                bail!("character code {code} is out of range");
            }
            let from = detect(&input, from)?;
            let (store, _) = load(&input, from, &ImportOptions::default())?;
            let end = code.saturating_add(count).min(CHAR_COUNT);
            let codes: Vec<u8> = (code..end).map(|c| c as u8).collect();
            println!("{}", render_to_ansi(&store, &codes));
        }
        Cmd::Transform {
            input,
            output,
            from,
            to,
            op,
            mode,
            cursor_x,
            cursor_y,
        } => {
            let from = detect(&input, from)?;
            let to = detect(&output, to)?;
            let (mut store, _) = load(&input, from, &ImportOptions::default())?;
            if !geometry::apply(&mut store, mode, cursor_x, cursor_y, op) {
                bail!("{op:?} needs a square region, {mode:?} is not square");
            }
            save(&output, to, &store, 0, CHAR_COUNT - 1)?;
        }
    }
    Ok(())
}
