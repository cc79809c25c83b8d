//! utau-toolbox - note-file utilities for UTAU plugin sessions
//!
//! Each subcommand is one plugin: it reads the temporary file UTAU passes
//! in, edits it and writes it back for UTAU to apply.

use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ust_core::UstFile;
use ust_transforms::{annotate, daimyojin, enunu, length, lyric, pitch, rest, sokuon};

use utau_toolbox::{lyric_export, pipeline, prompt, Mode, PitchStore, Repair, ToolboxError};

#[derive(Parser)]
#[command(name = "utau-toolbox")]
#[command(about = "Lyric, pitch and note utilities for UTAU plugin sessions")]
#[command(version)]
struct Cli {
    /// Log every change made to each note
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Plugin temporary file or .ust project
    path: PathBuf,

    /// Write the result here instead of overwriting the input
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip lyrics to bare hiragana
    VerySuppin(FileArgs),

    /// Bare hiragana lyrics, merged rests and a closing rest for ENUNU
    EnunuPrep(FileArgs),

    /// Mark lyrics with arrows for large pitch jumps
    Daimyojin(FileArgs),

    /// Replace lyrics with do-re-mi from the pitch
    Solfege(FileArgs),

    /// Turn every note into a bare rest
    SetRest(FileArgs),

    /// Keep only the last syllable of continuous-sound lyrics
    LastSyllable(FileArgs),

    /// Split `っ` into a note of its own
    SplitSokuon(FileArgs),

    /// Merge `っ` notes into the note before them
    JoinSokuon(FileArgs),

    /// Merge consecutive rests
    JoinRests(FileArgs),

    /// Split rests after sung notes in two
    SplitRests(FileArgs),

    /// Move rests to the lowest pitch
    RestLow(FileArgs),

    /// Consonant velocity 100 on breath-ending lyrics
    BreathVelocity(FileArgs),

    /// Round note lengths to a multiple of a unit
    RoundLength {
        #[command(flatten)]
        file: FileArgs,

        /// Rounding unit in ticks (480 = quarter note)
        #[arg(short, long, default_value_t = length::DEFAULT_LENGTH_UNIT,
              value_parser = clap::value_parser!(u32).range(1..))]
        unit: u32,
    },

    /// Rolled-tongue effect: short repeats in front of the first note
    Roll {
        #[command(flatten)]
        file: FileArgs,

        /// Number of short notes to add (asked for when omitted)
        #[arg(short, long)]
        count: Option<u32>,
    },

    /// Remove redundant pitch points and snap widths to 32nd notes
    RoundPitch(FileArgs),

    /// Snap pitch heights to whole semitones
    RoundPby(FileArgs),

    /// Cycle the shape of every pitch segment
    CyclePbm(FileArgs),

    /// Toggle note indexes in labels
    IndexLabel(FileArgs),

    /// Toggle note lengths in flags
    LengthFlags(FileArgs),

    /// Show every entry of each note in its flags
    DumpFlags(FileArgs),

    /// Write lyrics as bracketed text next to the project
    ExportLyrics(FileArgs),

    /// Memorize or recall pitch patterns
    PitchMemory {
        #[command(flatten)]
        file: FileArgs,

        /// What to do (asked for when omitted)
        #[arg(value_enum)]
        mode: Option<Mode>,

        /// Directory of the pattern store (default: next to this executable)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Do not ask before cleaning the store
        #[arg(long)]
        yes: bool,
    },

    /// Fix mojibake lyrics and the tempo left by a MIDI import
    Repair(FileArgs),

    /// Check that a file writes back byte for byte
    Check {
        /// File to check
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::VerySuppin(file) => edit(&file, lyric::very_suppin),
        Commands::EnunuPrep(file) => edit(&file, enunu::prepare_for_enunu),
        Commands::Daimyojin(file) => edit(&file, daimyojin::daimyojinize),
        Commands::Solfege(file) => edit(&file, lyric::solfege_lyrics),
        Commands::SetRest(file) => edit(&file, lyric::set_rest_lyrics),
        Commands::LastSyllable(file) => edit(&file, lyric::keep_last_syllable),
        Commands::SplitSokuon(file) => edit(&file, sokuon::split_sokuon),
        Commands::JoinSokuon(file) => edit(&file, sokuon::join_sokuon),
        Commands::JoinRests(file) => edit(&file, rest::join_rests),
        Commands::SplitRests(file) => edit(&file, rest::split_rests),
        Commands::RestLow(file) => edit(&file, rest::rest_notenum_low),
        Commands::BreathVelocity(file) => edit(&file, rest::breath_velocity),
        Commands::RoundLength { file, unit } => {
            let unit = NonZeroU32::new(unit).context("Unit must be at least 1")?;
            edit(&file, |ust| length::round_lengths(ust, unit))
        }
        Commands::Roll { file, count } => {
            let count = match count {
                Some(count) => count,
                None => ask_roll_count()?,
            };
            edit(&file, |ust| length::roll_first_note(ust, count))
        }
        Commands::RoundPitch(file) => edit(&file, pitch::round_pitch),
        Commands::RoundPby(file) => edit(&file, pitch::round_pitch_heights),
        Commands::CyclePbm(file) => edit(&file, pitch::cycle_pitch_shapes),
        Commands::IndexLabel(file) => edit(&file, annotate::toggle_index_labels),
        Commands::LengthFlags(file) => edit(&file, annotate::toggle_length_flags),
        Commands::DumpFlags(file) => edit(&file, annotate::dump_entries_to_flags),
        Commands::ExportLyrics(file) => {
            let ust = UstFile::load(&file.path)
                .with_context(|| format!("Failed to load {}", file.path.display()))?;
            lyric_export::export_lyrics(&ust, file.output.as_deref())?;
            Ok(())
        }
        Commands::PitchMemory {
            file,
            mode,
            store,
            yes,
        } => pitch_memory(&file, mode, store, yes),
        Commands::Repair(file) => edit(&file, |ust| {
            match utau_toolbox::repair(ust)? {
                Repair::Clean => tracing::info!("No mojibake lyrics found"),
                Repair::FromProject { restored } => {
                    tracing::info!("{} lyrics restored from the project file", restored)
                }
                Repair::Reinterpreted => tracing::info!("Lyrics repaired in place"),
            }
            Ok::<(), ToolboxError>(())
        }),
        Commands::Check { path } => {
            let report = pipeline::check(&path)?;
            println!(
                "{}: {} notes, {}",
                path.display(),
                report.notes,
                report.charset.name()
            );
            if !report.identical {
                anyhow::bail!("{} does not write back unchanged", path.display());
            }
            println!("Round trip is byte-identical");
            Ok(())
        }
    }
}

/// `RUST_LOG` when set; otherwise `debug` with `--verbose` and `info`
/// without
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("info"),
    }
}

/// Load, transform and save one file
fn edit<F, E>(args: &FileArgs, transform: F) -> Result<()>
where
    F: FnOnce(&mut UstFile) -> std::result::Result<(), E>,
    ToolboxError: From<E>,
{
    pipeline::run(&args.path, args.output.as_deref(), transform)
        .with_context(|| format!("Failed to process {}", args.path.display()))?;
    Ok(())
}

fn ask_roll_count() -> Result<u32> {
    let answer = prompt::ask_console("How many short notes should be added? (number)")?;
    prompt::parse_count(&answer).with_context(|| format!("Not a number: {:?}", answer))
}

fn pitch_memory(
    file: &FileArgs,
    mode: Option<Mode>,
    store: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let mode = match mode {
        Some(mode) => mode,
        None => {
            let answer = prompt::ask_console(Mode::MENU)?;
            match Mode::from_menu(&answer) {
                Some(mode) => mode,
                None => {
                    tracing::info!("No mode selected, nothing to do");
                    return Ok(());
                }
            }
        }
    };
    let store = match store {
        Some(dir) => PitchStore::new(dir),
        None => PitchStore::beside_executable()?,
    };

    match mode {
        Mode::Memorize => {
            let ust = UstFile::load(&file.path)
                .with_context(|| format!("Failed to load {}", file.path.display()))?;
            store.memorize(&ust)?;
        }
        Mode::Recall => edit(file, |ust| store.recall(ust).map(|_| ()))?,
        Mode::Clean => {
            if yes || confirm_clean()? {
                store.clean()?;
            } else {
                tracing::info!("Pitch memory left as it is");
            }
        }
    }
    Ok(())
}

fn confirm_clean() -> Result<bool> {
    let answer = prompt::ask_console("Really delete all memorized patterns? (yes/no)")?;
    Ok(prompt::is_yes(&answer))
}
