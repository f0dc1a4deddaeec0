use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use fretscale::derived::{chord_labels, to_pentatonic};
use fretscale::render::{render_frequencies, Fretboard};
use fretscale::theory::{Note, Scale};
use fretscale::tuning::{resolve_tuning, TuningTable};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Scale generator: draws a scale across a fretboard.
#[derive(Debug, Parser)]
#[command(name = "fretscale", version, about)]
struct Cli {
  /// Number of strings on the fretboard
  #[arg(short, long, default_value_t = 6)]
  strings: usize,

  /// Whole tones to shift every string from the standard tuning
  #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
  bias: i64,

  /// Use "drop" tuning
  #[arg(short, long)]
  drop: bool,

  /// Base tone for the scale, e.g. `C` or `F#`
  #[arg(short, long)]
  tone: String,

  /// Scale mode (major or minor)
  #[arg(short, long, default_value = "major")]
  mode: String,

  /// Highlight the pentatonic subset instead of the full scale
  #[arg(short, long)]
  pentatonic: bool,

  /// Also print the frequency of every semitone from the base tone
  #[arg(short, long)]
  frequencies: bool,

  /// JSON file with the base tunings
  #[arg(long, env = "FRETSCALE_TUNINGS", default_value = "tunings.json")]
  tunings: PathBuf,

  /// Disable coloured output
  #[arg(long)]
  no_color: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
  let scale = Scale::parse(&cli.tone, &cli.mode)?;
  let table = TuningTable::load(&cli.tunings)
    .with_context(|| format!("failed to load {}", cli.tunings.display()))?;
  let tuning = resolve_tuning(cli.strings, cli.bias, cli.drop, table.standard())?;
  tracing::info!(
    strings = tuning.strings(),
    bias = tuning.bias(),
    drop = tuning.is_drop(),
    title = tuning.title(),
    scale = %scale.title(),
    "rendering fretboard"
  );

  let pentatonic = if cli.pentatonic {
    Some(to_pentatonic(&scale))
  } else {
    None
  };
  let chords = chord_labels(&scale);
  let fretboard = Fretboard::new(&tuning, &scale, &chords)
    .pentatonic(pentatonic.as_deref())
    .color(!cli.no_color);
  print!("{}", fretboard);

  if cli.frequencies {
    let mut table = String::new();
    render_frequencies(&mut table, Note::new(scale.root(), 4))?;
    print!("\n{}", table);
  }
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  if cli.no_color {
    colored::control::set_override(false);
  }
  tracing::debug!(?cli, "parsed arguments");

  ExitCode::from(exit_status(run(&cli), &mut std::io::stderr()))
}

fn exit_status<W: Write>(result: anyhow::Result<()>, stderr: &mut W) -> u8 {
  match result {
    Ok(()) => 0,
    Err(err) => {
      // Nothing left to report to if stderr itself fails.
      let _ = writeln!(stderr, "{}: {:#}", "error".red(), err);
      1
    }
  }
}

#[test]
fn test_cli() {
  let cli = Cli::try_parse_from(["fretscale", "-t", "A", "-m", "Minor", "-s", "7", "-b", "-1", "-d", "-p"])
    .unwrap();
  assert_eq!(cli.tone, "A");
  assert_eq!(cli.mode, "Minor");
  assert_eq!(cli.strings, 7);
  assert_eq!(cli.bias, -1);
  assert!(cli.drop && cli.pentatonic && !cli.frequencies);

  let cli = Cli::try_parse_from(["fretscale", "--tone", "C"]).unwrap();
  assert_eq!(cli.mode, "major");
  assert_eq!(cli.strings, 6);
  assert_eq!(cli.bias, 0);
  assert!(!cli.drop);

  assert!(Cli::try_parse_from(["fretscale"]).is_err());
}

#[test]
fn test_run_reports_core_errors() {
  let parse = |args: &[&str]| Cli::try_parse_from(args).unwrap();
  let err = run(&parse(&["fretscale", "-t", "C", "-m", "dorian"])).unwrap_err();
  assert_eq!(
    err.downcast_ref::<fretscale::Error>(),
    Some(&fretscale::Error::UnsupportedMode("dorian".into()))
  );
  let err = run(&parse(&["fretscale", "-t", "H"])).unwrap_err();
  assert_eq!(
    err.downcast_ref::<fretscale::Error>(),
    Some(&fretscale::Error::InvalidPitchClass("H".into()))
  );
  let err = run(&parse(&["fretscale", "-t", "C", "--tunings", "/nonexistent/tunings.json"]))
    .unwrap_err();
  assert!(matches!(
    err.downcast_ref::<fretscale::Error>(),
    Some(fretscale::Error::InvalidConfiguration(_))
  ));
}

#[test]
fn test_exit_status() {
  colored::control::set_override(true);
  let mut stderr = Vec::new();
  assert_eq!(exit_status(Ok(()), &mut stderr), 0);
  assert!(stderr.is_empty());

  let err = anyhow::Error::new(fretscale::Error::UnsupportedMode("dorian".into()));
  assert_eq!(exit_status(Err(err), &mut stderr), 1);
  assert_eq!(
    String::from_utf8(stderr).unwrap(),
    "\u{1b}[31merror\u{1b}[0m: unknown scale mode: dorian\n"
  );
}
