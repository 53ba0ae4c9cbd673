use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser};
use scribblepad::config::Config;
use scribblepad::export::{self, ExportConfig};
use scribblepad::input::StrokeRenderer;
use scribblepad::replay::Script;
use scribblepad::submit::{
    Submission, SubmissionManager, SubmitDependencies, SubmitOutcome, SubmitRequest,
};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCRIBBLEPAD_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "scribblepad")]
#[command(
    version = VERSION,
    about = "Freehand drawing pad that submits sketches to a classification service"
)]
struct Cli {
    /// Replay a recorded event script (JSON) onto a fresh surface
    #[arg(long, short = 'r', value_name = "SCRIPT")]
    replay: Option<PathBuf>,

    /// Write the resulting PNG here (default: output directory from config)
    #[arg(long, short = 'o', value_name = "FILE", requires = "replay")]
    output: Option<PathBuf>,

    /// Submit the drawing for classification (at each submit step, or once at the end)
    #[arg(long, action = ArgAction::SetTrue, requires = "replay")]
    submit: bool,

    /// Download pronunciation clips for predicted labels into DIR
    #[arg(long, value_name = "DIR", requires = "submit")]
    audio_dir: Option<PathBuf>,

    /// Surface width in pixels (stands in for the host container width)
    #[arg(long, short = 'w', value_name = "PX")]
    width: Option<u32>,

    /// Config file to use instead of ~/.config/scribblepad/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "replay")]
    init_config: bool,
}

/// Submission machinery, only built when `--submit` is given.
struct Submitter {
    runtime: tokio::runtime::Runtime,
    manager: SubmissionManager,
    outcomes: tokio::sync::mpsc::UnboundedReceiver<Submission>,
    pending: usize,
    audio_dir: Option<PathBuf>,
}

impl Submitter {
    fn new(config: &Config, audio_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
        let dependencies = SubmitDependencies::from_config(&config.service)
            .context("Failed to set up service clients")?;
        let (manager, outcomes) = SubmissionManager::new(runtime.handle(), dependencies);
        Ok(Self {
            runtime,
            manager,
            outcomes,
            pending: 0,
            audio_dir,
        })
    }

    fn submit(&mut self, renderer: &StrokeRenderer) {
        let request = match SubmitRequest::from_renderer(renderer) {
            Ok(request) => request,
            Err(err) => {
                log::error!("Could not export drawing for submission: {}", err);
                return;
            }
        };
        let request = match &self.audio_dir {
            Some(dir) => request.with_speech_dir(dir.clone()),
            None => request,
        };
        match self.manager.submit(request) {
            Ok(id) => {
                log::info!("Queued submission #{}", id);
                self.pending += 1;
            }
            Err(err) => log::error!("Submission not queued: {}", err),
        }
    }

    /// Blocks until every queued submission has reported back.
    fn wait(mut self) {
        let pending = self.pending;
        let outcomes = &mut self.outcomes;
        self.runtime.block_on(async {
            for _ in 0..pending {
                match outcomes.recv().await {
                    Some(submission) => print_submission(&submission),
                    None => break,
                }
            }
        });
    }
}

fn print_submission(submission: &Submission) {
    match &submission.outcome {
        SubmitOutcome::Success(result) => {
            println!(
                "Submission #{}: {}",
                submission.id,
                result.labels.join(", ")
            );
            for card in &result.cards {
                let audio = card
                    .speech_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| card.speech_url.to_string());
                println!(
                    "  {} | image: {} | audio: {}",
                    card.words,
                    card.image_url.as_deref().unwrap_or("-"),
                    audio
                );
            }
        }
        // Already logged by the manager; the drawing itself is unaffected.
        SubmitOutcome::Failed(message) => {
            println!("Submission #{} failed: {}", submission.id, message);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn run_replay(cli: &Cli, script_path: &Path) -> anyhow::Result<()> {
    let mut config = load_config(cli)?;
    if let Some(width) = cli.width {
        config.set_canvas_width(width);
    }
    let script = Script::load(script_path)?;

    let width = config.canvas.width;
    let mut renderer = StrokeRenderer::new(
        width,
        config.canvas.height,
        config.background_color(),
        config.pen_settings(),
    )
    .context("Failed to create drawing surface")?;
    log::info!(
        "Replaying {} onto a {}x{} surface",
        script_path.display(),
        width,
        config.canvas.height
    );

    let mut submitter = if cli.submit {
        Some(Submitter::new(&config, cli.audio_dir.clone())?)
    } else {
        None
    };

    let summary = script.replay(&mut renderer, |index, snapshot| match submitter.as_mut() {
        Some(submitter) => submitter.submit(snapshot),
        None => log::info!("Skipping submit step {} (run with --submit)", index),
    });
    log::info!(
        "Applied {} steps ({} segments)",
        summary.steps,
        summary.segments
    );

    let png = renderer.export_bitmap().context("Failed to encode drawing")?;
    let saved = match &cli.output {
        Some(path) => {
            export::write_file(path, &png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.clone()
        }
        None => export::save_drawing(&png, &ExportConfig::from(&config.output))
            .context("Failed to save drawing")?,
    };
    println!("Saved drawing to {}", saved.display());

    if let Some(mut submitter) = submitter {
        if summary.submit_points.is_empty() {
            submitter.submit(&renderer);
        }
        submitter.wait();
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created default config at {}", path.display());
    } else if let Some(script_path) = &cli.replay {
        run_replay(&cli, script_path)?;
    } else {
        println!(
            "scribblepad: Freehand drawing pad that submits sketches to a classification service"
        );
        println!();
        println!("Usage:");
        println!("  scribblepad --replay SCRIPT [--output FILE]  Replay recorded input into a PNG");
        println!("  scribblepad --replay SCRIPT --submit          ...and classify the drawing");
        println!("  scribblepad --init-config                     Write the default config file");
        println!("  scribblepad --help                            Show help");
        println!();
        println!("Script steps:");
        println!("  mouse_down/mouse_move {{x, y}}, mouse_up, mouse_leave");
        println!("  touch_start/touch_move {{touches: [[x, y], ...]}}, touch_end, touch_cancel");
        println!("  clear, toggle_erase, submit");
    }

    Ok(())
}
