use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use engine_logging::{engine_info, log_file_or_default, LogDestination};
use log::LevelFilter;
use nbdoc_core::{update, AppState, Msg, Phase, RenderedDocument, SelectedFile};
use nbdoc_engine::{
    ensure_output_dir, format_terminal, to_html_page, AtomicFileWriter, CopyTarget, EngineConfig,
    EngineHandle, Highlighter,
};

use super::config::{self, AppConfig, RenderSetting};
use super::effects::EffectRunner;
use super::ui;
use crate::cli::GenerateArgs;

const EXIT_FAILED: u8 = 1;
const EXIT_NOTHING_SUBMITTED: u8 = 2;

pub fn run_generate(args: GenerateArgs) -> Result<ExitCode> {
    let config_path = config::config_path_or_default(args.config.clone());
    let mut app_config = config::load_config(&config_path);
    apply_overrides(&mut app_config, &args);
    initialize_logging(&app_config, args.verbose);
    engine_info!("nbdoc starting; config {:?}", config_path);

    let engine_config = EngineConfig {
        service: app_config.service_settings(),
        ingest: app_config.ingest_settings(),
        render_mode: app_config.render_mode(),
        output_dir: app_config.output_dir.clone(),
        copy_target: app_config.copy_target(),
    };
    let copy_to_stdout = engine_config.copy_target == CopyTarget::Stdout;
    let engine = EngineHandle::new(engine_config).context("could not start the engine")?;

    let mut session = Session {
        state: AppState::with_style(app_config.style_options())
            .with_labels(app_config.style_labels()),
        runner: EffectRunner::new(engine),
    };

    let files = args.files.iter().map(SelectedFile::from_path).collect();
    session.dispatch(Msg::FilesSelected(files));

    let mut removals = args.remove.clone();
    removals.sort_unstable();
    removals.dedup();
    for index in removals.into_iter().rev() {
        session.dispatch(Msg::FileRemoved { index });
    }
    if let Some(language) = args.language {
        session.dispatch(Msg::LanguageChanged(language));
    }
    if let Some(doc_style) = args.doc_style {
        session.dispatch(Msg::DocStyleChanged(doc_style));
    }
    if let Some(tone) = args.tone {
        session.dispatch(Msg::ToneChanged(tone));
    }

    let view = session.state.view();
    eprintln!("{}", ui::render::render_selection(&view));
    engine_info!(
        "style {:?} maps to {:?}",
        view.style,
        session.state.generation_parameters()
    );

    session.dispatch(Msg::GenerateClicked);
    session.settle()?;

    match session.state.phase() {
        Phase::Ready => {}
        Phase::Error => return Ok(ExitCode::from(EXIT_FAILED)),
        _ => return Ok(ExitCode::from(EXIT_NOTHING_SUBMITTED)),
    }

    let Some(document) = session.state.view().document else {
        return Ok(ExitCode::from(EXIT_FAILED));
    };

    if !(args.copy_raw.is_some() && copy_to_stdout) {
        let color = app_config.color && std::io::stdout().is_terminal();
        print!("{}", format_terminal(&document, &Highlighter::default(), color));
    }

    let mut failed = false;
    if let Some(path) = &args.html {
        match write_html(path, &document) {
            Ok(written) => eprintln!("  wrote {}", written.display()),
            Err(err) => {
                eprintln!("  error: {err:#}");
                failed = true;
            }
        }
    }
    if args.copy_raw.is_some() {
        failed |= session.run_action(Msg::CopyRawClicked)?;
    }
    if args.export {
        failed |= session.run_action(Msg::ExportClicked)?;
    }

    Ok(if failed {
        ExitCode::from(EXIT_FAILED)
    } else {
        ExitCode::SUCCESS
    })
}

struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            for line in ui::render::render(&state.view()) {
                eprintln!("{line}");
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    /// Feeds engine results back in until no effect is outstanding.
    fn settle(&mut self) -> Result<()> {
        while !self.runner.is_idle() {
            let msg = self.runner.next_msg()?;
            self.dispatch(msg);
        }
        Ok(())
    }

    /// Runs a post-generation action and reports whether it ended in failure.
    fn run_action(&mut self, msg: Msg) -> Result<bool> {
        self.dispatch(msg);
        self.settle()?;
        Ok(self
            .state
            .notice()
            .is_some_and(|notice| notice.is_failure()))
    }
}

fn apply_overrides(config: &mut AppConfig, args: &GenerateArgs) {
    if let Some(url) = &args.server_url {
        config.server_url = url.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(target) = &args.copy_raw {
        config.copy_to = (target.as_os_str() != "-").then(|| target.clone());
    }
    if args.legacy_render {
        config.render = RenderSetting::Legacy;
    }
    if args.no_color {
        config.color = false;
    }
}

fn initialize_logging(config: &AppConfig, verbose: bool) {
    let (destination, level) = if verbose {
        let destination = match config.log.target {
            config::LogTarget::Off => LogDestination::Terminal,
            _ => LogDestination::Both,
        };
        (destination, LevelFilter::Debug)
    } else {
        (LogDestination::from(config.log.target), config.log_level())
    };
    let log_file = log_file_or_default(config.log.file.as_deref());
    engine_logging::initialize(destination, level, &log_file);
}

fn write_html(path: &Path, document: &RenderedDocument) -> Result<PathBuf> {
    let title = document
        .headings()
        .next()
        .map(|(_, text)| text)
        .unwrap_or_else(|| "Notebook documentation".to_string());
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("html path {path:?} has no file name"))?;
    ensure_output_dir(dir).with_context(|| format!("could not create {dir:?}"))?;

    let written = AtomicFileWriter::new(dir.to_path_buf())
        .write(file_name, to_html_page(document, &title, &Highlighter::default()))
        .with_context(|| format!("could not write {path:?}"))?;
    engine_info!("wrote html page to {:?}", written);
    Ok(written)
}
