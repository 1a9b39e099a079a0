// conformance-cli/src/main.rs
// ============================================================================
// Module: Conformance CLI Entry Point
// Description: Flag parsing and the scripted smoke scenario runner.
// Purpose: Translate flags into run options and drive one interactive run.
// Dependencies: clap, conformance-config, conformance-core, feature-avail
// ============================================================================

//! ## Overview
//! The CLI selects the rendering backend, form factor, random seed, and
//! interaction profiles for a run, folding file configuration and flag
//! overrides into the canonical options model. With options resolved it runs
//! the scripted interactive smoke scenario against the in-process runtime
//! and prints the conformance report. Real backend adapters register
//! upstream; the smoke run exists so a deployment can validate the harness
//! itself headlessly.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use conformance_config::GraphicsBackend;
use conformance_config::Options;
use conformance_config::load_options;
use conformance_core::FrameLoop;
use conformance_core::HarnessContext;
use conformance_core::InteractiveModeController;
use conformance_core::SessionOrchestrator;
use conformance_core::TestOutcome;
use conformance_core::core::EnvironmentBlendMode;
use conformance_core::core::FormFactor;
use conformance_core::core::ViewConfigurationKind;
use conformance_core::require_features;
use conformance_core::sim::ScriptedRenderBackend;
use conformance_core::sim::ScriptedRuntime;
use conformance_core::sim::pressed;
use conformance_core::sim::released;
use feature_avail::Feature;
use feature_avail::FeatureSet;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "conformance-cli", disable_help_subcommand = true)]
struct Cli {
    /// Optional options file (TOML); flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Rendering backend to drive.
    #[arg(long = "graphics-plugin", value_enum, value_name = "BACKEND")]
    graphics_plugin: Option<GraphicsBackendArg>,
    /// Physical form factor the session targets.
    #[arg(long, value_enum, value_name = "FORM_FACTOR")]
    form_factor: Option<FormFactorArg>,
    /// Primary view configuration.
    #[arg(long, value_enum, value_name = "VIEWS")]
    view_configuration: Option<ViewConfigurationArg>,
    /// Environment blend mode.
    #[arg(long, value_enum, value_name = "MODE")]
    blend_mode: Option<BlendModeArg>,
    /// Seed for the run's deterministic random engine.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Interaction profiles to exercise (repeatable).
    #[arg(long = "interaction-profiles", value_name = "PATH")]
    interaction_profiles: Vec<String>,
    /// Instance extensions to enable (repeatable).
    #[arg(long = "enabled-instance-extensions", value_name = "NAME")]
    enabled_instance_extensions: Vec<String>,
    /// List every feature the harness can negotiate over, then exit.
    #[arg(long = "list-features", action = ArgAction::SetTrue)]
    list_features: bool,
}

/// Backend selection flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphicsBackendArg {
    /// Vulkan adapter.
    Vulkan,
    /// Direct3D 11 adapter.
    D3d11,
    /// Direct3D 12 adapter.
    D3d12,
    /// OpenGL adapter.
    Opengl,
    /// Headless scripted runs.
    Null,
}

impl From<GraphicsBackendArg> for GraphicsBackend {
    fn from(value: GraphicsBackendArg) -> Self {
        match value {
            GraphicsBackendArg::Vulkan => Self::Vulkan,
            GraphicsBackendArg::D3d11 => Self::D3d11,
            GraphicsBackendArg::D3d12 => Self::D3d12,
            GraphicsBackendArg::Opengl => Self::Opengl,
            GraphicsBackendArg::Null => Self::Null,
        }
    }
}

/// Form factor flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormFactorArg {
    /// Head-mounted display.
    Hmd,
    /// Handheld display.
    Handheld,
}

impl From<FormFactorArg> for FormFactor {
    fn from(value: FormFactorArg) -> Self {
        match value {
            FormFactorArg::Hmd => Self::HeadMountedDisplay,
            FormFactorArg::Handheld => Self::Handheld,
        }
    }
}

/// View configuration flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewConfigurationArg {
    /// Two views, one per eye.
    Stereo,
    /// A single view.
    Mono,
}

impl From<ViewConfigurationArg> for ViewConfigurationKind {
    fn from(value: ViewConfigurationArg) -> Self {
        match value {
            ViewConfigurationArg::Stereo => Self::Stereo,
            ViewConfigurationArg::Mono => Self::Mono,
        }
    }
}

/// Blend mode flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlendModeArg {
    /// Layers fully replace the environment.
    Opaque,
    /// Layers are added over the environment.
    Additive,
    /// Layers alpha-blend with the environment.
    Alphablend,
}

impl From<BlendModeArg> for EnvironmentBlendMode {
    fn from(value: BlendModeArg) -> Self {
        match value {
            BlendModeArg::Opaque => Self::Opaque,
            BlendModeArg::Additive => Self::Additive,
            BlendModeArg::Alphablend => Self::AlphaBlend,
        }
    }
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// Result alias for CLI execution.
type CliResult<T> = Result<T, CliError>;

/// Terminal CLI failure.
#[derive(Debug, Error)]
enum CliError {
    /// Options could not be loaded or validated.
    #[error("{0}")]
    Config(#[from] conformance_config::ConfigError),
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Option Resolution
// ============================================================================

/// Folds file configuration and flag overrides into validated options.
fn resolve_options(cli: &Cli) -> CliResult<Options> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => Options::default(),
    };
    if let Some(backend) = cli.graphics_plugin {
        options.graphics_backend = backend.into();
    }
    if let Some(form_factor) = cli.form_factor {
        options.form_factor = form_factor.into();
    }
    if let Some(views) = cli.view_configuration {
        options.view_configuration = views.into();
    }
    if let Some(blend_mode) = cli.blend_mode {
        options.blend_mode = blend_mode.into();
    }
    if let Some(seed) = cli.seed {
        options.random_seed = seed;
    }
    if !cli.interaction_profiles.is_empty() {
        options.enabled_interaction_profiles = cli.interaction_profiles.clone();
    }
    if !cli.enabled_instance_extensions.is_empty() {
        options.enabled_instance_extensions = cli.enabled_instance_extensions.clone();
    }
    options.validate()?;
    Ok(options)
}

// ============================================================================
// SECTION: Smoke Scenario
// ============================================================================

/// Runs the scripted interactive scenario once and fills in the report.
fn run_smoke_scenario(options: &Options, context: &mut HarnessContext) {
    context.report.test_begin("interactive smoke scenario");

    let required = FeatureSet::from_features(&[Feature::Version1_0]);
    if let Err(failure) = require_features("smoke scenario", &required, &context.available) {
        context.report.record_failure(&failure);
        return;
    }

    let outcome = drive_scripted_scenario(options, context);
    match outcome {
        Ok(()) => context.report.test_end(TestOutcome::Passed),
        Err(failure) => context.report.record_failure(&failure),
    }
}

/// Drives the orchestrator/controller pair over the scripted runtime.
fn drive_scripted_scenario(
    options: &Options,
    context: &mut HarnessContext,
) -> conformance_core::HarnessResult {
    let runtime = ScriptedRuntime::with_extensions(
        options.enabled_instance_extensions.clone(),
        options.enabled_instance_extensions.clone(),
    );
    let mut orchestrator = SessionOrchestrator::new(
        runtime,
        options.form_factor,
        options.view_configuration,
        context.timeouts,
    )?;
    let mut backend = ScriptedRenderBackend::new();
    let mut controller = InteractiveModeController::new(
        &mut orchestrator,
        &mut backend,
        "Scripted smoke scenario: the harness confirms its own frame loop.",
        None,
    )?;
    orchestrator.attach_bindings()?;
    orchestrator.run_to_state(conformance_core::core::SessionState::Focused)?;

    // Script a pass verdict on the third action sync.
    let select = controller.select_action();
    orchestrator.runtime_mut().script_action(select, [released(), released(), pressed()]);

    context.report.section_begin("frame loop");
    let mut frame_loop = FrameLoop::new();
    let run = controller.run_scenario(&mut orchestrator, &mut frame_loop);
    context.report.section_end();
    run?;

    context
        .report
        .assertion(frame_loop.last_predicted_display_time().is_some(), "display time recorded");
    orchestrator.shutdown()?;
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

/// Prints every negotiable feature name.
fn write_feature_list() -> CliResult<()> {
    for feature in Feature::ALL {
        write_stdout_line(feature.name()).map_err(|err| CliError::Output(err.to_string()))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Parses flags, resolves options, and runs the requested action.
fn run(cli: &Cli) -> CliResult<ExitCode> {
    if cli.list_features {
        write_feature_list()?;
        return Ok(ExitCode::SUCCESS);
    }

    let options = resolve_options(cli)?;
    write_stdout_line(&options.describe()).map_err(|err| CliError::Output(err.to_string()))?;

    let probe_runtime = ScriptedRuntime::with_extensions(
        options.enabled_instance_extensions.clone(),
        options.enabled_instance_extensions.clone(),
    );
    let mut context = HarnessContext::new(
        &probe_runtime,
        options.random_seed,
        options.interaction_profiles(),
        options.harness_timeouts(),
    );

    run_smoke_scenario(&options, &mut context);

    write_stdout_line(&context.report.report_string())
        .map_err(|err| CliError::Output(err.to_string()))?;

    let (_, failed, _) = context.report.counts();
    if failed > 0 { Ok(ExitCode::FAILURE) } else { Ok(ExitCode::SUCCESS) }
}

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}
