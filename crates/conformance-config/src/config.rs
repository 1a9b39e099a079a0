// conformance-config/src/config.rs
// ============================================================================
// Module: Conformance Configuration
// Description: Options loading and validation for harness runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: conformance-core, serde, toml
// ============================================================================

//! ## Overview
//! Options are loaded from a TOML file with strict size limits and unknown
//! keys rejected, then validated as a whole. Every option can also be set
//! upstream by the CLI; file values act as the base and flags override them.
//! Missing or invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use conformance_core::Timeouts;
use conformance_core::core::EnvironmentBlendMode;
use conformance_core::core::FormFactor;
use conformance_core::core::ProfilePath;
use conformance_core::core::ViewConfigurationKind;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 64 * 1024;
/// Interaction profile enabled when none is configured.
pub const DEFAULT_INTERACTION_PROFILE: &str = "/interaction_profiles/khr/simple_controller";
/// Required prefix of every interaction profile path.
const INTERACTION_PROFILE_PREFIX: &str = "/interaction_profiles/";
/// Required prefix of every extension name.
const EXTENSION_NAME_PREFIX: &str = "XR_";
/// Default random seed when none is configured.
const DEFAULT_RANDOM_SEED: u64 = 0;
/// Default bound for observing a session state transition, in milliseconds.
const DEFAULT_STATE_TRANSITION_MS: u64 = 10_000;
/// Default bound for frame timing, in milliseconds.
const DEFAULT_FRAME_WAIT_MS: u64 = 1_000;
/// Default bound for image acquisition, in milliseconds.
const DEFAULT_IMAGE_ACQUIRE_MS: u64 = 500;
/// Default sleep between poll attempts, in milliseconds.
const DEFAULT_POLL_DELAY_MS: u64 = 5;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or validating options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// The config file exceeds the size limit.
    #[error("config file too large: {actual} bytes (limit {limit})")]
    TooLarge {
        /// Permitted maximum in bytes.
        limit: usize,
        /// Observed file size in bytes.
        actual: usize,
    },
    /// The config file failed to parse.
    #[error("config parse error: {0}")]
    Parse(String),
    /// A validated option combination is invalid.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Backend Selection
// ============================================================================

/// Rendering backend the run drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicsBackend {
    /// Vulkan adapter.
    Vulkan,
    /// Direct3D 11 adapter.
    D3d11,
    /// Direct3D 12 adapter.
    D3d12,
    /// OpenGL adapter.
    Opengl,
    /// No graphics: scripted/headless runs.
    #[default]
    Null,
}

impl GraphicsBackend {
    /// Returns a stable label for the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vulkan => "vulkan",
            Self::D3d11 => "d3d11",
            Self::D3d12 => "d3d12",
            Self::Opengl => "opengl",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for GraphicsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Timeout Options
// ============================================================================

/// Bounded-wait policy in milliseconds, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutOptions {
    /// Deadline for observing a target session state.
    #[serde(default = "default_state_transition_ms")]
    pub state_transition_ms: u64,
    /// Deadline for the runtime to produce frame timing.
    #[serde(default = "default_frame_wait_ms")]
    pub frame_wait_ms: u64,
    /// Deadline for acquiring a swapchain image.
    #[serde(default = "default_image_acquire_ms")]
    pub image_acquire_ms: u64,
    /// Fixed sleep between poll attempts.
    #[serde(default = "default_poll_delay_ms")]
    pub poll_delay_ms: u64,
}

/// Serde default for [`TimeoutOptions::state_transition_ms`].
const fn default_state_transition_ms() -> u64 {
    DEFAULT_STATE_TRANSITION_MS
}

/// Serde default for [`TimeoutOptions::frame_wait_ms`].
const fn default_frame_wait_ms() -> u64 {
    DEFAULT_FRAME_WAIT_MS
}

/// Serde default for [`TimeoutOptions::image_acquire_ms`].
const fn default_image_acquire_ms() -> u64 {
    DEFAULT_IMAGE_ACQUIRE_MS
}

/// Serde default for [`TimeoutOptions::poll_delay_ms`].
const fn default_poll_delay_ms() -> u64 {
    DEFAULT_POLL_DELAY_MS
}

impl Default for TimeoutOptions {
    fn default() -> Self {
        Self {
            state_transition_ms: DEFAULT_STATE_TRANSITION_MS,
            frame_wait_ms: DEFAULT_FRAME_WAIT_MS,
            image_acquire_ms: DEFAULT_IMAGE_ACQUIRE_MS,
            poll_delay_ms: DEFAULT_POLL_DELAY_MS,
        }
    }
}

impl TimeoutOptions {
    /// Converts the configured policy into harness timeouts.
    #[must_use]
    pub const fn to_timeouts(self) -> Timeouts {
        Timeouts {
            state_transition: Duration::from_millis(self.state_transition_ms),
            frame_wait: Duration::from_millis(self.frame_wait_ms),
            image_acquire: Duration::from_millis(self.image_acquire_ms),
            poll_delay: Duration::from_millis(self.poll_delay_ms),
        }
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Runtime options for a harness run.
///
/// String options are case-sensitive snake case in the file; each can be
/// overridden from the command line upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Options {
    /// Rendering backend to drive. `null` runs headless/scripted.
    pub graphics_backend: GraphicsBackend,
    /// Physical form factor the session targets.
    pub form_factor: FormFactor,
    /// Primary view configuration.
    pub view_configuration: ViewConfigurationKind,
    /// Environment blend mode.
    pub blend_mode: EnvironmentBlendMode,
    /// API layers to enable; a requested layer that is unsupported fails the
    /// run.
    pub enabled_api_layers: Vec<String>,
    /// Instance extensions to enable; a requested extension that is
    /// unsupported fails the run.
    pub enabled_instance_extensions: Vec<String>,
    /// Interaction profiles the run exercises.
    pub enabled_interaction_profiles: Vec<String>,
    /// Seed for the run's deterministic random engine.
    pub random_seed: u64,
    /// Bounded-wait policy.
    pub timeouts: TimeoutOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            graphics_backend: GraphicsBackend::Null,
            form_factor: FormFactor::HeadMountedDisplay,
            view_configuration: ViewConfigurationKind::Stereo,
            blend_mode: EnvironmentBlendMode::Opaque,
            enabled_api_layers: Vec::new(),
            enabled_instance_extensions: Vec::new(),
            enabled_interaction_profiles: vec![DEFAULT_INTERACTION_PROFILE.to_owned()],
            random_seed: DEFAULT_RANDOM_SEED,
            timeouts: TimeoutOptions::default(),
        }
    }
}

impl Options {
    /// Validates the options as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first invalid combination.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_interaction_profiles.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one interaction profile must be enabled".to_owned(),
            ));
        }
        for profile in &self.enabled_interaction_profiles {
            if !profile.starts_with(INTERACTION_PROFILE_PREFIX) {
                return Err(ConfigError::Invalid(format!(
                    "interaction profile must start with {INTERACTION_PROFILE_PREFIX}: {profile}"
                )));
            }
        }
        for extension in &self.enabled_instance_extensions {
            if !extension.starts_with(EXTENSION_NAME_PREFIX) {
                return Err(ConfigError::Invalid(format!(
                    "extension name must start with {EXTENSION_NAME_PREFIX}: {extension}"
                )));
            }
        }
        let timeouts = &self.timeouts;
        if timeouts.state_transition_ms == 0
            || timeouts.frame_wait_ms == 0
            || timeouts.image_acquire_ms == 0
            || timeouts.poll_delay_ms == 0
        {
            return Err(ConfigError::Invalid("timeouts must be non-zero".to_owned()));
        }
        if timeouts.poll_delay_ms > timeouts.state_transition_ms {
            return Err(ConfigError::Invalid(
                "poll delay must not exceed the state transition bound".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns the configured interaction profiles as typed paths.
    #[must_use]
    pub fn interaction_profiles(&self) -> Vec<ProfilePath> {
        self.enabled_interaction_profiles
            .iter()
            .map(|profile| ProfilePath::new(profile.as_str()))
            .collect()
    }

    /// Returns the bounded-wait policy as harness timeouts.
    #[must_use]
    pub const fn harness_timeouts(&self) -> Timeouts {
        self.timeouts.to_timeouts()
    }

    /// Describes the option set in a way suitable for printing.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "backend={} form_factor={} view_configuration={} blend_mode={} \
             interaction_profiles=[{}] seed={}",
            self.graphics_backend,
            self.form_factor.as_str(),
            self.view_configuration.as_str(),
            self.blend_mode.as_str(),
            self.enabled_interaction_profiles.join(", "),
            self.random_seed,
        )
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and validates options from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds
/// [`MAX_CONFIG_FILE_SIZE`], fails to parse, or fails validation.
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            limit: MAX_CONFIG_FILE_SIZE,
            actual: size,
        });
    }
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let options: Options =
        toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
    options.validate()?;
    Ok(options)
}
