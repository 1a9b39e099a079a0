// conformance-core/src/runtime/interactive.rs
// ============================================================================
// Module: Interactive Mode Controller
// Description: Scene/Help/Complete decision layer for interactive tests.
// Purpose: Select per-frame composition layers and collect the user verdict.
// Dependencies: crate::{core, error, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Interactive tests need a human (or scripted) decision point. The
//! controller layers three modes over the frame loop: the scene under test,
//! a help screen with a description and example image, and a terminal
//! complete state. The confirm action is reserved for the primary scene:
//! confirming there passes the test, while confirming on any auxiliary
//! screen is a hard test failure. That asymmetry is intentional; auxiliary
//! screens are dismissed by releasing the menu action, never by confirm.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::ActionBinding;
use crate::core::ActionHandle;
use crate::core::ActionKind;
use crate::core::BooleanActionState;
use crate::core::Color4f;
use crate::core::CompositionLayer;
use crate::core::Extent2D;
use crate::core::FrameState;
use crate::core::InputPath;
use crate::core::Posef;
use crate::core::ProfilePath;
use crate::core::QuadLayer;
use crate::core::ReferenceSpaceType;
use crate::core::SpaceHandle;
use crate::core::SwapchainCreateInfo;
use crate::core::SwapchainHandle;
use crate::error::HarnessResult;
use crate::error::TestFailure;
use crate::interfaces::DeviceRuntime;
use crate::interfaces::RenderBackend;
use crate::runtime::frame::FrameLoop;
use crate::runtime::session::SessionOrchestrator;

// ============================================================================
// SECTION: Layout Constants
// ============================================================================

/// Interaction profile used for the controller's own select/menu actions.
const SIMPLE_CONTROLLER_PROFILE: &str = "/interaction_profiles/khr/simple_controller";

/// Pose of the help description quad, left of the example image.
const DESCRIPTION_QUAD_POSE: Posef = Posef::from_position(-0.5, 0.0, -1.5);
/// Pose of the example image quad, right of the help text.
const EXAMPLE_QUAD_POSE: Posef = Posef::from_position(0.5, 0.0, -1.5);
/// Pose of the available-actions quad, below center.
const ACTIONS_QUAD_POSE: Posef = Posef::from_position(0.0, -0.4, -1.0);

/// Width of the description quad in meters.
const DESCRIPTION_QUAD_WIDTH: f32 = 0.75;
/// Width of the example quad in meters.
const EXAMPLE_QUAD_WIDTH: f32 = 1.25;
/// Width of the actions quad in meters.
const ACTIONS_QUAD_WIDTH: f32 = 0.75;

/// Pixel size of the text swapchains.
const TEXT_EXTENT: Extent2D = Extent2D::new(768, 768);
/// Pixel size of the actions-banner swapchains.
const ACTIONS_EXTENT: Extent2D = Extent2D::new(768, 128);

/// Banner shown while the scene is displayed.
const SCENE_ACTIONS_TEXT: &str = "Press Select to PASS. Press Menu for description";
/// Banner shown while the help screen is displayed.
const HELP_ACTIONS_TEXT: &str = "Press select to FAIL";
/// Placeholder drawn when no example image is supplied.
const EXAMPLE_UNAVAILABLE_TEXT: &str = "Example Not Available";

// ============================================================================
// SECTION: Interactive Mode
// ============================================================================

/// Which set of layers the controller submits this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractiveMode {
    /// The scene under test, with the pass/menu banner.
    #[default]
    Scene,
    /// The help description, example image, and fail banner.
    Help,
    /// Terminal: the user confirmed the scene; the loop ends.
    Complete,
}

impl InteractiveMode {
    /// Returns a stable label for the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Help => "help",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for InteractiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Interactive Mode Controller
// ============================================================================

/// Appends composition layers for interacting with interactive tests and
/// turns select/menu action state into the Scene/Help/Complete mode.
pub struct InteractiveModeController {
    /// Current mode; `Complete` is terminal.
    mode: InteractiveMode,
    /// Confirm action: pass in Scene, hard failure elsewhere.
    select_action: ActionHandle,
    /// Help action: shows the help screen while held.
    menu_action: ActionHandle,
    /// Head-locked anchor the quads start in.
    view_space: SpaceHandle,
    /// World-locked anchor the help quads move to on first Help entry.
    local_space: SpaceHandle,
    /// Layers of the scene under test, in submission order.
    scene_layers: Vec<CompositionLayer>,
    /// Help description quad.
    description_quad: QuadLayer,
    /// Example image quad.
    example_quad: QuadLayer,
    /// Available-actions banner quad; its swapchain is chosen per mode.
    actions_quad: QuadLayer,
    /// Banner swapchain shown in Scene mode.
    scene_actions_swapchain: SwapchainHandle,
    /// Banner swapchain shown in Help mode.
    help_actions_swapchain: SwapchainHandle,
    /// Set once the help quads were repositioned to the world-locked anchor.
    help_world_locked: bool,
}

impl InteractiveModeController {
    /// Sets up the controller's action set, bindings, spaces, and quads.
    ///
    /// Registers a `select` and a `menu` action bound on the simple
    /// controller profile for both hands; the caller attaches bindings
    /// (together with any test-specific sets) afterwards.
    ///
    /// # Errors
    ///
    /// Propagates runtime and render-backend failures from resource setup.
    pub fn new<R, G>(
        orchestrator: &mut SessionOrchestrator<R>,
        backend: &mut G,
        description: &str,
        example_image: Option<&str>,
    ) -> HarnessResult<Self>
    where
        R: DeviceRuntime,
        G: RenderBackend,
    {
        let action_set = orchestrator.create_action_set("interaction_test")?;
        let select_action =
            orchestrator.create_action(action_set, "interaction_manager_select", ActionKind::Boolean)?;
        let menu_action =
            orchestrator.create_action(action_set, "interaction_manager_menu", ActionKind::Boolean)?;

        let profile = ProfilePath::new(SIMPLE_CONTROLLER_PROFILE);
        orchestrator.binder_mut().add_bindings(
            profile,
            [
                ActionBinding {
                    action: select_action,
                    binding: InputPath::new("/user/hand/left/input/select/click"),
                },
                ActionBinding {
                    action: select_action,
                    binding: InputPath::new("/user/hand/right/input/select/click"),
                },
                ActionBinding {
                    action: menu_action,
                    binding: InputPath::new("/user/hand/left/input/menu/click"),
                },
                ActionBinding {
                    action: menu_action,
                    binding: InputPath::new("/user/hand/right/input/menu/click"),
                },
            ],
        )?;

        let view_space =
            orchestrator.create_reference_space(ReferenceSpaceType::View, Posef::IDENTITY)?;
        let local_space =
            orchestrator.create_reference_space(ReferenceSpaceType::Local, Posef::IDENTITY)?;

        let description_swapchain =
            create_text_swapchain(orchestrator, backend, TEXT_EXTENT, description)?;
        let example_swapchain = create_text_swapchain(
            orchestrator,
            backend,
            TEXT_EXTENT,
            example_image.unwrap_or(EXAMPLE_UNAVAILABLE_TEXT),
        )?;
        let scene_actions_swapchain =
            create_text_swapchain(orchestrator, backend, ACTIONS_EXTENT, SCENE_ACTIONS_TEXT)?;
        let help_actions_swapchain =
            create_text_swapchain(orchestrator, backend, ACTIONS_EXTENT, HELP_ACTIONS_TEXT)?;

        Ok(Self {
            mode: InteractiveMode::Scene,
            select_action,
            menu_action,
            view_space,
            local_space,
            scene_layers: Vec::new(),
            description_quad: QuadLayer {
                swapchain: description_swapchain,
                space: view_space,
                pose: DESCRIPTION_QUAD_POSE,
                width: DESCRIPTION_QUAD_WIDTH,
            },
            example_quad: QuadLayer {
                swapchain: example_swapchain,
                space: view_space,
                pose: EXAMPLE_QUAD_POSE,
                width: EXAMPLE_QUAD_WIDTH,
            },
            actions_quad: QuadLayer {
                swapchain: scene_actions_swapchain,
                space: view_space,
                pose: ACTIONS_QUAD_POSE,
                width: ACTIONS_QUAD_WIDTH,
            },
            scene_actions_swapchain,
            help_actions_swapchain,
            help_world_locked: false,
        })
    }

    /// Adds a layer to the scene under test.
    pub fn add_scene_layer(&mut self, layer: CompositionLayer) {
        self.scene_layers.push(layer);
    }

    /// Returns the current mode.
    #[must_use]
    pub const fn mode(&self) -> InteractiveMode {
        self.mode
    }

    /// Returns true once the help quads moved to the world-locked anchor.
    #[must_use]
    pub const fn help_world_locked(&self) -> bool {
        self.help_world_locked
    }

    /// Returns the confirm action handle.
    #[must_use]
    pub const fn select_action(&self) -> ActionHandle {
        self.select_action
    }

    /// Returns the help action handle.
    #[must_use]
    pub const fn menu_action(&self) -> ActionHandle {
        self.menu_action
    }

    // ========================================================================
    // SECTION: Mode Machine
    // ========================================================================

    /// Computes the next mode from the sampled select and menu action state.
    ///
    /// Scene is the default; Help overrides it while the menu action is held.
    /// A select press in Scene completes the test. `Complete` is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TestFailure::Assertion`] when select is pressed in any
    /// non-Scene mode: confirm is reserved for the primary scene, not for
    /// dismissing auxiliary screens.
    pub fn next_mode(
        &mut self,
        select: BooleanActionState,
        menu: BooleanActionState,
    ) -> HarnessResult<InteractiveMode> {
        if self.mode == InteractiveMode::Complete {
            return Ok(InteractiveMode::Complete);
        }

        let mut mode = InteractiveMode::Scene;
        if menu.current {
            mode = InteractiveMode::Help;
        }

        if select.changed_since_last_sync && select.current {
            if mode != InteractiveMode::Scene {
                // Select on the help/description screens means FAIL.
                return Err(TestFailure::assertion("user failed the interactive test"));
            }
            // Select on the scene means PASS and move to the next test.
            mode = InteractiveMode::Complete;
        }

        self.mode = mode;
        Ok(mode)
    }

    /// Assembles the layers to submit for the current mode.
    #[must_use]
    pub fn layers_for_mode(&self) -> Vec<CompositionLayer> {
        match self.mode {
            InteractiveMode::Scene => {
                let mut banner = self.actions_quad;
                banner.swapchain = self.scene_actions_swapchain;
                let mut layers = vec![banner.to_layer()];
                layers.extend(self.scene_layers.iter().copied());
                layers
            }
            InteractiveMode::Help => {
                let mut banner = self.actions_quad;
                banner.swapchain = self.help_actions_swapchain;
                vec![self.description_quad.to_layer(), self.example_quad.to_layer(), banner.to_layer()]
            }
            InteractiveMode::Complete => Vec::new(),
        }
    }

    // ========================================================================
    // SECTION: Per-Frame Driving
    // ========================================================================

    /// Runs one interactive frame: sync actions, update the mode, reposition
    /// help quads on first Help entry, submit the mode's layers, and report
    /// whether to keep looping.
    ///
    /// # Errors
    ///
    /// Propagates runtime failures and the confirm-outside-Scene verdict.
    pub fn end_frame<R: DeviceRuntime>(
        &mut self,
        orchestrator: &mut SessionOrchestrator<R>,
        frame_state: &FrameState,
    ) -> HarnessResult<bool> {
        orchestrator.sync_actions()?;
        let select = orchestrator.action_state_boolean(self.select_action)?;
        let menu = orchestrator.action_state_boolean(self.menu_action)?;

        let previous = self.mode;
        let mode = self.next_mode(select, menu)?;

        if mode == InteractiveMode::Help && previous != InteractiveMode::Help {
            self.reposition_help_quads(orchestrator, frame_state)?;
        }

        let keep_running = orchestrator.pump_events();
        let layers = self.layers_for_mode();
        orchestrator.end_frame(frame_state.predicted_display_time, &layers)?;

        if mode == InteractiveMode::Complete {
            return Ok(false);
        }
        Ok(keep_running)
    }

    /// Runs the interactive scenario to completion over a frame loop.
    ///
    /// # Errors
    ///
    /// Propagates the first per-frame failure.
    pub fn run_scenario<R: DeviceRuntime>(
        &mut self,
        orchestrator: &mut SessionOrchestrator<R>,
        frame_loop: &mut FrameLoop,
    ) -> HarnessResult {
        frame_loop
            .run(orchestrator, |orchestrator, frame_state| self.end_frame(orchestrator, frame_state))
    }

    /// Moves the help quads from the head-locked anchor to the world-locked
    /// anchor, once, placing them at the user's head pose at Help entry.
    ///
    /// Falls back to the head-locked anchor when the world-locked pose cannot
    /// currently be resolved; the move is retried on the next Help entry.
    fn reposition_help_quads<R: DeviceRuntime>(
        &mut self,
        orchestrator: &mut SessionOrchestrator<R>,
        frame_state: &FrameState,
    ) -> HarnessResult {
        if self.help_world_locked {
            return Ok(());
        }
        let located = orchestrator.locate(
            self.view_space,
            self.local_space,
            frame_state.predicted_display_time,
        )?;
        if let Some(head_pose) = located {
            // The actions banner stays head-locked; only the help content
            // quads anchor to the world.
            for quad in [&mut self.description_quad, &mut self.example_quad] {
                quad.space = self.local_space;
                quad.pose = head_pose.transform(&quad.pose);
            }
            self.help_world_locked = true;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Swapchain Helpers
// ============================================================================

/// Creates a swapchain and draws one static text image into it.
fn create_text_swapchain<R, G>(
    orchestrator: &mut SessionOrchestrator<R>,
    backend: &mut G,
    extent: Extent2D,
    text: &str,
) -> HarnessResult<SwapchainHandle>
where
    R: DeviceRuntime,
    G: RenderBackend,
{
    let format = orchestrator.default_color_format(backend)?;
    let swapchain = orchestrator.create_swapchain(&SwapchainCreateInfo {
        format,
        extent,
    })?;
    orchestrator.acquire_draw_release(backend, swapchain, |backend, image_index| {
        backend.clear_image(swapchain, image_index, Color4f::TRANSPARENT)?;
        backend.draw_text(swapchain, image_index, text)?;
        Ok(())
    })?;
    Ok(swapchain)
}
