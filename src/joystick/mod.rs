//! Joystick component with a statum lifecycle.
//!
//! # State Machine
//!
//! ```text
//! Configured ──mount──► Mounted ──cleanup──► TornDown
//! ```
//!
//! `Configured` holds the merged configuration. Mounting binds the handle surface,
//! emits the zero move event and attaches every plugin in order. Cleanup detaches
//! all listeners the plugins registered and clears every subscriber list.

pub mod engine;
pub mod event;
pub mod throttle;

pub use engine::{clamp_move, resolve_radius, ClampedMove, MovementEngine};
pub use event::{JoystickMoveEvent, MoveAngle, MoveCallback, MoveOffset, MovePressure};
pub use throttle::{Clock, Throttle, ThrottledEmitter, WallClock};

use crate::config::{JoystickConfig, JoystickOptions};
use crate::error::JoystickError;
use crate::input::{InputHost, ListenerScope};
use crate::plugins::{JoystickPlugin, PluginContext};
use crate::state::{HandleState, JoystickStates};
use crate::surface::{Surface, SurfaceBinding};
use statum_macros::{machine, state};
use std::rc::Rc;
use tracing::{debug, info};

/// Everything a joystick is built from, before defaults are applied.
pub struct JoystickProps {
    pub options: JoystickOptions,
    pub plugins: Vec<Box<dyn JoystickPlugin>>,
    pub on_move: Option<MoveCallback>,
}

/// Props after the single merge step.
pub struct ResolvedProps {
    pub config: JoystickConfig,
    pub plugins: Vec<Box<dyn JoystickPlugin>>,
    pub on_move: MoveCallback,
}

impl JoystickProps {
    pub fn new() -> Self {
        Self::from_options(JoystickOptions::default())
    }

    pub fn from_options(options: JoystickOptions) -> Self {
        Self {
            options,
            plugins: Vec::new(),
            on_move: None,
        }
    }

    pub fn with_plugin(mut self, plugin: impl JoystickPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn with_on_move(mut self, on_move: impl Fn(&JoystickMoveEvent) + 'static) -> Self {
        self.on_move = Some(Rc::new(on_move));
        self
    }

    pub fn merge_with_defaults(self) -> Result<ResolvedProps, JoystickError> {
        Ok(ResolvedProps {
            config: self.options.resolve()?,
            plugins: self.plugins,
            on_move: self.on_move.unwrap_or_else(|| Rc::new(|_| {})),
        })
    }
}

impl Default for JoystickProps {
    fn default() -> Self {
        Self::new()
    }
}

#[state]
#[derive(Debug, Clone)]
pub enum JoystickLifecycle {
    Configured, // Props merged, nothing attached yet
    Mounted,    // Surfaces bound, plugins listening
    TornDown,   // Listeners and subscribers released
}

/// Engine and surface binding, present once mounted.
pub struct MountedParts {
    engine: MovementEngine,
    binding: SurfaceBinding,
}

#[machine]
pub struct Joystick<S: JoystickLifecycle> {
    config: Rc<JoystickConfig>,
    plugins: Vec<Box<dyn JoystickPlugin>>,
    on_move: MoveCallback,
    clock: Rc<dyn Clock>,
    states: JoystickStates,
    handle_state: HandleState,
    listeners: Rc<ListenerScope>,
    mounted: Option<MountedParts>,
}

impl<S: JoystickLifecycle> Joystick<S> {
    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    pub fn states(&self) -> &JoystickStates {
        &self.states
    }

    pub fn handle_state(&self) -> &HandleState {
        &self.handle_state
    }
}

impl Joystick<Configured> {
    /// Merges the props with defaults. Fails on invalid options.
    pub fn create(props: JoystickProps) -> Result<Self, JoystickError> {
        let ResolvedProps {
            config,
            plugins,
            on_move,
        } = props.merge_with_defaults()?;
        info!(
            "Creating joystick ({} bounding, {} plugins)",
            config.bounding_model,
            plugins.len()
        );

        Ok(Self::new(
            Rc::new(config),
            plugins,
            on_move,
            Rc::new(WallClock),
            JoystickStates::new(),
            HandleState::new(),
            Rc::new(ListenerScope::new()),
            None,
        ))
    }

    /// Replaces the wall clock used for throttling.
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Binds the surfaces, emits the zero event and attaches the plugins in order.
    pub fn mount(
        mut self,
        base: Rc<dyn Surface>,
        handle: Rc<dyn Surface>,
        host: InputHost,
    ) -> Joystick<Mounted> {
        let binding = SurfaceBinding::bind_handle(
            Rc::clone(&handle),
            &self.states,
            Rc::clone(&self.config),
        );

        let emitter = ThrottledEmitter::new(
            Rc::clone(&self.on_move),
            self.config.throttle_events_by,
            Rc::clone(&self.clock),
        );
        let engine = MovementEngine::new(
            Rc::clone(&self.config),
            self.states.clone(),
            self.handle_state.clone(),
            Rc::clone(&base),
            Rc::clone(&handle),
            emitter,
        );

        (self.on_move)(&JoystickMoveEvent::zero());

        let plugins = std::mem::take(&mut self.plugins);
        for (plugin_index, plugin) in plugins.into_iter().enumerate() {
            info!("Attaching {} plugin at index {}", plugin.name(), plugin_index);
            self.handle_state.set_dragging(plugin_index, false);
            plugin.attach(PluginContext {
                plugin_index,
                states: self.states.clone(),
                handle_state: self.handle_state.clone(),
                engine: engine.clone(),
                base: Rc::clone(&base),
                handle: Rc::clone(&handle),
                config: Rc::clone(&self.config),
                host: host.clone(),
                listeners: Rc::clone(&self.listeners),
            });
        }

        self.mounted = Some(MountedParts { engine, binding });
        debug!("Joystick mounted");
        self.transition()
    }
}

impl Joystick<Mounted> {
    pub fn engine(&self) -> Option<&MovementEngine> {
        self.mounted.as_ref().map(|parts| &parts.engine)
    }

    /// See [`MovementEngine::handle_handle_move`].
    pub fn handle_handle_move(&self, dx: f64, dy: f64) -> Option<ClampedMove> {
        self.engine()
            .and_then(|engine| engine.handle_handle_move(dx, dy))
    }

    pub fn get_radius(&self) -> Option<f64> {
        self.engine().map(MovementEngine::get_radius)
    }

    /// Detaches every plugin listener and clears every subscriber list.
    pub fn cleanup(mut self) -> Joystick<TornDown> {
        let released = self.listeners.release_all();
        if let Some(parts) = self.mounted.take() {
            parts.binding.release();
        }
        self.states.clear_subscribers();
        info!("Joystick torn down, released {} listeners", released);
        self.transition()
    }
}
