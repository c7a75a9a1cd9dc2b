//! Surfaces: the renderable base and handle the engine measures and styles.
//!
//! Rendering itself belongs to the embedding UI. The engine only needs to read
//! client sizes and the disabled flag, and to push a [`HandleStyle`] whenever the
//! offset or transition cells change.

use crate::config::JoystickConfig;
use crate::state::{JoystickStates, Observe, Offset, Subscription};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

pub trait Surface {
    fn client_width(&self) -> f64;
    fn client_height(&self) -> f64;

    fn disabled(&self) -> bool {
        false
    }

    /// Applying the same style twice must be visually a no-op.
    fn apply_style(&self, style: &HandleStyle);
}

/// Declarative style pushed to a surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandleStyle {
    pub translate: Offset,
    /// `Some("all .2s ease")` while returning to center, `None` while dragging.
    pub transition: Option<String>,
    /// Stops the host from turning a drag into scrolling.
    pub touch_action_none: bool,
}

impl HandleStyle {
    /// Handle style from the current cell values.
    pub fn for_handle(offset: Offset, should_transition: bool, config: &JoystickConfig) -> Self {
        let transition = (should_transition && !config.disable_reset_animation)
            .then(|| format!("all {}", config.reset_animation));
        Self {
            translate: offset,
            transition,
            touch_action_none: true,
        }
    }

    pub fn transform_css(&self) -> String {
        format!("translate({}px,{}px)", self.translate.x, self.translate.y)
    }

    pub fn transition_css(&self) -> &str {
        self.transition.as_deref().unwrap_or("none")
    }
}

/// Re-applies a style function to a surface whenever an observed cell changes.
pub struct SurfaceBinding {
    subscriptions: Vec<Subscription>,
}

impl SurfaceBinding {
    pub fn bind<S, F>(surface: Rc<S>, style: F, observed: &[&dyn Observe]) -> Self
    where
        S: Surface + ?Sized + 'static,
        F: Fn() -> HandleStyle + 'static,
    {
        let restyle: Rc<dyn Fn()> = Rc::new(move || {
            let next = style();
            trace!("Applying style {}", next.transform_css());
            surface.apply_style(&next);
        });
        restyle();

        let subscriptions = observed
            .iter()
            .map(|cell| cell.observe(Rc::clone(&restyle)))
            .collect();
        Self { subscriptions }
    }

    /// Binds the handle surface to the joystick's offset and transition cells.
    pub fn bind_handle<S>(handle: Rc<S>, states: &JoystickStates, config: Rc<JoystickConfig>) -> Self
    where
        S: Surface + ?Sized + 'static,
    {
        let cells = states.clone();
        Self::bind(
            handle,
            move || HandleStyle::for_handle(cells.offset.get(), cells.should_transition.get(), &config),
            &[&states.offset as &dyn Observe, &states.should_transition],
        )
    }

    pub fn release(&self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

/// In-memory surface whose size is set by the host each frame.
#[derive(Debug, Default)]
pub struct SurfaceElement {
    width: Cell<f64>,
    height: Cell<f64>,
    disabled: Cell<bool>,
    style: RefCell<HandleStyle>,
    applied: Cell<usize>,
}

impl SurfaceElement {
    pub fn new(width: f64, height: f64) -> Self {
        let element = Self::default();
        element.resize(width, height);
        element
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn style(&self) -> HandleStyle {
        self.style.borrow().clone()
    }

    /// How many times a style has been pushed.
    pub fn apply_count(&self) -> usize {
        self.applied.get()
    }
}

impl Surface for SurfaceElement {
    fn client_width(&self) -> f64 {
        self.width.get()
    }

    fn client_height(&self) -> f64 {
        self.height.get()
    }

    fn disabled(&self) -> bool {
        self.disabled.get()
    }

    fn apply_style(&self, style: &HandleStyle) {
        *self.style.borrow_mut() = style.clone();
        self.applied.set(self.applied.get() + 1);
    }
}

/// Duration of a transition descriptor such as `".2s ease"` or `"150ms linear"`.
pub fn parse_transition_seconds(descriptor: &str) -> Option<Duration> {
    let token = descriptor.split_whitespace().next()?;
    if let Some(ms) = token.strip_suffix("ms") {
        let value: f64 = ms.parse().ok()?;
        return (value >= 0.0).then(|| Duration::from_secs_f64(value / 1000.0));
    }
    let secs: f64 = token.strip_suffix('s')?.parse().ok()?;
    (secs >= 0.0).then(|| Duration::from_secs_f64(secs))
}
