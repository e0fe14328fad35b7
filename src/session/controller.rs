//! Interactive plane manipulation.
//!
//! Input arrives as explicit [`InputEvent`] values. Whoever owns the real
//! event source registers a listener through [`PlaneController::listen`] and
//! gets a [`ListenerGuard`] back; dropping the guard unregisters it.

use glam::Vec3;

use crate::schema::PlaneTransform;

/// What a drag gesture does to the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    /// Keyboard shortcut: W translates, E rotates, R scales.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(TransformMode::Translate),
            'e' => Some(TransformMode::Rotate),
            'r' => Some(TransformMode::Scale),
            _ => None,
        }
    }
}

/// Input delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(char),
    /// Drag in the current mode. Translation in volume units, rotation in
    /// radians about local X/Y/Z, scale as a relative change.
    Drag(Vec3),
    /// Restore the initial placement.
    Reset,
}

/// Opaque handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// An event source that listeners can be attached to.
pub trait InputSource {
    fn add_listener(&mut self) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Keeps a listener registered on `S` for as long as it lives.
pub struct ListenerGuard<'s, S: InputSource + ?Sized> {
    source: &'s mut S,
    id: ListenerId,
}

impl<S: InputSource + ?Sized> ListenerGuard<'_, S> {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: InputSource + ?Sized> Drop for ListenerGuard<'_, S> {
    fn drop(&mut self) {
        self.source.remove_listener(self.id);
    }
}

/// Owns the plane placement and turns input into new transforms.
#[derive(Debug, Clone)]
pub struct PlaneController {
    initial: PlaneTransform,
    transform: PlaneTransform,
    mode: TransformMode,
    controls_enabled: bool,
    needs_resample: bool,
}

impl PlaneController {
    pub fn new(initial: PlaneTransform) -> Self {
        Self {
            initial,
            transform: initial,
            mode: TransformMode::default(),
            controls_enabled: true,
            needs_resample: true,
        }
    }

    /// Register with an event source. Events are then forwarded to
    /// [`handle_event`](Self::handle_event) by the caller until the guard
    /// is dropped.
    pub fn listen<S: InputSource + ?Sized>(source: &mut S) -> ListenerGuard<'_, S> {
        let id = source.add_listener();
        log::debug!("Plane controller listening as {:?}", id);
        ListenerGuard { source, id }
    }

    pub fn transform(&self) -> PlaneTransform {
        self.transform
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    /// Disabled controls ignore all input events.
    pub fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Apply one input event. Returns true if the event was consumed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.controls_enabled {
            return false;
        }
        match *event {
            InputEvent::KeyDown(key) => match TransformMode::from_key(key) {
                Some(mode) => {
                    self.mode = mode;
                    true
                }
                None => false,
            },
            InputEvent::Drag(delta) => {
                let mode = self.mode;
                self.modify(|t| match mode {
                    TransformMode::Translate => t.translated(delta),
                    TransformMode::Rotate => t.rotated_euler(delta),
                    TransformMode::Scale => t.scaled(Vec3::ONE + delta),
                });
                true
            }
            InputEvent::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Replace the transform with `f(current)` and flag a resample.
    pub fn modify(&mut self, f: impl FnOnce(PlaneTransform) -> PlaneTransform) {
        let next = f(self.transform);
        if next.is_finite() {
            self.set_transform(next);
        } else {
            log::warn!("Ignoring non-finite plane transform {:?}", next);
        }
    }

    pub fn set_transform(&mut self, transform: PlaneTransform) {
        self.transform = transform;
        self.needs_resample = true;
    }

    /// Return to the initial placement.
    pub fn reset(&mut self) {
        self.set_transform(self.initial);
    }

    pub fn needs_resample(&self) -> bool {
        self.needs_resample
    }

    /// Raise the resample flag without moving the plane.
    pub fn mark_dirty(&mut self) {
        self.needs_resample = true;
    }

    /// Read and clear the resample flag.
    pub fn take_needs_resample(&mut self) -> bool {
        std::mem::take(&mut self.needs_resample)
    }
}
