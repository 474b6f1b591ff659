//! State registry and overlay stack
//!
//! Exactly one base state is active at a time. Overlays stack on top of it
//! in LIFO order; the top of the stack (or the base state when the stack is
//! empty) is the *active* state that receives updates and key presses.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::context::GameContext;
use crate::input_system::KeyPress;

use super::draw::{DrawLayer, DrawList};
use super::{EnterArgs, GameState, StateId, Transition};

#[derive(Default)]
pub struct GameStateManager {
    states: HashMap<StateId, Box<dyn GameState>>,
    base: Option<StateId>,
    overlays: Vec<StateId>,
    quit_requested: bool,
}

impl GameStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state under its own id
    ///
    /// A second state with the same id is refused and the first one kept.
    pub fn register(&mut self, state: Box<dyn GameState>) -> bool {
        let id = state.id();
        if self.states.contains_key(&id) {
            warn!(state = %id, "State already registered, ignoring duplicate");
            return false;
        }
        self.states.insert(id, state);
        debug!(state = %id, "State registered");
        true
    }

    pub fn is_registered(&self, id: StateId) -> bool {
        self.states.contains_key(&id)
    }

    pub fn base_state(&self) -> Option<StateId> {
        self.base
    }

    /// Overlay ids, bottom first
    pub fn overlays(&self) -> &[StateId] {
        &self.overlays
    }

    pub fn active_state(&self) -> Option<StateId> {
        self.overlays.last().copied().or(self.base)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Replaces the base state, unwinding the whole overlay stack first
    pub fn switch_to(&mut self, id: StateId, ctx: &mut GameContext, args: EnterArgs) -> bool {
        if !self.is_registered(id) {
            warn!(state = %id, "switch_to: state not registered");
            return false;
        }
        info!(from = ?self.base, to = %id, overlays = self.overlays.len(), "Switching state");

        if let Some(base) = self.base.take() {
            self.with_state(base, |state| state.on_exit(ctx));
        }
        while let Some(overlay) = self.overlays.pop() {
            self.with_state(overlay, |state| state.on_exit(ctx));
        }

        self.base = Some(id);
        self.with_state(id, |state| state.on_enter(ctx, args));
        true
    }

    /// Opens `id` above the active state, which is paused but kept alive
    pub fn push_overlay(&mut self, id: StateId, ctx: &mut GameContext, args: EnterArgs) -> bool {
        if !self.is_registered(id) {
            warn!(state = %id, "push_overlay: state not registered");
            return false;
        }
        if self.overlays.contains(&id) {
            warn!(state = %id, "push_overlay: overlay already open");
            return false;
        }

        if let Some(active) = self.active_state() {
            self.with_state(active, |state| state.on_pause(ctx));
        }
        self.overlays.push(id);
        self.with_state(id, |state| state.on_enter(ctx, args));
        info!(overlay = %id, depth = self.overlays.len(), "Overlay opened");
        true
    }

    /// Closes the top overlay and resumes whatever is now on top
    pub fn pop_overlay(&mut self, ctx: &mut GameContext) -> bool {
        let Some(top) = self.overlays.pop() else {
            warn!("pop_overlay: overlay stack is empty");
            return false;
        };
        self.with_state(top, |state| state.on_exit(ctx));

        if let Some(resumed) = self.active_state() {
            self.with_state(resumed, |state| state.on_resume(ctx));
            info!(closed = %top, resumed = %resumed, depth = self.overlays.len(), "Overlay closed");
        }
        true
    }

    /// Updates the active state, then finishes the frame on the context
    pub fn update(&mut self, dt: f32, ctx: &mut GameContext) {
        if let Some(active) = self.active_state() {
            let transition = self
                .with_state(active, |state| state.update(dt, ctx))
                .unwrap_or_default();
            self.apply(transition, ctx);
        }
        ctx.end_frame(dt);
    }

    pub fn handle_key_press(&mut self, key: &str, ctx: &mut GameContext) {
        let press = ctx.input.on_key_press(key, &ctx.bindings);
        let Some(active) = self.active_state() else {
            return;
        };
        let transition = self
            .with_state(active, |state| state.on_key_press(&press, ctx))
            .unwrap_or_default();
        self.apply(transition, ctx);
    }

    pub fn handle_key_release(&mut self, key: &str, ctx: &mut GameContext) {
        ctx.input.on_key_release(key, &ctx.bindings);
        let press = KeyPress::new(key, &ctx.bindings);
        if let Some(active) = self.active_state() {
            self.with_state(active, |state| state.on_key_release(&press, ctx));
        }
    }

    /// Base state first, then overlays bottom to top
    pub fn draw(&self, ctx: &GameContext) -> DrawList {
        let mut list = DrawList::default();
        for id in self.base.iter().chain(self.overlays.iter()) {
            if let Some(state) = self.states.get(id) {
                let mut layer = DrawLayer::new(*id);
                state.draw(ctx, &mut layer);
                list.layers.push(layer);
            }
        }
        list.notifications = ctx
            .notifications
            .messages()
            .map(|n| (n.text.clone(), n.alpha()))
            .collect();
        list
    }

    pub fn apply(&mut self, transition: Transition, ctx: &mut GameContext) {
        match transition {
            Transition::None => {}
            Transition::Switch(id) => {
                self.switch_to(id, ctx, EnterArgs::None);
            }
            Transition::Push(id, args) => {
                self.push_overlay(id, ctx, args);
            }
            Transition::Pop => {
                self.pop_overlay(ctx);
            }
            Transition::Quit => {
                info!("Quit requested");
                self.quit_requested = true;
            }
        }
    }

    fn with_state<R>(&mut self, id: StateId, f: impl FnOnce(&mut dyn GameState) -> R) -> Option<R> {
        match self.states.get_mut(&id) {
            Some(state) => Some(f(state.as_mut())),
            None => {
                warn!(state = %id, "State not registered");
                None
            }
        }
    }
}
