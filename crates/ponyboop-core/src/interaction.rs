//! Interaction state machine.
//!
//! # Transitions
//!
//! | Input | Effect |
//! |---|---|
//! | boop (not scared) | count += 1; exact table hit sets the state; restart boop reset |
//! | boop (scared) | nothing |
//! | shake start | cancel inactivity, boop reset and recovery; count = 0; `Scared`; boop input off |
//! | shake end | start scared recovery |
//! | any interaction | restart inactivity |
//! | boop reset fires | `Resting`, count = 0 |
//! | scared recovery fires | `Resting`, boop input on, restart inactivity |
//! | inactivity fires | `Inactive` |
//!
//! The transitions live in `InteractionCore`, which only produces commands.
//! [`InteractionStateMachine`] executes them against its timer slots and
//! render listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::config::InteractionConfig;
use crate::display::DisplayState;
use crate::listeners::{ListenerId, Listeners};
use crate::runtime::TimerRuntimeHandle;
use crate::timer::TimerSlot;

/// The three independent timers owned by the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionTimer {
    BoopReset,
    ScaredRecovery,
    Inactivity,
}

impl InteractionTimer {
    pub const ALL: [InteractionTimer; 3] = [
        InteractionTimer::BoopReset,
        InteractionTimer::ScaredRecovery,
        InteractionTimer::Inactivity,
    ];
}

/// Signals from the UI layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UserInput {
    Boop,
    CutieMarkClicked,
    CloseRequested,
    TitlebarDragStart,
    TitlebarDrag,
    TitlebarDragEnd,
}

/// Output for the rendering collaborator. Emitted only on change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderUpdate {
    DisplayState(DisplayState),
    BoopInput { enabled: bool },
}

impl fmt::Display for RenderUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderUpdate::DisplayState(state) => write!(f, "state {state}"),
            RenderUpdate::BoopInput { enabled: true } => f.write_str("boop input enabled"),
            RenderUpdate::BoopInput { enabled: false } => f.write_str("boop input disabled"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Schedule(InteractionTimer),
    Cancel(InteractionTimer),
    Render(RenderUpdate),
}

type Commands = SmallVec<[Command; 6]>;

struct InteractionCore {
    config: InteractionConfig,
    state: DisplayState,
    boop_count: u32,
    boop_enabled: bool,
}

impl InteractionCore {
    fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: DisplayState::Resting,
            boop_count: 0,
            boop_enabled: true,
        }
    }

    fn delay_ms(&self, timer: InteractionTimer) -> u64 {
        match timer {
            InteractionTimer::BoopReset => self.config.boop_timeout_ms,
            InteractionTimer::ScaredRecovery => self.config.scared_recovery_ms,
            InteractionTimer::Inactivity => self.config.inactive_timeout_ms,
        }
    }

    fn set_state(&mut self, state: DisplayState, out: &mut Commands) {
        if state == DisplayState::Resting {
            self.boop_count = 0;
        }
        if self.state != state {
            log::debug!("display state {} -> {}", self.state, state);
            self.state = state;
            out.push(Command::Render(RenderUpdate::DisplayState(state)));
        }
    }

    fn set_boop_enabled(&mut self, enabled: bool, out: &mut Commands) {
        if self.boop_enabled != enabled {
            self.boop_enabled = enabled;
            out.push(Command::Render(RenderUpdate::BoopInput { enabled }));
        }
    }

    fn boop(&mut self, out: &mut Commands) {
        if self.state == DisplayState::Scared {
            log::trace!("boop ignored while scared");
            return;
        }
        out.push(Command::Cancel(InteractionTimer::BoopReset));
        self.boop_count = self.boop_count.saturating_add(1);
        if let Some(next) = self.config.transitions.lookup(self.boop_count) {
            self.set_state(next, out);
        }
        out.push(Command::Schedule(InteractionTimer::BoopReset));
    }

    fn shake_started(&mut self, out: &mut Commands) {
        out.push(Command::Cancel(InteractionTimer::Inactivity));
        out.push(Command::Cancel(InteractionTimer::BoopReset));
        // A recovery left over from an earlier shake must not cut this one short.
        out.push(Command::Cancel(InteractionTimer::ScaredRecovery));
        self.boop_count = 0;
        self.set_state(DisplayState::Scared, out);
        self.set_boop_enabled(false, out);
    }

    fn shake_ended(&mut self, out: &mut Commands) {
        out.push(Command::Schedule(InteractionTimer::ScaredRecovery));
    }

    fn any_interaction(&mut self, out: &mut Commands) {
        out.push(Command::Schedule(InteractionTimer::Inactivity));
    }

    fn timer_elapsed(&mut self, timer: InteractionTimer, out: &mut Commands) {
        log::trace!("{timer:?} timer elapsed");
        match timer {
            InteractionTimer::BoopReset => self.set_state(DisplayState::Resting, out),
            InteractionTimer::ScaredRecovery => {
                self.set_state(DisplayState::Resting, out);
                self.set_boop_enabled(true, out);
                self.any_interaction(out);
            }
            InteractionTimer::Inactivity => self.set_state(DisplayState::Inactive, out),
        }
    }
}

#[derive(Default)]
struct InteractionTimers {
    boop_reset: TimerSlot,
    scared_recovery: TimerSlot,
    inactivity: TimerSlot,
}

impl InteractionTimers {
    fn slot_mut(&mut self, timer: InteractionTimer) -> &mut TimerSlot {
        match timer {
            InteractionTimer::BoopReset => &mut self.boop_reset,
            InteractionTimer::ScaredRecovery => &mut self.scared_recovery,
            InteractionTimer::Inactivity => &mut self.inactivity,
        }
    }

    fn slot(&self, timer: InteractionTimer) -> &TimerSlot {
        match timer {
            InteractionTimer::BoopReset => &self.boop_reset,
            InteractionTimer::ScaredRecovery => &self.scared_recovery,
            InteractionTimer::Inactivity => &self.inactivity,
        }
    }
}

struct MachineShared {
    runtime: TimerRuntimeHandle,
    core: RefCell<InteractionCore>,
    timers: RefCell<InteractionTimers>,
    listeners: Listeners<RenderUpdate>,
}

/// Owns a pony's display state, boop counter and interaction timers.
///
/// Cloning yields another handle to the same machine.
#[derive(Clone)]
pub struct InteractionStateMachine {
    shared: Rc<MachineShared>,
}

impl InteractionStateMachine {
    pub fn new(runtime: TimerRuntimeHandle, config: InteractionConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid interaction config: {config:?}"
        );
        Self {
            shared: Rc::new(MachineShared {
                runtime,
                core: RefCell::new(InteractionCore::new(config)),
                timers: RefCell::new(InteractionTimers::default()),
                listeners: Listeners::new(),
            }),
        }
    }

    pub fn display_state(&self) -> DisplayState {
        self.shared.core.borrow().state
    }

    pub fn boop_count(&self) -> u32 {
        self.shared.core.borrow().boop_count
    }

    pub fn boop_enabled(&self) -> bool {
        self.shared.core.borrow().boop_enabled
    }

    pub fn is_pending(&self, timer: InteractionTimer) -> bool {
        self.shared.timers.borrow().slot(timer).is_pending()
    }

    pub fn pending_timers(&self) -> SmallVec<[InteractionTimer; 3]> {
        let timers = self.shared.timers.borrow();
        InteractionTimer::ALL
            .into_iter()
            .filter(|&timer| timers.slot(timer).is_pending())
            .collect()
    }

    pub fn add_listener(&self, listener: impl Fn(&RenderUpdate) + 'static) -> ListenerId {
        self.shared.listeners.add(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    /// Entry point for the UI layer. Every input counts as an interaction;
    /// a boop is then applied unless the boop affordance is hidden.
    pub fn user_input(&self, input: UserInput) {
        if input == UserInput::Boop && !self.boop_enabled() {
            log::trace!("boop dropped while boop input is disabled");
            return;
        }
        self.on_any_interaction();
        if input == UserInput::Boop {
            self.on_boop();
        }
    }

    pub fn on_boop(&self) {
        Self::apply(&self.shared, |core, out| core.boop(out));
    }

    pub fn on_shake_start(&self) {
        Self::apply(&self.shared, |core, out| core.shake_started(out));
    }

    pub fn on_shake_end(&self) {
        Self::apply(&self.shared, |core, out| core.shake_ended(out));
    }

    pub fn on_any_interaction(&self) {
        Self::apply(&self.shared, |core, out| core.any_interaction(out));
    }

    /// Restarts a scared recovery that a [`teardown`](Self::teardown) cut off.
    ///
    /// Does nothing unless boop input is disabled with no recovery pending,
    /// which only happens when the machine was torn down between a shake
    /// ending and its recovery firing.
    pub fn resume(&self) {
        if self.boop_enabled() || self.is_pending(InteractionTimer::ScaredRecovery) {
            return;
        }
        log::debug!("resuming an interrupted scared recovery");
        Self::apply(&self.shared, |core, out| core.shake_ended(out));
    }

    /// Cancels every pending timer. Safe to call any number of times.
    pub fn teardown(&self) {
        let mut timers = self.shared.timers.borrow_mut();
        for timer in InteractionTimer::ALL {
            timers.slot_mut(timer).cancel();
        }
    }

    fn timer_elapsed(shared: &Rc<MachineShared>, timer: InteractionTimer) {
        shared.timers.borrow_mut().slot_mut(timer).mark_fired();
        Self::apply(shared, |core, out| core.timer_elapsed(timer, out));
    }

    fn apply(shared: &Rc<MachineShared>, transition: impl FnOnce(&mut InteractionCore, &mut Commands)) {
        let mut commands = Commands::new();
        transition(&mut *shared.core.borrow_mut(), &mut commands);

        let mut renders: SmallVec<[RenderUpdate; 2]> = SmallVec::new();
        {
            let core = shared.core.borrow();
            let mut timers = shared.timers.borrow_mut();
            for command in commands {
                match command {
                    Command::Schedule(timer) => {
                        let weak = Rc::downgrade(shared);
                        timers.slot_mut(timer).schedule(
                            &shared.runtime,
                            core.delay_ms(timer),
                            move |_| {
                                if let Some(shared) = weak.upgrade() {
                                    Self::timer_elapsed(&shared, timer);
                                }
                            },
                        );
                    }
                    Command::Cancel(timer) => {
                        timers.slot_mut(timer).cancel();
                    }
                    Command::Render(update) => renders.push(update),
                }
            }
        }

        for update in renders {
            shared.listeners.emit(&update);
        }
    }
}

#[cfg(test)]
#[path = "tests/interaction_tests.rs"]
mod tests;
