//! Scripted scenarios and the driver that plays them against one pony.

use std::rc::Rc;
use std::time::Duration;

use clap::ValueEnum;
use ponyboop_assets::PonyAsset;
use ponyboop_core::{
    HostWindow, Pony, PonyConfig, Position, RenderUpdate, ShakeEvent, TimerRuntime, UserInput,
};
use ponyboop_runtime_std::StdRuntime;
use ponyboop_testing::{oscillation, ScriptedWindow};

const ORIGIN: Position = Position::new(640, 360);
const SHAKE_AMPLITUDE_PX: i32 = 40;
const BOOP_BURST: u32 = 24;
const BOOP_SPACING_MS: u64 = 150;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Boop fast enough to walk the whole transition table.
    BoopBurst,
    /// Shake the window, let it settle, wait for recovery.
    Shake,
    /// Do nothing until the pony falls asleep.
    Idle,
    /// Every scenario in turn.
    All,
}

impl Scenario {
    pub fn expand(self) -> &'static [Scenario] {
        match self {
            Scenario::BoopBurst => &[Scenario::BoopBurst],
            Scenario::Shake => &[Scenario::Shake],
            Scenario::Idle => &[Scenario::Idle],
            Scenario::All => &[Scenario::BoopBurst, Scenario::Shake, Scenario::Idle],
        }
    }
}

/// Times are relative to the start of the scenario.
#[derive(Clone, Debug, Default)]
pub struct Script {
    pub boops_at_ms: Vec<u64>,
    pub window_path: Vec<(u64, Position)>,
    pub duration_ms: u64,
}

impl Script {
    pub fn for_scenario(scenario: Scenario, config: &PonyConfig) -> Self {
        let interaction = &config.interaction;
        match scenario {
            Scenario::BoopBurst => {
                let boops_at_ms: Vec<u64> = (0..u64::from(BOOP_BURST))
                    .map(|index| index * BOOP_SPACING_MS)
                    .collect();
                let last = boops_at_ms.last().copied().unwrap_or(0);
                Self {
                    boops_at_ms,
                    window_path: Vec::new(),
                    duration_ms: last + interaction.boop_timeout_ms + 500,
                }
            }
            Scenario::Shake => {
                let interval = config.shake.check_interval_ms;
                let start = interval / 2;
                let end = start + config.shake.min_duration_ms + 4 * interval;
                Self {
                    boops_at_ms: vec![end + interval],
                    window_path: oscillation(ORIGIN, SHAKE_AMPLITUDE_PX, start, end, interval).into_vec(),
                    duration_ms: end + 2 * interval + interaction.scared_recovery_ms + 500,
                }
            }
            Scenario::Idle => Self {
                boops_at_ms: Vec::new(),
                window_path: Vec::new(),
                duration_ms: interaction.inactive_timeout_ms + 500,
            },
            // Expanded before scripting.
            Scenario::All => Self::default(),
        }
    }
}

/// How the scenario clock advances.
pub enum Driver {
    Virtual(TimerRuntime),
    RealTime(StdRuntime),
}

impl Driver {
    pub fn new(real_time: bool) -> Self {
        if real_time {
            Driver::RealTime(StdRuntime::new())
        } else {
            Driver::Virtual(TimerRuntime::new())
        }
    }

    fn runtime(&self) -> TimerRuntime {
        match self {
            Driver::Virtual(runtime) => runtime.clone(),
            Driver::RealTime(runtime) => runtime.timer_runtime(),
        }
    }

    fn run_for(&self, duration_ms: u64) {
        match self {
            Driver::Virtual(runtime) => {
                runtime.advance_by(duration_ms);
            }
            Driver::RealTime(runtime) => {
                runtime.run_for(Duration::from_millis(duration_ms));
            }
        }
    }
}

/// What a scenario run observed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub renders: Vec<(u64, RenderUpdate)>,
    pub shakes: Vec<(u64, ShakeEvent)>,
}

/// Plays `script` against a fresh pony and prints every render update.
pub fn play(scenario: Scenario, script: &Script, config: &PonyConfig, driver: &Driver) -> Outcome {
    let runtime = driver.runtime();
    let base = runtime.now_ms();
    log::info!("scenario {scenario:?}: {}ms", script.duration_ms);

    let window = Rc::new(
        ScriptedWindow::new(runtime.handle(), ORIGIN)
            .with_path(script.window_path.iter().map(|&(at, position)| (base + at, position))),
    );
    let pony = Rc::new(Pony::new(runtime.handle(), config.clone()));

    let outcome = Rc::new(std::cell::RefCell::new(Outcome::default()));
    {
        let outcome = Rc::clone(&outcome);
        let clock = runtime.handle();
        pony.add_render_listener(move |update| {
            let at = clock.now_ms().saturating_sub(base);
            match update {
                RenderUpdate::DisplayState(state) => {
                    println!("{at:>6}ms  {update}  asset={}", PonyAsset::for_display_state(*state));
                }
                RenderUpdate::BoopInput { .. } => println!("{at:>6}ms  {update}"),
            }
            outcome.borrow_mut().renders.push((at, *update));
        });
    }
    {
        let outcome = Rc::clone(&outcome);
        let clock = runtime.handle();
        pony.detector().add_listener(move |event| {
            let at = clock.now_ms().saturating_sub(base);
            log::info!("{event} at {at}ms");
            outcome.borrow_mut().shakes.push((at, *event));
        });
    }

    let host: Rc<dyn HostWindow> = window;
    pony.connect(host);
    for &at in &script.boops_at_ms {
        let pony = Rc::downgrade(&pony);
        runtime.schedule(at, move |_| {
            if let Some(pony) = pony.upgrade() {
                pony.user_input(UserInput::Boop);
            }
        });
    }

    driver.run_for(script.duration_ms);
    pony.disconnect();
    log::info!(
        "scenario {scenario:?} finished in state {} after {}ms",
        pony.display_state(),
        runtime.now_ms().saturating_sub(base)
    );

    let result = outcome.borrow().clone();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponyboop_core::DisplayState;

    fn states(outcome: &Outcome) -> Vec<DisplayState> {
        outcome
            .renders
            .iter()
            .filter_map(|(_, update)| match update {
                RenderUpdate::DisplayState(state) => Some(*state),
                RenderUpdate::BoopInput { .. } => None,
            })
            .collect()
    }

    fn run(scenario: Scenario) -> Outcome {
        let config = PonyConfig::default();
        let script = Script::for_scenario(scenario, &config);
        play(scenario, &script, &config, &Driver::new(false))
    }

    #[test]
    fn boop_burst_walks_the_table_and_resets() {
        let outcome = run(Scenario::BoopBurst);
        assert_eq!(
            states(&outcome),
            vec![
                DisplayState::Booped1,
                DisplayState::Booped2,
                DisplayState::Booped3,
                DisplayState::Booped4,
                DisplayState::Broken,
                DisplayState::Resting,
            ]
        );
        assert!(outcome.shakes.is_empty());
    }

    #[test]
    fn shake_scares_and_recovers() {
        let outcome = run(Scenario::Shake);
        let shakes: Vec<ShakeEvent> = outcome.shakes.iter().map(|(_, event)| *event).collect();
        assert_eq!(shakes, vec![ShakeEvent::Start, ShakeEvent::End]);
        let states = states(&outcome);
        assert_eq!(states.first(), Some(&DisplayState::Scared));
        assert!(states.contains(&DisplayState::Resting));
    }

    #[test]
    fn idle_pony_falls_asleep() {
        let outcome = run(Scenario::Idle);
        assert_eq!(
            outcome.renders,
            vec![(4000, RenderUpdate::DisplayState(DisplayState::Inactive))]
        );
    }

    #[test]
    fn all_expands_to_every_scenario() {
        assert_eq!(Scenario::All.expand().len(), 3);
        assert!(!Scenario::All.expand().contains(&Scenario::All));
    }
}
