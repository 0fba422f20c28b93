use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ShakeConfig;
use crate::geometry::{MotionSample, Position};
use crate::listeners::{ListenerId, Listeners};
use crate::platform::HostWindow;
use crate::runtime::TimerRuntimeHandle;
use crate::sampler::MotionSampler;
use crate::shake::{ShakeClassifier, ShakeEvent, ShakePhase};

struct DetectorShared {
    config: ShakeConfig,
    classifier: RefCell<ShakeClassifier>,
    sampler: MotionSampler,
    listeners: Listeners<ShakeEvent>,
}

impl DetectorShared {
    fn process(&self, sample: &MotionSample) -> Option<ShakeEvent> {
        if !self.sampler.is_attached() {
            return None;
        }
        let event = self.classifier.borrow_mut().sample(sample);
        if let Some(event) = event {
            self.listeners.emit(&event);
        }
        event
    }
}

/// Detects shaking of the window a pony lives in.
///
/// While attached, the detector samples the window every
/// `check_interval_ms` and emits [`ShakeEvent::Start`] / [`ShakeEvent::End`]
/// to its listeners. Detaching closes an open shake with a final
/// [`ShakeEvent::End`].
pub struct ShakeDetector {
    shared: Rc<DetectorShared>,
}

impl ShakeDetector {
    pub fn new(runtime: TimerRuntimeHandle, config: ShakeConfig) -> Self {
        let sampler = MotionSampler::new(runtime, config.check_interval_ms);
        let classifier = ShakeClassifier::new(&config, Position::default());
        Self {
            shared: Rc::new(DetectorShared {
                config,
                classifier: RefCell::new(classifier),
                sampler,
                listeners: Listeners::new(),
            }),
        }
    }

    pub fn config(&self) -> &ShakeConfig {
        &self.shared.config
    }

    pub fn phase(&self) -> ShakePhase {
        self.shared.classifier.borrow().phase()
    }

    pub fn is_attached(&self) -> bool {
        self.shared.sampler.is_attached()
    }

    /// Starts watching `window`. An existing attachment is detached first.
    pub fn attach(&self, window: Rc<dyn HostWindow>) {
        self.detach();
        let weak = Rc::downgrade(&self.shared);
        let baseline = self.shared.sampler.attach(window, move |sample| {
            if let Some(shared) = weak.upgrade() {
                shared.process(&sample);
            }
        });
        self.shared.classifier.borrow_mut().reset_baseline(baseline);
        log::debug!("shake detector attached at {baseline}");
    }

    /// Stops sampling. Emits a closing [`ShakeEvent::End`] if a shake is open.
    /// Safe to call repeatedly or before any attach.
    pub fn detach(&self) {
        if self.shared.sampler.detach() {
            log::debug!("shake detector detached");
        }
        let closing = self.shared.classifier.borrow_mut().finish();
        if let Some(event) = closing {
            self.shared.listeners.emit(&event);
        }
    }

    /// Feeds a sample directly, for hosts that push positions themselves.
    /// Ignored while detached.
    pub fn process_sample(&self, sample: MotionSample) -> Option<ShakeEvent> {
        self.shared.process(&sample)
    }

    pub fn add_listener(&self, listener: impl Fn(&ShakeEvent) + 'static) -> ListenerId {
        self.shared.listeners.add(listener)
    }

    pub fn on_shake_start(&self, listener: impl Fn() + 'static) -> ListenerId {
        self.add_listener(move |event| {
            if *event == ShakeEvent::Start {
                listener();
            }
        })
    }

    pub fn on_shake_end(&self, listener: impl Fn() + 'static) -> ListenerId {
        self.add_listener(move |event| {
            if *event == ShakeEvent::End {
                listener();
            }
        })
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }
}

#[cfg(test)]
#[path = "tests/detector_tests.rs"]
mod tests;
