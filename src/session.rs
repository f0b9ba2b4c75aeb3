//! The practice session state machine.
//!
//! One character is active at a time. Every transition runs to completion in
//! reaction to a single event (key press, widget event, lookup response), so
//! the progress store needs no locking.

use tracing::{debug, info};

use crate::celebration::{Burst, Celebrate};
use crate::character::Kanji;
use crate::error::SessionError;
use crate::lookup::{LookupTicket, MetadataResponse, MetadataSource};
use crate::metadata::{KanjiInfo, MetadataOverrides, MetadataView};
use crate::progress::{Progress, ProgressStore, SetSelector, Status, INCORRECT_SET_LABEL};
use crate::reward::{RewardAssets, RewardImage};
use crate::storage::KeyValueStore;
use crate::widget::{StrokeWidget, WidgetEvent, WidgetEventKind, WidgetOptions};

/// Monotonic load counter. Widget events and lookup responses carry the
/// generation they were issued for; anything older than the current one is
/// stale and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Loaded,
    Demonstrating,
    Quizzing,
    Rewarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Action {
    #[strum(serialize = "show demo")]
    ShowDemo,
    #[strum(serialize = "start quiz")]
    StartQuiz,
    #[strum(serialize = "dismiss reward")]
    DismissReward,
}

/// Overlay content after a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub kanji: Kanji,
    pub image: RewardImage,
    pub mistakes: u32,
}

/// Derived view over the selected set, recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub selector: SetSelector,
    pub title: String,
    pub entries: Vec<(Kanji, Status)>,
    pub progress: Progress,
}

pub struct SessionBuilder<S: KeyValueStore, W: StrokeWidget, M: MetadataSource, C: Celebrate> {
    store: ProgressStore<S>,
    widget: W,
    metadata: M,
    celebration: C,
    overrides: MetadataOverrides,
    options: WidgetOptions,
    rewards: RewardAssets,
    burst: Burst,
    selector: SetSelector,
}

impl<S: KeyValueStore, W: StrokeWidget, M: MetadataSource, C: Celebrate> SessionBuilder<S, W, M, C> {
    pub fn with_overrides(mut self, overrides: MetadataOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_options(mut self, options: WidgetOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardAssets) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_burst(mut self, burst: Burst) -> Self {
        self.burst = burst;
        self
    }

    pub fn with_selector(mut self, selector: SetSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Build the controller with `initial` loaded into the widget.
    pub fn start(self, initial: Kanji) -> SessionController<S, W, M, C> {
        let mut controller = SessionController {
            store: self.store,
            widget: self.widget,
            metadata: self.metadata,
            celebration: self.celebration,
            overrides: self.overrides,
            options: self.options,
            rewards: self.rewards,
            burst: self.burst,
            selector: self.selector,
            active: initial,
            phase: Phase::Loaded,
            generation: Generation::default(),
            info: MetadataView::Pending,
            attempt_mistakes: 0,
            reward: None,
        };
        controller.load(initial);
        controller
    }
}

pub struct SessionController<S: KeyValueStore, W: StrokeWidget, M: MetadataSource, C: Celebrate>
{
    store: ProgressStore<S>,
    widget: W,
    metadata: M,
    celebration: C,
    overrides: MetadataOverrides,
    options: WidgetOptions,
    rewards: RewardAssets,
    burst: Burst,
    selector: SetSelector,
    active: Kanji,
    phase: Phase,
    generation: Generation,
    info: MetadataView,
    attempt_mistakes: u32,
    reward: Option<Reward>,
}

impl<S: KeyValueStore, W: StrokeWidget, M: MetadataSource, C: Celebrate> SessionController<S, W, M, C> {
    pub fn builder(
        store: ProgressStore<S>,
        widget: W,
        metadata: M,
        celebration: C,
    ) -> SessionBuilder<S, W, M, C> {
        let selector = store
            .curriculum()
            .names()
            .next()
            .map(SetSelector::named)
            .unwrap_or(SetSelector::Incorrect);
        SessionBuilder {
            store,
            widget,
            metadata,
            celebration,
            overrides: MetadataOverrides::default(),
            options: WidgetOptions::default(),
            rewards: RewardAssets::default(),
            burst: Burst::default(),
            selector,
        }
    }

    /// Select a character. Anything outside the supported range is ignored
    /// and leaves the session untouched.
    pub fn select(&mut self, c: char) -> bool {
        match Kanji::new(c) {
            Some(kanji) => {
                self.select_kanji(kanji);
                true
            }
            None => {
                debug!("ignoring unsupported selection {c:?}");
                false
            }
        }
    }

    pub fn select_kanji(&mut self, kanji: Kanji) {
        if self.phase == Phase::Quizzing {
            debug!(
                "abandoning quiz on {} after {} mistakes",
                self.active, self.attempt_mistakes
            );
        }
        info!("selected {kanji}");
        self.load(kanji);
    }

    pub fn select_set(&mut self, selector: SetSelector) {
        debug!("showing set {selector}");
        self.selector = selector;
    }

    pub fn show_demo(&mut self) -> Result<(), SessionError> {
        self.ensure_not_rewarding(Action::ShowDemo)?;
        self.attempt_mistakes = 0;
        self.widget.animate();
        self.phase = Phase::Demonstrating;
        Ok(())
    }

    pub fn start_quiz(&mut self) -> Result<(), SessionError> {
        self.ensure_not_rewarding(Action::StartQuiz)?;
        self.attempt_mistakes = 0;
        self.widget.quiz();
        self.phase = Phase::Quizzing;
        Ok(())
    }

    pub fn dismiss_reward(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Rewarding {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action: Action::DismissReward,
            });
        }
        self.reward = None;
        self.phase = Phase::Loaded;
        Ok(())
    }

    pub fn on_widget_event(&mut self, event: WidgetEvent) {
        if event.generation != self.generation {
            debug!("dropping {:?} from a torn-down widget", event.kind);
            return;
        }

        match (self.phase, event.kind) {
            (Phase::Demonstrating, WidgetEventKind::AnimationEnd) => {
                self.phase = Phase::Loaded;
            }
            (Phase::Quizzing, WidgetEventKind::Mistake) => {
                self.attempt_mistakes += 1;
                self.store.record_mistake(self.active);
            }
            (Phase::Quizzing, WidgetEventKind::Complete) => self.complete(),
            (phase, kind) => debug!("ignoring {kind:?} while {phase}"),
        }
    }

    pub fn on_metadata(&mut self, response: MetadataResponse) {
        let ticket = response.ticket;
        if ticket.generation != self.generation || ticket.kanji != self.active {
            debug!("dropping stale lookup for {}", ticket.kanji);
            return;
        }
        self.info = MetadataView::Ready(KanjiInfo::from_lookup(response.result));
    }

    pub fn view(&self) -> SessionView {
        let active = self.store.active_list(&self.selector);
        let state = self.store.state();
        let title = match &self.selector {
            SetSelector::Incorrect => INCORRECT_SET_LABEL.to_string(),
            SetSelector::Named(name) => name.clone(),
        };
        SessionView {
            progress: crate::progress::compute_progress(&active, state),
            entries: active.iter().map(|k| (*k, state.status(*k))).collect(),
            selector: self.selector.clone(),
            title,
        }
    }

    pub fn active(&self) -> Kanji {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn info(&self) -> &MetadataView {
        &self.info
    }

    pub fn reward(&self) -> Option<&Reward> {
        self.reward.as_ref()
    }

    pub fn selector(&self) -> &SetSelector {
        &self.selector
    }

    pub fn attempt_mistakes(&self) -> u32 {
        self.attempt_mistakes
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn celebration(&self) -> &C {
        &self.celebration
    }

    pub fn celebration_mut(&mut self) -> &mut C {
        &mut self.celebration
    }

    fn load(&mut self, kanji: Kanji) {
        self.generation = self.generation.next();
        self.active = kanji;
        self.attempt_mistakes = 0;
        self.reward = None;

        self.widget.create(self.generation, kanji, &self.options);
        self.widget.animate();
        self.phase = Phase::Demonstrating;

        match self.overrides.get(kanji) {
            Some(info) => self.info = MetadataView::Ready(info.clone()),
            None => {
                self.info = MetadataView::Pending;
                self.metadata.request(LookupTicket {
                    generation: self.generation,
                    kanji,
                });
            }
        }
    }

    fn complete(&mut self) {
        let kanji = self.active;
        self.store.record_completion(kanji);
        self.celebration.fire(self.burst);
        let image = self.rewards.image_for(kanji);
        info!(
            "completed {kanji} with {} mistakes, reward {image}",
            self.attempt_mistakes
        );
        self.reward = Some(Reward {
            kanji,
            image,
            mistakes: self.attempt_mistakes,
        });
        self.phase = Phase::Rewarding;
    }

    fn ensure_not_rewarding(&self, action: Action) -> Result<(), SessionError> {
        if self.phase == Phase::Rewarding {
            return Err(SessionError::InvalidTransition {
                phase: self.phase,
                action,
            });
        }
        Ok(())
    }
}
