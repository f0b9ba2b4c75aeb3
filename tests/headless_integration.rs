use std::sync::mpsc::{self, Sender};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use hitsujun::app::App;
use hitsujun::board::{TerminalBoard, DEMO_FRAMES};
use hitsujun::celebration::CelebrationAnimation;
use hitsujun::character::Kanji;
use hitsujun::curriculum::Curriculum;
use hitsujun::error::LookupError;
use hitsujun::lookup::{BackgroundLookup, KanjiLookup};
use hitsujun::metadata::{MetadataView, RemoteKanji, NOT_AVAILABLE};
use hitsujun::progress::{ProgressStore, SetSelector, INCORRECT_KEY, MASTERED_KEY};
use hitsujun::reward::RewardAssets;
use hitsujun::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use hitsujun::session::{Phase, SessionController};
use hitsujun::storage::{KeyValueStore, MemoryStore};

/// Answers every lookup with a gloss naming the character; 犬 always fails.
struct CannedLookup;

impl KanjiLookup for CannedLookup {
    fn fetch(&self, kanji: Kanji) -> Result<RemoteKanji, LookupError> {
        if kanji.as_char() == '犬' {
            return Err(LookupError::Status(404));
        }
        Ok(RemoteKanji {
            kun_readings: vec![],
            on_readings: vec!["オン".into()],
            meanings: vec![format!("gloss {kanji}")],
            stroke_count: Some(3),
        })
    }
}

type HeadlessApp = App<MemoryStore, BackgroundLookup<CannedLookup>>;

fn headless_app(tx: Sender<AppEvent>, initial: char) -> HeadlessApp {
    let store = ProgressStore::load(Curriculum::embedded().unwrap(), MemoryStore::new());
    let session = SessionController::builder(
        store,
        TerminalBoard::new(),
        BackgroundLookup::new(CannedLookup, tx),
        CelebrationAnimation::new(),
    )
    .with_rewards(RewardAssets::new("/nonexistent-assets"))
    .start(Kanji::new(initial).unwrap());
    App::new(session)
}

fn key(tx: &Sender<AppEvent>, code: KeyCode) {
    tx.send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

fn runner(rx: mpsc::Receiver<AppEvent>) -> Runner<TestEventSource, FixedTicker> {
    Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    )
}

/// Step until `done` holds, bounded so a broken flow fails instead of hanging.
fn drive(
    app: &mut HeadlessApp,
    runner: &Runner<TestEventSource, FixedTicker>,
    done: impl Fn(&HeadlessApp) -> bool,
) {
    for _ in 0..500u32 {
        if done(app) {
            return;
        }
        app.on_event(runner.step());
    }
    panic!("headless flow did not settle");
}

#[test]
fn headless_practice_flow_completes() {
    let (tx, rx) = mpsc::channel();
    let mut app = headless_app(tx.clone(), '草');
    let runner = runner(rx);

    // the lookup answers through the same channel as the keys
    drive(&mut app, &runner, |app| {
        matches!(app.session.info(), MetadataView::Ready(_))
    });
    let info = app.session.info().info().unwrap();
    assert_eq!(info.meaning, "gloss 草");
    assert_eq!(info.kun, NOT_AVAILABLE);

    drive(&mut app, &runner, |app| app.session.phase() == Phase::Loaded);

    key(&tx, KeyCode::Char('s'));
    key(&tx, KeyCode::Char('x'));
    drive(&mut app, &runner, |app| app.session.attempt_mistakes() == 1);
    assert_eq!(
        app.session.store().backend().get(INCORRECT_KEY).unwrap().as_deref(),
        Some(r#"["草"]"#)
    );

    key(&tx, KeyCode::Char('c'));
    drive(&mut app, &runner, |app| app.session.phase() == Phase::Rewarding);
    let reward = app.session.reward().unwrap();
    assert!(reward.image.is_fallback());
    assert_eq!(reward.mistakes, 1);

    key(&tx, KeyCode::Enter);
    drive(&mut app, &runner, |app| app.session.phase() == Phase::Loaded);

    let store = app.session.store();
    assert_eq!(store.backend().get(INCORRECT_KEY).unwrap().as_deref(), Some("[]"));
    assert_eq!(
        store.backend().get(MASTERED_KEY).unwrap().as_deref(),
        Some(r#"["草"]"#)
    );
}

#[test]
fn headless_stale_lookup_is_discarded() {
    let (tx, rx) = mpsc::channel();
    let mut app = headless_app(tx.clone(), '草');
    let runner = runner(rx);

    app.select(Kanji::new('花').unwrap());
    app.select(Kanji::new('犬').unwrap());

    // three lookups were issued; only the one for 犬 may land
    drive(&mut app, &runner, |app| {
        matches!(app.session.info(), MetadataView::Ready(_))
    });
    for _ in 0..20 {
        app.on_event(runner.step());
    }

    assert_eq!(app.session.active().as_char(), '犬');
    assert_eq!(
        app.session.info().info().map(|i| i.meaning.as_str()),
        Some(NOT_AVAILABLE)
    );
}

#[test]
fn headless_demo_runs_on_ticks() {
    let (tx, rx) = mpsc::channel();
    let mut app = headless_app(tx.clone(), '永');
    let runner = runner(rx);

    // override metadata resolves without a lookup
    assert_eq!(app.session.info().info().map(|i| i.on.as_str()), Some("エイ"));
    assert_eq!(app.session.phase(), Phase::Demonstrating);

    for _ in 0..DEMO_FRAMES {
        app.on_event(runner.step());
    }
    assert_eq!(app.session.phase(), Phase::Loaded);

    key(&tx, KeyCode::Char('d'));
    app.on_event(runner.step());
    assert_eq!(app.session.phase(), Phase::Demonstrating);
}

#[test]
fn headless_incorrect_drill_tracks_mistakes() {
    let (tx, rx) = mpsc::channel();
    let mut app = headless_app(tx.clone(), '一');
    let runner = runner(rx);

    for c in ['一', '二', '三'] {
        app.select(Kanji::new(c).unwrap());
        key(&tx, KeyCode::Char('s'));
        key(&tx, KeyCode::Char('x'));
        drive(&mut app, &runner, |app| app.session.attempt_mistakes() == 1);
    }

    key(&tx, KeyCode::Char('4'));
    drive(&mut app, &runner, |app| {
        app.session.selector() == &SetSelector::Incorrect
    });

    let view = app.session.view();
    assert_eq!(view.progress.total, 3);
    assert_eq!(view.progress.percent, 0);
    assert_eq!(app.kanji_at_cursor().map(Kanji::as_char), Some('一'));

    // completing the drill character removes it from the drill
    key(&tx, KeyCode::Enter);
    key(&tx, KeyCode::Char('s'));
    key(&tx, KeyCode::Char('c'));
    drive(&mut app, &runner, |app| app.session.phase() == Phase::Rewarding);
    assert_eq!(app.session.view().entries.len(), 2);
    assert_eq!(app.session.store().incorrect_list().len(), 2);
}
