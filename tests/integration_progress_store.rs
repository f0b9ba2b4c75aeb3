use hitsujun::character::Kanji;
use hitsujun::curriculum::Curriculum;
use hitsujun::progress::{
    ProgressStore, ResetScope, SetSelector, Status, INCORRECT_KEY, MASTERED_KEY,
};
use hitsujun::storage::{KeyValueStore, SqliteStore};
use tempfile::tempdir;

fn k(c: char) -> Kanji {
    Kanji::new(c).unwrap()
}

fn open(path: &std::path::Path) -> ProgressStore<SqliteStore> {
    ProgressStore::load(
        Curriculum::embedded().unwrap(),
        SqliteStore::open(path).unwrap(),
    )
}

#[test]
fn progress_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.db");

    {
        let mut store = open(&path);
        store.record_mistake(k('山'));
        store.record_mistake(k('川'));
        store.record_completion(k('山'));
        store.record_completion(k('一'));
    }

    let store = open(&path);
    assert_eq!(store.state().mastered(), &[k('山'), k('一')]);
    assert_eq!(store.incorrect_list(), &[k('川')]);
    assert_eq!(store.state().status(k('川')), Status::Incorrect);

    let grade1 = store.compute_progress(&SetSelector::named("小1"));
    assert_eq!((grade1.mastered, grade1.total), (2, 80));
    assert_eq!(grade1.percent, 3);
}

#[test]
fn corrupt_rows_load_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.db");
    {
        let mut backend = SqliteStore::open(&path).unwrap();
        backend.set(MASTERED_KEY, "not json").unwrap();
        backend.set(INCORRECT_KEY, r#"["山","ab","x",""]"#).unwrap();
    }

    let store = open(&path);
    assert!(store.state().mastered().is_empty());
    assert_eq!(store.incorrect_list(), &[k('山')]);
}

#[test]
fn reset_clears_persisted_lists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.db");
    {
        let mut store = open(&path);
        store.record_mistake(k('木'));
        store.record_completion(k('水'));
        store.reset(ResetScope::Incorrect);
    }
    {
        let mut store = open(&path);
        assert!(store.incorrect_list().is_empty());
        assert!(store.is_mastered(k('水')));
        store.reset(ResetScope::All);
    }

    let store = open(&path);
    assert!(store.state().mastered().is_empty());
    assert_eq!(store.backend().get(MASTERED_KEY).unwrap().as_deref(), Some("[]"));
}
