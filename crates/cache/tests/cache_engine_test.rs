use nodekit_cache::{CacheEngine, CacheMode, cache_item};
use starbase_sandbox::create_empty_sandbox;

cache_item!(
    pub struct TestState {
        pub hash: String,
        pub runs: u32,
    }
);

#[test]
fn creates_dirs_and_tag() {
    let sandbox = create_empty_sandbox();
    let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

    assert!(engine.states_dir.exists());
    assert!(engine.cache_dir.join("CACHEDIR.TAG").exists());
    assert_eq!(engine.cache_dir, sandbox.path().join(".nodekit/cache"));
}

#[test]
fn encodes_state_paths() {
    let sandbox = create_empty_sandbox();
    let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

    assert_eq!(
        engine.get_state_path("packager:install"),
        engine.states_dir.join("packager-install.json")
    );
}

#[test]
fn round_trips_state() {
    let sandbox = create_empty_sandbox();
    let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

    let mut item = engine.cache_state::<TestState>("install").unwrap();

    assert_eq!(item.data, TestState::default());

    item.data.hash = "abc".into();
    item.data.runs = 2;
    item.save().unwrap();

    let item = engine.cache_state::<TestState>("install").unwrap();

    assert_eq!(item.data.hash, "abc");
    assert_eq!(item.data.runs, 2);
}

#[test]
fn write_state_is_read_back() {
    let sandbox = create_empty_sandbox();
    let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

    engine
        .write_state(
            "setup",
            &TestState {
                hash: "xyz".into(),
                runs: 1,
            },
        )
        .unwrap();

    assert_eq!(
        engine.cache_state::<TestState>("setup").unwrap().data.hash,
        "xyz"
    );
}

#[test]
fn ignores_corrupt_state() {
    let sandbox = create_empty_sandbox();
    let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

    std::fs::write(engine.get_state_path("broken"), "{ not json").unwrap();

    assert_eq!(
        engine.cache_state::<TestState>("broken").unwrap().data,
        TestState::default()
    );
}

mod modes {
    use super::*;

    #[test]
    fn off_neither_reads_nor_writes() {
        let sandbox = create_empty_sandbox();
        let writer = CacheEngine::with_mode(sandbox.path(), CacheMode::ReadWrite).unwrap();

        writer
            .write_state("a", &TestState { hash: "1".into(), runs: 1 })
            .unwrap();

        let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::Off).unwrap();

        assert_eq!(engine.cache_state::<TestState>("a").unwrap().data.hash, "");

        engine
            .write_state("b", &TestState { hash: "2".into(), runs: 1 })
            .unwrap();

        assert!(!engine.get_state_path("b").exists());
    }

    #[test]
    fn write_only_skips_reads() {
        let sandbox = create_empty_sandbox();
        let engine = CacheEngine::with_mode(sandbox.path(), CacheMode::Write).unwrap();

        engine
            .write_state("a", &TestState { hash: "1".into(), runs: 1 })
            .unwrap();

        assert!(engine.get_state_path("a").exists());
        assert_eq!(engine.cache_state::<TestState>("a").unwrap().data.hash, "");
    }

    #[test]
    #[serial_test::serial]
    fn reads_mode_from_env() {
        unsafe { std::env::set_var("NODEKIT_CACHE", "read") };

        assert_eq!(CacheMode::from_env(), CacheMode::Read);

        unsafe { std::env::remove_var("NODEKIT_CACHE") };

        assert_eq!(CacheMode::from_env(), CacheMode::ReadWrite);
    }
}
