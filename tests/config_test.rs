use linepool::config::Config;
use linepool::model::Mode;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

// Environment variables are process-wide; tests touching them run one at a time.
static ENV: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "LINEPOOL_INPUT",
    "LINEPOOL_OUTPUT",
    "LINEPOOL_WORKERS",
    "LINEPOOL_JITTER_MS",
    "LINEPOOL_SEED",
    "LOG_LEVEL",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[test]
fn defaults_match_the_classic_job() {
    let config = Config::default();
    assert_eq!(config.input, PathBuf::from("linepool.data"));
    assert_eq!(config.workers, 10);
    assert_eq!(config.jitter(), Duration::from_secs(1));
    assert!(config.seed.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn output_is_derived_from_mode_unless_set() {
    let mut config = Config::default();
    assert_eq!(
        config.output_for(Mode::Guarded),
        PathBuf::from("linepool.mutex")
    );
    assert_eq!(
        config.output_for(Mode::Unguarded),
        PathBuf::from("linepool.nomutex")
    );

    config.output = Some(PathBuf::from("custom.out"));
    assert_eq!(config.output_for(Mode::Guarded), PathBuf::from("custom.out"));
}

#[test]
fn zero_workers_is_rejected() {
    let config = Config {
        workers: 0,
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("worker count"), "{err}");
}

#[test]
fn from_env_overlays_defaults() {
    let _env = ENV.lock().unwrap();
    clear_env();
    unsafe {
        std::env::set_var("LINEPOOL_INPUT", "words.txt");
        std::env::set_var("LINEPOOL_WORKERS", "3");
        std::env::set_var("LINEPOOL_JITTER_MS", "0");
        std::env::set_var("LINEPOOL_SEED", "99");
        std::env::set_var("LOG_LEVEL", "debug");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.input, PathBuf::from("words.txt"));
    assert_eq!(config.workers, 3);
    assert_eq!(config.jitter_ms, 0);
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.log_level, "debug");
    assert!(config.output.is_none());

    clear_env();
}

#[test]
fn from_env_fails_on_unparseable_value() {
    let _env = ENV.lock().unwrap();
    clear_env();
    unsafe {
        std::env::set_var("LINEPOOL_WORKERS", "ten");
    }

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("LINEPOOL_WORKERS"), "{err}");

    clear_env();
}

#[test]
fn from_file_keeps_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linepool.toml");
    std::fs::write(&path, "workers = 4\njitter_ms = 5\noutput = \"out.txt\"\n").unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.workers, 4);
    assert_eq!(config.jitter_ms, 5);
    assert_eq!(config.output, Some(PathBuf::from("out.txt")));
    assert_eq!(config.input, PathBuf::from("linepool.data"));
}

#[test]
fn from_file_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linepool.toml");
    std::fs::write(&path, "threads = 4\n").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn env_wins_over_file() {
    let _env = ENV.lock().unwrap();
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linepool.toml");
    std::fs::write(&path, "workers = 4\n").unwrap();
    unsafe {
        std::env::set_var("LINEPOOL_WORKERS", "2");
    }

    let config = Config::from_file(&path).unwrap().with_env().unwrap();
    assert_eq!(config.workers, 2);

    clear_env();
}
