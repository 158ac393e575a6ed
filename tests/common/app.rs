use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use physicode::config::Config;
use physicode::content::ContentStore;
use physicode::engine::LessonPlayer;
use physicode::store::Store;

pub struct TestPlayer {
    pub player: LessonPlayer,
    pub store: Arc<Store>,
    pub content: Arc<ContentStore>,
    pub config: Config,
    _temp_dir: TempDir,
}

impl TestPlayer {
    /// A second player over the same database, as after a restart.
    pub fn restart(&self) -> LessonPlayer {
        LessonPlayer::new(self.content.clone(), self.store.clone())
    }
}

fn test_config(sled_path: PathBuf) -> Config {
    // 直接构造 Config，避免 set_var 在并行测试中互相干扰
    Config {
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        max_log_files: 1,
        sled_path: sled_path.to_string_lossy().to_string(),
        content_path: None,
        default_display_name: "Estudiante de Física".to_string(),
    }
}

pub fn spawn_with_content(content: ContentStore) -> TestPlayer {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(temp_dir.path().join("physicode-test.sled"));

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let content = Arc::new(content);
    let player = LessonPlayer::new(content.clone(), store.clone());

    TestPlayer {
        player,
        store,
        content,
        config,
        _temp_dir: temp_dir,
    }
}

pub fn spawn_test_player() -> TestPlayer {
    spawn_with_content(ContentStore::bundled().expect("bundled lessons"))
}
