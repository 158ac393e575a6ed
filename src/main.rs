use std::collections::BTreeSet;
use std::sync::Arc;

use physicode::config::Config;
use physicode::content::ContentStore;
use physicode::engine::chain;
use physicode::gamification::display;
use physicode::gamification::profile::ProfileTracker;
use physicode::logging::init_tracing;
use physicode::store::Store;

fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&config.log_config());
    tracing::info!("Starting physicode");

    let store = Arc::new(Store::open(&config.sled_path).expect("Failed to open sled database"));
    store.run_migrations().expect("Failed to run migrations");

    let content = match &config.content_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading lesson pack");
            ContentStore::from_path(path)
        }
        None => ContentStore::bundled(),
    }
    .expect("Failed to load lessons");

    audit_content(&content);
    report_profile(&store, &config);

    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush store");
    }
    tracing::info!("Done");
}

fn audit_content(content: &ContentStore) {
    tracing::info!(lessons = content.len(), "Lesson pack ready");

    let mut seen = BTreeSet::new();
    for head in content.heads() {
        if !seen.insert(head.group_key()) {
            continue;
        }
        let position = chain::resolve(content, &head.id);
        tracing::info!(
            group = %head.group_key(),
            head = %head.id,
            lessons = position.len(),
            chain = ?position.chain,
            "Chain"
        );
    }

    let issues = content.audit();
    if issues.is_empty() {
        tracing::info!("No content issues");
    }
    for issue in issues {
        tracing::warn!(?issue, "Content issue");
    }
}

fn report_profile(store: &Arc<Store>, config: &Config) {
    let tracker = ProfileTracker::load(store.clone());
    let profile = tracker.profile();
    let progress = profile.next_level_progress();
    tracing::info!(
        xp = profile.xp(),
        gems = profile.gems(),
        level = profile.level(),
        into_level = progress.current,
        best_streak = profile.stats().best_streak,
        achievements = profile.achievements().len(),
        "Gamification profile"
    );

    match display::overview(store, &config.default_display_name) {
        Ok(overview) => tracing::info!(
            name = %overview.profile.name,
            avatar = %overview.avatar_source,
            level = overview.level,
            xp = overview.xp,
            completed = overview.completed,
            milestones = overview.milestones.len(),
            "Profile overview"
        ),
        Err(e) => tracing::error!(error = %e, "Failed to build profile overview"),
    }

    match store.get_selected_subject() {
        Ok(Some(subject)) => tracing::info!(subject = %subject, "Selected subject"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read selected subject"),
    }
}
