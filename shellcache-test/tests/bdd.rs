use std::fs::{File, create_dir_all};
use std::io::stdout;
use std::path::{Path, PathBuf};

use cucumber::writer::{Basic, JUnit, Verbosity, basic::Coloring};
use cucumber::{World, WriterExt};
use shellcache_test::world::OfflineWorld;

/// JUnit report next to the workspace build output.
fn junit_report(manifest_dir: &Path) -> File {
    let target_dir = manifest_dir
        .parent()
        .map(|root| root.join("target"))
        .unwrap_or_else(|| manifest_dir.join("target"));
    create_dir_all(&target_dir).expect("Failed to create target directory");
    File::create(target_dir.join("cucumber-offline-junit.xml"))
        .expect("Failed to create JUnit XML file")
}

#[tokio::main]
pub async fn main() {
    shellcache_test::tracing::init();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let report = junit_report(&manifest_dir);

    OfflineWorld::cucumber()
        .max_concurrent_scenarios(None)
        .with_writer(
            Basic::new(stdout(), Coloring::Auto, Verbosity::Default)
                .summarized()
                .tee(JUnit::for_tee(report, 0))
                .normalized(),
        )
        .filter_run(manifest_dir.join("tests/features"), |_, _, scenario| {
            !scenario.tags.iter().any(|tag| tag == "allow.failed")
        })
        .await;
}
