//! Collection behavior: module filtering, partial-failure policy, mailbox
//! snapshot.

#![allow(clippy::expect_used)]

use std::collections::HashMap;

use shipit_cli::collect;
use shipit_cli::config::ModuleSpec;
use shipit_cli::output::OutputContext;
use shipit_cli::staging::StagingArea;

use crate::mocks::CannedTransport;

fn quiet_ctx() -> OutputContext {
    OutputContext::new(true, true)
}

fn orc_transport() -> CannedTransport {
    let mut dirs = HashMap::new();
    dirs.insert(
        "ORC".to_string(),
        vec!["/tmp/applications/ORC_17".to_string()],
    );
    let mut files = HashMap::new();
    files.insert(
        "/tmp/applications/ORC_17".to_string(),
        vec![
            "/tmp/applications/ORC_17/te_a.ship".to_string(),
            "/tmp/applications/ORC_17/te_b.ship".to_string(),
        ],
    );
    CannedTransport {
        dirs,
        files,
        ..CannedTransport::default()
    }
}

#[tokio::test]
async fn module_with_no_directory_is_skipped_not_fatal() {
    let transport = orc_transport();
    let staging = StagingArea::create().expect("staging");
    let modules = ModuleSpec::parse("NOSUCH,ORC").expect("parse");

    let files = collect::collect(&transport, &modules, &staging, &quiet_ctx())
        .await
        .expect("run continues past the missing module");

    // nothing for NOSUCH, both ship files for ORC
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.remote_path.contains("ORC_17")));
}

#[tokio::test]
async fn module_directory_without_ship_files_is_skipped_not_fatal() {
    // EMPTY resolves to a directory holding no .ship files; the run must
    // warn, skip it, and still collect everything ORC has.
    let mut transport = orc_transport();
    transport.dirs.insert(
        "EMPTY".to_string(),
        vec!["/tmp/applications/EMPTY_3".to_string()],
    );
    let staging = StagingArea::create().expect("staging");
    let modules = ModuleSpec::parse("EMPTY,ORC").expect("parse");

    let files = collect::collect(&transport, &modules, &staging, &quiet_ctx())
        .await
        .expect("run continues past the empty directory");

    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.remote_path.contains("ORC_17")));
}

#[tokio::test]
async fn all_modules_missing_yields_empty_collection() {
    let transport = CannedTransport::default();
    let staging = StagingArea::create().expect("staging");
    let modules = ModuleSpec::parse("AAA,BBB").expect("parse");

    let files = collect::collect(&transport, &modules, &staging, &quiet_ctx())
        .await
        .expect("skips are not errors");
    assert!(files.is_empty());
}

#[tokio::test]
async fn fetch_failure_for_a_discovered_file_aborts() {
    let mut transport = orc_transport();
    transport
        .failing
        .push("/tmp/applications/ORC_17/te_b.ship".to_string());
    let staging = StagingArea::create().expect("staging");
    let modules = ModuleSpec::parse("ORC").expect("parse");

    let err = collect::collect(&transport, &modules, &staging, &quiet_ctx())
        .await
        .expect_err("discovered files must fetch");
    assert!(err.to_string().contains("te_b.ship"));
}

#[tokio::test]
async fn empty_module_spec_takes_the_default_location() {
    let transport = CannedTransport {
        default_files: vec!["/tmp/te_1.whip".to_string(), "/tmp/te_2.whip".to_string()],
        ..CannedTransport::default()
    };
    let staging = StagingArea::create().expect("staging");

    let files = collect::collect(&transport, &ModuleSpec::none(), &staging, &quiet_ctx())
        .await
        .expect("collect");
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f.local_path.starts_with(staging.root())));
}

#[tokio::test]
async fn mailbox_snapshot_is_staged() {
    let transport = CannedTransport {
        command_output: "  Id   Name\n  1    te_mbox\n".to_string(),
        ..CannedTransport::default()
    };
    let staging = StagingArea::create().expect("staging");

    let snapshot = collect::snapshot_mailboxes(&transport, &staging)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.local_path, staging.join(collect::MAILBOX_FILE));
    let text = std::fs::read_to_string(&snapshot.local_path).expect("read");
    assert!(text.contains("te_mbox"));
}
