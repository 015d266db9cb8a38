mod common;

use std::error::Error;

use arbdeploy::deploy::{Deployment, ServiceState};
use arbdeploy::errors::DeployError;

use common::FakeRemote;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn full_run_executes_stages_in_fixed_order() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);

    let fake = FakeRemote::new();
    fake.set_output("query-service-state", 0, "active\n");

    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let report = deployment.run().await?;

    assert_eq!(report.health, ServiceState::Active);
    assert!(report.secrets_included);
    assert_eq!(fake.call_names(), common::healthy_sequence());

    Ok(())
}

#[tokio::test]
async fn dependency_failure_halts_all_later_stages() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);

    let fake = FakeRemote::new();
    fake.set_output("install-dependencies", 1, "");

    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let err = deployment.run().await.unwrap_err();

    assert!(matches!(
        err,
        DeployError::RemoteCommand { status: 1, ref label } if label == "install-dependencies"
    ));

    // Fail-fast: nothing after the failed stage may have executed.
    assert_eq!(
        fake.call_names(),
        vec!["create-remote-dir", "upload", "install-dependencies"]
    );

    Ok(())
}

#[tokio::test]
async fn directory_creation_failure_aborts_before_upload() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);

    let fake = FakeRemote::new();
    fake.set_output("create-remote-dir", 255, "");

    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let err = deployment.run().await.unwrap_err();

    assert!(matches!(err, DeployError::RemoteCommand { status: 255, .. }));
    assert_eq!(fake.call_names(), vec!["create-remote-dir"]);

    Ok(())
}

#[tokio::test]
async fn second_run_issues_identical_command_sequence() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);
    let target = common::test_target(&cfg);

    let first = FakeRemote::new();
    first.set_output("query-service-state", 0, "active\n");
    Deployment::new(&first, &cfg, &target, tmp.path().to_path_buf())
        .run()
        .await?;

    // Redeploy over the same host: overwrite idempotence means the exact
    // same stages run again, with no diff-based skipping.
    let second = FakeRemote::new();
    second.set_output("query-service-state", 0, "active\n");
    Deployment::new(&second, &cfg, &target, tmp.path().to_path_buf())
        .run()
        .await?;

    assert_eq!(first.calls(), second.calls());

    Ok(())
}
