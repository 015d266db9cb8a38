mod common;

use std::error::Error;

use arbdeploy::deploy::transfer::collect_payload;
use arbdeploy::deploy::{Deployment, ServiceState};
use arbdeploy::errors::DeployError;

use common::{FakeRemote, RemoteCall};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn missing_required_file_aborts_without_uploading() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let mut cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);

    cfg.payload.files.push("missing_module.py".to_string());

    let fake = FakeRemote::new();
    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let err = deployment.run().await.unwrap_err();

    match err {
        DeployError::MissingPayload(path) => {
            assert!(path.ends_with("missing_module.py"));
        }
        other => panic!("expected MissingPayload, got {other:?}"),
    }

    // The local check runs before the copy: no upload may have happened.
    assert_eq!(fake.call_names(), vec!["create-remote-dir"]);

    Ok(())
}

#[test]
fn collect_payload_rejects_missing_required_file() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    // Only stage the first file; the rest are missing.
    std::fs::write(tmp.path().join("run.py"), b"x\n")?;

    let err = collect_payload(tmp.path(), &cfg.payload).unwrap_err();
    assert!(matches!(err, DeployError::MissingPayload(_)));

    Ok(())
}

#[tokio::test]
async fn missing_secrets_continues_to_health_check() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, false);

    let fake = FakeRemote::new();
    fake.set_output("query-service-state", 0, "active\n");

    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let report = deployment.run().await?;

    assert!(!report.secrets_included);
    assert_eq!(report.health, ServiceState::Active);
    // The run must still have gone all the way to the state query.
    assert_eq!(fake.call_names(), common::healthy_sequence());

    Ok(())
}

#[tokio::test]
async fn secrets_file_is_included_when_present() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let cfg = common::minimal_config();
    common::stage_payload(tmp.path(), &cfg, true);

    let fake = FakeRemote::new();
    fake.set_output("query-service-state", 0, "active\n");

    let target = common::test_target(&cfg);
    let deployment = Deployment::new(&fake, &cfg, &target, tmp.path().to_path_buf());
    let report = deployment.run().await?;
    assert!(report.secrets_included);

    let calls = fake.calls();
    let upload = calls
        .iter()
        .find_map(|c| match c {
            RemoteCall::Upload { sources, dest } => Some((sources.clone(), dest.clone())),
            _ => None,
        })
        .expect("no upload recorded");

    let (sources, dest) = upload;
    assert_eq!(dest, cfg.remote.dir);
    // One batched copy: required files plus the secrets file at the end.
    assert_eq!(sources.len(), cfg.payload.files.len() + 1);
    assert!(sources.last().unwrap().ends_with(".env"));

    Ok(())
}
