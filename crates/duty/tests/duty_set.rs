//! Duty set derivation, metadata queries, params and genesis.

use assert_matches::assert_matches;
use duty::{
    DutyConfig, DutyError, DutyMetadata, DutyModule, DutySet, ExecutionContext, GenesisState, MemoryStore,
    MsgSetMetadata, Params, VerificationMode,
};
use duty_testkit::{test_validator, DutyHarness, FakeValidatorSet};
use std::io::Write;
use std::sync::Arc;

#[tokio::test]
async fn empty_roster_yields_empty_duty_set() {
    let harness = DutyHarness::accepting();

    let duty_set = harness.module.view().get_duty_set().await.unwrap();
    assert!(duty_set.validators.is_empty());
    assert_eq!(duty_set.params, Params::new(2, 3));
}

#[tokio::test]
async fn duty_set_follows_roster_order_exactly() {
    let harness = DutyHarness::accepting();
    // Host order deliberately not sorted by any rule this module knows
    let roster = vec![
        test_validator("carol", 500),
        test_validator("alice", 500),
        test_validator("bob", 20),
    ];
    let expected: Vec<_> = roster.iter().map(|v| v.consensus_identity()).collect();
    harness.validators.replace_roster(roster).await;

    let duty_set = harness.module.view().get_duty_set().await.unwrap();
    let actual: Vec<_> = duty_set
        .validators
        .iter()
        .map(|v| v.consensus_identity)
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(duty_set.validators[0].voting_power, "500");
    assert_eq!(duty_set.validators[2].voting_power, "20");
}

#[tokio::test]
async fn unbound_validators_have_no_metadata() {
    let harness = DutyHarness::accepting();
    harness.validators.add(test_validator("val1", 300)).await;
    harness.validators.add(test_validator("val2", 200)).await;
    harness
        .module
        .authority()
        .set_metadata(
            ExecutionContext::at_height(1),
            MsgSetMetadata::new("val2", "0xabc", "s3://b/p"),
        )
        .await
        .unwrap();

    let duty_set = harness.module.view().get_duty_set().await.unwrap();
    assert_eq!(duty_set.validators.len(), 2);
    assert_eq!(duty_set.validators[0].metadata, None);
    assert_eq!(
        duty_set.validators[1].metadata,
        Some(DutyMetadata::new("0xabc", "s3://b/p"))
    );
}

#[tokio::test]
async fn serialized_identity_feeds_metadata_query() {
    let harness = DutyHarness::accepting();
    harness.validators.add(test_validator("val1", 300)).await;
    harness
        .module
        .authority()
        .set_metadata(
            ExecutionContext::at_height(1),
            MsgSetMetadata::new("val1", "0xabc", "s3://b/p"),
        )
        .await
        .unwrap();

    let duty_set = harness.module.view().get_duty_set().await.unwrap();
    let json = serde_json::to_value(&duty_set.validators[0]).unwrap();
    let identity = json["consensus_identity"].as_str().unwrap();
    assert_eq!(identity, duty_set.validators[0].consensus_identity.to_hex());

    assert_eq!(
        harness.module.view().get_metadata(identity).await.unwrap(),
        Some(DutyMetadata::new("0xabc", "s3://b/p"))
    );

    let decoded: DutySet = serde_json::from_value(serde_json::to_value(&duty_set).unwrap()).unwrap();
    assert_eq!(decoded, duty_set);
}

#[tokio::test]
async fn duty_set_reflects_param_updates() {
    let harness = DutyHarness::accepting();
    harness.module.set_params(Params::new(3, 4)).await.unwrap();

    let duty_set = harness.module.view().get_duty_set().await.unwrap();
    assert_eq!(duty_set.params, Params::new(3, 4));
    assert_eq!(harness.module.view().params().await.unwrap(), Params::new(3, 4));
}

#[tokio::test]
async fn invalid_params_are_rejected_and_not_stored() {
    let harness = DutyHarness::accepting();
    for (n, d) in [(0, 3), (2, 0), (4, 3)] {
        let err = harness.module.set_params(Params::new(n, d)).await.unwrap_err();
        assert_eq!(err, DutyError::invalid_params(n, d));
    }
    assert!(harness.store.is_empty().await);
    assert_eq!(harness.module.view().params().await.unwrap(), Params::default());
}

#[tokio::test]
async fn metadata_query_parses_identity() {
    let harness = DutyHarness::accepting();
    let val1 = test_validator("val1", 100);
    let c1 = val1.consensus_identity();
    harness.validators.add(val1).await;
    harness
        .module
        .authority()
        .set_metadata(
            ExecutionContext::at_height(1),
            MsgSetMetadata::new("val1", "0xabc", "s3://b/p"),
        )
        .await
        .unwrap();
    let view = harness.module.view();

    assert_eq!(
        view.get_metadata(&c1.to_hex()).await.unwrap(),
        Some(DutyMetadata::new("0xabc", "s3://b/p"))
    );
    assert_eq!(
        view.get_metadata(&format!("0x{c1}")).await.unwrap(),
        Some(DutyMetadata::new("0xabc", "s3://b/p"))
    );

    let unbound = test_validator("nobody", 1).consensus_identity();
    assert_eq!(view.get_metadata(&unbound.to_hex()).await.unwrap(), None);

    assert_matches!(
        view.get_metadata("not-an-identity").await,
        Err(DutyError::InvalidIdentity { .. })
    );
    assert_matches!(view.get_metadata("abcd").await, Err(DutyError::InvalidIdentity { .. }));
}

#[tokio::test]
async fn roster_failure_propagates_from_duty_set() {
    let harness = DutyHarness::accepting();
    harness.validators.set_failing(true);

    let err = harness.module.view().get_duty_set().await.unwrap_err();
    assert!(err.is_infrastructure());
}

#[tokio::test]
async fn genesis_roundtrip() {
    let harness = DutyHarness::accepting();
    assert_eq!(
        harness.module.export_genesis().await.unwrap(),
        GenesisState::default()
    );

    harness
        .module
        .init_genesis(&GenesisState::new(Params::new(1, 2)))
        .await
        .unwrap();
    assert_eq!(
        harness.module.export_genesis().await.unwrap(),
        GenesisState::new(Params::new(1, 2))
    );

    let err = harness
        .module
        .init_genesis(&GenesisState::new(Params::new(3, 2)))
        .await
        .unwrap_err();
    assert_eq!(err, DutyError::invalid_params(3, 2));
    assert_eq!(
        harness.module.export_genesis().await.unwrap().params,
        Params::new(1, 2)
    );
}

#[tokio::test]
async fn module_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "verification = \"ed25519\"\n\n[genesis.params]\nquorum_numerator = 5\nquorum_denominator = 8"
    )
    .unwrap();

    let config = DutyConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.verification, VerificationMode::Ed25519);

    let module = DutyModule::from_config(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(FakeValidatorSet::new()),
    )
    .unwrap();
    module.init_genesis(&config.genesis).await.unwrap();
    assert_eq!(module.view().params().await.unwrap(), Params::new(5, 8));
}

#[test]
fn invalid_config_is_refused() {
    let config = DutyConfig {
        genesis: GenesisState::new(Params::new(0, 1)),
        verification: VerificationMode::Reject,
    };
    let result = DutyModule::from_config(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(FakeValidatorSet::new()),
    );
    assert_matches!(result, Err(DutyError::InvalidParams { .. }));
}

#[test]
fn missing_config_file_is_config_error() {
    let err = DutyConfig::load_from_file(std::path::Path::new("/nonexistent/duty.toml")).unwrap_err();
    assert_matches!(err, DutyError::Config { .. });
}
