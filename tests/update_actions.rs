//! Action-level tests for clone, push, and the values updaters, driven
//! through a recording execution engine.

mod common;

use common::{FakeEngine, seed_values_file};
use gitops_actions::error::Error;
use gitops_actions::git::{GitRepository, PushOptions, SshKey};
use gitops_actions::update::{update_helm_revision, update_image_tag};
use gitops_actions::values::ValuesFile;

fn key() -> SshKey {
    SshKey::from_bytes(b"test-key".to_vec())
}

#[tokio::test]
async fn clone_requires_repo_url() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("", Some(key()));

    let err = repo.clone_ssh(&engine).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(engine.command_count(), 0);
}

#[tokio::test]
async fn clone_requires_ssh_key() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", None);

    let err = repo.clone_ssh(&engine).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(engine.command_count(), 0);
}

#[tokio::test]
async fn clone_runs_git_clone_in_prepared_environment() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));

    repo.clone_ssh(&engine).await.unwrap();

    assert!(engine.ran("git config --global user.name gitops-bot"));
    assert!(engine.ran("push.autoSetupRemote"));
    assert!(engine.ran("git clone git@host:group/app.git ."));
}

#[tokio::test]
async fn push_uses_documented_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));
    let workspace = repo.clone_ssh(&engine).await.unwrap();

    repo.push(&engine, &workspace, PushOptions::default())
        .await
        .unwrap();

    assert!(engine.ran("git add ."));
    assert!(engine.ran("git commit -m autocommit"));
    assert!(engine.ran("git push"));
    // No branch requested, so no switch beyond what clone produced.
    assert!(!engine.ran("git switch"));
}

#[tokio::test]
async fn push_switches_to_requested_branch() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));
    let workspace = repo.clone_ssh(&engine).await.unwrap();

    repo.push(
        &engine,
        &workspace,
        PushOptions {
            branch: Some("feature".to_string()),
            message: Some("bump chart".to_string()),
            ..PushOptions::default()
        },
    )
    .await
    .unwrap();

    assert!(engine.ran("git switch -c feature"));
    assert!(engine.ran("git commit -m bump chart"));
}

#[tokio::test]
async fn push_honors_explicit_empty_message() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));
    let workspace = repo.clone_ssh(&engine).await.unwrap();

    repo.push(
        &engine,
        &workspace,
        PushOptions {
            message: Some(String::new()),
            ..PushOptions::default()
        },
    )
    .await
    .unwrap();

    // The empty string was passed explicitly, so the default must not kick in.
    assert!(!engine.ran("autocommit"));
}

#[tokio::test]
async fn push_with_nothing_to_commit_is_an_execution_error() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::failing_on(dir.path(), "git commit");
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));
    let workspace = repo.clone_ssh(&engine).await.unwrap();

    let err = repo
        .push(&engine, &workspace, PushOptions::default())
        .await
        .unwrap_err();
    match err {
        Error::Execution { reason, .. } => assert!(reason.contains("nothing to commit")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!engine.ran("git push"));
}

#[tokio::test]
async fn helm_update_skips_when_revision_already_deployed() {
    let dir = tempfile::tempdir().unwrap();
    seed_values_file(dir.path(), "1.0.0");
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:ops/deployments.git", Some(key()));

    let updated = update_helm_revision(&engine, &repo, "prod", "1.0.0", None)
        .await
        .unwrap();

    assert!(!updated);
    assert!(!engine.ran("git add"));
    assert!(!engine.ran("git commit"));
    assert!(!engine.ran("git push"));

    let values = ValuesFile::load(dir.path().join("argocd/values.yaml")).unwrap();
    assert_eq!(values.environment_revision("prod").unwrap(), "1.0.0");
}

#[tokio::test]
async fn helm_update_rewrites_and_pushes_on_new_revision() {
    let dir = tempfile::tempdir().unwrap();
    seed_values_file(dir.path(), "1.0.0");
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:ops/deployments.git", Some(key()));

    let updated = update_helm_revision(&engine, &repo, "prod", "1.1.0", Some("update/helm-revision-1.1.0"))
        .await
        .unwrap();

    assert!(updated);
    assert!(engine.ran("git switch -c update/helm-revision-1.1.0"));
    assert!(engine.ran("git push"));

    let values = ValuesFile::load(dir.path().join("argocd/values.yaml")).unwrap();
    assert_eq!(values.environment_revision("prod").unwrap(), "1.1.0");
    // Other environments untouched.
    assert_eq!(values.environment_revision("staging").unwrap(), "0.9.0");
}

#[tokio::test]
async fn helm_update_is_idempotent_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    seed_values_file(dir.path(), "1.0.0");
    let repo = GitRepository::new("git@host:ops/deployments.git", Some(key()));

    let first = FakeEngine::new(dir.path());
    assert!(
        update_helm_revision(&first, &repo, "prod", "2.0.0", None)
            .await
            .unwrap()
    );
    assert!(first.ran("git push"));

    // The values file now carries 2.0.0, so a second run must not push.
    let second = FakeEngine::new(dir.path());
    assert!(
        !update_helm_revision(&second, &repo, "prod", "2.0.0", None)
            .await
            .unwrap()
    );
    assert!(!second.ran("git push"));
}

#[tokio::test]
async fn helm_update_compares_after_trimming() {
    let dir = tempfile::tempdir().unwrap();
    seed_values_file(dir.path(), "1.0.0");
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:ops/deployments.git", Some(key()));

    let updated = update_helm_revision(&engine, &repo, "prod", " 1.0.0 ", None)
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn helm_update_fails_on_unknown_environment() {
    let dir = tempfile::tempdir().unwrap();
    seed_values_file(dir.path(), "1.0.0");
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:ops/deployments.git", Some(key()));

    let err = update_helm_revision(&engine, &repo, "qa", "1.1.0", None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Values { .. }));
    assert!(!engine.ran("git push"));
}

#[tokio::test]
async fn image_tag_update_pushes_directly_by_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("values.yaml"), "image:\n  tag: v1\n").unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));

    update_image_tag(&engine, &repo, "values.yaml", "image.tag", "v2", false)
        .await
        .unwrap();

    assert!(!engine.ran("git switch"));
    assert!(engine.ran("git push"));

    let values = ValuesFile::load(dir.path().join("values.yaml")).unwrap();
    assert_eq!(
        values.get("image.tag").and_then(serde_yaml::Value::as_str),
        Some("v2")
    );
}

#[tokio::test]
async fn image_tag_update_branches_when_pr_requested() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("values.yaml"), "image:\n  tag: v1\n").unwrap();
    let engine = FakeEngine::new(dir.path());
    let repo = GitRepository::new("git@host:group/app.git", Some(key()));

    update_image_tag(&engine, &repo, "values.yaml", "image.tag", "9.9.9", true)
        .await
        .unwrap();

    assert!(engine.ran("git switch -c update/helm-revision-9.9.9"));
}
