//! Integration tests for the command-line surface and early failures

use crate::helpers::TestRepo;
use anyhow::Result;
use predicates::prelude::*;

#[test]
fn test_version_prints_only_the_version() -> Result<()> {
  let repo = TestRepo::bare_dir()?;
  repo
    .testpilot()
    .arg("--version")
    .assert()
    .success()
    .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")))
    .stderr("");

  repo.testpilot().arg("-v").assert().success().stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
  Ok(())
}

#[test]
fn test_help() -> Result<()> {
  let repo = TestRepo::bare_dir()?;
  repo
    .testpilot()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--tox"))
    .stdout(predicate::str::contains("--debug"));
  Ok(())
}

#[test]
fn test_unknown_flag_is_rejected() -> Result<()> {
  let repo = TestRepo::bare_dir()?;
  repo.testpilot().arg("--frobnicate").assert().failure();
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_outside_git_repo() -> Result<()> {
  let repo = TestRepo::bare_dir()?;
  repo.stub_toolchain()?;

  repo
    .testpilot()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("It looks like you aren't in a git repo"));

  assert!(repo.recorded()?.is_empty(), "no stage should run");
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_missing_main_branch() -> Result<()> {
  let repo = TestRepo::with_branch("trunk")?;
  repo.stub_toolchain()?;

  repo
    .testpilot()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("either a 'main' or a 'master' branch"));

  assert!(repo.recorded()?.is_empty(), "no stage should run");
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_malformed_pyproject_aborts_before_any_stage() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.publish("main")?;
  repo.stub_toolchain()?;
  repo.write("pyproject.toml", "[tool.hdev\nproject_type = \"library\"\n")?;

  repo
    .testpilot()
    .assert()
    .code(1)
    .stderr(predicate::str::contains("couldn't parse your project's pyproject.toml"));

  assert!(repo.recorded()?.is_empty());
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_missing_origin_branch_is_fatal() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.stub_toolchain()?;

  repo
    .testpilot()
    .assert()
    .code(2)
    .stderr(predicate::str::contains("Git command failed"))
    .stderr(predicate::str::contains("git fetch"));
  Ok(())
}
