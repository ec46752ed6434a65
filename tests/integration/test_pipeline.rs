//! Integration tests for the default format/lint/test pipeline
//!
//! `pyenv` and `hdev` are stubs, so these check which commands run, with which
//! files, in which order.

#![cfg(unix)]

use crate::helpers::TestRepo;
use anyhow::Result;
use predicates::prelude::*;

/// Repo with a source file and its unit test committed and pushed
fn repo_with_module() -> Result<TestRepo> {
  let repo = TestRepo::new()?;
  repo.write("foo.py", "x = 1\n")?;
  repo.write("tests/unit/foo_test.py", "def test_x(): pass\n")?;
  repo.commit("Add foo")?;
  repo.publish("main")?;
  repo.stub_toolchain()?;
  Ok(repo)
}

fn position(lines: &[String], needle: &str) -> usize {
  lines
    .iter()
    .position(|line| line.contains(needle))
    .unwrap_or_else(|| panic!("no recorded command contains {:?}\n{:#?}", needle, lines))
}

#[test]
fn test_no_changes_only_installs() -> Result<()> {
  let repo = repo_with_module()?;

  repo
    .testpilot()
    .assert()
    .success()
    .stdout(predicate::str::contains("Formatting").not());

  assert_eq!(repo.recorded()?, ["hdev install-python"]);
  Ok(())
}

#[test]
fn test_modified_source_runs_every_stage_in_order() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("foo.py", "x = 2\n")?;

  repo
    .testpilot()
    .assert()
    .success()
    .stdout(predicate::str::contains("testpilot=> Formatting"))
    .stdout(predicate::str::contains("testpilot=> Linting"))
    .stdout(predicate::str::contains("testpilot=> Running unit tests"))
    .stdout(predicate::str::contains("testpilot=> Printing coverage report"))
    .stdout(predicate::str::contains(
      "It looks like .tox/format/bin/black doesn't exist, running tox to install it",
    ))
    .stdout(predicate::str::contains("Running functional tests").not());

  let log = repo.recorded()?;
  let both = "foo.py tests/unit/foo_test.py";

  assert_eq!(log[0], "hdev install-python");
  let black = position(&log, &format!("tox -e format --run-command black --quiet {}", both));
  let isort = position(&log, &format!("isort --quiet --atomic {}", both));
  let pylint_src = position(&log, "tox -e lint --run-command pylint foo.py");
  let pylint_tests = position(&log, "pylint --rcfile=tests/.pylintrc tests/unit/foo_test.py");
  let pycodestyle = position(&log, &format!("pycodestyle {}", both));
  let pydocstyle = position(&log, &format!("pydocstyle {}", both));
  let coverage_run = position(&log, "tox -e tests --run-command coverage run -m pytest --quiet tests/unit/foo_test.py");
  let combine = position(&log, "coverage combine --quiet");
  let report = position(
    &log,
    "coverage report --fail-under=0 --no-skip-covered --include foo.py,tests/unit/foo_test.py",
  );

  let order = [black, isort, pylint_src, pylint_tests, pycodestyle, pydocstyle, coverage_run, combine, report];
  assert!(order.windows(2).all(|w| w[0] < w[1]), "out of order: {:#?}", log);
  Ok(())
}

#[test]
fn test_modified_test_pulls_in_source() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("tests/unit/foo_test.py", "def test_y(): pass\n")?;
  repo.commit("Change the test only")?;

  repo.testpilot().assert().success();

  let log = repo.recorded()?;
  position(&log, "black --quiet foo.py tests/unit/foo_test.py");
  Ok(())
}

#[test]
fn test_deleted_file_is_skipped_but_its_test_runs() -> Result<()> {
  let repo = repo_with_module()?;
  std::fs::remove_file(repo.path.join("foo.py"))?;

  repo.testpilot().assert().success();

  let log = repo.recorded()?;
  position(&log, "black --quiet tests/unit/foo_test.py");
  assert!(log.iter().all(|line| !line.contains(" foo.py")), "{:#?}", log);
  Ok(())
}

#[test]
fn test_untracked_and_functional_files() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("tests/functional/app_test.py", "def test_app(): pass\n")?;

  repo
    .testpilot()
    .assert()
    .success()
    .stdout(predicate::str::contains("testpilot=> Running functional tests"))
    .stdout(predicate::str::contains("Running unit tests").not());

  let log = repo.recorded()?;
  position(&log, "tox -e functests --run-command pytest --quiet tests/functional/app_test.py");
  position(&log, "pylint --rcfile=tests/.pylintrc tests/functional/app_test.py");
  assert!(log.iter().all(|line| !line.contains("pylint tests/")), "{:#?}", log);
  Ok(())
}

#[test]
fn test_non_python_changes_skip_python_stages() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("README.md", "# changed\n")?;

  repo.testpilot().assert().success();
  assert_eq!(repo.recorded()?, ["hdev install-python"]);
  Ok(())
}

#[test]
fn test_failing_tool_stops_pipeline_and_propagates_exit_code() -> Result<()> {
  let repo = repo_with_module()?;
  repo.failing_stub("pyenv", "pylint", 7)?;
  repo.write("foo.py", "x = 3\n")?;

  repo.testpilot().assert().code(7);

  let log = repo.recorded()?;
  assert!(log.last().is_some_and(|line| line.contains("pylint")), "{:#?}", log);
  assert!(log.iter().all(|line| !line.contains("pydocstyle") && !line.contains("coverage")));
  Ok(())
}

#[test]
fn test_failing_install_stops_pipeline() -> Result<()> {
  let repo = repo_with_module()?;
  repo.failing_stub("hdev", "install-python", 3)?;
  repo.write("foo.py", "x = 3\n")?;

  repo.testpilot().assert().code(3);
  assert_eq!(repo.recorded()?, ["hdev install-python"]);
  Ok(())
}

#[test]
fn test_install_script_preferred_over_hdev() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("bin/install-python", "#!/bin/sh\nexit 0\n")?;
  let script = repo.path.join("bin/install-python");
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
  }

  repo.testpilot().assert().success();
  assert!(repo.recorded()?.iter().all(|line| !line.starts_with("hdev")));
  Ok(())
}

#[test]
fn test_prebuilt_environment_is_used_directly() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write(".gitignore", ".tox/\n")?;
  repo.commit("Ignore tox")?;
  repo.publish("main")?;
  repo.write(".tox/format/bin/black", "")?;
  repo.write("foo.py", "x = 4\n")?;

  repo.testpilot().assert().success();

  let log = repo.recorded()?;
  position(&log, "pyenv exec .tox/format/bin/black --quiet foo.py tests/unit/foo_test.py");

  // --tox forces the slow path even when the environment exists
  repo.clear_recorded()?;
  repo.testpilot().arg("--tox").assert().success();
  position(&repo.recorded()?, "pyenv exec tox -e format --run-command black --quiet");
  Ok(())
}

#[test]
fn test_library_profile() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("pyproject.toml", "[tool.hdev]\nproject_type = \"library\"\n")?;
  repo.write("src/pkg/core.py", "x = 1\n")?;
  repo.write("tests/unit/pkg/core_test.py", "def test_x(): pass\n")?;
  repo.commit("Add package")?;
  repo.publish("main")?;
  repo.stub_toolchain()?;
  repo.write("src/pkg/core.py", "x = 2\n")?;

  repo.testpilot().assert().success();

  let log = repo.recorded()?;
  position(&log, "black --quiet src/pkg/core.py tests/unit/pkg/core_test.py");
  assert!(log.iter().all(|line| !line.contains("pycodestyle")), "{:#?}", log);
  Ok(())
}

#[test]
fn test_h_profile() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.write("h/models.py", "x = 1\n")?;
  repo.write("tests/h/models_test.py", "def test_x(): pass\n")?;
  repo.commit("Add h")?;
  repo.publish("main")?;
  repo.stub_toolchain()?;
  repo.write("h/models.py", "x = 2\n")?;

  repo.testpilot().assert().success();

  let log = repo.recorded()?;
  position(&log, "coverage run -m pytest --quiet tests/h/models_test.py");
  position(&log, "pycodestyle h/models.py tests/h/models_test.py");
  Ok(())
}

#[test]
fn test_master_branch_fallback() -> Result<()> {
  let repo = TestRepo::with_branch("master")?;
  repo.write("app.py", "x = 1\n")?;
  repo.commit("Add app")?;
  repo.publish("master")?;
  repo.stub_toolchain()?;
  repo.write("app.py", "x = 2\n")?;

  repo
    .testpilot()
    .arg("--debug")
    .assert()
    .success()
    .stdout(predicate::str::contains("testpilot=> Project's main branch: 'master'"))
    .stdout(predicate::str::contains("testpilot=> Project profile: standard"))
    .stdout(predicate::str::contains("testpilot=> Running git"))
    .stdout(predicate::str::contains("origin/master"));

  position(&repo.recorded()?, "black --quiet app.py");
  Ok(())
}

#[test]
fn test_runs_from_subdirectory() -> Result<()> {
  let repo = repo_with_module()?;
  repo.write("foo.py", "x = 5\n")?;
  std::fs::create_dir_all(repo.path.join("tests/unit"))?;

  let mut cmd = repo.testpilot();
  cmd.current_dir(repo.path.join("tests/unit"));
  cmd.assert().success();

  position(&repo.recorded()?, "black --quiet foo.py tests/unit/foo_test.py");
  Ok(())
}
