//! Sandbox driver tests: invocation capture, path scrubbing through
//! a real subprocess, and snapshot addressing modes.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use vetra_harness::driver::SandboxDriver;
use vetra_harness_core::{HarnessOptions, PluginDefinition, PluginFile};

const PLUGIN_TOML: &str = r#"
[plugins.definitions.demo]
known_good_version = "1.0.0"
runtime = "node"
package = "demo-pkg"
"#;

fn demo_plugin() -> PluginDefinition {
    let file: PluginFile = toml::from_str(PLUGIN_TOML).unwrap();
    file.definition("demo", Path::new("plugin.toml")).unwrap()
}

fn demo_plugin_dir(root: &Path) -> PathBuf {
    let dir = root.join("demo");
    fs::create_dir_all(dir.join("fixtures")).unwrap();
    fs::write(dir.join("plugin.toml"), PLUGIN_TOML).unwrap();
    fs::write(dir.join("fixtures/target1.in.py"), "import os\n").unwrap();
    dir
}

fn write_script(root: &Path, body: &str) -> PathBuf {
    let path = root.join("stub-tool.sh");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[tokio::test]
async fn captures_exit_code_stdout_stderr_and_findings() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    let stub = write_script(
        root.path(),
        r#"echo '[{"tool":"demo","ruleKey":"rule1","path":"f.py","message":"bad"}]'
echo 'some diagnostics' >&2
exit 1"#,
    );

    let options = HarnessOptions::default().with_tool_bin(stub);
    let mut driver = SandboxDriver::new(&demo_plugin(), &plugin_dir, "1.0.0", options).unwrap();
    driver.set_up("target1.in.py").await.unwrap();

    let run = driver.run_check().await.unwrap();
    assert_eq!(run.exit_code, 1);
    assert!(!run.success());
    assert!(run.stderr.contains("some diagnostics"));
    assert_eq!(run.findings.len(), 1);
    assert_eq!(run.findings[0].rule_key, "rule1");

    driver.tear_down();
}

#[tokio::test]
async fn sandbox_path_is_scrubbed_from_normalized_messages() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());
    // The stub reports its working directory (the sandbox) inside
    // the message, as real tools do with absolute paths.
    let stub = write_script(
        root.path(),
        r#"printf '[{"tool":"demo","ruleKey":"rule1","path":"f.py","message":"problem in %s/f.py"}]' "$(pwd -P)""#,
    );

    let options = HarnessOptions::default().with_tool_bin(stub);
    let mut driver = SandboxDriver::new(&demo_plugin(), &plugin_dir, "1.0.0", options).unwrap();
    driver.set_up("target1.in.py").await.unwrap();

    let run = driver.run_check().await.unwrap();
    let normalized = run.normalized();
    assert_eq!(normalized.issues[0].message, "problem in /f.py");

    driver.tear_down();
}

#[tokio::test]
async fn launch_failure_is_the_only_fatal_execution_error() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());

    let options = HarnessOptions::default().with_tool_bin(root.path().join("missing-tool"));
    let mut driver = SandboxDriver::new(&demo_plugin(), &plugin_dir, "1.0.0", options).unwrap();
    driver.set_up("target1.in.py").await.unwrap();

    assert!(driver.run_check().await.is_err());

    driver.tear_down();
}

#[test]
fn snapshot_path_is_version_suffixed() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());

    let mut driver = SandboxDriver::new(
        &demo_plugin(),
        &plugin_dir,
        "2.3.4",
        HarnessOptions::default(),
    )
    .unwrap();

    let path = driver.snapshot_path("target1");
    assert!(path.ends_with("fixtures/__snapshots__/target1_v2.3.4.shot"));

    driver.tear_down();
}

#[test]
fn known_good_mode_addresses_the_known_good_snapshot() {
    let root = tempfile::tempdir().unwrap();
    let plugin_dir = demo_plugin_dir(root.path());

    let options = HarnessOptions {
        test_against_known_good: true,
        ..HarnessOptions::default()
    };
    let mut driver = SandboxDriver::new(&demo_plugin(), &plugin_dir, "2.3.4", options).unwrap();

    // The version under test is 2.3.4, but the comparison target is
    // the snapshot recorded for the known-good version.
    let path = driver.snapshot_path("target1");
    assert!(path.ends_with("fixtures/__snapshots__/target1_v1.0.0.shot"));

    driver.tear_down();
}
