use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn list_stats_requires_dirs() {
    let mut cmd = cargo_bin_cmd!("list-stats");
    cmd.args(["--stats", "sim_seconds"]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("no target gem5out dirs"));
}

#[test]
fn list_stats_prints_table() {
    let root = tempfile::tempdir().unwrap();
    let bench = root.path().join("A").join("bench1");
    std::fs::create_dir_all(&bench).unwrap();
    std::fs::write(bench.join("stats.txt"), "sim_seconds 0.0123 # seconds\n").unwrap();

    let mut cmd = cargo_bin_cmd!("list-stats");
    cmd.arg("--dirs")
        .arg(root.path().join("A"))
        .args(["--stats", "sim_seconds"]);
    cmd.assert()
        .success()
        .stdout("\tA\nbench1\t0.0123\n");
}

#[test]
fn run_se_requires_one_mode() {
    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["--dry-run"]);
    cmd.assert().failure().code(2);

    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["--dry-run", "-c", "/bin/true", "-b", "998.specrand"]);
    cmd.assert().failure().code(2);

    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["--dry-run", "-o", "1 2"]);
    cmd.assert().failure().code(2);
}

#[test]
fn run_se_options_only_with_command() {
    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["--dry-run", "-b", "998.specrand", "-o", "1 2"])
        .env("SPEC2006_ROOT", "/spec");
    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--options"));

    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["-t", "998.specrand", "-o", "x"])
        .env("SPEC2006_ROOT", "/spec");
    cmd.assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("ready").not());
}

#[test]
fn run_se_dry_run_command() {
    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["--dry-run", "-c", "/bin/hash_table", "-o", "-n 1024"])
        .env("GEM5_ROOT", "/opt/gem5");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("/opt/gem5/build/X86/gem5.opt -d gem5out/hash_table-"))
        .stdout(predicate::str::contains("--cpu-type=atomic"))
        .stdout(predicate::str::contains("-c /bin/hash_table -o '-n 1024'"));
}

#[test]
fn run_se_check() {
    let work = tempfile::tempdir().unwrap();

    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["-t", "998.specrand"])
        .env("SPEC2006_ROOT", "/spec")
        .current_dir(work.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("998.specrand (test): ready"));

    let mut cmd = cargo_bin_cmd!("run-se");
    cmd.args(["-t", "473.astar"])
        .env("SPEC2006_ROOT", "/spec")
        .current_dir(work.path());
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("lake.cfg, lake.bin"));
}

#[test]
fn resolve_json() {
    let mut cmd = cargo_bin_cmd!("spec2006");
    cmd.args(["resolve", "999.specrand", "-i", "ref", "--json"])
        .args(["--root", "/spec", "--fingerprint", "run1", "--scratch-dir", "/scratch"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["benchmark"], "999.specrand");
    assert_eq!(v["variant"], "ref");
    assert_eq!(
        v["invocation"]["args"],
        serde_json::json!(["/spec/999.specrand/specrand", "324342", "24239"])
    );
    assert_eq!(
        v["invocation"]["stdout"],
        "/scratch/999.specrand.rand.24239.out.run1"
    );
    assert_eq!(
        v["expected_output"],
        "/spec/999.specrand/data/ref/output/rand.24239.out"
    );
}

#[test]
fn resolve_unknown_benchmark() {
    let mut cmd = cargo_bin_cmd!("spec2006");
    cmd.args(["resolve", "unknown.bench", "--root", "/spec"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown benchmark `unknown.bench`"));
}

#[cfg(unix)]
#[test]
fn run_native_and_verify() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let bench = root.path().join("998.specrand");
    let output = bench.join("data/test/output");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("rand.24239.out"), "324342 24239\n").unwrap();

    let exe = bench.join("specrand");
    std::fs::write(&exe, "#!/bin/sh\necho \"$1 $2\"\n").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cmd = cargo_bin_cmd!("spec2006");
    cmd.args(["run", "998.specrand"])
        .arg("--root")
        .arg(root.path())
        .arg("--scratch-dir")
        .arg(scratch.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("match"));
    assert!(scratch
        .path()
        .join("998.specrand.rand.24239.out.local")
        .exists());

    // same fingerprint, the captured output is still there
    let mut cmd = cargo_bin_cmd!("spec2006");
    cmd.args(["verify", "998.specrand"])
        .arg("--root")
        .arg(root.path())
        .arg("--scratch-dir")
        .arg(scratch.path());
    cmd.assert().success();

    let mut cmd = cargo_bin_cmd!("spec2006");
    cmd.args(["verify", "998.specrand", "--fingerprint", "other"])
        .arg("--root")
        .arg(root.path())
        .arg("--scratch-dir")
        .arg(scratch.path());
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("no output"));
}
