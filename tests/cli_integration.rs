//! CLI integration tests for autorecipe.
//!
//! These tests drive the binary end to end for every command that does not
//! need the network or an autotools toolchain.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the autorecipe binary command, isolated from the user's config.
fn autorecipe(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("autorecipe").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("AUTORECIPE_PLATFORM")
        .env_remove("AUTORECIPE_DISTRO")
        .current_dir(home.path());
    cmd
}

/// Create a temporary directory for test runs.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

const RECIPE_FILE: &str = r#"
platforms = ["Linux"]

[package]
name = "libfoo"
version = "1.4.2"
description = "Example autotools library"

[source]
url = "https://example.com/libfoo-{version}.tar.gz"
extracted_dir = "{name}-{version}"

[options.shared]
allowed = [true, false]
default = false

[configure]
args = ["--disable-docs"]

[[configure.flags]]
option = "shared"
value = true
args = ["--enable-shared"]
"#;

// ============================================================================
// autorecipe list / show
// ============================================================================

#[test]
fn test_list_shows_both_glib_releases() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("glib/2.19.10"))
        .stdout(predicate::str::contains("glib/2.40.0"));
}

#[test]
fn test_show_old_release() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["show", "glib/2.19.10"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://github.com/GNOME/glib/archive/GLIB_2_19_10.tar.gz",
        ))
        .stdout(predicate::str::contains("shared = false"))
        .stdout(predicate::str::contains("fPIC = true"))
        .stdout(predicate::str::contains("pcre/8.41@bincrafters/stable (when with_pcre=true)"))
        .stdout(predicate::str::contains("ubuntu: gtk-doc-tools"))
        .stdout(predicate::str::contains("edit acglib.m4"));
}

#[test]
fn test_show_bare_name_selects_newest() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["show", "glib"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("glib/2.40.0"))
        .stdout(predicate::str::contains("zlib/1.2.11@conan/stable"))
        .stdout(predicate::str::contains("ubuntu: libffi-dev"));
}

#[test]
fn test_show_unknown_recipe_fails() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["show", "gtk/3.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no built-in recipe named `gtk`"));
}

// ============================================================================
// autorecipe args
// ============================================================================

#[test]
fn test_args_static_linux_defaults() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args([
            "args",
            "glib/2.40.0",
            "--platform",
            "Linux",
            "-o",
            "shared=False",
            "-o",
            "fPIC=True",
            "-o",
            "with_pcre=False",
        ])
        .assert()
        .success()
        .stdout("--disable-man\n--without-pcre\n--enable-static\n--disable-shared\n");
}

#[test]
fn test_args_shared_json() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "glib/2.19.10", "--platform", "Linux", "-o", "shared=True", "--json"])
        .assert()
        .success()
        .stdout("[\"--enable-gtk-doc-html=no\",\"--disable-libmount\",\"--without-pcre\"]\n");
}

#[test]
fn test_args_platform_from_env() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "glib/2.40.0", "-o", "with_pcre=true", "-o", "shared=true"])
        .env("AUTORECIPE_PLATFORM", "Linux")
        .assert()
        .success()
        .stdout("--disable-man\n");
}

#[test]
fn test_args_invalid_option_value() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "glib/2.40.0", "--platform", "Linux", "-o", "shared=maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid value `maybe` for option `shared`",
        ))
        .stderr(predicate::str::contains("`shared` accepts: true, false"));
}

#[test]
fn test_args_unknown_option() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "glib/2.40.0", "--platform", "Linux", "-o", "with_docs=true"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option `with_docs`"));
}

#[test]
fn test_args_unsupported_platform() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "glib/2.40.0", "--platform", "Windows"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "`glib/2.40.0` does not support platform `Windows`",
        ))
        .stderr(predicate::str::contains("supported platforms: Linux"));
}

#[test]
fn test_args_requires_a_recipe() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["args", "--platform", "Linux"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no recipe given"));
}

// ============================================================================
// recipe files
// ============================================================================

#[test]
fn test_recipe_file() {
    let tmp = temp_dir();
    let path = tmp.path().join("libfoo.toml");
    fs::write(&path, RECIPE_FILE).unwrap();

    autorecipe(&tmp)
        .args(["args", "--platform", "Linux", "-o", "shared=true", "--recipe-file"])
        .arg(&path)
        .assert()
        .success()
        .stdout("--disable-docs\n--enable-shared\n");

    autorecipe(&tmp)
        .arg("list")
        .arg("--recipe-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("libfoo/1.4.2"))
        .stdout(predicate::str::contains("glib").not());
}

#[test]
fn test_recipe_file_reference_mismatch() {
    let tmp = temp_dir();
    let path = tmp.path().join("libfoo.toml");
    fs::write(&path, RECIPE_FILE).unwrap();

    autorecipe(&tmp)
        .args(["show", "glib/2.40.0", "--recipe-file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match the recipe"));
}

#[test]
fn test_invalid_recipe_file() {
    let tmp = temp_dir();
    let path = tmp.path().join("broken.toml");
    fs::write(&path, RECIPE_FILE.replace("{name}-{version}", "{name}-{tag}")).unwrap();

    autorecipe(&tmp)
        .args(["show", "--recipe-file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown placeholder `{tag}`"));
}

// ============================================================================
// autorecipe create
// ============================================================================

#[test]
fn test_create_unsupported_platform_touches_nothing() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["create", "glib/2.40.0", "--platform", "Macos", "--skip-system"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not support platform `Macos`"));

    assert!(!tmp.path().join(".autorecipe/work").exists());
}

#[test]
fn test_create_offline_fails_with_fetch_error() {
    let tmp = temp_dir();
    let config_dir = tmp.path().join(".autorecipe");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[net]\noffline = true\n").unwrap();

    autorecipe(&tmp)
        .args(["create", "glib/2.40.0", "--platform", "Linux", "--skip-system"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "failed to fetch `https://github.com/GNOME/glib/archive/2.40.0.tar.gz`",
        ))
        .stderr(predicate::str::contains("offline"));
}

/// Write a gzipped source archive for the `libfoo` recipe and return its path.
fn write_libfoo_archive(dir: &std::path::Path) -> std::path::PathBuf {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in [
        ("libfoo-1.4.2/COPYING", "MIT"),
        ("libfoo-1.4.2/configure.ac", "AC_INIT([libfoo])"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, contents.as_bytes()).unwrap();
    }

    let archive = dir.join("libfoo-1.4.2.tar.gz");
    fs::write(&archive, builder.into_inner().unwrap().finish().unwrap()).unwrap();
    archive
}

#[cfg(unix)]
#[test]
fn test_create_instances_get_separate_work_dirs() {
    let tmp = temp_dir();
    let archive = write_libfoo_archive(tmp.path());
    let recipe = format!(
        r#"
platforms = ["Linux"]

[package]
name = "libfoo"
version = "1.4.2"

[source]
url = "{}"
extracted_dir = "{{name}}-{{version}}"

[options.shared]
allowed = [true, false]
default = false

[configure]
bootstrap = ["sh", "-c", "exit 7"]
"#,
        url::Url::from_file_path(&archive).unwrap()
    );
    let path = tmp.path().join("libfoo.toml");
    fs::write(&path, recipe).unwrap();

    for shared in ["shared=false", "shared=true"] {
        autorecipe(&tmp)
            .args(["create", "--platform", "Linux", "--skip-system", "-o", shared])
            .arg("--recipe-file")
            .arg(&path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("configure step `sh -c exit 7` failed"))
            .stderr(predicate::str::contains("unexpected source layout").not());
    }

    let instances: Vec<_> = fs::read_dir(tmp.path().join(".autorecipe/work/libfoo/1.4.2"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(instances.len(), 2);
    for instance in instances {
        assert!(instance.join("source_subfolder/COPYING").is_file());
    }
}

// ============================================================================
// autorecipe completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    autorecipe(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("autorecipe"));
}
