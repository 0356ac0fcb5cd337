use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value, json};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs");
    // vcs.modified goes stale without this
    println!("cargo:rerun-if-changed=../../.git/index");
    println!("cargo:rerun-if-changed=../../Cargo.lock");
    println!("cargo:rerun-if-env-changed=REVSTAMP_LOCKFILE");
    println!("cargo:rerun-if-env-changed=REVSTAMP_CUSTOM_VERSION");

    // Embed whether this is a debug or release build
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=REVSTAMP_BUILD_PROFILE={profile}");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let deps = find_lockfile(&manifest_dir).map(|path| lock_dependencies(&path));
    let revision = git(&manifest_dir, &["rev-parse", "HEAD"]);

    // Neither source available: record the metadata as absent.
    let document = if deps.is_none() && revision.is_none() {
        Value::Null
    } else {
        let mut settings = vec![setting("build.profile", &profile)];
        if let Ok(target) = env::var("TARGET") {
            settings.push(setting("build.target", &target));
        }
        if let Some(revision) = revision {
            settings.push(setting("vcs", "git"));
            settings.push(setting("vcs.revision", &revision));
            if let Some(time) = git(&manifest_dir, &["log", "-1", "--format=%cI"]) {
                settings.push(setting("vcs.time", &time));
            }
            let modified = Command::new("git")
                .args(["status", "--porcelain"])
                .current_dir(&manifest_dir)
                .output()
                .ok()
                .filter(|o| o.status.success())
                .map(|o| !o.stdout.is_empty())
                .unwrap_or(false);
            settings.push(setting("vcs.modified", &modified.to_string()));
        }
        json!({
            "deps": deps.unwrap_or_default(),
            "settings": settings,
        })
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_else(|_| ".".to_string()));
    let dest = out_dir.join("build_metadata.json");
    let text = serde_json::to_string_pretty(&document).unwrap_or_else(|_| "null".to_string());
    if let Err(e) = fs::write(&dest, text) {
        println!("cargo:warning=failed to write {}: {e}", dest.display());
    }
}

fn setting(key: &str, value: &str) -> Value {
    json!({ "key": key, "value": value })
}

fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(dir).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn find_lockfile(manifest_dir: &Path) -> Option<PathBuf> {
    if let Ok(explicit) = env::var("REVSTAMP_LOCKFILE") {
        let path = PathBuf::from(explicit);
        return path.is_file().then_some(path);
    }
    manifest_dir
        .ancestors()
        .map(|dir| dir.join("Cargo.lock"))
        .find(|path| path.is_file())
}

/// Collect externally sourced packages from a `Cargo.lock`.
///
/// Packages without a `source` are path or workspace members, i.e. the
/// program being built, and are left out.
fn lock_dependencies(path: &Path) -> Vec<Value> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    let lock: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            println!("cargo:warning=failed to parse {}: {e}", path.display());
            return Vec::new();
        }
    };
    let packages: Vec<&toml::Table> = lock
        .get("package")
        .and_then(|p| p.as_array())
        .map(|arr| arr.iter().filter_map(|p| p.as_table()).collect())
        .unwrap_or_default();

    packages
        .iter()
        .filter(|pkg| pkg.contains_key("source"))
        .filter_map(|pkg| {
            let name = str_field(pkg, "name")?;
            let version = str_field(pkg, "version").unwrap_or_default();
            let mut module = Map::new();
            module.insert("path".into(), json!(name));
            module.insert("version".into(), json!(version));
            if let Some(sum) = str_field(pkg, "checksum") {
                module.insert("sum".into(), json!(format!("sha256:{sum}")));
            }
            if let Some(replace) = str_field(pkg, "replace").and_then(|r| replacement(r, &packages)) {
                module.insert("replace".into(), replace);
            }
            Some(Value::Object(module))
        })
        .collect()
}

/// Parse a lockfile `replace = "name version (source)"` reference.
fn replacement(reference: &str, packages: &[&toml::Table]) -> Option<Value> {
    let mut parts = reference.splitn(3, ' ');
    let name = parts.next()?;
    let version = parts.next().unwrap_or_default();
    let source = parts
        .next()
        .map(|s| s.trim_start_matches('(').trim_end_matches(')'))
        .filter(|s| !s.is_empty());

    let mut module = Map::new();
    module.insert("path".into(), json!(source.unwrap_or(name)));
    module.insert("version".into(), json!(version));
    let sum = packages
        .iter()
        .find(|pkg| str_field(pkg, "name") == Some(name) && str_field(pkg, "version") == Some(version))
        .and_then(|pkg| str_field(pkg, "checksum"));
    if let Some(sum) = sum {
        module.insert("sum".into(), json!(format!("sha256:{sum}")));
    }
    Some(Value::Object(module))
}

fn str_field<'a>(table: &'a toml::Table, key: &str) -> Option<&'a str> {
    table.get(key).and_then(|v| v.as_str())
}
