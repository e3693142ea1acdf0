//! Server package task.
//!
//! Responsibilities:
//! - Lay out `<output>/ftrack/<version>` with the server side files.
//! - Zip the client code into `private/client.zip` when the addon has a client.
//! - Bundle everything into `<output>/ftrack-<version>.zip` with a manifest.
//!
//! Does NOT handle:
//! - Uploading the package to a server.
//!
//! Invariants:
//! - `<output>/ftrack` is purged before anything is written.
//! - Sources are only removed after the server zip was written.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ftrack_services_config::constants::{ADDON_CLIENT_DIR, ADDON_NAME, COMMON_DIR_NAME};
use ftrack_services_config::{AddonVersion, Config, resolve_version};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use walkdir::{DirEntry, WalkDir};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::ExitCode;

/// Options of the `package` task.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Output directory; `<addon root>/package` when unset.
    pub output: Option<PathBuf>,
    pub skip_zip: bool,
    pub keep_sources: bool,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    addon_name: &'a str,
    addon_version: &'a str,
}

pub fn run(config: &Config, options: &PackageOptions, out: &mut impl Write) -> Result<ExitCode> {
    let addon_root = config.addon_root();
    let version = resolve_version(&config.version_file)
        .context("Failed to resolve addon version")?;

    let output_dir = options
        .output
        .clone()
        .unwrap_or_else(|| addon_root.join("package"));
    let addon_output_root = output_dir.join(ADDON_NAME);
    if addon_output_root.is_dir() {
        tracing::info!(path = %addon_output_root.display(), "purging previous package");
        fs::remove_dir_all(&addon_output_root)
            .with_context(|| format!("Failed to purge {}", addon_output_root.display()))?;
    }

    tracing::info!(addon = ADDON_NAME, version = %version, "preparing package");
    let package_dir = addon_output_root.join(version.as_str());
    fs::create_dir_all(&package_dir)
        .with_context(|| format!("Failed to create {}", package_dir.display()))?;

    copy_server_content(config, &addon_root, &package_dir)?;
    zip_client_side(config, &addon_root, &package_dir)?;

    if options.skip_zip {
        writeln!(out, "Package sources created: {}", package_dir.display())?;
        return Ok(ExitCode::Success);
    }

    let zip_path = create_server_package(&output_dir, &package_dir, &version)?;
    if !options.keep_sources {
        tracing::info!("removing package sources");
        fs::remove_dir_all(&addon_output_root)
            .with_context(|| format!("Failed to remove {}", addon_output_root.display()))?;
    }

    writeln!(out, "Package created: {}", zip_path.display())?;
    Ok(ExitCode::Success)
}

fn copy_server_content(config: &Config, addon_root: &Path, package_dir: &Path) -> Result<()> {
    tracing::info!("copying server content");

    let mut files = vec![
        (config.version_file.clone(), PathBuf::from("version.py")),
        (
            addon_root.join(COMMON_DIR_NAME).join("constants.py"),
            PathBuf::from("constants.py"),
        ),
    ];
    files.extend(collect_files(&addon_root.join("server"))?);

    for (src, relative) in files {
        let dst = package_dir.join(relative);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &dst).with_context(|| format!("Failed to copy {}", src.display()))?;
    }
    Ok(())
}

fn zip_client_side(config: &Config, addon_root: &Path, package_dir: &Path) -> Result<()> {
    let client_dir = addon_root.join("client");
    if !client_dir.is_dir() {
        tracing::info!("client directory not found, skipping client zip");
        return Ok(());
    }

    tracing::info!("preparing client code zip");
    let private_dir = package_dir.join("private");
    fs::create_dir_all(&private_dir)?;

    let zip_path = private_dir.join("client.zip");
    let mut zip = ZipWriter::new(
        File::create(&zip_path)
            .with_context(|| format!("Failed to create {}", zip_path.display()))?,
    );

    for (src, relative) in collect_files(&client_dir.join(ADDON_CLIENT_DIR))? {
        let name = format!("{}/{}", ADDON_CLIENT_DIR, zip_name(&relative));
        add_file(&mut zip, &src, name)?;
    }
    for (src, relative) in collect_files(&addon_root.join(COMMON_DIR_NAME))? {
        let name = format!("{}/common/{}", ADDON_CLIENT_DIR, zip_name(&relative));
        add_file(&mut zip, &src, name)?;
    }
    add_file(
        &mut zip,
        &config.version_file,
        format!("{}/version.py", ADDON_CLIENT_DIR),
    )?;
    zip.finish()?;

    let pyproject = client_dir.join("pyproject.toml");
    fs::copy(&pyproject, private_dir.join("pyproject.toml"))
        .with_context(|| format!("Failed to copy {}", pyproject.display()))?;
    Ok(())
}

fn create_server_package(
    output_dir: &Path,
    package_dir: &Path,
    version: &AddonVersion,
) -> Result<PathBuf> {
    tracing::info!("creating server package");
    let zip_path = output_dir.join(format!("{}-{}.zip", ADDON_NAME, version));
    let mut zip = ZipWriter::new(
        File::create(&zip_path)
            .with_context(|| format!("Failed to create {}", zip_path.display()))?,
    );

    zip.start_file("manifest.json", file_options())?;
    zip.write_all(&manifest_json(version)?)?;

    for (src, relative) in collect_files(package_dir)? {
        add_file(&mut zip, &src, format!("addon/{}", zip_name(&relative)))?;
    }
    zip.finish()?;

    tracing::info!(path = %zip_path.display(), "server package written");
    Ok(zip_path)
}

fn manifest_json(version: &AddonVersion) -> Result<Vec<u8>> {
    let manifest = Manifest {
        addon_name: ADDON_NAME,
        addon_version: version.as_str(),
    };
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    manifest.serialize(&mut ser)?;
    Ok(buf)
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

fn add_file(zip: &mut ZipWriter<File>, src: &Path, name: String) -> Result<()> {
    let mut file = File::open(src).with_context(|| format!("Failed to open {}", src.display()))?;
    zip.start_file(name, file_options())?;
    io::copy(&mut file, zip)?;
    Ok(())
}

/// Files below `root` as `(absolute, relative)` pairs, sorted by path.
///
/// Hidden entries, `__pycache__` directories and `*.pyc` files are skipped.
fn collect_files(root: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root)?.to_path_buf();
        files.push((entry.into_path(), relative));
    }
    Ok(files)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    if entry.file_type().is_dir() {
        name == "__pycache__"
    } else {
        name.ends_with(".pyc")
    }
}

/// Archive member name for `relative`, always `/`-separated.
fn zip_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
