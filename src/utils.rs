/*!
 * Utility functions for revdump
 */

use std::path::Path;

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Render a relative path with `/` separators regardless of platform
pub fn normalize_rel_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-cased extension including the leading dot
///
/// Dotfiles without a second dot (`.env`) have no extension.
pub fn file_extension(file_name: &str) -> Option<String> {
    match file_name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(file_name[idx..].to_lowercase()),
    }
}

/// Directories pruned before descent unless a policy says otherwise
pub static DEFAULT_EXCLUDED_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        // Dependencies
        "node_modules",
        "bower_components",
        "miniprogram_npm",
        "vendor",
        // Build & Dist
        "dist",
        "build",
        "out",
        "target",
        // Python
        "__pycache__",
        ".pytest_cache",
        "venv",
        ".venv",
        // IDEs & Editors
        ".idea",
        ".vscode",
        // Coverage & Caches
        "coverage",
        ".nyc_output",
        ".cache",
        ".next",
        // Generated migration history
        "migrations",
    ]
});

/// Extensions that never carry reviewable source
pub static DEFAULT_EXCLUDED_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        ".log", ".tmp", ".cache", ".bak", ".swp", ".pyc", ".class", ".jar", ".zip", ".tgz",
        ".png", ".jpg", ".jpeg", ".gif", ".ico", ".wxml", ".wxss", ".css", ".html", ".sqlite",
        ".db",
    ]
});

/// Exact file names that are always noise
pub static DEFAULT_EXCLUDED_NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "Cargo.lock",
        "composer.lock",
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        ".eslintcache",
        "project.private.config.json",
    ]
});
