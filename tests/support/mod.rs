//! Fixture helpers for building skill libraries on disk.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// A well-formed skill document.
pub fn skill(name: &str, description: &str, tags: &[&str]) -> String {
    format!(
        "---\nname: {}\ndescription: {}\ntags: [{}]\n---\n\n# {}\n\n```sh\necho {}\n```\n",
        name,
        description,
        tags.join(", "),
        name,
        name
    )
}

/// A small mixed-stack library: four good documents in nested directories.
pub fn library(dir: &Path) {
    write(
        dir,
        "mobile/flutter-state/SKILL.md",
        &skill("flutter-state", "State management in Flutter apps", &["mobile", "dart"]),
    );
    write(
        dir,
        "databases/postgres-indexes.md",
        &skill("postgres-indexes", "Choosing Postgres index types", &["database", "sql"]),
    );
    write(
        dir,
        "databases/sqlite-wal.md",
        &skill("sqlite-wal", "Tuning SQLite in WAL mode", &["database"]),
    );
    write(
        dir,
        "frontend/react-hooks.md",
        &skill("react-hooks", "Writing custom React hooks", &["frontend", "react"]),
    );
    write(dir, "README.md", "# Skill library\n\nNot a skill.\n");
}
