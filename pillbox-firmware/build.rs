//! Build script for pillbox-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dispenser.toml at compile time
//! - Stamps the build time, used to seed a halted RTC

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    setup_linker();
    validate_config();
    stamp_build_time();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Seconds since the Unix epoch at build time
fn stamp_build_time() {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    println!("cargo:rustc-env=PILLBOX_BUILD_UNIX_TIME={}", secs);
}

/// Allowed keys per section, with inclusive value ranges
const SCHEMA: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "motor",
        &[
            ("steps_per_slot", 1, (u32::MAX / 14) as i64),
            ("step_interval_ms", 1, 1_000),
            ("dwell_ms", 0, u32::MAX as i64),
            ("self_test_steps", 0, u32::MAX as i64),
            ("self_test_dwell_ms", 0, u32::MAX as i64),
        ],
    ),
    (
        "schedule",
        &[("poll_interval_ms", 1, 999), ("fire_window_s", 0, 59)],
    ),
    (
        "display",
        &[("refresh_ms", 1, u32::MAX as i64), ("notice_ms", 0, u32::MAX as i64)],
    ),
    ("clock", &[("retry_delay_ms", 0, 1_000)]),
];

/// Validate dispenser.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=dispenser.toml");

    let config_path = Path::new("dispenser.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: dispenser.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds dispenser.toml as its configuration.        ║\n\
            ║  Please create one in the pillbox-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read dispenser.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in dispenser.toml                    ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = check_sections(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in dispenser.toml                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=dispenser.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every section and key against [`SCHEMA`]
///
/// The firmware's own parser only understands flat sections of integer
/// keys, so anything richer is rejected here rather than at boot.
fn check_sections(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return errors,
    };

    for (section, body) in root {
        let keys = match SCHEMA.iter().find(|(name, _)| name == section) {
            Some((_, keys)) => *keys,
            None => {
                errors.push(format!("unknown section [{}]", section));
                continue;
            }
        };

        let table = match body {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        for (key, value) in table {
            let (_, min, max) = match keys.iter().find(|(name, _, _)| name == key) {
                Some(entry) => *entry,
                None => {
                    errors.push(format!("[{}] unknown key '{}'", section, key));
                    continue;
                }
            };

            match value {
                toml::Value::Integer(v) if (min..=max).contains(v) => {}
                toml::Value::Integer(_) => {
                    errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                }
                _ => errors.push(format!("[{}] {} must be an integer", section, key)),
            }
        }
    }

    errors
}
