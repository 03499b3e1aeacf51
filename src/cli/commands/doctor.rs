//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{RecognitionProvider, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Sayso Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Transcript Tiers").bold());
    let tier_checks = check_tiers(settings);
    for check in &tier_checks {
        check.print();
    }
    checks.extend(tier_checks);

    println!();

    // Offline tier tools are optional: captions work without them
    println!("{}", style("External Tools").bold());
    let downloader = settings.audio.downloader.as_str();
    let tool_checks = [
        check_tool(downloader, &format!("{} --version", downloader), install_hint_ytdlp()),
        check_tool("ffmpeg", "ffmpeg -version", install_hint_ffmpeg()),
        check_tool("ffprobe", "ffprobe -version", install_hint_ffmpeg()),
    ];
    for check in tool_checks {
        let check = if settings.transcript.offline {
            check
        } else {
            downgrade(check)
        };
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Speech Recognition").bold());
    let recognition_check = check_recognition(settings);
    recognition_check.print();
    checks.push(recognition_check);

    println!();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Sayso.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Sayso is ready to use.");
    }

    Ok(())
}

/// Errors become warnings for components that are switched off.
fn downgrade(check: CheckResult) -> CheckResult {
    match check.status {
        CheckStatus::Error => CheckResult {
            status: CheckStatus::Warning,
            message: format!("{} (offline tier disabled)", check.message),
            ..check
        },
        _ => check,
    }
}

fn check_tiers(settings: &Settings) -> Vec<CheckResult> {
    let transcript = &settings.transcript;
    let tiers = [
        ("Timed text", transcript.timedtext),
        ("Transcript service", transcript.service),
        ("Offline recognition", transcript.offline),
    ];

    let mut results: Vec<CheckResult> = tiers
        .iter()
        .map(|(name, enabled)| {
            if *enabled {
                CheckResult::ok(name, "enabled")
            } else {
                CheckResult::warning(name, "disabled", "Enable it in the [transcript] section")
            }
        })
        .collect();

    if tiers.iter().all(|(_, enabled)| !enabled) {
        results.push(CheckResult::error(
            "Transcript tiers",
            "all disabled",
            "No transcript can ever be acquired; enable at least one tier",
        ));
    }

    results
}

fn check_recognition(settings: &Settings) -> CheckResult {
    match settings.recognition.provider {
        RecognitionProvider::Api => CheckResult::ok(
            "Provider",
            &format!("api ({})", settings.recognition.model),
        ),
        RecognitionProvider::Local if !cfg!(feature = "local-whisper") => CheckResult::error(
            "Provider",
            "local (not compiled in)",
            "Rebuild with: cargo install sayso --features local-whisper",
        ),
        RecognitionProvider::Local => {
            let model = settings.model_path();
            if model.exists() {
                CheckResult::ok("Provider", &format!("local ({})", model.display()))
            } else {
                CheckResult::error(
                    "Provider",
                    &format!("model not found at {}", model.display()),
                    "Download a ggml model from https://huggingface.co/ggerganov/whisper.cpp",
                )
            }
        }
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_cmd: &str, hint: &str) -> CheckResult {
    let mut parts = version_cmd.split_whitespace();
    let Some(cmd) = parts.next() else {
        return CheckResult::error(name, "no command configured", hint);
    };

    match Command::new(cmd).args(parts).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.chars().count() > 50 {
                format!("{}...", version.chars().take(50).collect::<String>())
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: sayso config edit",
        )
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
