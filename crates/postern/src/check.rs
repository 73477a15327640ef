// SPDX-FileCopyrightText: 2026 Postern Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `postern config check` implementation.

use std::path::Path;
use std::process::ExitCode;

use postern_config::PosternConfig;

/// Load and validate configuration, printing a summary or every diagnostic.
pub fn run_check(path: Option<&Path>) -> ExitCode {
    let result = match path {
        Some(path) => postern_config::load_and_validate_path(path),
        None => postern_config::load_and_validate(),
    };

    match result {
        Ok(config) => {
            println!("{}", summary(&config));
            ExitCode::SUCCESS
        }
        Err(errors) => {
            postern_config::render_errors(&errors);
            eprintln!("postern: {} configuration error(s)", errors.len());
            ExitCode::FAILURE
        }
    }
}

fn summary(config: &PosternConfig) -> String {
    format!(
        "config ok: client.name={} log_level={} handshake.auto_initiate={} media.thumbnails={} notification.expiry_warning_hours={}",
        config.client.name,
        config.client.log_level,
        config.handshake.auto_initiate,
        config.media.thumbnails,
        config.notification.expiry_warning_hours,
    )
}
