//! Tool detection via version probes

use super::command::{CommandRunner, Invocation};
use std::io;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

/// Probe `<tool> --version`
///
/// A tool that cannot be spawned (not on PATH, not executable) or that exits
/// non-zero is reported unavailable. Only unexpected spawn failures are errors.
pub fn probe_tool(runner: &dyn CommandRunner, name: &str) -> io::Result<ToolInfo> {
    match runner.run(&Invocation::new(name).arg("--version")) {
        Ok(out) if out.success => {
            let version = out.stdout.trim().to_string();
            Ok(ToolInfo {
                name: name.to_string(),
                version: (!version.is_empty()).then_some(version),
                available: true,
            })
        }
        Ok(_) => Ok(ToolInfo {
            name: name.to_string(),
            version: None,
            available: false,
        }),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) => {
            Ok(ToolInfo {
                name: name.to_string(),
                version: None,
                available: false,
            })
        }
        Err(e) => Err(e),
    }
}
