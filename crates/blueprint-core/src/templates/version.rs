//! Version comparison for the registry document

use semver::Version;

/// Registry document version this build understands
pub const REGISTRY_VERSION: &str = "1.0.0";

/// Compare the registry's declared version against the one this CLI expects
/// Returns a warning message on mismatch; unparsable versions are not compared
pub fn check_registry_version(
    expected: &str,
    registry_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let expected_ver = parse_version(expected)?;
    let registry_ver = parse_version(registry_version)?;

    if registry_ver > expected_ver {
        Some(format!(
            "Warning: The template registry is at version {}, newer than the {} this CLI understands.\n\
             Some templates may not build correctly.\n\
             Consider updating: {}",
            registry_version, expected, upgrade_command
        ))
    } else if registry_ver.major < expected_ver.major {
        Some(format!(
            "Warning: The template registry is at version {}, older than the {} this CLI expects.\n\
             Some templates may be missing fields.",
            registry_version, expected
        ))
    } else {
        None
    }
}

/// Parse version string, handling various formats ("v1.2.0", "1.2", "1")
pub fn parse_version(version_str: &str) -> Option<Version> {
    // Remove leading 'v' if present
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);

    if let Ok(v) = Version::parse(cleaned) {
        return Some(v);
    }

    // Pad short forms out to major.minor.patch
    let parts: Vec<&str> = cleaned.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
        return None;
    }
    let mut padded = parts.clone();
    padded.resize(3, "0");
    Version::parse(&padded.join(".")).ok()
}
