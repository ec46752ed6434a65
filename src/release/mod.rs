//! Patch release versioning
//!
//! Releases are tagged on GitHub with plain `X.Y.Z` tag names (a leading `v`
//! is tolerated and kept). The next release is always the last one with its
//! patch number incremented; anything fancier is done by hand with
//! `gh release create`.

use crate::core::error::{PilotError, PilotResult};
use serde::Deserialize;

/// `gh release view --json tagName`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseView {
  tag_name: String,
}

/// Extract the tag name from `gh release view --json tagName` output
pub fn parse_release_view(json: &str) -> PilotResult<String> {
  let view: ReleaseView = serde_json::from_str(json.trim())?;
  Ok(view.tag_name)
}

/// Return a copy of `version` with the patch number incremented
///
/// Only simple `X.Y.Z` versions are accepted; pre-release and build metadata
/// are rejected rather than guessed at.
pub fn bump_patch_number(version: &str) -> PilotResult<String> {
  let (prefix, bare) = match version.strip_prefix('v') {
    Some(rest) => ("v", rest),
    None => ("", version),
  };

  let parsed = semver::Version::parse(bare)?;
  if !parsed.pre.is_empty() || !parsed.build.is_empty() {
    return Err(PilotError::with_help(
      format!("Can't bump '{}': only plain X.Y.Z versions are supported", version),
      "Create this release manually with `gh release create <version>`.",
    ));
  }

  let next = semver::Version::new(parsed.major, parsed.minor, parsed.patch + 1);
  Ok(format!("{}{}", prefix, next))
}
