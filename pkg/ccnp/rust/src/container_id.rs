// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Container identity from mount namespace metadata.
//!
//! Every container runtime we support bind-mounts some per-container file
//! into the container, and the host path of that file ends up in
//! `/proc/self/mountinfo`:
//!
//! ```text
//! ... /var/lib/docker/containers/{container-id}/hostname /etc/hostname ...
//! ... /var/lib/kubelet/pods/{pod-uid}/containers/busybox/8f8d892c /dev/termination-log ...
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::errors::Error;

pub const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// Identifier of the container (or pod) the current process runs in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct IdPattern {
    marker: &'static str,
    normalize: fn(&str) -> String,
}

// Checked in order on every line.
const ID_PATTERNS: &[IdPattern] = &[
    IdPattern {
        marker: "/docker/containers/",
        normalize: str::to_string,
    },
    IdPattern {
        marker: "/kubelet/pods/",
        normalize: pod_uid,
    },
];

// Pod UIDs are embedded in identifiers where '-' is not allowed.
fn pod_uid(segment: &str) -> String {
    segment.replace('-', "_")
}

/// Returns the identifier carried by a single mountinfo line, if any.
///
/// Only the first pattern whose marker occurs on the line is considered. A
/// marker with nothing after it makes the whole line a miss.
fn match_line(line: &str) -> Option<ContainerId> {
    let (pattern, rest) = ID_PATTERNS
        .iter()
        .find_map(|p| line.rsplit_once(p.marker).map(|(_, rest)| (p, rest)))?;

    let segment = rest
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    if segment.is_empty() {
        debug!("ignoring mountinfo line with empty {} segment", pattern.marker);
        return None;
    }

    Some(ContainerId((pattern.normalize)(segment)))
}

/// Scans mountinfo lines in order and returns the first identifier found.
pub fn find_container_id<'a, I>(lines: I) -> Option<ContainerId>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().find_map(match_line)
}

/// Resolves the container ID from the mountinfo file at `path`.
pub fn resolve_container_id_from(path: &Path) -> Result<ContainerId, Error> {
    let source_error = |source| Error::IdentitySourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(source_error)?;
    // Mount points are arbitrary bytes; a line that is not UTF-8 only loses
    // its undecodable parts.
    let lines = BufReader::new(file)
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(source_error)?;

    let id = find_container_id(lines.iter().map(String::as_str)).ok_or_else(|| {
        Error::IdentityNotFound {
            path: path.to_path_buf(),
        }
    })?;

    debug!("resolved container id {id} from {}", path.display());
    Ok(id)
}
