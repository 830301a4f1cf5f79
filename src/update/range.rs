//! npm semantic-versioning ranges
//!
//! Supports the range grammar found in package.json files:
//! - `1.2.3`, `=1.2.3`, `v1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3`, `~>1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `1`, `*`, `""` - wildcards and partial versions
//! - `1.0.0 - 2.0.0` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - comparator sets, all must hold
//! - `^1.0.0 || ^2.0.0` - unions, any must hold
//!
//! Every range is lowered to a union of comparator sets. Upper bounds derived
//! from partial versions (`<2.0.0` in `^1.2.3`) exclude the prereleases of the
//! bound itself, so `2.0.0-beta.1` never satisfies `^1.2.3`.

use semver::{Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Error raised for range expressions that are not valid semver ranges
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version range '{range}': {message}")]
pub struct RangeError {
    /// The offending range expression
    pub range: String,
    /// What was wrong with it
    pub message: String,
}

impl RangeError {
    fn new(range: &str, message: impl Into<String>) -> Self {
        Self {
            range: range.to_string(),
            message: message.into(),
        }
    }
}

/// A single primitive constraint
#[derive(Debug, Clone, PartialEq, Eq)]
enum Comparator {
    Eq(Version),
    Gt(Version),
    Gte(Version),
    Lt(Version),
    Lte(Version),
    /// Below the given release, prereleases of that release included
    LtRelease(u64, u64, u64),
}

impl Comparator {
    fn matches(&self, version: &Version) -> bool {
        match self {
            Comparator::Eq(v) => version.cmp_precedence(v) == Ordering::Equal,
            Comparator::Gt(v) => version.cmp_precedence(v) == Ordering::Greater,
            Comparator::Gte(v) => version.cmp_precedence(v) != Ordering::Less,
            Comparator::Lt(v) => version.cmp_precedence(v) == Ordering::Less,
            Comparator::Lte(v) => version.cmp_precedence(v) != Ordering::Greater,
            Comparator::LtRelease(major, minor, patch) => {
                (version.major, version.minor, version.patch) < (*major, *minor, *patch)
            }
        }
    }

    /// True when `version` lies above the upper bound expressed by this comparator
    fn is_exceeded_by(&self, version: &Version) -> bool {
        match self {
            Comparator::Eq(v) | Comparator::Lte(v) => {
                version.cmp_precedence(v) == Ordering::Greater
            }
            Comparator::Lt(v) => version.cmp_precedence(v) != Ordering::Less,
            Comparator::LtRelease(major, minor, patch) => {
                (version.major, version.minor, version.patch) >= (*major, *minor, *patch)
            }
            Comparator::Gt(_) | Comparator::Gte(_) => false,
        }
    }
}

/// A version that may omit minor/patch or use `x`/`*` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartialVersion {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl PartialVersion {
    fn parse(raw: &str, range: &str) -> Result<Self, RangeError> {
        let s = raw.trim();
        let s = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);
        // Build metadata never affects matching
        let s = s.split('+').next().unwrap_or_default();

        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, pre),
            None => (s, ""),
        };

        let mut parts = [None; 3];
        if !core.is_empty() {
            let pieces: Vec<&str> = core.split('.').collect();
            if pieces.len() > 3 {
                return Err(RangeError::new(range, format!("too many components in '{}'", raw)));
            }
            let mut wildcard = false;
            for (slot, piece) in parts.iter_mut().zip(pieces) {
                if matches!(piece, "x" | "X" | "*") {
                    wildcard = true;
                    continue;
                }
                if wildcard {
                    // Anything after a wildcard is ignored (`1.x.3` == `1.x`)
                    continue;
                }
                let number = piece.parse::<u64>().map_err(|_| {
                    RangeError::new(range, format!("'{}' is not a version number", piece))
                })?;
                *slot = Some(number);
            }
        }

        let pre = if pre.is_empty() {
            Prerelease::EMPTY
        } else {
            if parts.iter().any(Option::is_none) {
                return Err(RangeError::new(
                    range,
                    format!("prerelease on partial version '{}'", raw),
                ));
            }
            Prerelease::new(pre).map_err(|e| RangeError::new(range, e.to_string()))?
        };

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre,
        })
    }

    /// The lowest version this partial version describes
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }

    /// The release just above everything this partial version describes
    fn partial_ceiling(&self, major: u64) -> Comparator {
        match self.minor {
            None => Comparator::LtRelease(major.saturating_add(1), 0, 0),
            Some(minor) => Comparator::LtRelease(major, minor.saturating_add(1), 0),
        }
    }
}

/// A parsed npm range: a union of comparator sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    sets: Vec<Vec<Comparator>>,
}

const OPERATORS: &[&str] = &["~>", ">=", "<=", ">", "<", "=", "^", "~"];

impl VersionRange {
    /// Parse an npm range expression
    pub fn parse(raw: &str) -> Result<Self, RangeError> {
        let sets = raw
            .split("||")
            .map(|part| parse_set(part, raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.trim().to_string(),
            sets,
        })
    }

    /// Check whether `version` satisfies the range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.iter().all(|comparator| comparator.matches(version)))
    }

    /// Check whether `version` is greater than every version the range admits
    pub fn is_exceeded_by(&self, version: &Version) -> bool {
        self.sets.iter().all(|set| {
            !set.iter().all(|c| c.matches(version))
                && set.iter().any(|c| c.is_exceeded_by(version))
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Returns true if `required` looks like a dist-tag (`latest`, `next`) rather than a range
pub fn is_dist_tag(required: &str) -> bool {
    let required = required.trim();
    required
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && required
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && VersionRange::parse(required).is_err()
}

fn parse_set(part: &str, range: &str) -> Result<Vec<Comparator>, RangeError> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(Vec::new());
    }

    if let Some((from, to)) = part.split_once(" - ") {
        return parse_hyphen(from, to, range);
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in part.split_whitespace() {
        if OPERATORS.contains(&token) {
            if pending_op.is_some() {
                return Err(RangeError::new(range, "two operators in a row"));
            }
            pending_op = Some(token);
            continue;
        }
        let (op, version) = match pending_op.take() {
            Some(op) => (op, token),
            None => split_operator(token),
        };
        comparators.extend(lower(op, PartialVersion::parse(version, range)?));
    }
    if pending_op.is_some() {
        return Err(RangeError::new(range, "operator without a version"));
    }

    Ok(comparators)
}

fn parse_hyphen(from: &str, to: &str, range: &str) -> Result<Vec<Comparator>, RangeError> {
    let from = PartialVersion::parse(from, range)?;
    let to = PartialVersion::parse(to, range)?;

    let mut comparators = Vec::new();
    if from.major.is_some() {
        comparators.push(Comparator::Gte(from.floor()));
    }
    if let Some(major) = to.major {
        if to.patch.is_some() {
            comparators.push(Comparator::Lte(to.floor()));
        } else {
            comparators.push(to.partial_ceiling(major));
        }
    }
    Ok(comparators)
}

fn split_operator(token: &str) -> (&str, &str) {
    OPERATORS
        .iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (*op, rest)))
        .unwrap_or(("", token))
}

fn lower(op: &str, pv: PartialVersion) -> Vec<Comparator> {
    let Some(major) = pv.major else {
        return match op {
            // Nothing is above or below every version
            ">" | "<" => vec![Comparator::LtRelease(0, 0, 0)],
            _ => Vec::new(),
        };
    };
    let is_full = pv.patch.is_some();

    match op {
        "^" => {
            let ceiling = match (major, pv.minor, pv.patch) {
                (0, Some(0), Some(patch)) => Comparator::LtRelease(0, 0, patch.saturating_add(1)),
                (0, Some(minor), _) => Comparator::LtRelease(0, minor.saturating_add(1), 0),
                _ => Comparator::LtRelease(major.saturating_add(1), 0, 0),
            };
            vec![Comparator::Gte(pv.floor()), ceiling]
        }
        "~" | "~>" => vec![Comparator::Gte(pv.floor()), pv.partial_ceiling(major)],
        ">" if is_full => vec![Comparator::Gt(pv.floor())],
        ">" => {
            let next = match pv.minor {
                None => Version::new(major.saturating_add(1), 0, 0),
                Some(minor) => Version::new(major, minor.saturating_add(1), 0),
            };
            vec![Comparator::Gte(next)]
        }
        ">=" => vec![Comparator::Gte(pv.floor())],
        "<" if is_full => vec![Comparator::Lt(pv.floor())],
        "<" => {
            let floor = pv.floor();
            vec![Comparator::LtRelease(floor.major, floor.minor, floor.patch)]
        }
        "<=" if is_full => vec![Comparator::Lte(pv.floor())],
        "<=" => vec![pv.partial_ceiling(major)],
        _ if is_full => vec![Comparator::Eq(pv.floor())],
        _ => vec![Comparator::Gte(pv.floor()), pv.partial_ceiling(major)],
    }
}
