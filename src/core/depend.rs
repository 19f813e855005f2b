//! Dependency specifications and pacman version comparison
//!
//! A dependency string has the form `name[<op>version][: description]`, where the
//! description part only appears in optional dependency lists. The same type is used
//! for depends, optdepends, provides, conflicts and replaces entries.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::db::Package;

/// Version constraint operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepMod {
    #[default]
    Any,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl DepMod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Whether `ordering` (candidate compared against the constraint version) is accepted
    #[must_use]
    pub const fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Any => true,
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::Ge => !matches!(ordering, Ordering::Less),
            Self::Le => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::Lt => matches!(ordering, Ordering::Less),
        }
    }
}

/// A parsed dependency specification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Depend {
    pub name: String,
    pub modifier: DepMod,
    pub version: Option<String>,
    pub desc: Option<String>,
}

impl Depend {
    /// Parse a dependency string. Never fails: anything without an operator is a bare name.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let (spec, desc) = match spec.split_once(": ") {
            Some((head, desc)) => (head, Some(desc.trim().to_string())),
            None => (spec, None),
        };
        let spec = spec.trim();

        let Some(op_pos) = spec.find(['<', '>', '=']) else {
            return Self {
                name: spec.to_string(),
                desc,
                ..Self::default()
            };
        };

        let rest = &spec[op_pos..];
        let (modifier, op_len) = if rest.starts_with(">=") {
            (DepMod::Ge, 2)
        } else if rest.starts_with("<=") {
            (DepMod::Le, 2)
        } else if rest.starts_with('=') {
            (DepMod::Eq, 1)
        } else if rest.starts_with('>') {
            (DepMod::Gt, 1)
        } else {
            (DepMod::Lt, 1)
        };

        Self {
            name: spec[..op_pos].to_string(),
            modifier,
            version: Some(rest[op_len..].to_string()),
            desc,
        }
    }

    /// Whether `version` meets this dependency's constraint
    #[must_use]
    pub fn version_satisfied_by(&self, version: &str) -> bool {
        match (&self.modifier, &self.version) {
            (DepMod::Any, _) | (_, None) => true,
            (modifier, Some(wanted)) => modifier.accepts(vercmp(version, wanted)),
        }
    }

    /// Literal match: same name and a version meeting the constraint
    #[must_use]
    pub fn satisfied_by_name(&self, pkg: &Package) -> bool {
        pkg.name == self.name && self.version_satisfied_by(&pkg.version)
    }

    /// Match through one of the package's provides entries.
    ///
    /// An unversioned provision only satisfies an unversioned dependency.
    #[must_use]
    pub fn satisfied_by_provides(&self, pkg: &Package) -> bool {
        pkg.provides.iter().any(|provision| {
            if provision.name != self.name {
                return false;
            }
            if self.modifier == DepMod::Any {
                return true;
            }
            match (&provision.modifier, &provision.version) {
                (DepMod::Eq, Some(version)) => self.version_satisfied_by(version),
                _ => false,
            }
        })
    }

    #[must_use]
    pub fn satisfied_by(&self, pkg: &Package) -> bool {
        self.satisfied_by_name(pkg) || self.satisfied_by_provides(pkg)
    }

    /// The dependency without its description, as pacman prints it
    #[must_use]
    pub fn spec_string(&self) -> String {
        match &self.version {
            Some(version) if self.modifier != DepMod::Any => {
                format!("{}{}{}", self.name, self.modifier.as_str(), version)
            }
            _ => self.name.clone(),
        }
    }
}

impl fmt::Display for Depend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec_string())?;
        if let Some(desc) = &self.desc {
            write!(f, ": {desc}")?;
        }
        Ok(())
    }
}

impl From<&str> for Depend {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl Serialize for Depend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Compare two package versions the way `vercmp` does.
///
/// Versions are `[epoch:]version[-release]`. Epochs compare first, then versions,
/// and releases only when both sides carry one.
#[must_use]
pub fn vercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (epoch_a, ver_a, rel_a) = split_evr(a);
    let (epoch_b, ver_b, rel_b) = split_evr(b);

    rpmvercmp(epoch_a, epoch_b)
        .then_with(|| rpmvercmp(ver_a, ver_b))
        .then_with(|| match (rel_a, rel_b) {
            (Some(rel_a), Some(rel_b)) => rpmvercmp(rel_a, rel_b),
            _ => Ordering::Equal,
        })
}

fn split_evr(evr: &str) -> (&str, &str, Option<&str>) {
    let digits = evr.bytes().take_while(u8::is_ascii_digit).count();
    let (epoch, rest) = if evr.as_bytes().get(digits) == Some(&b':') {
        let epoch = if digits == 0 { "0" } else { &evr[..digits] };
        (epoch, &evr[digits + 1..])
    } else {
        ("0", evr)
    };

    match rest.rfind('-') {
        Some(idx) => (epoch, &rest[..idx], Some(&rest[idx + 1..])),
        None => (epoch, rest, None),
    }
}

/// Segment-wise comparison of one version component.
fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let one = a.as_bytes();
    let two = b.as_bytes();
    let (mut i, mut j) = (0, 0);

    while i < one.len() && j < two.len() {
        let (sep_start_i, sep_start_j) = (i, j);
        while i < one.len() && !one[i].is_ascii_alphanumeric() {
            i += 1;
        }
        while j < two.len() && !two[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if i >= one.len() || j >= two.len() {
            break;
        }

        // more separators wins
        let (sep_one, sep_two) = (i - sep_start_i, j - sep_start_j);
        if sep_one != sep_two {
            return sep_one.cmp(&sep_two);
        }

        let is_num = one[i].is_ascii_digit();
        let (seg_start_i, seg_start_j) = (i, j);
        if is_num {
            while i < one.len() && one[i].is_ascii_digit() {
                i += 1;
            }
            while j < two.len() && two[j].is_ascii_digit() {
                j += 1;
            }
        } else {
            while i < one.len() && one[i].is_ascii_alphabetic() {
                i += 1;
            }
            while j < two.len() && two[j].is_ascii_alphabetic() {
                j += 1;
            }
        }

        let mut seg_one = &one[seg_start_i..i];
        let mut seg_two = &two[seg_start_j..j];

        // numeric segments are newer than alpha segments
        if seg_two.is_empty() {
            return if is_num {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        if is_num {
            seg_one = trim_leading_zeros(seg_one);
            seg_two = trim_leading_zeros(seg_two);
            match seg_one.len().cmp(&seg_two.len()) {
                Ordering::Equal => {}
                other => return other,
            }
        }

        match seg_one.cmp(seg_two) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    let rest_one = &one[i.min(one.len())..];
    let rest_two = &two[j.min(two.len())..];
    if rest_one.is_empty() && rest_two.is_empty() {
        return Ordering::Equal;
    }

    // "1.0" > "1.0rc1", "1.0a" < "1.0", "1.0" < "1.0.1"
    let one_alpha = rest_one.first().is_some_and(u8::is_ascii_alphabetic);
    let two_alpha = rest_two.first().is_some_and(u8::is_ascii_alphabetic);
    if (rest_one.is_empty() && !two_alpha) || one_alpha {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn trim_leading_zeros(segment: &[u8]) -> &[u8] {
    let zeros = segment.iter().take_while(|&&b| b == b'0').count();
    &segment[zeros..]
}
