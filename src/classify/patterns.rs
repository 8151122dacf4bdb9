//! Selectability rules for filter choices.
//!
//! Some attributes are structural or noisy (addresses, raw bytes, port
//! references) and make poor filter criteria. The rules here decide only
//! whether an attribute is offered as a choice; classification never
//! consults them.
//!
//! Each pattern is a named entry in [`NOISE_PATTERNS`] so it can be tested
//! and replaced on its own.

use crate::core::{AttributeValue, Namespace};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// String attribute names that describe test structure rather than
/// configuration.
pub const STRUCTURAL_NAMES: [&str; 3] = ["TestType", "CommandSequence", "TestActivity"];

#[derive(Debug)]
pub struct NoisePattern {
    pub name: &'static str,
    pub purpose: &'static str,
    pub regex: &'static Lazy<Regex>,
}

impl NoisePattern {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

static HEX_BYTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9_]+").unwrap());
static HEX_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-fA-F0-9_]{4}").unwrap());
static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)")
        .unwrap()
});

const IPV4_OCTET: &str = r"(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])";

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({octet}\.){{3,3}}{octet}", octet = IPV4_OCTET)).unwrap()
});
static IPV6: Lazy<Regex> = Lazy::new(|| {
    let v4 = format!(r"({octet}\.){{3,3}}{octet}", octet = IPV4_OCTET);
    let alternatives = [
        r"([0-9a-fA-F]{1,4}:){7,7}[0-9a-fA-F]{1,4}".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,7}:".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}".to_string(),
        r"([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}".to_string(),
        r"[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})".to_string(),
        r":((:[0-9a-fA-F]{1,4}){1,7}|:)".to_string(),
        r"fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}".to_string(),
        format!(r"::(ffff(:0{{1,4}}){{0,1}}:){{0,1}}{}", v4),
        format!(r"([0-9a-fA-F]{{1,4}}:){{1,4}}:{}", v4),
    ];
    Regex::new(&format!("({})", alternatives.join("|"))).unwrap()
});
static PORT_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]*#\(N[a-zA-Z0-9 /]+\)").unwrap());
static NUMBER_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]*#\([a-zA-Z0-9 /]+\)").unwrap());

pub static NOISE_PATTERNS: [NoisePattern; 7] = [
    NoisePattern {
        name: "hex-bytes",
        purpose: "byte strings written with a 0x prefix",
        regex: &HEX_BYTES,
    },
    NoisePattern {
        name: "hex-word",
        purpose: "raw values starting with four hex digits",
        regex: &HEX_WORD,
    },
    NoisePattern {
        name: "address",
        purpose: "domain names and URLs",
        regex: &ADDRESS,
    },
    NoisePattern {
        name: "ipv4",
        purpose: "IPv4 addresses",
        regex: &IPV4,
    },
    NoisePattern {
        name: "ipv6",
        purpose: "IPv6 addresses",
        regex: &IPV6,
    },
    NoisePattern {
        name: "port-reference",
        purpose: "#(N...) node/port references",
        regex: &PORT_REFERENCE,
    },
    NoisePattern {
        name: "number-reference",
        purpose: "#(...) numeric references",
        regex: &NUMBER_REFERENCE,
    },
];

/// Why an attribute is not offered as a filter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "pattern", rename_all = "snake_case")]
pub enum Exclusion {
    StructuralName,
    Underscore,
    Noise(&'static str),
}

/// First rule that excludes a string attribute, if any.
pub fn string_exclusion(name: &str, value: &str) -> Option<Exclusion> {
    if STRUCTURAL_NAMES.contains(&name) {
        return Some(Exclusion::StructuralName);
    }
    if name.contains('_') {
        return Some(Exclusion::Underscore);
    }
    NOISE_PATTERNS
        .iter()
        .find(|pattern| pattern.is_match(name) || pattern.is_match(value))
        .map(|pattern| Exclusion::Noise(pattern.name))
}

/// Boolean attributes with an underscore are internal or derived.
pub fn boolean_exclusion(name: &str) -> Option<Exclusion> {
    name.contains('_').then_some(Exclusion::Underscore)
}

/// Exclusion rule for an attribute of either namespace.
pub fn selection_exclusion(
    namespace: Namespace,
    name: &str,
    value: &AttributeValue,
) -> Option<Exclusion> {
    match namespace {
        Namespace::Boolean => boolean_exclusion(name),
        Namespace::String => string_exclusion(name, value.as_text().unwrap_or_default()),
    }
}

pub fn is_selectable(namespace: Namespace, name: &str, value: &AttributeValue) -> bool {
    selection_exclusion(namespace, name, value).is_none()
}
