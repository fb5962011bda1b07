//! Node label interpretation

use std::collections::BTreeMap;

use crate::requirements::keys;

pub const UNKNOWN: &str = "unknown";

/// Labels that mark a node as spot capacity when set to `spot`
pub const SPOT_LABELS: &[&str] = &[
    keys::CAPACITY_TYPE,
    "node.kubernetes.io/instance-type-price-type",
    "spot.amazonaws.com/cn",
];

fn label_or_unknown(labels: &BTreeMap<String, String>, key: &str) -> String {
    labels
        .get(key)
        .cloned()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn instance_type(labels: &BTreeMap<String, String>) -> String {
    label_or_unknown(labels, keys::INSTANCE_TYPE)
}

pub fn region(labels: &BTreeMap<String, String>) -> String {
    label_or_unknown(labels, keys::REGION)
}

pub fn zone(labels: &BTreeMap<String, String>) -> String {
    label_or_unknown(labels, keys::ZONE)
}

pub fn is_spot(labels: &BTreeMap<String, String>) -> bool {
    SPOT_LABELS
        .iter()
        .any(|key| labels.get(*key).map(String::as_str) == Some("spot"))
}
