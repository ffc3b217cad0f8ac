//! Parse-once cache of the channel's recognized attributes.
//!
//! Re-parsing attribute strings on every record is both a correctness hazard
//! (parse results could drift) and a performance cost, so the channel derives
//! a [`ChannelSettings`] snapshot whenever the bag's version counter moves.
//! Unrecognized values for recognized keys fall back to their `none` default
//! with a diagnostic instead of failing the write path.

use std::str::FromStr;

use log::warn;

use crate::archive::{ArchiveMode, TimestampZone};
use crate::attrs::AttributeBag;
use crate::codec::CompressionMode;
use crate::parse::{parse_interval, parse_size};
use crate::policy::RotatePolicy;
use crate::purge::PurgePolicy;

/// Recognized attribute keys.
pub(crate) mod keys {
    pub(crate) const COMPRESSION_MODE: &str = "compression_mode";
    pub(crate) const ROTATE: &str = "rotate";
    pub(crate) const ROTATE_SIZE: &str = "rotate.size";
    pub(crate) const ROTATE_INTERVAL: &str = "rotate.interval";
    pub(crate) const ARCHIVE: &str = "archive";
    pub(crate) const PURGE: &str = "purge";
    pub(crate) const TIMES: &str = "times";
}

/// Snapshot of the parsed attribute values the channel acts on.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChannelSettings {
    pub(crate) compression: CompressionMode,
    pub(crate) rotate: RotatePolicy,
    pub(crate) archive: ArchiveMode,
    pub(crate) purge: PurgePolicy,
    pub(crate) times: TimestampZone,
}

impl ChannelSettings {
    /// Derive a snapshot from the bag, falling back per key on bad values.
    pub(crate) fn from_attrs(attrs: &AttributeBag) -> Self {
        Self {
            compression: enum_attr(attrs, keys::COMPRESSION_MODE),
            rotate: rotate_policy(attrs),
            archive: enum_attr(attrs, keys::ARCHIVE),
            purge: enum_attr(attrs, keys::PURGE),
            times: enum_attr(attrs, keys::TIMES),
        }
    }
}

fn enum_attr<T>(attrs: &AttributeBag, key: &str) -> T
where
    T: FromStr + Default,
{
    let Some(raw) = attrs.get(key) else {
        return T::default();
    };
    raw.parse().unwrap_or_else(|_| {
        warn!("unrecognized value '{raw}' for attribute '{key}', falling back to the default");
        T::default()
    })
}

fn rotate_policy(attrs: &AttributeBag) -> RotatePolicy {
    let raw = attrs.get(keys::ROTATE).unwrap_or("none");
    match raw.to_ascii_lowercase().as_str() {
        "none" => RotatePolicy::None,
        "size" => threshold_attr(attrs, keys::ROTATE_SIZE, |raw| {
            parse_size(raw).map(RotatePolicy::Size)
        }),
        "interval" => threshold_attr(attrs, keys::ROTATE_INTERVAL, |raw| {
            parse_interval(raw).map(RotatePolicy::Interval)
        }),
        other => {
            warn!("unrecognized value '{other}' for attribute 'rotate', rotation disabled");
            RotatePolicy::None
        }
    }
}

fn threshold_attr<F>(attrs: &AttributeBag, key: &str, parse: F) -> RotatePolicy
where
    F: FnOnce(&str) -> Result<RotatePolicy, crate::error::ChannelError>,
{
    let Some(raw) = attrs.get(key) else {
        warn!("rotation requested but '{key}' is unset, rotation disabled");
        return RotatePolicy::None;
    };
    parse(raw).unwrap_or_else(|err| {
        warn!("rotation disabled: {err}");
        RotatePolicy::None
    })
}
