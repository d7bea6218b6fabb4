//! Port selection for the dev server

use std::net::TcpListener;
use std::ops::RangeInclusive;

pub const FALLBACK_PORTS: RangeInclusive<u16> = 3000..=3100;

/// Explicit flag, then `PORT`, then `package.json` `config.port`, then the
/// first free port in [`FALLBACK_PORTS`] (its start if none is free).
pub fn resolve_port(explicit: Option<u16>, env: Option<u16>, manifest: Option<u16>) -> u16 {
    explicit
        .or(env)
        .or(manifest)
        .unwrap_or_else(|| find_free_port(FALLBACK_PORTS).unwrap_or(*FALLBACK_PORTS.start()))
}

/// First port in `range` that can be bound on localhost
pub fn find_free_port(range: RangeInclusive<u16>) -> Option<u16> {
    range.into_iter().find(|port| TcpListener::bind(("127.0.0.1", *port)).is_ok())
}
