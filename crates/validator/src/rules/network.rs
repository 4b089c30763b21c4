//! Network rules: `ip`, `email`, `url`, `urlActive`.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::proto::rr::RecordType;
use trust_dns_resolver::system_conf::read_system_conf;
use url::Url;

use crate::error::Result;
use crate::registry::RuleInput;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

/// IPv4 or IPv6 address literal.
pub(crate) fn ip(input: &RuleInput<'_>) -> Result<bool> {
    Ok(input
        .value
        .as_str()
        .is_some_and(|s| s.parse::<IpAddr>().is_ok()))
}

/// Address of the form `local@domain`.
pub(crate) fn email(input: &RuleInput<'_>) -> Result<bool> {
    Ok(input.value.as_str().is_some_and(is_email))
}

fn is_email(address: &str) -> bool {
    if address.len() > MAX_EMAIL_LEN || !EMAIL_REGEX.is_match(address) {
        return false;
    }
    let Some((local, _domain)) = address.rsplit_once('@') else {
        return false;
    };
    local.len() <= MAX_LOCAL_PART_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
}

/// Schemes that are valid without a host part.
const HOSTLESS_SCHEMES: [&str; 3] = ["mailto", "news", "file"];

/// Absolute URL with a scheme and, unless the scheme is host-less, a host.
pub(crate) fn valid_url(input: &RuleInput<'_>) -> Result<bool> {
    Ok(input.value.as_str().is_some_and(|s| {
        !s.chars().any(char::is_whitespace)
            && Url::parse(s).is_ok_and(|url| {
                url.has_host() || HOSTLESS_SCHEMES.contains(&url.scheme())
            })
    }))
}

// ============================================================================
// ACTIVE URL
// ============================================================================

const SCHEMES: [&str; 3] = ["http://", "https://", "ftp://"];

/// Record types probed in order; the first non-empty answer wins.
const RECORD_TYPES: [RecordType; 6] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::MX,
    RecordType::CNAME,
    RecordType::NS,
    RecordType::TXT,
];

/// Resolvers keyed by lookup timeout.
static RESOLVERS: LazyLock<Mutex<HashMap<Duration, Arc<Resolver>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Host part of a URL-ish string: scheme, path, query, fragment and port removed.
fn host_of(value: &str) -> String {
    let lower = value.trim().to_ascii_lowercase();
    let rest = SCHEMES
        .iter()
        .find_map(|scheme| lower.strip_prefix(scheme))
        .unwrap_or(lower.as_str());
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if let Some(bracketed) = host.strip_prefix('[') {
        return bracketed.split(']').next().unwrap_or_default().to_owned();
    }
    host.split(':').next().unwrap_or_default().to_owned()
}

/// Address literals and loopback names have no DNS records of their own.
fn has_dns_name(host: &str) -> bool {
    !host.is_empty()
        && host.parse::<IpAddr>().is_err()
        && host != "localhost"
        && !host.ends_with(".localhost")
}

/// The host has at least one DNS record.
///
/// Each query is bounded by the configured DNS timeout. A timeout or
/// resolver failure counts as an inactive URL.
pub(crate) fn url_active(input: &RuleInput<'_>) -> Result<bool> {
    let Some(value) = input.value.as_str() else {
        return Ok(false);
    };
    let host = host_of(value);
    if !has_dns_name(&host) {
        tracing::debug!(host, "no DNS name to look up");
        return Ok(false);
    }
    let Some(resolver) = resolver(input.config.dns_timeout) else {
        return Ok(false);
    };
    Ok(has_records(&resolver, &host))
}

fn resolver(timeout: Duration) -> Option<Arc<Resolver>> {
    let mut resolvers = RESOLVERS.lock();
    if let Some(resolver) = resolvers.get(&timeout) {
        return Some(Arc::clone(resolver));
    }

    let (config, mut opts) = read_system_conf().unwrap_or_else(|error| {
        tracing::warn!(%error, "system resolver config unavailable, using defaults");
        (ResolverConfig::default(), ResolverOpts::default())
    });
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.use_hosts_file = false;

    match Resolver::new(config, opts) {
        Ok(resolver) => {
            let resolver = Arc::new(resolver);
            resolvers.insert(timeout, Arc::clone(&resolver));
            Some(resolver)
        }
        Err(error) => {
            tracing::warn!(%error, "failed to start DNS resolver");
            None
        }
    }
}

fn has_records(resolver: &Resolver, host: &str) -> bool {
    let fqdn = if host.ends_with('.') {
        host.to_owned()
    } else {
        format!("{host}.")
    };

    for record_type in RECORD_TYPES {
        match resolver.lookup(fqdn.as_str(), record_type) {
            Ok(answer) if answer.iter().next().is_some() => return true,
            Ok(_) => {}
            Err(error) => match error.kind() {
                ResolveErrorKind::NoRecordsFound { response_code, .. } => {
                    if *response_code == ResponseCode::NXDomain {
                        tracing::debug!(host, "domain does not exist");
                        return false;
                    }
                }
                ResolveErrorKind::Timeout => {
                    tracing::warn!(host, ?record_type, "DNS lookup timed out");
                    return false;
                }
                _ => {
                    tracing::warn!(host, ?record_type, %error, "DNS lookup failed");
                    return false;
                }
            },
        }
    }
    tracing::debug!(host, "no DNS records found");
    false
}
