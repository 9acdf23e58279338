//! PII reduction for log contexts.
//!
//! Shrinks identifying noise (client IPs, full user-agent strings) before a
//! record reaches a sink. This is not a scrubber for secrets.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::model::LogContext;

static IP_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\d+\.\d+$").expect("ip mask pattern is valid"));

static BROWSER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Chrome|Firefox|Safari)/(\d+)").expect("browser pattern is valid")
});

const UNKNOWN_BROWSER: &str = "Unknown Browser";

/// Mask the last two octets of a dotted IPv4 address.
///
/// Anything that does not end in two dotted numbers is returned unchanged.
pub fn mask_ip(ip: &str) -> String {
    IP_TAIL.replace(ip, ".xxx.xxx").into_owned()
}

/// Reduce a user-agent string to `<Browser>/<major>`.
pub fn reduce_user_agent(user_agent: &str) -> String {
    match BROWSER.captures(user_agent) {
        Some(caps) => format!("{}/{}", &caps[1], &caps[2]),
        None => UNKNOWN_BROWSER.to_string(),
    }
}

/// Return a copy of `context` with `ip` and `user_agent` reduced.
pub fn mask_sensitive_data(context: Option<&LogContext>) -> Option<LogContext> {
    let mut masked = context?.clone();
    if let Some(ip) = masked.ip.as_deref() {
        masked.ip = Some(mask_ip(ip));
    }
    if let Some(user_agent) = masked.user_agent.as_deref() {
        masked.user_agent = Some(reduce_user_agent(user_agent));
    }
    Some(masked)
}
