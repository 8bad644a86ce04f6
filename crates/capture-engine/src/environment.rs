//! Host capability gate.
//!
//! Recording is refused up front on hosts that cannot sustain it. The
//! check runs once when a session starts and is never revisited
//! mid-session; a host that shrinks below the threshold afterwards keeps
//! its running session.

/// User-agent substrings that identify mobile hosts. Matched
/// case-insensitively.
pub const MOBILE_UA_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Viewport widths at or below this are treated as mobile regardless of
/// user agent.
pub const NARROW_VIEWPORT_MAX: u32 = 768;

/// A description of the host the capture engine is running inside.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    /// Host identification string, user-agent shaped.
    pub user_agent: String,

    /// Available viewport width in logical units.
    pub viewport_width: u32,

    /// Physical pixels per logical unit.
    pub device_pixel_ratio: f64,
}

impl HostEnvironment {
    pub fn new(user_agent: impl Into<String>, viewport_width: u32, device_pixel_ratio: f64) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport_width,
            device_pixel_ratio,
        }
    }

    /// Whether this host falls under the mobile gate.
    pub fn is_mobile(&self) -> bool {
        self.mobile_reason().is_some()
    }

    /// The reason this host counts as mobile, if it does.
    pub fn mobile_reason(&self) -> Option<String> {
        if self.viewport_width <= NARROW_VIEWPORT_MAX {
            return Some(format!(
                "viewport width {} is at or below {}",
                self.viewport_width, NARROW_VIEWPORT_MAX
            ));
        }
        let ua = self.user_agent.to_lowercase();
        MOBILE_UA_MARKERS
            .iter()
            .find(|marker| ua.contains(*marker))
            .map(|marker| format!("user agent matches mobile marker \"{marker}\""))
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self {
            user_agent: "codereel-host".to_string(),
            viewport_width: 1920,
            device_pixel_ratio: 1.0,
        }
    }
}
