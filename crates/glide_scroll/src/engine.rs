//! Browser engine detection and wheel delta normalization
//!
//! Engines report wheel deltas at different scales: Firefox sends a few lines
//! per notch, Safari's already-accelerated deltas run hot, Edge a little
//! cold. A fixed per-engine multiplier evens out perceived speed.
//!
//! Detection is memoized process-wide. The host registers its user agent once
//! with [`set_user_agent`]; the first [`current`] call parses it. Tests pin an
//! engine with [`override_for_tests`] and clear the memo with [`reset`].

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Rendering engine family, as far as wheel behavior is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserEngine {
    Firefox,
    Safari,
    Chrome,
    Edge,
    Opera,
    Unknown,
    /// No user agent available (server render, headless host)
    Server,
}

impl BrowserEngine {
    /// Factor applied to raw wheel deltas
    pub fn wheel_multiplier(self) -> f64 {
        match self {
            BrowserEngine::Firefox => 40.0,
            BrowserEngine::Safari => 0.5,
            BrowserEngine::Edge => 1.2,
            BrowserEngine::Chrome
            | BrowserEngine::Opera
            | BrowserEngine::Unknown
            | BrowserEngine::Server => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BrowserEngine::Firefox => "firefox",
            BrowserEngine::Safari => "safari",
            BrowserEngine::Chrome => "chrome",
            BrowserEngine::Edge => "edge",
            BrowserEngine::Opera => "opera",
            BrowserEngine::Unknown => "unknown",
            BrowserEngine::Server => "server",
        }
    }
}

/// Detected engine plus its major version, if the user agent carried one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub engine: BrowserEngine,
    pub version: String,
}

impl BrowserInfo {
    pub fn new(engine: BrowserEngine) -> Self {
        Self {
            engine,
            version: String::new(),
        }
    }
}

/// Digits directly following `token` in `ua`
fn version_after(ua: &str, token: &str) -> String {
    ua.find(token)
        .map(|start| {
            ua[start + token.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect()
        })
        .unwrap_or_default()
}

/// Classify a user agent string
///
/// Chromium-based Edge and Opera also advertise `chrome/`, and Chrome
/// advertises `safari/`, so the more specific tokens are checked first.
/// Edge therefore scrolls with its own ×1.2 wheel multiplier; a chrome-first
/// order would classify it as Chrome and scale by ×1.
pub fn detect(user_agent: Option<&str>) -> BrowserInfo {
    let Some(user_agent) = user_agent else {
        return BrowserInfo::new(BrowserEngine::Server);
    };
    let ua = user_agent.to_lowercase();

    let (engine, version) = if ua.contains("firefox") {
        (BrowserEngine::Firefox, version_after(&ua, "firefox/"))
    } else if ua.contains("edg/") || ua.contains("edge/") {
        let token = if ua.contains("edg/") { "edg/" } else { "edge/" };
        (BrowserEngine::Edge, version_after(&ua, token))
    } else if ua.contains("opr/") || ua.contains("opera") {
        let token = if ua.contains("opr/") { "opr/" } else { "opera/" };
        (BrowserEngine::Opera, version_after(&ua, token))
    } else if ua.contains("safari") && !ua.contains("chrome") && !ua.contains("chromium") {
        (BrowserEngine::Safari, version_after(&ua, "version/"))
    } else if ua.contains("chrome") {
        (BrowserEngine::Chrome, version_after(&ua, "chrome/"))
    } else {
        (BrowserEngine::Unknown, String::new())
    };

    BrowserInfo { engine, version }
}

static USER_AGENT: RwLock<Option<String>> = RwLock::new(None);
static DETECTED: RwLock<Option<BrowserInfo>> = RwLock::new(None);

/// Register the host's user agent for lazy detection
///
/// Does not clear an existing memo; call [`reset`] to force re-detection.
pub fn set_user_agent(user_agent: impl Into<String>) {
    *USER_AGENT.write().unwrap_or_else(PoisonError::into_inner) = Some(user_agent.into());
}

/// The memoized engine, detecting it on first use
pub fn current() -> BrowserInfo {
    if let Some(info) = DETECTED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return info.clone();
    }

    let mut detected = DETECTED.write().unwrap_or_else(PoisonError::into_inner);
    // Another caller may have filled the memo between the two locks
    if let Some(info) = detected.as_ref() {
        return info.clone();
    }
    let user_agent = USER_AGENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let info = detect(user_agent.as_deref());
    tracing::debug!(
        "detected browser engine: {} {}",
        info.engine.name(),
        info.version
    );
    *detected = Some(info.clone());
    info
}

/// Pin the memoized engine
pub fn override_for_tests(info: BrowserInfo) {
    *DETECTED.write().unwrap_or_else(PoisonError::into_inner) = Some(info);
}

/// Forget the memoized engine so the next [`current`] call re-detects
pub fn reset() {
    *DETECTED.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Converts raw wheel deltas into engine-independent pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelNormalizer {
    engine: BrowserEngine,
}

impl WheelNormalizer {
    pub fn new(engine: BrowserEngine) -> Self {
        Self { engine }
    }

    /// Normalizer for the memoized engine
    pub fn detected() -> Self {
        Self::new(current().engine)
    }

    pub fn engine(&self) -> BrowserEngine {
        self.engine
    }

    pub fn normalize(&self, delta: f64) -> f64 {
        delta * self.engine.wheel_multiplier()
    }
}

impl Default for WheelNormalizer {
    fn default() -> Self {
        Self::new(BrowserEngine::Unknown)
    }
}
