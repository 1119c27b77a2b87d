/// Delivery capability of the client that receives the exported pass.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Programmatic downloads work.
    #[default]
    Standard,
    /// Programmatic downloads of generated images are unreliable; the user saves manually.
    Restricted,
}

impl EngineKind {
    pub fn is_restricted(self) -> bool {
        self == Self::Restricted
    }
}

/// Decides the [`EngineKind`] once, up front.
pub trait EngineDetector {
    fn detect(&self) -> EngineKind;
}

/// Classify from a user-agent string.
///
/// Heuristic only: misclassification is possible and harmless.
#[derive(Clone, Debug)]
pub struct UserAgentDetector {
    user_agent: String,
}

impl UserAgentDetector {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl EngineDetector for UserAgentDetector {
    fn detect(&self) -> EngineKind {
        classify_user_agent(&self.user_agent)
    }
}

/// A detector with a predetermined answer (feature detection result, CLI override, tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedEngine(pub EngineKind);

impl EngineDetector for FixedEngine {
    fn detect(&self) -> EngineKind {
        self.0
    }
}

/// Restricted iff the UA mentions `safari` with no `chrome` or `android` before it.
///
/// Chromium-based and Android browsers also carry a `Safari/` token, but always after their own
/// token, so only the first `safari` occurrence matters.
pub fn classify_user_agent(user_agent: &str) -> EngineKind {
    let ua = user_agent.to_ascii_lowercase();
    let Some(safari_at) = ua.find("safari") else {
        return EngineKind::Standard;
    };
    let prefix = &ua[..safari_at];
    if prefix.contains("chrome") || prefix.contains("android") {
        EngineKind::Standard
    } else {
        EngineKind::Restricted
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/engine.rs"]
mod tests;
