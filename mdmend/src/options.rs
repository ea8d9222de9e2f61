/// Default sentinel destination for links cut off mid-URL.
///
/// Renderers that want a "link pending" affordance compare the destination
/// against this value (or `CompleteOptions::is_incomplete_link` when the
/// sentinel was overridden).
pub const INCOMPLETE_LINK_URL: &str = "mdmend:incomplete-link";

/// Per-construct switches for [`complete_with`](crate::complete_with).
///
/// Everything is on by default. Turning a switch off leaves that construct's
/// open tail untouched (literal text), it never changes how the others close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteOptions {
    /// `*`/`_` emphasis and strong runs.
    pub emphasis: bool,
    /// `~~` strikethrough.
    pub strikethrough: bool,
    /// Backtick code spans.
    pub inline_code: bool,
    /// `[label](url` rewriting to the sentinel destination.
    pub links: bool,
    /// Dropping of trailing incomplete images.
    pub images: bool,
    /// Closing of open ``` / ~~~ fences.
    pub code_fences: bool,
    /// Padding of a dangling short table row.
    pub tables: bool,
    /// `$$` math balancing.
    pub math: bool,
    /// Zero-width-space guard for a trailing 1-2 char `-`/`=` underline.
    pub setext_guard: bool,
    /// Destination written for links cut off mid-URL.
    pub incomplete_link_url: String,
}

impl Default for CompleteOptions {
    fn default() -> Self {
        Self {
            emphasis: true,
            strikethrough: true,
            inline_code: true,
            links: true,
            images: true,
            code_fences: true,
            tables: true,
            math: true,
            setext_guard: true,
            incomplete_link_url: INCOMPLETE_LINK_URL.to_string(),
        }
    }
}

impl CompleteOptions {
    /// Whether `url` is this configuration's pending-link sentinel.
    pub fn is_incomplete_link(&self, url: &str) -> bool {
        url == self.incomplete_link_url
    }
}
