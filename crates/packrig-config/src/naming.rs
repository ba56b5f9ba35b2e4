//! Output naming templates.

/// Template token replaced by a content-derived hash at build time.
pub const FINGERPRINT: &str = "[chunkhash]";

/// Derives artifact filename templates for one synthesis pass.
///
/// Every emitted artifact (main bundle, async chunk, commons chunk,
/// extracted stylesheet) gets its name through [`NamingScheme::chunked`], so
/// the fingerprint placeholder is applied to all of them or to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingScheme {
    long_term_caching: bool,
}

impl NamingScheme {
    pub fn new(long_term_caching: bool) -> Self {
        Self { long_term_caching }
    }

    /// `stem` plus the fingerprint suffix (when long-term caching is on)
    /// and the extension.
    ///
    /// # Example
    ///
    /// ```
    /// use packrig_config::NamingScheme;
    ///
    /// assert_eq!(NamingScheme::new(false).chunked("[name]", "js"), "[name].js");
    /// assert_eq!(
    ///     NamingScheme::new(true).chunked("[name]", "js"),
    ///     "[name].[chunkhash].js"
    /// );
    /// ```
    pub fn chunked(&self, stem: &str, ext: &str) -> String {
        if self.long_term_caching {
            format!("{stem}.{FINGERPRINT}.{ext}")
        } else {
            format!("{stem}.{ext}")
        }
    }
}
