//! Validator configuration.

/// Behaviour switches of a [`super::Validator`].
///
/// # Examples
///
/// ```
/// use vauban::engine::ValidatorConfig;
///
/// let config = ValidatorConfig::default();
/// assert!(!config.fail_fast);
/// assert!(config.track_processed_beans);
///
/// let fail_fast = ValidatorConfig::fail_fast();
/// assert!(fail_fast.fail_fast);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Stop at the first violation.
    pub fail_fast: bool,
    /// Remember which beans were validated for which groups and paths.
    ///
    /// Disabling this is only safe for acyclic graphs.
    pub track_processed_beans: bool,
    /// Maximum number of cascades followed from the root, if limited.
    pub max_depth: Option<usize>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            track_processed_beans: true,
            max_depth: None,
        }
    }
}

impl ValidatorConfig {
    /// Creates a configuration that stops at the first violation.
    #[must_use]
    pub fn fail_fast() -> Self {
        Self {
            fail_fast: true,
            ..Default::default()
        }
    }

    /// Creates a configuration without processed-bean tracking.
    ///
    /// Every reachable bean is validated once per path it is reached by.
    #[must_use]
    pub fn untracked() -> Self {
        Self {
            track_processed_beans: false,
            ..Default::default()
        }
    }

    /// Limits how many cascades are followed from the root.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
