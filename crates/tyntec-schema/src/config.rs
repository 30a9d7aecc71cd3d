/// Controls message validation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, keys a shape does not declare are reported as
    /// `UnexpectedField`. When false they are dropped from the output.
    pub strict_mode: bool,
    /// When true, interactive content must carry exactly the component that
    /// matches its `subType`.
    pub cross_check_interactive: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            cross_check_interactive: true,
        }
    }
}
