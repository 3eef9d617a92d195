/// Decoder limits.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Deepest nesting of lists, maps, tags and string chunks accepted.
    /// `None` leaves nesting bounded only by the input.
    #[cfg_attr(feature = "serde", serde(rename = "max-depth"))]
    pub max_depth: Option<usize>,
}

impl DecoderConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}
