//! Warehouse compute sizes and their throughput-unit rates.
//!
//! Each size doubles the hourly consumption of the one below it, from
//! `X-SMALL` (1 unit/hour) to `4X-LARGE` (128 units/hour). Lookups are
//! case-insensitive and unknown labels fall back to [`ComputeSize::Medium`].

use std::fmt;

/// Named compute tier of a warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComputeSize {
    XSmall,
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
    X2Large,
    X3Large,
    X4Large
}

/// Every compute size, smallest first.
pub const COMPUTE_SIZES: [ComputeSize; 8] = [
    ComputeSize::XSmall,
    ComputeSize::Small,
    ComputeSize::Medium,
    ComputeSize::Large,
    ComputeSize::XLarge,
    ComputeSize::X2Large,
    ComputeSize::X3Large,
    ComputeSize::X4Large
];

impl ComputeSize {
    /// Canonical upper-case label
    pub fn label(self) -> &'static str {
        match self {
            Self::XSmall => "X-SMALL",
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
            Self::XLarge => "X-LARGE",
            Self::X2Large => "2X-LARGE",
            Self::X3Large => "3X-LARGE",
            Self::X4Large => "4X-LARGE"
        }
    }

    /// Nominal throughput units consumed per hour of runtime
    pub fn units_per_hour(self) -> u32 {
        match self {
            Self::XSmall => 1,
            Self::Small => 2,
            Self::Medium => 4,
            Self::Large => 8,
            Self::XLarge => 16,
            Self::X2Large => 32,
            Self::X3Large => 64,
            Self::X4Large => 128
        }
    }

    /// Find a size by label, ignoring case and surrounding whitespace.
    pub fn lookup(label: &str) -> Option<Self> {
        let wanted = label.trim();
        COMPUTE_SIZES
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(wanted))
    }

    /// Hourly rate for a label, using the MEDIUM rate for unknown labels.
    pub fn rate_for(label: &str) -> u32 {
        Self::lookup(label)
            .unwrap_or(Self::Medium)
            .units_per_hour()
    }
}

impl fmt::Display for ComputeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
