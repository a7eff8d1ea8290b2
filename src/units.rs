/// Human-readable quantities for report cells
///
/// Byte counts are shown with a unit prefix chosen from the configured
/// base, and device counts carry a singular or plural noun.
use serde::{Deserialize, Serialize};

/// Base used when scaling byte counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ByteBase {
    /// Powers of 1000: B, kB, MB, ...
    #[default]
    Decimal,
    /// Powers of 1024: B, KiB, MiB, ...
    Binary,
}

impl ByteBase {
    fn factor(self) -> f64 {
        match self {
            ByteBase::Decimal => 1000.0,
            ByteBase::Binary => 1024.0,
        }
    }

    fn units(self) -> &'static [&'static str] {
        match self {
            ByteBase::Decimal => &["B", "kB", "MB", "GB", "TB", "PB", "EB"],
            ByteBase::Binary => &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"],
        }
    }
}

/// Unit settings carried in the render options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitConfig {
    pub byte_base: ByteBase,
}

impl UnitConfig {
    pub fn bytes(&self, size: u64) -> String {
        humanize_bytes(size, self.byte_base)
    }
}

/// Format a byte count, e.g. `"1 B"`, `"1.5 kB"`, `"15 GiB"`.
///
/// Values below 10 are printed exactly. Larger values are scaled to the
/// biggest unit that keeps them >= 1 and rounded to one decimal place,
/// which is only printed while the scaled value is below 10.
pub fn humanize_bytes(size: u64, base: ByteBase) -> String {
    if size < 10 {
        return format!("{} B", size);
    }

    let factor = base.factor();
    let units = base.units();
    let mut exp = 0;
    let mut scaled = size as f64;
    while scaled >= factor && exp < units.len() - 1 {
        scaled /= factor;
        exp += 1;
    }

    let rounded = (scaled * 10.0 + 0.5).floor() / 10.0;
    if rounded < 10.0 {
        format!("{:.1} {}", rounded, units[exp])
    } else {
        format!("{:.0} {}", rounded, units[exp])
    }
}

/// A countable noun with its plural form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noun {
    pub singular: &'static str,
    pub plural: &'static str,
}

impl Noun {
    pub const fn new(singular: &'static str, plural: &'static str) -> Self {
        Noun { singular, plural }
    }

    pub fn pick(&self, count: usize) -> &'static str {
        if count == 1 { self.singular } else { self.plural }
    }

    /// `"1 module"`, `"0 modules"`
    pub fn count(&self, count: usize) -> String {
        format!("{} {}", count, self.pick(count))
    }
}

pub const MODULE: Noun = Noun::new("module", "modules");
pub const NAMESPACE: Noun = Noun::new("namespace", "namespaces");
pub const CONTROLLER: Noun = Noun::new("controller", "controllers");
