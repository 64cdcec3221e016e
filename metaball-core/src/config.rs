use thiserror::Error;

/// Errors from [`Config::validated`] and [`Rgba::from_hex`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("speed must be positive, got {0}")]
    NonPositiveSpeed(f32),
    #[error("cell count must be at least 1")]
    ZeroCellCount,
    #[error("{name} must be positive, got {value}")]
    NonPositiveConstant { name: &'static str, value: f32 },
    #[error("malformed hex color `{0}`")]
    InvalidColor(String),
}

/// An RGBA color with all channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let err = || ConfigError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(err());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        let (r, g, b, a) = match digits.len() {
            3 => {
                // Single-digit channels repeat the digit: #f80 == #ff8800.
                let one = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                (one(0)?, one(1)?, one(2)?, 255)
            }
            6 | 8 => {
                let two = |i: usize| channel(&digits[i..i + 2]);
                let a = if digits.len() == 8 { two(6)? } else { 255 };
                (two(0)?, two(2)?, two(4)?, a)
            }
            _ => return Err(err()),
        };

        Ok(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Global simulation configuration.
///
/// Colors and `speed`/`cell_count` come from the embedding environment;
/// the remaining fields are tuning constants with documented defaults
/// that are exposed here instead of being hard-coded at the use sites.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Fill color outside the blobs (passed through to the renderer).
    pub background: Rgba,
    /// Halo color just below the iso level (passed through).
    pub glow: Rgba,
    /// Fill color inside the blobs (passed through).
    pub blob: Rgba,
    /// Time scale applied to the frame delta. Must be positive.
    pub speed: f32,
    /// Grid resolution: the field has `(cell_count + 1)²` lattice points.
    pub cell_count: usize,
    /// Magnitude of the pairwise repulsion coefficient.
    pub force_coeff: f32,
    /// Symmetric per-axis velocity clamp keeping the integrator stable.
    pub velocity_limit: f32,
    /// Lower bound on distances before division, so coincident points
    /// saturate the force/field instead of diverging.
    pub min_distance: f32,
    /// Upper bound for capped field values handed to a color ramp.
    pub field_cap: f32,
    /// Field threshold separating blob inside from outside.
    pub iso_level: f32,
    /// Frame-delta cap, also substituted when the delta is unusable.
    pub max_elapsed: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: Rgba::new(0.447, 0.035, 0.718, 1.0),
            glow: Rgba::new(0.969, 0.145, 0.522, 1.0),
            blob: Rgba::new(0.298, 0.788, 0.941, 1.0),
            speed: 1.0,
            cell_count: 100,
            force_coeff: 1e-5,
            velocity_limit: 5e-4,
            min_distance: 1e-6,
            field_cap: 100.0,
            iso_level: 1.0,
            max_elapsed: 50.0,
        }
    }
}

impl Config {
    /// Checks the construction-time invariants and returns the config
    /// unchanged if they hold.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(self.speed > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed));
        }
        if self.cell_count == 0 {
            return Err(ConfigError::ZeroCellCount);
        }
        for (name, value) in [
            ("force_coeff", self.force_coeff),
            ("velocity_limit", self.velocity_limit),
            ("min_distance", self.min_distance),
            ("field_cap", self.field_cap),
            ("iso_level", self.iso_level),
            ("max_elapsed", self.max_elapsed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveConstant { name, value });
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_config_passes_validation() {
        assert!(Config::default().validated().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.speed = 0.0;
        assert_eq!(cfg.validated().unwrap_err(), ConfigError::NonPositiveSpeed(0.0));

        let mut cfg = Config::default();
        cfg.cell_count = 0;
        assert_eq!(cfg.validated().unwrap_err(), ConfigError::ZeroCellCount);

        let mut cfg = Config::default();
        cfg.min_distance = -1.0;
        assert_eq!(
            cfg.validated().unwrap_err(),
            ConfigError::NonPositiveConstant {
                name: "min_distance",
                value: -1.0
            }
        );

        let mut cfg = Config::default();
        cfg.speed = f32::NAN;
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn from_hex_parses_all_supported_forms() {
        let c = Rgba::from_hex("#ff0080").unwrap();
        assert_abs_diff_eq!(c.r, 1.0);
        assert_abs_diff_eq!(c.g, 0.0);
        assert_abs_diff_eq!(c.b, 128.0 / 255.0);
        assert_abs_diff_eq!(c.a, 1.0);

        // Shorthand expands each digit.
        assert_eq!(Rgba::from_hex("#f08").unwrap(), Rgba::from_hex("#ff0088").unwrap());

        // Explicit alpha, and the leading '#' is optional.
        let c = Rgba::from_hex("00000080").unwrap();
        assert_abs_diff_eq!(c.a, 128.0 / 255.0);
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        for bad in ["", "#12345", "#gggggg", "#ff00", "not a color", "#fféé00"] {
            assert!(
                matches!(Rgba::from_hex(bad), Err(ConfigError::InvalidColor(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }
}
