use crate::chain::radius_for;
use crate::error::{OverlayError, Result};
use crate::sample::{Rgba, DEFAULT_PALETTE, PALETTE_HEX};
use crate::surface::SurfaceSize;
use log::LevelFilter;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Page color the layers are composited over.
    pub page_color: Rgba,
    pub vsync: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: "Portfolio".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            page_color: Rgba::rgb(0x0f, 0x17, 0x2a),
            vsync: true,
        }
    }
}

impl DisplayConfig {
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrailConfig {
    pub dots: usize,
    pub trail_length: usize,
    /// Fraction of the remaining distance closed per frame.
    pub easing: f64,
    pub palette: Vec<Rgba>,
    pub fill_alpha: u8,
}

impl Default for TrailConfig {
    fn default() -> Self {
        TrailConfig {
            dots: 12,
            trail_length: 18,
            easing: 0.25,
            palette: DEFAULT_PALETTE.to_vec(),
            fill_alpha: 0xcc,
        }
    }
}

impl TrailConfig {
    pub fn with_palette_hex(mut self, palette: &[&str]) -> Result<Self> {
        self.palette = palette
            .iter()
            .map(|hex| Rgba::from_hex(hex))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn sample_count(&self) -> usize {
        self.dots * self.trail_length
    }

    pub fn validate(&self) -> Result<()> {
        if self.dots == 0 || self.trail_length == 0 {
            return Err(OverlayError::InvalidConfig(
                "trail needs at least one dot".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(OverlayError::InvalidConfig("empty palette".to_string()));
        }
        if !(self.easing > 0.0 && self.easing <= 1.0) {
            return Err(OverlayError::InvalidConfig(format!(
                "easing {} outside (0, 1]",
                self.easing
            )));
        }
        if radius_for(self.trail_length - 1, self.trail_length) <= 0.0 {
            return Err(OverlayError::InvalidConfig(format!(
                "trail length {} shrinks the last dot to nothing",
                self.trail_length
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundConfig {
    pub enabled: bool,
    /// Particles per density area.
    pub particle_count: usize,
    /// Density area, in thousands of square pixels.
    pub density_area: f64,
    pub color: Rgba,
    pub particle_opacity: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Pixels per frame.
    pub speed: f64,
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    pub grab_distance: f64,
    pub grab_opacity: f64,
    pub seed: u128,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        BackgroundConfig {
            enabled: false,
            particle_count: 45,
            density_area: 900.0,
            color: Rgba::rgb(0xcc, 0xcc, 0xcc),
            particle_opacity: 0.5,
            min_radius: 1.0,
            max_radius: 3.0,
            speed: 1.2,
            link_distance: 150.0,
            link_opacity: 0.25,
            link_width: 1.2,
            grab_distance: 140.0,
            grab_opacity: 0.4,
            seed: 0xcafef00dd15ea5e5,
        }
    }
}

impl BackgroundConfig {
    /// Particle count scaled by surface area, at least one.
    pub fn particle_count_for(&self, size: SurfaceSize) -> usize {
        let scale = size.area() / (self.density_area * 1000.0);
        ((self.particle_count as f64 * scale).round() as usize).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 || self.density_area <= 0.0 {
            return Err(OverlayError::InvalidConfig(
                "background needs a positive density".to_string(),
            ));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(OverlayError::InvalidConfig(format!(
                "particle radius range {}..={} is empty",
                self.min_radius, self.max_radius
            )));
        }
        if self.link_distance <= 0.0 || self.grab_distance < 0.0 {
            return Err(OverlayError::InvalidConfig(
                "link distance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub pattern: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LevelFilter::Info,
            pattern: "{d(%H:%M:%S%.3f)} {h({l:<5})} {t} - {m}{n}".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayConfig {
    pub display: DisplayConfig,
    pub trail: TrailConfig,
    pub background: BackgroundConfig,
    pub logging: LoggingConfig,
}

impl OverlayConfig {
    /// Configuration of the desktop host: both layers on, trail colors taken
    /// from the stylesheet values.
    pub fn demo() -> Result<Self> {
        let mut config = OverlayConfig {
            trail: TrailConfig::default().with_palette_hex(&PALETTE_HEX)?,
            ..OverlayConfig::default()
        };
        config.background.enabled = true;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_trail_is_216_samples() {
        let config = TrailConfig::default();
        assert_eq!(config.sample_count(), 216);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_trails() {
        let mut config = TrailConfig::default();
        config.palette.clear();
        assert!(config.validate().is_err());

        let mut config = TrailConfig::default();
        config.easing = 0.0;
        assert!(config.validate().is_err());

        let mut config = TrailConfig::default();
        config.trail_length = 25;
        assert!(config.validate().is_err());

        // The last radius at 24 is 7 - 23 * 0.3 = 0.1, still visible.
        let mut config = TrailConfig::default();
        config.trail_length = 24;
        assert!(config.validate().is_ok());

        let mut config = TrailConfig::default();
        config.dots = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn palette_from_hex() {
        let config = TrailConfig::default()
            .with_palette_hex(&["#ff0000", "#00ff00", "#0000ff"])
            .unwrap();
        assert_eq!(config.palette.len(), 3);
        assert_eq!(config.palette[2], Rgba::rgb(0, 0, 255));
        assert!(TrailConfig::default().with_palette_hex(&["red"]).is_err());
    }

    #[test]
    fn particle_count_scales_with_area() {
        let config = BackgroundConfig::default();
        assert_eq!(config.particle_count_for(SurfaceSize::new(1000, 900)), 45);
        assert_eq!(config.particle_count_for(SurfaceSize::new(2000, 900)), 90);
        assert_eq!(config.particle_count_for(SurfaceSize::new(1, 1)), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn demo_enables_background() {
        assert!(!OverlayConfig::default().background.enabled);
        let demo = OverlayConfig::demo().unwrap();
        assert!(demo.background.enabled);
        assert_eq!(demo.trail, TrailConfig::default());
        assert_eq!(demo.trail.palette, DEFAULT_PALETTE.to_vec());
    }
}
