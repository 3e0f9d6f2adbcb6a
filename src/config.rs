use serde::Deserialize;

/// RGB color, 0-255 per channel.
pub type Color = [u8; 3];

pub const BLACK: Color = [0, 0, 0];
pub const GRAY: Color = [128, 128, 128];
pub const GOLD: Color = [255, 215, 0];
pub const WHITE: Color = [255, 255, 255];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub font_size: f64,
    /// Figure size in inches (width, height).
    pub figure_size: (f64, f64),
    pub default_elev: f64,
    pub default_azim: f64,
    pub eye_colors: EyeColors,
    /// Colors used per arrow rotation when an analyser draws repeats.
    pub repeat_colors: Vec<Color>,
    pub flow_color: Color,
    /// Directory where the named illustration images live.
    pub asset_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EyeColors {
    pub left: Color,
    pub right: Color,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            figure_size: (16.0, 9.0),
            default_elev: 10.0,
            default_azim: 70.0,
            eye_colors: EyeColors::default(),
            repeat_colors: vec![[0, 128, 0], [255, 165, 0], [255, 192, 203]],
            flow_color: [148, 0, 211],
            asset_dir: "images".to_string(),
        }
    }
}

impl Default for EyeColors {
    fn default() -> Self {
        Self {
            left: [255, 0, 0],
            right: [0, 0, 255],
        }
    }
}

pub fn load() -> StyleConfig {
    let path = std::path::Path::new("oculomap.yaml");
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("failed to parse oculomap.yaml: {e}; using defaults");
                    StyleConfig::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read oculomap.yaml: {e}; using defaults");
                StyleConfig::default()
            }
        }
    } else {
        StyleConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = StyleConfig::default();
        assert_eq!(cfg.font_size, 12.0);
        assert_eq!(cfg.figure_size, (16.0, 9.0));
        assert_eq!(cfg.default_elev, 10.0);
        assert_eq!(cfg.default_azim, 70.0);
        assert_eq!(cfg.eye_colors.left, [255, 0, 0]);
        assert_eq!(cfg.eye_colors.right, [0, 0, 255]);
        assert_eq!(cfg.repeat_colors.len(), 3);
        assert_eq!(cfg.flow_color, [148, 0, 211]);
        assert_eq!(cfg.asset_dir, "images");
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "font_size: 14.0\nasset_dir: figs\n";
        let cfg: StyleConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.font_size, 14.0);
        assert_eq!(cfg.asset_dir, "figs");
        assert_eq!(cfg.default_elev, 10.0); // default
        assert_eq!(cfg.eye_colors.right, [0, 0, 255]); // default
    }

    #[test]
    fn test_eye_colors_yaml() {
        let yaml = "eye_colors:\n  left: [200, 10, 10]\n";
        let cfg: StyleConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.eye_colors.left, [200, 10, 10]);
        assert_eq!(cfg.eye_colors.right, [0, 0, 255]); // default
    }

    #[test]
    fn test_load_missing_file() {
        // When no oculomap.yaml exists, load() should return defaults
        let cfg = load();
        assert_eq!(cfg.font_size, 12.0);
        assert_eq!(cfg.default_azim, 70.0);
    }
}
