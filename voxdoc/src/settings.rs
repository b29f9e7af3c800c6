use voxdoc_core::{color::Color, state::shape::Shape};

const DOCUMENTATION: &str = r#"# Voxdoc settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing keys take their default value.

# history_size: how many undo steps are kept. Older steps are forgotten.
# log_level: one of "off", "error", "warn", "info", "debug", "trace".
# paint_color: [red, green, blue, alpha], 0 to 255, used by new shape layers.
# shape: one of "sphere", "cube", "cylinder", used by new shape layers.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub history_size: usize,
    pub log_level: String,
    pub paint_color: Color,
    pub shape: Shape,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            history_size: 64,
            log_level: "debug".to_owned(),
            paint_color: Color::WHITE,
            shape: Shape::Sphere,
            failed_to_load: false,
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";

    /// Settings from user preferences, or defaulted if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        let mut dir = preferences_dir();
        match dir.as_mut() {
            None => Self::no_path(),
            Some(dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(dir)
            }
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Settings> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&string)?;
            Ok(settings)
        };
        settings.unwrap_or_else(|_| Self::no_path())
    }
    /// Return true if loading user's settings failed, and defaults are in use.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// The log filter to install. Unrecognized levels fall back to debug.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Debug)
    }
    pub fn save(&self) -> anyhow::Result<std::path::PathBuf> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(&preferences, string)?;
        Ok(preferences)
    }
}

#[cfg(test)]
mod test {
    use super::Settings;
    use voxdoc_core::{color::Color, state::shape::Shape};

    #[test]
    fn partial_file() {
        let settings: Settings = toml::from_str("history_size = 3\nshape = \"cube\"").unwrap();
        assert_eq!(settings.history_size, 3);
        assert_eq!(settings.shape, Shape::Cube);
        assert_eq!(settings.paint_color, Color::WHITE);
        assert!(!settings.did_fail_to_load());
    }
    #[test]
    fn round_trip_with_header() {
        let settings = Settings {
            paint_color: Color::new(10, 20, 30, 255),
            log_level: "trace".to_owned(),
            ..Settings::default()
        };
        let string =
            super::DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(&settings).unwrap();
        let read: Settings = toml::from_str(&string).unwrap();
        assert_eq!(read, settings);
        assert_eq!(read.level_filter(), log::LevelFilter::Trace);
    }
    #[test]
    fn bad_level() {
        let settings = Settings {
            log_level: "loud".to_owned(),
            ..Settings::default()
        };
        assert_eq!(settings.level_filter(), log::LevelFilter::Debug);
    }
}
