//! User configuration options.

use crate::{BASE_DIR, CLIOptions};
use dirs::config_dir;
use level::{MapData, MapError, fixtures};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fs::{File, OpenOptions, create_dir_all},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> io::Result<PathBuf> {
    let mut dir = config_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{LOG_TAG}: Couldn't open user config dir"),
        )
    })?;
    dir.push(BASE_DIR);
    if !dir.exists() {
        create_dir_all(&dir)?;
    }
    dir.push("user.toml");
    Ok(dir)
}

#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum MapChoice {
    /// Two rooms, the far one with a raised floor
    #[default]
    TwoRooms,
    /// One room looking at a vertex where two others meet
    Junction,
    /// One room with two doorways leading to polygons 5 and 12
    TwoPortals,
    /// A straight run of rooms
    Corridor,
}

impl MapChoice {
    pub fn build(self, rooms: usize) -> Result<MapData, MapError> {
        match self {
            Self::TwoRooms => fixtures::two_rooms(),
            Self::Junction => fixtures::junction(),
            Self::TwoPortals => fixtures::two_portals(5, 12),
            Self::Corridor => fixtures::corridor(rooms.max(1)),
        }
    }

    /// Where the viewer stands, and in which polygon
    pub fn start(self) -> (i32, i32, usize) {
        match self {
            Self::Corridor => (128, 256, 0),
            _ => (512, 512, 0),
        }
    }
}

impl FromStr for MapChoice {
    type Err = io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tworooms" => Ok(Self::TwoRooms),
            "junction" => Ok(Self::Junction),
            "twoportals" => Ok(Self::TwoPortals),
            "corridor" => Ok(Self::Corridor),
            _ => Err(io::Error::new(io::ErrorKind::Unsupported, "Invalid map")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    pub width: usize,
    pub height: usize,
    pub field_of_view: f32,
    pub frames: u32,
    pub turn: f32,
    pub map: MapChoice,
    pub corridor_rooms: usize,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            field_of_view: 90.0,
            frames: 1,
            turn: 1.0,
            map: MapChoice::default(),
            corridor_rooms: 16,
        }
    }
}

impl UserConfig {
    /// `load` reads the config file, recreating it if it is empty or can't be
    /// parsed
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let path = get_cfg_file()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        let mut buf = String::new();
        let read_len = file.read_to_string(&mut buf)?;
        if read_len != 0 {
            if let Ok(data) = toml::from_str(&buf) {
                info!(target: LOG_TAG, "Loaded user config file");
                return Ok(data);
            }
            warn!("Could not deserialise {:?} recreating config", path);
        }
        UserConfig::create_default(&path)
    }

    fn create_default(path: &Path) -> Result<Self, Box<dyn Error>> {
        let config = UserConfig::default();
        info!("Created default user config file");
        let data = toml::to_string(&config)?;
        File::create(path)?.write_all(data.as_bytes())?;
        info!("Saved user config to {:?}", path);
        Ok(config)
    }

    pub fn write(&self) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(get_cfg_file()?)?;
        let data = toml::to_string_pretty(self)?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!("Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if cli.frames != 0 && cli.frames != self.frames {
            self.frames = cli.frames;
        } else {
            cli.frames = self.frames;
        }

        if cli.rooms != 0 && cli.rooms != self.corridor_rooms {
            self.corridor_rooms = cli.rooms;
        } else {
            cli.rooms = self.corridor_rooms;
        }

        if let Some(fov) = cli.fov {
            if fov > 0.0 && fov < 180.0 {
                self.field_of_view = fov;
            } else {
                warn!("Field of view {fov} out of range, keeping {}", self.field_of_view);
                cli.fov = Some(self.field_of_view);
            }
        } else {
            cli.fov = Some(self.field_of_view);
        }

        if let Some(turn) = cli.turn {
            self.turn = turn;
        } else {
            cli.turn = Some(self.turn);
        }

        if let Some(map) = cli.map {
            if map != self.map {
                self.map = map;
                info!("Map changed to: {:?}", map);
            }
        } else {
            cli.map = Some(self.map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MapChoice, UserConfig};
    use crate::CLIOptions;

    fn empty_cli() -> CLIOptions {
        CLIOptions {
            verbose: None,
            map: None,
            rooms: 0,
            width: 0,
            height: 0,
            fov: None,
            frames: 0,
            turn: None,
            dump: false,
        }
    }

    #[test]
    fn empty_cli_takes_config_values() {
        let mut config = UserConfig::default();
        let mut cli = empty_cli();
        config.sync_cli(&mut cli);

        assert_eq!(config, UserConfig::default());
        assert_eq!(cli.width, 640);
        assert_eq!(cli.height, 480);
        assert_eq!(cli.fov, Some(90.0));
        assert_eq!(cli.map, Some(MapChoice::TwoRooms));
        assert_eq!(cli.rooms, 16);
    }

    #[test]
    fn cli_overrides_config() {
        let mut config = UserConfig::default();
        let mut cli = CLIOptions {
            width: 320,
            fov: Some(60.0),
            map: Some(MapChoice::Corridor),
            ..empty_cli()
        };
        config.sync_cli(&mut cli);

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.field_of_view, 60.0);
        assert_eq!(config.map, MapChoice::Corridor);
    }

    #[test]
    fn bad_fov_is_ignored() {
        let mut config = UserConfig::default();
        let mut cli = CLIOptions {
            fov: Some(200.0),
            ..empty_cli()
        };
        config.sync_cli(&mut cli);
        assert_eq!(config.field_of_view, 90.0);
        assert_eq!(cli.fov, Some(90.0));
    }

    #[test]
    fn config_survives_toml() {
        let config = UserConfig {
            map: MapChoice::Junction,
            frames: 30,
            ..UserConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: UserConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn map_names() {
        assert_eq!("TwoPortals".parse::<MapChoice>().unwrap(), MapChoice::TwoPortals);
        assert_eq!("corridor".parse::<MapChoice>().unwrap(), MapChoice::Corridor);
        assert!("e1m1".parse::<MapChoice>().is_err());
    }

    #[test]
    fn every_map_builds() {
        for map in [
            MapChoice::TwoRooms,
            MapChoice::Junction,
            MapChoice::TwoPortals,
            MapChoice::Corridor,
        ] {
            let data = map.build(4).unwrap();
            let (_, _, polygon) = map.start();
            assert!(polygon < data.polygons().len());
        }
    }
}
