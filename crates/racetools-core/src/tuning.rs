//! Suspension tunes
//!
//! A tune is a named set of front/rear suspension stiffness and camber values
//! for one car. Community presets can be copied into the user's own tune
//! library and any tune can be exported as a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::vehicle::{car_slug, DEFAULT_CAR};

/// File name used for the user's tune library
pub const TUNES_FILE_NAME: &str = "my_tunes.json";

/// Allowed suspension stiffness (min, max)
pub const SUSPENSION_RANGE: (f64, f64) = (1.0, 10.0);

/// Allowed camber in degrees (min, max)
pub const CAMBER_RANGE: (f64, f64) = (-5.0, 2.0);

/// Errors from the tune library
#[derive(Error, Debug)]
pub enum TuneError {
    /// A tune needs a non-blank name
    #[error("Tune name must not be empty")]
    EmptyName,

    /// No community preset or saved tune matched
    #[error("Tune not found: {0}")]
    NotFound(String),

    /// Reading or writing the library file failed
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The library file or an export could not be (de)serialized
    #[error("Invalid tune data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// A front/rear value pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxlePair {
    /// Front axle value
    pub front: f64,
    /// Rear axle value
    pub rear: f64,
}

impl AxlePair {
    /// Pair from front and rear values
    pub const fn new(front: f64, rear: f64) -> Self {
        Self { front, rear }
    }

    fn clamped(self, (min, max): (f64, f64)) -> Self {
        Self {
            front: self.front.clamp(min, max),
            rear: self.rear.clamp(min, max),
        }
    }
}

/// Suspension and camber settings of a tune
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuneSettings {
    /// Spring stiffness, 1 (soft) to 10 (stiff)
    pub suspension: AxlePair,
    /// Camber in degrees, negative tilts the top of the wheel inward
    pub camber: AxlePair,
}

impl Default for TuneSettings {
    fn default() -> Self {
        Self {
            suspension: AxlePair::new(7.0, 6.5),
            camber: AxlePair::new(-2.0, -1.5),
        }
    }
}

impl TuneSettings {
    /// Settings with every value pulled into [`SUSPENSION_RANGE`] / [`CAMBER_RANGE`]
    pub fn clamped(self) -> Self {
        Self {
            suspension: self.suspension.clamped(SUSPENSION_RANGE),
            camber: self.camber.clamped(CAMBER_RANGE),
        }
    }
}

/// A named tune for one car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tune {
    /// Display name
    #[serde(default = "default_tune_name")]
    pub name: String,

    /// Car model the tune is meant for
    #[serde(default = "default_tune_car")]
    pub car: String,

    /// Suspension and camber values
    #[serde(default)]
    pub settings: TuneSettings,
}

fn default_tune_name() -> String {
    "My Track Setup".to_string()
}

fn default_tune_car() -> String {
    DEFAULT_CAR.to_string()
}

impl Default for Tune {
    fn default() -> Self {
        Self {
            name: default_tune_name(),
            car: default_tune_car(),
            settings: TuneSettings::default(),
        }
    }
}

impl Tune {
    /// Copy of a community preset, named `"<title> (Copy)"`
    pub fn from_community(preset: &CommunityTune) -> Self {
        Self {
            name: format!("{} (Copy)", preset.title),
            car: preset.car.to_string(),
            settings: preset.settings,
        }
    }

    /// Pretty JSON document for export
    pub fn to_json(&self) -> Result<String, TuneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested export file name, e.g. `1993-mazda-rx-7-tune.json`
    pub fn file_name(&self) -> String {
        format!("{}-tune.json", car_slug(&self.car))
    }

    /// Write the export into `dir` under [`Tune::file_name`]
    pub fn export_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, TuneError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_json()?)?;
        tracing::info!("Exported tune '{}' to {}", self.name, path.display());
        Ok(path)
    }
}

/// A shared preset from the community catalogue
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommunityTune {
    /// Catalogue id
    pub id: u32,
    /// Preset title
    pub title: &'static str,
    /// Car model
    pub car: &'static str,
    /// Who published it
    pub author: &'static str,
    /// Like count
    pub likes: u32,
    /// Download count
    pub downloads: u32,
    /// Suspension and camber values
    pub settings: TuneSettings,
}

/// Community presets
pub const COMMUNITY_TUNES: &[CommunityTune] = &[
    CommunityTune {
        id: 1,
        title: "Track Day Special",
        car: "1999 Mitsubishi Eclipse GSX",
        author: "SpeedMaster",
        likes: 342,
        downloads: 1203,
        settings: TuneSettings {
            suspension: AxlePair::new(7.2, 6.8),
            camber: AxlePair::new(-2.5, -1.8),
        },
    },
    CommunityTune {
        id: 2,
        title: "Drift King Setup",
        car: "1993 Mazda RX-7",
        author: "DriftHero",
        likes: 521,
        downloads: 1876,
        settings: TuneSettings {
            suspension: AxlePair::new(5.8, 6.2),
            camber: AxlePair::new(-3.5, -2.0),
        },
    },
    CommunityTune {
        id: 3,
        title: "Laguna Seca Dominator",
        car: "2004 Chevrolet Corvette Z06",
        author: "TrackAddict",
        likes: 287,
        downloads: 943,
        settings: TuneSettings {
            suspension: AxlePair::new(8.5, 8.2),
            camber: AxlePair::new(-2.0, -1.5),
        },
    },
];

/// Look up a community preset by id
pub fn find_community_tune(id: u32) -> Option<&'static CommunityTune> {
    COMMUNITY_TUNES.iter().find(|t| t.id == id)
}

/// The user's own tunes, kept in save order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuneLibrary {
    #[serde(default)]
    tunes: Vec<Tune>,
}

impl TuneLibrary {
    /// Empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Tunes in save order
    pub fn tunes(&self) -> &[Tune] {
        &self.tunes
    }

    /// Find a tune by name
    pub fn get(&self, name: &str) -> Option<&Tune> {
        self.tunes.iter().find(|t| t.name == name)
    }

    /// Save a tune, replacing any tune with the same name
    pub fn save(&mut self, tune: Tune) -> Result<&Tune, TuneError> {
        if tune.name.trim().is_empty() {
            return Err(TuneError::EmptyName);
        }
        let index = match self.tunes.iter().position(|t| t.name == tune.name) {
            Some(index) => {
                self.tunes[index] = tune;
                index
            }
            None => {
                self.tunes.push(tune);
                self.tunes.len() - 1
            }
        };
        Ok(&self.tunes[index])
    }

    /// Copy a community preset into the library
    pub fn copy_community(&mut self, id: u32) -> Result<&Tune, TuneError> {
        let preset =
            find_community_tune(id).ok_or_else(|| TuneError::NotFound(format!("community #{id}")))?;
        tracing::info!("Copied community tune '{}'", preset.title);
        self.save(Tune::from_community(preset))
    }

    /// Load the library from `path`, empty if the file is missing
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, TuneError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the library to `path`, creating parent directories
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), TuneError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
