//! Datasheet model types
//!
//! A datasheet is a revisioned report scoped to the national, local or
//! school level. Its identity key for uniqueness purposes is
//! (type, stage, year) plus the school reference for school sheets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::{ModelError, ModelResult};

/// Maximum title length in characters
pub const TITLE_MAX_LENGTH: usize = 100;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifier of a user account
    ActorId
);
entity_id!(
    /// Identifier of a school entity
    SchoolId
);
entity_id!(
    /// Identifier of a datasheet entity
    DatasheetId
);
entity_id!(
    /// Identifier of a single datasheet revision
    RevisionId
);

/// Datasheet bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasheetType {
    National,
    Local,
    School,
}

impl DatasheetType {
    /// All bundles in report order
    pub const ALL: [DatasheetType; 3] = [Self::National, Self::Local, Self::School];

    /// Machine name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::Local => "local",
            Self::School => "school",
        }
    }

    /// Human label
    pub fn label(&self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Local => "Local",
            Self::School => "School",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::National => "Represents a National datasheet.",
            Self::Local => "Represents a Local datasheet.",
            Self::School => "Represents a School datasheet.",
        }
    }

    /// Position in listings: national first, school last
    pub fn sort_weight(&self) -> u8 {
        match self {
            Self::National => 1,
            Self::Local => 2,
            Self::School => 3,
        }
    }

    /// Whether the identity key includes a school reference
    pub fn is_school_scoped(&self) -> bool {
        matches!(self, Self::School)
    }
}

impl fmt::Display for DatasheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasheetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "national" => Ok(Self::National),
            "local" => Ok(Self::Local),
            "school" => Ok(Self::School),
            other => Err(ModelError::UnknownType(other.to_string())),
        }
    }
}

/// Educational stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Primary,
    Secondary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            other => Err(ModelError::UnknownStage(other.to_string())),
        }
    }
}

/// Two-digit academic year code (24 = the year starting in 2024)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct YearCode(u8);

impl YearCode {
    pub fn new(code: u8) -> ModelResult<Self> {
        if code > 99 {
            return Err(ModelError::InvalidYear(i64::from(code)));
        }
        Ok(Self(code))
    }

    /// Code for the academic year that starts in `start_year`
    pub fn for_start_year(start_year: i32) -> Self {
        Self(start_year.rem_euclid(100) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for YearCode {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<YearCode> for u8 {
    fn from(value: YearCode) -> Self {
        value.0
    }
}

impl fmt::Display for YearCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Revision metadata carried by every saved revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionMetadata {
    /// Account that authored the revision
    pub author: Option<ActorId>,
    pub created: DateTime<Utc>,
    /// Free-text revision log message
    pub log: Option<String>,
}

/// A datasheet record, either saved or a candidate pending save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasheet {
    /// None until the record is first saved
    pub id: Option<DatasheetId>,
    pub revision_id: Option<RevisionId>,
    pub uuid: Uuid,
    pub bundle: DatasheetType,
    pub title: String,
    pub stage: Option<Stage>,
    pub year: Option<YearCode>,
    /// Required only for school datasheets
    pub school: Option<SchoolId>,
    pub owner: ActorId,
    pub published: bool,
    pub created: DateTime<Utc>,
    pub changed: DateTime<Utc>,
    pub revision: RevisionMetadata,
    /// SEN support percentage
    pub sen_support: Option<f64>,
    /// EHC plan percentage
    pub ehc_plan: Option<f64>,
}

impl Datasheet {
    /// Creates an unsaved, published datasheet owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidTitle` if the title is blank or longer
    /// than `TITLE_MAX_LENGTH` characters.
    pub fn new(bundle: DatasheetType, title: impl Into<String>, owner: ActorId) -> ModelResult<Self> {
        let title = title.into();
        validate_title(&title)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            revision_id: None,
            uuid: Uuid::new_v4(),
            bundle,
            title,
            stage: None,
            year: None,
            school: None,
            owner,
            published: true,
            created: now,
            changed: now,
            revision: RevisionMetadata {
                author: Some(owner),
                created: now,
                log: None,
            },
            sen_support: None,
            ehc_plan: None,
        })
    }

    /// Marks the record as saved under the given identity
    pub fn with_id(mut self, id: DatasheetId, revision_id: RevisionId) -> Self {
        self.id = Some(id);
        self.revision_id = Some(revision_id);
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage);
        self
    }

    pub fn with_year(mut self, year: YearCode) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_school(mut self, school: SchoolId) -> Self {
        self.school = Some(school);
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_figures(mut self, sen_support: Option<f64>, ehc_plan: Option<f64>) -> Self {
        self.sen_support = sen_support;
        self.ehc_plan = ehc_plan;
        self
    }

    /// True until the record has been assigned an id
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn is_owned_by(&self, actor: ActorId) -> bool {
        self.owner == actor
    }

    /// Cache tag identifying this record, e.g. `datasheet:12`
    pub fn cache_tag(&self) -> String {
        match self.id {
            Some(id) => format!("datasheet:{}", id),
            None => format!("datasheet:{}", self.uuid),
        }
    }
}

fn validate_title(title: &str) -> ModelResult<()> {
    if title.trim().is_empty() {
        return Err(ModelError::InvalidTitle("title is required".to_string()));
    }
    let len = title.chars().count();
    if len > TITLE_MAX_LENGTH {
        return Err(ModelError::InvalidTitle(format!(
            "{} characters exceeds maximum of {}",
            len, TITLE_MAX_LENGTH
        )));
    }
    Ok(())
}
