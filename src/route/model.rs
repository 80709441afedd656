//! Route and map records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// First path letter of every section
pub const FIRST_PATH: char = 'A';

/// Last letter a map may allow
pub const LAST_PATH: char = 'Z';

/// One user's claim on one grid slot of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Explicit id; when absent the key is derived from the other fields
    pub id: Option<String>,
    pub user_id: String,
    pub channel_id: String,
    /// 1-based section number
    pub section: u32,
    /// Uppercase path letter
    pub path: char,
}

impl Route {
    /// Create a route whose key is derived from its fields
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        section: u32,
        path: char,
    ) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            section,
            path: path.to_ascii_uppercase(),
        }
    }

    /// Use an explicit id instead of the derived one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The storage identity of this route
    ///
    /// `user:channel:section:path` unless an explicit id was set, so a derived
    /// key doubles as a uniqueness constraint on the tuple.
    pub fn id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!(
                "{}:{}:{}:{}",
                self.user_id, self.channel_id, self.section, self.path
            ),
        }
    }

    /// The storage key of this route
    pub fn key(&self) -> Vec<u8> {
        self.id().into_bytes()
    }

    /// Whether this route claims `(section, path)` for `user_id`
    pub fn occupies(&self, user_id: &str, section: u32, path: char) -> bool {
        self.user_id == user_id && self.section == section && self.path == path
    }
}

/// The assignable grid of a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMap {
    /// Channel id
    pub id: String,
    pub sections: u8,
    /// Last valid path letter of each section, `max_paths[0]` for section 1
    pub max_paths: Vec<char>,
}

impl ChannelMap {
    /// Build and validate a map
    ///
    /// `max_paths` holds one letter per section; letters are upper-cased.
    pub fn new<S: AsRef<str>>(
        channel_id: impl Into<String>,
        sections: u8,
        max_paths: &[S],
    ) -> Result<Self> {
        if sections < 1 {
            return Err(RouteError::out_of_range("sections", "Must be greater than 0"));
        }

        let mut letters = Vec::with_capacity(max_paths.len());
        for (i, raw) in max_paths.iter().enumerate() {
            let param = format!("max_paths[{}]", i);
            let letter = parse_letter(raw.as_ref()).map_err(|message| {
                RouteError::invalid(
                    &param,
                    format!(r#"Invalid argument "{}". {}"#, raw.as_ref(), message),
                )
            })?;
            letters.push(letter);
        }

        if letters.len() != sections as usize {
            return Err(RouteError::invalid(
                "max_paths",
                format!(
                    "Wrong number of max path elements for sections specified (have {}, need {})",
                    letters.len(),
                    sections
                ),
            ));
        }

        Ok(Self {
            id: channel_id.into(),
            sections,
            max_paths: letters,
        })
    }

    /// Last valid path of `section`, `None` when the section is off the map
    pub fn max_path(&self, section: u32) -> Option<char> {
        if section < 1 {
            return None;
        }
        self.max_paths.get(section as usize - 1).copied()
    }

    /// Every valid path of `section`, in order
    pub fn paths(&self, section: u32) -> Vec<char> {
        match self.max_path(section) {
            Some(max) => (FIRST_PATH..=max).collect(),
            None => Vec::new(),
        }
    }

    /// Whether `path` is valid for `section`
    pub fn is_valid_path(&self, section: u32, path: char) -> bool {
        let path = path.to_ascii_uppercase();
        self.max_path(section)
            .map_or(false, |max| (FIRST_PATH..=max).contains(&path))
    }

    /// Reject a section outside `1..=sections`
    pub fn check_section(&self, section: u32) -> Result<()> {
        if section < 1 || section > u32::from(self.sections) {
            return Err(RouteError::out_of_range(
                "section",
                format!("Must be between 1 and {} (inclusive)", self.sections),
            ));
        }
        Ok(())
    }

    /// Reject a section/path pair outside the grid
    pub fn check_slot(&self, section: u32, path: char) -> Result<()> {
        self.check_section(section)?;
        if !self.is_valid_path(section, path) {
            let max = self.max_path(section).unwrap_or(FIRST_PATH);
            return Err(RouteError::out_of_range(
                "path",
                format!("Must be between {} and {} (inclusive)", FIRST_PATH, max),
            ));
        }
        Ok(())
    }

    /// Sections in display order
    pub fn section_numbers(&self) -> impl Iterator<Item = u32> {
        1..=u32::from(self.sections)
    }
}

impl fmt::Display for ChannelMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let maxes: Vec<String> = self.max_paths.iter().map(char::to_string).collect();
        write!(f, "{} sections ({})", self.sections, maxes.join(", "))
    }
}

/// Parse a path argument into an uppercase letter
pub fn parse_path(raw: &str) -> Result<char> {
    parse_letter(raw).map_err(|message| RouteError::invalid("path", message))
}

fn parse_letter(raw: &str) -> std::result::Result<char, &'static str> {
    let mut chars = raw.trim().chars();
    let letter = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_ascii_uppercase(),
        _ => return Err("Must be a single character"),
    };
    if !(FIRST_PATH..=LAST_PATH).contains(&letter) {
        return Err("Must be a letter between A and Z");
    }
    Ok(letter)
}
