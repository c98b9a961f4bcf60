//! Region hierarchy selection: continent -> country -> state -> county.
//!
//! Choosing a level clears every level below it. States and counties only
//! exist under the US. A setter that would break the hierarchy is refused
//! (returns `false`) and leaves the selection untouched.
//!
//! Deserialized selections go through the same setters, so a saved or
//! hand-written state file can never hold a county outside its state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::projection::Projection;
use crate::regions::{self, Continent, COUNTY_CODE_WIDTH, STATE_CODE_WIDTH, US_COUNTRY_CODE};

/// Does `county` (5-digit FIPS) belong to `state` (2-digit FIPS)?
pub fn county_in_state(county: &str, state: &str) -> bool {
    county.len() > STATE_CODE_WIDTH && state.len() == STATE_CODE_WIDTH && county.starts_with(state)
}

/// Which "include borders" toggles make sense for the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderToggles {
    pub country: bool,
    pub state: bool,
    pub county: bool,
}

/// Full UI selection state; `None` at a level means "all".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct Selection {
    continent: Option<Continent>,
    country: Option<String>,
    state: Option<String>,
    county: Option<String>,
    pub include_country_borders: bool,
    pub include_state_borders: bool,
    pub include_county_borders: bool,
    pub projection: Projection,
    pub graticule: bool,
}

/// Wire shape of a selection, before the hierarchy is checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSelection {
    continent: Option<Continent>,
    country: Option<String>,
    state: Option<String>,
    county: Option<String>,
    include_country_borders: bool,
    include_state_borders: bool,
    include_county_borders: bool,
    projection: Projection,
    graticule: bool,
}

impl From<RawSelection> for Selection {
    /// Levels that break the hierarchy fall back to "all", with their descendants.
    fn from(raw: RawSelection) -> Self {
        let mut selection = Selection::new().with_continent(raw.continent);
        let accepted = selection.set_country(raw.country.as_deref())
            && selection.set_state(raw.state.as_deref())
            && selection.set_county(raw.county.as_deref());
        if !accepted {
            debug!(
                country = ?raw.country,
                state = ?raw.state,
                county = ?raw.county,
                "selection breaks the region hierarchy, truncated"
            );
        }
        selection.include_country_borders = raw.include_country_borders;
        selection.include_state_borders = raw.include_state_borders;
        selection.include_county_borders = raw.include_county_borders;
        selection.projection = raw.projection;
        selection.graticule = raw.graticule;
        selection
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continent(&self) -> Option<Continent> {
        self.continent
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    /// Is the US the selected country?
    pub fn is_us(&self) -> bool {
        self.country() == Some(US_COUNTRY_CODE)
    }

    /// US chosen from within North America; the only place sub-national
    /// border toggles are offered.
    fn is_us_in_north_america(&self) -> bool {
        self.continent == Some(Continent::NorthAmerica) && self.is_us()
    }

    /// Choose a continent (or all). Clears country, state and county.
    pub fn set_continent(&mut self, continent: Option<Continent>) {
        self.continent = continent;
        self.country = None;
        self.state = None;
        self.county = None;
    }

    /// Choose a country (or all). Clears state and county.
    ///
    /// Refused when the country is not on the chosen continent.
    pub fn set_country(&mut self, country: Option<&str>) -> bool {
        let country = country.map(regions::canonical_code);
        if let (Some(code), Some(continent)) = (country.as_deref(), self.continent) {
            if regions::continent_of(code) != continent {
                return false;
            }
        }
        self.country = country;
        self.state = None;
        self.county = None;
        true
    }

    /// Choose a state (or all). Only valid under the US. Clears county.
    pub fn set_state(&mut self, state: Option<&str>) -> bool {
        if state.is_some() && !self.is_us() {
            return false;
        }
        self.state = state.map(|code| regions::pad_code(code, STATE_CODE_WIDTH));
        self.county = None;
        true
    }

    /// Choose a county (or all). It must lie in the chosen state.
    pub fn set_county(&mut self, county: Option<&str>) -> bool {
        let county = county.map(|code| regions::pad_code(code, COUNTY_CODE_WIDTH));
        if let Some(code) = county.as_deref() {
            match self.state() {
                Some(state) if county_in_state(code, state) => {}
                _ => return false,
            }
        }
        self.county = county;
        true
    }

    pub fn with_continent(mut self, continent: Option<Continent>) -> Self {
        self.set_continent(continent);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_graticule(mut self, graticule: bool) -> Self {
        self.graticule = graticule;
        self
    }

    /// Which border toggles apply at this depth.
    pub fn border_toggles(&self) -> BorderToggles {
        let nothing_below_continent = self.country.is_none() && self.state.is_none() && self.county.is_none();
        BorderToggles {
            country: nothing_below_continent,
            state: self.is_us_in_north_america() && self.state.is_none() && self.county.is_none(),
            county: self.is_us_in_north_america() && self.county.is_none(),
        }
    }

    /// Border flags, masked by which toggles are actually offered.
    pub fn effective_borders(&self) -> BorderToggles {
        let toggles = self.border_toggles();
        BorderToggles {
            country: toggles.country && self.include_country_borders,
            state: toggles.state && self.include_state_borders,
            county: toggles.county && self.include_county_borders,
        }
    }

    /// Whole-collection render: no state or county narrows the view.
    pub fn is_whole_collection(&self) -> bool {
        self.state.is_none() && self.county.is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
