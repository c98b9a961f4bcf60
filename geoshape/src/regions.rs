//! Region lookup tables: continents, country membership, identifier patches.
//!
//! These are data, not logic. Corrections go in the tables, never in new
//! conditional branches.
//!
//! Country codes are ISO 3166-1 numeric, zero-padded to three digits the way
//! world boundary datasets store them ("004" Afghanistan, "840" USA).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::FeatureCollection;

/// The one country with a state/county hierarchy below it.
pub const US_COUNTRY_CODE: &str = "840";

/// FIPS code of the polar, non-contiguous state that renders poorly under
/// Mercator.
pub const ALASKA_STATE_CODE: &str = "02";

/// Continent grouping key. Serialized as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "AF")]
    Africa,
    #[serde(rename = "AN")]
    Antarctica,
    #[serde(rename = "AS")]
    Asia,
    #[serde(rename = "EU")]
    Europe,
    #[serde(rename = "NA")]
    NorthAmerica,
    #[serde(rename = "OC")]
    Oceania,
    #[serde(rename = "SA")]
    SouthAmerica,
    /// Fallback for features that no table can place.
    #[serde(rename = "??")]
    Unknown,
}

impl Continent {
    /// Every continent, `Unknown` last.
    pub fn all() -> &'static [Continent] {
        &[
            Continent::Africa,
            Continent::Antarctica,
            Continent::Asia,
            Continent::Europe,
            Continent::NorthAmerica,
            Continent::Oceania,
            Continent::SouthAmerica,
            Continent::Unknown,
        ]
    }

    /// Two-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Continent::Africa => "AF",
            Continent::Antarctica => "AN",
            Continent::Asia => "AS",
            Continent::Europe => "EU",
            Continent::NorthAmerica => "NA",
            Continent::Oceania => "OC",
            Continent::SouthAmerica => "SA",
            Continent::Unknown => "??",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Antarctica => "Antarctica",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
            Continent::Unknown => "Unknown",
        }
    }

    /// Parse a two-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Continent> {
        Continent::all()
            .iter()
            .copied()
            .find(|c| *c != Continent::Unknown && c.code().eq_ignore_ascii_case(code))
    }
}

/// Features some datasets ship without an id: display name -> reserved code.
pub const MISSING_ID_PATCHES: &[(&str, &str)] = &[
    ("Kosovo", "XK"),
    ("N. Cyprus", "XN"),
    ("Somaliland", "XS"),
];

/// Continents for reserved codes. Consulted only when the primary table has
/// no entry for a code.
pub const CONTINENT_OVERRIDES: &[(&str, Continent)] = &[
    ("XK", Continent::Europe),
    ("XN", Continent::Asia),
    ("XS", Continent::Africa),
];

use Continent::{
    Africa as AF, Antarctica as AN, Asia as AS, Europe as EU, NorthAmerica as NA, Oceania as OC,
    SouthAmerica as SA,
};

/// ISO 3166-1 numeric code -> continent. Sorted by code.
#[rustfmt::skip]
pub const COUNTRY_CONTINENTS: &[(&str, Continent)] = &[
    ("004", AS), ("008", EU), ("010", AN), ("012", AF), ("016", OC), ("020", EU),
    ("024", AF), ("028", NA), ("031", AS), ("032", SA), ("036", OC), ("040", EU),
    ("044", NA), ("048", AS), ("050", AS), ("051", AS), ("052", NA), ("056", EU),
    ("060", NA), ("064", AS), ("068", SA), ("070", EU), ("072", AF), ("074", AN),
    ("076", SA), ("084", NA), ("086", AS), ("090", OC), ("092", NA), ("096", AS),
    ("100", EU), ("104", AS), ("108", AF), ("112", EU), ("116", AS), ("120", AF),
    ("124", NA), ("132", AF), ("136", NA), ("140", AF), ("144", AS), ("148", AF),
    ("152", SA), ("156", AS), ("158", AS), ("162", AS), ("166", AS), ("170", SA),
    ("174", AF), ("175", AF), ("178", AF), ("180", AF), ("184", OC), ("188", NA),
    ("191", EU), ("192", NA), ("196", EU), ("203", EU), ("204", AF), ("208", EU),
    ("212", NA), ("214", NA), ("218", SA), ("222", NA), ("226", AF), ("231", AF),
    ("232", AF), ("233", EU), ("234", EU), ("238", SA), ("239", AN), ("242", OC),
    ("246", EU), ("248", EU), ("250", EU), ("254", SA), ("258", OC), ("260", AN),
    ("262", AF), ("266", AF), ("268", AS), ("270", AF), ("275", AS), ("276", EU),
    ("288", AF), ("292", EU), ("296", OC), ("300", EU), ("304", NA), ("308", NA),
    ("312", NA), ("316", OC), ("320", NA), ("324", AF), ("328", SA), ("332", NA),
    ("334", AN), ("336", EU), ("340", NA), ("344", AS), ("348", EU), ("352", EU),
    ("356", AS), ("360", AS), ("364", AS), ("368", AS), ("372", EU), ("376", AS),
    ("380", EU), ("384", AF), ("388", NA), ("392", AS), ("398", AS), ("400", AS),
    ("404", AF), ("408", AS), ("410", AS), ("414", AS), ("417", AS), ("418", AS),
    ("422", AS), ("426", AF), ("428", EU), ("430", AF), ("434", AF), ("438", EU),
    ("440", EU), ("442", EU), ("446", AS), ("450", AF), ("454", AF), ("458", AS),
    ("462", AS), ("466", AF), ("470", EU), ("474", NA), ("478", AF), ("480", AF),
    ("484", NA), ("492", EU), ("496", AS), ("498", EU), ("499", EU), ("500", NA),
    ("504", AF), ("508", AF), ("512", AS), ("516", AF), ("520", OC), ("524", AS),
    ("528", EU), ("531", NA), ("533", NA), ("534", NA), ("535", NA), ("540", OC),
    ("548", OC), ("554", OC), ("558", NA), ("562", AF), ("566", AF), ("570", OC),
    ("574", OC), ("578", EU), ("580", OC), ("581", OC), ("583", OC), ("584", OC),
    ("585", OC), ("586", AS), ("591", NA), ("598", OC), ("600", SA), ("604", SA),
    ("608", AS), ("612", OC), ("616", EU), ("620", EU), ("624", AF), ("626", OC),
    ("630", NA), ("634", AS), ("638", AF), ("642", EU), ("643", EU), ("646", AF),
    ("652", NA), ("654", AF), ("659", NA), ("660", NA), ("662", NA), ("663", NA),
    ("666", NA), ("670", NA), ("674", EU), ("678", AF), ("682", AS), ("686", AF),
    ("688", EU), ("690", AF), ("694", AF), ("702", AS), ("703", EU), ("704", AS),
    ("705", EU), ("706", AF), ("710", AF), ("716", AF), ("724", EU), ("728", AF),
    ("729", AF), ("732", AF), ("740", SA), ("744", EU), ("748", AF), ("752", EU),
    ("756", EU), ("760", AS), ("762", AS), ("764", AS), ("768", AF), ("772", OC),
    ("776", OC), ("780", NA), ("784", AS), ("788", AF), ("792", AS), ("795", AS),
    ("796", NA), ("798", OC), ("800", AF), ("804", EU), ("807", EU), ("818", AF),
    ("826", EU), ("831", EU), ("832", EU), ("833", EU), ("834", AF), ("840", NA),
    ("850", NA), ("854", AF), ("858", SA), ("860", AS), ("862", SA), ("876", OC),
    ("882", OC), ("887", AS), ("894", AF),
];

/// Digits in an ISO 3166-1 numeric country code.
pub const COUNTRY_CODE_WIDTH: usize = 3;
/// Digits in a state FIPS code.
pub const STATE_CODE_WIDTH: usize = 2;
/// Digits in a county FIPS code (state prefix included).
pub const COUNTY_CODE_WIDTH: usize = 5;

/// Zero-pad a purely numeric code to `width` digits. Datasets that store ids
/// as JSON numbers lose the leading zeros ("6" -> "06" for a state).
pub fn pad_code(code: &str, width: usize) -> String {
    let code = code.trim();
    if !code.is_empty() && code.len() < width && code.bytes().all(|b| b.is_ascii_digit()) {
        format!("{:0>width$}", code, width = width)
    } else {
        code.to_string()
    }
}

/// Zero-pad purely numeric country codes to three digits ("4" -> "004").
pub fn canonical_code(code: &str) -> String {
    pad_code(code, COUNTRY_CODE_WIDTH)
}

/// Pad every feature id in a collection to `width` digits.
pub fn canonicalize_ids(collection: &mut FeatureCollection, width: usize) {
    for feature in collection.features.iter_mut() {
        if let Some(id) = feature.id.as_mut() {
            *id = pad_code(id, width);
        }
    }
}

/// Reserved code for a feature that ships without an id.
pub fn patch_code_for(name: &str) -> Option<&'static str> {
    MISSING_ID_PATCHES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Assign reserved codes to features that lack an id, by display name.
///
/// Returns how many features were patched. Features with no matching entry
/// keep `id: None` and are grouped as `Continent::Unknown` downstream.
pub fn patch_missing_ids(collection: &mut FeatureCollection) -> usize {
    let mut patched = 0;
    for feature in collection.features.iter_mut().filter(|f| f.id.is_none()) {
        match patch_code_for(&feature.name) {
            Some(code) => {
                feature.id = Some(code.to_string());
                patched += 1;
            }
            None => warn!(name = %feature.name, "feature has no id and no patch entry"),
        }
    }
    patched
}

/// Continent of a country code: primary table first, overrides second.
pub fn continent_of(code: &str) -> Continent {
    let code = canonical_code(code);
    if let Ok(i) = COUNTRY_CONTINENTS.binary_search_by(|(c, _)| (*c).cmp(code.as_str())) {
        return COUNTRY_CONTINENTS[i].1;
    }
    CONTINENT_OVERRIDES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, continent)| *continent)
        .unwrap_or(Continent::Unknown)
}

/// Continent of a possibly-missing id, patching by name first.
pub fn classify(id: Option<&str>, name: Option<&str>) -> Continent {
    let code = id.or_else(|| name.and_then(patch_code_for));
    match code {
        Some(code) => continent_of(code),
        None => {
            warn!(name = name.unwrap_or(""), "unidentified geometry grouped as Unknown");
            Continent::Unknown
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundaryGeometry, Feature, LonLat, Polygon};

    fn feature(id: Option<&str>, name: &str) -> Feature {
        let ring = vec![LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0), LonLat::new(1.0, 1.0)];
        Feature::new(id.map(str::to_string), name, BoundaryGeometry::Polygon(Polygon::new(ring)))
    }

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in COUNTRY_CONTINENTS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} must sort before {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn numeric_codes_are_padded_per_level() {
        assert_eq!(canonical_code("36"), "036");
        assert_eq!(canonical_code("XK"), "XK");
        assert_eq!(pad_code("6", STATE_CODE_WIDTH), "06");
        assert_eq!(pad_code("6037", COUNTY_CODE_WIDTH), "06037");
        assert_eq!(pad_code("840", COUNTRY_CODE_WIDTH), "840");
    }

    #[test]
    fn known_countries() {
        assert_eq!(continent_of("840"), Continent::NorthAmerica);
        assert_eq!(continent_of("250"), Continent::Europe);
        assert_eq!(continent_of("036"), Continent::Oceania);
        assert_eq!(continent_of("36"), Continent::Oceania);
        assert_eq!(continent_of("076"), Continent::SouthAmerica);
        assert_eq!(continent_of("010"), Continent::Antarctica);
    }

    #[test]
    fn overrides_apply_only_when_primary_misses() {
        assert_eq!(continent_of("XK"), Continent::Europe);
        assert_eq!(continent_of("XN"), Continent::Asia);
        assert_eq!(continent_of("XS"), Continent::Africa);
        assert_eq!(continent_of("ZZ"), Continent::Unknown);
    }

    #[test]
    fn patches_missing_ids_by_name() {
        let mut fc = FeatureCollection::new(vec![
            feature(None, "Kosovo"),
            feature(Some("250"), "France"),
            feature(None, "Atlantis"),
        ]);
        assert_eq!(patch_missing_ids(&mut fc), 1);
        assert_eq!(fc.features[0].id.as_deref(), Some("XK"));
        assert_eq!(fc.features[1].id.as_deref(), Some("250"));
        assert_eq!(fc.features[2].id, None);
    }

    #[test]
    fn classify_falls_back_to_unknown() {
        assert_eq!(classify(None, Some("Somaliland")), Continent::Africa);
        assert_eq!(classify(None, Some("Atlantis")), Continent::Unknown);
        assert_eq!(classify(None, None), Continent::Unknown);
        assert_eq!(classify(Some("392"), Some("Japan")), Continent::Asia);
    }

    #[test]
    fn continent_codes_round_trip() {
        for c in Continent::all().iter().filter(|c| **c != Continent::Unknown) {
            assert_eq!(Continent::from_code(c.code()), Some(*c));
        }
        assert_eq!(Continent::from_code("na"), Some(Continent::NorthAmerica));
        assert_eq!(Continent::from_code("??"), None);
    }
}
