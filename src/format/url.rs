//! Map links for a coordinate

use crate::coord::Coordinates;
use std::fmt;

/// Web map services a coordinate can be opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLink {
    Google,
    Apple,
    OpenStreetMap,
}

impl MapLink {
    pub const ALL: [MapLink; 3] = [MapLink::Google, MapLink::Apple, MapLink::OpenStreetMap];

    pub fn name(self) -> &'static str {
        match self {
            MapLink::Google => "Google Maps",
            MapLink::Apple => "Apple Maps",
            MapLink::OpenStreetMap => "OpenStreetMap",
        }
    }

    /// URL template; `{lat}` and `{lon}` are replaced
    fn template(self) -> &'static str {
        match self {
            MapLink::Google => "https://maps.google.com/?q={lat},{lon}",
            MapLink::Apple => "https://maps.apple.com/?q={lat},{lon}",
            MapLink::OpenStreetMap => "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}&zoom=15",
        }
    }

    pub fn url(self, coords: Coordinates) -> String {
        self.template()
            .replace("{lat}", &coords.lat.to_string())
            .replace("{lon}", &coords.lon.to_string())
    }
}

impl fmt::Display for MapLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `(name, url)` for every service
pub fn all_links(coords: Coordinates) -> Vec<(&'static str, String)> {
    MapLink::ALL.iter().map(|l| (l.name(), l.url(coords))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let nyc = Coordinates::new(40.7128, -74.0060);
        assert_eq!(MapLink::Google.url(nyc), "https://maps.google.com/?q=40.7128,-74.006");
        assert_eq!(MapLink::Apple.url(nyc), "https://maps.apple.com/?q=40.7128,-74.006");
        assert_eq!(
            MapLink::OpenStreetMap.url(nyc),
            "https://www.openstreetmap.org/?mlat=40.7128&mlon=-74.006&zoom=15"
        );
    }

    #[test]
    fn test_all_links() {
        let links = all_links(Coordinates::new(0.0, 0.0));
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].0, "Google Maps");
        assert!(links[2].1.contains("mlat=0&mlon=0"));
    }
}
