//! City table: display name → forecast document identifier.

/// A city to rank, with the identifier used in the forecast URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub name: String,
    pub api_id: String,
}

impl City {
    pub fn new(name: &str, api_id: &str) -> Self {
        Self {
            name: name.to_string(),
            api_id: api_id.to_string(),
        }
    }
}

const DEFAULT_CITIES: &[(&str, &str)] = &[
    ("MOSCOW", "moscow"),
    ("PARIS", "paris"),
    ("LONDON", "london"),
    ("BERLIN", "berlin"),
    ("BEIJING", "beijing"),
    ("KAZAN", "kazan"),
    ("SPETERSBURG", "spetersburg"),
    ("VOLGOGRAD", "volgograd"),
    ("NOVOSIBIRSK", "novosibirsk"),
    ("KALININGRAD", "kaliningrad"),
    ("ABUDHABI", "abudhabi"),
    ("WARSZAWA", "warszawa"),
    ("BUCHAREST", "bucharest"),
    ("ROMA", "roma"),
    ("CAIRO", "cairo"),
];

/// The built-in city table.
pub fn default_cities() -> Vec<City> {
    DEFAULT_CITIES
        .iter()
        .map(|(name, id)| City::new(name, id))
        .collect()
}

/// Parse a `NAME=id,NAME=id` list.
///
/// Blank entries are skipped; an entry without `=` or with an empty side is
/// rejected, as is a repeated display name.
pub fn parse_cities(raw: &str) -> Result<Vec<City>, String> {
    let mut cities: Vec<City> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, id) = entry
            .split_once('=')
            .ok_or_else(|| format!("city entry '{}' must look like NAME=id", entry))?;
        let (name, id) = (name.trim(), id.trim());
        if name.is_empty() || id.is_empty() {
            return Err(format!("city entry '{}' has an empty name or id", entry));
        }
        if cities.iter().any(|c| c.name == name) {
            return Err(format!("city '{}' listed twice", name));
        }
        cities.push(City::new(name, id));
    }
    if cities.is_empty() {
        return Err("city list is empty".to_string());
    }
    Ok(cities)
}
