//! Entity tables of the wetland data platform.

/// Bump when the table layout changes.
pub(super) const SCHEMA_VERSION: i32 = 1;

pub(super) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS taxonomic_groups (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS species (
    id INTEGER PRIMARY KEY,
    scientific_name TEXT UNIQUE,
    common_name_fr TEXT,
    common_name_local TEXT,
    taxonomic_group_id INTEGER REFERENCES taxonomic_groups(id) ON DELETE SET NULL,
    iucn_status TEXT,
    national_status TEXT,
    description TEXT,
    CHECK (scientific_name IS NOT NULL OR common_name_fr IS NOT NULL OR common_name_local IS NOT NULL)
);

CREATE TABLE IF NOT EXISTS wetland_sites (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT UNIQUE,
    region TEXT,
    commune TEXT,
    area_hectares REAL,
    designation_date TEXT,
    is_ramsar_site INTEGER NOT NULL DEFAULT 0,
    description TEXT
);

CREATE TABLE IF NOT EXISTS observation_methods (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY,
    wetland_site_id INTEGER REFERENCES wetland_sites(id) ON DELETE CASCADE,
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    observation_date TEXT NOT NULL,
    observer_name TEXT,
    observation_method_id INTEGER REFERENCES observation_methods(id) ON DELETE SET NULL,
    count INTEGER,
    notes TEXT
);

CREATE TABLE IF NOT EXISTS site_species_inventory (
    id INTEGER PRIMARY KEY,
    site_id INTEGER NOT NULL REFERENCES wetland_sites(id) ON DELETE CASCADE,
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    notes TEXT,
    UNIQUE (site_id, species_id)
);

CREATE TABLE IF NOT EXISTS threat_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS threats (
    id INTEGER PRIMARY KEY,
    threat_type_id INTEGER NOT NULL REFERENCES threat_types(id) ON DELETE CASCADE,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS site_threats (
    id INTEGER PRIMARY KEY,
    site_id INTEGER NOT NULL REFERENCES wetland_sites(id) ON DELETE CASCADE,
    threat_id INTEGER NOT NULL REFERENCES threats(id) ON DELETE CASCADE,
    intensity TEXT,
    notes TEXT,
    UNIQUE (site_id, threat_id)
);

CREATE TABLE IF NOT EXISTS measure_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS conservation_measures (
    id INTEGER PRIMARY KEY,
    measure_type_id INTEGER NOT NULL REFERENCES measure_types(id) ON DELETE CASCADE,
    name TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS site_conservation_measures (
    id INTEGER PRIMARY KEY,
    site_id INTEGER NOT NULL REFERENCES wetland_sites(id) ON DELETE CASCADE,
    measure_id INTEGER NOT NULL REFERENCES conservation_measures(id) ON DELETE CASCADE,
    status TEXT,
    notes TEXT,
    UNIQUE (site_id, measure_id)
);

CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";
