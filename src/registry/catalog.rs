//! Builtin sources and fields of the wetland data platform.

use super::{FieldDescriptor as F, Relation, SemanticType::*, SourceDescriptor};

pub(super) fn sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("wetland_sites", "Wetland sites", "wetland_sites")
            .with_description("Inventoried wetland sites, Ramsar-designated or not")
            .with_icon("fas fa-water")
            .with_relation(Relation::new("inventory", "site_species_inventory", "id", "site_id"))
            .with_relation(Relation::new("site_threats", "site_threats", "id", "site_id"))
            .with_relation(Relation::new("observations", "observations", "id", "wetland_site_id")),
        SourceDescriptor::new("species", "Species", "species")
            .with_description("Species recorded on the platform")
            .with_icon("fas fa-dove")
            .with_relation(Relation::new(
                "taxonomic_group",
                "taxonomic_groups",
                "taxonomic_group_id",
                "id",
            ))
            .with_relation(Relation::new("observations", "observations", "id", "species_id"))
            .with_relation(Relation::new("inventory", "site_species_inventory", "id", "species_id")),
        SourceDescriptor::new("observations", "Observations", "observations")
            .with_description("Field observations of species on wetland sites")
            .with_icon("fas fa-binoculars")
            .with_relation(Relation::new("species", "species", "species_id", "id"))
            .with_relation(
                Relation::new(
                    "species__taxonomic_group",
                    "taxonomic_groups",
                    "taxonomic_group_id",
                    "id",
                )
                .through("species"),
            )
            .with_relation(Relation::new("wetland_site", "wetland_sites", "wetland_site_id", "id"))
            .with_relation(Relation::new(
                "observation_method",
                "observation_methods",
                "observation_method_id",
                "id",
            )),
        SourceDescriptor::new("threats", "Threats", "site_threats")
            .with_description("Threats reported on wetland sites")
            .with_icon("fas fa-exclamation-triangle")
            .with_relation(Relation::new("threat", "threats", "threat_id", "id"))
            .with_relation(
                Relation::new("threat__threat_type", "threat_types", "threat_type_id", "id")
                    .through("threat"),
            )
            .with_relation(Relation::new("site", "wetland_sites", "site_id", "id")),
        SourceDescriptor::new(
            "conservation_measures",
            "Conservation measures",
            "site_conservation_measures",
        )
        .with_description("Conservation measures taken or proposed on wetland sites")
        .with_icon("fas fa-shield-alt")
        .with_relation(Relation::new("measure", "conservation_measures", "measure_id", "id"))
        .with_relation(
            Relation::new("measure__measure_type", "measure_types", "measure_type_id", "id")
                .through("measure"),
        )
        .with_relation(Relation::new("site", "wetland_sites", "site_id", "id")),
        SourceDescriptor::new("taxonomic_groups", "Taxonomic groups", "taxonomic_groups")
            .with_description("Taxonomic groups and the species they contain")
            .with_icon("fas fa-sitemap")
            .with_relation(Relation::new("species", "species", "id", "taxonomic_group_id"))
            .with_relation(
                Relation::new("species__observations", "observations", "id", "species_id")
                    .through("species"),
            ),
    ]
}

pub(super) fn fields() -> Vec<(String, Vec<F>)> {
    vec![
        (
            "wetland_sites".into(),
            vec![
                F::column("name", "Site name", Text),
                F::column("code", "Site code", Text),
                F::column("region", "Region (wilaya)", Categorical),
                F::column("commune", "Commune", Categorical),
                F::column("is_ramsar_site", "Ramsar site", Boolean),
                F::column("area_hectares", "Area (ha)", Numeric),
                F::column("designation_date", "Designation date", Date),
                F::year_of("designation_year", "Designation year", None, "designation_date"),
                F::count_of("species_count", "Number of species", Some("inventory"), "species_id"),
                F::count_of("threat_count", "Number of threats", Some("site_threats"), "threat_id"),
                F::count_of("observation_count", "Number of observations", Some("observations"), "id"),
            ],
        ),
        (
            "species".into(),
            vec![
                F::column("scientific_name", "Scientific name", Text),
                F::column("common_name_fr", "Common name (French)", Text),
                F::column("common_name_local", "Common name (local)", Text),
                F::related(
                    "taxonomic_group__name",
                    "Taxonomic group",
                    Categorical,
                    "taxonomic_group",
                    "name",
                ),
                F::column("iucn_status", "IUCN status", Categorical),
                F::column("national_status", "National status", Categorical),
                F::count_of("observation_count", "Number of observations", Some("observations"), "id"),
                F::count_of("site_count", "Number of sites", Some("inventory"), "site_id"),
            ],
        ),
        (
            "observations".into(),
            vec![
                F::related(
                    "species__scientific_name",
                    "Species",
                    Categorical,
                    "species",
                    "scientific_name",
                ),
                F::related(
                    "species__taxonomic_group__name",
                    "Taxonomic group",
                    Categorical,
                    "species__taxonomic_group",
                    "name",
                ),
                F::related("species__iucn_status", "IUCN status", Categorical, "species", "iucn_status"),
                F::related("wetland_site__name", "Site", Categorical, "wetland_site", "name"),
                F::related("wetland_site__region", "Region (wilaya)", Categorical, "wetland_site", "region"),
                F::related(
                    "observation_method__name",
                    "Observation method",
                    Categorical,
                    "observation_method",
                    "name",
                ),
                F::column("observer_name", "Observer", Text),
                F::column("observation_date", "Observation date", Date),
                F::year_of("observation_year", "Observation year", None, "observation_date"),
                F::column("count", "Individuals counted", Numeric),
                F::count_of("species_count", "Number of species", None, "species_id"),
            ],
        ),
        (
            "threats".into(),
            vec![
                F::related("threat__name", "Threat", Categorical, "threat", "name"),
                F::related(
                    "threat__threat_type__name",
                    "Threat type",
                    Categorical,
                    "threat__threat_type",
                    "name",
                ),
                F::related("site__name", "Site", Categorical, "site", "name"),
                F::related("site__region", "Region (wilaya)", Categorical, "site", "region"),
                F::column("intensity", "Intensity", Categorical),
                F::column("notes", "Notes", Text),
                F::count_of("site_count", "Number of sites", None, "site_id"),
                F::count_of("threat_count", "Number of threats", None, "threat_id"),
            ],
        ),
        (
            "conservation_measures".into(),
            vec![
                F::related("measure__name", "Measure", Categorical, "measure", "name"),
                F::related(
                    "measure__measure_type__name",
                    "Measure type",
                    Categorical,
                    "measure__measure_type",
                    "name",
                ),
                F::related("site__name", "Site", Categorical, "site", "name"),
                F::related("site__region", "Region (wilaya)", Categorical, "site", "region"),
                F::column("status", "Status", Categorical),
                F::column("notes", "Notes", Text),
                F::count_of("site_count", "Number of sites", None, "site_id"),
                F::count_of("measure_count", "Number of measures", None, "measure_id"),
            ],
        ),
        (
            "taxonomic_groups".into(),
            vec![
                F::column("name", "Group name", Categorical),
                F::column("description", "Description", Text),
                F::count_of("species_count", "Number of species", Some("species"), "id"),
                F::count_of(
                    "observation_count",
                    "Number of observations",
                    Some("species__observations"),
                    "id",
                ),
            ],
        ),
    ]
}
