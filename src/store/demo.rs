//! A small demonstration data set (Mauritanian wetlands).

pub(super) const DEMO_DATA: &str = "
INSERT INTO taxonomic_groups (id, name, description) VALUES
    (1, 'Oiseaux', 'Avifaune des zones humides'),
    (2, 'Poissons', 'Ichtyofaune'),
    (3, 'Mammifères', NULL),
    (4, 'Reptiles', NULL);

INSERT INTO species (id, scientific_name, common_name_fr, taxonomic_group_id, iucn_status, national_status) VALUES
    (1, 'Phoenicopterus roseus', 'Flamant rose', 1, 'LC', NULL),
    (2, 'Platalea leucorodia', 'Spatule blanche', 1, 'LC', 'Protégée'),
    (3, 'Pelecanus onocrotalus', 'Pélican blanc', 1, 'LC', 'Protégée'),
    (4, 'Calidris alba', 'Bécasseau sanderling', 1, 'LC', NULL),
    (5, 'Mugil cephalus', 'Mulet cabot', 2, 'LC', NULL),
    (6, 'Monachus monachus', 'Phoque moine', 3, 'VU', 'Protégée'),
    (7, 'Chelonia mydas', 'Tortue verte', 4, 'EN', 'Protégée'),
    (8, 'Trichechus senegalensis', 'Lamantin d''Afrique', 3, 'VU', 'Protégée');

INSERT INTO wetland_sites (id, name, code, region, commune, area_hectares, designation_date, is_ramsar_site) VALUES
    (1, 'Parc National du Banc d''Arguin', 'RAMSAR-250', 'Dakhlet Nouadhibou', 'Nouamghar', 1200000, '1982-10-22', 1),
    (2, 'Parc National du Diawling', 'RAMSAR-666', 'Trarza', 'N''Diago', 15600, '1994-08-23', 1),
    (3, 'Chott Boul', 'RAMSAR-1046', 'Trarza', 'N''Diago', 15500, '2000-10-20', 1),
    (4, 'Lac de Mâl', 'RAMSAR-1902', 'Brakna', 'Mâl', 3500, '2009-02-02', 1),
    (5, 'Gâat Mahmoudé', 'RAMSAR-1901', 'Hodh Ech Chargui', NULL, 5000, '2009-02-02', 1),
    (6, 'Lac d''Aleg', 'ZH-ALEG', 'Brakna', 'Aleg', NULL, NULL, 0),
    (7, 'Lac de Kankossa', 'ZH-KANK', 'Assaba', 'Kankossa', 2200, NULL, 0);

INSERT INTO observation_methods (id, name) VALUES
    (1, 'Comptage au sol'),
    (2, 'Comptage aérien'),
    (3, 'Capture');

INSERT INTO observations (id, wetland_site_id, species_id, observation_date, observer_name, observation_method_id, count) VALUES
    (1, 1, 1, '2021-01-15', 'Équipe PNBA', 2, 24000),
    (2, 1, 4, '2021-01-15', 'Équipe PNBA', 2, 110000),
    (3, 1, 2, '2022-01-12', 'Équipe PNBA', 1, 6500),
    (4, 2, 1, '2021-02-03', 'Équipe PND', 1, 8000),
    (5, 2, 3, '2022-02-10', 'Équipe PND', 1, 1200),
    (6, 3, 1, '2022-02-11', 'Équipe PND', 1, NULL),
    (7, 4, 3, '2023-01-20', NULL, 1, 300),
    (8, 1, 6, '2023-05-05', 'CBD Habitat', 3, 2),
    (9, 1, 7, '2023-07-18', 'Équipe PNBA', NULL, 14),
    (10, 5, 5, '2023-09-01', NULL, 3, 40);

INSERT INTO site_species_inventory (site_id, species_id) VALUES
    (1, 1), (1, 2), (1, 4), (1, 6), (1, 7),
    (2, 1), (2, 3), (2, 5),
    (3, 1), (3, 2),
    (4, 3),
    (5, 5), (5, 8),
    (7, 3);

INSERT INTO threat_types (id, name) VALUES
    (1, 'Anthropique'),
    (2, 'Naturelle');

INSERT INTO threats (id, threat_type_id, name) VALUES
    (1, 1, 'Surpêche'),
    (2, 1, 'Pollution par hydrocarbures'),
    (3, 2, 'Ensablement'),
    (4, 2, 'Sécheresse'),
    (5, 1, 'Surpâturage');

INSERT INTO site_threats (site_id, threat_id, intensity) VALUES
    (1, 1, 'Élevée'), (1, 2, 'Moyenne'),
    (2, 3, 'Élevée'), (2, 4, 'Moyenne'),
    (3, 3, 'Moyenne'),
    (4, 4, 'Élevée'), (4, 5, 'Moyenne'),
    (5, 4, 'Élevée'),
    (6, 5, 'Faible'),
    (7, 4, NULL);

INSERT INTO measure_types (id, name) VALUES
    (1, 'Protection légale'),
    (2, 'Gestion'),
    (3, 'Sensibilisation');

INSERT INTO conservation_measures (id, measure_type_id, name) VALUES
    (1, 1, 'Classement en aire protégée'),
    (2, 2, 'Plan de gestion'),
    (3, 2, 'Gestion des crues artificielles'),
    (4, 3, 'Éducation environnementale');

INSERT INTO site_conservation_measures (site_id, measure_id, status) VALUES
    (1, 1, 'Réalisée'), (1, 2, 'En cours'), (1, 4, 'En cours'),
    (2, 1, 'Réalisée'), (2, 3, 'En cours'),
    (3, 2, 'Proposée'),
    (4, 2, 'Proposée'), (4, 4, 'Réalisée'),
    (5, 2, 'Proposée');
";
