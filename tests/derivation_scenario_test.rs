use anyhow::Result;
use particle_catalog::utils::validation::Validate;
use particle_catalog::{
    build_index, CatalogConfig, CatalogEngine, CatalogError, Dataset, DerivationOptions,
    JsonFileSource, ScientificNumber, StaticSource,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal_macros::dec;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn fixture_path() -> String {
    format!("{}/tests/fixtures/particles.json", env!("CARGO_MANIFEST_DIR"))
}

fn lepton_pair() -> serde_json::Value {
    json!({
        "Particles": [
            {
                "Reference": "r-electron-neutrino",
                "URLReference": "electron-neutrino",
                "MainSymbol": "\\nu_e",
                "RelativeCharge": "0",
                "Generation": 1,
                "Mass": "0",
                "Charge": "0",
                "MeanLifetime": "stable"
            },
            {
                "Reference": "r-electron",
                "URLReference": "electron",
                "MainSymbol": "e^-",
                "RelativeCharge": "-1",
                "Generation": 1,
                "Mass": [
                    {"Unit": "kg", "Rounding": "3sf", "Significand": "9.11", "Exponent": "-31"},
                    {"Unit": "MeV", "Rounding": "3sf", "Significand": "5.11", "Exponent": "-1"},
                    {"Unit": "u", "Rounding": "3sf", "Significand": "5.49", "Exponent": "-4"}
                ],
                "Charge": [
                    {"Unit": "C", "Rounding": "3sf", "Significand": "-1.60", "Exponent": "-19"}
                ],
                "MeanLifetime": "stable"
            }
        ]
    })
}

/// Neutrino and electron derived together: sentinels, formatting and hue bands.
#[test]
fn test_neutrino_and_electron_scenario() -> Result<()> {
    let dataset = Dataset::from_json_value(lepton_pair())?;
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let index = build_index(dataset, &DerivationOptions::default(), &mut rng)?;

    let neutrino = index.by_reference("r-electron-neutrino").expect("neutrino indexed");
    assert!(!neutrino.view.has_mass);
    assert_eq!(neutrino.view.mean_lifetime, "stable");
    assert!(neutrino.view.is_stable);
    assert!((70.0..=150.0).contains(&neutrino.view.hue));
    assert_eq!(neutrino.view.relative_charge, "0");

    let electron = index.by_reference("r-electron").expect("electron indexed");
    let expected_kg = ScientificNumber::from_parts(dec!(9.11), -31).format(3, false);
    assert_eq!(electron.view.mass_kg, expected_kg);
    assert_eq!(electron.view.mass_kg, "9.11 × 10^-31");
    assert_eq!(electron.view.mass_ev, "5.11 × 10^5");
    assert!(electron.view.has_mass);
    assert_eq!(electron.view.relative_charge, "&minus;1");
    assert!((205.0..=225.0).contains(&electron.view.hue));
    assert_eq!(electron.view.generation.as_deref(), Some("First"));

    Ok(())
}

/// The fixture document goes through the file source and the engine.
#[tokio::test]
async fn test_fixture_file_through_engine() -> Result<()> {
    let engine = CatalogEngine::new(
        JsonFileSource::new(fixture_path()),
        DerivationOptions::default(),
    );
    let index = engine.run(&mut ChaCha8Rng::seed_from_u64(1)).await?;

    assert_eq!(index.len(), 6);
    let references: Vec<&str> = index
        .derived_views()
        .iter()
        .map(|view| view.reference.as_str())
        .collect();
    assert_eq!(
        references,
        [
            "r-electron",
            "r-electron-neutrino",
            "r-up-quark",
            "r-muon",
            "r-w-boson",
            "r-photon"
        ]
    );

    let electron = index.view_by_url_slug("electron").expect("electron page");
    assert_eq!(electron.view.charge_c, "&minus;1.60 × 10^-19");
    assert_eq!(
        electron.view.magnetic_moment.as_deref(),
        Some("&minus;9.2847647043 × 10^-24")
    );

    let up = index.view_by_url_slug("up-quark").expect("up quark page");
    assert_eq!(up.view.relative_charge, "+2/3");
    assert_eq!(up.view.charge_c, "+1.07 × 10^-19");
    assert_eq!(up.view.mass_ev, "2.16 × 10^6");
    assert!((-5.0..=15.0).contains(&up.view.hue));

    let muon = index.view_by_url_slug("muon").expect("muon page");
    assert_eq!(muon.view.mass_kg, "1.88 × 10^-28");
    assert_eq!(muon.view.mean_lifetime, "2.20 × 10^-6");
    assert_eq!(muon.view.generation.as_deref(), Some("Second"));

    let w = index.view_by_url_slug("w-boson").expect("w boson page");
    assert_eq!(w.view.mass_ev, "8.04 × 10^10");
    assert_eq!(w.view.mean_lifetime, "3.16 × 10^-25");
    assert!((340.0..=360.0).contains(&w.view.hue));

    let photon = index.view_by_url_slug("photon").expect("photon page");
    assert_eq!(photon.view.generation, None);
    assert_eq!(photon.view.mass_kg, "0.00");
    assert!(!photon.view.has_magnetic_moment);

    assert!(index.find_by_url_slug("graviton").is_none());
    Ok(())
}

/// One bad entity fails the whole pass; nothing is partially indexed.
#[test]
fn test_unknown_charge_fails_whole_pass() -> Result<()> {
    let mut document = lepton_pair();
    document["Particles"][1]["RelativeCharge"] = json!("+5");
    let dataset = Dataset::from_json_value(document)?;

    let err = build_index(
        dataset,
        &DerivationOptions::default(),
        &mut ChaCha8Rng::seed_from_u64(1),
    )
    .unwrap_err();

    match err {
        CatalogError::UnknownCharge { reference, token } => {
            assert_eq!(reference, "r-electron");
            assert_eq!(token, "+5");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

/// A variant appearing twice is a data fault, not a first-match pick.
#[test]
fn test_duplicate_variant_is_ambiguous() -> Result<()> {
    let mut document = lepton_pair();
    document["Particles"][1]["Charge"]
        .as_array_mut()
        .expect("charge list")
        .push(json!({"Unit": "C", "Rounding": "3sf", "Significand": "-1.6", "Exponent": "-19"}));
    let dataset = Dataset::from_json_value(document)?;

    let err = build_index(
        dataset,
        &DerivationOptions::default(),
        &mut ChaCha8Rng::seed_from_u64(1),
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::AmbiguousVariant { count: 2, .. }));
    Ok(())
}

/// The same mass stored in eV and in MeV renders identically in eV.
#[test]
fn test_prefixed_electron_volt_mass_matches_plain_ev() -> Result<()> {
    let mut in_ev = lepton_pair();
    in_ev["Particles"][1]["Mass"][1] =
        json!({"Unit": "eV", "Rounding": "3sf", "Significand": "5.11", "Exponent": "5"});

    let options = DerivationOptions::default();
    let from_mev = build_index(
        Dataset::from_json_value(lepton_pair())?,
        &options,
        &mut ChaCha8Rng::seed_from_u64(3),
    )?;
    let from_ev = build_index(
        Dataset::from_json_value(in_ev)?,
        &options,
        &mut ChaCha8Rng::seed_from_u64(3),
    )?;

    let mev_view = &from_mev.by_reference("r-electron").expect("electron indexed").view;
    let ev_view = &from_ev.by_reference("r-electron").expect("electron indexed").view;
    assert_eq!(mev_view.mass_ev, "5.11 × 10^5");
    assert_eq!(mev_view.mass_ev, ev_view.mass_ev);
    Ok(())
}

/// Structurally broken documents are rejected before derivation.
#[test]
fn test_malformed_documents() {
    let missing_list = StaticSource::from_json_str(r#"{"particles": []}"#);
    assert!(matches!(missing_list, Err(CatalogError::MalformedDataset { .. })));

    let mut document = lepton_pair();
    document["Particles"][1]
        .as_object_mut()
        .expect("entity object")
        .remove("MeanLifetime");
    let missing_lifetime = Dataset::from_json_value(document);
    assert!(matches!(missing_lifetime, Err(CatalogError::MalformedDataset { .. })));

    let mut document = lepton_pair();
    document["Particles"][1]["Mass"] = json!([]);
    assert!(Dataset::from_json_value(document).is_err());
}

/// Configuration file → cache → index, end to end.
#[tokio::test]
async fn test_config_driven_cache() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[dataset]
path = "{}"

[derivation]
significant_figures = 3
jitter_seed = 77
"#,
        fixture_path()
    )?;

    let config = CatalogConfig::from_file(file.path())?;
    config.validate()?;
    config.init_logging();
    let cache = config.into_cache()?;

    let index = cache.get_view().await?;
    assert_eq!(index.len(), 6);
    assert_eq!(index.derived_by_reference().len(), 6);
    assert_eq!(cache.derivation_count(), 1);
    Ok(())
}
