// roadster_sim/src/simulation/config/resolver.rs

use super::catalog::PrefabCatalog;
use super::structs::{VehicleDefinition, VehicleEntry};
use super::ConfigError;
use figment::value::{Dict, Tag, Value};
use roadster_core::prelude::VehicleIntegrator;
use serde::Deserialize;

/// Recursive deep merge: tables are merged key by key, anything else in
/// `override_dict` replaces the base value.
fn deep_merge(base: &mut Dict, override_dict: &Dict) {
    for (key, override_val) in override_dict {
        if let Some(base_val) = base.get_mut(key) {
            if let (Some(base_sub_dict), Some(override_sub_dict)) =
                (base_val.as_dict(), override_val.as_dict())
            {
                let mut new_sub_dict = base_sub_dict.clone();
                deep_merge(&mut new_sub_dict, override_sub_dict);
                *base_val = Value::Dict(Tag::Default, new_sub_dict);
                continue;
            }
        }
        base.insert(key.clone(), override_val.clone());
    }
}

/// Produces the merged definition table for one scenario vehicle: the catalog
/// entry named by `from` (or an empty table), with `override` merged on top.
pub fn resolve_definition_value(
    entry: &VehicleEntry,
    catalog: &PrefabCatalog,
) -> Result<Value, ConfigError> {
    let mut merged = match &entry.from {
        Some(key) => catalog
            .get(key)
            .ok_or_else(|| ConfigError::UnknownPrefab {
                vehicle: entry.name.clone(),
                key: key.clone(),
            })?
            .as_dict()
            .cloned()
            .ok_or_else(|| ConfigError::NotATable { key: key.clone() })?,
        None => Dict::new(),
    };

    if let Some(overrides) = &entry.overrides {
        let overrides = overrides.as_dict().ok_or_else(|| ConfigError::NotATable {
            key: format!("{}.override", entry.name),
        })?;
        deep_merge(&mut merged, overrides);
    }

    Ok(Value::Dict(Tag::Default, merged))
}

/// Resolves and validates one vehicle, returning the integrator ready to run.
pub fn resolve_vehicle(
    entry: &VehicleEntry,
    catalog: &PrefabCatalog,
) -> Result<VehicleIntegrator, ConfigError> {
    let value = resolve_definition_value(entry, catalog)?;
    let definition =
        VehicleDefinition::deserialize(&value).map_err(|source| ConfigError::Resolve {
            vehicle: entry.name.clone(),
            source: Box::new(source),
        })?;

    VehicleIntegrator::new(definition.parameters, definition.tuning).map_err(|source| {
        ConfigError::InvalidVehicle {
            vehicle: entry.name.clone(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::{Format, Toml};
    use figment::Figment;
    use roadster_core::prelude::{LoadClampPolicy, ResistanceModel, VehicleParameters};

    const SEDAN: &str = r#"
        [parameters]
        mass = 1500.0
        wheelbase = 2.7
        lf = 1.2
        lr = 1.5
        cg_height = 0.55

        [tuning]
        steer_rate = 1.2
        resistance = { type = "Proportional", rolling = 0.015, drag = 0.001 }
    "#;

    fn catalog() -> PrefabCatalog {
        let sedan = Figment::new()
            .merge(Toml::string(SEDAN))
            .extract::<Value>()
            .unwrap();
        let mut catalog = PrefabCatalog::default();
        catalog.0.insert("vehicles.sedan".to_string(), sedan);
        catalog
    }

    fn entry(toml: &str) -> VehicleEntry {
        Figment::new().merge(Toml::string(toml)).extract().unwrap()
    }

    #[test]
    fn catalog_entry_resolves_as_is() {
        let model = resolve_vehicle(
            &entry("name = \"a\"\nfrom = \"vehicles.sedan\""),
            &catalog(),
        )
        .unwrap();
        assert_eq!(model.params().wheelbase, 2.7);
        assert_eq!(model.params().lr, 1.5);
        assert_eq!(model.tuning().steer_rate, 1.2);
        // Unspecified fields fall back to the defaults.
        assert_eq!(model.params().track_width, VehicleParameters::default().track_width);
    }

    #[test]
    fn overrides_are_deep_merged() {
        let model = resolve_vehicle(
            &entry(
                r#"
                name = "loaded"
                from = "vehicles.sedan"
                [override.parameters]
                mass = 1900.0
                [override.tuning]
                load_clamp = "clamp_non_negative"
                resistance = { type = "CoastFriction", deceleration = 1.0 }
                "#,
            ),
            &catalog(),
        )
        .unwrap();
        assert_eq!(model.params().mass, 1900.0);
        // Sibling keys of an overridden table survive.
        assert_eq!(model.params().wheelbase, 2.7);
        assert_eq!(model.tuning().steer_rate, 1.2);
        assert_eq!(model.tuning().load_clamp, LoadClampPolicy::ClampNonNegative);
        assert_eq!(
            model.tuning().resistance,
            ResistanceModel::CoastFriction { deceleration: 1.0 }
        );
    }

    #[test]
    fn inline_vehicle_without_prefab_uses_defaults() {
        let model = resolve_vehicle(&entry("name = \"plain\""), &PrefabCatalog::default()).unwrap();
        assert_eq!(model.params(), &VehicleParameters::default());
    }

    #[test]
    fn unknown_prefab_is_reported() {
        let err = resolve_vehicle(
            &entry("name = \"x\"\nfrom = \"vehicles.tank\""),
            &catalog(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPrefab { ref key, .. } if key == "vehicles.tank"));
    }

    #[test]
    fn inconsistent_geometry_is_rejected() {
        let err = resolve_vehicle(
            &entry(
                r#"
                name = "bent"
                from = "vehicles.sedan"
                [override.parameters]
                lf = 2.0
                "#,
            ),
            &catalog(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVehicle { .. }));
    }

    #[test]
    fn unknown_fields_fail_to_resolve() {
        let err = resolve_vehicle(
            &entry(
                r#"
                name = "typo"
                from = "vehicles.sedan"
                [override.parameters]
                wheel_base = 3.0
                "#,
            ),
            &catalog(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Resolve { .. }));
    }
}
