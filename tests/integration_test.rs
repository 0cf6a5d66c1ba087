use cfcoords::coords::{
    apply_role, ensure_valid_time, ensure_valid_time_present, translate, translate_default,
    CoordModel, RoleRegistry, DEFAULT_VALID_TIME_NAME,
};
use cfcoords::dataset::{Dataset, Values, Variable};
use cfcoords::errors::{CfCoordsError, Result};
use cfcoords::loader::load_dataset_from_path;
use cfcoords::parallel::{translate_batch, BatchOptions};
use ndarray::{arr1, Array, ArrayD, IxDyn};
use std::fs;
use tempfile::tempdir;

const HOUR: i64 = 3_600_000_000_000;
// 2017-01-01T00:00:00Z
const REF_TIME: i64 = 1_483_228_800_000_000_000;

fn floats(values: &Values) -> Vec<f64> {
    match values {
        Values::Float(a) => a.iter().copied().collect(),
        other => panic!("Expected float values, got {:?}", other.dtype()),
    }
}

fn datetimes(values: &Values) -> Vec<i64> {
    match values {
        Values::DateTime(a) => a.iter().copied().collect(),
        other => panic!("Expected datetime values, got {:?}", other.dtype()),
    }
}

fn coord_1d(name: &str, values: &[f64]) -> Variable {
    Variable::new(name, &[name], Values::Float(arr1(values).into_dyn())).expect("valid coordinate")
}

fn reference_time(name: &str, dims: &[&str], values: &[i64]) -> Variable {
    let values = if dims.is_empty() {
        ArrayD::from_elem(IxDyn(&[]), values[0])
    } else {
        arr1(values).into_dyn()
    };
    Variable::new(name, dims, Values::DateTime(values))
        .expect("valid coordinate")
        .with_attr("standard_name", "forecast_reference_time")
}

fn forecast_period(name: &str, hours: &[i64]) -> Variable {
    let steps: Vec<i64> = hours.iter().map(|h| h * HOUR).collect();
    Variable::new(name, &[name], Values::TimeDelta(arr1(&steps).into_dyn()))
        .expect("valid coordinate")
        .with_attr("standard_name", "forecast_period")
}

/// An ensemble forecast on pressure levels, laid out the way a GRIB decoder
/// without CF knowledge presents it
fn raw_ensemble_dataset() -> Result<Dataset> {
    let number = Variable::new("member", &["member"], Values::Int(arr1(&[0, 1]).into_dyn()))?
        .with_attr("standard_name", "realization")
        .with_attr("units", "1");
    let level = coord_1d("isobaricInhPa", &[50_000.0, 85_000.0])
        .with_attr("units", "Pa")
        .with_attr("long_name", "pressure");
    let lat = coord_1d("g0_lat_0", &[45.0, 44.5, 44.0]).with_attr("units", "degreeN");
    let lon = coord_1d("g0_lon_1", &[0.0, 0.5]).with_attr("units", "degrees_E");
    let temperature = Variable::new(
        "t",
        &["member", "forecast_time", "isobaricInhPa", "g0_lat_0", "g0_lon_1"],
        Values::Float(Array::from_elem(IxDyn(&[2, 3, 2, 3, 2]), 273.15)),
    )?
    .with_attr("units", "K");

    Dataset::new()
        .with_coord(number)?
        .with_coord(reference_time("initial_time", &[], &[REF_TIME]))?
        .with_coord(forecast_period("forecast_time", &[0, 6, 12]))?
        .with_coord(level)?
        .with_coord(lat)?
        .with_coord(lon)?
        .with_data_var(temperature)
}

#[test]
fn test_translate_renames_every_role() -> Result<()> {
    let dataset = translate_default(raw_ensemble_dataset()?)?;

    assert_eq!(
        dataset.coord_names(),
        vec!["number", "time", "step", "level", "latitude", "longitude"]
    );
    assert_eq!(
        dataset.data_var("t").unwrap().dims,
        vec!["number", "step", "level", "latitude", "longitude"]
    );

    let level = dataset.coord("level").unwrap();
    assert_eq!(level.units(), Some("hPa"));
    assert_eq!(level.attr_str("long_name"), Some("pressure"));
    let levels = floats(&level.values);
    assert!((levels[0] - 500.0).abs() < 1e-9);
    assert!((levels[1] - 850.0).abs() < 1e-9);

    let latitude = dataset.coord("latitude").unwrap();
    assert_eq!(latitude.units(), Some("degrees_north"));
    assert_eq!(floats(&latitude.values), vec![45.0, 44.5, 44.0]);
    assert_eq!(dataset.coord("longitude").unwrap().units(), Some("degrees_east"));
    assert_eq!(dataset.coord("number").unwrap().units(), Some("1"));
    Ok(())
}

#[test]
fn test_degree_units_relabelled_without_conversion() -> Result<()> {
    let dataset = Dataset::new().with_coord(coord_1d("lat", &[10.0, -10.0]).with_attr("units", "degree_north"))?;
    let dataset = translate_default(dataset)?;

    let latitude = dataset.coord("latitude").expect("renamed latitude");
    assert_eq!(latitude.units(), Some("degrees_north"));
    assert_eq!(latitude.values, Values::Float(arr1(&[10.0, -10.0]).into_dyn()));
    assert!(latitude.attrs.get("untis").is_none());
    Ok(())
}

#[test]
fn test_integer_levels_are_converted_to_float() -> Result<()> {
    let level = Variable::new("lev", &["lev"], Values::Int(arr1(&[1, 2]).into_dyn()))?
        .with_attr("units", "bar");
    let dataset = translate_default(Dataset::new().with_coord(level)?)?;
    let level = dataset.coord("level").unwrap();
    assert_eq!(floats(&level.values), vec![1000.0, 2000.0]);
    assert_eq!(level.units(), Some("hPa"));
    Ok(())
}

#[test]
fn test_role_conflict() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(coord_1d("lat", &[1.0]).with_attr("units", "degrees_north"))?
        .with_coord(coord_1d("g0_lat_0", &[2.0]).with_attr("units", "degreeN"))?;

    match translate_default(dataset) {
        Err(CfCoordsError::RoleConflict { role }) => assert_eq!(role, "latitude"),
        other => panic!("Expected RoleConflict, got {:?}", other.map(|d| d.coord_names().len())),
    }
    Ok(())
}

#[test]
fn test_naming_conflict() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(coord_1d("lat", &[1.0]).with_attr("units", "degrees_north"))?
        .with_coord(coord_1d("latitude", &[2.0]))?;

    match translate_default(dataset) {
        Err(CfCoordsError::NamingConflict { role, name }) => {
            assert_eq!(role, "latitude");
            assert_eq!(name, "latitude");
        }
        other => panic!("Expected NamingConflict, got {:?}", other.is_ok()),
    }
    Ok(())
}

#[test]
fn test_coordinate_already_canonical() -> Result<()> {
    let dataset = Dataset::new().with_coord(coord_1d("level", &[500.0]).with_attr("units", "hPa"))?;
    let translated = translate_default(dataset.clone())?;
    assert_eq!(translated, dataset);
    Ok(())
}

#[test]
fn test_coord_model_override() -> Result<()> {
    let model = CoordModel::new()
        .with_out_name("vertical_pressure", "isobaricInhPa")
        .with_units("vertical_pressure", "Pa");
    let dataset = Dataset::new().with_coord(coord_1d("lev", &[500.0, 850.0]).with_attr("units", "hPa"))?;

    let dataset = translate(dataset, &model, &RoleRegistry::default())?;
    let level = dataset.coord("isobaricInhPa").unwrap();
    assert_eq!(level.units(), Some("Pa"));
    assert_eq!(floats(&level.values), vec![50_000.0, 85_000.0]);
    assert!(!dataset.has_coord("level"));
    Ok(())
}

#[test]
fn test_override_to_unrelated_units_fails() -> Result<()> {
    let model = CoordModel::new().with_units("vertical_pressure", "m");
    let dataset = Dataset::new().with_coord(coord_1d("lev", &[500.0]).with_attr("units", "hPa"))?;
    let result = translate(dataset, &model, &RoleRegistry::default());
    assert!(matches!(result, Err(CfCoordsError::Conversion { .. })));
    Ok(())
}

#[test]
fn test_apply_single_role() -> Result<()> {
    let registry = RoleRegistry::default();
    let dataset = raw_ensemble_dataset()?;

    let dataset = apply_role(
        registry.get("realization").unwrap(),
        dataset,
        &CoordModel::default(),
    )?;
    assert!(dataset.has_coord("number"));
    assert!(dataset.has_coord("g0_lat_0"));
    assert!(dataset.is_dim("number"));

    let unchanged = apply_role(
        registry.get("valid_time").unwrap(),
        dataset.clone(),
        &CoordModel::default(),
    )?;
    assert_eq!(unchanged, dataset);
    Ok(())
}

#[test]
fn test_valid_time_from_reference_and_period() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(reference_time("time", &[], &[REF_TIME]))?
        .with_coord(forecast_period("step", &[0, 6, 12]))?;

    let (dataset, names) = ensure_valid_time_present(dataset, DEFAULT_VALID_TIME_NAME)?;
    assert_eq!(names.valid_time, "valid_time");
    assert_eq!(names.reference_time, "time");
    assert_eq!(names.period, "step");

    let valid_time = dataset.coord("valid_time").unwrap();
    assert_eq!(valid_time.dims, vec!["step"]);
    assert_eq!(valid_time.standard_name(), Some("time"));
    assert_eq!(
        datetimes(&valid_time.values),
        vec![REF_TIME, REF_TIME + 6 * HOUR, REF_TIME + 12 * HOUR]
    );
    Ok(())
}

#[test]
fn test_valid_time_broadcasts_over_time_and_step() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(reference_time("time", &["time"], &[REF_TIME, REF_TIME + 24 * HOUR]))?
        .with_coord(forecast_period("step", &[0, 6]))?;

    let (dataset, _) = ensure_valid_time_present(dataset, "vt")?;
    let valid_time = dataset.coord("vt").unwrap();
    assert_eq!(valid_time.dims, vec!["time", "step"]);
    assert_eq!(
        datetimes(&valid_time.values),
        vec![REF_TIME, REF_TIME + 6 * HOUR, REF_TIME + 24 * HOUR, REF_TIME + 30 * HOUR]
    );

    // 2-d valid time cannot index a dimension
    let promoted = ensure_valid_time(dataset.clone())?;
    assert_eq!(promoted, dataset);
    Ok(())
}

#[test]
fn test_valid_time_from_reference_only() -> Result<()> {
    let dataset = Dataset::new().with_coord(reference_time(
        "time",
        &["time"],
        &[REF_TIME, REF_TIME + 12 * HOUR],
    ))?;

    let (dataset, names) = ensure_valid_time_present(dataset, DEFAULT_VALID_TIME_NAME)?;
    assert_eq!(names.reference_time, "time");
    assert_eq!(names.period, "");

    let time = dataset.coord("time").unwrap();
    let valid_time = dataset.coord("valid_time").unwrap();
    assert_eq!(valid_time.values, time.values);
    assert_eq!(valid_time.standard_name(), Some("time"));
    assert_eq!(time.standard_name(), Some("forecast_reference_time"));
    Ok(())
}

#[test]
fn test_valid_time_cannot_be_derived() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(forecast_period("step", &[0, 6]))?
        .with_coord(coord_1d("lat", &[1.0]).with_attr("units", "degrees_north"))?;

    assert!(matches!(
        ensure_valid_time_present(dataset.clone(), DEFAULT_VALID_TIME_NAME),
        Err(CfCoordsError::Derivation(_))
    ));
    assert!(matches!(ensure_valid_time(dataset), Err(CfCoordsError::Derivation(_))));
    Ok(())
}

#[test]
fn test_existing_valid_time_is_kept() -> Result<()> {
    let valid = Variable::new(
        "validity",
        &["validity"],
        Values::DateTime(arr1(&[REF_TIME]).into_dyn()),
    )?;
    let dataset = Dataset::new()
        .with_coord(valid)?
        .with_coord(reference_time("time", &[], &[REF_TIME]))?;

    let (returned, names) = ensure_valid_time_present(dataset.clone(), DEFAULT_VALID_TIME_NAME)?;
    assert_eq!(names.valid_time, "validity");
    assert!(names.reference_time.is_empty());
    assert!(names.period.is_empty());
    assert_eq!(returned, dataset);
    Ok(())
}

#[test]
fn test_first_reference_time_wins() -> Result<()> {
    let dataset = Dataset::new()
        .with_coord(reference_time("analysis", &[], &[REF_TIME]))?
        .with_coord(reference_time("other_analysis", &[], &[REF_TIME + HOUR]))?;

    let (dataset, names) = ensure_valid_time_present(dataset, DEFAULT_VALID_TIME_NAME)?;
    assert_eq!(names.reference_time, "analysis");
    assert_eq!(datetimes(&dataset.coord("valid_time").unwrap().values), vec![REF_TIME]);
    Ok(())
}

#[test]
fn test_ensure_valid_time_swaps_step() -> Result<()> {
    let dataset = translate_default(raw_ensemble_dataset()?)?;
    let dataset = ensure_valid_time(dataset)?;

    assert!(dataset.is_dim("valid_time"));
    assert!(!dataset.is_dim("step"));
    assert_eq!(dataset.coord("step").unwrap().dims, vec!["valid_time"]);
    assert_eq!(
        dataset.data_var("t").unwrap().dims,
        vec!["number", "valid_time", "level", "latitude", "longitude"]
    );
    assert_eq!(
        datetimes(&dataset.coord("valid_time").unwrap().values),
        vec![REF_TIME, REF_TIME + 6 * HOUR, REF_TIME + 12 * HOUR]
    );
    Ok(())
}

#[test]
fn test_ensure_valid_time_swaps_reference_time() -> Result<()> {
    let field = Variable::new("t2m", &["time"], Values::Float(arr1(&[271.0, 272.0]).into_dyn()))?;
    let dataset = Dataset::new()
        .with_coord(reference_time("time", &["time"], &[REF_TIME, REF_TIME + 24 * HOUR]))?
        .with_data_var(field)?;

    let dataset = ensure_valid_time(dataset)?;
    assert!(dataset.is_dim("valid_time"));
    assert_eq!(dataset.coord("time").unwrap().dims, vec!["valid_time"]);
    assert_eq!(dataset.data_var("t2m").unwrap().dims, vec!["valid_time"]);

    // already an index: nothing left to do
    let again = ensure_valid_time(dataset.clone())?;
    assert_eq!(again, dataset);
    Ok(())
}

#[test]
fn test_translate_batch_keeps_order() -> Result<()> {
    let good = raw_ensemble_dataset()?;
    let conflicting = Dataset::new()
        .with_coord(coord_1d("lat", &[1.0]).with_attr("units", "degrees_north"))?
        .with_coord(coord_1d("g0_lat_0", &[2.0]).with_attr("units", "degreeN"))?;
    let no_time = Dataset::new().with_coord(coord_1d("lev", &[850.0]).with_attr("units", "hPa"))?;

    let results = translate_batch(
        vec![good, conflicting, no_time.clone()],
        &CoordModel::default(),
        &RoleRegistry::default(),
        &BatchOptions::default(),
    );
    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().is_dim("valid_time"));
    assert!(matches!(results[1], Err(CfCoordsError::RoleConflict { .. })));
    assert!(matches!(results[2], Err(CfCoordsError::Derivation(_))));

    let results = translate_batch(
        vec![no_time],
        &CoordModel::default(),
        &RoleRegistry::default(),
        &BatchOptions {
            ensure_valid_time: false,
        },
    );
    assert!(results[0].as_ref().unwrap().has_coord("level"));
    Ok(())
}

#[test]
fn test_translate_fixture_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("era5-levels.json");
    fs::write(
        &path,
        r#"{
            "coords": [
                {"name": "time", "dtype": "datetime64[ns]", "values": "2017-01-01T00:00:00Z",
                 "attrs": {"standard_name": "forecast_reference_time"}},
                {"name": "topLevel", "dims": ["topLevel"], "values": [500, 850],
                 "attrs": {"units": "hPa"}},
                {"name": "lat", "dims": ["lat"], "values": [90.0, 0.0, -90.0],
                 "attrs": {"units": "degrees_north"}}
            ],
            "data_vars": [
                {"name": "t", "dims": ["topLevel", "lat"],
                 "values": [[250.0, 260.0, 255.0], [270.0, 290.0, 275.0]]}
            ]
        }"#,
    )?;

    let dataset = ensure_valid_time(translate_default(load_dataset_from_path(&path)?)?)?;
    assert_eq!(
        dataset.coord_names(),
        vec!["time", "level", "latitude", "valid_time"]
    );
    assert_eq!(dataset.data_var("t").unwrap().dims, vec!["level", "latitude"]);
    let valid_time = dataset.coord("valid_time").unwrap();
    assert!(valid_time.dims.is_empty());
    assert_eq!(datetimes(&valid_time.values), vec![REF_TIME]);
    Ok(())
}
