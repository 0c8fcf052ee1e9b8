//! Integration tests reading and writing in-memory object graphs through the
//! dataset mimic.

use ncmimic::{
    encode::GroupSnapshot,
    ncobj::{Dimension, Group, Variable},
    AttrValue, AttributeProvider, Component, DataType, Dataset, DeferredArray, Encoder,
    EncoderKind, FileMode, MimicError, NcArray, Scalar, Values,
};
use ndarray::{s, SliceInfoElem};
use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::rc::Rc;
use tempfile::TempDir;

/// A small CF-style forecast dataset with a nested ensemble group
fn forecast_group() -> Group {
    let lat = NcArray::from_shape_vec(&[3], vec![-45.0f64, 0.0, 45.0]).unwrap();
    let lon = NcArray::from_shape_vec(&[4], vec![0.0f64, 90.0, 180.0, 270.0]).unwrap();
    let temps: Vec<f32> = (0..24).map(|i| 270.0 + i as f32).collect();
    let air = NcArray::from_shape_vec(&[2, 3, 4], temps).unwrap();

    let members = Group::new("ensemble")
        .with_dimension(Dimension::new("member", 5))
        .with_variable(
            Variable::new("member_id")
                .with_dimensions(["member"])
                .with_data(NcArray::from_shape_vec(&[5], vec![1i32, 2, 3, 4, 5]).unwrap()),
        )
        .with_attribute("method", "perturbed physics");

    Group::new("root")
        .with_dimension(Dimension::new_unlimited("time", 2))
        .with_dimension(Dimension::new("lat", 3))
        .with_dimension(Dimension::new("lon", 4))
        .with_dimension(Dimension::new("bnds", 0))
        .with_variable(
            Variable::new("lat")
                .with_dimensions(["lat"])
                .with_data(lat)
                .with_attribute("units", "degrees_north"),
        )
        .with_variable(
            Variable::new("lon")
                .with_dimensions(["lon"])
                .with_data(lon)
                .with_attribute("units", "degrees_east"),
        )
        .with_variable(
            Variable::new("air_temperature")
                .with_dimensions(["time", "lat", "lon"])
                .with_data(air)
                .with_attribute("units", "K")
                .with_attribute("standard_name", "air_temperature")
                .with_attribute("_FillValue", -999.0f32),
        )
        .with_variable(Variable::new("height").with_data(NcArray::scalar(Scalar::F64(1.5))))
        .with_group(members)
        .with_attribute("Conventions", "CF-1.7")
        .with_attribute("source", "in-memory")
}

#[test]
fn test_mapping_names_match_wrapped_group() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);

    let wrapped_dims: Vec<&str> = group.dimensions.iter().map(|d| d.name.as_str()).collect();
    let wrapped_vars: Vec<&str> = group.variables.iter().map(|v| v.name.as_str()).collect();
    let wrapped_groups: Vec<&str> = group.groups.iter().map(|g| g.name.as_str()).collect();

    assert_eq!(ds.dimensions().keys().collect::<Vec<_>>(), wrapped_dims);
    assert_eq!(ds.variables().keys().collect::<Vec<_>>(), wrapped_vars);
    assert_eq!(ds.groups().keys().collect::<Vec<_>>(), wrapped_groups);

    let ensemble = ds.subgroup("ensemble").unwrap();
    assert_eq!(ensemble.dimensions().keys().collect::<Vec<_>>(), vec!["member"]);
    assert_eq!(ensemble.variables().keys().collect::<Vec<_>>(), vec!["member_id"]);
}

#[test]
fn test_dimension_sizes() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);

    for (name, dim) in ds.dimensions().iter() {
        let wrapped = group.dimension(name).unwrap();
        if wrapped.unlimited || wrapped.length == 0 {
            assert!(dim.is_unlimited(), "{} should be unlimited", name);
            assert_eq!(dim.size(), 0);
        } else {
            assert!(!dim.is_unlimited());
            assert_eq!(dim.size(), wrapped.length);
        }
    }
    assert_eq!(ds.dimension("lon").unwrap().len(), 4);
    assert!(ds.dimension("bnds").unwrap().is_unlimited());
}

#[test]
fn test_variable_properties() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);
    let air = ds.variable("air_temperature").unwrap();

    assert_eq!(air.name(), "air_temperature");
    assert_eq!(air.dtype().unwrap(), DataType::F32);
    assert_eq!(air.dimensions(), vec!["time", "lat", "lon"]);
    assert_eq!(air.shape().unwrap(), vec![2, 3, 4]);
    assert_eq!(air.ndim().unwrap(), 3);
    assert_eq!(air.size().unwrap(), 24);
    assert_eq!(*air.group().unwrap(), *ds.root());
}

#[test]
fn test_variable_sections() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);
    let air = ds.variable("air_temperature").unwrap();

    let first_time = air.read(&[SliceInfoElem::Index(0)]).unwrap().into_array();
    assert_eq!(first_time.shape(), vec![3, 4]);

    let point = air.read(s![1, 2, 3].as_ref()).unwrap().into_array();
    assert_eq!(point.ndim(), 0);
    assert_eq!(point.first(), Some(Scalar::F32(293.0)));

    let strided = air.read(s![.., 0, ..;2].as_ref()).unwrap().into_array();
    assert_eq!(strided.shape(), vec![2, 2]);
    let values: Vec<f32> = strided.as_f32().unwrap().iter().copied().collect();
    assert_eq!(values, vec![270.0, 272.0, 282.0, 284.0]);

    let err = air.read(&[SliceInfoElem::Index(2)]).unwrap_err();
    assert!(matches!(err, MimicError::Selection(_)));
}

#[test]
fn test_scalar_variable_ignores_index() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);
    let height = ds.variable("height").unwrap();

    for selection in [vec![], vec![SliceInfoElem::Index(3)], vec![SliceInfoElem::from(..)]] {
        let values = height.read(&selection).unwrap();
        assert_eq!(values, Values::Scalar(Scalar::F64(1.5)));
    }
}

#[test]
fn test_attribute_lookup_round_trips() {
    let group = forecast_group();
    let ds = Dataset::readable(&group);

    for attribute in group.attributes.iter() {
        assert_eq!(ds.getncattr(&attribute.name).unwrap(), &attribute.value);
    }
    for variable in &group.variables {
        let mimic = ds.variable(&variable.name).unwrap();
        assert_eq!(mimic.ncattrs(), variable.attributes.names().collect::<Vec<_>>());
        for attribute in variable.attributes.iter() {
            assert_eq!(mimic.getncattr(&attribute.name).unwrap(), &attribute.value);
        }
    }

    let air = ds.variable("air_temperature").unwrap();
    assert_eq!(air.get("_FillValue"), Some(&AttrValue::F32(vec![-999.0])));
    assert!(air.get("scale_factor").is_none());
    assert!(matches!(
        air.getncattr("scale_factor"),
        Err(MimicError::AttributeNotFound(name)) if name == "scale_factor"
    ));

    let ensemble = ds.subgroup("ensemble").unwrap();
    assert_eq!(ensemble.getncattr("method").unwrap().as_str(), Some("perturbed physics"));
}

#[test]
fn test_deferred_data_is_read_on_request() {
    let reads = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&reads);
    let deferred = DeferredArray::new(DataType::I16, vec![1000, 1000], move |selection| {
        counter.set(counter.get() + 1);
        // Only the requested row is produced.
        let row = match selection[0] {
            SliceInfoElem::Index(i) => i as i16,
            _ => 0,
        };
        NcArray::from_shape_vec(&[1000], vec![row; 1000])
    });
    let group = Group::new("root")
        .with_dimension(Dimension::new("y", 1000))
        .with_dimension(Dimension::new("x", 1000))
        .with_variable(Variable::new("elevation").with_dimensions(["y", "x"]).with_data(deferred));

    let ds = Dataset::readable(&group);
    let elevation = ds.variable("elevation").unwrap();
    assert_eq!(elevation.shape().unwrap(), vec![1000, 1000]);
    assert_eq!(reads.get(), 0);

    let row = elevation.read(&[SliceInfoElem::Index(-1)]).unwrap().into_array();
    assert_eq!(reads.get(), 1);
    assert_eq!(row.first(), Some(Scalar::I16(999)));
}

#[test]
fn test_read_mode_close_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let group = forecast_group();

    Dataset::readable(&group).close().unwrap();
    for mode in [FileMode::Read, FileMode::Append, FileMode::ReadWrite] {
        let path = dir.path().join(format!("{}.json", mode.as_str().replace('+', "plus")));
        Dataset::writable(&path, mode, &group).close().unwrap();
        assert!(!path.exists());
    }
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_write_mode_close_writes_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecast.json");
    let group = forecast_group();

    let ds = Dataset::open(&path, "w", &group).unwrap();
    assert_eq!(ds.file_mode(), FileMode::Write);
    assert_eq!(ds.file_path(), Some(path.as_path()));
    ds.close().unwrap();

    let restored = GroupSnapshot::from_json(fs::File::open(&path).unwrap())
        .unwrap()
        .into_group();
    let reread = Dataset::readable(&restored);
    assert_eq!(
        reread.variables().keys().collect::<Vec<_>>(),
        vec!["lat", "lon", "air_temperature", "height"]
    );
    let air = reread.variable("air_temperature").unwrap();
    assert_eq!(air.shape().unwrap(), vec![2, 3, 4]);
    assert_eq!(air.getncattr("units").unwrap().as_str(), Some("K"));
    assert_eq!(
        reread.variable("height").unwrap().read(&[]).unwrap(),
        Values::Scalar(Scalar::F64(1.5))
    );
    assert!(reread.dimension("time").unwrap().is_unlimited());
}

#[test]
fn test_write_mode_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecast.bin");
    fs::write(&path, vec![0u8; 1 << 16]).unwrap();
    let group = forecast_group();

    Dataset::writable(&path, FileMode::Write, &group)
        .with_encoder_kind(EncoderKind::Bincode)
        .close()
        .unwrap();

    let snapshot = GroupSnapshot::from_bincode(fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(snapshot, GroupSnapshot::capture(&group).unwrap());
}

#[test]
fn test_write_new_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exists.json");
    fs::write(&path, "keep me").unwrap();
    let group = forecast_group();

    let err = Dataset::open(&path, "x", &group).unwrap().close().unwrap_err();
    match err {
        MimicError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::AlreadyExists),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
}

struct RejectingEncoder {
    calls: Rc<Cell<usize>>,
}

impl Encoder for RejectingEncoder {
    fn encode(&self, out: &mut dyn Write, _root: &Group) -> ncmimic::Result<()> {
        self.calls.set(self.calls.get() + 1);
        out.write_all(b"partial")?;
        Err(MimicError::Encode("unsupported type: compound".to_string()))
    }

    fn kind(&self) -> EncoderKind {
        EncoderKind::Json
    }
}

#[test]
fn test_encoder_failure_surfaces_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    let calls = Rc::new(Cell::new(0));
    let group = forecast_group();

    let err = Dataset::writable(&path, FileMode::Write, &group)
        .with_encoder(Box::new(RejectingEncoder {
            calls: Rc::clone(&calls),
        }))
        .close()
        .unwrap_err();

    assert_eq!(calls.get(), 1);
    assert!(matches!(err, MimicError::Encode(msg) if msg == "unsupported type: compound"));
    // The handle was opened and released; no cleanup is attempted.
    assert!(path.exists());
}

#[test]
fn test_invalid_mode_string() {
    let group = forecast_group();
    let err = Dataset::open("unused.nc", "wb", &group).unwrap_err();
    assert!(matches!(err, MimicError::InvalidMode(mode) if mode == "wb"));
}

#[test]
fn test_non_finite_values_survive_json_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gappy.json");
    let data = NcArray::from_shape_vec(&[3], vec![1.0f32, f32::NAN, f32::NEG_INFINITY]).unwrap();
    let group = Group::new("root")
        .with_dimension(Dimension::new("x", 3))
        .with_variable(
            Variable::new("v")
                .with_dimensions(["x"])
                .with_data(data)
                .with_attribute("_FillValue", f32::NAN),
        );

    Dataset::open(&path, "w", &group).unwrap().close().unwrap();

    let restored = GroupSnapshot::from_json(fs::File::open(&path).unwrap())
        .unwrap()
        .into_group();
    let reread = Dataset::readable(&restored);
    let v = reread.variable("v").unwrap();
    match v.getncattr("_FillValue").unwrap() {
        AttrValue::F32(fill) => assert!(fill.len() == 1 && fill[0].is_nan()),
        other => panic!("unexpected fill value {:?}", other),
    }
    let values: Vec<f32> = v.read_all().unwrap().into_array().as_f32().unwrap().iter().copied().collect();
    assert_eq!(values[0], 1.0);
    assert!(values[1].is_nan());
    assert_eq!(values[2], f32::NEG_INFINITY);
}

#[test]
fn test_share_modes_follow_base_mode() {
    let dir = TempDir::new().unwrap();
    let group = forecast_group();

    let written = dir.path().join("shared.json");
    let ds = Dataset::open(&written, "ws", &group).unwrap();
    assert_eq!(ds.file_mode(), FileMode::Write);
    ds.close().unwrap();
    assert!(GroupSnapshot::from_json(fs::File::open(&written).unwrap()).is_ok());

    for (i, mode) in ["rs", "as", "r+s"].into_iter().enumerate() {
        let path = dir.path().join(format!("untouched-{}.json", i));
        Dataset::open(&path, mode, &group).unwrap().close().unwrap();
        assert!(!path.exists());
    }
}
