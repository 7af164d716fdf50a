use unitconv::units::{Dimension, UnitDefinition, UnitRegistry, DEFAULT_UNITS};
use unitconv::Error;

#[test]
fn test_lookup_names_aliases_and_plurals()
{   let registry = UnitRegistry::with_defaults();
    assert_eq!(registry.lookup("meters").unwrap().name, "meter");
    assert_eq!(registry.lookup("Metre").unwrap().name, "meter");
    assert_eq!(registry.lookup("feet").unwrap().name, "foot");
    assert_eq!(registry.lookup("inches").unwrap().name, "inch");
    assert_eq!(registry.lookup("ounces").unwrap().name, "ounce");
    assert_eq!(registry.lookup("°C").unwrap().name, "celsius");
    assert_eq!(registry.lookup("km").unwrap().name, "kilometer");
    assert_eq!(registry.lookup("fluid ounces").unwrap().name, "fluid ounce");
    assert!(registry.lookup("parsecs").is_none());
}

#[test]
fn test_short_symbols_are_not_singularised()
{   let registry = UnitRegistry::with_defaults();
    // "ms" must not collapse to "m"
    assert!(registry.lookup("ms").is_none());
}

#[test]
fn test_parse_compound_expressions()
{   let registry = UnitRegistry::with_defaults();

    let speed = registry.parse("miles per hour").unwrap();
    assert_eq!(speed.dimension, Dimension::SPEED);
    assert!((speed.factor - 0.44704).abs() < 1e-12);
    assert_eq!(speed.offset, 0.0);

    let accel = registry.parse("meters per second per second").unwrap();
    assert_eq!(accel.dimension, Dimension::new(1, 0, -2, 0));

    let area = registry.parse("sq ft").unwrap();
    assert_eq!(area.dimension, Dimension::AREA);

    let volume = registry.parse("cm³").unwrap();
    assert_eq!(volume.dimension, Dimension::VOLUME);
    assert!((volume.factor - 1e-6).abs() < 1e-18);

    let floz = registry.parse("fl oz").unwrap();
    assert_eq!(floz.dimension, Dimension::VOLUME);
}

#[test]
fn test_parse_rejects_dangling_operators()
{   let registry = UnitRegistry::with_defaults();
    for bad in ["", "   ", "per second", "meters per", "square", "m^x", "meters per per second"]
    {   assert!(
          matches!(registry.parse(bad), Err(Error::InvalidUnit(_))),
          "expected InvalidUnit for {:?}", bad
        );
    }
}

#[test]
fn test_affine_unit_keeps_offset()
{   let registry = UnitRegistry::with_defaults();
    let celsius = registry.parse("celsius").unwrap();
    assert_eq!(celsius.offset, 273.15);
    assert!((celsius.to_base(25.0) - 298.15).abs() < 1e-9);
    assert!((celsius.from_base(273.15)).abs() < 1e-9);
}

#[test]
fn test_define_custom_unit()
{   let mut registry = UnitRegistry::new();
    assert!(registry.is_empty());

    registry.define(UnitDefinition::linear(
      "furlong", &["fur"], Dimension::LENGTH, 201.168
    )).unwrap();
    registry.define(UnitDefinition::linear(
      "meter", &["m"], Dimension::LENGTH, 1.0
    )).unwrap();
    assert_eq!(registry.len(), 2);

    let furlongs = registry.parse("furlongs").unwrap();
    assert!((furlongs.to_base(1.0) - 201.168).abs() < 1e-9);

    let clash = registry.define(UnitDefinition::linear(
      "fathom", &["m"], Dimension::LENGTH, 1.8288
    ));
    assert!(matches!(clash, Err(Error::InvalidConfiguration(_))));

    let zero = registry.define(UnitDefinition::linear(
      "nothing", &[], Dimension::LENGTH, 0.0
    ));
    assert!(matches!(zero, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_dimension_display()
{   assert_eq!(Dimension::DIMENSIONLESS.to_string(), "dimensionless");
    assert_eq!(Dimension::AREA.to_string(), "[length] ** 2");
    assert_eq!(Dimension::TIME.powi(-1).unwrap().to_string(), "1 / [time]");
    let force = Dimension::MASS
      .mul(Dimension::LENGTH)
      .and_then(|d| d.div(Dimension::TIME.powi(2)?))
      .unwrap();
    assert_eq!(force.to_string(), "[length] * [mass] / [time] ** 2");
    assert_eq!(
      Dimension::new(-128, 0, 0, 0).to_string(),
      "1 / [length] ** 128"
    );
}

#[test]
fn test_every_builtin_unit_is_registered()
{   let registry = UnitRegistry::with_defaults();
    assert_eq!(registry.len(), DEFAULT_UNITS.len());
    for def in DEFAULT_UNITS
    {   assert_eq!(registry.lookup(def.name).unwrap().name, def.name);
    }
}

#[test]
fn test_exponent_overflow_is_an_error()
{   let registry = UnitRegistry::with_defaults();
    for expr in [
      "m^100 m^100"
    , "m^127 per m^-128"
    , "square m^100"
    , "cubic cubic cubic cubic cubic meters"
    , "meters per m^-128"
    ]
    {   assert!(
          matches!(registry.parse(expr), Err(Error::NumericOverflow(_))),
          "expected NumericOverflow for {:?}", expr
        );
    }

    assert_eq!(Dimension::new(127, 0, 0, 0).mul(Dimension::LENGTH), None);
    assert_eq!(Dimension::new(-128, 0, 0, 0).powi(-1), None);
    assert_eq!(Dimension::LENGTH.powi(127), Some(Dimension::new(127, 0, 0, 0)));
}

#[test]
fn test_zero_exponent_is_rejected()
{   let registry = UnitRegistry::with_defaults();
    for expr in ["m^0", "s^0", "meters per s^0"]
    {   assert!(
          matches!(registry.parse(expr), Err(Error::InvalidUnit(_))),
          "expected InvalidUnit for {:?}", expr
        );
    }
}
