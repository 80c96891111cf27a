use std::sync::{Mutex, OnceLock};

use approx::assert_relative_eq;
use spicer::body::parse_timestamp;
use spicer::ephemeris::kernels::{KernelKind, describe};
use spicer::ephemeris::{
    self, AberrationCorrection, EphemerisError, EphemerisProvider, KernelSet, SpiceProvider,
};
use spicer::primitives::vector;
use spicer::session::Session;
use spicer::{BodyError, BodyState, SurfaceCoords, SurfacePointRequest};

fn guard() -> &'static Mutex<()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD.get_or_init(|| Mutex::new(()))
}

fn ensure_kernels_or_skip() -> Option<SpiceProvider> {
    match SpiceProvider::initialize(&KernelSet::generic()) {
        Ok(provider) => Some(provider),
        Err(EphemerisError::MissingKernel { path, .. }) => {
            eprintln!(
                "Skipping SPICE tests: missing kernel at {}. Place the generic kernels under data/spice first.",
                path.display()
            );
            None
        }
        Err(err) => panic!("Unexpected SPICE initialization error: {err}"),
    }
}

fn state(
    provider: SpiceProvider,
    target: &str,
    utc: &str,
) -> BodyState<SpiceProvider> {
    BodyState::new(provider, target, Some(parse_timestamp(utc).unwrap()))
}

#[test]
fn missing_kernel_is_reported_with_its_path() {
    let _lock = guard().lock().unwrap();
    let set = KernelSet::new("no/such/dir", vec!["naif0012.tls".to_string()]);
    match SpiceProvider::initialize(&set) {
        Err(EphemerisError::MissingKernel { name, path }) => {
            assert_eq!(name, "naif0012.tls");
            assert!(path.ends_with("naif0012.tls"));
        }
        other => panic!("expected MissingKernel, got {other:?}"),
    }
}

#[test]
fn utc_converts_to_ephemeris_time() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let earth = state(provider, "EARTH", "2010-01-02");
    assert_eq!(earth.utc(), "2010-01-02T00:00:00");
    assert_relative_eq!(
        earth.ephemeris_time().unwrap(),
        315_662_466.183_953_46,
        epsilon = 1e-4
    );
    assert!(matches!(
        provider.time_to_ephemeris_time("not a time"),
        Err(EphemerisError::Spice { .. })
    ));
}

#[test]
fn body_ids_and_radii() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let mut body = state(provider, "Mars", "2010-01-02");
    assert_eq!(body.target_id().unwrap(), 499);
    let radii = body.radii().unwrap();
    assert_relative_eq!(radii.a, 3396.19, epsilon = 1e-9);
    assert_relative_eq!(radii.b, 3396.19, epsilon = 1e-9);
    assert_relative_eq!(radii.c, 3376.20, epsilon = 1e-9);

    body.set_target("hello").unwrap();
    assert!(matches!(
        body.target_id(),
        Err(BodyError::UnknownBody { .. })
    ));
}

#[test]
fn earth_center_to_sun_and_solar_constant() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let earth = state(provider, "Earth", "2015-10-18T23:50:24.747598");
    assert_eq!(earth.reference_frame(), "IAU_EARTH");

    let to_sun = earth.center_to_sun().unwrap();
    let expected = [-1.468_342_68e8, 3.206_894_25e6, -2.531_940_83e7];
    for k in 0..3 {
        assert_relative_eq!(to_sun[k], expected[k], max_relative = 1e-6);
    }
    assert_relative_eq!(
        earth.solar_constant().unwrap(),
        1375.394_400_28,
        max_relative = 1e-6
    );

    let (_, light_time) = earth.vector_to("SUN").unwrap();
    assert!((495.0..500.0).contains(&light_time), "{light_time}");
}

#[test]
fn lon_lat_to_rectangular_on_mars_and_sun() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let mut mars = state(provider, "mars", "2010-01-02");
    let origin = SurfaceCoords::new(0.0, 0.0, 0.0);

    let point = mars.surface_point_from_lon_lat(&origin, None).unwrap();
    assert_relative_eq!(point[0], 3396.19, epsilon = 1e-6);
    assert_relative_eq!(point[1], 0.0, epsilon = 1e-9);
    assert_relative_eq!(point[2], 0.0, epsilon = 1e-9);

    let sun = mars.surface_point_from_lon_lat(&origin, Some("sun")).unwrap();
    assert_relative_eq!(sun[0], 696_000.0, epsilon = 1e-6);

    mars.set_surface_point_by(&SurfacePointRequest::lon_lat(0.0, 0.0))
        .unwrap();
    assert!(mars.surface_point_set());
}

#[test]
fn surface_coords_round_trip_through_spice() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let mut mars = state(provider, "MARS", "2010-01-02");
    for (lon, lat) in [(45.0, 30.0), (135.0, -30.0), (-135.0, 60.0), (-45.0, -60.0)] {
        mars.set_surface_point_by(&SurfacePointRequest::from_degrees(lon, lat))
            .unwrap();
        let coords = mars.local_surface_coords().unwrap();
        assert_relative_eq!(coords.lon.to_degrees(), lon, epsilon = 1e-9);
        assert_relative_eq!(coords.lat.to_degrees(), lat, epsilon = 1e-9);
    }
}

#[test]
fn illumination_and_flux_at_a_mars_site() {
    let _lock = guard().lock().unwrap();
    let Some(provider) = ensure_kernels_or_skip() else {
        return;
    };
    let mut mars = state(provider, "MARS", "2015-10-18T23:50:24.747598");
    mars.set_surface_point_by(&SurfacePointRequest::from_degrees(137.4, -4.6))
        .unwrap();

    let angles = mars.illumination_angles().unwrap();
    assert_eq!(angles.phase, 0.0);
    assert!((0.0..=std::f64::consts::PI).contains(&angles.solar));

    let normal = mars.surface_normal().unwrap();
    assert_relative_eq!(vector::norm(&normal), 1.0, epsilon = 1e-12);

    let flux = mars.flat_flux().unwrap();
    let solar_constant = mars.solar_constant().unwrap();
    assert!(flux >= 0.0 && flux <= solar_constant);
    if angles.solar < std::f64::consts::FRAC_PI_2 {
        assert!(flux > 0.0);
    }

    let lst = mars.local_solar_time().unwrap();
    assert!((0..24).contains(&lst.hour));
    assert!(lst.ampm.ends_with("M."), "{}", lst.ampm);

    let ls = mars.solar_longitude().unwrap();
    assert!((0.0..360.0).contains(&ls));
}

#[test]
fn aberration_correction_parsing() {
    assert_eq!(
        " lt+s ".parse::<AberrationCorrection>().unwrap(),
        AberrationCorrection::LtS
    );
    assert_eq!(AberrationCorrection::XcnS.to_string(), "XCN+S");
    assert_eq!(AberrationCorrection::default(), AberrationCorrection::None);
    assert!(matches!(
        "bogus".parse::<AberrationCorrection>(),
        Err(EphemerisError::UnknownCorrection { .. })
    ));
}

#[test]
fn session_furnishes_profile_dependencies() {
    let _lock = guard().lock().unwrap();
    if ensure_kernels_or_skip().is_none() {
        return;
    }
    let session = Session::with_defaults().unwrap();
    let mars = session
        .body("mars", Some(parse_timestamp("2010-01-02").unwrap()))
        .unwrap();
    assert_eq!(mars.profile().map(|p| p.name.as_str()), Some("MARS"));
    assert_eq!(mars.target_id().unwrap(), 499);

    let unknown = session.body("vulcan", None).unwrap();
    assert!(unknown.profile().is_none());
    assert!(ephemeris::load_default_kernels().is_ok());
}

#[test]
fn generic_kernels_are_described() {
    for filename in KernelSet::generic().filenames() {
        let descriptor = describe(filename).expect("generic kernel is catalogued");
        assert!(!descriptor.description.is_empty());
        assert_eq!(KernelKind::from_filename(filename), Some(descriptor.kind));
    }
    assert_eq!(describe("NAIF0012.TLS").map(|d| d.kind), Some(KernelKind::Lsk));
    assert!(describe("mar099.bsp").is_none());
}
