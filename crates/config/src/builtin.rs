use crate::{BodyProfile, NamedLocation, infer_kernel_dependencies};

/// Profiles available without a configuration file.
pub fn builtin_profiles() -> Vec<BodyProfile> {
    vec![
        profile(
            "MARS",
            &["MRO", "MEX", "MGS", "MAVEN"],
            &["HIRISE", "CTX", "CRISM", "HRSC"],
            // Points on the pck00010 ellipsoid at the sites' planetocentric lon/lat.
            vec![
                location("inca_city", [215.785, -456.496, -3338.677]),
                location("manhattan", [-33.256, 209.969, -3369.579]),
                location("gale_crater", [-2488.7, 2288.477, -319.593]),
                location("jezero_crater", [697.078, 3144.316, 1071.37]),
            ],
        ),
        profile("EARTH", &[], &[], Vec::new()),
        profile("TRITON", &["VOYAGER 2"], &["ISS"], Vec::new()),
        profile(
            "ENCELADUS",
            &["CASSINI"],
            &["ISS_NAC", "ISS_WAC", "VIMS", "CIRS"],
            Vec::new(),
        ),
    ]
}

fn profile(
    name: &str,
    observers: &[&str],
    instruments: &[&str],
    locations: Vec<NamedLocation>,
) -> BodyProfile {
    BodyProfile {
        name: name.to_string(),
        spice_name: name.to_string(),
        observers: observers.iter().map(|s| s.to_string()).collect(),
        instruments: instruments.iter().map(|s| s.to_string()).collect(),
        locations,
        kernel_dependencies: infer_kernel_dependencies(name),
    }
}

fn location(name: &str, point_km: [f64; 3]) -> NamedLocation {
    NamedLocation {
        name: name.to_string(),
        point_km,
    }
}
