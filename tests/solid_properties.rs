//! End-to-end properties of generated terrain solids.

use landgen::export::{suggested_filename, write_stl, NormalMode, StlOptions};
use landgen::mesh::prism_volume;
use landgen::{generate, generate_heightfield, serialize, Landform, MeshGroup, TerrainParams};

fn params(landform: Landform, seed: i64, resolution: u32) -> TerrainParams {
    TerrainParams {
        resolution,
        ..TerrainParams::new(landform, seed)
    }
}

#[test]
fn test_island_small_grid_scenario() {
    let params = params(Landform::Island, 42, 4);
    let field = generate_heightfield(&params).unwrap();
    let mesh = generate(&params).unwrap();

    assert_eq!(field.vertex_count(), 25);
    assert_eq!(mesh.top_vertex_count(), 25);
    assert_eq!(mesh.group_triangle_count(MeshGroup::Top), 32);
    assert_eq!(mesh.group_triangle_count(MeshGroup::Skirt), 32);
    assert_eq!(mesh.group_triangle_count(MeshGroup::Base), 2);

    for &h in &field.heights {
        assert!((3.0..=28.0).contains(&h), "Height {} outside [3, 28]", h);
    }
}

/// Parameter set of the reference heights below.
fn reference_params(landform: Landform) -> TerrainParams {
    TerrainParams {
        landform,
        size: 100.0,
        max_height: 25.0,
        resolution: 5,
        noise_scale: 3.3,
        roughness: 0.5,
        distortion: 0.4,
        seed: 42,
        base_thickness: 3.0,
    }
}

#[test]
fn test_landform_heights_match_reference_values() {
    // (landform, vertex index, height in mm)
    let reference = [
        (Landform::Island, 14, 12.344998_f32),
        (Landform::Archipelago, 14, 8.549915),
        (Landform::Bay, 21, 15.302770),
        (Landform::Cape, 9, 10.351961),
        (Landform::Peninsula, 14, 15.108718),
        (Landform::Valley, 14, 13.594211),
        (Landform::Plateau, 14, 20.812565),
        (Landform::Mountain, 14, 6.828454),
        (Landform::Range, 14, 12.761822),
        (Landform::GlacialValley, 14, 5.087888),
        (Landform::Lakes, 14, 11.559922),
        // Vertex (0, 4) lies on a lake floor.
        (Landform::Lakes, 4, 3.208452),
        (Landform::Isthmus, 21, 11.530633),
        (Landform::Canyon, 14, 26.751324),
        (Landform::Volcano, 14, 11.964808),
    ];

    for (landform, index, expected) in reference {
        let field = generate_heightfield(&reference_params(landform)).unwrap();
        let height = field.heights[index];
        assert!(
            (height - expected).abs() <= 4e-6,
            "{} height at vertex {} is {}, expected {}",
            landform,
            index,
            height,
            expected
        );
    }
}

#[test]
fn test_same_parameters_same_text() {
    for landform in [Landform::Archipelago, Landform::Canyon, Landform::Volcano] {
        let params = params(landform, 1234, 24);
        let a = serialize(&generate(&params).unwrap(), &params);
        let b = serialize(&generate(&params).unwrap(), &params);
        assert_eq!(a, b, "{} output is not reproducible", landform);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate_heightfield(&params(Landform::Mountain, 1, 16)).unwrap();
    let b = generate_heightfield(&params(Landform::Mountain, 2, 16)).unwrap();
    assert_ne!(a.heights, b.heights);
}

#[test]
fn test_every_landform_respects_base_floor() {
    for landform in Landform::all() {
        let params = params(landform, 7, 32);
        let field = generate_heightfield(&params).unwrap();
        let floor = params.base_thickness as f32;

        assert_eq!(field.vertex_count(), 33 * 33);
        for &h in &field.heights {
            assert!(h.is_finite(), "{} produced a non-finite height", landform);
            assert!(h >= floor, "{} height {} below base {}", landform, h, floor);
        }
    }
}

#[test]
fn test_every_landform_closes_a_solid() {
    for landform in Landform::all() {
        let params = params(landform, 99, 20);
        let mesh = generate(&params).unwrap();

        let volume = mesh.signed_volume();
        let expected = prism_volume(&mesh);
        assert!(volume > 0.0, "{} volume {} not positive", landform, volume);
        assert!(
            (volume - expected).abs() < 1e-6 * expected,
            "{} volume {} differs from surface integral {}",
            landform,
            volume,
            expected
        );

        // Every solid sits on at least the base slab.
        let slab = params.size * params.size * params.base_thickness;
        assert!(volume >= slab * (1.0 - 1e-6), "{} volume {} below slab {}", landform, volume, slab);
    }
}

#[test]
fn test_zero_height_and_thickness_is_flat() {
    let params = TerrainParams {
        max_height: 0.0,
        base_thickness: 0.0,
        ..params(Landform::Plateau, 5, 8)
    };
    let field = generate_heightfield(&params).unwrap();
    assert!(field.heights.iter().all(|&h| h == 0.0));

    let mesh = generate(&params).unwrap();
    assert!(mesh.signed_volume().abs() < 1e-9);
}

#[test]
fn test_serialized_facet_structure() {
    let params = params(Landform::Bay, 3, 6);
    let mesh = generate(&params).unwrap();
    let stl = serialize(&mesh, &params);
    let n = mesh.triangle_count();

    assert_eq!(n, 6 * 6 * 2 + 4 * 6 * 2 + 2);
    assert_eq!(stl.matches("  facet normal ").count(), n);
    assert_eq!(stl.matches("  endfacet").count(), n);
    assert_eq!(stl.lines().filter(|l| l.starts_with("solid ")).count(), 1);
    assert_eq!(stl.lines().filter(|l| l.starts_with("endsolid ")).count(), 1);

    let name = suggested_filename(&params);
    let stem = name.trim_end_matches(".stl");
    assert!(stl.starts_with(&format!("solid {}\n", stem)));
    assert!(stl.ends_with(&format!("endsolid {}\n", stem)));
}

#[test]
fn test_streamed_output_matches_string() {
    let params = params(Landform::Isthmus, 8, 10);
    let mesh = generate(&params).unwrap();
    let options = StlOptions {
        normals: NormalMode::Zero,
        ..StlOptions::for_params(&params)
    };

    let mut streamed = Vec::new();
    write_stl(&mesh, &options, &mut streamed).unwrap();
    let text = landgen::export::serialize_stl(&mesh, &options);

    assert_eq!(String::from_utf8(streamed).unwrap(), text);
    assert!(text.lines().filter(|l| l.contains("facet normal")).all(|l| l == "  facet normal 0.0000 0.0000 0.0000"));
}

#[test]
fn test_invalid_parameters_rejected() {
    assert!(generate(&params(Landform::Lakes, 1, 0)).is_err());

    let infinite = [
        TerrainParams {
            size: f64::INFINITY,
            ..params(Landform::Island, 1, 4)
        },
        TerrainParams {
            max_height: f64::INFINITY,
            ..params(Landform::Island, 1, 4)
        },
        TerrainParams {
            base_thickness: f64::NAN,
            ..params(Landform::Island, 1, 4)
        },
    ];
    for params in infinite {
        assert!(generate(&params).is_err(), "{:?} should be rejected", params);
    }
}
