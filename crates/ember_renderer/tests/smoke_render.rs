use std::sync::Arc;

use ember_renderer::{
    render, Background, Camera, Color, Hittable, Lambertian, RenderConfig, Scene, Sphere, Vec3,
};

fn luminance(c: Color) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

#[test]
fn diffuse_sphere_against_sky() {
    let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::splat(0.5))),
    ))];
    let scene = Scene::build(objects, Camera::new(), Background::sky()).unwrap();

    let config = RenderConfig {
        width: 64,
        height: 64,
        samples_per_pixel: 100,
        max_depth: 10,
        workers: 4,
        seed: 0,
    };
    let image = render(&scene, &config).unwrap();
    assert_eq!(image.pixels.len(), 64 * 64);

    // Central 8x8 block sees the sphere
    let mut center = 0.0;
    for y in 28..36 {
        for x in 28..36 {
            center += luminance(image.get(x, y));
        }
    }
    center /= 64.0;

    // The outermost ring of pixels sees only sky
    let mut edge = 0.0;
    let mut edge_count = 0;
    for y in 0..64 {
        for x in 0..64 {
            if x == 0 || y == 0 || x == 63 || y == 63 {
                edge += luminance(image.get(x, y));
                edge_count += 1;
            }
        }
    }
    edge /= edge_count as f32;

    assert!(
        center < edge,
        "center {} should be darker than edges {}",
        center,
        edge
    );

    for c in &image.pixels {
        assert!(c.is_finite());
        assert!(c.min_element() >= 0.0);
    }

    let bytes = image.to_rgb8();
    assert_eq!(bytes.len(), 64 * 64 * 3);
    // Sky pixels are bright but still inside the byte range after clamping
    assert!(bytes.iter().any(|&b| b > 200));
}
