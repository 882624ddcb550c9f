//! Built-in demo scenes.
//!
//! Every scene produces its primitives, a camera and a background; the camera
//! aspect ratio always follows the render configuration.

use crate::cli::SceneKind;
use ember_core::{
    CheckerTexture, Color, ImageCache, ImageTexture, NoiseStyle, NoiseTexture, SolidColor,
    WaveTexture,
};
use ember_math::{Interval, Vec3};
use ember_renderer::{
    AaBox, AaRect, Background, Camera, ConstantMedium, Dielectric, DiffuseLight, HittableList,
    Lambertian, Material, Metal, MovingSphere, RenderConfig, RenderResult, Scene,
    Sphere, Triangle,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;

/// Primitives, camera and background before the BVH is built.
struct Setup {
    world: HittableList,
    camera: Camera,
    background: Background,
}

/// Build the scene selected by `kind`.
pub fn build_scene(
    kind: SceneKind,
    config: &RenderConfig,
    texture_dir: &Path,
) -> RenderResult<Scene> {
    let setup = match kind {
        SceneKind::RandomSpheres => random_spheres(config.seed),
        SceneKind::Materials => materials(),
        SceneKind::CheckerSpheres => checker_spheres(),
        SceneKind::PerlinSpheres => perlin_spheres(NoiseStyle::Marble),
        SceneKind::TurbulentSpheres => perlin_spheres(NoiseStyle::Turbulent),
        SceneKind::Textures => textures(),
        SceneKind::Earth => earth(texture_dir),
        SceneKind::LightTest => light_test(),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::Triangles => triangles(),
    };

    log::info!("Scene {:?}: {} primitives", kind, setup.world.len());

    let camera = setup.camera.with_aspect_ratio(config.aspect_ratio());
    Scene::build(setup.world.into_objects(), camera, setup.background)
}

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(color))
}

fn random_color(rng: &mut StdRng) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

/// A grid of small random spheres around three large ones. Diffuse spheres
/// bounce upward during the shutter, which blurs them.
fn random_spheres(seed: u64) -> Setup {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = HittableList::new();

    let checker = CheckerTexture::from_colors(Color::ONE, Color::new(0.2, 0.5, 0.34), 20.0);
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(Arc::new(checker))),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let radius = 0.4 * rng.gen_range(0.9f32..0.99);
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                radius,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if rng.gen::<f32>() > 0.66 {
                continue;
            }

            let choice: f32 = rng.gen();
            if choice <= 0.7 {
                let albedo = random_color(&mut rng) * random_color(&mut rng);
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                world.add(Box::new(MovingSphere::new(
                    center,
                    center1,
                    Interval::UNIT,
                    radius,
                    lambertian(albedo),
                )));
            } else if choice <= 0.85 {
                let albedo = random_color(&mut rng);
                let fuzz = rng.gen();
                world.add(Box::new(Sphere::new(
                    center,
                    radius,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                let ior = rng.gen_range(0.5..1.9);
                world.add(Box::new(Sphere::new(center, radius, Arc::new(Dielectric::new(ior)))));
            }
        }
    }

    world.add(Box::new(Sphere::new(
        Vec3::new(-2.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(2.0, 1.0, -2.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.6, 0.7, 0.8), 0.0)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-5.0, 1.0, -4.0),
        1.0,
        lambertian(Color::new(0.25, 0.8, 0.55)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(12.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -2.0), Vec3::Y)
        .with_lens(60.0, 0.1, 10.0)
        .with_shutter(0.0, 1.0);

    Setup {
        world,
        camera,
        background: Background::sky(),
    }
}

/// Diffuse, metal and hollow glass spheres on a yellow ground.
fn materials() -> Setup {
    let mut world = HittableList::new();
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        lambertian(Color::new(0.8, 0.8, 0.0)),
    )));
    world.add(Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass.clone())));
    // Negative radius flips the normals: a hollow bubble inside the glass
    world.add(Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass)));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        lambertian(Color::new(0.7, 0.3, 0.3)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, -1.5),
        0.4,
        Arc::new(Metal::new(Color::splat(0.7), 1.0)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(40.0, 0.0, 1.0);

    Setup {
        world,
        camera,
        background: Background::sky(),
    }
}

fn checker_spheres() -> Setup {
    let mut world = HittableList::new();
    let even = Color::new(0.2, 0.3, 0.1);
    let odd = Color::splat(0.9);

    let coarse = CheckerTexture::from_colors(even, odd, 5.0);
    let fine = CheckerTexture::from_colors(even, odd, 20.0);
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -10.0, 0.0),
        10.0,
        Arc::new(Lambertian::from_texture(Arc::new(coarse))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 10.0, 0.0),
        10.0,
        Arc::new(Lambertian::from_texture(Arc::new(fine))),
    )));

    Setup {
        world,
        camera: distant_camera(Vec3::ZERO),
        background: Background::sky(),
    }
}

fn perlin_spheres(style: NoiseStyle) -> Setup {
    let mut world = HittableList::new();
    let material: Arc<dyn Material> = Arc::new(Lambertian::from_texture(Arc::new(
        NoiseTexture::new(4.0, style),
    )));

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, -1.0),
        1000.0,
        material.clone(),
    )));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 2.0, -1.0), 2.0, material)));

    Setup {
        world,
        camera: distant_camera(Vec3::new(0.0, 1.0, -1.0)),
        background: Background::sky(),
    }
}

fn distant_camera(look_at: Vec3) -> Camera {
    Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), look_at, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
}

/// Wave, tinted noise and gradient noise on three small spheres.
fn textures() -> Setup {
    let mut world = HittableList::new();

    let wave = WaveTexture::from_colors(Color::new(0.2, 0.3, 0.1), Color::splat(0.9), 8.0, 8.0);
    let tinted = NoiseTexture::new(4.0, NoiseStyle::Colored(Color::new(1.0, 0.0, 0.0)));
    let gradient = NoiseTexture::new(
        4.0,
        NoiseStyle::Gradient(Color::new(0.8, 0.55, 0.01), Color::new(1.0, 0.1, 0.0)),
    );
    let ground = CheckerTexture::from_colors(Color::splat(0.1), Color::splat(0.8), 10.0);

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -100.5, -2.0),
        100.0,
        Arc::new(Lambertian::from_texture(Arc::new(ground))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-1.1, 0.0, -2.0),
        0.5,
        Arc::new(Lambertian::from_texture(Arc::new(wave))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -2.0),
        0.5,
        Arc::new(Lambertian::from_texture(Arc::new(gradient))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(1.1, 0.0, -2.0),
        0.5,
        Arc::new(Lambertian::from_texture(Arc::new(tinted))),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, 0.0, -2.0), Vec3::Y)
        .with_lens(45.0, 0.0, 1.0);

    Setup {
        world,
        camera,
        background: Background::sky(),
    }
}

/// A globe textured with `earth.jpg` from `texture_dir`. A missing image
/// renders magenta.
fn earth(texture_dir: &Path) -> Setup {
    let mut cache = ImageCache::with_base_dir(texture_dir);
    let texture = ImageTexture::from_cache(&mut cache, "earth.jpg");

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 0.0, -5.0),
        2.0,
        Arc::new(Lambertian::from_texture(Arc::new(texture))),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 0.0, 7.0), Vec3::new(0.0, 0.0, -5.0), Vec3::Y)
        .with_lens(20.0, 0.0, 12.0);

    Setup {
        world,
        camera,
        background: Background::sky(),
    }
}

/// Red, green and blue lights around metal balls of increasing roughness and
/// a glass ball, over a mirror floor.
fn light_test() -> Setup {
    let mut world = HittableList::new();
    let size = 0.35;

    let lights = [
        (Vec3::new(0.0, 0.0, 1.0), Color::new(3.0, 1.0, 1.0)),
        (Vec3::new(0.866, 0.0, -0.499), Color::new(1.0, 3.0, 1.0)),
        (Vec3::new(-0.866, 0.0, -0.499), Color::new(1.0, 1.0, 3.0)),
    ];
    for (center, emit) in lights {
        world.add(Box::new(Sphere::new(center, size, Arc::new(DiffuseLight::new(emit)))));
    }

    let balls = [
        (Vec3::new(0.0, 0.0, -1.0), 0.0),
        (Vec3::new(0.866, 0.0, 0.499), 0.5),
        (Vec3::new(-0.866, 0.0, 0.499), 1.0),
    ];
    for (center, fuzz) in balls {
        world.add(Box::new(Sphere::new(
            center,
            size,
            Arc::new(Metal::new(Color::splat(0.8), fuzz)),
        )));
    }

    world.add(Box::new(Sphere::new(Vec3::ZERO, size, Arc::new(Dielectric::new(1.5)))));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, -1000.0, -10.0),
        999.0,
        Arc::new(Metal::new(Color::ONE, 0.0)),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 2.5, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(40.0, 0.0, 1.0);

    Setup {
        world,
        camera,
        background: Background::solid(Color::ZERO),
    }
}

/// The five walls of a Cornell box and a downward-facing ceiling light.
fn cornell_walls(
    world: &mut HittableList,
    light: Arc<dyn Material>,
    light_x: (f32, f32),
    light_z: (f32, f32),
) {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let full = (0.0, 555.0);

    world.add(Box::new(AaRect::yz(full, full, 555.0, green)));
    world.add(Box::new(AaRect::yz(full, full, 0.0, red)));
    world.add(Box::new(AaRect::xz(light_x, light_z, 554.0, light).flipped()));
    world.add(Box::new(AaRect::xz(full, full, 0.0, white.clone())));
    world.add(Box::new(AaRect::xz(full, full, 555.0, white.clone())));
    world.add(Box::new(AaRect::xy(full, full, 555.0, white)));
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> Setup {
    let mut world = HittableList::new();
    let light = Arc::new(DiffuseLight::new(Color::splat(15.0)).front_only());
    cornell_walls(&mut world, light, (213.0, 343.0), (227.0, 332.0));

    let white = lambertian(Color::splat(0.73));
    world.add(Box::new(AaBox::new(
        Vec3::new(130.0, 0.0, 65.0),
        Vec3::new(295.0, 165.0, 230.0),
        white.clone(),
    )));
    world.add(Box::new(AaBox::new(
        Vec3::new(265.0, 0.0, 295.0),
        Vec3::new(430.0, 330.0, 460.0),
        white,
    )));

    Setup {
        world,
        camera: cornell_camera(),
        background: Background::solid(Color::ZERO),
    }
}

/// Cornell box whose blocks are a dark smoke and a white fog.
fn cornell_smoke() -> Setup {
    let mut world = HittableList::new();
    let light = Arc::new(DiffuseLight::new(Color::splat(7.0)).front_only());
    cornell_walls(&mut world, light, (113.0, 443.0), (127.0, 432.0));

    let white = lambertian(Color::splat(0.73));
    let smoke = AaBox::new(
        Vec3::new(130.0, 0.0, 65.0),
        Vec3::new(295.0, 165.0, 230.0),
        white.clone(),
    );
    let fog = AaBox::new(
        Vec3::new(265.0, 0.0, 295.0),
        Vec3::new(430.0, 330.0, 460.0),
        white,
    );
    world.add(Box::new(ConstantMedium::from_color(Box::new(smoke), 0.01, Color::ZERO)));
    world.add(Box::new(ConstantMedium::from_color(Box::new(fog), 0.01, Color::ONE)));

    Setup {
        world,
        camera: cornell_camera(),
        background: Background::solid(Color::ZERO),
    }
}

/// A four-sided pyramid and a glass tetrahedron under an area light, with a
/// faint blue haze around them.
fn triangles() -> Setup {
    let mut world = HittableList::new();

    let ground = CheckerTexture::from_colors(Color::splat(0.2), Color::splat(0.8), 2.0);
    world.add(Box::new(AaRect::xz(
        (-10.0, 10.0),
        (-10.0, 10.0),
        0.0,
        Arc::new(Lambertian::from_texture(Arc::new(ground))),
    )));

    let stone = lambertian(Color::new(0.8, 0.6, 0.3));
    let apex = Vec3::new(-1.0, 2.0, 0.0);
    let base = [
        Vec3::new(-2.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-2.0, 0.0, 1.0),
    ];
    for i in 0..base.len() {
        let next = base[(i + 1) % base.len()];
        world.add(Box::new(Triangle::new(next, base[i], apex, stone.clone())));
    }

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let tetra = [
        Vec3::new(1.0, 0.0, -0.5),
        Vec3::new(2.5, 0.0, -0.5),
        Vec3::new(1.75, 0.0, 0.8),
        Vec3::new(1.75, 1.4, 0.0),
    ];
    // Counter-clockwise seen from outside, so normals point out of the solid
    for (a, b, c) in [(0, 1, 2), (1, 0, 3), (2, 1, 3), (0, 2, 3)] {
        world.add(Box::new(Triangle::new(tetra[a], tetra[b], tetra[c], glass.clone())));
    }

    let light = Arc::new(DiffuseLight::new(Color::splat(6.0)).front_only());
    world.add(Box::new(AaRect::xz((-1.5, 1.5), (-1.5, 1.5), 5.0, light).flipped()));

    let haze = AaBox::new(
        Vec3::new(-4.0, 0.0, -3.0),
        Vec3::new(4.0, 3.0, 3.0),
        lambertian(Color::ONE),
    );
    world.add(Box::new(ConstantMedium::new(
        Box::new(haze),
        0.02,
        Arc::new(SolidColor::new(Color::new(0.7, 0.8, 1.0))),
    )));

    let camera = Camera::new()
        .with_position(Vec3::new(0.0, 3.0, 7.0), Vec3::new(0.0, 0.8, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 7.0);

    Setup {
        world,
        camera,
        background: Background::solid(Color::splat(0.05)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::render;

    fn tiny_config() -> RenderConfig {
        RenderConfig {
            width: 16,
            height: 9,
            samples_per_pixel: 2,
            max_depth: 4,
            workers: 2,
            seed: 7,
        }
    }

    #[test]
    fn test_every_scene_builds_and_renders() {
        let config = tiny_config();
        let kinds = [
            SceneKind::RandomSpheres,
            SceneKind::Materials,
            SceneKind::CheckerSpheres,
            SceneKind::PerlinSpheres,
            SceneKind::TurbulentSpheres,
            SceneKind::Textures,
            SceneKind::Earth,
            SceneKind::LightTest,
            SceneKind::CornellBox,
            SceneKind::CornellSmoke,
            SceneKind::Triangles,
        ];

        for kind in kinds {
            let scene = build_scene(kind, &config, Path::new("does-not-exist")).unwrap();
            assert_eq!(scene.camera().aspect_ratio(), config.aspect_ratio());

            let image = render(&scene, &config).unwrap();
            assert_eq!(image.pixels.len(), config.pixel_count());
            assert!(
                image.pixels.iter().all(|c| c.is_finite()),
                "{:?} produced non-finite pixels",
                kind
            );
        }
    }

    #[test]
    fn test_random_spheres_follow_seed() {
        let a = random_spheres(1).world.len();
        let b = random_spheres(1).world.len();
        assert_eq!(a, b);
        // Ground plus the three large spheres
        assert!(a > 4);
    }

    #[test]
    fn test_missing_earth_texture_still_builds() {
        let setup = earth(Path::new("does-not-exist"));
        assert_eq!(setup.world.len(), 1);
    }
}
