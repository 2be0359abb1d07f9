//! A small level-editor style scene.
//!
//! This example shows how to:
//! - Build a scene of flat-colored and textured sprites at different depths
//! - Slice a sprite sheet and animate an entity through it
//! - Move the camera with the arrow keys through the explicit app context
//!
//! Run with: cargo run -p tessera --example level_editor

use std::sync::Arc;

use tessera::core::{logging, profiling};
use tessera::prelude::*;
use tessera::render::ClearOp;

const SPRITE_SIZE: u32 = 16;
const SHEET_COLUMNS: u32 = 7;
const SHEET_ROWS: u32 = 4;
const CAMERA_SPEED: f32 = 300.0;

struct LevelEditor {
    window: RenderableWindow,
    program: SpriteProgram,
    scene: Scene,
}

impl App for LevelEditor {
    fn on_start(&mut self, _ctx: &mut AppCtx) {
        self.scene.start();
        tracing::info!(
            entities = self.scene.entity_count(),
            batches = self.scene.batches().len(),
            "level loaded"
        );
    }

    fn update(&mut self, ctx: &mut AppCtx, time: &FrameTime) {
        profiling::new_frame();

        let keys = ctx.input();
        let mut direction = Vec2::ZERO;
        if keys.is_pressed(KeyCode::ArrowLeft) {
            direction.x -= 1.0;
        }
        if keys.is_pressed(KeyCode::ArrowRight) {
            direction.x += 1.0;
        }
        if keys.is_pressed(KeyCode::ArrowDown) {
            direction.y -= 1.0;
        }
        if keys.is_pressed(KeyCode::ArrowUp) {
            direction.y += 1.0;
        }
        if keys.just_pressed(KeyCode::Escape) {
            ctx.exit();
        }

        if direction != Vec2::ZERO {
            let camera = self.scene.camera_mut();
            let position = camera.position() + direction * CAMERA_SPEED * time.delta_seconds();
            camera.set_position(position);
        }

        self.scene.update(time.delta_seconds());
    }

    fn render(&mut self, _ctx: &mut AppCtx, window_id: WindowId, events: &mut EventBatch) {
        if self.window.id() != window_id {
            return;
        }

        events.dispatch(|event| match event {
            Event::Resized(size) => {
                self.window.resized(*size);
                HandleStatus::consumed()
            }
            _ => HandleStatus::ignored(),
        });

        let stats = self.scene.render(&mut self.program);
        tracing::trace!(?stats, "scene rendered");

        let mut frame = match self.window.begin_frame() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("skipping frame: {e}");
                return;
            }
        };
        let mut pass = frame.render_pass(ClearOp::from(Color::WHITE));
        self.program.flush(&mut pass);
    }
}

/// Checkered sprite sheet, one hue per sprite.
fn sheet_pixels() -> (u32, u32, Vec<u8>) {
    let width = SPRITE_SIZE * SHEET_COLUMNS;
    let height = SPRITE_SIZE * SHEET_ROWS;
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let sprite = (y / SPRITE_SIZE) * SHEET_COLUMNS + x / SPRITE_SIZE;
            let checker = ((x / 4) + (y / 4)) % 2 == 0;
            let shade = if checker { 255 } else { 160 };
            let hue = (sprite * 37 % 256) as u8;
            pixels.extend_from_slice(&[hue, shade, 255 - hue, 255]);
        }
    }
    (width, height, pixels)
}

/// Radial fade with premultiplied alpha.
fn blend_pixels(size: u32) -> Vec<u8> {
    let center = size as f32 / 2.0;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let distance = Vec2::new(x as f32 - center, y as f32 - center).length() / center;
            let alpha = (1.0 - distance).clamp(0.0, 1.0);
            let a = (alpha * 255.0) as u8;
            pixels.extend_from_slice(&[a, (alpha * 0.4 * 255.0) as u8, 0, a]);
        }
    }
    pixels
}

fn build_scene(graphics: &Arc<GraphicsContext>) -> Scene {
    let mut scene = Scene::new(
        graphics.clone(),
        SceneConfig {
            camera_position: Vec2::new(-250.0, 0.0),
            ..Default::default()
        },
    );

    let (width, height, pixels) = sheet_pixels();
    let sheet_texture = Texture::from_rgba8(&**graphics, Some("spritesheet"), width, height, &pixels)
        .expect("generated sprite sheet has consistent dimensions");
    let sheet = SpriteSheet::new(
        sheet_texture,
        SpriteSheetDescriptor {
            sprite_width: SPRITE_SIZE,
            sprite_height: SPRITE_SIZE,
            count: SPRITE_SIZE + 10,
            spacing: 0,
        },
    );

    let blend = Texture::from_rgba8(&**graphics, Some("blend"), 64, 64, &blend_pixels(64))
        .expect("generated blend image has consistent dimensions");

    scene.add_entity(
        Entity::with_transform(
            "Object 1",
            Transform::new(Vec2::new(200.0, 100.0), Vec2::splat(256.0)),
            2,
        )
        .with_drawable(Drawable::from_color(Color::RED)),
    );
    scene.add_entity(
        Entity::with_transform(
            "Object 2",
            Transform::new(Vec2::new(400.0, 100.0), Vec2::splat(256.0)),
            3,
        )
        .with_drawable(Drawable::from_visual(QuadVisual::new(blend))),
    );

    for (i, visual) in sheet.sprites().iter().enumerate() {
        let column = (i % 13) as f32;
        let row = (i / 13) as f32;
        let transform = Transform::new(
            Vec2::new(column * 40.0, 420.0 + row * 40.0),
            Vec2::splat(32.0),
        );
        scene.add_entity(
            Entity::with_transform(format!("Tile {i}"), transform, 1)
                .with_drawable(Drawable::from_visual(visual.clone())),
        );
    }

    let frames = sheet.sprites().to_vec();
    let mut elapsed = 0.0;
    let mut index = 0;
    scene.add_entity(
        Entity::with_transform(
            "Walker",
            Transform::new(Vec2::new(700.0, 200.0), Vec2::splat(64.0)),
            1,
        )
        .with_drawable(Drawable::from_visual(frames[0].clone()))
        .with_component(move |ctx: &mut EntityCtx, dt: f32| {
            elapsed += dt;
            if elapsed < 0.2 {
                return;
            }
            elapsed -= 0.2;
            index = (index + 1) % frames.len();
            ctx.transform.position.x += 4.0;
            if ctx.transform.position.x > 900.0 {
                ctx.transform.position.x = 700.0;
            }
            if let Some(drawable) = ctx.drawable.as_mut() {
                drawable.set_visual(frames[index].clone());
            }
        }),
    );

    scene
}

fn main() {
    logging::init();
    profiling::init_profiling(profiling::ProfilingBackend::PuffinHttp);

    let result = run_app(|ctx| {
        let window = ctx
            .create_window(WindowDescriptor {
                title: "Tessera Level Editor".to_string(),
                ..Default::default()
            })
            .expect("Failed to create window");

        let graphics = GraphicsContext::new_owned_sync().expect("Failed to create graphics context");
        let window = RenderableWindow::new(window, graphics.clone())
            .expect("Failed to create renderable window");
        let program = SpriteProgram::new(graphics.clone(), window.surface_format());
        let scene = build_scene(&graphics);

        Box::new(LevelEditor {
            window,
            program,
            scene,
        })
    });

    if let Err(e) = result {
        tracing::error!("event loop failed: {e}");
    }
}
