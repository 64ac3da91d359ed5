use std::time::Instant;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use rasterkit::{Key, RenderContext};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

fn map_keycode(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::W => Some(Key::Wireframe),
        Keycode::S => Some(Key::Solid),
        Keycode::D => Some(Key::SolidAndWireframe),
        Keycode::F => Some(Key::Flat),
        Keycode::G => Some(Key::Gouraud),
        Keycode::P => Some(Key::Phong),
        Keycode::Q => Some(Key::RotateObjectPositive),
        Keycode::E => Some(Key::RotateObjectNegative),
        Keycode::N => Some(Key::ToggleNormals),
        Keycode::Space => Some(Key::CameraUp),
        Keycode::LCtrl | Keycode::RCtrl => Some(Key::CameraDown),
        Keycode::Left => Some(Key::LightLeft),
        Keycode::Right => Some(Key::LightRight),
        Keycode::Up => Some(Key::LightUp),
        Keycode::Down => Some(Key::LightDown),
        Keycode::Num1 => Some(Key::SelectObject(1)),
        Keycode::Num2 => Some(Key::SelectObject(2)),
        Keycode::Num3 => Some(Key::SelectObject(3)),
        Keycode::Num4 => Some(Key::SelectObject(4)),
        Keycode::Num5 => Some(Key::SelectObject(5)),
        Keycode::Num6 => Some(Key::SelectObject(6)),
        Keycode::Num7 => Some(Key::SelectObject(7)),
        Keycode::Num8 => Some(Key::SelectObject(8)),
        Keycode::Num9 => Some(Key::SelectObject(9)),
        _ => None,
    }
}

fn main() -> Result<(), String> {
    env_logger::init();

    let obj_paths: Vec<String> = std::env::args().skip(1).collect();
    if obj_paths.is_empty() {
        eprintln!("usage: rasterkit-demo <model.obj> [more.obj ...]");
        eprintln!("no OBJ files given; drawing the fallback cube");
    }

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("rasterkit", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();

    let mut window_width = WINDOW_WIDTH;
    let mut window_height = WINDOW_HEIGHT;

    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGBA8888, window_width, window_height)
        .map_err(|e| e.to_string())?;

    let mut context = RenderContext::on_launch(window_width, window_height, &obj_paths);
    let mut event_pump = sdl_context.event_pump()?;
    let mut last_frame = Instant::now();

    let mut is_running = true;
    while is_running {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => is_running = false,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = map_keycode(keycode) {
                        context.process_input(key);
                    }
                }
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => {
                    window_width = w as u32;
                    window_height = h as u32;
                    context = RenderContext::on_launch(window_width, window_height, &obj_paths);
                    texture = texture_creator
                        .create_texture_streaming(PixelFormatEnum::RGBA8888, window_width, window_height)
                        .map_err(|e| e.to_string())?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let delta = (now - last_frame).as_secs_f32();
        last_frame = now;
        context.update(delta);

        texture
            .update(None, context.framebuffer().color_buffer_bytes(), (window_width * 4) as usize)
            .map_err(|e| e.to_string())?;

        canvas.set_draw_color(sdl2::pixels::Color::RGB(0, 0, 0));
        canvas.clear();
        canvas.copy(&texture, None, Some(Rect::new(0, 0, window_width, window_height)))?;
        canvas.present();
    }

    context.on_shutdown();
    Ok(())
}
