use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use feigen_engine::display::Display;
use feigen_engine::logging;
use feigen_engine::shader::Shader;

fn main() -> Result<()> {
    logging::init_default();

    println!();
    println!("  feigen viewer - julia set");
    println!("  scroll is tracked and logged; close the window to quit");
    println!();

    let mut display =
        Display::new("feigen viewer", 1024, 768).context("failed to open display")?;

    let info = display.render_context().adapter_info();
    log::info!("rendering on {} ({:?})", info.name, info.backend);

    let base = shader_base();
    let shader = Shader::new(display.render_context(), &base)
        .with_context(|| format!("failed to build shader program `{}`", base.display()))?;
    log::info!(
        "loaded {}-stage shader program `{}`",
        shader.stage_count(),
        base.display()
    );

    let mut last_wheel = display.wheel();

    while !display.is_closed() {
        let wheel = display.wheel();
        if wheel != last_wheel {
            log::info!("wheel: {wheel}");
            last_wheel = wheel;
        }

        if display.needs_redraw() {
            display.clear(0.02, 0.01, 0.05, 1.0);

            if let Some(frame) = display.frame() {
                let mut pass = frame.draw_pass();
                shader.bind(&mut pass);
                pass.draw(0..3, 0..1);
            }
        } else {
            // The fractal is static; don't spin the CPU between repaints.
            std::thread::sleep(Duration::from_millis(4));
        }

        display.update();
    }

    let ft = display.frame_time();
    log::info!("closing after {} updates ({:.1}s)", ft.frame_index, ft.elapsed);

    Ok(())
}

/// Shader pair shipped with the crate, resolved against the manifest so
/// `cargo run -p feigen-viewer` works from any directory.
fn shader_base() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders/julia")
}
