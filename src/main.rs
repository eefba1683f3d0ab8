extern crate sdl2;

pub mod background;
pub mod chain;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod logging;
pub mod mount;
pub mod render;
pub mod sample;
pub mod surface;
pub mod trail;
pub mod viewport;

use background::ParticleBackground;
use config::OverlayConfig;
use error::Result;
use render::SdlHost;
use trail::TrailAnimator;
use viewport::Overlay;

pub fn main() -> Result<()> {
    let config = OverlayConfig::demo()?;
    logging::init(&config.logging)?;

    let mut host = SdlHost::new(&config.display)?;

    // Mount order is paint order: the trail sits above the background.
    let mut overlays: Vec<Box<dyn Overlay>> = Vec::new();
    if config.background.enabled {
        overlays.push(Box::new(ParticleBackground::mount(
            host.viewport_mut(),
            config.background,
        )));
    }
    overlays.push(Box::new(TrailAnimator::mount(
        host.viewport_mut(),
        config.trail.clone(),
    )));

    let outcome = host.run(&mut overlays);
    for overlay in overlays.iter_mut() {
        overlay.unmount(host.viewport_mut());
    }
    outcome
}
