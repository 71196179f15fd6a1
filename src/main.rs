//! Ricochet - headless runner
//!
//! Usage: `ricochet [settings.json] [ticks] [frame_dt]`
//!
//! Runs the arena for a number of ticks and prints the final ball state as
//! JSON. Set `RUST_LOG=debug` to see every bounce.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on the web; an external renderer drives the ticks
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use ricochet::consts::{MAX_FRAME_DT, STEP_DT};
    use ricochet::settings::Settings;
    use ricochet::sim::{TickInput, World, tick};

    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) if path != "-" => Settings::load(&path)?,
        _ => {
            log::info!("No settings file given, using the default room");
            Settings::default()
        }
    };
    let ticks: u64 = match args.next() {
        Some(n) => n.parse()?,
        None => 600,
    };
    let frame_dt: f32 = match args.next() {
        Some(dt) => dt.parse()?,
        None => STEP_DT,
    };
    let frame_dt = frame_dt.min(MAX_FRAME_DT);

    log::info!(
        "Ricochet starting: preset {}, response {}, {} ticks at {:.4}s",
        settings.preset.as_str(),
        settings.response.as_str(),
        ticks,
        frame_dt
    );

    let mut world = World::new(settings)?;
    let input = TickInput::default();
    let mut bounces = 0u64;
    for _ in 0..ticks {
        if tick(&mut world, &input, frame_dt).bounce.is_some() {
            bounces += 1;
        }
    }

    log::info!("Finished after {} ticks with {} bounces", world.time_ticks, bounces);
    println!("{}", serde_json::to_string_pretty(&world.body)?);
    Ok(())
}
