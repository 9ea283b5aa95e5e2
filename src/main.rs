//! Peg Aim entry point
//!
//! Native demo: builds a seeded board, runs the aim guide for one aim and
//! prints the predicted paths as text.
//!
//! Usage: `peg-aim [seed] [--aim X,Y] [--quality low|medium|high] [--save-settings]
//! [--triple] [--fireball] [--first]`
//! Settings and tuning are read from `PEG_AIM_SETTINGS` / `PEG_AIM_TUNING`
//! (defaults `settings.json` / `tuning.json`).

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use peg_aim::guide::{BallProbe, LauncherState};
    use peg_aim::sim::{PegLayout, build_world};
    use peg_aim::{GuideTuning, Settings, TrajectoryPredictor};

    env_logger::init();
    log::info!("Peg Aim (native) starting...");

    let args = DemoArgs::parse(std::env::args().skip(1));

    let env_path = |key: &str, default: &str| {
        PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
    };
    let settings_path = env_path("PEG_AIM_SETTINGS", "settings.json");
    let mut settings = Settings::load(&settings_path);
    if let Some(preset) = args.quality {
        settings.apply_preset(preset);
        log::info!("Quality preset: {}", preset.as_str());
    }
    if args.save_settings {
        settings
            .save(&settings_path)
            .unwrap_or_else(|e| log::warn!("Could not save settings to {}: {}", settings_path.display(), e));
    }
    let tuning = GuideTuning::load_or_default(&env_path("PEG_AIM_TUNING", "tuning.json")).with_settings(&settings);

    if !settings.aim_guide {
        println!("Aim guide disabled in settings");
        return;
    }

    let layout = PegLayout::default();
    let world = build_world(args.seed, &layout, 0.5);

    let launcher = LauncherState {
        is_first_shot: args.first_shot,
        first_shot_linear: true,
        ..Default::default()
    };

    let mut predictor = TrajectoryPredictor::new(tuning);
    predictor.enable(&BallProbe::new(0.15));
    let aim = launcher.aim_at(args.pointer);
    let frame = predictor.recompute(&world, aim, Some(&launcher), &args.powerups);

    for (variant, path) in frame.iter() {
        match path.impact {
            Some(impact) => log::info!(
                "{:?}: {} dots, rests at ({:.2}, {:.2}) against {:?}",
                variant,
                path.len(),
                impact.rest.x,
                impact.rest.y,
                impact.collider
            ),
            None => log::info!("{:?}: {} dots, no contact", variant, path.len()),
        }
    }

    println!("{}", render_board(&world, &predictor, &launcher, &layout));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The guide is a library on wasm; there is no demo entry point
}

/// Demo command line
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
struct DemoArgs {
    seed: u64,
    pointer: glam::Vec2,
    powerups: peg_aim::guide::PowerUpState,
    first_shot: bool,
    /// Preset applied on top of the loaded settings
    quality: Option<peg_aim::QualityPreset>,
    /// Write the resulting settings back to the settings file
    save_settings: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl DemoArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut parsed = Self {
            seed: 12345,
            pointer: glam::Vec2::new(1.5, 0.0),
            powerups: peg_aim::guide::PowerUpState::default(),
            first_shot: false,
            quality: None,
            save_settings: false,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--triple" => parsed.powerups.triple_shot = true,
                "--fireball" => parsed.powerups.fireball = true,
                "--first" => parsed.first_shot = true,
                "--save-settings" => parsed.save_settings = true,
                "--aim" => match args.next().as_deref().and_then(parse_point) {
                    Some(p) => parsed.pointer = p,
                    None => log::warn!("--aim expects X,Y"),
                },
                "--quality" => match args.next().as_deref().and_then(peg_aim::QualityPreset::from_str) {
                    Some(q) => parsed.quality = Some(q),
                    None => log::warn!("--quality expects low, medium or high"),
                },
                other => match other.parse() {
                    Ok(s) => parsed.seed = s,
                    Err(_) => log::warn!("Ignoring unknown argument {:?}", other),
                },
            }
        }
        parsed
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_point(s: &str) -> Option<glam::Vec2> {
    let (x, y) = s.split_once(',')?;
    Some(glam::Vec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Text plot of the board and the active guide markers
#[cfg(not(target_arch = "wasm32"))]
fn render_board(
    world: &peg_aim::sim::StaticWorld,
    predictor: &peg_aim::TrajectoryPredictor,
    launcher: &peg_aim::guide::LauncherState,
    layout: &peg_aim::sim::PegLayout,
) -> String {
    use glam::Vec2;
    use peg_aim::ShotVariant;
    use peg_aim::sim::Shape;

    const COLS: usize = 64;
    const ROWS: usize = 32;

    let lo = layout.bounds_min.min(layout.bounds_max) - Vec2::splat(1.0);
    let hi = layout.bounds_min.max(layout.bounds_max).max(launcher.pivot) + Vec2::splat(1.0);
    let span = (hi - lo).max(Vec2::splat(1e-3));

    let mut grid = vec![[' '; COLS]; ROWS];
    let mut plot = |p: Vec2, c: char| {
        let n = (p - lo) / span;
        if (0.0..1.0).contains(&n.x) && (0.0..1.0).contains(&n.y) {
            let col = (n.x * COLS as f32) as usize;
            let row = ROWS - 1 - (n.y * ROWS as f32) as usize;
            grid[row][col] = c;
        }
    };

    for collider in world.colliders() {
        match collider.shape {
            Shape::Circle { center, .. } => plot(center, 'o'),
            Shape::Segment { a, b, .. } => {
                for i in 0..=48 {
                    plot(a.lerp(b, i as f32 / 48.0), '#');
                }
            }
        }
    }

    for (variant, mark) in [(ShotVariant::Left, '<'), (ShotVariant::Right, '>'), (ShotVariant::Center, '.')] {
        for p in predictor.pool(variant).active_positions() {
            plot(p, mark);
        }
        let ghost = predictor.ghost(variant);
        if ghost.visible {
            plot(ghost.position, '@');
        }
    }
    plot(launcher.spawn, 'V');

    grid.iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
