use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use hanabi::{FireworkType, Renderer, World};
use std::env;
use std::io::{stdout, BufWriter};
use std::time::{Duration, Instant};

fn print_usage() {
    eprintln!("hanabi - Fireworks show for your terminal");
    eprintln!();
    eprintln!("Usage: hanabi [OPTIONS]");
    eprintln!();
    eprintln!("Controls:");
    eprintln!("  1         Launch a kiku (chrysanthemum with golden trails)");
    eprintln!("  2         Launch a botan (peony)");
    eprintln!("  3         Launch a heart");
    eprintln!("  4         Launch a smiley");
    eprintln!("  s         Star mine: 36 rapid-fire shells");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!();
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

fn run(bg_color: (u8, u8, u8)) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let (cols, rows) = terminal::size()?;
    // Half blocks double the vertical resolution: one cell backs two pixels
    let mut world = World::new(cols as f32, (rows as usize * 2) as f32);
    let mut renderer = Renderer::new(cols as usize, rows as usize * 2, bg_color);

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    match key_event.code {
                        KeyCode::Char('1') => world.launch(FireworkType::Kiku),
                        KeyCode::Char('2') => world.launch(FireworkType::Botan),
                        KeyCode::Char('3') => world.launch(FireworkType::Heart),
                        KeyCode::Char('4') => world.launch(FireworkType::Smiley),
                        KeyCode::Char('s') => world.launch_star_mine(),
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    // Shells in flight survive the resize; only the camera
                    // and canvas change
                    world.set_viewport(cols as f32, (rows as usize * 2) as f32);
                    renderer.resize(cols as usize, rows as usize * 2);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            world.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        renderer.render(&world, &mut stdout)?;
    }

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut bg_color = (0, 0, 0);

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bg-color" => {
                if i + 1 < args.len() {
                    if let Some(color) = parse_hex_color(&args[i + 1]) {
                        bg_color = color;
                        i += 2;
                    } else {
                        eprintln!("Invalid hex color: {}", args[i + 1]);
                        eprintln!("Expected format: RRGGBB (e.g., 1a1b26)");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("--bg-color requires a hex color value");
                    std::process::exit(1);
                }
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    run(bg_color)
}
