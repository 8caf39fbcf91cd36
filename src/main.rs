mod ui;

use arcade::build_info;
use arcade::core::{ArcadeConfig, ScoreReporter};
use arcade::games::{starter_config, GameEvent, GameKind};
use arcade::scores::{ScoreBoard, ScoreStore};
use arcade::utils;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::time::{Duration, Instant};
use ui::game_scene::{GameScene, SceneAction};
use ui::menu_scene::MenuScreen;

/// Input poll timeout; roughly one physics tick.
const FRAME_POLL_MS: u64 = 16;
const LOG_FILENAME: &str = "arcade.log";

enum Screen {
    Menu,
    Game(Box<GameScene>),
}

fn print_help() {
    println!("Arcade - five terminal arcade games\n");
    println!("Usage: arcade [options]\n");
    println!("Options:");
    println!("  --game <id>  Jump straight into a game");
    println!("  --version    Show version information");
    println!("  --help       Show this help message\n");
    println!("Games:");
    for kind in GameKind::ALL {
        println!("  {:<16} {}", kind.id(), kind.description());
    }
}

/// Parse the command line. `Ok(None)` means the program should exit.
fn parse_args(args: &[String]) -> Result<Option<Option<GameKind>>, String> {
    let mut game = None;
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line("arcade"));
                return Ok(None);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--game" | "-g" => {
                let id = iter.next().ok_or("--game needs a game id")?;
                game = Some(GameKind::from_id(id).ok_or_else(|| format!("Unknown game: {}", id))?);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
    }
    Ok(Some(game))
}

/// Log to ~/.arcade/arcade.log so the terminal UI stays clean. `RUST_LOG`
/// overrides the default `warn` filter.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let file = utils::data_path(LOG_FILENAME)
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path));
    match file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

/// Read the config, writing one with every default on first run.
fn load_config() -> ArcadeConfig {
    let exists = utils::data_path(ArcadeConfig::FILENAME)
        .map(|path| path.exists())
        .unwrap_or(true);
    if exists {
        return ArcadeConfig::load();
    }
    let config = starter_config();
    match config.save() {
        Ok(()) => log::info!("wrote default {}", ArcadeConfig::FILENAME),
        Err(e) => log::warn!("could not write {}: {}", ArcadeConfig::FILENAME, e),
    }
    config
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let initial_game = match parse_args(&args) {
        Ok(Some(game)) => game,
        Ok(None) => return Ok(()),
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'arcade --help' for usage.");
            std::process::exit(1);
        }
    };

    init_logging();
    log::info!("{}", build_info::version_line("arcade"));

    let mut config = load_config();
    let store = ScoreStore::new()?;
    let mut scores = store.load_or_default();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut config, &store, &mut scores, initial_game);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &mut ArcadeConfig,
    store: &ScoreStore,
    scores: &mut ScoreBoard,
    initial_game: Option<GameKind>,
) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut menu = MenuScreen::new();
    let mut screen = match initial_game {
        Some(kind) => {
            menu.select(kind);
            Screen::Game(Box::new(GameScene::new(kind, config, &mut rng)))
        }
        None => Screen::Menu,
    };
    let mut last_frame = Instant::now();

    loop {
        match &mut screen {
            Screen::Menu => {
                terminal.draw(|f| {
                    let area = f.size();
                    menu.draw(f, area, scores);
                })?;

                if event::poll(Duration::from_millis(50))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        match key.code {
                            KeyCode::Up | KeyCode::Char('w') => menu.move_up(),
                            KeyCode::Down | KeyCode::Char('s') => menu.move_down(),
                            KeyCode::Enter | KeyCode::Char(' ') => {
                                let kind = menu.selected();
                                screen =
                                    Screen::Game(Box::new(GameScene::new(kind, config, &mut rng)));
                                last_frame = Instant::now();
                            }
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                            _ => {}
                        }
                    }
                }
            }

            Screen::Game(scene) => {
                let best = scores.best(scene.kind.id());
                terminal.draw(|f| {
                    let area = f.size();
                    scene.draw(f, area, best);
                })?;

                let mut action = SceneAction::None;
                if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            action = scene.handle_key(key.code, &mut rng);
                        }
                    }
                }

                let now = Instant::now();
                let dt_ms = now.duration_since(last_frame).as_millis() as u64;
                last_frame = now;
                for event in scene.update(dt_ms, &mut rng) {
                    if let GameEvent::SessionEnded(report) = event {
                        scores.report(&report);
                        if let Err(e) = store.save(scores) {
                            log::warn!("could not save scores: {}", e);
                        }
                    }
                }

                match action {
                    SceneAction::Quit => break,
                    SceneAction::BackToMenu => screen = Screen::Menu,
                    SceneAction::ReloadConfig => {
                        *config = ArcadeConfig::load();
                        scene.reload_config(config);
                    }
                    SceneAction::None => {}
                }
            }
        }
    }

    Ok(())
}
